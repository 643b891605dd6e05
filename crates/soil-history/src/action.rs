//! Discrete user edits recorded in the history log.

use std::fmt;

use soil_core::{CellIndex, ParamName};

/// Discriminant of a [`UserAction`], without its payload.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ActionKind {
    ToggleTap,
    ResetTapControl,
    SetMoisture,
    SetCellParameter,
    ResetCellParameter,
    ResetAllCellParameters,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::ToggleTap              => "ToggleTap",
            ActionKind::ResetTapControl        => "ResetTapControl",
            ActionKind::SetMoisture            => "SetMoisture",
            ActionKind::SetCellParameter       => "SetCellParameter",
            ActionKind::ResetCellParameter     => "ResetCellParameter",
            ActionKind::ResetAllCellParameters => "ResetAllCellParameters",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-initiated mutation.  Logged facts: never edited after being
/// appended, except for last-value-wins consolidation in the staging head.
///
/// JSON shape: `{"action": "SetCellParameter", "cellIndex": 4,
/// "param": "irrigationRate", "value": 0.3}`.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "action"))]
pub enum UserAction {
    /// Flip the tap and pin it.
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    ToggleTap { cell_index: CellIndex },

    /// Unpin the tap so the threshold rule drives it again.
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    ResetTapControl { cell_index: CellIndex },

    /// Overwrite moisture (clamped to `[0, 1]`).
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    SetMoisture { cell_index: CellIndex, value: f64 },

    /// Pin one parameter for one cell.
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    SetCellParameter { cell_index: CellIndex, param: ParamName, value: f64 },

    /// Drop one cell's override for `param`.
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    ResetCellParameter { cell_index: CellIndex, param: ParamName },

    /// Drop every override on every cell.
    ResetAllCellParameters,
}

impl UserAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            UserAction::ToggleTap { .. }          => ActionKind::ToggleTap,
            UserAction::ResetTapControl { .. }    => ActionKind::ResetTapControl,
            UserAction::SetMoisture { .. }        => ActionKind::SetMoisture,
            UserAction::SetCellParameter { .. }   => ActionKind::SetCellParameter,
            UserAction::ResetCellParameter { .. } => ActionKind::ResetCellParameter,
            UserAction::ResetAllCellParameters    => ActionKind::ResetAllCellParameters,
        }
    }

    /// Target cell, or `None` for grid-wide actions.
    pub fn cell_index(&self) -> Option<CellIndex> {
        match *self {
            UserAction::ToggleTap { cell_index }
            | UserAction::ResetTapControl { cell_index }
            | UserAction::SetMoisture { cell_index, .. }
            | UserAction::SetCellParameter { cell_index, .. }
            | UserAction::ResetCellParameter { cell_index, .. } => Some(cell_index),
            UserAction::ResetAllCellParameters => None,
        }
    }

    pub fn param(&self) -> Option<ParamName> {
        match *self {
            UserAction::SetCellParameter { param, .. }
            | UserAction::ResetCellParameter { param, .. } => Some(param),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match *self {
            UserAction::SetMoisture { value, .. }
            | UserAction::SetCellParameter { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Identity used to collapse repeated edits in the staging head.
    pub fn dedup_key(&self) -> (ActionKind, Option<CellIndex>, Option<ParamName>) {
        (self.kind(), self.cell_index(), self.param())
    }
}
