//! Wire format for [`Grid`]: an array of rows (`Cell[][]`), the shape the
//! persisted simulation documents use.
//!
//! Cells carry the derived `moistureVolumetric` on the way out.  Loading
//! ignores it and re-derives it from `moisture`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use soil_core::ParamOverrides;

use crate::{Cell, Grid};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CellWire<'a> {
    row:                 u32,
    col:                 u32,
    moisture:            f64,
    moisture_volumetric: f64,
    tap_status:          bool,
    override_tap:        bool,
    #[serde(flatten)]
    overrides:           &'a ParamOverrides,
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CellWire {
            row:                 self.row,
            col:                 self.col,
            moisture:            self.moisture,
            moisture_volumetric: self.moisture_volumetric(),
            tap_status:          self.tap_status,
            override_tap:        self.override_tap,
            overrides:           &self.overrides,
        }
        .serialize(serializer)
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter_rows())
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<Cell>>::deserialize(deserializer)?;
        Grid::from_rows(rows).map_err(D::Error::custom)
    }
}
