//! The `SimulationController` and its run state machine.

use std::time::{SystemTime, UNIX_EPOCH};

use soil_core::{
    CellIndex, ParamName, SimulationId, SimulationParams, SimulationSetup, StepSize, TimeStep,
};
use soil_grid::{Grid, apply_step};
use soil_history::{HistoryEntry, HistoryLog, ParameterChanges, UserAction};
use tracing::{debug, info, warn};

use crate::{
    ControllerConfig, DisplaySettings, ExportFormat, MoistureSample, MoistureSeries,
    PersistenceGateway, PersistenceResult, SavedSimulation, SetupParams, SimError, SimResult,
    SimulationObserver, SimulationView,
};

// ── Session state ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum RunState {
    Paused,
    Running,
}

/// Everything belonging to one initialized or restored run.
///
/// The current grid and params are always those of the newest history
/// entry, so stepping back restores them without extra bookkeeping.
#[derive(Clone, Debug)]
struct Session {
    setup:          SetupParams,
    /// Grid that `reset` returns to.
    baseline:       Grid,
    log:            HistoryLog,
    step_size:      StepSize,
    run:            RunState,
    display:        DisplaySettings,
    series:         MoistureSeries,
    simulation_id:  Option<SimulationId>,
    /// Bumped by every mutation.
    revision:       u64,
    /// Revision captured by the last successful save.
    saved_revision: Option<u64>,
}

impl Session {
    fn fresh(setup: &SimulationSetup) -> SimResult<Session> {
        let grid = Grid::generate(setup)?;
        Ok(Session {
            setup:          SetupParams::new(setup.grid_size, setup.initial_moisture),
            baseline:       grid.clone(),
            log:            HistoryLog::new(grid, setup.params),
            step_size:      setup.step_size,
            run:            RunState::Paused,
            display:        DisplaySettings::default(),
            series:         MoistureSeries::default(),
            simulation_id:  None,
            revision:       0,
            saved_revision: None,
        })
    }

    fn from_saved(id: SimulationId, saved: SavedSimulation) -> SimResult<Session> {
        let log = HistoryLog::from_entries(saved.grid_history)?;
        if log.current_step() != saved.time_step {
            return Err(SimError::TimeStepMismatch {
                claimed: saved.time_step,
                actual:  log.current_step(),
            });
        }
        for entry in log.iter() {
            entry.params.validate()?;
        }

        Ok(Session {
            setup:          saved.setup_params,
            baseline:       log.last().grid.clone(),
            log,
            step_size:      saved.time_step_size,
            run:            RunState::Paused,
            display:        saved.display_settings,
            series:         MoistureSeries::from_samples(saved.moisture_history),
            simulation_id:  Some(id),
            revision:       0,
            saved_revision: Some(0),
        })
    }

    #[inline]
    fn time_step(&self) -> TimeStep {
        self.log.current_step()
    }

    #[inline]
    fn grid(&self) -> &Grid {
        &self.log.last().grid
    }

    #[inline]
    fn params(&self) -> SimulationParams {
        self.log.last().params
    }

    #[inline]
    fn touch(&mut self) {
        self.revision += 1;
    }

    fn has_unsaved_changes(&self) -> bool {
        self.saved_revision != Some(self.revision)
    }

    /// Log an edit: merged into the staging head at step 0, otherwise
    /// appended as an event-only entry.  Returns the step that now holds it.
    fn record_edit(
        &mut self,
        grid:    Grid,
        params:  SimulationParams,
        changes: ParameterChanges,
        actions: Vec<UserAction>,
    ) -> SimResult<TimeStep> {
        let now = self.time_step();
        let at = if now.is_zero() {
            self.log.merge_into_head(grid, params, changes, actions)?;
            now
        } else {
            let next = now.next();
            self.log.append(HistoryEntry::event(next, grid, params, changes, actions));
            next
        };
        self.series.record(&self.log.last().grid, at);
        self.touch();
        Ok(at)
    }

    fn snapshot(&self, name: String) -> SavedSimulation {
        SavedSimulation {
            name,
            setup_params:      self.setup,
            simulation_params: self.params(),
            display_settings:  self.display,
            grid_history:      self.log.entries().to_vec(),
            time_step:         self.time_step(),
            time_step_size:    self.step_size,
            moisture_history:  self.series.samples().to_vec(),
        }
    }
}

enum ControllerState {
    Idle,
    Ready(Box<Session>),
}

// ── SaveTicket ────────────────────────────────────────────────────────────────

/// A snapshot taken by [`SimulationController::begin_save`].
///
/// Hand it to the persistence backend, then return it with the outcome to
/// [`SimulationController::complete_save`].  The controller may keep
/// stepping in between.
#[derive(Clone, Debug)]
pub struct SaveTicket {
    snapshot: SavedSimulation,
    epoch:    u64,
    revision: u64,
}

impl SaveTicket {
    #[inline]
    pub fn snapshot(&self) -> &SavedSimulation {
        &self.snapshot
    }
}

// ── SimulationController ──────────────────────────────────────────────────────

/// Owns the current run and routes every mutation through its history.
///
/// A new controller is idle; most operations return
/// [`SimError::NotInitialized`] until [`initialize`](Self::initialize) or
/// [`restore`](Self::restore) succeeds.
pub struct SimulationController {
    config: ControllerConfig,
    state:  ControllerState,
    /// Incremented per installed session so late save results for a
    /// replaced session are not applied to the new one.
    epoch:  u64,
}

impl Default for SimulationController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl SimulationController {
    pub fn new(config: ControllerConfig) -> Self {
        Self { config, state: ControllerState::Idle, epoch: 0 }
    }

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, ControllerState::Ready(_))
    }

    fn session(&self) -> SimResult<&Session> {
        match &self.state {
            ControllerState::Ready(s) => Ok(&**s),
            ControllerState::Idle     => Err(SimError::NotInitialized),
        }
    }

    fn session_mut(&mut self) -> SimResult<&mut Session> {
        match &mut self.state {
            ControllerState::Ready(s) => Ok(&mut **s),
            ControllerState::Idle     => Err(SimError::NotInitialized),
        }
    }

    fn install(&mut self, session: Session) {
        self.epoch += 1;
        self.state = ControllerState::Ready(Box::new(session));
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Start a fresh run from `setup`, replacing any current one.
    ///
    /// The generated grid becomes both the step-0 entry and the reset
    /// baseline.  The run starts paused and unsaved.
    pub fn initialize(&mut self, setup: &SimulationSetup) -> SimResult<()> {
        let session = Session::fresh(setup).inspect_err(|e| {
            warn!(error = %e, "initialize rejected");
        })?;
        info!(
            rows = setup.grid_size.rows,
            cols = setup.grid_size.cols,
            seed = setup.seed,
            "simulation initialized",
        );
        self.install(session);
        Ok(())
    }

    /// Replace the current run with the saved run `id`.
    ///
    /// The newest saved entry becomes the current grid and the reset
    /// baseline.  The restored run starts paused with no unsaved changes.
    /// On any failure the controller is left exactly as it was.
    pub fn restore<G>(&mut self, id: SimulationId, gateway: &G) -> SimResult<()>
    where
        G: PersistenceGateway + ?Sized,
    {
        let restored = gateway
            .load(id)
            .map_err(SimError::from)
            .and_then(|saved| Session::from_saved(id, saved));

        match restored {
            Ok(session) => {
                info!(
                    %id,
                    time_step = %session.time_step(),
                    entries = session.log.len(),
                    "simulation restored",
                );
                self.install(session);
                Ok(())
            }
            Err(source) => {
                warn!(%id, reason = %source, "restore failed");
                Err(SimError::Restore { id, source: Box::new(source) })
            }
        }
    }

    // ── Run state ─────────────────────────────────────────────────────────

    pub fn start(&mut self) -> SimResult<()> {
        let s = self.session_mut()?;
        if s.run != RunState::Running {
            s.run = RunState::Running;
            info!(time_step = %s.time_step(), "simulation started");
        }
        Ok(())
    }

    /// Stop advancing on timer ticks.  Never interrupts a step in progress:
    /// `advance` takes `&mut self`, so a pause can only land between steps.
    pub fn pause(&mut self) -> SimResult<()> {
        let s = self.session_mut()?;
        if s.run != RunState::Paused {
            s.run = RunState::Paused;
            info!(time_step = %s.time_step(), "simulation paused");
        }
        Ok(())
    }

    /// Flip between running and paused.  Returns `true` if now running.
    pub fn toggle_running(&mut self) -> SimResult<bool> {
        if self.is_running() {
            self.pause()?;
            Ok(false)
        } else {
            self.start()?;
            Ok(true)
        }
    }

    pub fn is_running(&self) -> bool {
        self.session().is_ok_and(|s| s.run == RunState::Running)
    }

    /// Timer callback.  Advances one step while running; otherwise (paused
    /// or idle) does nothing and returns `None`.
    pub fn on_timer(&mut self) -> SimResult<Option<TimeStep>> {
        if !self.is_running() {
            return Ok(None);
        }
        self.advance().map(Some)
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Compute the next grid and append it as entry `t + 1`.
    pub fn advance(&mut self) -> SimResult<TimeStep> {
        let s = self.session_mut()?;
        let last = s.log.last();
        let next = last.time_step.next();
        let params = last.params;
        let grid = apply_step(&last.grid, &params, s.step_size.hours());

        s.log.append(HistoryEntry::step(next, grid, params));
        s.series.record(&s.log.last().grid, next);
        s.touch();
        debug!(time_step = %next, mean_moisture = s.grid().mean_moisture(), "advanced");
        Ok(next)
    }

    /// Drop the newest entry; grid and params revert to the entry before it.
    ///
    /// At step 0 this is [`SimError::BackwardBoundary`] and nothing changes.
    pub fn step_backward(&mut self) -> SimResult<TimeStep> {
        let s = self.session_mut()?;
        if s.time_step().is_zero() {
            warn!("step backward rejected at the initial state");
            return Err(SimError::BackwardBoundary);
        }
        let removed = s.log.truncate_last()?;
        let now = s.time_step();
        s.series.truncate_after(now);
        s.touch();
        debug!(from = %removed.time_step, time_step = %now, "stepped backward");
        Ok(now)
    }

    /// Stop, return to the baseline grid, and restart the history at step 0
    /// with the current global params.
    pub fn reset(&mut self) -> SimResult<()> {
        let s = self.session_mut()?;
        let params = s.params();
        s.run = RunState::Paused;
        s.log = HistoryLog::new(s.baseline.clone(), params);
        s.series.restart(&s.baseline, TimeStep::ZERO);
        s.touch();
        info!("simulation reset");
        Ok(())
    }

    /// Advance `n` steps back to back, reporting each to `observer`.
    ///
    /// Ignores the running flag.  Returns the final time step.
    pub fn run_steps<O: SimulationObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<TimeStep> {
        {
            let s = self.session()?;
            observer.on_run_start(s.time_step(), s.grid());
        }
        for _ in 0..n {
            self.advance()?;
            observer.on_step(self.session()?.log.last());
        }
        let end = self.session()?.time_step();
        observer.on_run_end(end);
        Ok(end)
    }

    // ── Edits ─────────────────────────────────────────────────────────────

    /// Apply `action` to the current grid and log it.
    ///
    /// Returns the time step the action was recorded at.  A rejected action
    /// (bad cell index, out-of-domain value) changes nothing.
    pub fn apply_user_action(&mut self, action: UserAction) -> SimResult<TimeStep> {
        let s = self.session_mut()?;
        let mut grid = s.grid().clone();
        let action = apply_to_grid(&mut grid, action).inspect_err(|e| {
            warn!(action = %action.kind(), error = %e, "user action rejected");
        })?;
        let params = s.params();
        let at = s.record_edit(grid, params, ParameterChanges::new(), vec![action])?;
        debug!(
            time_step = %at,
            action = %action.kind(),
            cell = ?action.cell_index(),
            "user action applied",
        );
        Ok(at)
    }

    pub fn toggle_tap(&mut self, row: u32, col: u32) -> SimResult<TimeStep> {
        let cell_index = self.cell_index(row, col)?;
        self.apply_user_action(UserAction::ToggleTap { cell_index })
    }

    pub fn reset_tap_control(&mut self, row: u32, col: u32) -> SimResult<TimeStep> {
        let cell_index = self.cell_index(row, col)?;
        self.apply_user_action(UserAction::ResetTapControl { cell_index })
    }

    /// Overwrite a cell's moisture.  Out-of-range values are clamped to
    /// `[0, 1]` and the clamped value is what gets logged.
    pub fn set_moisture(&mut self, row: u32, col: u32, value: f64) -> SimResult<TimeStep> {
        let cell_index = self.cell_index(row, col)?;
        self.apply_user_action(UserAction::SetMoisture { cell_index, value })
    }

    pub fn set_cell_parameter(
        &mut self,
        row:   u32,
        col:   u32,
        param: ParamName,
        value: f64,
    ) -> SimResult<TimeStep> {
        let cell_index = self.cell_index(row, col)?;
        self.apply_user_action(UserAction::SetCellParameter { cell_index, param, value })
    }

    pub fn reset_cell_parameter(&mut self, row: u32, col: u32, param: ParamName) -> SimResult<TimeStep> {
        let cell_index = self.cell_index(row, col)?;
        self.apply_user_action(UserAction::ResetCellParameter { cell_index, param })
    }

    pub fn reset_all_cell_parameters(&mut self) -> SimResult<TimeStep> {
        self.apply_user_action(UserAction::ResetAllCellParameters)
    }

    /// Change a global parameter and log the change.
    ///
    /// Out-of-domain values are rejected with
    /// [`CoreError::InvalidParameter`](soil_core::CoreError::InvalidParameter).
    pub fn set_global_param(&mut self, name: ParamName, value: f64) -> SimResult<TimeStep> {
        let s = self.session_mut()?;
        let mut params = s.params();
        params.set(name, value).inspect_err(|_| {
            warn!(param = %name, value, "parameter change rejected");
        })?;
        let grid = s.grid().clone();
        let changes = ParameterChanges::from([(name, value)]);
        let at = s.record_edit(grid, params, changes, Vec::new())?;
        debug!(time_step = %at, param = %name, value, "global parameter changed");
        Ok(at)
    }

    /// Hours per step for subsequent advances.  Not a history event.
    pub fn set_time_step_size(&mut self, hours: f64) -> SimResult<()> {
        let step_size = StepSize::from_hours(hours)?;
        let s = self.session_mut()?;
        s.step_size = step_size;
        s.touch();
        debug!(hours, "time-step size changed");
        Ok(())
    }

    pub fn set_display_settings(&mut self, display: DisplaySettings) -> SimResult<()> {
        let s = self.session_mut()?;
        if s.display != display {
            s.display = display;
            s.touch();
        }
        Ok(())
    }

    /// Track `(row, col)` in the moisture series, or stop tracking with
    /// `None`.  Choosing a different cell starts a new series.
    pub fn select_cell(&mut self, cell: Option<(u32, u32)>) -> SimResult<()> {
        let s = self.session_mut()?;
        let cell = match cell {
            Some((row, col)) => Some(s.grid().index_of(row, col)?),
            None             => None,
        };
        let now = s.time_step();
        s.series.select(cell, &s.log.last().grid, now);
        Ok(())
    }

    fn cell_index(&self, row: u32, col: u32) -> SimResult<CellIndex> {
        Ok(self.session()?.grid().index_of(row, col)?)
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn grid(&self) -> SimResult<&Grid> {
        Ok(self.session()?.grid())
    }

    pub fn time_step(&self) -> SimResult<TimeStep> {
        Ok(self.session()?.time_step())
    }

    pub fn params(&self) -> SimResult<SimulationParams> {
        Ok(self.session()?.params())
    }

    pub fn step_size(&self) -> SimResult<StepSize> {
        Ok(self.session()?.step_size)
    }

    pub fn history(&self) -> SimResult<&HistoryLog> {
        Ok(&self.session()?.log)
    }

    pub fn display_settings(&self) -> SimResult<DisplaySettings> {
        Ok(self.session()?.display)
    }

    pub fn moisture_series(&self) -> SimResult<&[MoistureSample]> {
        Ok(self.session()?.series.samples())
    }

    pub fn selected_cell(&self) -> Option<(u32, u32)> {
        let s = self.session().ok()?;
        s.series.cell().map(|i| i.coords(s.grid().cols()))
    }

    pub fn simulation_id(&self) -> Option<SimulationId> {
        self.session().ok().and_then(|s| s.simulation_id)
    }

    /// `true` if anything changed since the last successful save (or since
    /// initialize, which starts unsaved).  `false` while idle.
    pub fn has_unsaved_changes(&self) -> bool {
        self.session().is_ok_and(Session::has_unsaved_changes)
    }

    pub fn view(&self) -> SimResult<SimulationView<'_>> {
        let s = self.session()?;
        let grid = s.grid();
        Ok(SimulationView {
            grid,
            time_step:           s.time_step(),
            params:              s.params(),
            running:             s.run == RunState::Running,
            step_size:           s.step_size,
            selected_cell:       s.series.cell().map(|i| i.coords(grid.cols())),
            series:              s.series.samples(),
            display:             s.display,
            has_unsaved_changes: s.has_unsaved_changes(),
            simulation_id:       s.simulation_id,
        })
    }

    // ── Persistence ───────────────────────────────────────────────────────

    /// Snapshot the run for saving.  `None` names it `Simulation_<millis>`.
    pub fn begin_save(&self, name: Option<String>) -> SimResult<SaveTicket> {
        let s = self.session()?;
        let name = name.unwrap_or_else(default_save_name);
        Ok(SaveTicket {
            snapshot: s.snapshot(name),
            epoch:    self.epoch,
            revision: s.revision,
        })
    }

    /// Apply the outcome of a save started with [`begin_save`](Self::begin_save).
    ///
    /// On success the id is recorded; the unsaved flag clears only if
    /// nothing changed since the ticket was issued.  On failure nothing
    /// changes and the error is returned as [`SimError::Persistence`].
    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        result: PersistenceResult<SimulationId>,
    ) -> SimResult<SimulationId> {
        let id = result.inspect_err(|e| {
            warn!(name = %ticket.snapshot.name, error = %e, "save failed");
        })?;

        let epoch = self.epoch;
        match &mut self.state {
            ControllerState::Ready(s) if ticket.epoch == epoch => {
                s.simulation_id = Some(id);
                if s.revision == ticket.revision {
                    s.saved_revision = Some(ticket.revision);
                }
                info!(
                    %id,
                    name = %ticket.snapshot.name,
                    time_step = %ticket.snapshot.time_step,
                    "simulation saved",
                );
            }
            _ => debug!(%id, "save completed for a session that is no longer current"),
        }
        Ok(id)
    }

    /// Save synchronously through `gateway`.
    pub fn save<G>(&mut self, gateway: &mut G) -> SimResult<SimulationId>
    where
        G: PersistenceGateway + ?Sized,
    {
        let ticket = self.begin_save(None)?;
        let result = gateway.save(ticket.snapshot());
        self.complete_save(ticket, result)
    }

    /// Export the run in `format`, saving it first if it has unsaved changes
    /// or was never saved.
    pub fn export<G>(&mut self, gateway: &mut G, format: ExportFormat) -> SimResult<Vec<u8>>
    where
        G: PersistenceGateway + ?Sized,
    {
        let saved_id = {
            let s = self.session()?;
            s.simulation_id.filter(|_| !s.has_unsaved_changes())
        };
        let id = match saved_id {
            Some(id) => id,
            None     => self.save(gateway)?,
        };
        let bytes = gateway.export(id, format).inspect_err(|e| {
            warn!(%id, %format, error = %e, "export failed");
        })?;
        debug!(%id, %format, bytes = bytes.len(), "simulation exported");
        Ok(bytes)
    }
}

/// Mutate `grid` according to `action`.  Returns the action as it should be
/// logged (moisture writes carry the clamped value).
fn apply_to_grid(grid: &mut Grid, action: UserAction) -> SimResult<UserAction> {
    match action {
        UserAction::ToggleTap { cell_index } => {
            grid.cell_mut(cell_index)?.toggle_tap();
        }
        UserAction::ResetTapControl { cell_index } => {
            grid.cell_mut(cell_index)?.reset_tap_control();
        }
        UserAction::SetMoisture { cell_index, value } => {
            let cell = grid.cell_mut(cell_index)?;
            cell.set_moisture(value)?;
            return Ok(UserAction::SetMoisture { cell_index, value: cell.moisture() });
        }
        UserAction::SetCellParameter { cell_index, param, value } => {
            grid.cell_mut(cell_index)?.set_parameter(param, value)?;
        }
        UserAction::ResetCellParameter { cell_index, param } => {
            grid.cell_mut(cell_index)?.reset_parameter(param);
        }
        UserAction::ResetAllCellParameters => {
            grid.clear_all_overrides();
        }
    }
    Ok(action)
}

fn default_save_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    format!("Simulation_{millis}")
}
