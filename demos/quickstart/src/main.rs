//! quickstart — headless run of the soil moisture grid simulation.
//!
//! Drives a controller from a timer loop the way a front-end would, edits a
//! few cells along the way, steps back, saves to SQLite, exports CSV and
//! JSON, and finally restores the saved run into a fresh controller.
//!
//! ```text
//! RUST_LOG=debug cargo run -p quickstart -- [setup.json]
//! ```

mod setup;

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use soil_core::ParamName;
use soil_grid::Grid;
use soil_history::HistoryEntry;
use soil_output::SqliteStore;
use soil_sim::{ControllerConfig, ExportFormat, SimulationController, SimulationObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const TIMER_TICKS:    u32 = 12;
const TICK_PERIOD_MS: u64 = 20;
const EXTRA_STEPS:    u64 = 24;
const OUTPUT_DIR:     &str = "output/quickstart";

// ── Observer ──────────────────────────────────────────────────────────────────

/// Prints mean moisture and irrigating cells every few steps.
struct MeanPrinter {
    every: u64,
}

impl SimulationObserver for MeanPrinter {
    fn on_run_start(&mut self, start: soil_core::TimeStep, grid: &Grid) {
        println!("  run from {start}: mean {:.3}", grid.mean_moisture());
    }

    fn on_step(&mut self, entry: &HistoryEntry) {
        if entry.time_step.0 % self.every == 0 {
            println!(
                "  {:<5} mean {:.3}  irrigating {:>2}",
                entry.time_step.to_string(),
                entry.grid.mean_moisture(),
                entry.grid.irrigating_count(),
            );
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Setup.
    let setup = match std::env::args_os().nth(1) {
        Some(path) => setup::load_setup(Path::new(&path))?,
        None       => setup::default_setup(),
    };
    println!("=== quickstart — soil moisture grid ===");
    println!(
        "Grid: {}x{}  |  Seed: {}  |  Step: {} h",
        setup.grid_size.rows, setup.grid_size.cols, setup.seed, setup.step_size,
    );
    println!();

    // 2. Initialize and make a few edits before the run starts.
    let config = ControllerConfig { tick_period_ms: TICK_PERIOD_MS };
    let mut sim = SimulationController::new(config);
    sim.initialize(&setup)?;
    sim.select_cell(Some((0, 0)))?;
    sim.toggle_tap(0, 0)?;
    sim.set_cell_parameter(1, 1, ParamName::IrrigationRate, 0.3)?;
    sim.set_global_param(ParamName::EvapotranspirationRate, 0.04)?;

    // 3. Timer loop.
    let t0 = Instant::now();
    sim.start()?;
    for tick in 0..TIMER_TICKS {
        thread::sleep(sim.config().tick_period());
        sim.on_timer()?;
        if tick == TIMER_TICKS / 2 {
            sim.set_global_param(ParamName::IrrigationRate, 0.1)?;
        }
    }
    sim.pause()?;
    info!(
        steps = sim.time_step()?.0,
        elapsed_s = t0.elapsed().as_secs_f64(),
        "timer loop finished",
    );

    // 4. Replay backwards two steps, then run on headless.
    sim.step_backward()?;
    sim.step_backward()?;
    sim.reset_tap_control(0, 0)?;
    sim.run_steps(EXTRA_STEPS, &mut MeanPrinter { every: 6 })?;
    println!();

    // 5. Save and export.
    let out = PathBuf::from(OUTPUT_DIR);
    std::fs::create_dir_all(&out)?;
    let mut store = SqliteStore::open(&out.join("simulations.db"))?;

    for format in [ExportFormat::Csv, ExportFormat::Json] {
        let bytes = sim.export(&mut store, format)?;
        let Some(id) = sim.simulation_id() else {
            anyhow::bail!("export finished without a saved id");
        };
        let path = out.join(format.file_name(id));
        std::fs::write(&path, &bytes)?;
        info!(
            path = %path.display(),
            bytes = bytes.len(),
            content_type = format.content_type(),
            "export written",
        );
    }

    // 6. Restore into a fresh controller.
    let Some(id) = sim.simulation_id() else {
        anyhow::bail!("run was exported but has no saved id");
    };
    let mut restored = SimulationController::default();
    restored.restore(id, &store)?;
    let view = restored.view()?;
    info!(
        %id,
        entries = restored.history()?.len(),
        time_step = %view.time_step,
        mean_moisture = view.grid.mean_moisture(),
        series = view.series.len(),
        "run restored",
    );

    Ok(())
}
