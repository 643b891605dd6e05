//! Unit and property tests for soil-grid.

use soil_core::{GridSize, MoistureDistribution, ParamName, SimulationParams, SimulationSetup};

use crate::{Grid, apply_step};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn uniform_setup(rows: u32, cols: u32, moisture: f64, params: SimulationParams) -> SimulationSetup {
    SimulationSetup {
        grid_size:        GridSize { rows, cols },
        initial_moisture: MoistureDistribution::Uniform(moisture),
        params,
        ..SimulationSetup::default()
    }
}

fn no_diffusion() -> SimulationParams {
    SimulationParams {
        diffusion_coefficient:   0.0,
        evapotranspiration_rate: 0.05,
        irrigation_rate:         0.1,
        moisture_threshold:      0.2,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod construction_tests {
    use super::*;

    #[test]
    fn uniform_grid_has_setup_shape() {
        let g = Grid::generate(&uniform_setup(3, 4, 0.5, SimulationParams::default())).unwrap();
        assert_eq!((g.rows(), g.cols(), g.len()), (3, 4, 12));
        assert!(g.cells().iter().all(|c| c.moisture() == 0.5));
        let c = g.get(2, 3).unwrap();
        assert_eq!((c.row(), c.col()), (2, 3));
    }

    #[test]
    fn initial_tap_follows_threshold() {
        let g = Grid::generate(&uniform_setup(2, 2, 0.1, SimulationParams::default())).unwrap();
        assert!(g.cells().iter().all(|c| c.tap_status() && !c.override_tap()));
        let g = Grid::generate(&uniform_setup(2, 2, 0.5, SimulationParams::default())).unwrap();
        assert_eq!(g.irrigating_count(), 0);
    }

    #[test]
    fn random_grid_is_seeded() {
        let setup = SimulationSetup {
            initial_moisture: MoistureDistribution::Random,
            seed:             7,
            ..SimulationSetup::default()
        };
        let a = Grid::generate(&setup).unwrap();
        let b = Grid::generate(&setup).unwrap();
        assert_eq!(a, b);
        assert!(a.cells().iter().all(|c| (0.0..1.0).contains(&c.moisture())));

        let other = Grid::generate(&SimulationSetup { seed: 8, ..setup }).unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn invalid_setup_rejected() {
        assert!(Grid::generate(&uniform_setup(0, 3, 0.5, SimulationParams::default())).is_err());
    }

    #[test]
    fn neighbours_respect_edges() {
        let g = Grid::generate(&uniform_setup(3, 3, 0.5, SimulationParams::default())).unwrap();
        assert_eq!(g.neighbours(0).as_slice(), &[3, 1]);
        assert_eq!(g.neighbours(4).as_slice(), &[1, 7, 3, 5]);
        assert_eq!(g.neighbours(8).as_slice(), &[5, 7]);

        let single = Grid::generate(&uniform_setup(1, 1, 0.5, SimulationParams::default())).unwrap();
        assert!(single.neighbours(0).is_empty());
    }

    #[test]
    fn index_bounds_checked() {
        let g = Grid::generate(&uniform_setup(2, 3, 0.5, SimulationParams::default())).unwrap();
        assert_eq!(g.index_of(1, 2).unwrap().0, 5);
        assert!(g.index_of(2, 0).is_err());
        assert!(g.index_of(0, 3).is_err());
    }

    #[test]
    fn from_rows_rejects_bad_input() {
        use crate::{Cell, GridError};

        assert_eq!(Grid::from_rows(vec![]), Err(GridError::Empty));

        let ragged = vec![
            vec![Cell::new(0, 0, 0.5, 0.2), Cell::new(0, 1, 0.5, 0.2)],
            vec![Cell::new(1, 0, 0.5, 0.2)],
        ];
        assert!(matches!(Grid::from_rows(ragged), Err(GridError::Ragged { row: 1, .. })));

        let swapped = vec![vec![Cell::new(0, 1, 0.5, 0.2), Cell::new(0, 0, 0.5, 0.2)]];
        assert!(matches!(Grid::from_rows(swapped), Err(GridError::Coordinates { .. })));
    }
}

// ── Copy-on-write ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod storage_tests {
    use super::*;

    #[test]
    fn clone_shares_until_mutated() {
        let a = Grid::generate(&uniform_setup(2, 2, 0.5, SimulationParams::default())).unwrap();
        let mut b = a.clone();
        assert!(a.shares_storage_with(&b));

        let idx = b.index_of(0, 1).unwrap();
        b.cell_mut(idx).unwrap().set_moisture(0.9).unwrap();

        assert!(!a.shares_storage_with(&b));
        assert_eq!(a.get(0, 1).unwrap().moisture(), 0.5);
        assert_eq!(b.get(0, 1).unwrap().moisture(), 0.9);
    }

    #[test]
    fn clear_all_overrides() {
        let mut g = Grid::generate(&uniform_setup(2, 2, 0.5, SimulationParams::default())).unwrap();
        for i in 0..4 {
            let idx = soil_core::CellIndex(i);
            g.cell_mut(idx).unwrap().set_parameter(ParamName::IrrigationRate, 0.3).unwrap();
        }
        g.clear_all_overrides();
        assert!(g.cells().iter().all(|c| c.overrides().is_empty()));
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cell_tests {
    use crate::{Cell, GridError, VOLUMETRIC_SCALE};

    #[test]
    fn set_moisture_clamps() {
        let mut c = Cell::new(0, 0, 0.5, 0.2);
        c.set_moisture(1.7).unwrap();
        assert_eq!(c.moisture(), 1.0);
        c.set_moisture(-3.0).unwrap();
        assert_eq!(c.moisture(), 0.0);
        assert!(matches!(c.set_moisture(f64::NAN), Err(GridError::NonFiniteMoisture(_))));
        assert_eq!(c.moisture(), 0.0);
    }

    #[test]
    fn volumetric_is_derived() {
        let mut c = Cell::new(0, 0, 0.8, 0.2);
        assert_eq!(c.moisture_volumetric(), 0.8 * VOLUMETRIC_SCALE);
        c.set_moisture(0.3).unwrap();
        assert_eq!(c.moisture_volumetric(), 0.15);
    }

    #[test]
    fn toggle_pins_and_reset_releases() {
        let mut c = Cell::new(0, 0, 0.5, 0.2);
        assert!(!c.tap_status());
        c.toggle_tap();
        assert!(c.tap_status() && c.override_tap());
        c.reset_tap_control();
        assert!(c.tap_status() && !c.override_tap());
    }

    #[test]
    fn out_of_domain_override_leaves_cell_untouched() {
        use soil_core::{CoreError, GridSize, ParamName, SimulationSetup};

        use crate::Grid;

        let setup = SimulationSetup {
            grid_size: GridSize { rows: 2, cols: 2 },
            ..SimulationSetup::default()
        };
        let mut g = Grid::generate(&setup).unwrap();
        let idx = g.index_of(1, 0).unwrap();
        let err = g.cell_mut(idx).unwrap().set_parameter(ParamName::IrrigationRate, -1.0);
        assert!(matches!(err, Err(CoreError::InvalidParameter { .. })));

        let c = g.get(1, 0).unwrap();
        assert_eq!(c.overrides().irrigation_rate, None);
        assert_eq!((c.row(), c.col()), (1, 0));
        assert_eq!(Grid::from_rows(g.iter_rows().map(<[_]>::to_vec).collect()).unwrap(), g);
    }
}

// ── Step rule ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod step_tests {
    use super::*;

    #[test]
    fn evapotranspiration_without_diffusion() {
        let params = no_diffusion();
        let g = Grid::generate(&uniform_setup(2, 2, 0.5, params)).unwrap();
        let next = apply_step(&g, &params, 1.0);
        for c in next.cells() {
            assert!(!c.tap_status());
            assert!(approx(c.moisture(), 0.45), "got {}", c.moisture());
            assert!(approx(c.moisture_volumetric(), 0.225));
        }
    }

    #[test]
    fn dry_cells_irrigate() {
        let params = no_diffusion();
        let g = Grid::generate(&uniform_setup(1, 2, 0.1, params)).unwrap();
        let next = apply_step(&g, &params, 2.0);
        for c in next.cells() {
            assert!(c.tap_status());
            assert!(approx(c.moisture(), 0.3));
        }
    }

    #[test]
    fn input_grid_untouched() {
        let params = SimulationParams::default();
        let g = Grid::generate(&uniform_setup(3, 3, 0.5, params)).unwrap();
        let before = g.clone();
        let _ = apply_step(&g, &params, 1.0);
        assert_eq!(g, before);
    }

    #[test]
    fn diffusion_uses_pairwise_mean_coefficient() {
        // Two cells side by side, no sources or sinks.
        let params = SimulationParams {
            diffusion_coefficient:   0.2,
            evapotranspiration_rate: 0.0,
            irrigation_rate:         0.0,
            moisture_threshold:      0.0,
        };
        let mut g = Grid::generate(&uniform_setup(1, 2, 0.5, params)).unwrap();
        let left = g.index_of(0, 0).unwrap();
        g.cell_mut(left).unwrap().set_moisture(0.9).unwrap();
        g.cell_mut(left).unwrap().set_parameter(ParamName::DiffusionCoefficient, 0.4).unwrap();

        let next = apply_step(&g, &params, 1.0);
        // mean(0.4, 0.2) = 0.3; flux = 0.3 * 0.4 = 0.12
        assert!(approx(next.get(0, 0).unwrap().moisture(), 0.78));
        assert!(approx(next.get(0, 1).unwrap().moisture(), 0.62));
    }

    #[test]
    fn pinned_tap_is_not_recomputed() {
        let params = no_diffusion();
        let mut g = Grid::generate(&uniform_setup(1, 1, 0.5, params)).unwrap();
        let idx = g.index_of(0, 0).unwrap();
        g.cell_mut(idx).unwrap().toggle_tap();

        let next = apply_step(&g, &params, 1.0);
        let c = next.get(0, 0).unwrap();
        assert!(c.tap_status() && c.override_tap());
        assert!(approx(c.moisture(), 0.6));
    }

    #[test]
    fn overrides_resolved_against_current_globals() {
        let mut params = no_diffusion();
        let mut g = Grid::generate(&uniform_setup(1, 2, 0.5, params)).unwrap();
        let idx = g.index_of(0, 0).unwrap();
        g.cell_mut(idx).unwrap().set_parameter(ParamName::EvapotranspirationRate, 0.1).unwrap();

        params.evapotranspiration_rate = 0.2;
        let next = apply_step(&g, &params, 1.0);
        assert!(approx(next.get(0, 0).unwrap().moisture(), 0.4));
        assert!(approx(next.get(0, 1).unwrap().moisture(), 0.3));
    }

    #[test]
    fn clamps_at_bounds() {
        let params = SimulationParams {
            diffusion_coefficient:   0.0,
            evapotranspiration_rate: 0.5,
            irrigation_rate:         0.5,
            moisture_threshold:      0.5,
        };
        let dry = Grid::generate(&uniform_setup(1, 1, 0.6, params)).unwrap();
        assert_eq!(apply_step(&dry, &params, 24.0).cells()[0].moisture(), 0.0);
        let wet = Grid::generate(&uniform_setup(1, 1, 0.4, params)).unwrap();
        assert_eq!(apply_step(&wet, &params, 24.0).cells()[0].moisture(), 1.0);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::VOLUMETRIC_SCALE;

    fn params_strategy() -> impl Strategy<Value = SimulationParams> {
        (0.0..=1.0f64, 0.0..=0.5f64, 0.0..=0.5f64, 0.0..=1.0f64).prop_map(|(d, e, i, t)| {
            SimulationParams {
                diffusion_coefficient:   d,
                evapotranspiration_rate: e,
                irrigation_rate:         i,
                moisture_threshold:      t,
            }
        })
    }

    proptest! {
        #[test]
        fn moisture_stays_in_unit_interval(
            rows in 1u32..6,
            cols in 1u32..6,
            seed in any::<u64>(),
            params in params_strategy(),
            dt in 0.1f64..=24.0,
            steps in 1usize..20,
        ) {
            let setup = SimulationSetup {
                grid_size:        GridSize { rows, cols },
                initial_moisture: MoistureDistribution::Random,
                seed,
                params,
                ..SimulationSetup::default()
            };
            let mut g = Grid::generate(&setup).unwrap();
            for _ in 0..steps {
                g = apply_step(&g, &params, dt);
                for c in g.cells() {
                    prop_assert!((0.0..=1.0).contains(&c.moisture()));
                    prop_assert_eq!(c.moisture_volumetric(), c.moisture() * VOLUMETRIC_SCALE);
                }
            }
        }

        #[test]
        fn step_is_deterministic(
            seed in any::<u64>(),
            params in params_strategy(),
            dt in 0.1f64..=24.0,
        ) {
            let setup = SimulationSetup {
                grid_size:        GridSize { rows: 4, cols: 5 },
                initial_moisture: MoistureDistribution::Random,
                seed,
                params,
                ..SimulationSetup::default()
            };
            let g = Grid::generate(&setup).unwrap();
            let a = apply_step(&g, &params, dt);
            let b = apply_step(&g, &params, dt);
            prop_assert_eq!(a, b);
        }
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn grid_serializes_as_rows() {
        let mut g = Grid::generate(&uniform_setup(2, 3, 0.5, SimulationParams::default())).unwrap();
        let idx = g.index_of(1, 2).unwrap();
        g.cell_mut(idx).unwrap().set_parameter(ParamName::IrrigationRate, 0.3).unwrap();

        let json = serde_json::to_value(&g).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].as_array().unwrap().len(), 3);
        assert_eq!(rows[1][2]["irrigationRate"], 0.3);
        assert!(rows[0][0].get("irrigationRate").is_none());
        assert_eq!(rows[0][0]["tapStatus"], false);

        let back: Grid = serde_json::from_value(json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn cells_carry_volumetric_moisture() {
        let g = Grid::generate(&uniform_setup(1, 2, 0.4, SimulationParams::default())).unwrap();
        let json = serde_json::to_value(&g).unwrap();
        let cell = &json[0][1];
        assert_eq!(cell["moisture"], 0.4);
        assert_eq!(cell["moistureVolumetric"], 0.2);
        assert_eq!((cell["row"].as_u64(), cell["col"].as_u64()), (Some(0), Some(1)));
    }

    #[test]
    fn stale_volumetric_is_ignored_on_load() {
        let json = r#"[[{"row":0,"col":0,"moisture":0.4,"moistureVolumetric":0.9,
                         "tapStatus":false,"overrideTap":false,"irrigationRate":0.3}]]"#;
        let g: Grid = serde_json::from_str(json).unwrap();
        let c = g.get(0, 0).unwrap();
        assert_eq!(c.moisture_volumetric(), 0.2);
        assert_eq!(c.overrides().irrigation_rate, Some(0.3));
        assert_eq!(serde_json::to_value(&g).unwrap()[0][0]["moistureVolumetric"], 0.2);
    }

    #[test]
    fn out_of_range_moisture_rejected_on_load() {
        let json = r#"[[{"row":0,"col":0,"moisture":1.5,"tapStatus":false,"overrideTap":false}]]"#;
        assert!(serde_json::from_str::<Grid>(json).is_err());
    }
}
