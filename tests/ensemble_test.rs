use price_sim::analytics::{expected_path, expected_price};
use price_sim::mc::{run_ensemble, EnsembleConfig, StreamKind, SummaryFields};
use price_sim::models::{EventMode, SimulationConfig};

fn crash_config(mode: EventMode) -> SimulationConfig {
    SimulationConfig::with_event_mode(100.0, 50, 0.02, 0.001, Some(20), Some(-0.2), mode)
        .expect("Valid configuration")
}

#[test]
fn test_terminal_mean_matches_expectation() {
    for mode in [EventMode::Compound, EventMode::Additive, EventMode::Replace] {
        let config = crash_config(mode);
        let ens_cfg = EnsembleConfig {
            paths: 20_000,
            seed: 42,
            summary: SummaryFields::TERMINAL,
            ..Default::default()
        };
        let ensemble = run_ensemble(&config, &ens_cfg).expect("Valid ensemble");
        let terminal = ensemble.summarize().terminal.unwrap();

        let expected = expected_price(&config, 50);
        let std_err = terminal.std_dev / (ens_cfg.paths as f64).sqrt();

        println!(
            "\n{:?}: MC mean {:.4} ± {:.4}, expected {:.4}",
            mode, terminal.mean, std_err, expected
        );
        assert!(
            (terminal.mean - expected).abs() < 4.0 * std_err,
            "{:?}: MC mean {} too far from expected {}",
            mode,
            terminal.mean,
            expected
        );
    }
}

#[test]
fn test_mean_path_tracks_expected_path() {
    let config = crash_config(EventMode::Compound);
    let ens_cfg = EnsembleConfig {
        paths: 20_000,
        seed: 7,
        streams: StreamKind::Counter,
        summary: SummaryFields::MEAN | SummaryFields::STD_DEV,
        ..Default::default()
    };
    let summary = run_ensemble(&config, &ens_cfg).unwrap().summarize();
    let mean = summary.mean.unwrap();
    let std_dev = summary.std_dev.unwrap();
    let expected = expected_path(&config);

    for day in 0..=50 {
        let std_err = std_dev[day] / (ens_cfg.paths as f64).sqrt();
        assert!(
            (mean[day] - expected[day]).abs() <= 5.0 * std_err + 1e-9,
            "day {}: mean {} vs expected {}",
            day,
            mean[day],
            expected[day]
        );
    }
}

#[test]
fn test_independent_of_thread_count() {
    let config = crash_config(EventMode::Compound);
    let ens_cfg = EnsembleConfig {
        paths: 256,
        seed: 1234,
        ..Default::default()
    };

    let single_thread = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .expect("thread pool");
    let serial = single_thread
        .install(|| run_ensemble(&config, &ens_cfg))
        .unwrap();
    let parallel = run_ensemble(&config, &ens_cfg).unwrap();

    assert_eq!(serial.prices(), parallel.prices());
}

#[test]
fn test_every_path_starts_at_start_price() {
    let config = crash_config(EventMode::Compound);
    let ensemble = run_ensemble(
        &config,
        &EnsembleConfig {
            paths: 100,
            ..Default::default()
        },
    )
    .unwrap();

    let day0 = ensemble.day_prices(0).unwrap();
    assert!(day0.iter().all(|&p| p == 100.0));
    assert!(ensemble.day_prices(51).is_none());
    assert_eq!(ensemble.terminal_prices().len(), 100);
}
