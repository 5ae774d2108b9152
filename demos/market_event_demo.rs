// demos/market_event_demo.rs
//! High volatility, a downward trend, and a crash on day 100.
//!
//! Writes `market_event_path.csv` (one path) and `market_event_bands.csv`
//! (ensemble mean and 5/50/95% bands) for plotting; the `event` column marks
//! the day to draw the event line at.

use price_sim::analytics::{expected_price, PathStatistics};
use price_sim::math_utils::Timer;
use price_sim::mc::{run_ensemble, EnsembleConfig};
use price_sim::models::{PriceSimulator, SimulationConfig};
use price_sim::output;
use std::fs::File;
use std::io::BufWriter;

fn main() {
    println!("Stock Market Simulation");
    println!("=======================\n");

    let config = SimulationConfig::new(100.0, 365, 0.03, -0.001, Some(100), Some(-0.2))
        .expect("Valid configuration");

    let mut timer = Timer::new();
    timer.start();
    let mut sim = PriceSimulator::with_seed(config.clone(), 42);
    let prices = sim.generate();
    println!("Single path ({:.3} ms)", timer.elapsed_ms());

    let stats = PathStatistics::from_path(&prices);
    let event_day = prices.event_day().expect("event configured");
    println!("  start price       : {:.2}", prices.start_price());
    println!(
        "  event on day {:<4} : {:.2} -> {:.2}",
        event_day,
        prices[event_day],
        prices[event_day + 1]
    );
    println!("  final price       : {:.2}", prices.final_price());
    println!("  expected final    : {:.2}", expected_price(&config, config.days()));
    println!("  range             : [{:.2}, {:.2}]", stats.min, stats.max);
    println!("  max drawdown      : {:.1}%", stats.max_drawdown * 100.0);
    if let Some(vol) = stats.realized_volatility {
        println!("  realized daily vol: {:.4}", vol);
    }

    output::write_path_to_file("market_event_path.csv", &prices).expect("Could not write path");
    println!("\nPath written to market_event_path.csv");

    timer.start();
    let ensemble = run_ensemble(
        &config,
        &EnsembleConfig {
            paths: 10_000,
            seed: 42,
            ..Default::default()
        },
    )
    .expect("Valid ensemble");
    let summary = ensemble.summarize();
    println!(
        "\nEnsemble of {} paths ({:.1} ms on {} threads)",
        ensemble.num_paths(),
        timer.elapsed_ms(),
        rayon::current_num_threads()
    );

    if let Some(t) = &summary.terminal {
        println!("  terminal mean     : {:.2} ± {:.2}", t.mean, t.std_dev);
        println!("  P(final < start)  : {:.1}%", t.prob_loss * 100.0);
    }

    let file =
        BufWriter::new(File::create("market_event_bands.csv").expect("Could not create file"));
    output::write_ensemble_summary_csv(file, &summary, ensemble.days(), ensemble.event_day())
        .expect("Could not write bands");
    println!("Bands written to market_event_bands.csv");
}
