// demos/error_handling_demo.rs
use price_sim::error::SimError;
use price_sim::mc::{run_ensemble, EnsembleConfig};
use price_sim::models::{EventMode, PriceSimulator, SimulationConfig};

fn main() {
    println!("Error Handling Demo for price-sim");
    println!("=================================\n");

    // Test 1: Zero days
    println!("1. Testing zero days...");
    match SimulationConfig::new(100.0, 0, 0.03, 0.0, None, None) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 2: Non-positive start price
    println!("\n2. Testing negative start price...");
    match SimulationConfig::new(-5.0, 30, 0.03, 0.0, None, None) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 3: Event day without an impact
    println!("\n3. Testing event day without impact...");
    match SimulationConfig::builder().event_day(Some(10)).build() {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 4: Event outside the horizon
    println!("\n4. Testing event day past the last day...");
    match SimulationConfig::new(100.0, 30, 0.03, 0.0, Some(30), Some(-0.2)) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 5: Extreme but valid parameters
    println!("\n5. Testing extreme but valid parameters...");
    let extreme = SimulationConfig::with_event_mode(
        100.0,
        30,
        0.03,
        0.0,
        Some(5),
        Some(-1.5),
        EventMode::Compound,
    );
    match extreme {
        Ok(config) => {
            let path = PriceSimulator::with_seed(config, 1).generate();
            println!(
                "   ✓ Simulated; degenerate path = {} (final price {:.2})",
                path.is_degenerate(),
                path.final_price()
            );
        }
        Err(e) => println!("   Error: {}", e),
    }

    // Test 6: Invalid ensemble
    println!("\n6. Testing invalid ensemble...");
    let config = SimulationConfig::builder().build().expect("Valid configuration");
    let bad_ensemble = EnsembleConfig {
        paths: 0,
        ..Default::default()
    };
    match run_ensemble(&config, &bad_ensemble) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 7: Error type matching
    println!("\n7. Testing error type matching...");
    match SimulationConfig::new(100.0, 30, -0.1, 0.0, None, None) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(SimError::InvalidConfiguration { field, reason }) => {
            println!("   ✓ Caught InvalidConfiguration: {} ({})", field, reason);
        }
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    println!("\n✓ Error handling demo complete!");
}
