use price_sim::models::{PriceSimulator, SimulationConfig};
use price_sim::rng::{RandNormal, RecordingSource};
use proptest::prelude::*;

fn valid_config() -> impl Strategy<Value = SimulationConfig> {
    (
        0.01f64..10_000.0,
        1usize..400,
        0.0f64..0.1,
        -0.01f64..0.01,
        proptest::option::of((0.0f64..1.0, -0.9f64..2.0)),
    )
        .prop_map(|(start, days, vol, drift, event)| {
            let event_day = event.map(|(frac, _)| ((days as f64 * frac) as usize).min(days - 1));
            let event_impact = event.map(|(_, impact)| impact);
            SimulationConfig::new(start, days, vol, drift, event_day, event_impact)
                .expect("generated configuration is valid")
        })
}

proptest! {
    #[test]
    fn path_has_days_plus_one_prices(config in valid_config(), seed in any::<u64>()) {
        let path = PriceSimulator::with_seed(config.clone(), seed).generate();
        prop_assert_eq!(path.len(), config.days() + 1);
        prop_assert_eq!(path[0], config.start_price());
        prop_assert_eq!(path.event_day(), config.event_day());
    }

    #[test]
    fn same_seed_same_path(config in valid_config(), seed in any::<u64>()) {
        let a = PriceSimulator::with_seed(config.clone(), seed).generate();
        let b = PriceSimulator::with_seed(config, seed).generate();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn shock_ratio_is_one_plus_impact(config in valid_config(), seed in any::<u64>()) {
        let mut sim = PriceSimulator::with_source(
            config.clone(),
            RecordingSource::new(RandNormal::seeded(seed)),
        );
        let path = sim.generate();
        let (_, draws) = sim.into_source().into_parts();
        prop_assert_eq!(draws.len(), config.days());

        if let Some(ev) = config.event() {
            let step = path[ev.day] * (1.0 + config.drift() + config.volatility() * draws[ev.day]);
            // Skip steps that land on (or next to) zero, where the ratio is ill-conditioned
            prop_assume!(step.abs() > 1e-6 * path[ev.day].abs() && path[ev.day] != 0.0);
            let ratio = path[ev.day + 1] / step;
            let factor = 1.0 + ev.impact;
            prop_assert!((ratio - factor).abs() <= 1e-9 * factor.abs().max(1.0));
        }
    }
}
