use price_sim::analytics::{expected_price, PathStatistics};
use price_sim::math_utils::Timer;
use price_sim::mc::{run_ensemble, EnsembleConfig, SummaryFields};
use price_sim::models::{EventMode, PriceSimulator, SimulationConfig};
use price_sim::output::{write_ensemble_summary_csv, write_path_to_file, write_summary_to_csv};
use price_sim::rng::RandNormal;
use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;

const USAGE: &str = "\
usage: simulate [options]

  --start-price <f64>    initial price                    (default 100)
  --days <usize>         number of simulated days         (default 365)
  --volatility <f64>     daily std-dev of returns         (default 0.03)
  --drift <f64>          daily expected return            (default -0.001)
  --event-day <usize>    day of a one-time market event
  --event-impact <f64>   fractional shock on the event day
  --event-mode <mode>    compound | additive | replace    (default compound)
  --seed <u64>           seed for reproducible runs       (env PRICE_SIM_SEED)
  --paths <usize>        simulate an ensemble of N paths  (default 1)
  --out <file>           CSV output file                  (default timestamped)
";

#[derive(Debug, Default)]
struct Args {
    start_price: Option<f64>,
    days: Option<usize>,
    volatility: Option<f64>,
    drift: Option<f64>,
    event_day: Option<usize>,
    event_impact: Option<f64>,
    event_mode: Option<EventMode>,
    seed: Option<u64>,
    paths: usize,
    out: Option<String>,
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    let raw = value.ok_or_else(|| format!("missing value for {}", flag))?;
    raw.parse::<T>()
        .map_err(|e| format!("invalid value '{}' for {}: {}", raw, flag, e))
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        paths: 1,
        ..Default::default()
    };
    let mut iter = env::args().skip(1);

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--start-price" => args.start_price = Some(parse_value(&flag, iter.next())?),
            "--days" => args.days = Some(parse_value(&flag, iter.next())?),
            "--volatility" => args.volatility = Some(parse_value(&flag, iter.next())?),
            "--drift" => args.drift = Some(parse_value(&flag, iter.next())?),
            "--event-day" => args.event_day = Some(parse_value(&flag, iter.next())?),
            "--event-impact" => args.event_impact = Some(parse_value(&flag, iter.next())?),
            "--event-mode" => args.event_mode = Some(parse_value(&flag, iter.next())?),
            "--seed" => args.seed = Some(parse_value(&flag, iter.next())?),
            "--paths" => args.paths = parse_value(&flag, iter.next())?,
            "--out" => args.out = Some(parse_value(&flag, iter.next())?),
            "-h" | "--help" => return Err(String::new()),
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }

    if args.seed.is_none() {
        if let Ok(raw) = env::var("PRICE_SIM_SEED") {
            args.seed = Some(parse_value("PRICE_SIM_SEED", Some(raw))?);
        }
    }
    Ok(args)
}

fn build_config(args: &Args) -> price_sim::SimResult<SimulationConfig> {
    let mut builder = SimulationConfig::builder()
        .event_day(args.event_day)
        .event_impact(args.event_impact);
    if let Some(v) = args.start_price {
        builder = builder.start_price(v);
    }
    if let Some(v) = args.days {
        builder = builder.days(v);
    }
    if let Some(v) = args.volatility {
        builder = builder.volatility(v);
    }
    if let Some(v) = args.drift {
        builder = builder.drift(v);
    }
    if let Some(mode) = args.event_mode {
        builder = builder.event_mode(mode);
    }
    builder.build()
}

fn run_single(
    config: SimulationConfig,
    seed: Option<u64>,
    out: &str,
) -> price_sim::SimResult<()> {
    let timer = Timer::new();
    let source = match seed {
        Some(seed) => RandNormal::seeded(seed),
        None => RandNormal::try_from_entropy()?,
    };
    let path = PriceSimulator::with_source(config.clone(), source).generate();
    tracing::info!(days = config.days(), elapsed_ms = timer.elapsed_ms(), "simulated path");

    if path.is_degenerate() {
        tracing::warn!(
            "price path reached zero or below; statistics involving log returns are unavailable"
        );
    }

    let stats = PathStatistics::from_path(&path);
    tracing::info!(
        final_price = path.final_price(),
        expected_final = expected_price(&config, config.days()),
        min = stats.min,
        max = stats.max,
        total_return = stats.total_return,
        max_drawdown = stats.max_drawdown,
        "path summary"
    );
    if let Some(day) = path.event_day() {
        tracing::info!(
            event_day = day,
            before = path[day],
            after = path[day + 1],
            "market event"
        );
    }

    write_path_to_file(out, &path)?;
    tracing::info!(file = out, "wrote price path");
    Ok(())
}

fn run_many(
    config: SimulationConfig,
    paths: usize,
    seed: Option<u64>,
    out: &str,
) -> price_sim::SimResult<()> {
    let ens_cfg = EnsembleConfig {
        paths,
        seed: seed.unwrap_or_else(rand::random),
        summary: SummaryFields::all(),
        ..Default::default()
    };
    tracing::info!(
        paths,
        seed = ens_cfg.seed,
        threads = rayon::current_num_threads(),
        cpus = num_cpus::get(),
        "running ensemble"
    );

    let timer = Timer::new();
    let ensemble = run_ensemble(&config, &ens_cfg)?;
    let summary = ensemble.summarize();
    tracing::info!(elapsed_ms = timer.elapsed_ms(), "ensemble complete");

    if let Some(t) = &summary.terminal {
        tracing::info!(
            mean = t.mean,
            std_dev = t.std_dev,
            expected = expected_price(&config, config.days()),
            prob_loss = t.prob_loss,
            prob_ruin = t.prob_ruin,
            "terminal price distribution"
        );
        if t.prob_ruin > 0.0 {
            tracing::warn!(prob_ruin = t.prob_ruin, "some paths reached zero or below");
        }

        let summary_file = format!("{}_terminal.csv", out.trim_end_matches(".csv"));
        write_summary_to_csv(
            &summary_file,
            &[
                ("paths", paths.to_string()),
                ("seed", ens_cfg.seed.to_string()),
                ("mean", t.mean.to_string()),
                ("std_dev", t.std_dev.to_string()),
                ("min", t.min.to_string()),
                ("max", t.max.to_string()),
                ("prob_loss", t.prob_loss.to_string()),
                ("prob_ruin", t.prob_ruin.to_string()),
            ],
        )?;
    }

    let file = BufWriter::new(File::create(out)?);
    write_ensemble_summary_csv(file, &summary, ensemble.days(), ensemble.event_day())?;
    tracing::info!(file = out, "wrote ensemble summary");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("error: {}\n", msg);
            }
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("refusing to simulate: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(ev) = config.event() {
        if ev.impact <= -1.0 {
            tracing::warn!(
                impact = ev.impact,
                "event impact of -100% or worse drives the price to zero or below"
            );
        }
        tracing::info!(
            day = ev.day,
            impact = ev.impact,
            mode = ev.mode.name(),
            "market event configured"
        );
    }
    if args.seed.is_none() {
        tracing::warn!("no seed given; results are not reproducible");
    }

    let out = args.out.clone().unwrap_or_else(|| {
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        format!("price_sim_{}.csv", timestamp)
    });

    let result = if args.paths != 1 {
        run_many(config, args.paths, args.seed, &out)
    } else {
        run_single(config, args.seed, &out)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
