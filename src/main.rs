//! Replay binary
//!
//! Streams a CSV bar file through one signal engine instance and
//! reports the emitted directives.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use possibility_engine::{
    data, indicators, DirectionalPair, Engine, EngineConfig, FinalDecision, IndicatorSnapshot,
    OscillatorPair, TrendSample,
};

#[derive(Parser, Debug)]
#[command(name = "possibility-engine")]
#[command(about = "Replay a CSV bar file through the signal engine", long_about = None)]
#[command(version)]
struct Args {
    /// Path to engine configuration file (JSON); defaults when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Path to CSV bar data (datetime,open,high,low,close[,volume])
    #[arg(short, long)]
    data: String,

    /// Smoothing period for the trend filter input
    #[arg(long, default_value = "20")]
    trend_period: usize,

    /// Oscillator period for the crossover and level filter inputs
    #[arg(long, default_value = "14")]
    oscillator_period: usize,

    /// Print every emitted directive
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if args.verbose { "debug" } else { "info" })
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if args.trend_period == 0 || args.oscillator_period == 0 {
        anyhow::bail!("indicator periods must be positive");
    }

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    tracing::info!("Loading bars from {}", args.data);
    let records = data::load_csv(&args.data)?;
    tracing::info!("Loaded {} bars", records.len());

    // Pre-compute indicator series for whichever filters are enabled
    let high: Vec<f64> = records.iter().map(|r| r.bar.high).collect();
    let low: Vec<f64> = records.iter().map(|r| r.bar.low).collect();
    let close: Vec<f64> = records.iter().map(|r| r.bar.close).collect();

    let slow_line = indicators::ema(&close, args.trend_period);
    let (stoch_k, stoch_d) =
        indicators::stochastic(&high, &low, &close, args.oscillator_period, 3);
    let cci_line = indicators::cci(&high, &low, &close, args.oscillator_period);
    let (plus_di, minus_di) = indicators::dmi(&high, &low, args.oscillator_period);

    let mut engine = Engine::new(config)?;

    let mut no_decision = 0usize;
    let mut buys = 0usize;
    let mut sells = 0usize;
    let mut holds = 0usize;
    let mut flattens = 0usize;
    let mut last_quality = 0.0f64;

    for (i, record) in records.iter().enumerate() {
        let snapshot = IndicatorSnapshot {
            trend: match (slow_line[i], i.checked_sub(1).and_then(|p| slow_line[p])) {
                (Some(current), Some(previous)) => Some(TrendSample { current, previous }),
                _ => None,
            },
            oscillator: match (stoch_k[i], stoch_d[i]) {
                (Some(fast), Some(slow)) => Some(OscillatorPair { fast, slow }),
                _ => None,
            },
            level: cci_line[i],
            directional: match (plus_di[i], minus_di[i]) {
                (Some(plus), Some(minus)) => Some(DirectionalPair { plus, minus }),
                _ => None,
            },
        };

        match engine.on_bar(record.bar, &snapshot) {
            Some(verdict) => {
                last_quality = verdict.success_quality;
                match verdict.decision {
                    FinalDecision::Buy => buys += 1,
                    FinalDecision::Sell => sells += 1,
                    FinalDecision::Hold => holds += 1,
                    FinalDecision::Flatten => flattens += 1,
                }
                if args.verbose {
                    println!(
                        "{} | {:?} | period={} quality={:.3}",
                        record.datetime.format("%Y-%m-%d %H:%M"),
                        verdict.decision,
                        engine.current_period(),
                        verdict.success_quality
                    );
                }
            }
            None => no_decision += 1,
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("REPLAY SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Bars processed:     {}", records.len());
    println!("Warm-up (no call):  {}", no_decision);
    println!("Buy directives:     {}", buys);
    println!("Sell directives:    {}", sells);
    println!("Hold directives:    {}", holds);
    println!("Flatten directives: {}", flattens);
    println!("Final period:       {}", engine.current_period());
    println!("Final quality:      {:.3}", last_quality);
    println!("{}", "=".repeat(60));

    Ok(())
}
