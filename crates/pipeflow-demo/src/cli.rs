use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{DemoError, Result};
use crate::pipeline::Demo;
use crate::view::{JsonView, TextView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "pipeflow-demo",
    about = "Drive the costume-wardrobe pipeline on a timer and print each frame",
    version
)]
pub struct Cli {
    /// Number of ticks to run.
    #[arg(long, env = "PIPEFLOW_DEMO_TICKS", default_value_t = 10)]
    pub ticks: u32,

    /// Delay between ticks.
    #[arg(long = "interval-ms", env = "PIPEFLOW_DEMO_INTERVAL_MS", default_value_t = 250)]
    pub interval_ms: u64,

    /// Seed for the costume generator. Random when omitted.
    #[arg(long, env = "PIPEFLOW_DEMO_SEED")]
    pub seed: Option<u64>,

    #[arg(long, value_enum, env = "PIPEFLOW_DEMO_OUTPUT", default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Filter directive used when RUST_LOG is unset.
    #[arg(long = "log-level", env = "PIPEFLOW_DEMO_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[arg(
        long = "log-format",
        value_enum,
        env = "PIPEFLOW_DEMO_LOG_FORMAT",
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        if self.ticks == 0 {
            return Err(DemoError::invalid("--ticks must be at least 1"));
        }
        Ok(())
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    init_logging(&cli.log_level, cli.log_format)?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    tracing::info!(
        message = "demo.start",
        seed,
        ticks = cli.ticks,
        interval_ms = cli.interval_ms
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let interval = Duration::from_millis(cli.interval_ms);
    match cli.output {
        OutputFormat::Text => {
            let mut demo = Demo::<TextView>::new(seed);
            drive(cli.ticks, interval, || {
                let line = demo.step();
                writeln!(out, "{line}")?;
                Ok(())
            })?;
            let torn = demo.view().with_renderer(TextView::torn_frames);
            tracing::info!(message = "demo.finished", frames = demo.frames(), torn);
        }
        OutputFormat::Json => {
            let mut demo = Demo::<JsonView>::new(seed);
            drive(cli.ticks, interval, || {
                let line = demo.step()?;
                writeln!(out, "{line}")?;
                Ok(())
            })?;
            tracing::info!(message = "demo.finished", frames = demo.frames());
        }
    }
    out.flush()?;
    Ok(())
}

fn drive(ticks: u32, interval: Duration, mut step: impl FnMut() -> Result<()>) -> Result<()> {
    for tick in 1..=ticks {
        step()?;
        if tick < ticks && !interval.is_zero() {
            thread::sleep(interval);
        }
    }
    Ok(())
}

fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|err| DemoError::invalid(format!("--log-level {level:?}: {err}")))?,
    };
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init()?,
    }
    Ok(())
}
