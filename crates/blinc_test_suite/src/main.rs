//! Blinc motion scenarios
//!
//! Runs the headless coordination scenarios and exits non-zero on failure.

use anyhow::Result;
use blinc_test_suite::{runner::TestRunner, tests, TestHarness};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "blinc-motion-scenarios")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless scenarios for Blinc motion coordination", long_about = None)]
struct Cli {
    /// Only run scenarios whose name contains this pattern
    #[arg(short, long)]
    filter: Option<String>,

    /// Print the scenario catalogue and exit
    #[arg(short, long)]
    list: bool,

    /// Log each failure reason as an error
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().with_target(false))
        .init();

    let suites = tests::all_suites();

    if cli.list {
        for suite in &suites {
            println!("{} ({})", suite.name, suite.cases.len());
            for case in &suite.cases {
                println!("  {}", case.name);
            }
        }
        return Ok(());
    }

    let mut runner = TestRunner::with_harness(TestHarness::new().verbose(cli.verbose));
    for suite in suites {
        runner.add_suite(suite);
    }
    if let Some(pattern) = &cli.filter {
        tracing::info!(pattern = %pattern, "filtering scenarios");
        runner.filter(pattern);
    }

    let result = runner.run();
    result.print_summary();

    if !result.all_passed() {
        anyhow::bail!("{} of {} scenarios failed", result.failed(), result.total());
    }
    Ok(())
}
