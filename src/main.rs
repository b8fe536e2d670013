use anyhow::Result;
use clap::Parser;
use syncbench::{cli::Cli, cli::OutputFormat, runner};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; worker failures are always visible at `warn`
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = args.config();
    let options = args.run_options();

    let summary = runner::run(&config, &options)?;

    if matches!(options.format, OutputFormat::Json) {
        println!("{}", summary.to_json()?);
    }

    if let Some(err) = &summary.cleanup.error {
        anyhow::bail!("{}", err);
    }

    Ok(())
}
