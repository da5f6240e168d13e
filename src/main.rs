use clap::Parser;
use gxfgenie::{run, Args, Config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    args.check()?;

    let config = Config::from_args(&args);
    simple_logger::init_with_level(config.log_level)?;
    log::debug!("{:?}", args);

    let stats = run(&config)?;
    log::info!(
        "Parsed {} records and {} metadata lines",
        stats.records,
        stats.metadata
    );
    log::info!("Distinct attributes: {}", stats.interned);
    log::info!("Elapsed: {:.4?} secs", stats.elapsed.as_secs_f32());
    log::info!("Memory: {:.2} MB", stats.max_rss_mb);

    Ok(())
}
