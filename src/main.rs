use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use openrouter_client::cli::{run, Args};

#[tokio::main]
async fn main() {
    let _ = dotenv::dotenv();
    let args = Args::parse();

    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(args).await {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}
