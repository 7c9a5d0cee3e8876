use anyhow::Result;
use clap::Parser;

mod app;
mod cli;
mod config;
mod logging;
mod output;

use crate::app::AppContext;
use crate::cli::{Args, Command};
use crate::output::print_usage_instructions;

/// Main function - resolves configuration and dispatches to the chosen flow
#[tokio::main]
async fn main() -> Result<()> {
    // A .env file may supply ASHRAM_* variables read by the argument parser
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let (config, config_path) = config::resolve(&args)?;

    logging::init(args.verbose, config.log_level.as_deref());

    let Some(command) = args.command else {
        print_usage_instructions();
        return Ok(());
    };

    match command {
        Command::InitConfig => app::run_init_config(&config_path),
        Command::Ask { question } => {
            let ctx = AppContext::new(&config, args.output)?;
            app::run_ask(question, &ctx).await
        }
        Command::Compass(compass) => {
            let ctx = AppContext::new(&config, args.output)?;
            app::run_compass(compass, &ctx).await
        }
    }
}
