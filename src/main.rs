//! gifclip
//!
//! Trim a local video and convert the selection to an animated GIF.
//!
//! # Usage
//!
//! ```bash
//! gifclip convert -i holiday.mp4 -s 00:01.5 -e 00:04
//! gifclip inspect -i holiday.mp4 --json
//! gifclip preview -i holiday.mp4 -s 2 -e 3.5
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use gifclip::app::DefaultAppContainer;
use gifclip::cli::{commands, Cli, Commands};
use gifclip::config_initialization::initialize_configuration_hierarchy;
use gifclip::utils::logging::{init_logging, log_system_info};

/// Main entry point for the gifclip CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli)?;
    init_logging(&config.logging());
    log_system_info();

    let container = DefaultAppContainer::new(&config)?;

    let result = match cli.command {
        Commands::Convert(args) => {
            info!("Executing convert command");
            commands::convert(&container, args).await
        }
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            commands::inspect(&container, args).await
        }
        Commands::Preview(args) => {
            info!("Executing preview command");
            commands::preview(&container, args).await
        }
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
