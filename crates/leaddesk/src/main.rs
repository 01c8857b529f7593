//! LeadDesk entry point.

use clap::Parser;

use leaddesk::cli::{Cli, Commands};
use leaddesk::{commands, logging, tui};

fn main() {
    // Load .env.local if it exists (for LEADDESK_BASE_URL etc.)
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();
    let config = cli.config();

    if cli.is_interactive() {
        if let Err(e) = logging::init_file(cli.log_level(), &config.log_file()) {
            eprintln!("Warning: file logging disabled: {}", e);
        }
    } else {
        logging::init_stderr(cli.log_level());
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        None | Some(Commands::Tui) => tui::run(&runtime, &config),
        Some(cmd) => runtime.block_on(commands::execute(cmd, &config, cli.yes)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
