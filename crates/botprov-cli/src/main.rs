mod args;

use anyhow::{Context, Result};
use args::{Cli, Commands};
use botprov_core::ecosystem::EcosystemConfig;
use botprov_provision::{system, Workflow};
use clap::Parser;
use console::style;

#[tokio::main]
async fn main() -> Result<()> {
    // Settings may live in a .env next to the installer; a missing file is fine.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let cfg = cli.setup.to_config();

    match cli.command.unwrap_or(Commands::Setup) {
        Commands::Setup => {
            let host = system::system_host().context("Failed to initialise host adapters")?;
            if let Err(e) = Workflow::new(&cfg, &host).run().await {
                eprintln!("\n{}", style(format!("Setup failed: {e}")).red());
                eprintln!("No rollback was attempted; rerun botprov once the cause is fixed.");
                std::process::exit(1);
            }
        }
        Commands::Clean => {
            let host = system::system_host().context("Failed to initialise host adapters")?;
            Workflow::new(&cfg, &host).run_clean().await?;
            println!("\nCleanup complete.");
        }
        Commands::RenderConfig => {
            cfg.validate()?;
            print!("{}", EcosystemConfig::for_setup(&cfg).render()?);
        }
    }

    Ok(())
}
