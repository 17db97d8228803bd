use apiflows::{
    cli::{Cli, Commands},
    commands, telemetry,
};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_telemetry()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::List { file } => {
            commands::execute_list(&file)?;
        }
        Commands::Validate { file, format } => {
            commands::execute_validate(&file, format)?;
        }
    }

    Ok(())
}
