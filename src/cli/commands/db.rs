use clap::Subcommand;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create the drinks table if it does not exist")]
    Init,

    #[command(about = "Drop all drinks, recreate the table and seed the starter drink")]
    Reset,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let database = DatabaseManager::connect(&config::config().database)?;

    let result = match cmd {
        DbCommands::Init => {
            database.create_schema().await?;
            output_success(&output_format, "Drinks table ready", None)
        }
        DbCommands::Reset => {
            database.reset().await?;
            output_success(&output_format, "Drinks table reset and seeded", None)
        }
    };

    database.close().await;
    result
}
