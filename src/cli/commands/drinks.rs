use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{describe_drink, output_empty_collection};
use crate::cli::OutputFormat;
use crate::config;
use crate::database::models::Drink;
use crate::database::{DatabaseManager, DrinkRepository, PgDrinkRepository};

#[derive(Subcommand)]
pub enum DrinksCommands {
    #[command(about = "List drinks (public view unless --detail)")]
    List {
        #[arg(long, help = "Include ingredient quantities")]
        detail: bool,
    },
}

pub async fn handle(cmd: DrinksCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DrinksCommands::List { detail } => {
            let database = DatabaseManager::connect(&config::config().database)?;
            let drinks = PgDrinkRepository::new(database.pool()).list().await;
            database.close().await;
            print_drinks(&drinks?, detail, output_format)
        }
    }
}

fn print_drinks(drinks: &[Drink], detail: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    if drinks.is_empty() {
        return output_empty_collection(&output_format, "drinks", "No drinks on the menu");
    }

    match output_format {
        OutputFormat::Json => {
            let body = if detail {
                json!({ "drinks": drinks.iter().map(Drink::long).collect::<Vec<_>>() })
            } else {
                json!({ "drinks": drinks.iter().map(Drink::short).collect::<Vec<_>>() })
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            for drink in drinks {
                println!("{}", describe_drink(drink, detail));
            }
        }
    }
    Ok(())
}
