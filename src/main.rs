use anyhow::Context;
use clap::Parser;
use learning_tracker::adapters::save_validated;
use learning_tracker::config::cli::{Command, TicketCommand};
use learning_tracker::core::TicketStore;
use learning_tracker::utils::{logger, validation::Validate};
use learning_tracker::{CliConfig, DefaultGenerationService, JsonFileTicketStore, Settings};
use std::path::Path;

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 可選
    let _ = dotenvy::dotenv();

    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting learning-tracker");

    let mut settings = Settings::load(cli.config.as_deref().map(Path::new))
        .context("failed to load configuration")?;
    cli.apply_overrides(&mut settings);

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
    if cli.verbose {
        tracing::debug!("Settings: {}", serde_json::to_string(&settings)?);
    }

    let store = JsonFileTicketStore::new(settings.ticket_store_path.clone());

    match &cli.command {
        Command::Generate { topic, save } => {
            let service = DefaultGenerationService::from_config(&settings)?;

            match service.generate(topic).await {
                Ok(validated) => {
                    print_json(&validated)?;
                    if *save {
                        match save_validated(&store, cli.user, topic, &validated).await? {
                            Some(id) => {
                                tracing::info!("📁 Saved ticket {}", id);
                                eprintln!("Saved ticket {}", id);
                            }
                            None => eprintln!("No verified resources found; ticket not saved"),
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("❌ Generation failed: {} (HTTP {})", e, e.status_code());
                    print_json(&e.response_body())?;
                    let exit_code = if e.status_code() < 500 { 1 } else { 2 };
                    std::process::exit(exit_code);
                }
            }
        }
        Command::Tickets { action } => match action {
            TicketCommand::List => print_json(&store.list_tickets(cli.user).await?)?,
            TicketCommand::Show { id } => print_json(&store.get_ticket(cli.user, *id).await?)?,
            TicketCommand::Toggle { id } => {
                print_json(&store.toggle_completed(cli.user, *id).await?)?
            }
        },
    }

    Ok(())
}
