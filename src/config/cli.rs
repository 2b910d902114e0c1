use crate::config::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "learning-tracker")]
#[command(about = "Generate verified learning resources for a topic and track them as tickets")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    /// Directory holding tickets.json
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Owner of saved tickets
    #[arg(long, global = true, default_value = "1")]
    pub user: u64,

    #[arg(long, global = true)]
    pub concurrent_checks: Option<usize>,

    /// Per-URL check timeout in seconds
    #[arg(long, global = true)]
    pub check_timeout: Option<u64>,

    #[arg(long, global = true)]
    pub model: Option<String>,

    #[arg(long, global = true)]
    pub language: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Ask the generator for resources and keep the reachable ones
    Generate {
        topic: String,

        /// Save the verified resources as a new ticket
        #[arg(long)]
        save: bool,
    },
    Tickets {
        #[command(subcommand)]
        action: TicketCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum TicketCommand {
    List,
    Show { id: u64 },
    /// Flip the completed flag
    Toggle { id: u64 },
}

impl CliConfig {
    /// 命令列參數優先於檔案與環境變數
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(data_dir) = &self.data_dir {
            settings.ticket_store_path = data_dir.clone();
        }
        if let Some(concurrent) = self.concurrent_checks {
            settings.concurrent_checks = concurrent;
        }
        if let Some(timeout) = self.check_timeout {
            settings.check_timeout_seconds = timeout;
        }
        if let Some(model) = &self.model {
            settings.generator_model = model.clone();
        }
        if let Some(language) = &self.language {
            settings.target_language = language.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_with_overrides() {
        let cli = CliConfig::parse_from([
            "learning-tracker",
            "generate",
            "Rust",
            "--save",
            "--concurrent-checks",
            "3",
            "--language",
            "English",
        ]);

        match &cli.command {
            Command::Generate { topic, save } => {
                assert_eq!(topic, "Rust");
                assert!(*save);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let mut settings = Settings::default();
        cli.apply_overrides(&mut settings);
        assert_eq!(settings.concurrent_checks, 3);
        assert_eq!(settings.target_language, "English");
        assert_eq!(settings.check_timeout_seconds, 5);
    }

    #[test]
    fn test_parse_ticket_commands() {
        let cli = CliConfig::parse_from(["learning-tracker", "--user", "7", "tickets", "toggle", "3"]);

        assert_eq!(cli.user, 7);
        assert!(matches!(
            cli.command,
            Command::Tickets {
                action: TicketCommand::Toggle { id: 3 }
            }
        ));
    }
}
