use clap::{Args, Subcommand};

use splitledger::config::{Config, ConfigValue};

use super::OutputFormat;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Secrets are never printed, only whether and where they are set.
fn describe_secret(secret: &Option<ConfigValue<String>>) -> String {
    match secret {
        Some(v) => format!("******** (source: {})", v.source),
        None => "(not set)".to_string(),
    }
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("api_key: {}", describe_secret(&config.api_key));
                        println!("consumer_key: {}", describe_secret(&config.consumer_key));
                        println!(
                            "consumer_secret: {}",
                            describe_secret(&config.consumer_secret)
                        );
                        println!();

                        println!("base_url: {}", config.base_url.value);
                        println!("  source: {}", config.base_url.source);
                        println!();

                        println!("currency_code: {}", config.currency_code.value);
                        println!("  source: {}", config.currency_code.source);
                        println!();

                        println!("expense_limit: {}", config.expense_limit.value);
                        println!("  source: {}", config.expense_limit.source);
                        println!();

                        println!(
                            "request_timeout_secs: {}",
                            config.request_timeout_secs.value
                        );
                        println!("  source: {}", config.request_timeout_secs.source);
                        println!();

                        println!(
                            "strict_participants: {}",
                            config.strict_participants.value
                        );
                        println!("  source: {}", config.strict_participants.source);
                    }
                }
                Ok(())
            }
        }
    }
}
