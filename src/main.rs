use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{ConfigCommand, ExpenseCommand, ExpensesCommand, FriendsCommand, GroupCommand};
use splitledger::config::Config;
use splitledger::logging;

#[derive(Parser)]
#[command(name = "splitledger")]
#[command(version)]
#[command(about = "Manage a Splitwise account from the command line", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true, env = "SPLITLEDGER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List friends and net balances
    Friends(FriendsCommand),

    /// List recent expenses
    Expenses(ExpensesCommand),

    /// Add expenses
    Expense(ExpenseCommand),

    /// Manage groups
    Group(GroupCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    logging::init("warn");

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Friends(cmd)) => {
            cmd.run(&config.build_ledger()?).await?;
        }
        Some(Commands::Expenses(cmd)) => {
            cmd.run(&config.build_ledger()?).await?;
        }
        Some(Commands::Expense(cmd)) => {
            cmd.run(&config.build_ledger()?).await?;
        }
        Some(Commands::Group(cmd)) => {
            cmd.run(&config.build_ledger()?).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
