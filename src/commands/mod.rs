mod config_cmd;
mod expense;
mod expenses;
mod friends;
mod group;

use clap::ValueEnum;

pub use config_cmd::ConfigCommand;
pub use expense::ExpenseCommand;
pub use expenses::ExpensesCommand;
pub use friends::FriendsCommand;
pub use group::GroupCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
