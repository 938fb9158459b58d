use clap::Args;

use splitledger_core::{Ledger, SplitwiseClient};

use super::OutputFormat;

/// List recent expenses
#[derive(Args)]
pub struct ExpensesCommand {
    /// Number of past days to include (0 = today only)
    #[arg(long, short, default_value_t = 7)]
    pub days: u32,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ExpensesCommand {
    pub async fn run(
        &self,
        ledger: &Ledger<SplitwiseClient>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let expenses = ledger.expenses_last_n_days(self.days).await?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&expenses)?);
            }
            OutputFormat::Text => {
                if expenses.is_empty() {
                    println!("No expenses in the last {} day(s).", self.days);
                    return Ok(());
                }
                for expense in &expenses {
                    println!(
                        "{}  {:<30} {:>10.2} {}",
                        expense.date.format("%Y-%m-%d"),
                        expense.description,
                        expense.cost,
                        expense.currency_code
                    );
                    println!(
                        "    #{} by {} in {}",
                        expense.id, expense.created_by, expense.group_name
                    );
                    if let Some(details) = &expense.details {
                        println!("    {}", details);
                    }
                }
            }
        }

        Ok(())
    }
}
