use clap::{Args, Subcommand};

use splitledger_core::{ExpenseSubmission, Ledger, SplitwiseClient};

#[derive(Args)]
pub struct ExpenseCommand {
    #[command(subcommand)]
    pub command: ExpenseSubcommand,
}

#[derive(Subcommand)]
pub enum ExpenseSubcommand {
    /// Add an expense split equally among participants
    Add {
        /// First name of the person who paid
        #[arg(long)]
        paid_by: String,

        /// Total amount paid
        #[arg(long)]
        amount: f64,

        /// Short description, e.g. "Dinner"
        #[arg(long)]
        description: String,

        /// Everyone sharing the expense, payer included (id:<n> picks a friend by id)
        #[arg(required = true)]
        participants: Vec<String>,
    },
}

impl ExpenseCommand {
    pub async fn run(
        &self,
        ledger: &Ledger<SplitwiseClient>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ExpenseSubcommand::Add {
                paid_by,
                amount,
                description,
                participants,
            } => {
                if description.trim().is_empty() {
                    return Err("Expense description cannot be empty".into());
                }

                let submission = ledger
                    .create_expense(participants, paid_by, *amount, description.trim())
                    .await?;
                println!("{}", submission.message());

                match submission {
                    ExpenseSubmission::Created { expense_id, .. } => {
                        println!("Expense ID: {}", expense_id);
                        Ok(())
                    }
                    ExpenseSubmission::Rejected { reason, .. } => Err(reason.into()),
                }
            }
        }
    }
}
