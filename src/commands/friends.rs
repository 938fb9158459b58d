use clap::Args;

use splitledger_core::{FriendSummary, Ledger, SplitwiseClient};

use super::OutputFormat;

/// List friends and net balances
#[derive(Args)]
pub struct FriendsCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl FriendsCommand {
    pub async fn run(
        &self,
        ledger: &Ledger<SplitwiseClient>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let friends = ledger.fetch_friends().await?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&friends)?);
            }
            OutputFormat::Text => {
                if friends.is_empty() {
                    println!("No friends found.");
                    return Ok(());
                }
                let fallback = &ledger.settings().currency_code;
                for friend in &friends {
                    println!("{}", balance_line(friend, fallback));
                }
            }
        }

        Ok(())
    }
}

/// One text row. Settled friends with no balance entries use `fallback_currency`.
fn balance_line(friend: &FriendSummary, fallback_currency: &str) -> String {
    let status = if friend.balance < 0.0 {
        "you owe"
    } else if friend.balance > 0.0 {
        "owes you"
    } else {
        "settled up"
    };
    let currency = friend.currency_code.as_deref().unwrap_or(fallback_currency);
    format!(
        "{:<12} {:<30} {:>10.2} {}  ({})",
        friend.id, friend.name, friend.balance, currency, status
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(balance: f64, currency_code: Option<&str>) -> FriendSummary {
        FriendSummary {
            name: "Alice".to_string(),
            id: 2,
            balance,
            currency_code: currency_code.map(str::to_string),
        }
    }

    #[test]
    fn test_balance_line_uses_balance_currency() {
        let line = balance_line(&summary(-15.0, Some("USD")), "INR");
        assert!(line.contains("-15.00 USD"), "{line}");
        assert!(line.ends_with("(you owe)"));
    }

    #[test]
    fn test_balance_line_falls_back_when_settled() {
        let line = balance_line(&summary(0.0, None), "INR");
        assert!(line.contains("0.00 INR"), "{line}");
        assert!(line.ends_with("(settled up)"));
    }
}
