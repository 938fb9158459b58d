//! Group management commands.

use clap::{Args, Subcommand};

use splitledger_core::{GroupMember, Ledger, SplitwiseClient};

use super::OutputFormat;

/// Manage Splitwise groups
#[derive(Args)]
pub struct GroupCommand {
    #[command(subcommand)]
    pub command: GroupSubcommand,
}

#[derive(Subcommand)]
pub enum GroupSubcommand {
    /// Create a group and add members to it
    Create {
        /// Name of the group
        name: String,

        /// Member as first,last,email (can be repeated)
        #[arg(long = "member", value_name = "FIRST,LAST,EMAIL", value_parser = parse_member)]
        members: Vec<GroupMember>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Parses `first,last,email`.
fn parse_member(raw: &str) -> Result<GroupMember, String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [first, last, email] if !first.is_empty() && !email.is_empty() => Ok(GroupMember {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
        }),
        _ => Err(format!(
            "expected FIRST,LAST,EMAIL with a first name and email, got '{}'",
            raw
        )),
    }
}

impl GroupCommand {
    pub async fn run(
        &self,
        ledger: &Ledger<SplitwiseClient>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            GroupSubcommand::Create {
                name,
                members,
                format,
            } => {
                if name.trim().is_empty() {
                    return Err("Group name cannot be empty".into());
                }

                let creation = ledger.create_group_with_members(name.trim(), members).await;

                if let OutputFormat::Json = format {
                    println!("{}", serde_json::to_string_pretty(&creation)?);
                } else {
                    let Some(group) = &creation.group else {
                        let reason = creation.error.as_deref().unwrap_or("unknown error");
                        return Err(format!("Failed to create group: {}", reason).into());
                    };
                    println!("Created group '{}' (ID: {})", group.name, group.id);
                    for outcome in &creation.members {
                        match (&outcome.user_id, &outcome.reason) {
                            (Some(user_id), _) => {
                                println!("  added   {} (user {})", outcome.email, user_id)
                            }
                            (None, reason) => println!(
                                "  failed  {}: {}",
                                outcome.email,
                                reason.as_deref().unwrap_or("unknown error")
                            ),
                        }
                    }
                }

                let failed = creation.failed_members().count();
                if creation.group.is_some() && failed > 0 {
                    eprintln!("{} member(s) could not be added", failed);
                }
                Ok(())
            }
        }
    }
}
