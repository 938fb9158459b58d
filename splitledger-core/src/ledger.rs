//! The four ledger operations exposed to callers.
//!
//! Each operation runs to completion on its own: it fetches what it needs from
//! the gateway, builds any directory from scratch, and keeps nothing afterwards.
//! Gateway calls within an operation are issued one at a time.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::allocation::{allocate, AllocationError, AllocationPolicy};
use crate::directory::IdentityDirectory;
use crate::gateway::{ExpenseQuery, GatewayError, LedgerGateway};
use crate::models::{
    ExpenseDraft, ExpenseRecord, FriendSummary, GroupCreation, GroupMember, LedgerId,
    MemberOutcome,
};
use crate::normalize::{
    normalize_expense, normalize_friends, ExpenseWindow, NormalizeError,
};

/// Message returned when the ledger accepts a new expense.
pub const EXPENSE_ADDED: &str = "Congrats, Expense added successfully!!";
/// Message returned when the ledger refuses a new expense.
pub const EXPENSE_FAILED: &str = "Failed, Not able to add expense.";

/// Errors that abort an operation.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Per-deployment knobs for the operations.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSettings {
    /// Currency for new expenses
    pub currency_code: String,
    /// Maximum expenses fetched per window; 0 means all
    pub expense_limit: u32,
    pub allocation_policy: AllocationPolicy,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            currency_code: "INR".to_string(),
            expense_limit: 0,
            allocation_policy: AllocationPolicy::default(),
        }
    }
}

/// What happened to a submitted expense.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExpenseSubmission {
    Created {
        expense_id: LedgerId,
        unresolved: Vec<String>,
    },
    Rejected {
        reason: String,
        unresolved: Vec<String>,
    },
}

impl ExpenseSubmission {
    pub fn unresolved(&self) -> &[String] {
        match self {
            ExpenseSubmission::Created { unresolved, .. }
            | ExpenseSubmission::Rejected { unresolved, .. } => unresolved,
        }
    }

    /// Human-readable outcome, naming any participants that were left out.
    pub fn message(&self) -> String {
        let base = match self {
            ExpenseSubmission::Created { .. } => EXPENSE_ADDED,
            ExpenseSubmission::Rejected { .. } => EXPENSE_FAILED,
        };
        let unresolved = self.unresolved();
        if unresolved.is_empty() {
            base.to_string()
        } else {
            format!(
                "{} Skipped participants with no matching friend: {}.",
                base,
                unresolved.join(", ")
            )
        }
    }
}

/// Operations over a ledger gateway.
#[derive(Debug)]
pub struct Ledger<G> {
    gateway: G,
    settings: LedgerSettings,
}

impl<G: LedgerGateway> Ledger<G> {
    pub fn new(gateway: G, settings: LedgerSettings) -> Self {
        Self { gateway, settings }
    }

    /// Erases the gateway type, for holders that serve any backend.
    pub fn boxed(self) -> Ledger<Box<dyn LedgerGateway>>
    where
        G: 'static,
    {
        Ledger {
            gateway: Box::new(self.gateway),
            settings: self.settings,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// Friends with their display names and net balances.
    pub async fn fetch_friends(&self) -> Result<Vec<FriendSummary>, LedgerError> {
        let friends = self.gateway.list_friends().await?;
        tracing::debug!("Fetched {} friend(s)", friends.len());
        Ok(normalize_friends(&friends)?)
    }

    /// Expenses dated within the last `num_days` days, counting from today.
    pub async fn expenses_last_n_days(
        &self,
        num_days: u32,
    ) -> Result<Vec<ExpenseRecord>, LedgerError> {
        let today = Local::now().date_naive();
        self.expenses_since(num_days, today).await
    }

    /// Expenses within `[today - num_days, today + 1)`.
    pub async fn expenses_since(
        &self,
        num_days: u32,
        today: NaiveDate,
    ) -> Result<Vec<ExpenseRecord>, LedgerError> {
        let window = ExpenseWindow::last_n_days(num_days, today)?;
        let query = ExpenseQuery {
            dated_after: window.dated_after(),
            dated_before: window.dated_before(),
            limit: self.settings.expense_limit,
        };
        let raw_expenses = self.gateway.list_expenses(&query).await?;
        tracing::debug!(
            "Fetched {} expense(s) between {} and {}",
            raw_expenses.len(),
            query.dated_after,
            query.dated_before
        );

        // The ledger applies the window; every returned record is kept.
        let mut records = Vec::with_capacity(raw_expenses.len());
        for raw in &raw_expenses {
            let group_name = match raw.group() {
                Some(group_id) => Some(self.gateway.group_name(group_id).await?),
                None => None,
            };
            records.push(normalize_expense(raw, group_name)?);
        }

        Ok(records)
    }

    /// Builds the identity directory from the current user and the friend roster.
    pub async fn directory(&self) -> Result<IdentityDirectory, LedgerError> {
        let me = self.gateway.current_user().await?;
        let friends = self.gateway.list_friends().await?;
        Ok(IdentityDirectory::build(&me, &friends))
    }

    /// Splits `amount` equally among `participants` and submits it, paid in full by `paid_by`.
    ///
    /// A ledger refusal is an outcome, not an error; transport and allocation
    /// failures are errors.
    pub async fn create_expense(
        &self,
        participants: &[String],
        paid_by: &str,
        amount: f64,
        description: &str,
    ) -> Result<ExpenseSubmission, LedgerError> {
        if participants.is_empty() {
            return Err(AllocationError::NoParticipants.into());
        }

        let directory = self.directory().await?;
        let allocation = allocate(
            &directory,
            participants,
            paid_by,
            amount,
            self.settings.allocation_policy,
        )?;

        let draft = ExpenseDraft {
            currency_code: self.settings.currency_code.clone(),
            description: description.to_string(),
            cost: amount,
            shares: allocation.shares,
        };

        match self.gateway.create_expense(&draft).await {
            Ok(expense_id) => {
                tracing::info!("Created expense {} ({})", expense_id, description);
                Ok(ExpenseSubmission::Created {
                    expense_id,
                    unresolved: allocation.unresolved,
                })
            }
            Err(GatewayError::Rejected(reason)) => {
                tracing::warn!("Ledger rejected expense '{}': {}", description, reason);
                Ok(ExpenseSubmission::Rejected {
                    reason,
                    unresolved: allocation.unresolved,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Creates a group, then adds each member in order. Never fails as a whole:
    /// every problem is recorded in the returned outcome.
    pub async fn create_group_with_members(
        &self,
        name: &str,
        members: &[GroupMember],
    ) -> GroupCreation {
        let group = match self.gateway.create_group(name).await {
            Ok(group) => group,
            Err(e) => {
                tracing::warn!("Failed to create group '{}': {}", name, e);
                return GroupCreation::failed(e.to_string());
            }
        };
        tracing::info!("Created group {} ({})", group.id, group.name);

        let mut outcomes = Vec::with_capacity(members.len());
        for member in members {
            let outcome = match self.gateway.add_member_to_group(member, group.id).await {
                Ok(user) => MemberOutcome::added(&member.email, user.id),
                Err(e) => {
                    tracing::warn!("Failed to add {} to group {}: {}", member.email, group.id, e);
                    MemberOutcome::failed(&member.email, e.to_string())
                }
            };
            outcomes.push(outcome);
        }

        GroupCreation {
            group: Some(group),
            error: None,
            members: outcomes,
        }
    }
}
