//! Boundary to the remote ledger.
//!
//! [`LedgerGateway`] lists the read and write calls the operations need.
//! [`SplitwiseClient`] implements it against the Splitwise v3.0 REST API;
//! tests substitute an in-memory fake.

mod error;
mod splitwise;

pub use error::GatewayError;
pub use splitwise::{Credentials, SplitwiseClient, DEFAULT_BASE_URL};

use async_trait::async_trait;

use crate::models::{
    CreatedGroup, ExpenseDraft, Friend, GroupMember, LedgerId, Person, RawExpense,
};

/// Server-side filter for listing expenses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseQuery {
    /// Inclusive, `YYYY-MM-DD`
    pub dated_after: String,
    /// Exclusive, `YYYY-MM-DD`
    pub dated_before: String,
    /// Maximum records to return; 0 asks for everything in the window
    pub limit: u32,
}

/// Remote read/write operations of the shared-expense ledger.
///
/// Every call is a single round trip; implementations do not retry.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// The authenticated user.
    async fn current_user(&self) -> Result<Person, GatewayError>;

    /// The authenticated user's friends, with balances.
    async fn list_friends(&self) -> Result<Vec<Friend>, GatewayError>;

    async fn list_expenses(&self, query: &ExpenseQuery) -> Result<Vec<RawExpense>, GatewayError>;

    /// Name of a group by id.
    async fn group_name(&self, group_id: LedgerId) -> Result<String, GatewayError>;

    /// Submits a draft; returns the id of the created expense.
    async fn create_expense(&self, draft: &ExpenseDraft) -> Result<LedgerId, GatewayError>;

    async fn create_group(&self, name: &str) -> Result<CreatedGroup, GatewayError>;

    /// Adds a member (inviting them by email if needed); returns the member's user record.
    async fn add_member_to_group(
        &self,
        member: &GroupMember,
        group_id: LedgerId,
    ) -> Result<Person, GatewayError>;
}

#[async_trait]
impl<T: LedgerGateway + ?Sized> LedgerGateway for Box<T> {
    async fn current_user(&self) -> Result<Person, GatewayError> {
        (**self).current_user().await
    }

    async fn list_friends(&self) -> Result<Vec<Friend>, GatewayError> {
        (**self).list_friends().await
    }

    async fn list_expenses(&self, query: &ExpenseQuery) -> Result<Vec<RawExpense>, GatewayError> {
        (**self).list_expenses(query).await
    }

    async fn group_name(&self, group_id: LedgerId) -> Result<String, GatewayError> {
        (**self).group_name(group_id).await
    }

    async fn create_expense(&self, draft: &ExpenseDraft) -> Result<LedgerId, GatewayError> {
        (**self).create_expense(draft).await
    }

    async fn create_group(&self, name: &str) -> Result<CreatedGroup, GatewayError> {
        (**self).create_group(name).await
    }

    async fn add_member_to_group(
        &self,
        member: &GroupMember,
        group_id: LedgerId,
    ) -> Result<Person, GatewayError> {
        (**self).add_member_to_group(member, group_id).await
    }
}
