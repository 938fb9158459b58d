//! SplitLedger Core Library
//!
//! Client-side logic for a remote shared-expense ledger: resolving names to
//! ledger ids, splitting expenses into per-participant shares, and reshaping
//! ledger records for callers.

pub mod allocation;
pub mod directory;
pub mod gateway;
pub mod ledger;
pub mod models;
pub mod normalize;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use allocation::{allocate, Allocation, AllocationError, AllocationPolicy};
pub use directory::IdentityDirectory;
pub use gateway::{Credentials, ExpenseQuery, GatewayError, LedgerGateway, SplitwiseClient};
pub use ledger::{ExpenseSubmission, Ledger, LedgerError, LedgerSettings};
pub use models::{
    ExpenseDraft, ExpenseRecord, Friend, FriendSummary, GroupCreation, GroupMember, LedgerId,
    MemberOutcome, Person, RawExpense, ShareEntry,
};
pub use normalize::{ExpenseWindow, NormalizeError, NON_GROUP_EXPENSES};
