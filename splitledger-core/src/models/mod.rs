mod draft;
mod expense;
mod friend;
mod group;
mod person;

pub use draft::{ExpenseDraft, ShareEntry};
pub use expense::{ExpenseRecord, RawExpense};
pub use friend::{Balance, Friend, FriendSummary};
pub use group::{CreatedGroup, GroupCreation, GroupMember, MemberOutcome};
pub use person::{LedgerId, Person};
