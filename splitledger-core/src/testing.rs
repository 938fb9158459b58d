//! In-memory ledger gateway for unit tests.
//!
//! Built for this crate's tests and, with the `testing` feature, for dependents.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::gateway::{ExpenseQuery, GatewayError, LedgerGateway};
use crate::models::{
    CreatedGroup, ExpenseDraft, Friend, GroupMember, LedgerId, Person, RawExpense,
};

#[derive(Debug, Default)]
struct Calls {
    submitted: Vec<ExpenseDraft>,
    expense_queries: Vec<ExpenseQuery>,
    group_lookups: Vec<LedgerId>,
    member_adds: usize,
}

/// Serves a fixed roster and records every write.
#[derive(Debug)]
pub struct FakeGateway {
    me: Person,
    friends: Vec<Friend>,
    groups: HashMap<LedgerId, String>,
    expenses: Vec<RawExpense>,
    fail_reads: bool,
    reject_expenses: Option<String>,
    reject_groups: bool,
    rejected_members: Vec<String>,
    calls: Mutex<Calls>,
}

impl FakeGateway {
    pub fn new(me: Person) -> Self {
        Self {
            me,
            friends: Vec::new(),
            groups: HashMap::new(),
            expenses: Vec::new(),
            fail_reads: false,
            reject_expenses: None,
            reject_groups: false,
            rejected_members: Vec::new(),
            calls: Mutex::new(Calls::default()),
        }
    }

    pub fn with_friend(mut self, friend: Friend) -> Self {
        self.friends.push(friend);
        self
    }

    pub fn with_group(mut self, id: LedgerId, name: &str) -> Self {
        self.groups.insert(id, name.to_string());
        self
    }

    pub fn with_expense(mut self, expense: RawExpense) -> Self {
        self.expenses.push(expense);
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn rejecting_expenses(mut self, reason: &str) -> Self {
        self.reject_expenses = Some(reason.to_string());
        self
    }

    pub fn rejecting_groups(mut self) -> Self {
        self.reject_groups = true;
        self
    }

    pub fn rejecting_member(mut self, email: &str) -> Self {
        self.rejected_members.push(email.to_string());
        self
    }

    pub fn submitted(&self) -> Vec<ExpenseDraft> {
        self.calls.lock().unwrap().submitted.clone()
    }

    pub fn expense_queries(&self) -> Vec<ExpenseQuery> {
        self.calls.lock().unwrap().expense_queries.clone()
    }

    pub fn group_lookups(&self) -> Vec<LedgerId> {
        self.calls.lock().unwrap().group_lookups.clone()
    }

    pub fn member_adds(&self) -> usize {
        self.calls.lock().unwrap().member_adds
    }

    fn check_reads(&self) -> Result<(), GatewayError> {
        if self.fail_reads {
            Err(GatewayError::Status {
                status: 401,
                body: "invalid API key".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LedgerGateway for FakeGateway {
    async fn current_user(&self) -> Result<Person, GatewayError> {
        self.check_reads()?;
        Ok(self.me.clone())
    }

    async fn list_friends(&self) -> Result<Vec<Friend>, GatewayError> {
        self.check_reads()?;
        Ok(self.friends.clone())
    }

    async fn list_expenses(&self, query: &ExpenseQuery) -> Result<Vec<RawExpense>, GatewayError> {
        self.check_reads()?;
        self.calls
            .lock()
            .unwrap()
            .expense_queries
            .push(query.clone());
        Ok(self.expenses.clone())
    }

    async fn group_name(&self, group_id: LedgerId) -> Result<String, GatewayError> {
        self.check_reads()?;
        self.calls.lock().unwrap().group_lookups.push(group_id);
        self.groups
            .get(&group_id)
            .cloned()
            .ok_or(GatewayError::Status {
                status: 404,
                body: format!("group {group_id} not found"),
            })
    }

    async fn create_expense(&self, draft: &ExpenseDraft) -> Result<LedgerId, GatewayError> {
        let mut calls = self.calls.lock().unwrap();
        calls.submitted.push(draft.clone());
        match &self.reject_expenses {
            Some(reason) => Err(GatewayError::Rejected(reason.clone())),
            None => Ok(1000 + calls.submitted.len() as LedgerId),
        }
    }

    async fn create_group(&self, name: &str) -> Result<CreatedGroup, GatewayError> {
        if self.reject_groups {
            return Err(GatewayError::Rejected("name is taken".to_string()));
        }
        Ok(CreatedGroup {
            id: 500,
            name: name.to_string(),
        })
    }

    async fn add_member_to_group(
        &self,
        member: &GroupMember,
        _group_id: LedgerId,
    ) -> Result<Person, GatewayError> {
        let adds = {
            let mut calls = self.calls.lock().unwrap();
            calls.member_adds += 1;
            calls.member_adds
        };
        if self.rejected_members.contains(&member.email) {
            return Err(GatewayError::Rejected("email is invalid".to_string()));
        }
        Ok(Person::new(2000 + adds as LedgerId, member.first_name.clone())
            .with_last_name(member.last_name.clone()))
    }
}
