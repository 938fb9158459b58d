use serde::{Deserialize, Serialize};

use super::person::LedgerId;

/// One participant's contribution to an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareEntry {
    pub user_id: LedgerId,
    pub paid_share: f64,
    pub owed_share: f64,
}

/// An expense ready for submission to the ledger. Built once, submitted once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub currency_code: String,
    pub description: String,
    pub cost: f64,
    pub shares: Vec<ShareEntry>,
}

impl ExpenseDraft {
    pub fn total_paid(&self) -> f64 {
        self.shares.iter().map(|s| s.paid_share).sum()
    }

    pub fn total_owed(&self) -> f64 {
        self.shares.iter().map(|s| s.owed_share).sum()
    }
}
