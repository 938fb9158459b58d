use serde::{Deserialize, Serialize, Serializer};

use super::person::{LedgerId, Person};

/// One per-currency balance entry on a friend record. The ledger sends amounts as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub currency_code: String,
    pub amount: String,
}

/// A friend as listed by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    #[serde(flatten)]
    pub person: Person,
    #[serde(default, rename = "balance")]
    pub balances: Vec<Balance>,
}

impl Friend {
    pub fn new(person: Person) -> Self {
        Self {
            person,
            balances: Vec::new(),
        }
    }

    pub fn with_balance(
        mut self,
        currency_code: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        self.balances.push(Balance {
            currency_code: currency_code.into(),
            amount: amount.into(),
        });
        self
    }
}

/// Caller-facing view of a friend and the net balance with them.
///
/// A negative balance means the caller owes the friend, positive means the
/// friend owes the caller, zero means settled. A settled balance is written
/// as the integer `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendSummary {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Id")]
    pub id: LedgerId,
    #[serde(rename = "Balance", serialize_with = "serialize_balance")]
    pub balance: f64,
    /// Currency of `balance`; `None` when the friend has no balance entries.
    #[serde(skip)]
    pub currency_code: Option<String>,
}

fn serialize_balance<S: Serializer>(balance: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if *balance == 0.0 {
        serializer.serialize_i64(0)
    } else {
        serializer.serialize_f64(*balance)
    }
}
