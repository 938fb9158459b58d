use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::person::{LedgerId, Person};

/// An expense exactly as the ledger lists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExpense {
    pub id: LedgerId,
    #[serde(default)]
    pub group_id: Option<LedgerId>,
    pub description: String,
    #[serde(default)]
    pub details: Option<String>,
    /// Decimal string, e.g. "10.0"
    pub cost: String,
    pub currency_code: String,
    /// RFC 3339 timestamp, e.g. "2025-06-22T16:16:17Z"
    pub date: String,
    #[serde(default)]
    pub created_by: Option<Person>,
}

impl RawExpense {
    /// The owning group, if any. The ledger uses both `null` and `0` for "no group".
    pub fn group(&self) -> Option<LedgerId> {
        self.group_id.filter(|id| *id != 0)
    }
}

/// Caller-facing projection of a ledger expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(rename = "Id of Expense")]
    pub id: LedgerId,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Cost(Expense)")]
    pub cost: f64,
    #[serde(rename = "Details of transaction")]
    pub details: Option<String>,
    #[serde(rename = "Created by")]
    pub created_by: String,
    #[serde(rename = "Date of Expense")]
    pub date: DateTime<Utc>,
    #[serde(rename = "Group Name")]
    pub group_name: String,
    #[serde(rename = "Currency code of transaction")]
    pub currency_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json(group_id: &str) -> String {
        format!(
            r#"{{
                "id": 3878839201,
                "group_id": {},
                "description": "Testing",
                "details": null,
                "cost": "10.0",
                "currency_code": "USD",
                "date": "2025-06-22T16:16:17Z",
                "created_by": {{"id": 5, "first_name": "Harjap", "last_name": null}}
            }}"#,
            group_id
        )
    }

    #[test]
    fn test_null_group_is_no_group() {
        let raw: RawExpense = serde_json::from_str(&sample_json("null")).unwrap();
        assert_eq!(raw.group(), None);
    }

    #[test]
    fn test_zero_group_is_no_group() {
        let raw: RawExpense = serde_json::from_str(&sample_json("0")).unwrap();
        assert_eq!(raw.group(), None);
    }

    #[test]
    fn test_real_group_id() {
        let raw: RawExpense = serde_json::from_str(&sample_json("991")).unwrap();
        assert_eq!(raw.group(), Some(991));
        assert_eq!(raw.created_by.unwrap().first_name, "Harjap");
    }
}
