//! Reshaping of raw ledger records into the caller-facing shapes.

use chrono::{DateTime, Days, NaiveDate, Utc};
use thiserror::Error;

use crate::models::{ExpenseRecord, Friend, FriendSummary, LedgerId, RawExpense};

/// Group name reported for expenses that belong to no group.
pub const NON_GROUP_EXPENSES: &str = "Non-group expenses";

/// Date format the ledger expects for `dated_after` / `dated_before`.
const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// A record the ledger returned could not be interpreted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("invalid {field} '{value}' on record {id}")]
    InvalidAmount {
        id: LedgerId,
        field: &'static str,
        value: String,
    },

    #[error("invalid date '{value}' on expense {id}")]
    InvalidDate { id: LedgerId, value: String },

    #[error("expense {0} has no creator")]
    MissingCreator(LedgerId),

    #[error("day window of {0} days is out of range")]
    WindowOutOfRange(u32),
}

/// Net balance with a friend: the first balance entry, or zero when there is none.
///
/// Balances in further currencies are not surfaced.
pub fn friend_balance(friend: &Friend) -> Result<f64, NormalizeError> {
    match friend.balances.first() {
        Some(balance) => parse_amount(friend.person.id, "balance", &balance.amount),
        None => Ok(0.0),
    }
}

pub fn normalize_friend(friend: &Friend) -> Result<FriendSummary, NormalizeError> {
    Ok(FriendSummary {
        name: friend.person.display_name(),
        id: friend.person.id,
        balance: friend_balance(friend)?,
        currency_code: friend.balances.first().map(|b| b.currency_code.clone()),
    })
}

/// Normalizes a whole roster; the first malformed friend fails the batch.
pub fn normalize_friends(friends: &[Friend]) -> Result<Vec<FriendSummary>, NormalizeError> {
    friends.iter().map(normalize_friend).collect()
}

/// Whole-day window `[start, end)` the ledger is asked to filter expenses by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl ExpenseWindow {
    /// `[today - num_days, today + 1)`.
    pub fn last_n_days(num_days: u32, today: NaiveDate) -> Result<Self, NormalizeError> {
        let start = today
            .checked_sub_days(Days::new(u64::from(num_days)))
            .ok_or(NormalizeError::WindowOutOfRange(num_days))?;
        let end = today
            .checked_add_days(Days::new(1))
            .ok_or(NormalizeError::WindowOutOfRange(num_days))?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive lower bound in the ledger's query format.
    pub fn dated_after(&self) -> String {
        self.start.format(QUERY_DATE_FORMAT).to_string()
    }

    /// Exclusive upper bound in the ledger's query format.
    pub fn dated_before(&self) -> String {
        self.end.format(QUERY_DATE_FORMAT).to_string()
    }
}

/// Parses an expense timestamp as sent by the ledger.
pub fn expense_date(raw: &RawExpense) -> Result<DateTime<Utc>, NormalizeError> {
    DateTime::parse_from_rfc3339(raw.date.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| NormalizeError::InvalidDate {
            id: raw.id,
            value: raw.date.clone(),
        })
}

/// Reshapes one expense. `group_name` is `None` when the expense has no group.
pub fn normalize_expense(
    raw: &RawExpense,
    group_name: Option<String>,
) -> Result<ExpenseRecord, NormalizeError> {
    let creator = raw
        .created_by
        .as_ref()
        .ok_or(NormalizeError::MissingCreator(raw.id))?;

    Ok(ExpenseRecord {
        id: raw.id,
        description: raw.description.clone(),
        cost: parse_amount(raw.id, "cost", &raw.cost)?,
        details: raw.details.clone().filter(|d| !d.trim().is_empty()),
        created_by: creator.first_name.clone(),
        date: expense_date(raw)?,
        group_name: group_name.unwrap_or_else(|| NON_GROUP_EXPENSES.to_string()),
        currency_code: raw.currency_code.clone(),
    })
}

fn parse_amount(id: LedgerId, field: &'static str, value: &str) -> Result<f64, NormalizeError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| NormalizeError::InvalidAmount {
            id,
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Person;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn raw_expense() -> RawExpense {
        RawExpense {
            id: 3878839201,
            group_id: None,
            description: "Testing".to_string(),
            details: None,
            cost: "10.0".to_string(),
            currency_code: "USD".to_string(),
            date: "2025-06-22T16:16:17Z".to_string(),
            created_by: Some(Person::new(5, "Harjap").with_last_name("Singh")),
        }
    }

    #[test]
    fn test_friend_without_balances_is_settled() {
        let friend = Friend::new(Person::new(3, "Bob"));
        assert_eq!(friend_balance(&friend).unwrap(), 0.0);
    }

    #[test]
    fn test_friend_balance_uses_first_entry() {
        let friend = Friend::new(Person::new(2, "Alice"))
            .with_balance("INR", "-15.0")
            .with_balance("USD", "99.0");
        assert_eq!(friend_balance(&friend).unwrap(), -15.0);
    }

    #[test]
    fn test_malformed_balance_fails_batch() {
        let friends = vec![
            Friend::new(Person::new(2, "Alice")).with_balance("INR", "-15.0"),
            Friend::new(Person::new(3, "Bob")).with_balance("INR", "lots"),
        ];
        let err = normalize_friends(&friends).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::InvalidAmount {
                id: 3,
                field: "balance",
                value: "lots".to_string()
            }
        );
    }

    #[test]
    fn test_normalize_friends_alice_and_bob() {
        let friends = vec![
            Friend::new(Person::new(2, "Alice")).with_balance("INR", "-15.0"),
            Friend::new(Person::new(3, "Bob")),
        ];
        let summaries = normalize_friends(&friends).unwrap();

        assert_eq!(
            serde_json::to_value(&summaries).unwrap(),
            serde_json::json!([
                {"Name": "Alice", "Id": 2, "Balance": -15.0},
                {"Name": "Bob", "Id": 3, "Balance": 0}
            ])
        );
        assert_eq!(summaries[0].currency_code.as_deref(), Some("INR"));
        assert_eq!(summaries[1].currency_code, None);
    }

    #[test]
    fn test_friend_display_name_includes_last_name() {
        let friend = Friend::new(Person::new(4, "Sarvagya").with_last_name("Jain"));
        assert_eq!(normalize_friend(&friend).unwrap().name, "Sarvagya Jain");
    }

    #[test]
    fn test_window_bounds() {
        let window = ExpenseWindow::last_n_days(7, date(2025, 6, 22)).unwrap();
        assert_eq!(window.start(), date(2025, 6, 15));
        assert_eq!(window.end(), date(2025, 6, 23));
        assert_eq!(window.dated_after(), "2025-06-15");
        assert_eq!(window.dated_before(), "2025-06-23");
    }

    #[test]
    fn test_zero_day_window_is_today() {
        let window = ExpenseWindow::last_n_days(0, date(2025, 1, 1)).unwrap();
        assert_eq!(window.dated_after(), "2025-01-01");
        assert_eq!(window.dated_before(), "2025-01-02");
    }

    #[test]
    fn test_window_crosses_month_boundary() {
        let window = ExpenseWindow::last_n_days(3, date(2025, 3, 1)).unwrap();
        assert_eq!(window.dated_after(), "2025-02-26");
    }

    #[test]
    fn test_normalize_expense_without_group() {
        let record = normalize_expense(&raw_expense(), None).unwrap();

        assert_eq!(record.id, 3878839201);
        assert_eq!(record.cost, 10.0);
        assert_eq!(record.created_by, "Harjap");
        assert_eq!(record.group_name, NON_GROUP_EXPENSES);
        assert_eq!(record.date, utc("2025-06-22T16:16:17Z"));
        assert!(record.details.is_none());
    }

    #[test]
    fn test_normalize_expense_with_group_and_details() {
        let mut raw = raw_expense();
        raw.group_id = Some(77);
        raw.details = Some("split at the airport".to_string());

        let record = normalize_expense(&raw, Some("Trip to Dubai".to_string())).unwrap();
        assert_eq!(record.group_name, "Trip to Dubai");
        assert_eq!(record.details.as_deref(), Some("split at the airport"));
    }

    #[test]
    fn test_expense_record_keys() {
        let record = normalize_expense(&raw_expense(), None).unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "Id of Expense": 3878839201u64,
                "Description": "Testing",
                "Cost(Expense)": 10.0,
                "Details of transaction": null,
                "Created by": "Harjap",
                "Date of Expense": "2025-06-22T16:16:17Z",
                "Group Name": "Non-group expenses",
                "Currency code of transaction": "USD"
            })
        );
    }

    #[test]
    fn test_missing_creator_is_an_error() {
        let mut raw = raw_expense();
        raw.created_by = None;
        assert_eq!(
            normalize_expense(&raw, None),
            Err(NormalizeError::MissingCreator(3878839201))
        );
    }

    #[test]
    fn test_bad_date_is_an_error() {
        let mut raw = raw_expense();
        raw.date = "yesterday".to_string();
        assert!(matches!(
            normalize_expense(&raw, None),
            Err(NormalizeError::InvalidDate { .. })
        ));
    }
}
