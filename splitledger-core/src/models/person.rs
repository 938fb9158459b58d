use serde::{Deserialize, Serialize};

/// Stable identifier the ledger assigns to users, groups and expenses.
pub type LedgerId = u64;

/// A ledger user as returned by the current-user, friend and expense endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: LedgerId,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Person {
    pub fn new(id: LedgerId, first_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: None,
            email: None,
        }
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// "first last" when a non-empty last name is present, otherwise "first".
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_first_only() {
        let person = Person::new(1, "Alice");
        assert_eq!(person.display_name(), "Alice");
    }

    #[test]
    fn test_display_name_with_last_name() {
        let person = Person::new(1, "Alice").with_last_name("Smith");
        assert_eq!(person.display_name(), "Alice Smith");
    }

    #[test]
    fn test_blank_last_name_is_ignored() {
        let person = Person::new(1, "Alice").with_last_name("  ");
        assert_eq!(person.display_name(), "Alice");
    }

    #[test]
    fn test_deserialize_null_last_name() {
        let json = r#"{"id": 7, "first_name": "Bob", "last_name": null}"#;
        let person: Person = serde_json::from_str(json).unwrap();
        assert_eq!(person.id, 7);
        assert!(person.last_name.is_none());
        assert!(person.email.is_none());
    }
}
