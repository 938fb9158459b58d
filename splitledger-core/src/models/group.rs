use serde::{Deserialize, Serialize};

use super::person::LedgerId;

/// A person to add to a newly created group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A group the ledger has just created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedGroup {
    pub id: LedgerId,
    pub name: String,
}

/// Result of adding a single member to a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberOutcome {
    pub email: String,
    pub added: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<LedgerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MemberOutcome {
    pub fn added(email: impl Into<String>, user_id: LedgerId) -> Self {
        Self {
            email: email.into(),
            added: true,
            user_id: Some(user_id),
            reason: None,
        }
    }

    pub fn failed(email: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            added: false,
            user_id: None,
            reason: Some(reason.into()),
        }
    }
}

/// Best-effort outcome of creating a group and adding its members.
///
/// `group` is `None` when the group itself could not be created, in which case
/// `error` says why and no member adds were attempted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupCreation {
    pub group: Option<CreatedGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub members: Vec<MemberOutcome>,
}

impl GroupCreation {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            group: None,
            error: Some(error.into()),
            members: Vec::new(),
        }
    }

    /// Members that could not be added, for callers that want to retry them.
    pub fn failed_members(&self) -> impl Iterator<Item = &MemberOutcome> {
        self.members.iter().filter(|m| !m.added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_members() {
        let creation = GroupCreation {
            group: Some(CreatedGroup {
                id: 10,
                name: "Trip".to_string(),
            }),
            error: None,
            members: vec![
                MemberOutcome::added("a@example.com", 1),
                MemberOutcome::failed("b@example.com", "invalid email"),
            ],
        };

        let failed: Vec<_> = creation.failed_members().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].email, "b@example.com");
        assert_eq!(failed[0].reason.as_deref(), Some("invalid email"));
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let outcome = MemberOutcome::added("a@example.com", 1);
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"email": "a@example.com", "added": true, "user_id": 1})
        );
    }
}
