//! HTTP client for the Splitwise v3.0 API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{ExpenseQuery, GatewayError, LedgerGateway};
use crate::models::{
    CreatedGroup, ExpenseDraft, Friend, GroupMember, LedgerId, Person, RawExpense,
};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://secure.splitwise.com/api/v3.0";

/// The three credential values issued for a Splitwise application.
#[derive(Clone, Default)]
pub struct Credentials {
    pub api_key: Option<String>,
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_key: Some(api_key.into()),
            consumer_key: Some(consumer_key.into()),
            consumer_secret: Some(consumer_secret.into()),
        }
    }

    /// Returns the bearer token once all three values are present and non-empty.
    pub fn bearer_token(&self) -> Result<&str, GatewayError> {
        require(&self.consumer_key, "CONSUMER_KEY")?;
        require(&self.consumer_secret, "CONSUMER_SECRET")?;
        require(&self.api_key, "API_KEY")
    }

    pub fn is_complete(&self) -> bool {
        self.bearer_token().is_ok()
    }
}

fn require<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, GatewayError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(GatewayError::MissingCredential(name))
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn mask(value: &Option<String>) -> &'static str {
            if value.is_some() {
                "<set>"
            } else {
                "<unset>"
            }
        }
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("consumer_key", &mask(&self.consumer_key))
            .field("consumer_secret", &mask(&self.consumer_secret))
            .finish()
    }
}

// Response envelopes

#[derive(Deserialize)]
struct CurrentUserResponse {
    user: Person,
}

#[derive(Deserialize)]
struct FriendsResponse {
    #[serde(default)]
    friends: Vec<Friend>,
}

#[derive(Deserialize)]
struct ExpensesResponse {
    #[serde(default)]
    expenses: Vec<RawExpense>,
}

#[derive(Deserialize)]
struct CreatedExpense {
    id: LedgerId,
}

#[derive(Deserialize)]
struct CreateExpenseResponse {
    #[serde(default)]
    expenses: Vec<CreatedExpense>,
    #[serde(default)]
    errors: Value,
}

#[derive(Deserialize)]
struct GroupResponse {
    #[serde(default)]
    group: Option<CreatedGroup>,
    #[serde(default)]
    errors: Value,
}

#[derive(Deserialize)]
struct AddUserResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    user: Option<Person>,
    #[serde(default)]
    errors: Value,
}

/// Ledger gateway backed by the Splitwise REST API.
#[derive(Debug, Clone)]
pub struct SplitwiseClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl SplitwiseClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("splitledger/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let token = self.credentials.bearer_token()?;
        tracing::debug!("GET {}", path);

        let response = self
            .http
            .get(self.build_url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        read_json(response).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, GatewayError> {
        let token = self.credentials.bearer_token()?;
        tracing::debug!("POST {}", path);

        let response = self
            .http
            .post(self.build_url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
}

/// Flattens the ledger's `errors` payload (object, array or string) into one message.
fn rejection_message(errors: &Value) -> Option<String> {
    let mut messages = Vec::new();
    collect_messages(errors, &mut messages);
    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

fn collect_messages(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.is_empty() => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|v| collect_messages(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_messages(v, out)),
        _ => {}
    }
}

fn format_amount(amount: f64) -> String {
    amount.to_string()
}

/// Request body for `create_expense`: shares are flattened into
/// `users__{i}__user_id` / `paid_share` / `owed_share` fields.
fn expense_body(draft: &ExpenseDraft) -> Value {
    let mut body = Map::new();
    body.insert("cost".into(), json!(format_amount(draft.cost)));
    body.insert("description".into(), json!(draft.description));
    body.insert("currency_code".into(), json!(draft.currency_code));
    body.insert("group_id".into(), json!(0));

    for (i, share) in draft.shares.iter().enumerate() {
        body.insert(format!("users__{i}__user_id"), json!(share.user_id));
        body.insert(
            format!("users__{i}__paid_share"),
            json!(format_amount(share.paid_share)),
        );
        body.insert(
            format!("users__{i}__owed_share"),
            json!(format_amount(share.owed_share)),
        );
    }

    Value::Object(body)
}

#[async_trait]
impl LedgerGateway for SplitwiseClient {
    async fn current_user(&self) -> Result<Person, GatewayError> {
        let response: CurrentUserResponse = self.get("get_current_user", &[]).await?;
        Ok(response.user)
    }

    async fn list_friends(&self) -> Result<Vec<Friend>, GatewayError> {
        let response: FriendsResponse = self.get("get_friends", &[]).await?;
        Ok(response.friends)
    }

    async fn list_expenses(&self, query: &ExpenseQuery) -> Result<Vec<RawExpense>, GatewayError> {
        let params = [
            ("dated_after", query.dated_after.clone()),
            ("dated_before", query.dated_before.clone()),
            ("limit", query.limit.to_string()),
        ];
        let response: ExpensesResponse = self.get("get_expenses", &params).await?;
        Ok(response.expenses)
    }

    async fn group_name(&self, group_id: LedgerId) -> Result<String, GatewayError> {
        let response: GroupResponse = self.get(&format!("get_group/{group_id}"), &[]).await?;
        response
            .group
            .map(|g| g.name)
            .ok_or_else(|| GatewayError::Decode(format!("group {group_id} missing from response")))
    }

    async fn create_expense(&self, draft: &ExpenseDraft) -> Result<LedgerId, GatewayError> {
        let response: CreateExpenseResponse =
            self.post("create_expense", &expense_body(draft)).await?;

        if let Some(message) = rejection_message(&response.errors) {
            return Err(GatewayError::Rejected(message));
        }
        response
            .expenses
            .first()
            .map(|e| e.id)
            .ok_or_else(|| GatewayError::Decode("no expense in create response".to_string()))
    }

    async fn create_group(&self, name: &str) -> Result<CreatedGroup, GatewayError> {
        let response: GroupResponse = self.post("create_group", &json!({ "name": name })).await?;

        if let Some(message) = rejection_message(&response.errors) {
            return Err(GatewayError::Rejected(message));
        }
        response
            .group
            .ok_or_else(|| GatewayError::Decode("no group in create response".to_string()))
    }

    async fn add_member_to_group(
        &self,
        member: &GroupMember,
        group_id: LedgerId,
    ) -> Result<Person, GatewayError> {
        let body = json!({
            "group_id": group_id,
            "first_name": member.first_name,
            "last_name": member.last_name,
            "email": member.email,
        });
        let response: AddUserResponse = self.post("add_user_to_group", &body).await?;

        if !response.success {
            let message = rejection_message(&response.errors)
                .unwrap_or_else(|| "member was not added".to_string());
            return Err(GatewayError::Rejected(message));
        }
        response
            .user
            .ok_or_else(|| GatewayError::Decode("no user in add_user_to_group response".to_string()))
    }
}
