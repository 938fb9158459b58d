//! MCP tools for SplitLedger
//!
//! Exposes the ledger operations to AI agents. Failures come back as tool
//! errors whose text starts with `Unexpected error:`; group creation instead
//! reports problems inside its structured result.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use splitledger_core::{GroupCreation, GroupMember, Ledger, LedgerGateway};

// ============================================================================
// Tool Input Schemas
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExpensesRequest {
    /// Number of past days to include. Signed so that a negative count is
    /// reported as a tool error rather than rejected by the schema.
    #[schemars(description = "Number of past days for which to retrieve expenses (0 = today only)")]
    pub num_days: i64,
}

impl ExpensesRequest {
    pub fn days(&self) -> Result<u32, String> {
        u32::try_from(self.num_days).map_err(|_| {
            format!(
                "num_days must be between 0 and {}, got {}",
                u32::MAX,
                self.num_days
            )
        })
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateExpenseRequest {
    /// Everyone sharing the expense, payer included
    #[schemars(
        description = "First names of all people involved in the expense, including the payer. Use id:<number> to pick a friend by id."
    )]
    pub participants: Vec<String>,

    #[schemars(description = "First name of the person who paid the total amount")]
    pub paid_by: String,

    #[schemars(description = "Total amount paid for the expense")]
    pub amount: f64,

    #[schemars(description = "Short description of the expense, e.g. \"Dinner\"")]
    pub description: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateGroupRequest {
    #[schemars(description = "Name of the group to create, e.g. \"Trip to Dubai\"")]
    pub group_name: String,

    #[schemars(description = "First names of the users to add")]
    pub first_names: Vec<String>,

    #[schemars(description = "Last names of the users, in the same order as first_names")]
    pub last_names: Vec<String>,

    #[schemars(description = "Email addresses of the users, in the same order as first_names")]
    pub emails: Vec<String>,
}

impl CreateGroupRequest {
    /// Zips the parallel name/email lists into members.
    pub fn members(&self) -> Result<Vec<GroupMember>, String> {
        let count = self.first_names.len();
        if self.last_names.len() != count || self.emails.len() != count {
            return Err(format!(
                "first_names, last_names and emails must have the same length (got {}, {}, {})",
                count,
                self.last_names.len(),
                self.emails.len()
            ));
        }

        Ok(self
            .first_names
            .iter()
            .zip(&self.last_names)
            .zip(&self.emails)
            .map(|((first, last), email)| GroupMember {
                first_name: first.clone(),
                last_name: last.clone(),
                email: email.clone(),
            })
            .collect())
    }
}

// ============================================================================
// Service
// ============================================================================

/// SplitLedger MCP Service
#[derive(Clone)]
pub struct SplitLedgerService {
    /// Ledger operations over any gateway
    ledger: Arc<Ledger<Box<dyn LedgerGateway>>>,
    /// Tool router
    tool_router: ToolRouter<Self>,
}

impl SplitLedgerService {
    pub fn new<G: LedgerGateway + 'static>(ledger: Ledger<G>) -> Self {
        Self {
            ledger: Arc::new(ledger.boxed()),
            tool_router: Self::tool_router(),
        }
    }
}

fn unexpected(error: impl std::fmt::Display) -> CallToolResult {
    tracing::warn!("Tool call failed: {}", error);
    CallToolResult::error(vec![Content::text(format!("Unexpected error: {error}"))])
}

fn json_result<T: Serialize>(value: &T) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => unexpected(e),
    }
}

#[tool_router]
impl SplitLedgerService {
    #[tool(
        description = "Fetch the user's Splitwise friends with their Name, Id and net Balance. A negative balance means the user owes the friend, positive means the friend owes the user, zero means settled."
    )]
    pub async fn fetch_friends_data(&self) -> Result<CallToolResult, McpError> {
        Ok(match self.ledger.fetch_friends().await {
            Ok(friends) => json_result(&friends),
            Err(e) => unexpected(e),
        })
    }

    #[tool(
        description = "Retrieve the user's Splitwise expenses from the last num_days days: id, description, cost, details, creator, date, group name ('Non-group expenses' when ungrouped) and currency code."
    )]
    pub async fn get_expenses_last_n_days(
        &self,
        Parameters(request): Parameters<ExpensesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let num_days = match request.days() {
            Ok(days) => days,
            Err(reason) => return Ok(unexpected(reason)),
        };
        Ok(match self.ledger.expenses_last_n_days(num_days).await {
            Ok(expenses) => json_result(&expenses),
            Err(e) => unexpected(e),
        })
    }

    #[tool(
        description = "Create a Splitwise expense split equally among the participants and paid in full by paid_by. Participants are matched to the user and their friends by name; unmatched names are skipped and reported."
    )]
    pub async fn create_splitwise_expense(
        &self,
        Parameters(request): Parameters<CreateExpenseRequest>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .ledger
            .create_expense(
                &request.participants,
                &request.paid_by,
                request.amount,
                &request.description,
            )
            .await;

        Ok(match outcome {
            Ok(submission) => CallToolResult::success(vec![Content::text(submission.message())]),
            Err(e) => unexpected(e),
        })
    }

    #[tool(
        description = "Create a Splitwise group and add users to it by first name, last name and email (parallel lists of equal length). Best-effort: returns the created group and a per-member outcome so failed adds can be retried."
    )]
    pub async fn create_splitwise_group(
        &self,
        Parameters(request): Parameters<CreateGroupRequest>,
    ) -> Result<CallToolResult, McpError> {
        let creation = match request.members() {
            Ok(members) => {
                self.ledger
                    .create_group_with_members(&request.group_name, &members)
                    .await
            }
            Err(reason) => GroupCreation::failed(reason),
        };
        Ok(json_result(&creation))
    }
}

#[tool_handler]
impl ServerHandler for SplitLedgerService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("SplitLedger manages a Splitwise account. Use 'fetch_friends_data' for friends and balances, 'get_expenses_last_n_days' for recent expenses, 'create_splitwise_expense' to add an equally split expense, and 'create_splitwise_group' to create a group with members.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}
