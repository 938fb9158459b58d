//! SplitLedger: Splitwise tools for AI agents.
//!
//! The `splitledger-mcp` binary serves [`tools::SplitLedgerService`] over stdio;
//! the `splitledger` binary runs the same operations from the command line.

pub mod config;
pub mod logging;
pub mod tools;
