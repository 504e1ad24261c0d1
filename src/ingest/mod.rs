//! Ingestion drivers: find inputs, parse them and write them into a collection.
//!
//! # Error Handling Strategy
//!
//! - **Missing default locations**: `~/.claude/projects` or `~/.codex/sessions`
//!   not existing means there is nothing to ingest, not an error.
//! - **Per-file failures**: unreadable session logs are logged and counted. The run
//!   fails only when more than 50% of the discovered files fail.
//! - **Write failures**: propagated immediately; nothing is retried.

pub mod discovery;
pub mod pipeline;

pub use pipeline::{IngestReport, ingest, ingest_export, ingest_sessions, sync_collection};
