//! Shared types for directory-to-team reconciliation
//!
//! This crate provides the pieces the reconciliation engine and its
//! callers agree on:
//! - Sync rules, group/team handles, and per-run report types
//! - The error taxonomy for rule resolution and membership sync
//! - The two client capability contracts (directory query and team
//!   membership management) the engine consumes

pub mod errors;
pub mod models;
pub mod traits;

pub use errors::{Result, SyncError};
pub use models::{
    rules_from_json, Group, GroupInfo, GroupMembers, OrphanedUsersReport, SyncReport, SyncResult,
    SyncRule, Team, TeamSyncResult, DEFAULT_TEAM_VISIBILITY,
};
pub use traits::{DirectoryClient, TeamMembershipClient};
