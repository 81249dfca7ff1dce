//! Identity-to-Team Reconciliation Engine
//!
//! This crate keeps workspace team rosters mirroring directory group
//! rosters:
//! - Rule resolution: expanding configured rules into concrete
//!   (group, team name) pairs, with deterministic team name derivation
//! - Reconciliation: idempotent set-difference membership sync under a
//!   mass-removal safety ceiling, with per-rule failure isolation
//! - Orphan detection: workspace members left outside every synced team
//!
//! The engine consumes the two client capabilities defined in
//! `teamsync-core` and performs no I/O of its own beyond them. Rules and
//! pairs are processed sequentially; re-running a sync is the expected
//! recovery path for transient per-member errors.

pub mod orphans;
pub mod resolver;
pub mod syncer;

pub use orphans::OrphanDetector;
pub use resolver::{compute_team_name, RuleResolver};
pub use syncer::Syncer;
