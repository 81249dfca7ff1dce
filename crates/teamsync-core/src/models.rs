//! Data model for directory-to-team reconciliation
//!
//! All entities here are created fresh per reconciliation run and handed
//! back to the caller as an immutable result; nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Default team visibility when a rule does not specify one
pub const DEFAULT_TEAM_VISIBILITY: &str = "closed";

/// A configured mapping from a directory group (or group pattern) to a
/// workspace team.
///
/// Exactly one of `group_pattern` / `group_name` selects the source
/// groups; a rule with neither selector resolves to zero pairs and is
/// inert rather than malformed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncRule {
    /// Rule identifier; falls back to the team or group name if absent
    pub name: Option<String>,
    /// Whether the rule is processed at all (defaults to true)
    pub enabled: Option<bool>,
    /// Regex selecting source groups by display name (unanchored)
    pub group_pattern: Option<String>,
    /// Exact display name of a single source group
    pub group_name: Option<String>,
    /// Prefix prepended to the derived team name
    pub team_prefix: Option<String>,
    /// Fixed team name, used verbatim instead of deriving one
    pub team_name: Option<String>,
    /// Prefix stripped from the group name before derivation
    pub strip_prefix: Option<String>,
    /// Whether membership is reconciled (defaults to true); when false,
    /// team existence alone is the goal
    pub sync_members: Option<bool>,
    /// Whether a missing target team is created
    pub create_if_missing: bool,
    /// Team visibility used on creation (defaults to "closed")
    pub team_visibility: Option<String>,
}

impl SyncRule {
    /// Returns true if the rule is enabled (defaults to true).
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Returns true if members should be synced (defaults to true).
    pub fn should_sync_members(&self) -> bool {
        self.sync_members.unwrap_or(true)
    }

    /// Returns the rule name, falling back to the team name, then the
    /// group name.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|s| !s.is_empty()) {
            return name.to_string();
        }
        if let Some(team) = self.team_name.as_deref().filter(|s| !s.is_empty()) {
            return team.to_string();
        }
        self.group_name.clone().unwrap_or_default()
    }

    /// Returns the visibility used when creating the target team.
    pub fn visibility(&self) -> &str {
        self.team_visibility
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_TEAM_VISIBILITY)
    }
}

/// Parse a JSON array of sync rules as supplied by the operator.
pub fn rules_from_json(raw: &str) -> Result<Vec<SyncRule>> {
    Ok(serde_json::from_str(raw)?)
}

/// A directory group handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Directory-assigned group identifier
    pub id: String,
    /// Group display name
    pub name: String,
}

/// Member roster of a directory group, resolved to workspace identities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupMembers {
    /// Workspace identities of active group members
    pub members: Vec<String>,
    /// Fallback identifiers (typically emails) of active members for whom
    /// no workspace identity could be derived
    pub skipped_no_identity: Vec<String>,
}

/// A directory group together with its resolved member roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupInfo {
    /// Directory-assigned group identifier
    pub id: String,
    /// Group display name
    pub name: String,
    /// Workspace identities of active group members
    pub members: Vec<String>,
    /// Active members skipped because no workspace identity was found
    pub skipped_no_identity: Vec<String>,
}

impl GroupInfo {
    /// Combine a group handle with its roster.
    pub fn from_parts(group: Group, roster: GroupMembers) -> Self {
        Self {
            id: group.id,
            name: group.name,
            members: roster.members,
            skipped_no_identity: roster.skipped_no_identity,
        }
    }
}

/// A workspace team handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Workspace-assigned team identifier
    pub id: u64,
    /// Team display name
    pub name: String,
    /// URL-safe team slug used for membership operations
    pub slug: String,
}

/// Result of applying a membership delta to one team
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamSyncResult {
    /// Slug of the team the delta was applied to
    pub team: String,
    /// Identities added to the team
    pub added: Vec<String>,
    /// Identities removed from the team
    pub removed: Vec<String>,
    /// Removal candidates skipped because they are outside collaborators
    pub skipped_outside_collaborators: Vec<String>,
    /// Per-member operation failures
    pub errors: Vec<String>,
}

impl TeamSyncResult {
    /// Create an empty result for a team.
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            ..Self::default()
        }
    }
}

/// Outcome of reconciling one resolved (group, team) pair
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    /// Name of the rule that produced this pair
    pub rule: String,
    /// Source directory group name
    pub group: String,
    /// Target workspace team name
    pub team: String,
    /// Identities added to the team
    pub added: Vec<String>,
    /// Identities removed from the team
    pub removed: Vec<String>,
    /// Removal candidates skipped because they are outside collaborators
    pub skipped_outside_collaborators: Vec<String>,
    /// Directory members skipped because no workspace identity was found
    pub skipped_no_identity: Vec<String>,
    /// Accumulated error strings, including rule-level failures
    pub errors: Vec<String>,
}

impl SyncReport {
    /// Returns true if members were added or removed.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// Returns true if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Fold a team-level membership result into this report.
    pub fn merge(&mut self, result: TeamSyncResult) {
        self.added = result.added;
        self.removed = result.removed;
        self.skipped_outside_collaborators = result.skipped_outside_collaborators;
        self.errors.extend(result.errors);
    }
}

/// All per-pair reports from one reconciliation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncResult {
    /// One report per resolved (group, team) pair, failed rules included
    pub reports: Vec<SyncReport>,
}

impl SyncResult {
    /// Returns true if any report carries errors.
    pub fn has_errors(&self) -> bool {
        self.reports.iter().any(|r| r.has_errors())
    }

    /// Unique names of teams touched by this run, in report order.
    ///
    /// Reports produced by a rule-level failure carry no team name and
    /// are excluded.
    pub fn team_names(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.reports
            .iter()
            .filter(|r| !r.team.is_empty())
            .filter(|r| seen.insert(r.team.clone()))
            .map(|r| r.team.clone())
            .collect()
    }
}

/// Workspace members present in no team touched by the last run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrphanedUsersReport {
    /// Orphaned workspace member identities
    pub orphaned_users: Vec<String>,
}
