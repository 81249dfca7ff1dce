//! Client capability contracts consumed by the reconciliation engine
//!
//! The engine is wired with explicitly constructed instances of these
//! traits; credential and token lifecycle lives behind the
//! implementations, never in the engine itself.

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{Group, GroupMembers, Team};

/// Query capability against the external identity directory
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// List all directory groups.
    async fn list_groups(&self) -> Result<Vec<Group>>;

    /// Resolve a group by exact display name.
    ///
    /// Returns [`SyncError::GroupNotFound`](crate::SyncError::GroupNotFound)
    /// if no group matches.
    async fn get_group_by_name(&self, name: &str) -> Result<Group>;

    /// Fetch the resolved member roster of a group.
    ///
    /// Only directory users in an active state are considered; users
    /// without a derivable workspace identity are tracked under
    /// `skipped_no_identity` rather than silently dropped.
    async fn get_group_members(&self, group_id: &str) -> Result<GroupMembers>;
}

/// Membership management capability against the collaboration platform
#[async_trait]
pub trait TeamMembershipClient: Send + Sync {
    /// Fetch a team by name, returning `None` if it does not exist.
    async fn get_team(&self, name: &str) -> Result<Option<Team>>;

    /// Create a team with the given visibility.
    async fn create_team(&self, name: &str, visibility: &str) -> Result<Team>;

    /// List current member identities of a team.
    async fn get_team_members(&self, slug: &str) -> Result<Vec<String>>;

    /// Add a member to a team.
    async fn add_team_member(&self, slug: &str, username: &str) -> Result<()>;

    /// Remove a member from a team.
    async fn remove_team_member(&self, slug: &str, username: &str) -> Result<()>;

    /// Check whether a user is an outside collaborator rather than a full
    /// organization member. Outside collaborators are never removed.
    async fn is_outside_collaborator(&self, username: &str) -> Result<bool>;

    /// List all full members of the workspace organization.
    async fn list_workspace_members(&self) -> Result<Vec<String>>;
}
