//! Orphaned user detection - workspace members outside every synced team

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use teamsync_core::{OrphanedUsersReport, Result, TeamMembershipClient};

/// Finds workspace members present in none of the teams a reconciliation
/// run just touched. Read-only; no safety ceiling applies.
pub struct OrphanDetector {
    workspace: Arc<dyn TeamMembershipClient>,
}

impl OrphanDetector {
    /// Create a detector over a team membership capability.
    pub fn new(workspace: Arc<dyn TeamMembershipClient>) -> Self {
        Self { workspace }
    }

    /// Detect workspace members absent from every team in `synced_teams`.
    ///
    /// Outside collaborators sit outside the normal team structure and are
    /// never flagged. A team whose roster cannot be fetched is excluded
    /// from coverage for this run (fail-open: more orphans may be
    /// reported, the detection never aborts for one team).
    pub async fn detect_orphans(&self, synced_teams: &[String]) -> Result<OrphanedUsersReport> {
        let members = self.workspace.list_workspace_members().await?;

        let mut covered: HashSet<String> = HashSet::new();
        for slug in synced_teams {
            match self.workspace.get_team_members(slug).await {
                Ok(roster) => covered.extend(roster),
                Err(e) => {
                    warn!(
                        team = %slug,
                        error = %e,
                        "failed to fetch team members for orphaned user check"
                    );
                }
            }
        }

        let mut orphaned_users = Vec::new();
        for member in members {
            if covered.contains(&member) {
                continue;
            }

            match self.workspace.is_outside_collaborator(&member).await {
                Ok(true) => {}
                Ok(false) => orphaned_users.push(member),
                Err(e) => {
                    warn!(
                        user = %member,
                        error = %e,
                        "failed to check collaborator status for orphaned user check"
                    );
                }
            }
        }

        Ok(OrphanedUsersReport { orphaned_users })
    }
}
