//! Reconciliation coordinator - membership deltas, safety ceiling, and
//! per-rule failure isolation

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info, warn};

use teamsync_core::{
    DirectoryClient, GroupInfo, Result, SyncError, SyncReport, SyncResult, SyncRule, Team,
    TeamMembershipClient, TeamSyncResult,
};

use crate::resolver::RuleResolver;

/// Coordinates reconciliation of directory groups to workspace teams.
///
/// Rules are processed independently: a misconfigured or failing rule
/// yields an error-only report and never blocks its siblings. The overall
/// run fails only when no rule resolved at all.
pub struct Syncer {
    workspace: Arc<dyn TeamMembershipClient>,
    resolver: RuleResolver,
    rules: Vec<SyncRule>,
    safety_ceiling: f64,
}

impl Syncer {
    /// Create a syncer over the two client capabilities.
    ///
    /// `safety_ceiling` is the maximum fraction of a team's current roster
    /// that one run may remove before member sync for that team is
    /// withheld entirely.
    pub fn new(
        directory: Arc<dyn DirectoryClient>,
        workspace: Arc<dyn TeamMembershipClient>,
        rules: Vec<SyncRule>,
        safety_ceiling: f64,
    ) -> Self {
        Self {
            workspace,
            resolver: RuleResolver::new(directory),
            rules,
            safety_ceiling,
        }
    }

    /// Execute all enabled rules and return their reports.
    ///
    /// Returns [`SyncError::AllRulesFailed`] only when at least one rule
    /// failed and none resolved; otherwise the result includes failed
    /// rules as error-only reports alongside the successful ones.
    pub async fn sync(&self) -> Result<SyncResult> {
        let mut reports = Vec::new();
        let mut failed_rules = 0usize;
        let mut resolved_rules = 0usize;

        for rule in &self.rules {
            if !rule.is_enabled() {
                continue;
            }

            let pairs = match self.resolver.resolve(rule).await {
                Ok(pairs) => pairs,
                Err(e) => {
                    failed_rules += 1;
                    error!(rule = %rule.display_name(), error = %e, "sync rule failed");

                    // error-only report so the failure is visible to
                    // operators; no team name since none was touched
                    reports.push(SyncReport {
                        rule: rule.display_name(),
                        group: rule.group_name.clone().unwrap_or_default(),
                        errors: vec![e.to_string()],
                        ..Default::default()
                    });
                    continue;
                }
            };

            resolved_rules += 1;
            for (group, team_name) in pairs {
                let report = self.sync_group_to_team(rule, group, team_name).await;
                reports.push(report);
            }
        }

        if failed_rules > 0 && resolved_rules == 0 {
            return Err(SyncError::AllRulesFailed(failed_rules));
        }

        Ok(SyncResult { reports })
    }

    /// Reconcile a single directory group onto a workspace team.
    async fn sync_group_to_team(
        &self,
        rule: &SyncRule,
        group: GroupInfo,
        team_name: String,
    ) -> SyncReport {
        let mut report = SyncReport {
            rule: rule.display_name(),
            group: group.name.clone(),
            team: team_name.clone(),
            skipped_no_identity: group.skipped_no_identity.clone(),
            ..Default::default()
        };

        if !group.skipped_no_identity.is_empty() {
            warn!(
                group = %group.name,
                count = group.skipped_no_identity.len(),
                "directory users skipped due to missing workspace identity"
            );
        }

        let team = match self.ensure_team(rule, &team_name).await {
            Ok(team) => team,
            Err(e) => {
                report
                    .errors
                    .push(format!("failed to get team '{}': {}", team_name, e));
                return report;
            }
        };

        if !rule.should_sync_members() {
            return report;
        }

        match self.apply_membership(&team.slug, &group.members).await {
            Ok(result) => report.merge(result),
            Err(e) => {
                report.errors.push(format!(
                    "failed to sync members for team '{}': {}",
                    team.slug, e
                ));
            }
        }

        if report.has_changes() {
            info!(
                team = %team.slug,
                added = report.added.len(),
                removed = report.removed.len(),
                "team membership reconciled"
            );
        }

        report
    }

    /// Fetch the target team, creating it when the rule allows.
    async fn ensure_team(&self, rule: &SyncRule, team_name: &str) -> Result<Team> {
        match self.workspace.get_team(team_name).await? {
            Some(team) => Ok(team),
            None if rule.create_if_missing => {
                info!(team = team_name, visibility = rule.visibility(), "creating missing team");
                self.workspace.create_team(team_name, rule.visibility()).await
            }
            None => Err(SyncError::TeamNotFound(team_name.to_string())),
        }
    }

    /// Apply the membership delta for one team.
    ///
    /// Computes `to_add = desired \ current` and `to_remove = current \
    /// desired`, withholds all changes when the removal ratio exceeds the
    /// safety ceiling, and otherwise applies adds then removes, collecting
    /// per-member failures without stopping the batch.
    async fn apply_membership(&self, slug: &str, desired: &[String]) -> Result<TeamSyncResult> {
        let mut result = TeamSyncResult::new(slug);

        let current = self.workspace.get_team_members(slug).await?;

        let current_set: HashSet<&str> = current.iter().map(String::as_str).collect();
        let desired_set: HashSet<&str> = desired.iter().map(String::as_str).collect();

        // additions keep the desired list's order so partial failures are
        // deterministic
        let mut queued: HashSet<&str> = HashSet::new();
        let to_add: Vec<&str> = desired
            .iter()
            .map(String::as_str)
            .filter(|u| !current_set.contains(u) && queued.insert(*u))
            .collect();
        let to_remove: Vec<&str> = current
            .iter()
            .map(String::as_str)
            .filter(|u| !desired_set.contains(u))
            .collect();

        // circuit breaker: a directory outage or misconfiguration looks like
        // everyone left the group; withhold adds and removes alike
        if !current.is_empty() {
            let removal_ratio = to_remove.len() as f64 / current.len() as f64;
            if removal_ratio > self.safety_ceiling {
                let msg = format!(
                    "refusing to remove {} of {} members ({:.0}%) from team '{}': exceeds safety ceiling of {:.0}%",
                    to_remove.len(),
                    current.len(),
                    removal_ratio * 100.0,
                    slug,
                    self.safety_ceiling * 100.0
                );
                warn!(team = slug, "{}", msg);
                result.errors.push(msg);
                return Ok(result);
            }
        }

        for username in to_add {
            match self.workspace.add_team_member(slug, username).await {
                Ok(()) => result.added.push(username.to_string()),
                Err(e) => result.errors.push(format!(
                    "failed to add '{}' to team '{}': {}",
                    username, slug, e
                )),
            }
        }

        for username in to_remove {
            let outside = match self.workspace.is_outside_collaborator(username).await {
                Ok(outside) => outside,
                Err(e) => {
                    result.errors.push(format!(
                        "failed to check if '{}' is an outside collaborator: {}",
                        username, e
                    ));
                    continue;
                }
            };

            if outside {
                result
                    .skipped_outside_collaborators
                    .push(username.to_string());
                continue;
            }

            match self.workspace.remove_team_member(slug, username).await {
                Ok(()) => result.removed.push(username.to_string()),
                Err(e) => result.errors.push(format!(
                    "failed to remove '{}' from team '{}': {}",
                    username, slug, e
                )),
            }
        }

        Ok(result)
    }
}
