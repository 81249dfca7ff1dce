//! Rule resolution - expanding a sync rule into (group, team name) pairs

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, warn};

use teamsync_core::{DirectoryClient, GroupInfo, Result, SyncError, SyncRule};

/// Derive the target team name for a group under a rule.
///
/// A fixed `team_name` wins verbatim. Otherwise the group display name is
/// stripped of `strip_prefix`, prefixed with `team_prefix`, lowercased,
/// and every character outside `[a-z0-9-]` becomes `-`. The derivation is
/// pure: the same inputs always yield the same team name.
pub fn compute_team_name(group_name: &str, rule: &SyncRule) -> String {
    if let Some(team_name) = rule.team_name.as_deref().filter(|s| !s.is_empty()) {
        return team_name.to_string();
    }

    let mut name = group_name;
    if let Some(prefix) = rule.strip_prefix.as_deref().filter(|s| !s.is_empty()) {
        name = name.strip_prefix(prefix).unwrap_or(name);
    }

    let mut full = String::with_capacity(name.len());
    if let Some(prefix) = rule.team_prefix.as_deref() {
        full.push_str(prefix);
    }
    full.push_str(name);

    full.to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '-',
        })
        .collect()
}

/// Expands one sync rule into zero or more (group, team name) pairs
pub struct RuleResolver {
    directory: Arc<dyn DirectoryClient>,
}

impl RuleResolver {
    /// Create a resolver over a directory query capability.
    pub fn new(directory: Arc<dyn DirectoryClient>) -> Self {
        Self { directory }
    }

    /// Resolve a rule to concrete (group, team name) pairs.
    ///
    /// Pattern rules expand to every group whose display name matches;
    /// exact-name rules expand to exactly one group; rules with neither
    /// selector are inert and expand to nothing.
    pub async fn resolve(&self, rule: &SyncRule) -> Result<Vec<(GroupInfo, String)>> {
        if let Some(pattern) = rule.group_pattern.as_deref() {
            return self.resolve_pattern(rule, pattern).await;
        }
        if let Some(group_name) = rule.group_name.as_deref().filter(|s| !s.is_empty()) {
            return self.resolve_exact(rule, group_name).await;
        }

        debug!(rule = %rule.display_name(), "rule has no group selector, skipping");
        Ok(Vec::new())
    }

    async fn resolve_pattern(
        &self,
        rule: &SyncRule,
        pattern: &str,
    ) -> Result<Vec<(GroupInfo, String)>> {
        if pattern.is_empty() {
            return Err(SyncError::EmptyPattern);
        }

        let re = Regex::new(pattern).map_err(|e| SyncError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let groups = self.directory.list_groups().await?;

        let mut pairs = Vec::new();
        for group in groups {
            if !re.is_match(&group.name) {
                continue;
            }

            let roster = match self.directory.get_group_members(&group.id).await {
                Ok(roster) => roster,
                Err(e) => {
                    warn!(
                        group = %group.name,
                        error = %e,
                        "failed to fetch members for matched group, skipping"
                    );
                    continue;
                }
            };

            let team_name = compute_team_name(&group.name, rule);
            pairs.push((GroupInfo::from_parts(group, roster), team_name));
        }

        // A fixed team name shared by several matched groups would collapse
        // them into last-write-wins membership; reject the configuration.
        if rule.team_name.as_deref().is_some_and(|s| !s.is_empty()) && pairs.len() > 1 {
            return Err(SyncError::DuplicateTeamTarget {
                rule: rule.display_name(),
                team: rule.team_name.clone().unwrap_or_default(),
                count: pairs.len(),
            });
        }

        debug!(
            rule = %rule.display_name(),
            pattern,
            matched = pairs.len(),
            "expanded pattern rule"
        );

        Ok(pairs)
    }

    async fn resolve_exact(
        &self,
        rule: &SyncRule,
        group_name: &str,
    ) -> Result<Vec<(GroupInfo, String)>> {
        let group = self.directory.get_group_by_name(group_name).await?;
        let roster = self.directory.get_group_members(&group.id).await?;
        let team_name = compute_team_name(&group.name, rule);
        Ok(vec![(GroupInfo::from_parts(group, roster), team_name)])
    }
}
