//! In-memory fakes for the directory and team membership capabilities

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use teamsync_core::{
    DirectoryClient, Group, GroupMembers, Result, SyncError, Team, TeamMembershipClient,
};

/// In-memory directory with configurable per-group failures
#[derive(Default)]
pub struct FakeDirectory {
    groups: Vec<Group>,
    rosters: HashMap<String, GroupMembers>,
    fail_members_for: HashSet<String>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, id: &str, name: &str, members: &[&str]) -> Self {
        self.groups.push(Group {
            id: id.to_string(),
            name: name.to_string(),
        });
        self.rosters.insert(
            id.to_string(),
            GroupMembers {
                members: members.iter().map(|s| s.to_string()).collect(),
                skipped_no_identity: Vec::new(),
            },
        );
        self
    }

    pub fn with_skipped(mut self, id: &str, skipped: &[&str]) -> Self {
        self.rosters
            .entry(id.to_string())
            .or_default()
            .skipped_no_identity = skipped.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn fail_members_for(mut self, id: &str) -> Self {
        self.fail_members_for.insert(id.to_string());
        self
    }
}

#[async_trait]
impl DirectoryClient for FakeDirectory {
    async fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(self.groups.clone())
    }

    async fn get_group_by_name(&self, name: &str) -> Result<Group> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .cloned()
            .ok_or_else(|| SyncError::GroupNotFound(name.to_string()))
    }

    async fn get_group_members(&self, group_id: &str) -> Result<GroupMembers> {
        if self.fail_members_for.contains(group_id) {
            return Err(SyncError::api(format!(
                "directory unavailable for group '{group_id}'"
            )));
        }
        Ok(self.rosters.get(group_id).cloned().unwrap_or_default())
    }
}

/// In-memory workspace with configurable per-user and per-team failures
#[derive(Default)]
pub struct FakeWorkspace {
    teams: Mutex<HashMap<String, Team>>,
    rosters: Mutex<HashMap<String, Vec<String>>>,
    created: Mutex<Vec<(String, String)>>,
    next_id: Mutex<u64>,
    workspace_members: Vec<String>,
    outside_collaborators: HashSet<String>,
    fail_add_for: HashSet<String>,
    fail_remove_for: HashSet<String>,
    fail_roster_for: HashSet<String>,
    fail_collab_check_for: HashSet<String>,
}

impl FakeWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_team(self, name: &str, members: &[&str]) -> Self {
        {
            let mut id = self.next_id.lock().unwrap();
            *id += 1;
            self.teams.lock().unwrap().insert(
                name.to_string(),
                Team {
                    id: *id,
                    name: name.to_string(),
                    slug: name.to_string(),
                },
            );
            self.rosters.lock().unwrap().insert(
                name.to_string(),
                members.iter().map(|s| s.to_string()).collect(),
            );
        }
        self
    }

    pub fn with_workspace_members(mut self, members: &[&str]) -> Self {
        self.workspace_members = members.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_outside_collaborator(mut self, username: &str) -> Self {
        self.outside_collaborators.insert(username.to_string());
        self
    }

    pub fn fail_add_for(mut self, username: &str) -> Self {
        self.fail_add_for.insert(username.to_string());
        self
    }

    pub fn fail_remove_for(mut self, username: &str) -> Self {
        self.fail_remove_for.insert(username.to_string());
        self
    }

    pub fn fail_roster_for(mut self, slug: &str) -> Self {
        self.fail_roster_for.insert(slug.to_string());
        self
    }

    pub fn fail_collab_check_for(mut self, username: &str) -> Self {
        self.fail_collab_check_for.insert(username.to_string());
        self
    }

    /// Current roster of a team, sorted for assertion stability.
    pub fn roster(&self, slug: &str) -> Vec<String> {
        let mut roster = self
            .rosters
            .lock()
            .unwrap()
            .get(slug)
            .cloned()
            .unwrap_or_default();
        roster.sort();
        roster
    }

    /// Teams created during the run as (name, visibility) pairs.
    pub fn created_teams(&self) -> Vec<(String, String)> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl TeamMembershipClient for FakeWorkspace {
    async fn get_team(&self, name: &str) -> Result<Option<Team>> {
        Ok(self.teams.lock().unwrap().get(name).cloned())
    }

    async fn create_team(&self, name: &str, visibility: &str) -> Result<Team> {
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        let team = Team {
            id: *id,
            name: name.to_string(),
            slug: name.to_string(),
        };
        self.teams
            .lock()
            .unwrap()
            .insert(name.to_string(), team.clone());
        self.rosters
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default();
        self.created
            .lock()
            .unwrap()
            .push((name.to_string(), visibility.to_string()));
        Ok(team)
    }

    async fn get_team_members(&self, slug: &str) -> Result<Vec<String>> {
        if self.fail_roster_for.contains(slug) {
            return Err(SyncError::api(format!(
                "roster unavailable for team '{slug}'"
            )));
        }
        Ok(self
            .rosters
            .lock()
            .unwrap()
            .get(slug)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_team_member(&self, slug: &str, username: &str) -> Result<()> {
        if self.fail_add_for.contains(username) {
            return Err(SyncError::api(format!("cannot add '{username}'")));
        }
        let mut rosters = self.rosters.lock().unwrap();
        let roster = rosters.entry(slug.to_string()).or_default();
        if !roster.iter().any(|m| m == username) {
            roster.push(username.to_string());
        }
        Ok(())
    }

    async fn remove_team_member(&self, slug: &str, username: &str) -> Result<()> {
        if self.fail_remove_for.contains(username) {
            return Err(SyncError::api(format!("cannot remove '{username}'")));
        }
        let mut rosters = self.rosters.lock().unwrap();
        if let Some(roster) = rosters.get_mut(slug) {
            roster.retain(|m| m != username);
        }
        Ok(())
    }

    async fn is_outside_collaborator(&self, username: &str) -> Result<bool> {
        if self.fail_collab_check_for.contains(username) {
            return Err(SyncError::api(format!(
                "membership lookup failed for '{username}'"
            )));
        }
        Ok(self.outside_collaborators.contains(username))
    }

    async fn list_workspace_members(&self) -> Result<Vec<String>> {
        Ok(self.workspace_members.clone())
    }
}
