use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub owner: String,
    pub player_name: String,
    pub team_id: u32,
    pub runs: u32,
    pub wickets: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<u64>,
}

/// Owner names in display order. Distinct and non-empty once it sits in a store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerRoster(Vec<String>);

impl OwnerRoster {
    pub fn new(owners: Vec<String>) -> Self {
        Self(owners)
    }

    /// First-seen owner order across `records`.
    pub fn first_seen(records: &[PlayerRecord]) -> Self {
        let mut seen = HashSet::new();
        let owners = records
            .iter()
            .filter(|r| seen.insert(r.owner.as_str()))
            .map(|r| r.owner.clone())
            .collect();
        Self(owners)
    }

    pub fn owners(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, owner: &str) -> bool {
        self.0.iter().any(|o| o == owner)
    }

    pub fn position(&self, owner: &str) -> Option<usize> {
        self.0.iter().position(|o| o == owner)
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Immutable, validated record set. Replace the whole store to reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStore {
    roster: OwnerRoster,
    records: Vec<PlayerRecord>,
}

impl RecordStore {
    pub fn new(roster: OwnerRoster, records: Vec<PlayerRecord>) -> DashboardResult<Self> {
        if roster.is_empty() {
            return Err(DashboardError::Load("roster has no owners".to_string()));
        }

        let mut seen = HashSet::with_capacity(roster.len());
        for owner in roster.iter() {
            if !seen.insert(owner) {
                return Err(DashboardError::DataIntegrity(format!(
                    "owner {owner:?} appears more than once in the roster"
                )));
            }
        }

        if let Some(orphan) = records.iter().find(|r| !seen.contains(r.owner.as_str())) {
            return Err(DashboardError::DataIntegrity(format!(
                "player {:?} references owner {:?} which is not in the roster",
                orphan.player_name, orphan.owner
            )));
        }

        Ok(Self { roster, records })
    }

    pub fn from_records(records: Vec<PlayerRecord>) -> DashboardResult<Self> {
        let roster = OwnerRoster::first_seen(&records);
        Self::new(roster, records)
    }

    pub fn roster(&self) -> &OwnerRoster {
        &self.roster
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn contains_owner(&self, owner: &str) -> bool {
        self.roster.contains(owner)
    }

    pub fn records_for<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a PlayerRecord> {
        self.records.iter().filter(move |r| r.owner == owner)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn record(owner: &str, name: &str, runs: u32, wickets: u32) -> PlayerRecord {
    PlayerRecord {
        owner: owner.to_string(),
        player_name: name.to_string(),
        team_id: 1,
        runs,
        wickets,
        player_id: None,
    }
}
