use once_cell::sync::Lazy;

use crate::error::DashboardResult;
use crate::records::{OwnerRoster, PlayerRecord, RecordStore};

pub const SAMPLE_SOURCE: &str = "builtin sample";

// (owner, player, team id, runs, wickets)
const SAMPLE_ROWS: &[(&str, &str, u32, u32, u32)] = &[
    ("Sai", "Rinku Singh", 9, 12, 0),
    ("Sai", "Virat Kohli", 3, 59, 0),
    ("Sai", "Rashid Khan", 10, 18, 4),
    ("Mohit", "Shubman Gill", 10, 84, 0),
    ("Mohit", "Jasprit Bumrah", 7, 0, 6),
    ("Mohit", "Heinrich Klaasen", 8, 66, 0),
    ("Aman", "Suryakumar Yadav", 7, 47, 0),
    ("Aman", "Yuzvendra Chahal", 5, 1, 5),
    ("Aman", "Travis Head", 8, 102, 0),
    ("Priya", "Sunil Narine", 9, 71, 3),
    ("Priya", "Ravindra Jadeja", 4, 25, 2),
    ("Priya", "KL Rahul", 6, 38, 0),
];

const SAMPLE_ROSTER: &[&str] = &["Sai", "Mohit", "Aman", "Priya", "Karan"];

static SAMPLE: Lazy<DashboardResult<RecordStore>> = Lazy::new(|| {
    let roster = OwnerRoster::new(SAMPLE_ROSTER.iter().map(|o| o.to_string()).collect());
    let records = SAMPLE_ROWS
        .iter()
        .map(|&(owner, name, team_id, runs, wickets)| PlayerRecord {
            owner: owner.to_string(),
            player_name: name.to_string(),
            team_id,
            runs,
            wickets,
            player_id: None,
        })
        .collect();
    RecordStore::new(roster, records)
});

/// Embedded roster used when no data source is configured. "Karan" has no
/// players yet and shows up as an all-zero row. Built and validated once.
pub fn sample() -> DashboardResult<&'static RecordStore> {
    (*SAMPLE).as_ref().map_err(Clone::clone)
}

/// Owned copy of [`sample`] for callers that keep the store.
pub fn sample_store() -> DashboardResult<RecordStore> {
    sample().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_consistent() {
        let store = sample_store().unwrap();
        assert_eq!(store.roster().len(), SAMPLE_ROSTER.len());
        assert_eq!(store.len(), SAMPLE_ROWS.len());
        assert_eq!(store.records_for("Karan").count(), 0);
    }

    #[test]
    fn sample_is_built_once() {
        let first = sample().unwrap();
        let second = sample().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(&sample_store().unwrap(), first);
    }
}
