use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::DashboardResult;
use crate::records::{OwnerRoster, PlayerRecord, RecordStore};

/// Synthetic league for demos and benchmarks. Same seed, same league.
pub fn generate_league(owners: usize, players_per_owner: usize, seed: u64) -> DashboardResult<RecordStore> {
    let mut rng = StdRng::seed_from_u64(seed);
    let names: Vec<String> = (1..=owners).map(|i| format!("Owner {i}")).collect();

    let mut records = Vec::with_capacity(owners * players_per_owner);
    for (o, owner) in names.iter().enumerate() {
        for p in 1..=players_per_owner {
            let bowler = rng.gen_bool(0.35);
            let runs = if bowler {
                rng.gen_range(0..30)
            } else {
                rng.gen_range(0..160)
            };
            let wickets = if bowler { rng.gen_range(0..8) } else { 0 };
            records.push(PlayerRecord {
                owner: owner.clone(),
                player_name: format!("Player {}-{p}", o + 1),
                team_id: rng.gen_range(1..=10),
                runs,
                wickets,
                player_id: Some((o * players_per_owner + p) as u64),
            });
        }
    }

    // Interleave owners so the players table is not pre-grouped.
    records.sort_by_key(|r| r.player_id.map(|id| id % 7));
    RecordStore::new(OwnerRoster::new(names), records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{summarize, totals};

    #[test]
    fn same_seed_same_league() {
        let a = generate_league(4, 5, 7).unwrap();
        let b = generate_league(4, 5, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn every_owner_gets_its_players() {
        let store = generate_league(6, 11, 1).unwrap();
        let summaries = summarize(store.roster(), store.records());
        assert!(summaries.iter().all(|s| s.player_count == 11));
        assert_eq!(totals(&summaries).players, 66);
    }
}
