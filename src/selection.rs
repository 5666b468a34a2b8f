use std::rc::Rc;
use std::sync::mpsc::Sender;

use crate::charts::{Series, series_for_owner};
use crate::error::{DashboardError, DashboardResult};
use crate::records::RecordStore;
use crate::state::Delta;

/// Holds the selected owner and pushes a fresh per-owner series to the
/// presentation layer every time the selection moves.
pub struct SelectionController {
    store: Rc<RecordStore>,
    current: usize,
    tx: Sender<Delta>,
}

impl SelectionController {
    /// Starts on the first roster owner. `RecordStore` guarantees the roster is non-empty.
    pub fn new(store: Rc<RecordStore>, tx: Sender<Delta>) -> Self {
        Self { store, current: 0, tx }
    }

    pub fn current(&self) -> &str {
        self.store.roster().get(self.current).unwrap_or_default()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn select(&mut self, owner: &str) -> DashboardResult<Series> {
        let Some(idx) = self.store.roster().position(owner) else {
            return Err(DashboardError::InvalidSelection(owner.to_string()));
        };
        self.current = idx;
        Ok(self.publish_current())
    }

    pub fn select_next(&mut self) -> Series {
        let len = self.store.roster().len();
        self.current = (self.current + 1) % len.max(1);
        self.publish_current()
    }

    pub fn select_prev(&mut self) -> Series {
        let len = self.store.roster().len().max(1);
        self.current = (self.current + len - 1) % len;
        self.publish_current()
    }

    /// Picks the owner after a (re)load and publishes it: the owner selected
    /// before, if still on the roster, then `requested`, then the first owner.
    /// A `requested` owner missing from the roster is handed back for reporting.
    pub fn restore(&mut self, previous: Option<&str>, requested: Option<&str>) -> Option<DashboardError> {
        if let Some(owner) = previous {
            if self.select(owner).is_ok() {
                return None;
            }
        }
        let rejected = requested.and_then(|owner| self.select(owner).err());
        if requested.is_none() || rejected.is_some() {
            self.publish_current();
        }
        rejected
    }

    /// Recomputes the series for the current owner and publishes it.
    pub fn publish_current(&self) -> Series {
        let owner = self.current().to_string();
        let series = series_for_owner(&owner, self.store.records());
        // A closed receiver only means the dashboard is going away.
        let _ = self.tx.send(Delta::OwnerSeries {
            owner,
            series: series.clone(),
        });
        series
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::records::{OwnerRoster, record};

    fn controller() -> (SelectionController, mpsc::Receiver<Delta>) {
        let roster = OwnerRoster::new(vec!["Sai".into(), "Mohit".into(), "Empty".into()]);
        let store = RecordStore::new(
            roster,
            vec![
                record("Sai", "Rinku Singh", 12, 0),
                record("Mohit", "Jasprit Bumrah", 2, 3),
                record("Sai", "Virat Kohli", 59, 0),
            ],
        )
        .unwrap();
        let (tx, rx) = mpsc::channel();
        (SelectionController::new(Rc::new(store), tx), rx)
    }

    #[test]
    fn starts_on_first_owner() {
        let (ctl, _rx) = controller();
        assert_eq!(ctl.current(), "Sai");
    }

    #[test]
    fn select_publishes_series() {
        let (mut ctl, rx) = controller();
        let series = ctl.select("Mohit").unwrap();
        assert_eq!(series.categories, vec!["Jasprit Bumrah"]);
        match rx.try_recv().unwrap() {
            Delta::OwnerSeries { owner, series } => {
                assert_eq!(owner, "Mohit");
                assert_eq!(series.values, vec![2]);
            }
            other => panic!("unexpected delta {other:?}"),
        }
    }

    #[test]
    fn invalid_selection_keeps_state_and_publishes_nothing() {
        let (mut ctl, rx) = controller();
        ctl.select("Mohit").unwrap();
        let _ = rx.try_recv();
        let err = ctl.select("Nobody").unwrap_err();
        assert_eq!(err, DashboardError::InvalidSelection("Nobody".to_string()));
        assert_eq!(ctl.current(), "Mohit");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn owner_without_players_yields_empty_series() {
        let (mut ctl, _rx) = controller();
        let series = ctl.select("Empty").unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn next_and_prev_wrap_around() {
        let (mut ctl, _rx) = controller();
        ctl.select_prev();
        assert_eq!(ctl.current(), "Empty");
        ctl.select_next();
        assert_eq!(ctl.current(), "Sai");
    }

    fn published_owners(rx: &mpsc::Receiver<Delta>) -> Vec<String> {
        rx.try_iter()
            .filter_map(|delta| match delta {
                Delta::OwnerSeries { owner, .. } => Some(owner),
                Delta::Log(_) => None,
            })
            .collect()
    }

    #[test]
    fn restore_keeps_previous_owner_across_reload() {
        let (mut ctl, rx) = controller();
        assert_eq!(ctl.restore(Some("Mohit"), Some("Empty")), None);
        assert_eq!(ctl.current(), "Mohit");
        assert_eq!(published_owners(&rx), vec!["Mohit"]);
    }

    #[test]
    fn restore_uses_requested_owner_when_previous_is_gone() {
        let (mut ctl, rx) = controller();
        assert_eq!(ctl.restore(Some("Departed"), Some("Empty")), None);
        assert_eq!(ctl.current(), "Empty");
        assert_eq!(published_owners(&rx), vec!["Empty"]);
    }

    #[test]
    fn restore_reports_unknown_requested_owner_and_shows_first() {
        let (mut ctl, rx) = controller();
        let err = ctl.restore(None, Some("Nobody"));
        assert_eq!(err, Some(DashboardError::InvalidSelection("Nobody".to_string())));
        assert_eq!(ctl.current(), "Sai");
        assert_eq!(published_owners(&rx), vec!["Sai"]);

        assert_eq!(ctl.restore(None, None), None);
        assert_eq!(published_owners(&rx), vec!["Sai"]);
    }

    #[test]
    fn dropped_receiver_does_not_fail_selection() {
        let (mut ctl, rx) = controller();
        drop(rx);
        assert!(ctl.select("Mohit").is_ok());
    }
}
