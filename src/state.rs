use std::collections::VecDeque;

use crate::aggregate::{self, LeagueTotals, OwnerSummary};
use crate::charts::{self, ChartSpec, Metric, Series};
use crate::error::DashboardError;
use crate::records::{OwnerRoster, RecordStore};
use crate::views::{self, TableModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Overview,
    Players,
    ByOwner,
}

/// Messages into the dashboard state. Applied on the UI thread between frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delta {
    Log(String),
    OwnerSeries { owner: String, series: Series },
}

/// Everything derived from one `RecordStore`, computed once per load.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub source: String,
    pub loaded_at: String,
    pub roster: OwnerRoster,
    pub summaries: Vec<OwnerSummary>,
    pub totals: LeagueTotals,
    pub owner_table: TableModel,
    pub players_table: TableModel,
    pub top_table: TableModel,
    pub runs_chart: ChartSpec,
    pub wickets_chart: ChartSpec,
}

impl Dashboard {
    pub fn build(store: &RecordStore, source: impl Into<String>, top_n: usize) -> Self {
        let summaries = aggregate::summarize(store.roster(), store.records());
        Self {
            source: source.into(),
            loaded_at: chrono::Local::now().format("%H:%M:%S").to_string(),
            roster: store.roster().clone(),
            totals: aggregate::totals(&summaries),
            owner_table: views::owner_summary_table(&summaries),
            players_table: views::all_players_table(store.records()),
            top_table: views::top_players_table(store.roster(), store.records(), top_n),
            runs_chart: charts::owner_metric_chart(&summaries, Metric::Runs),
            wickets_chart: charts::owner_metric_chart(&summaries, Metric::Wickets),
            summaries,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DataState {
    Ready(Box<Dashboard>),
    Unavailable(DashboardError),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub data: DataState,
    pub selected_owner: Option<String>,
    pub owner_chart: Option<ChartSpec>,
    pub players_scroll: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Overview,
            data: DataState::Unavailable(DashboardError::Load("not loaded yet".to_string())),
            selected_owner: None,
            owner_chart: None,
            players_scroll: 0,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn set_dashboard(&mut self, dashboard: Dashboard) {
        self.data = DataState::Ready(Box::new(dashboard));
        self.owner_chart = None;
        self.selected_owner = None;
        self.players_scroll = 0;
    }

    pub fn set_unavailable(&mut self, err: DashboardError) {
        self.push_log(format!("[WARN] {err}"));
        self.data = DataState::Unavailable(err);
        self.owner_chart = None;
        self.selected_owner = None;
        self.players_scroll = 0;
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        match &self.data {
            DataState::Ready(dashboard) => Some(&**dashboard),
            DataState::Unavailable(_) => None,
        }
    }

    pub fn cycle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Overview => Screen::Players,
            Screen::Players => Screen::ByOwner,
            Screen::ByOwner => Screen::Overview,
        };
    }

    pub fn scroll_players_down(&mut self, visible: usize) {
        let total = self.dashboard().map(|d| d.players_table.nrows()).unwrap_or(0);
        let max_scroll = total.saturating_sub(visible.max(1));
        self.players_scroll = (self.players_scroll + 1).min(max_scroll);
    }

    pub fn scroll_players_up(&mut self) {
        self.players_scroll = self.players_scroll.saturating_sub(1);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Log(msg) => state.push_log(msg),
        Delta::OwnerSeries { owner, series } => {
            // A series for an owner that is not in the loaded data is stale.
            let known = state
                .dashboard()
                .map(|d| d.roster.contains(&owner))
                .unwrap_or(false);
            if !known {
                return;
            }
            state.owner_chart = Some(charts::owner_players_chart(&owner, series));
            state.selected_owner = Some(owner);
        }
    }
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Overview => "OVERVIEW",
        Screen::Players => "PLAYERS",
        Screen::ByOwner => "BY OWNER",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::record;

    fn store() -> RecordStore {
        RecordStore::new(
            OwnerRoster::new(vec!["Sai".into(), "Mohit".into()]),
            vec![record("Sai", "Rinku Singh", 12, 0), record("Sai", "Virat Kohli", 59, 0)],
        )
        .unwrap()
    }

    #[test]
    fn dashboard_builds_all_views() {
        let dashboard = Dashboard::build(&store(), "test", 3);
        assert_eq!(dashboard.owner_table.nrows(), 2);
        assert_eq!(dashboard.players_table.nrows(), 2);
        assert_eq!(dashboard.runs_chart.series.values, vec![71, 0]);
        assert_eq!(dashboard.totals.players, 2);
    }

    #[test]
    fn owner_series_delta_updates_chart() {
        let mut state = AppState::new();
        state.set_dashboard(Dashboard::build(&store(), "test", 3));
        apply_delta(
            &mut state,
            Delta::OwnerSeries {
                owner: "Mohit".to_string(),
                series: Series::default(),
            },
        );
        assert_eq!(state.selected_owner.as_deref(), Some("Mohit"));
        let chart = state.owner_chart.as_ref().unwrap();
        assert!(chart.series.is_empty());
    }

    #[test]
    fn owner_series_without_data_is_dropped() {
        let mut state = AppState::new();
        apply_delta(
            &mut state,
            Delta::OwnerSeries {
                owner: "Sai".to_string(),
                series: Series::default(),
            },
        );
        assert!(state.owner_chart.is_none());
    }

    #[test]
    fn log_buffer_is_bounded() {
        let mut state = AppState::new();
        for i in 0..250 {
            apply_delta(&mut state, Delta::Log(format!("line {i}")));
        }
        assert_eq!(state.logs.len(), 200);
        assert_eq!(state.logs.front().map(String::as_str), Some("line 50"));
    }

    #[test]
    fn scroll_is_clamped_to_rows() {
        let mut state = AppState::new();
        state.set_dashboard(Dashboard::build(&store(), "test", 3));
        state.scroll_players_down(1);
        state.scroll_players_down(1);
        state.scroll_players_down(1);
        assert_eq!(state.players_scroll, 1);
        state.scroll_players_up();
        state.scroll_players_up();
        assert_eq!(state.players_scroll, 0);
    }
}
