use crate::aggregate::OwnerSummary;
use crate::records::PlayerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Runs,
    Wickets,
}

/// Parallel category/value sequences for one bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Series {
    pub categories: Vec<String>,
    pub values: Vec<u64>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn max_value(&self) -> u64 {
        self.values.iter().copied().max().unwrap_or(0)
    }

    pub fn points(&self) -> impl Iterator<Item = (&str, u64)> {
        self.categories
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Series,
}

pub fn series_for(summaries: &[OwnerSummary], metric: Metric) -> Series {
    Series {
        categories: summaries.iter().map(|s| s.owner.clone()).collect(),
        values: summaries
            .iter()
            .map(|s| match metric {
                Metric::Runs => s.total_runs,
                Metric::Wickets => s.total_wickets,
            })
            .collect(),
    }
}

/// Runs per player for one owner. Exact, case-sensitive owner match; record order kept.
pub fn series_for_owner(owner: &str, records: &[PlayerRecord]) -> Series {
    let (categories, values) = records
        .iter()
        .filter(|r| r.owner == owner)
        .map(|r| (r.player_name.clone(), u64::from(r.runs)))
        .unzip();
    Series { categories, values }
}

pub fn owner_metric_chart(summaries: &[OwnerSummary], metric: Metric) -> ChartSpec {
    let (title, y_label) = match metric {
        Metric::Runs => ("Total Runs Scored by Each Owner's Players", "Total Runs"),
        Metric::Wickets => ("Total Wickets Taken by Each Owner's Players", "Total Wickets"),
    };
    ChartSpec {
        title: title.to_string(),
        x_label: "Owner".to_string(),
        y_label: y_label.to_string(),
        series: series_for(summaries, metric),
    }
}

pub fn owner_players_chart(owner: &str, series: Series) -> ChartSpec {
    ChartSpec {
        title: format!("Runs Scored by {owner}'s Players"),
        x_label: "Player".to_string(),
        y_label: "Runs".to_string(),
        series,
    }
}
