pub mod aggregate;
pub mod charts;
pub mod csv;
pub mod dataset;
pub mod error;
pub mod export;
pub mod fake_league;
pub mod join;
pub mod persist;
pub mod records;
pub mod report;
pub mod sample;
pub mod selection;
pub mod settings;
pub mod state;
pub mod views;
