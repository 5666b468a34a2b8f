use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// Backing data missing or malformed. Nothing downstream should render.
    #[error("no data: {0}")]
    Load(String),
    #[error("owner {0:?} is not in the roster")]
    InvalidSelection(String),
    #[error("data integrity: {0}")]
    DataIntegrity(String),
}

impl DashboardError {
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::InvalidSelection(_) => "selection",
            Self::DataIntegrity(_) => "integrity",
        }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
