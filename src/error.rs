use thiserror::Error;

#[derive(Error, Debug)]
pub enum RaceError {
    #[error("CSV file not found: {0}")]
    NotFound(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config ({context}): {detail}")]
    Config {
        context: &'static str,
        detail: String,
    },

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("{0}")]
    General(String),
}

impl RaceError {
    /// HTTP-equivalent status for a load failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            _ => 500,
        }
    }
}

#[cfg(feature = "python")]
impl From<RaceError> for pyo3::PyErr {
    fn from(err: RaceError) -> pyo3::PyErr {
        pyo3::exceptions::PyRuntimeError::new_err(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for RaceError {
    fn from(err: pyo3::PyErr) -> Self {
        RaceError::General(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_file_is_not_found() {
        assert_eq!(RaceError::NotFound("x.csv".into()).status_code(), 404);
        assert_eq!(RaceError::MissingColumn("Year".into()).status_code(), 500);
        assert_eq!(RaceError::InvalidData("bad".into()).status_code(), 500);
    }
}
