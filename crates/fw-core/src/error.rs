use thiserror::Error;

pub type FwResult<T> = Result<T, FwError>;

#[derive(Error, Debug)]
pub enum FwError {
    #[error("Missing required column {column} in {table}")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("Missing required dataset: {what}")]
    MissingDataset { what: &'static str },

    #[error("Invalid geometry for {what}: {reason}")]
    InvalidGeometry { what: String, reason: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },

    #[error("Config error: {0}")]
    Config(String),
}
