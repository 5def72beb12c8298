//! Warehouse error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WarehouseError {
    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("warehouse connection failed: {0}")]
    Connection(String),

    #[error("SQL execution failed: {0}")]
    Sql(String),

    #[error("cloud error: {0}")]
    Cloud(#[from] siloflow_cloud::CloudError),
}

impl From<tokio_postgres::Error> for WarehouseError {
    fn from(err: tokio_postgres::Error) -> Self {
        WarehouseError::Sql(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WarehouseError>;
