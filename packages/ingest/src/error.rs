use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("API client error: {0}")]
    Client(#[from] congress_client::ClientError),

    #[error("{entity} record missing required field '{field}'")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("sync run not found: {0}")]
    SyncRunNotFound(i64),

    #[error("invalid date: '{0}'. Expected YYYY-MM-DD (e.g., 2024-01-15)")]
    InvalidDate(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = IngestError::MissingField {
            entity: "bill",
            field: "number",
        };
        assert_eq!(err.to_string(), "bill record missing required field 'number'");
    }
}
