use crate::Value;
use thiserror::Error;

/// Server error raised when a statement references a table that does not exist.
pub const ER_NO_SUCH_TABLE: u16 = 1146;
/// Server error raised when a statement references a column that does not exist.
pub const ER_BAD_FIELD_ERROR: u16 = 1054;
/// Server error raised by `CREATE TABLE` on a table that already exists.
pub const ER_TABLE_EXISTS_ERROR: u16 = 1050;
/// Server error raised by `ALTER TABLE .. ADD COLUMN` on a column that already exists.
pub const ER_DUP_FIELDNAME: u16 = 1060;
/// Server error raised when a `NOT NULL` column without default is missing from an insert.
pub const ER_NO_DEFAULT_FOR_FIELD: u16 = 1364;

/// The entity declaration is not usable.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Type `{entity}` does not declare a table, add #[table_name(\"..\")] to it")]
    MissingTableDeclaration { entity: &'static str },
}

/// A stored value does not fit the shape of the field it is decoded into.
#[derive(Debug, Error)]
#[error("Cannot convert {found} into `{expected}`")]
pub struct ConversionError {
    pub expected: &'static str,
    pub found: String,
}

impl ConversionError {
    pub fn new(value: &Value, expected: &'static str) -> Self {
        Self {
            expected,
            found: format!("{:?}", value),
        }
    }
}

#[derive(Debug, Error)]
pub enum NotFoundError {
    #[error("Type `{entity}` does not declare a primary column")]
    PrimaryColumn { entity: &'static str },
    #[error("Table `{table}` has no row with primary value {primary}")]
    Row { table: &'static str, primary: String },
}

/// Fault reported by the server, carrying the vendor error code.
#[derive(Debug, Error)]
#[error("Server error {code}: {message}")]
pub struct ExecutionError {
    pub code: u16,
    pub message: String,
}

impl ExecutionError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
    pub fn is_missing_table(&self) -> bool {
        self.code == ER_NO_SUCH_TABLE
    }
    pub fn is_unknown_column(&self) -> bool {
        self.code == ER_BAD_FIELD_ERROR
    }
    /// Finds which of the candidate columns the server complained about.
    ///
    /// MySQL reports it quoted: `Unknown column 'age' in 'field list'`.
    pub fn unknown_column<'a>(&self, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
        if !self.is_unknown_column() {
            return None;
        }
        candidates
            .into_iter()
            .find(|column| self.message.contains(&format!("'{}'", column)))
    }
}

/// The caller passed something the operation cannot work with.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ArgumentError(pub String);

impl ArgumentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Returns the vendor code if the error (or anything in its context chain) came from the server.
pub fn execution_code(error: &crate::Error) -> Option<u16> {
    error.downcast_ref::<ExecutionError>().map(|e| e.code)
}
