use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating name tables.
///
/// A key or table that simply does not exist is not an error; lookups
/// report that as `None` and leave fallback to the caller.
#[derive(Error, Debug)]
pub enum NamesError {
    /// Reading table data or configuration failed
    #[error("Failed to read name data: {0}")]
    Io(#[from] std::io::Error),
    /// A table document (or config file) was not valid JSON for its schema
    #[error("Malformed JSON in {source_name}: {source}")]
    Json {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },
    /// A file stem did not match `<Domain>Names[_<locale>]`
    #[error("Unrecognized table name '{0}'")]
    TableName(String),
    /// A locale identifier could not be parsed
    #[error("Invalid locale identifier '{0}'")]
    InvalidLocale(String),
    /// The same key appears twice in one table
    #[error("Duplicate key '{key}' in table {table}")]
    DuplicateKey { table: String, key: String },
    /// Two sources produced a table with the same id
    #[error("Table {0} was loaded more than once")]
    DuplicateTable(String),
    /// A value has the wrong shape for its key
    #[error("Value for '{key}' in table {table} must be {expected}")]
    UnexpectedValue {
        table: String,
        key: String,
        expected: &'static str,
    },
    /// A time zone name tuple does not have exactly six elements
    #[error("Time zone names for '{key}' in table {table} have {len} elements, expected 6")]
    ZoneArity { table: String, key: String, len: usize },
    /// A zone entry refers to a name set the table does not define
    #[error("Entry '{key}' in table {table} refers to unknown name set '{set}'")]
    UnknownNameSet {
        table: String,
        key: String,
        set: String,
    },
    /// Name sets are only meaningful in time zone tables
    #[error("Table {0} defines name sets but is not a time zone table")]
    MisplacedNameSets(String),
    /// The configured data folder does not exist
    #[error("Data folder not found: {}", .0.display())]
    MissingDataFolder(PathBuf),
}

impl NamesError {
    pub(crate) fn json(source_name: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            source_name: source_name.into(),
            source,
        }
    }
}
