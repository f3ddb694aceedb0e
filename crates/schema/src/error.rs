//! Error types for schema translation
//!
//! Every failure is raised before any statement is returned, so callers never
//! receive a partially rendered migration.

use thiserror::Error;

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Error types for schema translation and manifest loading
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Logical column type has no mapping for the active dialect
    #[error("Unknown column type '{type_name}'{}", dialect_suffix(.dialect))]
    UnknownType {
        type_name: String,
        dialect: Option<String>,
    },

    /// Command kind has no grammar method
    #[error("Unsupported command '{command}'{}", dialect_suffix(.dialect))]
    UnsupportedCommand {
        command: String,
        dialect: Option<String>,
    },

    /// Identifier is unsafe for the dialect's quoting scheme
    #[error("Malformed identifier '{identifier}': {reason}")]
    MalformedIdentifier { identifier: String, reason: String },

    /// Key, drop or alter command without any columns
    #[error("Command '{command}' requires at least one column")]
    EmptyColumnList { command: String },

    /// Column parameters that cannot produce a valid type
    #[error("Invalid column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },

    /// Required manifest field is absent
    #[error("Missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// Grammar configuration rejected by validation
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

fn dialect_suffix(dialect: &Option<String>) -> String {
    match dialect {
        Some(name) => format!(" for the {} grammar", name),
        None => String::new(),
    }
}

impl SchemaError {
    /// Create an unknown type error
    pub fn unknown_type(type_name: impl Into<String>, dialect: Option<&str>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
            dialect: dialect.map(str::to_string),
        }
    }

    /// Create an unsupported command error
    pub fn unsupported_command(command: impl Into<String>, dialect: Option<&str>) -> Self {
        Self::UnsupportedCommand {
            command: command.into(),
            dialect: dialect.map(str::to_string),
        }
    }

    /// Create a malformed identifier error
    pub fn malformed_identifier(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Create an empty column list error
    pub fn empty_columns(command: impl Into<String>) -> Self {
        Self::EmptyColumnList {
            command: command.into(),
        }
    }

    /// Create an invalid column error
    pub fn invalid_column(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColumn {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_message_names_dialect() {
        let err = SchemaError::unknown_type("enum", Some("mysql"));
        assert_eq!(
            err.to_string(),
            "Unknown column type 'enum' for the mysql grammar"
        );

        let err = SchemaError::unknown_type("uuid", None);
        assert_eq!(err.to_string(), "Unknown column type 'uuid'");
    }

    #[test]
    fn test_unsupported_command_message() {
        let err = SchemaError::unsupported_command("drop_table", None);
        assert_eq!(err.to_string(), "Unsupported command 'drop_table'");
    }
}
