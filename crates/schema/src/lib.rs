//! # blueprint-schema: Schema grammars for MySQL and PostgreSQL
//!
//! Build a table blueprint (columns, column changes and commands such as
//! create, index or drop), then compile it with a dialect grammar into
//! ordered DDL statements. Blueprints can also be loaded from YAML or JSON
//! manifests.
//!
//! ```
//! use blueprint_schema::{Dialect, GrammarConfig, Schema};
//!
//! let schema = Schema::for_dialect(Dialect::MySql, GrammarConfig::default()).unwrap();
//! let sql = schema
//!     .create("t", |table| {
//!         table.increments("id");
//!     })
//!     .unwrap();
//!
//! assert_eq!(sql, vec!["CREATE TABLE `t` (`id` INT NOT NULL AUTO_INCREMENT PRIMARY KEY)"]);
//! ```

pub mod command;
pub mod config;
pub mod dialect;
pub mod error;
pub mod grammars;
pub mod manifest;
pub mod schema;
pub mod security;
pub mod table;

// Re-export the types most callers need
pub use command::{Command, CommandKind, ForeignKey, IndexCommand, IndexKind, ReferentialAction};
pub use config::{GrammarConfig, IdentifierPolicy, QuoteStyle};
pub use dialect::Dialect;
pub use error::{SchemaError, SchemaResult};
pub use grammars::{grammar_for, MySqlGrammar, PostgresGrammar, SqlGrammar};
pub use manifest::{ColumnManifest, CommandManifest, SchemaManifest, TableManifest};
pub use schema::{implied_commands, Schema};
pub use table::{Column, ColumnType, DefaultValue, Table, DEFAULT_STRING_LENGTH};
