//! Schema grammars
//!
//! A grammar translates a [`Table`] blueprint and one [`Command`] into SQL
//! statements for a single dialect. Grammars hold nothing but their resolved
//! quoting rules, so one instance can be shared freely between threads.

pub mod mysql;
pub mod postgres;

pub use mysql::MySqlGrammar;
pub use postgres::PostgresGrammar;

use crate::command::{Command, ForeignKey, IndexCommand};
use crate::config::{GrammarConfig, QuoteStyle};
use crate::dialect::Dialect;
use crate::error::{SchemaError, SchemaResult};
use crate::security;
use crate::table::{Column, Table};

/// Dialect-specific DDL translation
pub trait SqlGrammar: Send + Sync {
    /// Dialect this grammar renders
    fn dialect(&self) -> Dialect;

    /// Resolved quoting rules
    fn style(&self) -> &QuoteStyle;

    /// Quote an identifier
    fn wrap(&self, identifier: &str) -> SchemaResult<String> {
        security::wrap(identifier, self.style())
    }

    /// Quote and comma-join a list of column names
    fn columnize(&self, columns: &[String]) -> SchemaResult<String> {
        security::columnize(columns, self.style())
    }

    /// Render a string literal
    fn literal(&self, value: &str) -> String {
        security::quote_literal(value, self.style())
    }

    /// SQL type for a column
    fn type_sql(&self, column: &Column) -> SchemaResult<String>;

    /// Column definitions, in table order
    fn columns(&self, table: &Table) -> SchemaResult<Vec<String>>;

    fn create(&self, table: &Table) -> SchemaResult<Vec<String>>;

    fn add(&self, table: &Table) -> SchemaResult<Vec<String>>;

    fn primary(&self, table: &Table, command: &IndexCommand) -> SchemaResult<String>;

    fn unique(&self, table: &Table, command: &IndexCommand) -> SchemaResult<String>;

    fn fulltext(&self, table: &Table, command: &IndexCommand) -> SchemaResult<String>;

    fn index(&self, table: &Table, command: &IndexCommand) -> SchemaResult<String>;

    /// Add a foreign key constraint
    fn foreign(&self, table: &Table, foreign: &ForeignKey) -> SchemaResult<String> {
        require_columns("foreign", &foreign.columns)?;
        require_columns("foreign", &foreign.references)?;
        if foreign.on.is_empty() {
            return Err(SchemaError::missing_field(
                "on",
                format!("foreign key on table '{}'", table.name),
            ));
        }

        let name = foreign.constraint_name(&table.name);
        security::validate_name(&name)?;

        let mut sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.wrap(&table.name)?,
            name,
            self.columnize(&foreign.columns)?,
            self.wrap(&foreign.on)?,
            self.columnize(&foreign.references)?
        );

        if let Some(action) = foreign.on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(action.as_sql());
        }

        if let Some(action) = foreign.on_update {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action.as_sql());
        }

        Ok(sql)
    }

    fn rename(&self, table: &Table, to: &str) -> SchemaResult<String>;

    /// Drop the whole table
    fn drop_table(&self, table: &Table) -> SchemaResult<String> {
        Ok(format!("DROP TABLE {}", self.wrap(&table.name)?))
    }

    fn drop_column(&self, table: &Table, columns: &[String]) -> SchemaResult<String>;

    fn drop_primary(&self, table: &Table) -> SchemaResult<String>;

    fn drop_unique(&self, table: &Table, name: &str) -> SchemaResult<String>;

    fn drop_fulltext(&self, table: &Table, name: &str) -> SchemaResult<String>;

    fn drop_index(&self, table: &Table, name: &str) -> SchemaResult<String>;

    fn drop_foreign(&self, table: &Table, name: &str) -> SchemaResult<String>;

    /// Render one command against the table
    fn compile(&self, table: &Table, command: &Command) -> SchemaResult<Vec<String>> {
        tracing::debug!(
            dialect = %self.dialect(),
            table = %table.name,
            command = %command.kind(),
            "compiling schema command"
        );

        let statement = match command {
            Command::Create => return self.create(table),
            Command::Add => return self.add(table),
            Command::Primary(index) => self.primary(table, index)?,
            Command::Unique(index) => self.unique(table, index)?,
            Command::Fulltext(index) => self.fulltext(table, index)?,
            Command::Index(index) => self.index(table, index)?,
            Command::Foreign(foreign) => self.foreign(table, foreign)?,
            Command::Rename { to } => self.rename(table, to)?,
            Command::DropColumn { columns } => self.drop_column(table, columns)?,
            Command::DropPrimary => self.drop_primary(table)?,
            Command::DropUnique { name } => self.drop_unique(table, name)?,
            Command::DropFulltext { name } => self.drop_fulltext(table, name)?,
            Command::DropIndex { name } => self.drop_index(table, name)?,
            Command::DropForeign { name } => self.drop_foreign(table, name)?,
            Command::Drop => self.drop_table(table)?,
        };

        Ok(vec![statement])
    }
}

/// Build the grammar for a dialect
pub fn grammar_for(dialect: Dialect, config: GrammarConfig) -> SchemaResult<Box<dyn SqlGrammar>> {
    let grammar: Box<dyn SqlGrammar> = match dialect {
        Dialect::MySql => Box::new(MySqlGrammar::new(config)?),
        Dialect::Postgres => Box::new(PostgresGrammar::new(config)?),
    };
    Ok(grammar)
}

/// Fail fast on commands that would render an empty column list
pub(crate) fn require_columns(command: &str, columns: &[String]) -> SchemaResult<()> {
    if columns.is_empty() {
        return Err(SchemaError::empty_columns(command));
    }
    Ok(())
}

/// ` DEFAULT '<value>'`, or nothing when the column has no default
pub(crate) fn default_clause<G: SqlGrammar + ?Sized>(grammar: &G, column: &Column) -> String {
    match &column.default {
        Some(value) => format!(" DEFAULT {}", grammar.literal(&value.to_literal_text())),
        None => String::new(),
    }
}

/// Validated storage engine name
pub(crate) fn engine_name(engine: &str) -> SchemaResult<&str> {
    security::validate_name(engine)?;
    Ok(engine)
}
