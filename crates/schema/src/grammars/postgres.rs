//! PostgreSQL schema grammar

use super::{default_clause, require_columns, SqlGrammar};
use crate::command::IndexCommand;
use crate::config::{GrammarConfig, QuoteStyle};
use crate::dialect::Dialect;
use crate::error::{SchemaError, SchemaResult};
use crate::security;
use crate::table::{Column, ColumnType, Table};

/// Grammar for PostgreSQL
#[derive(Debug, Clone)]
pub struct PostgresGrammar {
    style: QuoteStyle,
}

impl PostgresGrammar {
    pub fn new(config: GrammarConfig) -> SchemaResult<Self> {
        config.validate()?;
        Ok(Self {
            style: config.resolve(Dialect::Postgres),
        })
    }

    /// Alteration fragments for every pending change
    ///
    /// The type is rewritten for every change, whether or not it differs
    /// from the current column type.
    pub fn changes(&self, table: &Table) -> SchemaResult<Vec<String>> {
        let mut changes = Vec::new();

        for column in &table.changes {
            column.validate()?;
            let name = self.wrap(&column.name)?;

            if let Some(from) = column.renames() {
                changes.push(format!("RENAME COLUMN {} TO {}", self.wrap(from)?, name));
            }

            changes.push(format!("ALTER COLUMN {} TYPE {}", name, self.type_sql(column)?));

            let nullability = if column.nullable { "DROP" } else { "SET" };
            changes.push(format!("ALTER COLUMN {} {} NOT NULL", name, nullability));

            changes.push(match column.default {
                Some(_) => format!("ALTER COLUMN {} SET{}", name, default_clause(self, column)),
                None => format!("ALTER COLUMN {} DROP DEFAULT", name),
            });
        }

        Ok(changes)
    }

    /// `CREATE INDEX <name> ON <table> (<columns>)`
    fn key(&self, table: &Table, command: &IndexCommand) -> SchemaResult<String> {
        require_columns("index", &command.columns)?;
        security::validate_name(&command.name)?;

        Ok(format!(
            "CREATE INDEX {} ON {} ({})",
            command.name,
            self.wrap(&table.name)?,
            self.columnize(&command.columns)?
        ))
    }

    fn drop_constraint(&self, table: &Table, name: &str) -> SchemaResult<String> {
        security::validate_name(name)?;
        Ok(format!("ALTER TABLE {} DROP CONSTRAINT {}", self.wrap(&table.name)?, name))
    }

    fn drop_key(&self, name: &str) -> SchemaResult<String> {
        security::validate_name(name)?;
        Ok(format!("DROP INDEX {}", name))
    }
}

impl Default for PostgresGrammar {
    fn default() -> Self {
        Self {
            style: GrammarConfig::default().resolve(Dialect::Postgres),
        }
    }
}

impl SqlGrammar for PostgresGrammar {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn style(&self) -> &QuoteStyle {
        &self.style
    }

    fn type_sql(&self, column: &Column) -> SchemaResult<String> {
        let sql = match &column.column_type {
            ColumnType::String { length } => format!("VARCHAR({})", length),
            // Incrementing integers become SERIAL, so no separate keyword is needed
            ColumnType::Integer if column.increment => "SERIAL".to_string(),
            ColumnType::Integer => "BIGINT".to_string(),
            ColumnType::Float => "REAL".to_string(),
            ColumnType::Decimal { precision, scale } => format!("DECIMAL({}, {})", precision, scale),
            ColumnType::Boolean => "SMALLINT".to_string(),
            ColumnType::Date => "TIMESTAMP(0) WITHOUT TIME ZONE".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Blob => "BYTEA".to_string(),
            ColumnType::Enum { values } => {
                let values: Vec<String> = values.iter().map(|v| self.literal(v)).collect();
                format!("ENUM({})", values.join(", "))
            }
        };
        Ok(sql)
    }

    fn columns(&self, table: &Table) -> SchemaResult<Vec<String>> {
        table
            .columns
            .iter()
            .map(|column| {
                column.validate()?;

                let mut sql = format!("{} {}", self.wrap(&column.name)?, self.type_sql(column)?);
                if column.is_incrementing_integer() {
                    sql.push_str(" PRIMARY KEY");
                }
                sql.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
                sql.push_str(&default_clause(self, column));

                Ok(sql)
            })
            .collect()
    }

    fn create(&self, table: &Table) -> SchemaResult<Vec<String>> {
        if let Some(engine) = &table.engine {
            tracing::warn!(table = %table.name, engine = %engine, "postgres ignores table engines");
        }

        let columns = self.columns(table)?.join(", ");

        Ok(vec![format!(
            "CREATE TABLE {} ({})",
            self.wrap(&table.name)?,
            columns
        )])
    }

    fn add(&self, table: &Table) -> SchemaResult<Vec<String>> {
        let columns: Vec<String> = self
            .columns(table)?
            .into_iter()
            .map(|column| format!("ADD COLUMN {}", column))
            .collect();
        let changes = self.changes(table)?;

        let body: Vec<String> = [columns.join(", "), changes.join(", ")]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();

        if body.is_empty() {
            return Err(SchemaError::empty_columns("add"));
        }

        Ok(vec![format!(
            "ALTER TABLE {} {}",
            self.wrap(&table.name)?,
            body.join(", ")
        )])
    }

    fn primary(&self, table: &Table, command: &IndexCommand) -> SchemaResult<String> {
        require_columns("primary", &command.columns)?;

        Ok(format!(
            "ALTER TABLE {} ADD PRIMARY KEY ({})",
            self.wrap(&table.name)?,
            self.columnize(&command.columns)?
        ))
    }

    fn unique(&self, table: &Table, command: &IndexCommand) -> SchemaResult<String> {
        require_columns("unique", &command.columns)?;
        security::validate_name(&command.name)?;

        Ok(format!(
            "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE ({})",
            self.wrap(&table.name)?,
            command.name,
            self.columnize(&command.columns)?
        ))
    }

    fn fulltext(&self, table: &Table, command: &IndexCommand) -> SchemaResult<String> {
        require_columns("fulltext", &command.columns)?;
        security::validate_name(&command.name)?;

        Ok(format!(
            "CREATE INDEX {} ON {} USING gin({})",
            command.name,
            self.wrap(&table.name)?,
            self.columnize(&command.columns)?
        ))
    }

    fn index(&self, table: &Table, command: &IndexCommand) -> SchemaResult<String> {
        self.key(table, command)
    }

    fn rename(&self, table: &Table, to: &str) -> SchemaResult<String> {
        Ok(format!(
            "ALTER TABLE {} RENAME TO {}",
            self.wrap(&table.name)?,
            self.wrap(to)?
        ))
    }

    fn drop_column(&self, table: &Table, columns: &[String]) -> SchemaResult<String> {
        require_columns("drop_column", columns)?;

        let drops = columns
            .iter()
            .map(|column| Ok(format!("DROP COLUMN {}", self.wrap(column)?)))
            .collect::<SchemaResult<Vec<_>>>()?;

        Ok(format!("ALTER TABLE {} {}", self.wrap(&table.name)?, drops.join(", ")))
    }

    fn drop_primary(&self, table: &Table) -> SchemaResult<String> {
        self.drop_constraint(table, &format!("{}_pkey", table.base_name()))
    }

    fn drop_unique(&self, table: &Table, name: &str) -> SchemaResult<String> {
        self.drop_constraint(table, name)
    }

    fn drop_fulltext(&self, _table: &Table, name: &str) -> SchemaResult<String> {
        self.drop_key(name)
    }

    fn drop_index(&self, _table: &Table, name: &str) -> SchemaResult<String> {
        self.drop_key(name)
    }

    fn drop_foreign(&self, table: &Table, name: &str) -> SchemaResult<String> {
        self.drop_constraint(table, name)
    }
}
