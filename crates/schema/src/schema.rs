//! Schema dispatcher
//!
//! Provides a fluent interface for building table blueprints and turning them
//! into ordered SQL statements with a grammar.

use crate::command::{Command, IndexCommand};
use crate::config::GrammarConfig;
use crate::dialect::Dialect;
use crate::error::{SchemaError, SchemaResult};
use crate::grammars::{grammar_for, SqlGrammar};
use crate::table::Table;

/// Compiles table blueprints with one grammar
pub struct Schema {
    grammar: Box<dyn SqlGrammar>,
}

impl Schema {
    /// Create a schema dispatcher around a grammar
    pub fn new(grammar: Box<dyn SqlGrammar>) -> Self {
        Self { grammar }
    }

    /// Create a schema dispatcher for a dialect
    pub fn for_dialect(dialect: Dialect, config: GrammarConfig) -> SchemaResult<Self> {
        Ok(Self::new(grammar_for(dialect, config)?))
    }

    /// Get the grammar
    pub fn grammar(&self) -> &dyn SqlGrammar {
        self.grammar.as_ref()
    }

    /// Create a new table
    pub fn create<F>(&self, table_name: &str, callback: F) -> SchemaResult<Vec<String>>
    where
        F: FnOnce(&mut Table),
    {
        let mut table = Table::new(table_name);
        table.create();
        callback(&mut table);

        self.compile(&table)
    }

    /// Modify an existing table
    pub fn table<F>(&self, table_name: &str, callback: F) -> SchemaResult<Vec<String>>
    where
        F: FnOnce(&mut Table),
    {
        let mut table = Table::new(table_name);
        callback(&mut table);

        self.compile(&table)
    }

    /// Drop a table
    pub fn drop(&self, table_name: &str) -> SchemaResult<Vec<String>> {
        let mut table = Table::new(table_name);
        table.drop_table();

        self.compile(&table)
    }

    /// Compile every command of the blueprint, implied commands included
    ///
    /// Nothing is returned unless every command compiles. A blueprint that
    /// creates its table cannot also carry column changes.
    pub fn compile(&self, table: &Table) -> SchemaResult<Vec<String>> {
        if table.creating() {
            if let Some(change) = table.changes.first() {
                return Err(SchemaError::invalid_column(
                    &change.name,
                    format!(
                        "table '{}' is being created, so its columns cannot be changed in the same blueprint",
                        table.name
                    ),
                ));
            }
        }

        let commands = implied_commands(table);

        let mut statements = Vec::new();
        for command in &commands {
            statements.extend(self.grammar.compile(table, command)?);
        }

        tracing::debug!(
            dialect = %self.grammar.dialect(),
            table = %table.name,
            commands = commands.len(),
            statements = statements.len(),
            "compiled table blueprint"
        );

        Ok(statements)
    }
}

/// Commands to run for a table, including those implied by its contents
///
/// A table with columns or changes but no create/add command gets an `Add`
/// in front. Column-level keys are appended as index commands.
pub fn implied_commands(table: &Table) -> Vec<Command> {
    let mut commands = Vec::with_capacity(table.commands.len() + 1);

    let has_definitions = !table.columns.is_empty() || !table.changes.is_empty();
    let has_create_or_add = table
        .commands
        .iter()
        .any(|c| matches!(c, Command::Create | Command::Add));

    if has_definitions && !has_create_or_add {
        commands.push(Command::Add);
    }

    commands.extend(table.commands.iter().cloned());

    for column in &table.columns {
        if let Some(kind) = column.key {
            let index = IndexCommand::new(&table.name, kind, vec![column.name.clone()], None);
            commands.push(Command::index(kind, index));
        }
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ForeignKey;
    use crate::table::ColumnType;

    #[test]
    fn test_schema_create() {
        let schema = Schema::for_dialect(Dialect::Postgres, GrammarConfig::default()).unwrap();
        let sql = schema
            .create("users", |table| {
                table.increments("id");
                table.string("email", 255).unique();
                table.timestamps();
            })
            .unwrap();

        assert_eq!(
            sql,
            vec![
                "CREATE TABLE \"users\" (\"id\" SERIAL PRIMARY KEY NOT NULL, \
                 \"email\" VARCHAR(255) NOT NULL, \
                 \"created_at\" TIMESTAMP(0) WITHOUT TIME ZONE NOT NULL, \
                 \"updated_at\" TIMESTAMP(0) WITHOUT TIME ZONE NOT NULL)",
                "ALTER TABLE \"users\" ADD CONSTRAINT users_email_unique UNIQUE (\"email\")",
            ]
        );
    }

    #[test]
    fn test_schema_table_implies_add() {
        let schema = Schema::for_dialect(Dialect::MySql, GrammarConfig::default()).unwrap();
        let sql = schema
            .table("posts", |table| {
                table.integer("user_id").index();
                table.foreign(ForeignKey::new(&["user_id"]).references(&["id"]).on("users"));
            })
            .unwrap();

        assert_eq!(
            sql,
            vec![
                "ALTER TABLE `posts` ADD `user_id` INT NOT NULL",
                "ALTER TABLE `posts` ADD CONSTRAINT posts_user_id_foreign FOREIGN KEY (`user_id`) \
                 REFERENCES `users` (`id`)",
                "ALTER TABLE `posts` ADD INDEX (`user_id`)",
            ]
        );
    }

    #[test]
    fn test_schema_drop() {
        let schema = Schema::for_dialect(Dialect::Postgres, GrammarConfig::default()).unwrap();
        assert_eq!(schema.drop("sessions").unwrap(), vec!["DROP TABLE \"sessions\""]);
    }

    #[test]
    fn test_commands_only_table_has_no_implied_add() {
        let mut table = Table::new("users");
        table.drop_column(&["legacy"]);

        assert_eq!(
            implied_commands(&table),
            vec![Command::DropColumn {
                columns: vec!["legacy".to_string()]
            }]
        );
    }

    #[test]
    fn test_explicit_add_is_not_duplicated() {
        let mut table = Table::new("users");
        table.commands.push(Command::Add);
        table.text("bio");

        assert_eq!(implied_commands(&table), vec![Command::Add]);
    }

    #[test]
    fn test_compile_aborts_on_first_error() {
        let schema = Schema::for_dialect(Dialect::MySql, GrammarConfig::default()).unwrap();
        let result = schema.create("orders", |table| {
            table.increments("id");
            table.enumeration("status", &["new", "paid"]);
        });

        assert!(matches!(result, Err(SchemaError::UnknownType { .. })));
    }

    #[test]
    fn test_create_with_changes_is_rejected() {
        for dialect in Dialect::ALL {
            let schema = Schema::for_dialect(dialect, GrammarConfig::default()).unwrap();
            let result = schema.create("users", |table| {
                table.increments("id");
                table.change("email", ColumnType::Text);
            });

            match result {
                Err(SchemaError::InvalidColumn { column, reason }) => {
                    assert_eq!(column, "email");
                    assert!(reason.contains("'users'"));
                }
                other => panic!("expected InvalidColumn, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_compile_is_deterministic() {
        let schema = Schema::for_dialect(Dialect::Postgres, GrammarConfig::default()).unwrap();
        let mut table = Table::new("audit");
        table.create();
        table.increments("id");
        table.text("payload").fulltext();
        table.text("kind");

        let first = schema.compile(&table).unwrap();
        let second = schema.compile(&table).unwrap();
        assert_eq!(first, second);
    }
}
