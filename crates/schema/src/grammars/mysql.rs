//! MySQL schema grammar

use super::{default_clause, engine_name, require_columns, SqlGrammar};
use crate::command::IndexCommand;
use crate::config::{GrammarConfig, QuoteStyle};
use crate::dialect::Dialect;
use crate::error::{SchemaError, SchemaResult};
use crate::security;
use crate::table::{Column, ColumnType, Table};

/// Grammar for MySQL and MariaDB
#[derive(Debug, Clone)]
pub struct MySqlGrammar {
    style: QuoteStyle,
}

impl MySqlGrammar {
    pub fn new(config: GrammarConfig) -> SchemaResult<Self> {
        config.validate()?;
        Ok(Self {
            style: config.resolve(Dialect::MySql),
        })
    }

    /// Column definition without the leading `ADD`
    fn definition(&self, column: &Column) -> SchemaResult<String> {
        column.validate()?;

        let mut sql = format!("{} {}", self.wrap(&column.name)?, self.type_sql(column)?);
        sql.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
        sql.push_str(&default_clause(self, column));

        // Auto-incrementing columns must also be the primary key
        if column.is_incrementing_integer() {
            sql.push_str(" AUTO_INCREMENT PRIMARY KEY");
        }

        Ok(sql)
    }

    /// `CHANGE <old> <definition>` fragments for pending changes
    fn changes(&self, table: &Table) -> SchemaResult<Vec<String>> {
        table
            .changes
            .iter()
            .map(|column| {
                let current = column.renames().unwrap_or(&column.name);
                Ok(format!("CHANGE {} {}", self.wrap(current)?, self.definition(column)?))
            })
            .collect()
    }

    fn key(&self, table: &Table, command: &IndexCommand, keyword: &str) -> SchemaResult<String> {
        require_columns(&keyword.to_lowercase(), &command.columns)?;

        Ok(format!(
            "ALTER TABLE {} ADD {} ({})",
            self.wrap(&table.name)?,
            keyword,
            self.columnize(&command.columns)?
        ))
    }

    fn drop_key(&self, table: &Table, name: &str) -> SchemaResult<String> {
        security::validate_name(name)?;
        Ok(format!("ALTER TABLE {} DROP INDEX {}", self.wrap(&table.name)?, name))
    }
}

impl Default for MySqlGrammar {
    fn default() -> Self {
        Self {
            style: GrammarConfig::default().resolve(Dialect::MySql),
        }
    }
}

impl SqlGrammar for MySqlGrammar {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn style(&self) -> &QuoteStyle {
        &self.style
    }

    fn type_sql(&self, column: &Column) -> SchemaResult<String> {
        let sql = match &column.column_type {
            ColumnType::String { length } => format!("VARCHAR({})", length),
            ColumnType::Integer => "INT".to_string(),
            ColumnType::Boolean => "TINYINT".to_string(),
            ColumnType::Date => "DATETIME".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Blob => "BLOB".to_string(),
            ColumnType::Float => "FLOAT".to_string(),
            ColumnType::Decimal { precision, scale } => format!("DECIMAL({}, {})", precision, scale),
            ColumnType::Enum { .. } => {
                return Err(SchemaError::unknown_type(
                    column.column_type.name(),
                    Some(Dialect::MySql.as_str()),
                ))
            }
        };
        Ok(sql)
    }

    fn columns(&self, table: &Table) -> SchemaResult<Vec<String>> {
        table.columns.iter().map(|column| self.definition(column)).collect()
    }

    fn create(&self, table: &Table) -> SchemaResult<Vec<String>> {
        let columns = self.columns(table)?.join(", ");

        let mut sql = format!("CREATE TABLE {} ({})", self.wrap(&table.name)?, columns);

        if let Some(engine) = &table.engine {
            sql.push_str(" ENGINE = ");
            sql.push_str(engine_name(engine)?);
        }

        Ok(vec![sql])
    }

    fn add(&self, table: &Table) -> SchemaResult<Vec<String>> {
        let mut fragments: Vec<String> = self
            .columns(table)?
            .into_iter()
            .map(|column| format!("ADD {}", column))
            .collect();
        fragments.extend(self.changes(table)?);

        if fragments.is_empty() {
            return Err(SchemaError::empty_columns("add"));
        }

        Ok(vec![format!(
            "ALTER TABLE {} {}",
            self.wrap(&table.name)?,
            fragments.join(", ")
        )])
    }

    fn primary(&self, table: &Table, command: &IndexCommand) -> SchemaResult<String> {
        self.key(table, command, "PRIMARY KEY")
    }

    fn unique(&self, table: &Table, command: &IndexCommand) -> SchemaResult<String> {
        self.key(table, command, "UNIQUE")
    }

    fn fulltext(&self, table: &Table, command: &IndexCommand) -> SchemaResult<String> {
        self.key(table, command, "FULLTEXT")
    }

    fn index(&self, table: &Table, command: &IndexCommand) -> SchemaResult<String> {
        self.key(table, command, "INDEX")
    }

    fn rename(&self, table: &Table, to: &str) -> SchemaResult<String> {
        Ok(format!("RENAME TABLE {} TO {}", self.wrap(&table.name)?, self.wrap(to)?))
    }

    fn drop_column(&self, table: &Table, columns: &[String]) -> SchemaResult<String> {
        require_columns("drop_column", columns)?;

        let drops = columns
            .iter()
            .map(|column| Ok(format!("DROP {}", self.wrap(column)?)))
            .collect::<SchemaResult<Vec<_>>>()?;

        Ok(format!("ALTER TABLE {} {}", self.wrap(&table.name)?, drops.join(", ")))
    }

    fn drop_primary(&self, table: &Table) -> SchemaResult<String> {
        Ok(format!("ALTER TABLE {} DROP PRIMARY KEY", self.wrap(&table.name)?))
    }

    fn drop_unique(&self, table: &Table, name: &str) -> SchemaResult<String> {
        self.drop_key(table, name)
    }

    fn drop_fulltext(&self, table: &Table, name: &str) -> SchemaResult<String> {
        self.drop_key(table, name)
    }

    fn drop_index(&self, table: &Table, name: &str) -> SchemaResult<String> {
        self.drop_key(table, name)
    }

    fn drop_foreign(&self, table: &Table, name: &str) -> SchemaResult<String> {
        security::validate_name(name)?;
        Ok(format!("ALTER TABLE {} DROP FOREIGN KEY {}", self.wrap(&table.name)?, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::IndexKind;
    use crate::config::IdentifierPolicy;

    fn grammar() -> MySqlGrammar {
        MySqlGrammar::default()
    }

    fn index(table: &str, kind: IndexKind, columns: &[&str]) -> IndexCommand {
        IndexCommand::new(
            table,
            kind,
            columns.iter().map(|c| c.to_string()).collect(),
            None,
        )
    }

    #[test]
    fn test_create_with_auto_increment_id() {
        let mut table = Table::new("t");
        table.increments("id");

        assert_eq!(
            grammar().create(&table).unwrap(),
            vec!["CREATE TABLE `t` (`id` INT NOT NULL AUTO_INCREMENT PRIMARY KEY)"]
        );
    }

    #[test]
    fn test_create_appends_engine() {
        let mut table = Table::new("users");
        table.engine("InnoDB");
        table.increments("id");
        table.string("email", 100);
        table.text("bio").nullable();

        assert_eq!(
            grammar().create(&table).unwrap(),
            vec![
                "CREATE TABLE `users` (`id` INT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
                 `email` VARCHAR(100) NOT NULL, `bio` TEXT NULL) ENGINE = InnoDB"
            ]
        );
    }

    #[test]
    fn test_create_rejects_malformed_engine() {
        let mut table = Table::new("users");
        table.engine("InnoDB; DROP TABLE users");
        table.increments("id");

        assert!(matches!(
            grammar().create(&table),
            Err(SchemaError::MalformedIdentifier { .. })
        ));
    }

    #[test]
    fn test_columns_render_defaults() {
        let mut table = Table::new("accounts");
        table.boolean("active").default(true);
        table.string("role", 20).default("o'clock");
        table.integer("visits").default(0);

        let columns = grammar().columns(&table).unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0], "`active` TINYINT NOT NULL DEFAULT '1'");
        assert_eq!(columns[1], "`role` VARCHAR(20) NOT NULL DEFAULT 'o''clock'");
        assert_eq!(columns[2], "`visits` INT NOT NULL DEFAULT '0'");
    }

    #[test]
    fn test_add_prefixes_each_column() {
        let mut table = Table::new("users");
        table.string("name", 50);
        table.date("born_at").nullable();

        assert_eq!(
            grammar().add(&table).unwrap(),
            vec!["ALTER TABLE `users` ADD `name` VARCHAR(50) NOT NULL, ADD `born_at` DATETIME NULL"]
        );
    }

    #[test]
    fn test_add_renders_changes() {
        let mut table = Table::new("users");
        table.change("handle", ColumnType::String { length: 40 }).renamed_from("nick");
        table.change("bio", ColumnType::Text).nullable();

        assert_eq!(
            grammar().add(&table).unwrap(),
            vec![
                "ALTER TABLE `users` CHANGE `nick` `handle` VARCHAR(40) NOT NULL, \
                 CHANGE `bio` `bio` TEXT NULL"
            ]
        );
    }

    #[test]
    fn test_add_without_columns_fails() {
        let table = Table::new("users");
        assert!(matches!(
            grammar().add(&table),
            Err(SchemaError::EmptyColumnList { .. })
        ));
    }

    #[test]
    fn test_key_statements() {
        let table = Table::new("users");
        let grammar = grammar();

        assert_eq!(
            grammar.primary(&table, &index("users", IndexKind::Primary, &["id"])).unwrap(),
            "ALTER TABLE `users` ADD PRIMARY KEY (`id`)"
        );
        assert_eq!(
            grammar.unique(&table, &index("users", IndexKind::Unique, &["email"])).unwrap(),
            "ALTER TABLE `users` ADD UNIQUE (`email`)"
        );
        assert_eq!(
            grammar.fulltext(&table, &index("users", IndexKind::Fulltext, &["bio"])).unwrap(),
            "ALTER TABLE `users` ADD FULLTEXT (`bio`)"
        );
        assert_eq!(
            grammar
                .index(&table, &index("users", IndexKind::Index, &["last", "first"]))
                .unwrap(),
            "ALTER TABLE `users` ADD INDEX (`last`, `first`)"
        );
    }

    #[test]
    fn test_key_with_empty_columns_fails_fast() {
        let table = Table::new("users");
        let command = index("users", IndexKind::Unique, &[]);
        let err = grammar().unique(&table, &command).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyColumnList { ref command } if command == "unique"));
    }

    #[test]
    fn test_enum_is_unmapped() {
        let column = Column::new(
            "status",
            ColumnType::Enum {
                values: vec!["on".into(), "off".into()],
            },
        );
        let err = grammar().type_sql(&column).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { ref type_name, .. } if type_name == "enum"));
    }

    #[test]
    fn test_type_mapping() {
        let grammar = grammar();
        let render = |column_type| grammar.type_sql(&Column::new("c", column_type)).unwrap();

        assert_eq!(render(ColumnType::String { length: 255 }), "VARCHAR(255)");
        assert_eq!(render(ColumnType::Integer), "INT");
        assert_eq!(render(ColumnType::Boolean), "TINYINT");
        assert_eq!(render(ColumnType::Date), "DATETIME");
        assert_eq!(render(ColumnType::Timestamp), "TIMESTAMP");
        assert_eq!(render(ColumnType::Text), "TEXT");
        assert_eq!(render(ColumnType::Blob), "BLOB");
        assert_eq!(render(ColumnType::Float), "FLOAT");
        assert_eq!(render(ColumnType::Decimal { precision: 8, scale: 2 }), "DECIMAL(8, 2)");
    }

    #[test]
    fn test_drop_statements() {
        let table = Table::new("users");
        let grammar = grammar();

        assert_eq!(
            grammar
                .drop_column(&table, &["name".to_string(), "bio".to_string()])
                .unwrap(),
            "ALTER TABLE `users` DROP `name`, DROP `bio`"
        );
        assert_eq!(
            grammar.drop_primary(&table).unwrap(),
            "ALTER TABLE `users` DROP PRIMARY KEY"
        );
        assert_eq!(
            grammar.drop_unique(&table, "users_email_unique").unwrap(),
            "ALTER TABLE `users` DROP INDEX users_email_unique"
        );
        assert_eq!(
            grammar.drop_foreign(&table, "users_team_id_foreign").unwrap(),
            "ALTER TABLE `users` DROP FOREIGN KEY users_team_id_foreign"
        );
        assert_eq!(
            grammar.rename(&table, "members").unwrap(),
            "RENAME TABLE `users` TO `members`"
        );
        assert!(grammar.drop_index(&table, "bad name").is_err());
        assert!(grammar.drop_column(&table, &[]).is_err());
    }

    #[test]
    fn test_backtick_in_identifier() {
        let mut table = Table::new("users");
        table.string("we`ird", 10);
        assert!(grammar().create(&table).is_err());

        let escaping = MySqlGrammar::new(
            GrammarConfig::new().with_identifier_policy(IdentifierPolicy::Escape),
        )
        .unwrap();
        assert_eq!(
            escaping.create(&table).unwrap(),
            vec!["CREATE TABLE `users` (`we``ird` VARCHAR(10) NOT NULL)"]
        );
    }
}
