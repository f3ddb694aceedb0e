//! Table blueprint model
//!
//! A `Table` describes the desired shape of one database table together with
//! the commands that should be applied to it. It is a short-lived value: build
//! it, hand it to a grammar or the `Schema` dispatcher, discard it.

use serde::{Deserialize, Serialize};

use crate::command::{Command, ForeignKey, IndexCommand, IndexKind};
use crate::error::{SchemaError, SchemaResult};

/// Length used for string columns that do not specify one
pub const DEFAULT_STRING_LENGTH: u32 = 200;

/// Logical column types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    String { length: u32 },
    Integer,
    Boolean,
    Date,
    Timestamp,
    Text,
    Blob,
    Float,
    Decimal { precision: u8, scale: u8 },
    Enum { values: Vec<String> },
}

impl ColumnType {
    /// Canonical names of every logical type
    pub const NAMES: [&'static str; 10] = [
        "string",
        "integer",
        "boolean",
        "date",
        "timestamp",
        "text",
        "blob",
        "float",
        "decimal",
        "enum",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::String { .. } => "string",
            ColumnType::Integer => "integer",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Text => "text",
            ColumnType::Blob => "blob",
            ColumnType::Float => "float",
            ColumnType::Decimal { .. } => "decimal",
            ColumnType::Enum { .. } => "enum",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, ColumnType::Integer)
    }
}

/// Column default value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl DefaultValue {
    /// Raw text placed between the literal quotes; booleans become `1`/`0`
    pub fn to_literal_text(&self) -> String {
        match self {
            DefaultValue::Bool(value) => String::from(if *value { "1" } else { "0" }),
            DefaultValue::Integer(value) => value.to_string(),
            DefaultValue::Float(value) => value.to_string(),
            DefaultValue::Text(value) => value.clone(),
        }
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        DefaultValue::Bool(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        DefaultValue::Integer(value as i64)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        DefaultValue::Integer(value)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        DefaultValue::Float(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::Text(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        DefaultValue::Text(value)
    }
}

/// One column of a table blueprint
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub increment: bool,
    pub default: Option<DefaultValue>,
    /// Previous name, for changes that rename the column
    pub from: Option<String>,
    /// Index requested directly on the column
    pub key: Option<IndexKind>,
}

impl Column {
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            nullable: false,
            increment: false,
            default: None,
            from: None,
            key: None,
        }
    }

    /// Allow NULL values
    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    /// Set the default value
    pub fn default(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the column as auto-incrementing (only integers honour this)
    pub fn increment(&mut self) -> &mut Self {
        self.increment = true;
        self
    }

    /// Record the column's current name for a rename-and-alter change
    pub fn renamed_from(&mut self, old_name: &str) -> &mut Self {
        self.from = Some(old_name.to_string());
        self
    }

    pub fn primary(&mut self) -> &mut Self {
        self.key = Some(IndexKind::Primary);
        self
    }

    pub fn unique(&mut self) -> &mut Self {
        self.key = Some(IndexKind::Unique);
        self
    }

    pub fn fulltext(&mut self) -> &mut Self {
        self.key = Some(IndexKind::Fulltext);
        self
    }

    pub fn index(&mut self) -> &mut Self {
        self.key = Some(IndexKind::Index);
        self
    }

    pub fn is_incrementing_integer(&self) -> bool {
        self.increment && self.column_type.is_integer()
    }

    /// Whether this change renames the column
    pub fn renames(&self) -> Option<&str> {
        self.from.as_deref().filter(|from| *from != self.name)
    }

    /// Check type parameters that no dialect can render
    pub fn validate(&self) -> SchemaResult<()> {
        match &self.column_type {
            ColumnType::String { length: 0 } => Err(SchemaError::invalid_column(
                &self.name,
                "string length must be greater than zero",
            )),
            ColumnType::Decimal { precision, scale } if scale > precision => {
                Err(SchemaError::invalid_column(
                    &self.name,
                    format!("decimal scale {} exceeds precision {}", scale, precision),
                ))
            }
            ColumnType::Decimal { precision: 0, .. } => Err(SchemaError::invalid_column(
                &self.name,
                "decimal precision must be greater than zero",
            )),
            ColumnType::Enum { values } if values.is_empty() => Err(SchemaError::invalid_column(
                &self.name,
                "enum columns need at least one allowed value",
            )),
            _ => Ok(()),
        }
    }
}

/// Blueprint of a table and the commands to apply to it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub changes: Vec<Column>,
    pub engine: Option<String>,
    pub commands: Vec<Command>,
}

impl Table {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Mark the blueprint as creating the table
    pub fn create(&mut self) -> &mut Self {
        self.commands.push(Command::Create);
        self
    }

    /// Whether the blueprint creates the table
    pub fn creating(&self) -> bool {
        self.commands.iter().any(|c| matches!(c, Command::Create))
    }

    /// Set the storage engine (honoured by MySQL only)
    pub fn engine(&mut self, engine: &str) -> &mut Self {
        self.engine = Some(engine.to_string());
        self
    }

    /// Append a column and hand it back for further configuration
    pub fn column(&mut self, name: &str, column_type: ColumnType) -> &mut Column {
        let position = self.columns.len();
        self.columns.push(Column::new(name, column_type));
        &mut self.columns[position]
    }

    /// Auto-incrementing integer key
    pub fn increments(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Integer).increment()
    }

    pub fn string(&mut self, name: &str, length: u32) -> &mut Column {
        self.column(name, ColumnType::String { length })
    }

    pub fn integer(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Integer)
    }

    pub fn float(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Float)
    }

    pub fn decimal(&mut self, name: &str, precision: u8, scale: u8) -> &mut Column {
        self.column(name, ColumnType::Decimal { precision, scale })
    }

    pub fn boolean(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Boolean)
    }

    pub fn date(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Date)
    }

    pub fn timestamp(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Timestamp)
    }

    /// Add `created_at` and `updated_at` date columns
    pub fn timestamps(&mut self) -> &mut Self {
        self.date("created_at");
        self.date("updated_at");
        self
    }

    pub fn text(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Text)
    }

    pub fn blob(&mut self, name: &str) -> &mut Column {
        self.column(name, ColumnType::Blob)
    }

    pub fn enumeration<S: AsRef<str>>(&mut self, name: &str, values: &[S]) -> &mut Column {
        let values = values.iter().map(|v| v.as_ref().to_string()).collect();
        self.column(name, ColumnType::Enum { values })
    }

    /// Queue an alteration of an existing column
    pub fn change(&mut self, name: &str, column_type: ColumnType) -> &mut Column {
        let position = self.changes.len();
        self.changes.push(Column::new(name, column_type));
        &mut self.changes[position]
    }

    fn key<S: AsRef<str>>(&mut self, kind: IndexKind, columns: &[S], name: Option<&str>) -> &mut Self {
        let columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let command = IndexCommand::new(&self.name, kind, columns, name.map(str::to_string));
        self.commands.push(Command::index(kind, command));
        self
    }

    pub fn primary<S: AsRef<str>>(&mut self, columns: &[S]) -> &mut Self {
        self.key(IndexKind::Primary, columns, None)
    }

    pub fn unique<S: AsRef<str>>(&mut self, columns: &[S], name: Option<&str>) -> &mut Self {
        self.key(IndexKind::Unique, columns, name)
    }

    pub fn fulltext<S: AsRef<str>>(&mut self, columns: &[S], name: Option<&str>) -> &mut Self {
        self.key(IndexKind::Fulltext, columns, name)
    }

    pub fn index<S: AsRef<str>>(&mut self, columns: &[S], name: Option<&str>) -> &mut Self {
        self.key(IndexKind::Index, columns, name)
    }

    /// Add a foreign key constraint, naming it after the table when unnamed
    pub fn foreign(&mut self, mut foreign: ForeignKey) -> &mut Self {
        if foreign.name.is_none() {
            foreign.name = Some(foreign.constraint_name(&self.name));
        }
        self.commands.push(Command::Foreign(foreign));
        self
    }

    pub fn rename(&mut self, to: &str) -> &mut Self {
        self.commands.push(Command::Rename { to: to.to_string() });
        self
    }

    pub fn drop_table(&mut self) -> &mut Self {
        self.commands.push(Command::Drop);
        self
    }

    pub fn drop_column<S: AsRef<str>>(&mut self, columns: &[S]) -> &mut Self {
        let columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self.commands.push(Command::DropColumn { columns });
        self
    }

    pub fn drop_primary(&mut self) -> &mut Self {
        self.commands.push(Command::DropPrimary);
        self
    }

    pub fn drop_unique(&mut self, name: &str) -> &mut Self {
        self.commands.push(Command::DropUnique { name: name.to_string() });
        self
    }

    pub fn drop_fulltext(&mut self, name: &str) -> &mut Self {
        self.commands.push(Command::DropFulltext { name: name.to_string() });
        self
    }

    pub fn drop_index(&mut self, name: &str) -> &mut Self {
        self.commands.push(Command::DropIndex { name: name.to_string() });
        self
    }

    pub fn drop_foreign(&mut self, name: &str) -> &mut Self {
        self.commands.push(Command::DropForeign { name: name.to_string() });
        self
    }

    /// Unqualified table name (`public.users` gives `users`)
    pub fn base_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_builder() {
        let mut table = Table::new("users");
        table.create();
        table.increments("id");
        table.string("email", 100).unique();
        table.decimal("balance", 10, 2).default(0);
        table.boolean("active").default(true);
        table.text("bio").nullable();
        table.timestamps();

        assert!(table.creating());
        assert_eq!(table.columns.len(), 7);
        assert!(table.columns[0].is_incrementing_integer());
        assert_eq!(table.columns[1].key, Some(IndexKind::Unique));
        assert_eq!(table.columns[2].default, Some(DefaultValue::Integer(0)));
        assert!(table.columns[4].nullable);
        assert_eq!(table.columns[5].name, "created_at");
        assert_eq!(table.columns[6].column_type, ColumnType::Date);
    }

    #[test]
    fn test_key_commands_get_default_names() {
        let mut table = Table::new("posts");
        table.index(&["author_id", "published_at"], None);
        table.unique(&["slug"], Some("posts_slug"));

        assert_eq!(
            table.commands[0],
            Command::Index(IndexCommand {
                columns: vec!["author_id".into(), "published_at".into()],
                name: "posts_author_id_published_at_index".into(),
            })
        );
        match &table.commands[1] {
            Command::Unique(command) => assert_eq!(command.name, "posts_slug"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_foreign_key_gets_default_name() {
        let mut table = Table::new("posts");
        table.foreign(ForeignKey::new(&["user_id"]).references(&["id"]).on("users"));

        match &table.commands[0] {
            Command::Foreign(fk) => assert_eq!(fk.name.as_deref(), Some("posts_user_id_foreign")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_increment_only_counts_on_integers() {
        let mut table = Table::new("t");
        table.string("code", 10).increment();
        assert!(!table.columns[0].is_incrementing_integer());
    }

    #[test]
    fn test_renames_ignores_identical_names() {
        let mut table = Table::new("users");
        table.change("nick", ColumnType::Text).renamed_from("nick");
        table.change("handle", ColumnType::Text).renamed_from("nick");
        assert_eq!(table.changes[0].renames(), None);
        assert_eq!(table.changes[1].renames(), Some("nick"));
    }

    #[test]
    fn test_column_validation() {
        assert!(Column::new("a", ColumnType::String { length: 0 }).validate().is_err());
        assert!(Column::new("a", ColumnType::Decimal { precision: 4, scale: 6 })
            .validate()
            .is_err());
        assert!(Column::new("a", ColumnType::Enum { values: vec![] }).validate().is_err());
        assert!(Column::new("a", ColumnType::Decimal { precision: 8, scale: 2 })
            .validate()
            .is_ok());
    }

    #[test]
    fn test_default_literal_text() {
        assert_eq!(DefaultValue::from(true).to_literal_text(), "1");
        assert_eq!(DefaultValue::from(false).to_literal_text(), "0");
        assert_eq!(DefaultValue::from(1.5).to_literal_text(), "1.5");
        assert_eq!(DefaultValue::from("guest").to_literal_text(), "guest");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(Table::new("public.users").base_name(), "users");
        assert_eq!(Table::new("users").base_name(), "users");
    }
}
