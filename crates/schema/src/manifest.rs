//! Manifest definitions - serialized table blueprints
//!
//! A manifest describes tables with string type names and string command
//! kinds, so it can be written by hand in YAML or JSON:
//!
//! ```yaml
//! tables:
//!   - table: users
//!     engine: InnoDB
//!     columns:
//!       - { name: id, type: integer, increment: true }
//!       - { name: email, type: string, length: 120, key: unique }
//!     commands:
//!       - kind: create
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::command::{Command, CommandKind, ForeignKey, IndexCommand, IndexKind, ReferentialAction};
use crate::error::{SchemaError, SchemaResult};
use crate::table::{Column, ColumnType, DefaultValue, Table, DEFAULT_STRING_LENGTH};

/// A document holding any number of table blueprints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaManifest {
    #[serde(default)]
    pub tables: Vec<TableManifest>,
}

/// One table blueprint as written in a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableManifest {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnManifest>,
    #[serde(default)]
    pub changes: Vec<ColumnManifest>,
    #[serde(default)]
    pub commands: Vec<CommandManifest>,
}

/// A column as written in a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub increment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<IndexKind>,
}

/// A command as written in a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandManifest {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferentialAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<ReferentialAction>,
}

impl SchemaManifest {
    pub fn from_yaml_str(content: &str) -> SchemaResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> SchemaResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a manifest file; `.json` is parsed as JSON, anything else as YAML
    pub fn from_path(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Convert every table blueprint into the typed model
    pub fn into_tables(self) -> SchemaResult<Vec<Table>> {
        self.tables.into_iter().map(TableManifest::into_table).collect()
    }
}

impl TableManifest {
    pub fn into_table(self) -> SchemaResult<Table> {
        let mut table = Table::new(&self.table);
        table.engine = self.engine;

        for column in self.columns {
            table.columns.push(column.into_column(&self.table)?);
        }

        for change in self.changes {
            table.changes.push(change.into_column(&self.table)?);
        }

        for command in self.commands {
            table.commands.push(command.into_command(&self.table)?);
        }

        Ok(table)
    }
}

impl ColumnManifest {
    pub fn into_column(self, table: &str) -> SchemaResult<Column> {
        let context = || format!("column '{}' of table '{}'", self.name, table);

        let column_type = match self.column_type.trim().to_lowercase().as_str() {
            "string" => ColumnType::String {
                length: self.length.unwrap_or(DEFAULT_STRING_LENGTH),
            },
            "integer" => ColumnType::Integer,
            "boolean" => ColumnType::Boolean,
            "date" => ColumnType::Date,
            "timestamp" => ColumnType::Timestamp,
            "text" => ColumnType::Text,
            "blob" => ColumnType::Blob,
            "float" => ColumnType::Float,
            "decimal" => ColumnType::Decimal {
                precision: self
                    .precision
                    .ok_or_else(|| SchemaError::missing_field("precision", context()))?,
                scale: self
                    .scale
                    .ok_or_else(|| SchemaError::missing_field("scale", context()))?,
            },
            "enum" => ColumnType::Enum {
                values: self.values.clone(),
            },
            _ => return Err(SchemaError::unknown_type(self.column_type.clone(), None)),
        };

        let column = Column {
            name: self.name,
            column_type,
            nullable: self.nullable,
            increment: self.increment,
            default: self.default,
            from: self.from,
            key: self.key,
        };
        column.validate()?;

        Ok(column)
    }
}

impl CommandManifest {
    pub fn into_command(self, table: &str) -> SchemaResult<Command> {
        let kind: CommandKind = self.kind.parse()?;
        let context = || format!("'{}' command of table '{}'", kind, table);

        let command = match kind {
            CommandKind::Create => Command::Create,
            CommandKind::Add => Command::Add,
            CommandKind::Primary => self.index(table, IndexKind::Primary),
            CommandKind::Unique => self.index(table, IndexKind::Unique),
            CommandKind::Fulltext => self.index(table, IndexKind::Fulltext),
            CommandKind::Index => self.index(table, IndexKind::Index),
            CommandKind::Foreign => {
                let on = self.on.ok_or_else(|| SchemaError::missing_field("on", context()))?;
                let mut foreign = ForeignKey::new(self.columns.as_slice())
                    .references(self.references.as_slice())
                    .on(&on);
                foreign.name = self.name;
                foreign.on_delete = self.on_delete;
                foreign.on_update = self.on_update;
                Command::Foreign(foreign)
            }
            CommandKind::Rename => Command::Rename {
                to: self.to.ok_or_else(|| SchemaError::missing_field("to", context()))?,
            },
            CommandKind::DropColumn => Command::DropColumn {
                columns: self.columns,
            },
            CommandKind::DropPrimary => Command::DropPrimary,
            CommandKind::DropUnique => Command::DropUnique {
                name: self.name.ok_or_else(|| SchemaError::missing_field("name", context()))?,
            },
            CommandKind::DropFulltext => Command::DropFulltext {
                name: self.name.ok_or_else(|| SchemaError::missing_field("name", context()))?,
            },
            CommandKind::DropIndex => Command::DropIndex {
                name: self.name.ok_or_else(|| SchemaError::missing_field("name", context()))?,
            },
            CommandKind::DropForeign => Command::DropForeign {
                name: self.name.ok_or_else(|| SchemaError::missing_field("name", context()))?,
            },
            CommandKind::Drop => Command::Drop,
        };

        Ok(command)
    }

    fn index(self, table: &str, kind: IndexKind) -> Command {
        Command::index(kind, IndexCommand::new(table, kind, self.columns, self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const USERS_YAML: &str = r#"
tables:
  - table: users
    engine: InnoDB
    columns:
      - { name: id, type: integer, increment: true }
      - { name: email, type: string, length: 120, key: unique }
      - { name: nickname, type: string, nullable: true, default: guest }
      - { name: balance, type: decimal, precision: 10, scale: 2, default: 0 }
      - { name: verified, type: boolean, default: false }
    commands:
      - kind: create
      - kind: index
        columns: [nickname]
"#;

    #[test]
    fn test_yaml_manifest_into_tables() {
        let tables = SchemaManifest::from_yaml_str(USERS_YAML)
            .unwrap()
            .into_tables()
            .unwrap();

        assert_eq!(tables.len(), 1);
        let users = &tables[0];
        assert_eq!(users.engine.as_deref(), Some("InnoDB"));
        assert_eq!(users.columns.len(), 5);
        assert!(users.columns[0].is_incrementing_integer());
        assert_eq!(users.columns[1].key, Some(IndexKind::Unique));
        assert_eq!(
            users.columns[2].column_type,
            ColumnType::String {
                length: DEFAULT_STRING_LENGTH
            }
        );
        assert_eq!(users.columns[2].default, Some(DefaultValue::Text("guest".into())));
        assert_eq!(users.columns[3].default, Some(DefaultValue::Integer(0)));
        assert_eq!(users.columns[4].default, Some(DefaultValue::Bool(false)));
        assert_eq!(
            users.commands,
            vec![
                Command::Create,
                Command::Index(IndexCommand {
                    columns: vec!["nickname".into()],
                    name: "users_nickname_index".into(),
                }),
            ]
        );
    }

    #[test]
    fn test_json_manifest() {
        let json = r#"{
            "tables": [{
                "table": "posts",
                "changes": [{ "name": "title", "type": "text", "from": "heading" }],
                "commands": [
                    { "kind": "foreign", "columns": ["user_id"], "references": ["id"],
                      "on": "users", "on_delete": "cascade" },
                    { "kind": "drop_index", "name": "posts_slug_index" }
                ]
            }]
        }"#;

        let tables = SchemaManifest::from_json_str(json).unwrap().into_tables().unwrap();
        let posts = &tables[0];
        assert_eq!(posts.changes[0].renames(), Some("heading"));
        match &posts.commands[0] {
            Command::Foreign(fk) => {
                assert_eq!(fk.on, "users");
                assert_eq!(fk.on_delete, Some(ReferentialAction::Cascade));
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(
            posts.commands[1],
            Command::DropIndex {
                name: "posts_slug_index".into()
            }
        );
    }

    #[test]
    fn test_unknown_type_name() {
        let yaml = "tables:\n  - table: t\n    columns:\n      - { name: id, type: uuid }\n";
        let err = SchemaManifest::from_yaml_str(yaml).unwrap().into_tables().unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { ref type_name, .. } if type_name == "uuid"));
    }

    #[test]
    fn test_unknown_command_kind() {
        let yaml = "tables:\n  - table: t\n    commands:\n      - kind: truncate\n";
        let err = SchemaManifest::from_yaml_str(yaml).unwrap().into_tables().unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedCommand { ref command, .. } if command == "truncate"));
    }

    #[test]
    fn test_missing_fields() {
        let yaml = "tables:\n  - table: t\n    columns:\n      - { name: price, type: decimal, scale: 2 }\n";
        let err = SchemaManifest::from_yaml_str(yaml).unwrap().into_tables().unwrap_err();
        assert!(matches!(err, SchemaError::MissingField { ref field, .. } if field == "precision"));

        let yaml = "tables:\n  - table: t\n    commands:\n      - kind: rename\n";
        let err = SchemaManifest::from_yaml_str(yaml).unwrap().into_tables().unwrap_err();
        assert!(matches!(err, SchemaError::MissingField { ref field, .. } if field == "to"));
    }

    #[test]
    fn test_invalid_enum_column() {
        let yaml = "tables:\n  - table: t\n    columns:\n      - { name: state, type: enum }\n";
        let err = SchemaManifest::from_yaml_str(yaml).unwrap().into_tables().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidColumn { .. }));
    }

    #[test]
    fn test_from_path_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("users.yaml");
        std::fs::write(&yaml_path, USERS_YAML).unwrap();
        assert_eq!(SchemaManifest::from_path(&yaml_path).unwrap().tables.len(), 1);

        let json_path = dir.path().join("empty.json");
        let mut file = std::fs::File::create(&json_path).unwrap();
        file.write_all(br#"{ "tables": [] }"#).unwrap();
        assert!(SchemaManifest::from_path(&json_path).unwrap().tables.is_empty());

        let missing = dir.path().join("missing.yaml");
        assert!(matches!(
            SchemaManifest::from_path(&missing),
            Err(SchemaError::Io(_))
        ));
    }
}
