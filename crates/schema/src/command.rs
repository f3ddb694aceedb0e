//! Schema commands
//!
//! A command is a single schema-modification intent. Grammars dispatch on the
//! variant with an exhaustive `match`, so adding a variant forces every
//! grammar to decide how to render it.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Index flavours a column or command can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Primary,
    Unique,
    Fulltext,
    Index,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Primary => "primary",
            IndexKind::Unique => "unique",
            IndexKind::Fulltext => "fulltext",
            IndexKind::Index => "index",
        }
    }
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build the conventional name for an index or constraint
///
/// `users` + `["email"]` + `unique` gives `users_email_unique`. The name is
/// emitted unquoted, so every character outside `[a-z0-9_$]` becomes `_` and
/// a leading digit gets a `_` prefix.
pub fn default_index_name<S: AsRef<str>>(table: &str, columns: &[S], kind: &str) -> String {
    let columns: Vec<&str> = columns.iter().map(|c| c.as_ref()).collect();
    let raw = format!("{}_{}_{}", table, columns.join("_"), kind).to_lowercase();

    let name: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name
    }
}

/// Payload shared by primary, unique, fulltext and index commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCommand {
    pub columns: Vec<String>,
    pub name: String,
}

impl IndexCommand {
    /// Create an index command, deriving the name from the table when absent
    pub fn new(table: &str, kind: IndexKind, columns: Vec<String>, name: Option<String>) -> Self {
        let name = name.unwrap_or_else(|| default_index_name(table, &columns, kind.as_str()));
        Self { columns, name }
    }
}

/// Action taken on the referencing rows of a foreign key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    Cascade,
    Restrict,
    SetNull,
    SetDefault,
    NoAction,
}

impl ReferentialAction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
            ReferentialAction::NoAction => "NO ACTION",
        }
    }
}

impl std::str::FromStr for ReferentialAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "cascade" => Ok(ReferentialAction::Cascade),
            "restrict" => Ok(ReferentialAction::Restrict),
            "set_null" => Ok(ReferentialAction::SetNull),
            "set_default" => Ok(ReferentialAction::SetDefault),
            "no_action" => Ok(ReferentialAction::NoAction),
            _ => Err(format!("Unknown referential action: {}", s)),
        }
    }
}

/// Foreign key constraint definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub references: Vec<String>,
    pub on: String,
    pub name: Option<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

impl ForeignKey {
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            references: Vec::new(),
            on: String::new(),
            name: None,
            on_delete: None,
            on_update: None,
        }
    }

    pub fn references<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.references = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn on(mut self, table: &str) -> Self {
        self.on = table.to_string();
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }

    /// Constraint name, falling back to `<table>_<columns>_foreign`
    pub fn constraint_name(&self, table: &str) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => default_index_name(table, &self.columns, "foreign"),
        }
    }
}

/// A single schema modification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create,
    Add,
    Primary(IndexCommand),
    Unique(IndexCommand),
    Fulltext(IndexCommand),
    Index(IndexCommand),
    Foreign(ForeignKey),
    Rename { to: String },
    DropColumn { columns: Vec<String> },
    DropPrimary,
    DropUnique { name: String },
    DropFulltext { name: String },
    DropIndex { name: String },
    DropForeign { name: String },
    Drop,
}

impl Command {
    /// Wrap an index payload in the command for `kind`
    pub fn index(kind: IndexKind, command: IndexCommand) -> Self {
        match kind {
            IndexKind::Primary => Command::Primary(command),
            IndexKind::Unique => Command::Unique(command),
            IndexKind::Fulltext => Command::Fulltext(command),
            IndexKind::Index => Command::Index(command),
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Create => CommandKind::Create,
            Command::Add => CommandKind::Add,
            Command::Primary(_) => CommandKind::Primary,
            Command::Unique(_) => CommandKind::Unique,
            Command::Fulltext(_) => CommandKind::Fulltext,
            Command::Index(_) => CommandKind::Index,
            Command::Foreign(_) => CommandKind::Foreign,
            Command::Rename { .. } => CommandKind::Rename,
            Command::DropColumn { .. } => CommandKind::DropColumn,
            Command::DropPrimary => CommandKind::DropPrimary,
            Command::DropUnique { .. } => CommandKind::DropUnique,
            Command::DropFulltext { .. } => CommandKind::DropFulltext,
            Command::DropIndex { .. } => CommandKind::DropIndex,
            Command::DropForeign { .. } => CommandKind::DropForeign,
            Command::Drop => CommandKind::Drop,
        }
    }
}

/// Payload-free command tag, as spelled in manifests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Create,
    Add,
    Primary,
    Unique,
    Fulltext,
    Index,
    Foreign,
    Rename,
    DropColumn,
    DropPrimary,
    DropUnique,
    DropFulltext,
    DropIndex,
    DropForeign,
    Drop,
}

impl CommandKind {
    pub const ALL: [CommandKind; 15] = [
        CommandKind::Create,
        CommandKind::Add,
        CommandKind::Primary,
        CommandKind::Unique,
        CommandKind::Fulltext,
        CommandKind::Index,
        CommandKind::Foreign,
        CommandKind::Rename,
        CommandKind::DropColumn,
        CommandKind::DropPrimary,
        CommandKind::DropUnique,
        CommandKind::DropFulltext,
        CommandKind::DropIndex,
        CommandKind::DropForeign,
        CommandKind::Drop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Create => "create",
            CommandKind::Add => "add",
            CommandKind::Primary => "primary",
            CommandKind::Unique => "unique",
            CommandKind::Fulltext => "fulltext",
            CommandKind::Index => "index",
            CommandKind::Foreign => "foreign",
            CommandKind::Rename => "rename",
            CommandKind::DropColumn => "drop_column",
            CommandKind::DropPrimary => "drop_primary",
            CommandKind::DropUnique => "drop_unique",
            CommandKind::DropFulltext => "drop_fulltext",
            CommandKind::DropIndex => "drop_index",
            CommandKind::DropForeign => "drop_foreign",
            CommandKind::Drop => "drop",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CommandKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        CommandKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| SchemaError::unsupported_command(s, None))
    }
}
