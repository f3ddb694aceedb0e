use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use blueprint_schema::{Command, Schema, Table};
use chrono::{DateTime, Utc};

use super::{compile_tables, format_statements, load_tables};
use crate::config::CliConfig;

/// Render a manifest into a timestamped migration file
///
/// Returns the path of the written file. `dir` falls back to the configured
/// migrations directory.
pub fn run(file: &Path, name: &str, dir: Option<&Path>, config: &CliConfig) -> anyhow::Result<PathBuf> {
    validate_migration_name(name)?;

    let schema = Schema::for_dialect(config.dialect, config.grammar_config())?;
    let tables = load_tables(&[file.to_path_buf()])?;
    let up = compile_tables(&schema, &tables)?;
    let down = rollback_statements(&schema, &tables)?;

    let dir = dir.unwrap_or(config.migrations_dir.as_path());
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create migrations directory {}", dir.display()))?;

    let now = Utc::now();
    let path = dir.join(migration_filename(name, now));
    let content = migration_template(name, config, now, &up, &down);

    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), statements = up.len(), "created migration");
    Ok(path)
}

/// `<YYYYmmdd_HHMMSS>__<name>.sql`
pub fn migration_filename(name: &str, created: DateTime<Utc>) -> String {
    format!("{}__{}.sql", created.format("%Y%m%d_%H%M%S"), name)
}

/// Drop statements for every table the migration creates, newest first
///
/// A created table is dropped under its final name. Tables the same blueprint
/// drops again need no rollback.
pub fn rollback_statements(schema: &Schema, tables: &[Table]) -> anyhow::Result<Vec<String>> {
    let mut statements = Vec::new();

    for table in tables.iter().rev() {
        if let Some(name) = created_table_name(table) {
            statements.extend(schema.drop(name)?);
        }
    }

    Ok(statements)
}

fn created_table_name(table: &Table) -> Option<&str> {
    let mut created = None;

    for command in &table.commands {
        match command {
            Command::Create => created = Some(table.name.as_str()),
            Command::Rename { to } if created.is_some() => created = Some(to.as_str()),
            Command::Drop => created = None,
            _ => {}
        }
    }

    created
}

fn migration_template(
    name: &str,
    config: &CliConfig,
    created: DateTime<Utc>,
    up: &[String],
    down: &[String],
) -> String {
    let mut content = format!(
        "-- Migration: {}\n-- Dialect: {}\n-- Created: {}\n\n-- Up migration\n{}",
        name,
        config.dialect,
        created.format("%Y-%m-%d %H:%M:%S UTC"),
        format_statements(up)
    );

    content.push_str("\n-- Down migration\n");
    content.push_str(&format_statements(down));
    content
}

fn validate_migration_name(name: &str) -> anyhow::Result<()> {
    if name.is_empty() {
        bail!("Migration name cannot be empty");
    }

    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        bail!("Migration name '{}' contains invalid character '{}'", name, c);
    }

    Ok(())
}
