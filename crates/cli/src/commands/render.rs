use std::path::{Path, PathBuf};

use anyhow::Context;
use blueprint_schema::Schema;

use super::{compile_tables, format_statements, load_tables};
use crate::config::CliConfig;

/// Render manifests to SQL, written to `output` or returned for stdout
pub fn run(files: &[PathBuf], output: Option<&Path>, config: &CliConfig) -> anyhow::Result<String> {
    let schema = Schema::for_dialect(config.dialect, config.grammar_config())?;
    let tables = load_tables(files)?;
    let sql = format_statements(&compile_tables(&schema, &tables)?);

    if let Some(path) = output {
        std::fs::write(path, &sql)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(
            output = %path.display(),
            tables = tables.len(),
            dialect = %config.dialect,
            "rendered manifests"
        );
    }

    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_schema::{Dialect, IdentifierPolicy};

    const MANIFEST: &str = r#"
tables:
  - table: users
    columns:
      - { name: id, type: integer, increment: true }
      - { name: email, type: string, length: 120, key: unique }
    commands:
      - kind: create
"#;

    #[test]
    fn test_render_mysql() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("users.yaml");
        std::fs::write(&file, MANIFEST).unwrap();

        let sql = run(&[file], None, &CliConfig::default()).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE `users` (`id` INT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
             `email` VARCHAR(120) NOT NULL);\n\
             ALTER TABLE `users` ADD UNIQUE (`email`);\n"
        );
    }

    #[test]
    fn test_render_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("users.yaml");
        let output = dir.path().join("users.sql");
        std::fs::write(&file, MANIFEST).unwrap();

        let mut config = CliConfig::default();
        config.dialect = Dialect::Postgres;

        let sql = run(&[file], Some(&output), &config).unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), sql);
        assert!(sql.contains("ADD CONSTRAINT users_email_unique UNIQUE (\"email\");"));
    }

    #[test]
    fn test_render_uses_configured_identifier_policy() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("odd.yaml");
        std::fs::write(&file, "tables:\n  - table: \"we`ird\"\n    commands:\n      - kind: drop\n")
            .unwrap();

        assert!(run(&[file.clone()], None, &CliConfig::default()).is_err());

        let mut config = CliConfig::default();
        config.identifiers = IdentifierPolicy::Escape;
        assert_eq!(run(&[file], None, &config).unwrap(), "DROP TABLE `we``ird`;\n");
    }
}
