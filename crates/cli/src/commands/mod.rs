pub mod check;
pub mod make;
pub mod render;
pub mod types;

use std::path::{Path, PathBuf};

use anyhow::Context;
use blueprint_schema::{Schema, SchemaManifest, Table};

/// Load every table from the given manifest files, in argument order
pub fn load_tables(files: &[PathBuf]) -> anyhow::Result<Vec<Table>> {
    let mut tables = Vec::new();

    for file in files {
        tables.extend(load_file(file)?);
    }

    Ok(tables)
}

fn load_file(file: &Path) -> anyhow::Result<Vec<Table>> {
    let manifest = SchemaManifest::from_path(file)
        .with_context(|| format!("Failed to read manifest {}", file.display()))?;

    let tables = manifest
        .into_tables()
        .with_context(|| format!("Invalid manifest {}", file.display()))?;

    tracing::debug!(file = %file.display(), tables = tables.len(), "loaded manifest");
    Ok(tables)
}

/// Compile every table, keeping statement order
pub fn compile_tables(schema: &Schema, tables: &[Table]) -> anyhow::Result<Vec<String>> {
    let mut statements = Vec::new();

    for table in tables {
        let compiled = schema.compile(table).with_context(|| {
            format!(
                "Failed to compile table '{}' for {}",
                table.name,
                schema.grammar().dialect()
            )
        })?;
        statements.extend(compiled);
    }

    Ok(statements)
}

/// One statement per line, each terminated by `;`
pub fn format_statements(statements: &[String]) -> String {
    statements
        .iter()
        .map(|statement| format!("{};\n", statement))
        .collect()
}
