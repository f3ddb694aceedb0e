use std::path::PathBuf;

use blueprint_schema::{Dialect, Schema};

use super::{compile_tables, load_tables};
use crate::config::CliConfig;

/// Outcome of compiling one manifest for one dialect
#[derive(Debug)]
pub struct CheckResult {
    pub file: PathBuf,
    pub dialect: Dialect,
    pub outcome: Result<usize, String>,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl std::fmt::Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            Ok(count) => write!(
                f,
                "ok    {} [{}]: {} statement(s)",
                self.file.display(),
                self.dialect,
                count
            ),
            Err(error) => write!(f, "FAIL  {} [{}]: {}", self.file.display(), self.dialect, error),
        }
    }
}

/// Compile every manifest for every dialect
///
/// Failures are collected rather than returned, so one bad manifest does not
/// hide problems in the others.
pub fn run(files: &[PathBuf], config: &CliConfig) -> anyhow::Result<Vec<CheckResult>> {
    let mut schemas = Vec::with_capacity(Dialect::ALL.len());
    for dialect in Dialect::ALL {
        schemas.push(Schema::for_dialect(dialect, config.grammar_config())?);
    }

    let mut results = Vec::new();
    for file in files {
        let tables = load_tables(std::slice::from_ref(file));

        for schema in &schemas {
            let dialect = schema.grammar().dialect();
            let outcome = match &tables {
                Ok(tables) => compile_tables(schema, tables)
                    .map(|statements| statements.len())
                    .map_err(|e| format!("{:#}", e)),
                Err(e) => Err(format!("{:#}", e)),
            };

            if let Err(error) = &outcome {
                tracing::warn!(file = %file.display(), dialect = %dialect, error = %error, "check failed");
            }

            results.push(CheckResult {
                file: file.clone(),
                dialect,
                outcome,
            });
        }
    }

    Ok(results)
}
