//! SQL dialects supported by the schema grammars

use serde::{Deserialize, Serialize};

/// Database dialect enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[serde(alias = "mariadb")]
    MySql,
    #[serde(alias = "postgresql", alias = "pgsql")]
    Postgres,
}

impl Dialect {
    /// All supported dialects, in a stable order
    pub const ALL: [Dialect; 2] = [Dialect::MySql, Dialect::Postgres];

    /// Get the quote character for identifiers in this dialect
    pub fn identifier_quote(&self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Postgres => '"',
        }
    }

    /// Longest identifier the server accepts without truncation
    pub fn max_identifier_length(&self) -> usize {
        match self {
            Dialect::MySql => 64,
            Dialect::Postgres => 63,
        }
    }

    /// Whether the identifier limit counts bytes (Postgres NAMEDATALEN)
    /// rather than characters
    pub fn identifier_length_in_bytes(&self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    /// Whether backslash acts as an escape inside string literals
    pub fn backslash_escapes(&self) -> bool {
        matches!(self, Dialect::MySql)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "postgres" | "postgresql" | "pgsql" => Ok(Dialect::Postgres),
            _ => Err(format!("Unsupported database dialect: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_parsing_accepts_aliases() {
        assert_eq!("MySQL".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert_eq!("mariadb".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert_eq!("postgresql".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("pgsql".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert!("sqlite".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_dialect_constants() {
        assert_eq!(Dialect::MySql.identifier_quote(), '`');
        assert_eq!(Dialect::Postgres.identifier_quote(), '"');
        assert_eq!(Dialect::Postgres.max_identifier_length(), 63);
        assert_eq!(Dialect::MySql.to_string(), "mysql");
    }
}
