//! Grammar configuration
//!
//! Quoting behaviour is passed explicitly into each grammar's constructor.
//! `None` fields fall back to the dialect defaults.

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::{SchemaError, SchemaResult};

/// What to do with an identifier that contains the dialect's quote character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierPolicy {
    /// Fail with `MalformedIdentifier`
    #[default]
    Reject,
    /// Double the quote character inside the identifier
    Escape,
}

impl std::str::FromStr for IdentifierPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" | "strict" => Ok(IdentifierPolicy::Reject),
            "escape" => Ok(IdentifierPolicy::Escape),
            _ => Err(format!("Unknown identifier policy: {}", s)),
        }
    }
}

impl std::fmt::Display for IdentifierPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifierPolicy::Reject => write!(f, "reject"),
            IdentifierPolicy::Escape => write!(f, "escape"),
        }
    }
}

/// Quote characters that open and close an identifier with the same character
pub const QUOTE_CHARACTERS: [char; 2] = ['`', '"'];

/// Configuration consumed by the grammar constructors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Identifier quote character override
    pub quote: Option<char>,
    /// Handling of quote characters inside identifiers
    pub identifier_policy: IdentifierPolicy,
    /// Identifier length limit override
    pub max_identifier_length: Option<usize>,
}

impl GrammarConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = Some(quote);
        self
    }

    pub fn with_identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifier_policy = policy;
        self
    }

    pub fn with_max_identifier_length(mut self, length: usize) -> Self {
        self.max_identifier_length = Some(length);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> SchemaResult<()> {
        if let Some(quote) = self.quote {
            if !QUOTE_CHARACTERS.contains(&quote) {
                return Err(SchemaError::configuration(format!(
                    "'{}' cannot be used as an identifier quote character (expected ` or \")",
                    quote.escape_default()
                )));
            }
        }

        if self.max_identifier_length == Some(0) {
            return Err(SchemaError::configuration(
                "max_identifier_length must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Settings with dialect defaults filled in
    pub fn resolve(&self, dialect: Dialect) -> QuoteStyle {
        QuoteStyle {
            quote: self.quote.unwrap_or_else(|| dialect.identifier_quote()),
            policy: self.identifier_policy,
            max_length: self
                .max_identifier_length
                .unwrap_or_else(|| dialect.max_identifier_length()),
            length_in_bytes: dialect.identifier_length_in_bytes(),
            backslash_escapes: dialect.backslash_escapes(),
        }
    }
}

/// Fully resolved quoting rules for one grammar instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteStyle {
    pub quote: char,
    pub policy: IdentifierPolicy,
    pub max_length: usize,
    /// Whether `max_length` counts bytes rather than characters
    pub length_in_bytes: bool,
    pub backslash_escapes: bool,
}
