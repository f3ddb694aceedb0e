//! Identifier quoting and literal escaping
//!
//! This module provides functions for:
//! - Quoting table and column identifiers for a dialect
//! - Validating bare names (indexes, constraints, engines) that are emitted unquoted
//! - Escaping string literals used for defaults and enum values

use crate::config::{IdentifierPolicy, QuoteStyle};
use crate::error::{SchemaError, SchemaResult};

/// Characters allowed in bare SQL names (alphanumeric, underscore, dollar)
const ALLOWED_NAME_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_$";

/// Quote a possibly dotted identifier (`schema.table`, `table.column`)
///
/// Each segment is quoted on its own. A `*` segment is passed through.
///
/// # Examples
/// ```
/// use blueprint_schema::config::GrammarConfig;
/// use blueprint_schema::dialect::Dialect;
/// use blueprint_schema::security::wrap;
///
/// let style = GrammarConfig::default().resolve(Dialect::Postgres);
/// assert_eq!(wrap("public.users", &style).unwrap(), "\"public\".\"users\"");
/// ```
pub fn wrap(identifier: &str, style: &QuoteStyle) -> SchemaResult<String> {
    if identifier.is_empty() {
        return Err(SchemaError::malformed_identifier(
            identifier,
            "identifier cannot be empty",
        ));
    }

    let segments = identifier
        .split('.')
        .map(|segment| wrap_segment(identifier, segment, style))
        .collect::<SchemaResult<Vec<_>>>()?;

    Ok(segments.join("."))
}

fn wrap_segment(identifier: &str, segment: &str, style: &QuoteStyle) -> SchemaResult<String> {
    if segment == "*" {
        return Ok(segment.to_string());
    }

    if segment.is_empty() {
        return Err(SchemaError::malformed_identifier(
            identifier,
            "identifier contains an empty segment",
        ));
    }

    if segment.contains('\0') {
        return Err(SchemaError::malformed_identifier(
            identifier,
            "identifier contains a NUL character",
        ));
    }

    let (length, unit) = if style.length_in_bytes {
        (segment.len(), "bytes")
    } else {
        (segment.chars().count(), "characters")
    };
    if length > style.max_length {
        return Err(SchemaError::malformed_identifier(
            identifier,
            format!("segment is too long (max {} {})", style.max_length, unit),
        ));
    }

    let quote = style.quote;
    let body = if segment.contains(quote) {
        match style.policy {
            IdentifierPolicy::Reject => {
                return Err(SchemaError::malformed_identifier(
                    identifier,
                    format!("identifier contains the quote character {}", quote),
                ));
            }
            IdentifierPolicy::Escape => {
                let doubled: String = [quote, quote].iter().collect();
                segment.replace(quote, &doubled)
            }
        }
    } else {
        segment.to_string()
    };

    Ok(format!("{}{}{}", quote, body, quote))
}

/// Quote each column and join the list with `, `
pub fn columnize<S: AsRef<str>>(columns: &[S], style: &QuoteStyle) -> SchemaResult<String> {
    let wrapped = columns
        .iter()
        .map(|column| wrap(column.as_ref(), style))
        .collect::<SchemaResult<Vec<_>>>()?;

    Ok(wrapped.join(", "))
}

/// Validate a name that is emitted without quoting
///
/// Index names, constraint names and storage engines are written bare into
/// the statement, so they are restricted to `[A-Za-z_$][A-Za-z0-9_$]*`.
pub fn validate_name(name: &str) -> SchemaResult<()> {
    let first = match name.chars().next() {
        Some(first) => first,
        None => {
            return Err(SchemaError::malformed_identifier(
                name,
                "name cannot be empty",
            ))
        }
    };

    if first.is_ascii_digit() {
        return Err(SchemaError::malformed_identifier(
            name,
            "name cannot start with a number",
        ));
    }

    if let Some(c) = name.chars().find(|c| !ALLOWED_NAME_CHARS.contains(*c)) {
        return Err(SchemaError::malformed_identifier(
            name,
            format!("name contains invalid character '{}'", c),
        ));
    }

    Ok(())
}

/// Render a string as a single-quoted SQL literal
///
/// Single quotes are doubled. Backslashes are doubled as well for dialects
/// that treat them as escapes.
pub fn quote_literal(value: &str, style: &QuoteStyle) -> String {
    let mut escaped = value.replace('\'', "''");
    if style.backslash_escapes {
        escaped = escaped.replace('\\', "\\\\");
    }
    format!("'{}'", escaped)
}
