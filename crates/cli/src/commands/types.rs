use blueprint_schema::{Column, ColumnType, SqlGrammar, DEFAULT_STRING_LENGTH};

/// Logical type name paired with the SQL the grammar renders for it
pub fn type_rows(grammar: &dyn SqlGrammar) -> Vec<(String, String)> {
    let mut serial = Column::new("id", ColumnType::Integer);
    serial.increment();

    let samples = [
        ("string", Column::new("c", ColumnType::String { length: DEFAULT_STRING_LENGTH })),
        ("integer", Column::new("c", ColumnType::Integer)),
        ("integer (increment)", serial),
        ("boolean", Column::new("c", ColumnType::Boolean)),
        ("date", Column::new("c", ColumnType::Date)),
        ("timestamp", Column::new("c", ColumnType::Timestamp)),
        ("text", Column::new("c", ColumnType::Text)),
        ("blob", Column::new("c", ColumnType::Blob)),
        ("float", Column::new("c", ColumnType::Float)),
        ("decimal", Column::new("c", ColumnType::Decimal { precision: 8, scale: 2 })),
        (
            "enum",
            Column::new(
                "c",
                ColumnType::Enum {
                    values: vec!["a".to_string(), "b".to_string()],
                },
            ),
        ),
    ];

    samples
        .iter()
        .map(|(name, column)| {
            let sql = grammar
                .type_sql(column)
                .unwrap_or_else(|_| "(unsupported)".to_string());
            (name.to_string(), sql)
        })
        .collect()
}

/// Two-column text table of `type_rows`
pub fn render(grammar: &dyn SqlGrammar) -> String {
    let rows = type_rows(grammar);
    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut out = format!("Column types for {}:\n", grammar.dialect());
    for (name, sql) in rows {
        out.push_str(&format!("  {:<width$}  {}\n", name, sql, width = width));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_schema::{MySqlGrammar, PostgresGrammar};

    fn lookup<'a>(rows: &'a [(String, String)], name: &str) -> &'a str {
        rows.iter()
            .find(|(n, _)| n == name)
            .map(|(_, sql)| sql.as_str())
            .unwrap()
    }

    #[test]
    fn test_mysql_rows() {
        let rows = type_rows(&MySqlGrammar::default());
        assert_eq!(lookup(&rows, "string"), "VARCHAR(200)");
        assert_eq!(lookup(&rows, "integer (increment)"), "INT");
        assert_eq!(lookup(&rows, "boolean"), "TINYINT");
        assert_eq!(lookup(&rows, "enum"), "(unsupported)");
    }

    #[test]
    fn test_postgres_rows() {
        let rows = type_rows(&PostgresGrammar::default());
        assert_eq!(lookup(&rows, "integer"), "BIGINT");
        assert_eq!(lookup(&rows, "integer (increment)"), "SERIAL");
        assert_eq!(lookup(&rows, "blob"), "BYTEA");
        assert_eq!(lookup(&rows, "enum"), "ENUM('a', 'b')");
    }

    #[test]
    fn test_render_header() {
        let out = render(&PostgresGrammar::default());
        assert!(out.starts_with("Column types for postgres:\n"));
        assert_eq!(out.lines().count(), 12);
    }
}
