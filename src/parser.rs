//! Lightweight statement inspection used to label `db.query` spans.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Kind of SQL statement, judged from its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlOperation {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Drop,
    Alter,
    Truncate,
    Begin,
    Commit,
    Rollback,
    Other,
}

impl SqlOperation {
    /// Returns the operation as a string suitable for span names.
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlOperation::Select => "SELECT",
            SqlOperation::Insert => "INSERT",
            SqlOperation::Update => "UPDATE",
            SqlOperation::Delete => "DELETE",
            SqlOperation::Create => "CREATE",
            SqlOperation::Drop => "DROP",
            SqlOperation::Alter => "ALTER",
            SqlOperation::Truncate => "TRUNCATE",
            SqlOperation::Begin => "BEGIN",
            SqlOperation::Commit => "COMMIT",
            SqlOperation::Rollback => "ROLLBACK",
            SqlOperation::Other => "QUERY",
        }
    }

    fn from_keyword(keyword: &str) -> Self {
        match keyword.to_ascii_uppercase().as_str() {
            "SELECT" | "WITH" => SqlOperation::Select,
            "INSERT" => SqlOperation::Insert,
            "UPDATE" => SqlOperation::Update,
            "DELETE" => SqlOperation::Delete,
            "CREATE" => SqlOperation::Create,
            "DROP" => SqlOperation::Drop,
            "ALTER" => SqlOperation::Alter,
            "TRUNCATE" => SqlOperation::Truncate,
            "BEGIN" | "START" => SqlOperation::Begin,
            "COMMIT" => SqlOperation::Commit,
            "ROLLBACK" => SqlOperation::Rollback,
            _ => SqlOperation::Other,
        }
    }
}

impl fmt::Display for SqlOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Optional schema prefix, optional quoting, captured bare table name.
const TABLE: &str = r#"(?:[`"\[]?\w+[`"\]]?\.)?[`"\[]?(\w+)[`"\]]?"#;

static TABLE_PATTERNS: Lazy<Vec<(SqlOperation, Regex)>> = Lazy::new(|| {
    [
        (SqlOperation::Select, r"\bFROM\s+"),
        (SqlOperation::Insert, r"\bINSERT\s+INTO\s+"),
        (SqlOperation::Update, r"\bUPDATE\s+(?:ONLY\s+)?"),
        (SqlOperation::Delete, r"\bDELETE\s+FROM\s+"),
        (
            SqlOperation::Create,
            r"\bCREATE\s+(?:TEMP(?:ORARY)?\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?",
        ),
        (SqlOperation::Drop, r"\bDROP\s+TABLE\s+(?:IF\s+EXISTS\s+)?"),
        (SqlOperation::Alter, r"\bALTER\s+TABLE\s+"),
        (SqlOperation::Truncate, r"\bTRUNCATE\s+(?:TABLE\s+)?"),
    ]
    .into_iter()
    .filter_map(|(operation, prefix)| {
        Regex::new(&format!("(?i){prefix}{TABLE}"))
            .ok()
            .map(|regex| (operation, regex))
    })
    .collect()
});

/// Parse the SQL operation from a statement.
pub fn parse_operation(sql: &str) -> SqlOperation {
    sql.split_whitespace()
        .next()
        .map(|keyword| keyword.trim_end_matches(';'))
        .map_or(SqlOperation::Other, SqlOperation::from_keyword)
}

/// Extract the primary table name from a statement, lowercased.
pub fn extract_table(sql: &str) -> Option<String> {
    let operation = parse_operation(sql);

    TABLE_PATTERNS
        .iter()
        .find(|(candidate, _)| *candidate == operation)
        .and_then(|(_, regex)| regex.captures(sql))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Operation and table of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSql {
    pub operation: SqlOperation,
    pub table: Option<String>,
}

impl ParsedSql {
    /// Parse a statement into its operation and table.
    pub fn parse(sql: &str) -> Self {
        Self {
            operation: parse_operation(sql),
            table: extract_table(sql),
        }
    }

    /// "{OPERATION} {table}", or just the operation when no table was found.
    pub fn span_name(&self) -> String {
        match &self.table {
            Some(table) => format!("{} {}", self.operation, table),
            None => self.operation.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operation() {
        assert_eq!(parse_operation("SELECT * FROM users"), SqlOperation::Select);
        assert_eq!(parse_operation("  select id from orders"), SqlOperation::Select);
        assert_eq!(
            parse_operation("WITH cte AS (SELECT 1) SELECT * FROM cte"),
            SqlOperation::Select
        );
        assert_eq!(
            parse_operation("INSERT INTO users (name) VALUES ('test')"),
            SqlOperation::Insert
        );
        assert_eq!(parse_operation("DELETE FROM users"), SqlOperation::Delete);
        assert_eq!(parse_operation("VACUUM"), SqlOperation::Other);
        assert_eq!(parse_operation(""), SqlOperation::Other);
    }

    #[test]
    fn test_transaction_operations() {
        assert_eq!(parse_operation("BEGIN;"), SqlOperation::Begin);
        assert_eq!(parse_operation("START TRANSACTION"), SqlOperation::Begin);
        assert_eq!(parse_operation("commit"), SqlOperation::Commit);
        assert_eq!(parse_operation("ROLLBACK"), SqlOperation::Rollback);
    }

    #[test]
    fn test_extract_table() {
        assert_eq!(
            extract_table(r#"SELECT * FROM "Users" WHERE id = 1"#),
            Some("users".to_string())
        );
        assert_eq!(
            extract_table("UPDATE students SET name = $1 WHERE id = $2"),
            Some("students".to_string())
        );
        assert_eq!(
            extract_table("DELETE FROM assignments WHERE id = $1"),
            Some("assignments".to_string())
        );
        assert_eq!(
            extract_table("CREATE TABLE IF NOT EXISTS audit_log (id int)"),
            Some("audit_log".to_string())
        );
        assert_eq!(extract_table("SELECT 1"), None);
        assert_eq!(extract_table("COMMIT"), None);
    }

    #[test]
    fn test_extract_schema_qualified_table() {
        assert_eq!(
            extract_table(r#"INSERT INTO "public"."grades" (score) VALUES ($1)"#),
            Some("grades".to_string())
        );
        assert_eq!(
            extract_table("SELECT u.* FROM app.users u JOIN orders o ON u.id = o.user_id"),
            Some("users".to_string())
        );
    }

    #[test]
    fn test_span_name() {
        let parsed = ParsedSql::parse("SELECT * FROM users WHERE id = 1");
        assert_eq!(parsed.span_name(), "SELECT users");

        let parsed = ParsedSql::parse("BEGIN");
        assert_eq!(parsed.span_name(), "BEGIN");
    }
}
