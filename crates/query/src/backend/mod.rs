//! Query backend trait and the polars implementation

pub mod polars;

use async_trait::async_trait;

use crate::error::QueryError;
use crate::result::{QueryResult, TableInfo};

/// Query backend trait
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Execute a SQL query
    async fn execute(&self, sql: &str) -> Result<QueryResult, QueryError>;

    /// Check that every input table is present
    async fn health_check(&self) -> Result<(), QueryError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// List available tables
    async fn list_tables(&self) -> Result<Vec<TableInfo>, QueryError>;
}

/// Validate SQL query - only allow SELECT and WITH (CTE) queries
///
/// A guardrail against accidental writes, not a security boundary: the
/// tables are local files the caller can already modify.
pub fn validate_sql(sql: &str) -> Result<(), QueryError> {
    let trimmed = strip_leading_comments(sql);
    let upper = trimmed.to_uppercase();

    if upper.is_empty() {
        return Err(QueryError::InvalidSql("empty query".to_string()));
    }

    if !upper.starts_with("SELECT") && !upper.starts_with("WITH") {
        return Err(QueryError::InvalidSql(
            "only SELECT and WITH queries are allowed".to_string(),
        ));
    }

    if upper.contains(" INTO ") {
        return Err(QueryError::InvalidSql(
            "SELECT INTO is not allowed".to_string(),
        ));
    }

    // trailing semicolon is fine
    let body = trimmed.trim_end().trim_end_matches(';');
    if body.contains(';') {
        return Err(QueryError::InvalidSql(
            "multiple statements not allowed".to_string(),
        ));
    }

    Ok(())
}

/// Drop leading whitespace and `--` line comments
fn strip_leading_comments(sql: &str) -> &str {
    let mut rest = sql.trim_start();
    while let Some(comment) = rest.strip_prefix("--") {
        rest = match comment.find('\n') {
            Some(end) => comment[end + 1..].trim_start(),
            None => "",
        };
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sql_select() {
        assert!(validate_sql("SELECT * FROM orders").is_ok());
        assert!(validate_sql("  SELECT count(*) FROM events  ").is_ok());
        assert!(validate_sql("select status, count(*) from orders group by status").is_ok());
    }

    #[test]
    fn test_validate_sql_with() {
        assert!(
            validate_sql("WITH buyers AS (SELECT DISTINCT user_id FROM orders) SELECT * FROM buyers")
                .is_ok()
        );
    }

    #[test]
    fn test_validate_sql_writes_rejected() {
        assert!(validate_sql("INSERT INTO orders VALUES (1)").is_err());
        assert!(validate_sql("DELETE FROM users").is_err());
        assert!(validate_sql("DROP TABLE products").is_err());
        assert!(validate_sql("UPDATE orders SET status='Complete'").is_err());
        assert!(validate_sql("CREATE TABLE t AS SELECT 1").is_err());
    }

    #[test]
    fn test_validate_sql_multiple_statements() {
        assert!(validate_sql("SELECT 1; DROP TABLE orders").is_err());
        assert!(validate_sql("SELECT 1; SELECT 2;").is_err());
    }

    #[test]
    fn test_validate_sql_trailing_semicolon_ok() {
        assert!(validate_sql("SELECT * FROM users;").is_ok());
        assert!(validate_sql("SELECT * FROM users;  \n").is_ok());
    }

    #[test]
    fn test_validate_sql_select_into_blocked() {
        assert!(validate_sql("SELECT * INTO backup FROM orders").is_err());
    }

    #[test]
    fn test_validate_sql_leading_comment() {
        assert!(validate_sql("-- monthly buyers\nSELECT * FROM orders").is_ok());
        assert!(validate_sql("-- only a comment").is_err());
    }

    #[test]
    fn test_validate_sql_empty() {
        assert!(validate_sql("").is_err());
        assert!(validate_sql("   ").is_err());
    }
}
