//! `REGEXP` support for SQLite connections.

use regex::Regex;
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::{Connection, Error};
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Registers `regexp(pattern, text)`, which SQLite calls for `text REGEXP pattern`.
///
/// The compiled pattern is cached per statement.
pub(crate) fn register(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        regexp,
    )
}

fn regexp(ctx: &Context<'_>) -> rusqlite::Result<bool> {
    let regex: Arc<Regex> = ctx.get_or_create_aux(0, |pattern| -> Result<Regex, BoxError> {
        Ok(Regex::new(pattern.as_str()?)?)
    })?;

    let text = ctx
        .get_raw(1)
        .as_str()
        .map_err(|e| Error::UserFunctionError(e.into()))?;

    Ok(regex.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regexp_operator() {
        let conn = Connection::open_in_memory().unwrap();
        register(&conn).unwrap();

        let hit: bool = conn
            .query_row("SELECT 'abc123' REGEXP '[a-z]+\\d+'", [], |row| row.get(0))
            .unwrap();
        assert!(hit);

        let miss: bool = conn
            .query_row("SELECT 'abc' REGEXP '^\\d+$'", [], |row| row.get(0))
            .unwrap();
        assert!(!miss);
    }

    #[test]
    fn test_regexp_invalid_pattern_errors() {
        let conn = Connection::open_in_memory().unwrap();
        register(&conn).unwrap();

        let result: rusqlite::Result<bool> =
            conn.query_row("SELECT 'abc' REGEXP '('", [], |row| row.get(0));
        assert!(result.is_err());
    }
}
