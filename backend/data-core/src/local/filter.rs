//! Query translation for local stores.

use crate::error::LocalStoreError;

use common::ErrorLocation;
use models::Query;

use std::panic::Location;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

static IDENTIFIER_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_identifier_regex() -> &'static Regex {
    IDENTIFIER_REGEX.get_or_init(|| Regex::new(IDENTIFIER_PATTERN).expect("valid regex pattern"))
}

/// Renders the JSON field bound at the path parameter as [`Query::value_text`]
/// does: strings unquoted, everything else as its stored JSON text.
const FIELD_AS_TEXT_SQL: &str = "(CASE json_type(body, ?{path}) \
     WHEN 'text' THEN json_extract(body, ?{path}) \
     WHEN 'null' THEN NULL \
     ELSE body -> ?{path} END)";

/// A `SELECT` statement with its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlSelect {
    pub sql: String,
    pub params: Vec<String>,
}

/// Reject anything that is not a plain identifier.
///
/// Field names end up inside JSON paths and table names inside SQL text, so
/// dots, brackets and quotes are never allowed through.
#[track_caller]
pub fn validate_identifier(name: &str) -> Result<(), LocalStoreError> {
    if get_identifier_regex().is_match(name) {
        Ok(())
    } else {
        Err(LocalStoreError::InvalidField {
            field: name.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Build `SELECT body FROM table [WHERE f1 = ? AND f2 = ?] ORDER BY id`.
///
/// An empty query yields the unfiltered statement.
#[track_caller]
pub fn sql_where(table: &str, query: &Query) -> Result<SqlSelect, LocalStoreError> {
    validate_identifier(table)?;

    let mut sql = format!("SELECT body FROM \"{table}\"");
    let mut params = Vec::with_capacity(query.len() * 2);

    for (index, (field, value)) in query.iter().enumerate() {
        validate_identifier(field)?;

        sql.push_str(if index == 0 { " WHERE " } else { " AND " });

        let path_param = params.len() + 1;
        let value_param = params.len() + 2;
        let field_sql = FIELD_AS_TEXT_SQL.replace("{path}", &path_param.to_string());
        sql.push_str(&format!("{field_sql} = ?{value_param}"));

        params.push(format!("$.{field}"));
        params.push(value.to_string());
    }

    sql.push_str(" ORDER BY id");

    Ok(SqlSelect { sql, params })
}

/// In-memory counterpart of [`sql_where`].
pub fn matches_json(query: &Query, document: &Value) -> bool {
    query.iter().all(|(field, expected)| {
        document
            .get(field)
            .and_then(Query::value_text)
            .is_some_and(|actual| actual == expected)
    })
}
