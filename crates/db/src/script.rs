//! SQL script runner.
//!
//! Splits a schema/seed file into statements and executes them one at a
//! time against a single connection, stopping at the first failure.
//!
//! Splitting rules:
//! - each physical line is trimmed
//! - empty lines and lines starting with `--` are skipped
//! - a statement ends when a trimmed line ends with `;`
//!
//! A `;` anywhere else on a line does not end the statement. This is a
//! line-oriented splitter, not a SQL tokenizer. Lines of one statement
//! keep their line breaks, so a trailing `--` comment ends with its line.

use std::path::{Path, PathBuf};

use sqlx::PgConnection;

use crate::connection::ConnectionSource;
use crate::error::DbError;

/// Marker that starts a comment line.
const COMMENT_PREFIX: &str = "--";

/// Number of characters of each statement echoed to the log.
pub const PREVIEW_CHARS: usize = 15;

/// One complete statement extracted from a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// 1-based position among the statements of the script.
    pub ordinal: usize,
    /// 1-based source line holding the terminating `;`.
    pub line: usize,
    /// Statement text, trimmed physical lines joined by `\n`.
    pub sql: String,
}

impl Statement {
    /// Leading characters of the statement followed by `...`.
    pub fn preview(&self) -> String {
        preview(&self.sql)
    }
}

/// First [`PREVIEW_CHARS`] characters of `text` on one line, followed by `...`.
pub fn preview(text: &str) -> String {
    let head: String = text
        .chars()
        .take(PREVIEW_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    format!("{head}...")
}

/// Result of splitting a script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedScript {
    pub statements: Vec<Statement>,
    /// Text accumulated after the last `;`, which is never executed.
    pub trailing: Option<String>,
}

/// Split `text` into statements.
pub fn parse_statements(text: &str) -> ParsedScript {
    let mut statements = Vec::new();
    let mut buffer = String::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }

        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(line);

        if line.ends_with(';') {
            statements.push(Statement {
                ordinal: statements.len() + 1,
                line: index + 1,
                sql: std::mem::take(&mut buffer),
            });
        }
    }

    ParsedScript {
        statements,
        trailing: (!buffer.is_empty()).then_some(buffer),
    }
}

/// Summary of a script that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptReport {
    /// Number of statements executed.
    pub executed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The script resource could not be read.
    #[error("Failed to read script {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No connection could be obtained to run the script on.
    #[error(transparent)]
    Connection(#[from] DbError),

    /// A statement was rejected by the database. Statements before it
    /// remain applied.
    #[error("At line {line} : {source}")]
    Statement {
        ordinal: usize,
        line: usize,
        source: sqlx::Error,
    },
}

/// Executes SQL scripts statement by statement.
///
/// No transaction is opened, so a failure part-way through leaves the
/// earlier statements committed.
pub struct ScriptRunner;

impl ScriptRunner {
    /// Read the script at `path` and run it on `conn`.
    pub async fn run_file(
        conn: &mut PgConnection,
        path: impl AsRef<Path>,
    ) -> Result<ScriptReport, ScriptError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ScriptError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!(path = %path.display(), "Running SQL script");
        Self::run_str(conn, &text).await
    }

    /// Obtain one connection from `source` and run the script at `path` on it.
    pub async fn run_file_with<S: ConnectionSource>(
        source: &S,
        path: impl AsRef<Path>,
    ) -> Result<ScriptReport, ScriptError> {
        let mut conn = source.connect().await?;
        Self::run_file(&mut *conn, path).await
    }

    /// Run every statement in `text` in order.
    pub async fn run_str(conn: &mut PgConnection, text: &str) -> Result<ScriptReport, ScriptError> {
        let parsed = parse_statements(text);

        for statement in &parsed.statements {
            if let Err(source) = sqlx::raw_sql(&statement.sql).execute(&mut *conn).await {
                tracing::error!(
                    ordinal = statement.ordinal,
                    line = statement.line,
                    error = %source,
                    "Statement failed, aborting script"
                );
                return Err(ScriptError::Statement {
                    ordinal: statement.ordinal,
                    line: statement.line,
                    source,
                });
            }
            tracing::info!(
                ordinal = statement.ordinal,
                preview = %statement.preview(),
                "Command successfully executed"
            );
        }

        if let Some(trailing) = &parsed.trailing {
            tracing::warn!(
                chars = trailing.len(),
                preview = %preview(trailing),
                "Script ends with an unterminated statement; it was not executed"
            );
        }

        Ok(ScriptReport {
            executed: parsed.statements.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_of(parsed: &ParsedScript) -> Vec<&str> {
        parsed.statements.iter().map(|s| s.sql.as_str()).collect()
    }

    #[test]
    fn single_line_statements() {
        let parsed = parse_statements("SELECT 1;\nSELECT 2;\n");
        assert_eq!(sql_of(&parsed), ["SELECT 1;", "SELECT 2;"]);
        assert_eq!(parsed.trailing, None);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let text = "-- header\n\n   \nSELECT 1;\n  -- indented comment\nSELECT 2;";
        let parsed = parse_statements(text);
        assert_eq!(sql_of(&parsed), ["SELECT 1;", "SELECT 2;"]);
    }

    #[test]
    fn multi_line_statement_keeps_line_breaks() {
        let text = "CREATE TABLE t (\n    id BIGSERIAL\n    PRIMARY KEY\n);";
        let parsed = parse_statements(text);
        assert_eq!(sql_of(&parsed), ["CREATE TABLE t (\nid BIGSERIAL\nPRIMARY KEY\n);"]);
    }

    #[test]
    fn inline_comment_ends_at_its_line() {
        let text = "CREATE TABLE t (\n    id INT, -- primary id\n    name TEXT\n);";
        let parsed = parse_statements(text);
        assert_eq!(
            sql_of(&parsed),
            ["CREATE TABLE t (\nid INT, -- primary id\nname TEXT\n);"]
        );
        assert_eq!(parsed.statements[0].line, 4);
    }

    #[test]
    fn mid_line_semicolon_does_not_terminate() {
        let text = "INSERT INTO t VALUES ('a;b'),\n('c');";
        let parsed = parse_statements(text);
        assert_eq!(parsed.statements.len(), 1);
        assert_eq!(parsed.statements[0].sql, "INSERT INTO t VALUES ('a;b'),\n('c');");
    }

    #[test]
    fn trailing_comment_after_semicolon_carries_into_next_statement() {
        // The line does not end with `;`, so both lines form one batch; the
        // comment still stops at its own line break.
        let text = "SELECT 1; -- note\nSELECT 2;";
        let parsed = parse_statements(text);
        assert_eq!(sql_of(&parsed), ["SELECT 1; -- note\nSELECT 2;"]);
    }

    #[test]
    fn records_terminating_line_and_ordinal() {
        let text = "-- seed\nSELECT 1;\n\nSELECT\n2;\n";
        let parsed = parse_statements(text);
        assert_eq!(parsed.statements[0].ordinal, 1);
        assert_eq!(parsed.statements[0].line, 2);
        assert_eq!(parsed.statements[1].ordinal, 2);
        assert_eq!(parsed.statements[1].line, 5);
    }

    #[test]
    fn unterminated_tail_is_reported_not_returned() {
        let parsed = parse_statements("SELECT 1;\nSELECT 2\nFROM t");
        assert_eq!(sql_of(&parsed), ["SELECT 1;"]);
        assert_eq!(parsed.trailing.as_deref(), Some("SELECT 2\nFROM t"));
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse_statements(""), ParsedScript::default());
    }

    #[test]
    fn windows_line_endings() {
        let parsed = parse_statements("SELECT 1;\r\nSELECT 2;\r\n");
        assert_eq!(sql_of(&parsed), ["SELECT 1;", "SELECT 2;"]);
    }

    #[test]
    fn preview_truncates_to_fifteen_chars() {
        let statement = Statement {
            ordinal: 1,
            line: 1,
            sql: "CREATE TABLE categories (id BIGSERIAL);".to_string(),
        };
        assert_eq!(statement.preview(), "CREATE TABLE ca...");
    }

    #[test]
    fn preview_of_short_statement() {
        let statement = Statement {
            ordinal: 1,
            line: 1,
            sql: "SELECT 1;".to_string(),
        };
        assert_eq!(statement.preview(), "SELECT 1;...");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let statement = Statement {
            ordinal: 1,
            line: 1,
            sql: "INSERT 'ééééééééééé';".to_string(),
        };
        assert_eq!(statement.preview().chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn preview_flattens_line_breaks() {
        assert_eq!(preview("CREATE TABLE t (\nid INT\n);"), "CREATE TABLE t ...");
        assert_eq!(preview("SELECT\n2"), "SELECT 2...");
    }

    #[test]
    fn display_statement_error() {
        let err = ScriptError::Statement {
            ordinal: 2,
            line: 7,
            source: sqlx::Error::Protocol("syntax error".to_string()),
        };
        assert!(err.to_string().starts_with("At line 7 : "));
    }
}
