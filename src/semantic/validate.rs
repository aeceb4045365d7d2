//! Structural validation of the raw statement text.
//!
//! Runs before parsing, over the normalized text and its token stream,
//! given the column-name sets of both candidate tables. Each check fails
//! with a `Format` error carrying a human-readable cause, in a fixed order
//! so callers see the most fundamental problem first.

use crate::error::{Error, Result};
use crate::parsing::{Keyword, Lexer, Token};

/// Collapses every run of whitespace (including newlines) to a single
/// space and trims the ends. Statements must not rely on literal newline
/// content.
pub fn normalize(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Validates normalized statement text against the restricted grammar.
/// `update_columns` and `join_columns` are the known column names of the
/// update table and the joined table (empty when absent).
pub fn validate(sql: &str, update_columns: &[String], join_columns: &[String]) -> Result<()> {
    let tokens = Lexer::scan_all(sql)?;

    // The update target must declare an alias: update <table> <alias> set.
    let has_update_alias = matches!(
        tokens.as_slice(),
        [Token::Keyword(Keyword::Update), Token::Ident(_), Token::Ident(_), Token::Keyword(Keyword::Set), ..]
    );
    if !has_update_alias {
        return Err(Error::Format("missing update alias".into()));
    }

    // A joined table must declare one too: join <table> <alias> on.
    let join_at = tokens
        .iter()
        .position(|t| *t == Token::Keyword(Keyword::Join));
    if let Some(i) = join_at {
        if tokens.iter().any(|t| *t == Token::Keyword(Keyword::On)) {
            let has_join_alias = matches!(
                tokens.get(i + 1..i + 4),
                Some([Token::Ident(_), Token::Ident(_), Token::Keyword(Keyword::On)])
            );
            if !has_join_alias {
                return Err(Error::Format("missing join alias".into()));
            }
        }
    }

    // Aliases are positional; the as keyword is forbidden.
    if tokens.iter().any(|t| *t == Token::Keyword(Keyword::As)) {
        return Err(Error::Format("unexpected alias keyword".into()));
    }

    // This system exists for conditional, row-scoped updates.
    if !tokens.iter().any(|t| *t == Token::Keyword(Keyword::Where)) {
        return Err(Error::Format("unconditional update not supported".into()));
    }

    // The dialect is all lower-case. Keywords lex case-insensitively so the
    // checks above still classify an upper-case statement; this rejects it.
    if sql.chars().any(|c| c.is_uppercase()) {
        return Err(Error::Format("mixed case not allowed".into()));
    }

    // Every column reference must be alias-qualified: a bare identifier
    // matching a known column, without a preceding `.`, is ambiguous.
    for (i, token) in tokens.iter().enumerate() {
        let Token::Ident(name) = token else { continue };
        if i > 0 && tokens[i - 1] == Token::Period {
            continue;
        }
        if update_columns.iter().any(|c| c == name) {
            return Err(Error::Format(format!(
                "column reference missing table alias: {} is a column of the update table",
                name
            )));
        }
        if join_columns.iter().any(|c| c == name) {
            return Err(Error::Format(format!(
                "column reference missing table alias: {} is a column of the joined table",
                name
            )));
        }
    }

    Ok(())
}
