//! The lexer turns normalized statement text into a flat stream of tokens.
//!
//! Comparison operators are scanned as whole tokens, so `<=`, `>=` and `<>`
//! can never be corrupted by later single-character rewriting. Keywords are
//! matched case-insensitively; the validator owns the all-lower-case rule
//! and rejects mixed-case statements with a precise cause instead of a lex
//! error.

use crate::error::{Error, Result};
use std::fmt::Display;
use std::iter::Peekable;
use std::str::Chars;

/// A lexical token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// A numeric literal, e.g. `3` or `3.14`.
    Number(String),
    /// A single-quoted string literal, quotes stripped, `''` unescaped.
    String(String),
    /// An identifier: table, alias, column or function name.
    Ident(String),
    /// A reserved keyword.
    Keyword(Keyword),

    Period,             // .
    Equal,              // =
    NotEqual,           // !=
    LessThan,           // <
    LessThanOrEqual,    // <=
    LessOrGreaterThan,  // <>
    GreaterThan,        // >
    GreaterThanOrEqual, // >=
    Plus,               // +
    Minus,              // -
    Asterisk,           // *
    Slash,              // /
    Percent,            // %
    OpenParen,          // (
    CloseParen,         // )
    Comma,              // ,
    Semicolon,          // ;
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Token::Number(n) => n,
            Token::String(s) => s,
            Token::Ident(s) => s,
            Token::Keyword(k) => return k.fmt(f),
            Token::Period => ".",
            Token::Equal => "=",
            Token::NotEqual => "!=",
            Token::LessThan => "<",
            Token::LessThanOrEqual => "<=",
            Token::LessOrGreaterThan => "<>",
            Token::GreaterThan => ">",
            Token::GreaterThanOrEqual => ">=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Asterisk => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::Comma => ",",
            Token::Semicolon => ";",
        })
    }
}

impl From<Keyword> for Token {
    fn from(keyword: Keyword) -> Self {
        Token::Keyword(keyword)
    }
}

/// Reserved keywords. `As`, `Between`, `Case` and `Like` are recognized
/// only so they can be rejected with a precise error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    And,
    As,
    Between,
    Case,
    False,
    In,
    Is,
    Join,
    Left,
    Like,
    Not,
    Null,
    On,
    Or,
    Set,
    True,
    Update,
    Where,
}

impl Keyword {
    /// Matches an identifier-shaped word against the keyword table,
    /// case-insensitively.
    fn try_from_str(ident: &str) -> Option<Self> {
        Some(match ident.to_ascii_lowercase().as_str() {
            "and" => Self::And,
            "as" => Self::As,
            "between" => Self::Between,
            "case" => Self::Case,
            "false" => Self::False,
            "in" => Self::In,
            "is" => Self::Is,
            "join" => Self::Join,
            "left" => Self::Left,
            "like" => Self::Like,
            "not" => Self::Not,
            "null" => Self::Null,
            "on" => Self::On,
            "or" => Self::Or,
            "set" => Self::Set,
            "true" => Self::True,
            "update" => Self::Update,
            "where" => Self::Where,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::As => "as",
            Self::Between => "between",
            Self::Case => "case",
            Self::False => "false",
            Self::In => "in",
            Self::Is => "is",
            Self::Join => "join",
            Self::Left => "left",
            Self::Like => "like",
            Self::Not => "not",
            Self::Null => "null",
            Self::On => "on",
            Self::Or => "or",
            Self::Set => "set",
            Self::True => "true",
            Self::Update => "update",
            Self::Where => "where",
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The lexer itself, an iterator of tokens over the input characters.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Result<Token>> {
        match self.scan() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => self
                .chars
                .peek()
                .map(|c| Err(Error::Parse(format!("unexpected character {}", c)))),
            Err(err) => Some(Err(err)),
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            chars: input.chars().peekable(),
        }
    }

    /// Collects the whole input into a token vector, for callers that need
    /// to look at the stream as a slice (the validator).
    pub fn scan_all(input: &'a str) -> Result<Vec<Token>> {
        Lexer::new(input).collect()
    }

    /// Consumes the next character if it satisfies the predicate.
    fn next_if(&mut self, predicate: impl Fn(char) -> bool) -> Option<char> {
        self.chars.next_if(|&c| predicate(c))
    }

    /// Consumes characters while the predicate holds, returning them as a
    /// string if any were consumed.
    fn next_while(&mut self, predicate: impl Fn(char) -> bool) -> Option<String> {
        let mut value = String::new();
        while let Some(c) = self.next_if(&predicate) {
            value.push(c);
        }
        Some(value).filter(|v| !v.is_empty())
    }

    /// Scans the next token, if any.
    fn scan(&mut self) -> Result<Option<Token>> {
        // Skip whitespace between tokens.
        self.next_while(|c| c.is_whitespace());
        match self.chars.peek() {
            Some('\'') => self.scan_string(),
            Some(c) if c.is_ascii_digit() => Ok(self.scan_number()),
            Some(c) if c.is_alphabetic() || *c == '_' => Ok(self.scan_ident_or_keyword()),
            Some(_) => self.scan_symbol(),
            None => Ok(None),
        }
    }

    /// Scans a single-quoted string literal. `''` escapes a quote.
    fn scan_string(&mut self) -> Result<Option<Token>> {
        if self.next_if(|c| c == '\'').is_none() {
            return Ok(None);
        }
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some('\'') => {
                    if self.next_if(|c| c == '\'').is_some() {
                        value.push('\'');
                    } else {
                        break;
                    }
                }
                Some(c) => value.push(c),
                None => return Err(Error::Parse("unterminated string literal".into())),
            }
        }
        Ok(Some(Token::String(value)))
    }

    /// Scans a number: digits with an optional fractional part.
    fn scan_number(&mut self) -> Option<Token> {
        let mut number = self.next_while(|c| c.is_ascii_digit())?;
        if let Some(sep) = self.next_if(|c| c == '.') {
            number.push(sep);
            if let Some(fraction) = self.next_while(|c| c.is_ascii_digit()) {
                number.push_str(&fraction);
            }
        }
        Some(Token::Number(number))
    }

    /// Scans an identifier or keyword.
    fn scan_ident_or_keyword(&mut self) -> Option<Token> {
        let mut name = self.next_if(|c| c.is_alphabetic() || c == '_')?.to_string();
        if let Some(rest) = self.next_while(|c| c.is_alphanumeric() || c == '_') {
            name.push_str(&rest);
        }
        match Keyword::try_from_str(&name) {
            Some(keyword) => Some(Token::Keyword(keyword)),
            None => Some(Token::Ident(name)),
        }
    }

    /// Scans an operator or punctuation token. Two-character comparison
    /// operators are folded into a single token here.
    fn scan_symbol(&mut self) -> Result<Option<Token>> {
        let token = match self.chars.peek() {
            Some('.') => Token::Period,
            Some('=') => Token::Equal,
            Some('<') => Token::LessThan,
            Some('>') => Token::GreaterThan,
            Some('!') => Token::NotEqual, // completed below
            Some('+') => Token::Plus,
            Some('-') => Token::Minus,
            Some('*') => Token::Asterisk,
            Some('/') => Token::Slash,
            Some('%') => Token::Percent,
            Some('(') => Token::OpenParen,
            Some(')') => Token::CloseParen,
            Some(',') => Token::Comma,
            Some(';') => Token::Semicolon,
            _ => return Ok(None),
        };
        self.chars.next();
        Ok(Some(match token {
            Token::LessThan if self.next_if(|c| c == '=').is_some() => Token::LessThanOrEqual,
            Token::LessThan if self.next_if(|c| c == '>').is_some() => Token::LessOrGreaterThan,
            Token::GreaterThan if self.next_if(|c| c == '=').is_some() => Token::GreaterThanOrEqual,
            Token::NotEqual => {
                if self.next_if(|c| c == '=').is_none() {
                    return Err(Error::Parse("unexpected character !".into()));
                }
                Token::NotEqual
            }
            token => token,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::scan_all(input).unwrap()
    }

    #[test]
    fn test_scan_statement() {
        let tokens = lex("update t a set a.x=1 where a.y>=2");
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Update),
                Token::Ident("t".into()),
                Token::Ident("a".into()),
                Token::Keyword(Keyword::Set),
                Token::Ident("a".into()),
                Token::Period,
                Token::Ident("x".into()),
                Token::Equal,
                Token::Number("1".into()),
                Token::Keyword(Keyword::Where),
                Token::Ident("a".into()),
                Token::Period,
                Token::Ident("y".into()),
                Token::GreaterThanOrEqual,
                Token::Number("2".into()),
            ]
        );
    }

    #[test]
    fn test_comparison_operators_are_whole_tokens() {
        assert_eq!(
            lex("<= >= <> < > = !="),
            vec![
                Token::LessThanOrEqual,
                Token::GreaterThanOrEqual,
                Token::LessOrGreaterThan,
                Token::LessThan,
                Token::GreaterThan,
                Token::Equal,
                Token::NotEqual,
            ]
        );
    }

    #[test]
    fn test_keywords_match_any_case() {
        assert_eq!(lex("WHERE"), vec![Token::Keyword(Keyword::Where)]);
        assert_eq!(lex("Where"), vec![Token::Keyword(Keyword::Where)]);
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(lex("'it''s'"), vec![Token::String("it's".into())]);
        assert!(Lexer::scan_all("'oops").is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            lex("3 3.14"),
            vec![Token::Number("3".into()), Token::Number("3.14".into())]
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert!(Lexer::scan_all("a @ b").is_err());
    }
}
