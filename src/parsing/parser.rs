//! Recursive-descent parser for the restricted UPDATE dialect.
//!
//! Clause order is fixed by the dialect: `update <table> <alias>` first,
//! then the full `set` list, then an optional `[left] join ... on ...`, then the
//! mandatory `where` predicate. Keywords act as hard clause boundaries, so
//! expression parsing can never swallow an adjacent clause.

use std::iter::Peekable;
use std::ops::Add;

use super::ast::{
    self, ColumnRef, Expression, JoinClause, JoinKind, Literal, UpdateStatement,
};
use super::lexer::{Keyword, Lexer, Token};
use crate::error::{Error, Result};

/// The parser takes tokens from the lexer and builds the statement AST.
pub struct Parser<'a> {
    lexer: Peekable<Lexer<'a>>,
}

impl Parser<'_> {
    /// Parses the input string into an UPDATE statement AST. The entire
    /// string must be one statement, ending with an optional semicolon.
    pub fn parse(statement: &str) -> Result<UpdateStatement> {
        let mut parser = Parser::new(statement);
        let statement = parser.parse_update()?;
        parser.skip(Token::Semicolon);
        if let Some(token) = parser.lexer.next().transpose()? {
            return Err(Error::Parse(format!("unexpected token {}", token)));
        }
        Ok(statement)
    }

    fn new(input: &str) -> Parser<'_> {
        Parser {
            lexer: Lexer::new(input).peekable(),
        }
    }

    /// Fetches the next token, or errors if none is found.
    fn next(&mut self) -> Result<Token> {
        self.lexer
            .next()
            .transpose()?
            .ok_or_else(|| Error::Parse("unexpected end of input".into()))
    }

    /// Returns the next identifier, or errors if not found.
    fn next_ident(&mut self) -> Result<String> {
        match self.next()? {
            Token::Ident(ident) => Ok(ident),
            token => Err(Error::Parse(format!("expected identifier, found {}", token))),
        }
    }

    /// Returns the next token if it satisfies the predicate.
    fn next_if(&mut self, predicate: impl Fn(&Token) -> bool) -> Option<Token> {
        self.peek().ok()?.filter(|&t| predicate(t))?;
        self.next().ok()
    }

    /// Passes the next token through the closure, consuming it if the
    /// closure returns Some.
    fn next_if_map<T>(&mut self, f: impl Fn(&Token) -> Option<T>) -> Option<T> {
        let value = f(self.peek().ok()??)?;
        self.next().ok()?;
        Some(value)
    }

    /// Consumes the next token if it is the given token, returning true.
    fn next_is(&mut self, token: Token) -> bool {
        self.next_if(|t| t == &token).is_some()
    }

    /// Consumes the next token if it is the given token.
    fn skip(&mut self, token: Token) {
        self.next_is(token);
    }

    /// Consumes the next token if it's the expected one, or errors.
    fn expect(&mut self, expect: Token) -> Result<()> {
        let token = self.next()?;
        if token != expect {
            return Err(Error::Parse(format!("expected {}, found {}", expect, token)));
        }
        Ok(())
    }

    /// Peeks the next token if any, without consuming it.
    fn peek(&mut self) -> Result<Option<&Token>> {
        self.lexer
            .peek()
            .map(|result| result.as_ref().map(Some).map_err(|e| e.clone()))
            .unwrap_or(Ok(None))
    }

    /// Parses the whole statement: update target, SET list, optional join,
    /// WHERE predicate.
    fn parse_update(&mut self) -> Result<UpdateStatement> {
        self.expect(Keyword::Update.into())?;
        let table = self.next_ident()?;
        let alias = match self.next()? {
            Token::Ident(alias) => alias,
            // The validator rejects this first; keep the parser defensive.
            token => return Err(Error::Parse(format!("expected table alias, found {}", token))),
        };
        self.expect(Keyword::Set.into())?;

        let mut set = Vec::new();
        loop {
            let target = self.parse_column_ref()?;
            self.expect(Token::Equal)?;
            let expr = self.parse_expression()?;
            if set.iter().any(|(existing, _)| *existing == target) {
                return Err(Error::Parse(format!("column {} set multiple times", target)));
            }
            set.push((target, expr));
            if !self.next_is(Token::Comma) {
                break;
            }
        }

        let join = self.parse_join_clause()?;

        self.expect(Keyword::Where.into())?;
        let where_clause = self.parse_expression()?;

        Ok(UpdateStatement {
            table,
            alias,
            join,
            set,
            where_clause,
        })
    }

    /// Parses the optional `[left] join <table> <alias> on <predicate>`
    /// clause. Plain `join` is an inner join.
    fn parse_join_clause(&mut self) -> Result<Option<JoinClause>> {
        let kind = if self.next_is(Keyword::Left.into()) {
            self.expect(Keyword::Join.into())?;
            JoinKind::Left
        } else if self.next_is(Keyword::Join.into()) {
            JoinKind::Inner
        } else {
            return Ok(None);
        };
        let table = self.next_ident()?;
        let alias = match self.next()? {
            Token::Ident(alias) => alias,
            token => return Err(Error::Parse(format!("expected join alias, found {}", token))),
        };
        self.expect(Keyword::On.into())?;
        let on = self.parse_expression()?;
        Ok(Some(JoinClause {
            table,
            alias,
            kind,
            on,
        }))
    }

    /// Parses an `alias.column` reference.
    fn parse_column_ref(&mut self) -> Result<ColumnRef> {
        let alias = self.next_ident()?;
        self.expect(Token::Period)?;
        let column = self.next_ident()?;
        Ok(ColumnRef { alias, column })
    }

    /// Parses an expression using precedence climbing.
    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_expression_at(0)
    }

    /// Parses an expression at the given minimum precedence. Prefix
    /// operators bind their operand first, then postfix and infix operators
    /// are folded in as long as their precedence allows.
    fn parse_expression_at(&mut self, min_precedence: Precedence) -> Result<Expression> {
        let mut lhs = if let Some(prefix) = self.parse_prefix_operator_at(min_precedence) {
            let next_precedence = prefix.precedence() + prefix.associativity();
            let rhs = self.parse_expression_at(next_precedence)?;
            prefix.into_expression(rhs)
        } else {
            self.parse_expression_atom()?
        };

        while let Some(postfix) = self.parse_postfix_operator_at(min_precedence)? {
            lhs = postfix.into_expression(lhs);
        }

        while let Some(infix) = self.parse_infix_operator_at(min_precedence) {
            let next_precedence = infix.precedence() + infix.associativity();
            let rhs = self.parse_expression_at(next_precedence)?;
            lhs = infix.into_expression(lhs, rhs);
        }

        // Postfix operators can also follow a binary operation, e.g.
        // a.x + a.y is null.
        while let Some(postfix) = self.parse_postfix_operator_at(min_precedence)? {
            lhs = postfix.into_expression(lhs);
        }

        Ok(lhs)
    }

    /// Parses an expression atom: a literal, a qualified column reference,
    /// a function call, or a parenthesized expression.
    fn parse_expression_atom(&mut self) -> Result<Expression> {
        Ok(match self.next()? {
            Token::Number(n) if !n.contains('.') => Literal::Integer(
                n.parse()
                    .map_err(|e| Error::Parse(format!("invalid integer: {}", e)))?,
            )
            .into(),
            Token::Number(n) => Literal::Float(
                n.parse()
                    .map_err(|e| Error::Parse(format!("invalid float: {}", e)))?,
            )
            .into(),
            Token::String(s) => Literal::String(s).into(),
            Token::Keyword(Keyword::True) => Literal::Boolean(true).into(),
            Token::Keyword(Keyword::False) => Literal::Boolean(false).into(),
            Token::Keyword(Keyword::Null) => Literal::Null.into(),

            // Function call.
            Token::Ident(name) if self.next_is(Token::OpenParen) => {
                let mut args = Vec::new();
                while !self.next_is(Token::CloseParen) {
                    if !args.is_empty() {
                        self.expect(Token::Comma)?;
                    }
                    args.push(self.parse_expression()?);
                }
                Expression::Function(name, args)
            }

            // Qualified column reference. The dialect has no unqualified
            // form; the validator reports bare columns before parsing.
            Token::Ident(alias) if self.next_is(Token::Period) => {
                Expression::Column(ColumnRef::new(alias, self.next_ident()?))
            }
            Token::Ident(name) => {
                return Err(Error::Parse(format!(
                    "unqualified reference {}, expected alias.column",
                    name
                )));
            }

            // Constructs outside the dialect get a precise rejection.
            Token::Keyword(kw @ (Keyword::Case | Keyword::Like | Keyword::Between)) => {
                return Err(Error::Format(format!("{} is not supported", kw)));
            }

            Token::OpenParen => {
                let expr = self.parse_expression()?;
                self.expect(Token::CloseParen)?;
                expr
            }

            token => {
                return Err(Error::Parse(format!(
                    "expected expression atom, found {}",
                    token
                )));
            }
        })
    }

    /// Parses a prefix operator at or above the minimum precedence.
    fn parse_prefix_operator_at(&mut self, min_precedence: Precedence) -> Option<PrefixOperator> {
        self.next_if_map(|token| {
            let operator = match token {
                Token::Keyword(Keyword::Not) => PrefixOperator::Not,
                Token::Minus => PrefixOperator::Minus,
                Token::Plus => PrefixOperator::Plus,
                _ => return None,
            };
            Some(operator).filter(|op| op.precedence() >= min_precedence)
        })
    }

    /// Parses an infix operator at or above the minimum precedence.
    fn parse_infix_operator_at(&mut self, min_precedence: Precedence) -> Option<InfixOperator> {
        self.next_if_map(|token| {
            let operator = match token {
                Token::Asterisk => InfixOperator::Multiply,
                Token::Equal => InfixOperator::Equal,
                Token::GreaterThan => InfixOperator::GreaterThan,
                Token::GreaterThanOrEqual => InfixOperator::GreaterThanOrEqual,
                Token::Keyword(Keyword::And) => InfixOperator::And,
                Token::Keyword(Keyword::Or) => InfixOperator::Or,
                Token::LessOrGreaterThan => InfixOperator::NotEqual,
                Token::LessThan => InfixOperator::LessThan,
                Token::LessThanOrEqual => InfixOperator::LessThanOrEqual,
                Token::Minus => InfixOperator::Subtract,
                Token::NotEqual => InfixOperator::NotEqual,
                Token::Percent => InfixOperator::Remainder,
                Token::Plus => InfixOperator::Add,
                Token::Slash => InfixOperator::Divide,
                _ => return None,
            };
            Some(operator).filter(|op| op.precedence() >= min_precedence)
        })
    }

    /// Parses a postfix operator at or above the minimum precedence. These
    /// are multi-token (`is [not] null`, `[not] in (...)`), so they are
    /// handled ahead of the single-token dispatch.
    fn parse_postfix_operator_at(
        &mut self,
        min_precedence: Precedence,
    ) -> Result<Option<PostfixOperator>> {
        if POSTFIX_PRECEDENCE < min_precedence {
            return Ok(None);
        }
        // a is [not] null
        if self.next_is(Keyword::Is.into()) {
            let negated = self.next_is(Keyword::Not.into());
            self.expect(Keyword::Null.into())?;
            return Ok(Some(PostfixOperator::IsNull(negated)));
        }
        // Constructs outside the dialect get a precise rejection rather
        // than a trailing-token error.
        if let Some(Token::Keyword(kw @ (Keyword::Like | Keyword::Between | Keyword::Case))) =
            self.peek()?
        {
            let kw = *kw;
            return Err(Error::Format(format!("{} is not supported", kw)));
        }
        // a [not] in (list). At postfix position a bare `not` can only
        // open `not in`; `not like`/`not between` fall out of the dialect.
        let negated = if self.next_is(Keyword::Not.into()) {
            match self.peek()? {
                Some(Token::Keyword(Keyword::In)) => true,
                Some(Token::Keyword(kw @ (Keyword::Like | Keyword::Between))) => {
                    return Err(Error::Format(format!("not {} is not supported", kw)));
                }
                _ => return Err(Error::Parse("expected in after not".into())),
            }
        } else {
            false
        };
        if !self.next_is(Keyword::In.into()) {
            debug_assert!(!negated);
            return Ok(None);
        }
        self.expect(Token::OpenParen)?;
        let mut list = Vec::new();
        while !self.next_is(Token::CloseParen) {
            if !list.is_empty() {
                self.expect(Token::Comma)?;
            }
            list.push(self.parse_expression()?);
        }
        Ok(Some(PostfixOperator::InList(list, negated)))
    }
}

/// Operator precedence.
type Precedence = u8;

/// All postfix operators in the dialect share the comparison precedence.
const POSTFIX_PRECEDENCE: Precedence = 4;

/// Operator associativity.
enum Associativity {
    Left,
    Right,
}

impl Add<Associativity> for Precedence {
    type Output = Self;

    fn add(self, rhs: Associativity) -> Self {
        // Left-associative operators have increased precedence, so they
        // bind tighter to their left-hand side.
        self + match rhs {
            Associativity::Left => 1,
            Associativity::Right => 0,
        }
    }
}

/// Prefix operators.
enum PrefixOperator {
    Minus, // -a
    Not,   // not a
    Plus,  // +a
}

impl PrefixOperator {
    fn precedence(&self) -> Precedence {
        match self {
            Self::Not => 3,
            Self::Minus | Self::Plus => 10,
        }
    }

    // Prefix operators are right-associative by definition.
    fn associativity(&self) -> Associativity {
        Associativity::Right
    }

    fn into_expression(self, rhs: Expression) -> Expression {
        let rhs = Box::new(rhs);
        match self {
            Self::Plus => ast::Operator::Identity(rhs).into(),
            Self::Minus => ast::Operator::Negate(rhs).into(),
            Self::Not => ast::Operator::Not(rhs).into(),
        }
    }
}

/// Infix operators.
enum InfixOperator {
    Add,                // a + b
    And,                // a and b
    Divide,             // a / b
    Equal,              // a = b
    GreaterThan,        // a > b
    GreaterThanOrEqual, // a >= b
    LessThan,           // a < b
    LessThanOrEqual,    // a <= b
    Multiply,           // a * b
    NotEqual,           // a <> b
    Or,                 // a or b
    Remainder,          // a % b
    Subtract,           // a - b
}

impl InfixOperator {
    /// Mostly follows Postgres, with membership and null tests at the same
    /// precedence as equality.
    fn precedence(&self) -> Precedence {
        match self {
            Self::Or => 1,
            Self::And => 2,
            // not => 3
            Self::Equal | Self::NotEqual => 4,
            Self::GreaterThan
            | Self::GreaterThanOrEqual
            | Self::LessThan
            | Self::LessThanOrEqual => 5,
            Self::Add | Self::Subtract => 6,
            Self::Multiply | Self::Divide | Self::Remainder => 7,
        }
    }

    fn associativity(&self) -> Associativity {
        Associativity::Left
    }

    fn into_expression(self, lhs: Expression, rhs: Expression) -> Expression {
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        match self {
            Self::Add => ast::Operator::Add(lhs, rhs).into(),
            Self::And => ast::Operator::And(lhs, rhs).into(),
            Self::Divide => ast::Operator::Divide(lhs, rhs).into(),
            Self::Equal => ast::Operator::Equal(lhs, rhs).into(),
            Self::GreaterThan => ast::Operator::GreaterThan(lhs, rhs).into(),
            Self::GreaterThanOrEqual => ast::Operator::GreaterThanOrEqual(lhs, rhs).into(),
            Self::LessThan => ast::Operator::LessThan(lhs, rhs).into(),
            Self::LessThanOrEqual => ast::Operator::LessThanOrEqual(lhs, rhs).into(),
            Self::Multiply => ast::Operator::Multiply(lhs, rhs).into(),
            Self::NotEqual => ast::Operator::NotEqual(lhs, rhs).into(),
            Self::Or => ast::Operator::Or(lhs, rhs).into(),
            Self::Remainder => ast::Operator::Remainder(lhs, rhs).into(),
            Self::Subtract => ast::Operator::Subtract(lhs, rhs).into(),
        }
    }
}

/// Postfix operators.
enum PostfixOperator {
    IsNull(bool),                // a is [not] null
    InList(Vec<Expression>, bool), // a [not] in (list)
}

impl PostfixOperator {
    fn into_expression(self, lhs: Expression) -> Expression {
        let lhs = Box::new(lhs);
        match self {
            Self::IsNull(negated) => ast::Operator::IsNull(lhs, negated).into(),
            Self::InList(list, negated) => ast::Operator::InList {
                expr: lhs,
                list,
                negated,
            }
            .into(),
        }
    }
}
