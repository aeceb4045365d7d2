//! Abstract syntax tree for the restricted UPDATE dialect.
//!
//! The statement is the root node, describing the syntactic structure only:
//! the parser guarantees the clauses are well-formed but does not know
//! whether tables, aliases or columns exist. That is the resolver's and
//! planner's job.

pub use crate::types::JoinKind;

/// A parsed UPDATE statement:
/// `update <table> <alias> set <assignments> [join] where <predicate>`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// The update target table name.
    pub table: String,
    /// The alias bound to the update table. Always present; statements
    /// without one are rejected by the validator.
    pub alias: String,
    /// The optional second table joined into the update.
    pub join: Option<JoinClause>,
    /// SET assignments in source order. Targets are alias-qualified column
    /// references.
    pub set: Vec<(ColumnRef, Expression)>,
    /// The WHERE predicate. Always present; unconditional updates are
    /// rejected by the validator.
    pub where_clause: Expression,
}

/// The `[left] join <table> <alias> on <predicate>` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub table: String,
    pub alias: String,
    pub kind: JoinKind,
    pub on: Expression,
}

/// An alias-qualified column reference, `alias.column`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnRef {
    pub alias: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(alias: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            column: column.into(),
        }
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.alias, self.column)
    }
}

/// Source-level expressions, e.g. `a.age + 7 > 3`. Can be nested.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// An alias-qualified column reference. The dialect requires the
    /// qualifier on every reference, so there is no unqualified variant.
    Column(ColumnRef),
    /// A literal value.
    Literal(Literal),
    /// A scalar function call (name and arguments).
    Function(String, Vec<Expression>),
    /// An operator application.
    Operator(Operator),
}

/// Expression literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Expression operators. Each child expression is boxed since this is a
/// recursive data structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    And(Box<Expression>, Box<Expression>), // a and b
    Or(Box<Expression>, Box<Expression>),  // a or b
    Not(Box<Expression>),                  // not a

    Equal(Box<Expression>, Box<Expression>),              // a = b
    NotEqual(Box<Expression>, Box<Expression>),           // a <> b
    GreaterThan(Box<Expression>, Box<Expression>),        // a > b
    GreaterThanOrEqual(Box<Expression>, Box<Expression>), // a >= b
    LessThan(Box<Expression>, Box<Expression>),           // a < b
    LessThanOrEqual(Box<Expression>, Box<Expression>),    // a <= b
    /// a is null, or a is not null when negated.
    IsNull(Box<Expression>, bool),

    Add(Box<Expression>, Box<Expression>),       // a + b
    Subtract(Box<Expression>, Box<Expression>),  // a - b
    Multiply(Box<Expression>, Box<Expression>),  // a * b
    Divide(Box<Expression>, Box<Expression>),    // a / b
    Remainder(Box<Expression>, Box<Expression>), // a % b
    Negate(Box<Expression>),                     // -a
    Identity(Box<Expression>),                   // +a

    /// a in (list), or a not in (list) when negated.
    InList {
        expr: Box<Expression>,
        list: Vec<Expression>,
        negated: bool,
    },
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Expression::Literal(literal)
    }
}

impl From<Operator> for Expression {
    fn from(operator: Operator) -> Self {
        Expression::Operator(operator)
    }
}

impl Expression {
    /// Walks the expression tree, calling the visitor on every node.
    pub fn walk(&self, visitor: &mut impl FnMut(&Expression)) {
        visitor(self);
        match self {
            Expression::Column(_) | Expression::Literal(_) => {}
            Expression::Function(_, args) => {
                for arg in args {
                    arg.walk(visitor);
                }
            }
            Expression::Operator(op) => {
                use Operator::*;
                match op {
                    And(l, r)
                    | Or(l, r)
                    | Equal(l, r)
                    | NotEqual(l, r)
                    | GreaterThan(l, r)
                    | GreaterThanOrEqual(l, r)
                    | LessThan(l, r)
                    | LessThanOrEqual(l, r)
                    | Add(l, r)
                    | Subtract(l, r)
                    | Multiply(l, r)
                    | Divide(l, r)
                    | Remainder(l, r) => {
                        l.walk(visitor);
                        r.walk(visitor);
                    }
                    Not(e) | IsNull(e, _) | Negate(e) | Identity(e) => e.walk(visitor),
                    InList { expr, list, .. } => {
                        expr.walk(visitor);
                        for item in list {
                            item.walk(visitor);
                        }
                    }
                }
            }
        }
    }
}
