//! SQL expression types
//!
//! Expressions are the building blocks of predicates and projections: column
//! references, literals, bound values, operators, subqueries and raw SQL
//! fragments.

use super::params::ParamValue;
use super::stmt::SelectStmt;

/// A SQL identifier, quoted on render
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(pub String);

impl Ident {
    #[inline]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `*` is never quoted
    pub fn is_star(&self) -> bool {
        self.0 == "*"
    }
}

impl From<String> for Ident {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a column, optionally qualified (`v.id`, `schema.table.col`)
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub qualifier: Vec<Ident>,
    pub column: Ident,
}

impl ColumnRef {
    pub fn new(column: impl Into<Ident>) -> Self {
        Self {
            qualifier: Vec::new(),
            column: column.into(),
        }
    }

    pub fn qualified(table: impl Into<Ident>, column: impl Into<Ident>) -> Self {
        Self {
            qualifier: vec![table.into()],
            column: column.into(),
        }
    }

    /// Split a dotted name into qualifier parts and the column
    pub fn parse(name: &str) -> Self {
        let mut parts: Vec<Ident> = name.split('.').map(Ident::from).collect();
        // split always yields at least one part
        let column = parts.pop().unwrap_or_else(|| Ident::new(name));
        Self {
            qualifier: parts,
            column,
        }
    }
}

/// SQL literal values, always rendered inline
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Integer(i64),
    String(String),
}

impl Literal {
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOperator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
}

impl UnaryOperator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Not => "not",
        }
    }
}

/// ORDER BY expression component
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub direction: Option<OrderDirection>,
}

impl OrderByExpr {
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            direction: None,
        }
    }

    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            direction: Some(OrderDirection::Asc),
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            direction: Some(OrderDirection::Desc),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// The main expression enum
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference: table.column or just column
    Column(ColumnRef),

    /// Inline literal
    Literal(Literal),

    /// A caller-supplied value: a placeholder when parameterized, an
    /// escaped literal otherwise
    Bound(ParamValue),

    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    UnaryOp { op: UnaryOperator, expr: Box<Expr> },

    /// Subquery: (SELECT ...)
    Subquery(Box<SelectStmt>),

    IsNull { expr: Box<Expr>, negated: bool },

    /// expr IN (values); an empty list is always false
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },

    /// expr IN (SELECT ...)
    InSubquery {
        expr: Box<Expr>,
        subquery: Box<SelectStmt>,
        negated: bool,
    },

    /// expr LIKE pattern ESCAPE '\'
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        negated: bool,
    },

    Exists {
        subquery: Box<SelectStmt>,
        negated: bool,
    },

    /// Parenthesized expression (for explicit grouping)
    Nested(Box<Expr>),

    /// Verbatim SQL. Each `?` outside a quoted string takes the next binding.
    Raw {
        sql: String,
        bindings: Vec<ParamValue>,
    },
}

impl Expr {
    pub fn column(name: impl Into<Ident>) -> Self {
        Self::Column(ColumnRef::new(name))
    }

    pub fn qualified_column(table: impl Into<Ident>, column: impl Into<Ident>) -> Self {
        Self::Column(ColumnRef::qualified(table, column))
    }

    /// Column reference from a dotted name such as `v.id`
    pub fn column_path(name: &str) -> Self {
        Self::Column(ColumnRef::parse(name))
    }

    pub fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    pub fn bool(b: bool) -> Self {
        Self::Literal(Literal::Bool(b))
    }

    pub fn int(n: i64) -> Self {
        Self::Literal(Literal::Integer(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::Literal(Literal::String(s.into()))
    }

    pub fn bound(value: impl Into<ParamValue>) -> Self {
        Self::Bound(value.into())
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw {
            sql: sql.into(),
            bindings: Vec::new(),
        }
    }

    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Self::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn not(expr: Expr) -> Self {
        Self::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(expr),
        }
    }

    pub fn is_null(expr: Expr) -> Self {
        Self::IsNull {
            expr: Box::new(expr),
            negated: false,
        }
    }

    pub fn is_not_null(expr: Expr) -> Self {
        Self::IsNull {
            expr: Box::new(expr),
            negated: true,
        }
    }

    pub fn in_list(expr: Expr, list: Vec<Expr>) -> Self {
        Self::InList {
            expr: Box::new(expr),
            list,
            negated: false,
        }
    }

    pub fn in_subquery(expr: Expr, subquery: SelectStmt) -> Self {
        Self::InSubquery {
            expr: Box::new(expr),
            subquery: Box::new(subquery),
            negated: false,
        }
    }

    pub fn like(expr: Expr, pattern: Expr) -> Self {
        Self::Like {
            expr: Box::new(expr),
            pattern: Box::new(pattern),
            negated: false,
        }
    }

    pub fn exists(subquery: SelectStmt) -> Self {
        Self::Exists {
            subquery: Box::new(subquery),
            negated: false,
        }
    }

    /// Wrap in parentheses
    pub fn nested(self) -> Self {
        Self::Nested(Box::new(self))
    }

    pub fn and(self, other: Expr) -> Self {
        Self::binary(self, BinaryOperator::And, other)
    }

    pub fn or(self, other: Expr) -> Self {
        Self::binary(self, BinaryOperator::Or, other)
    }

    pub fn eq(self, other: Expr) -> Self {
        Self::binary(self, BinaryOperator::Eq, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_ref() {
        let col = ColumnRef::new("id");
        assert_eq!(col.column.as_str(), "id");
        assert!(col.qualifier.is_empty());

        let col = ColumnRef::qualified("users", "id");
        assert_eq!(col.qualifier[0].as_str(), "users");
        assert_eq!(col.column.as_str(), "id");
    }

    #[test]
    fn test_column_ref_parse() {
        let col = ColumnRef::parse("public.canvas.id");
        assert_eq!(col.qualifier, vec![Ident::new("public"), Ident::new("canvas")]);
        assert_eq!(col.column.as_str(), "id");

        let col = ColumnRef::parse("v.*");
        assert!(col.column.is_star());
    }

    #[test]
    fn test_binary_op() {
        let expr = Expr::qualified_column("t", "id").eq(Expr::int(1));
        match expr {
            Expr::BinaryOp { op, .. } => assert_eq!(op, BinaryOperator::Eq),
            _ => panic!("Expected BinaryOp"),
        }
    }
}
