//! Common Table Expression (CTE) support

use super::expr::Ident;
use super::stmt::SelectStmt;

/// A Common Table Expression (CTE) in a WITH clause
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    pub name: Ident,
    pub query: CteQuery,
}

impl Cte {
    pub fn select(name: impl Into<Ident>, query: SelectStmt) -> Self {
        Self {
            name: name.into(),
            query: CteQuery::Select(query),
        }
    }

    /// A CTE whose body is verbatim SQL
    pub fn raw(name: impl Into<Ident>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: CteQuery::Raw(sql.into()),
        }
    }
}

/// The query that defines a CTE
#[derive(Debug, Clone, PartialEq)]
pub enum CteQuery {
    Select(SelectStmt),
    Raw(String),
}

impl From<SelectStmt> for CteQuery {
    fn from(stmt: SelectStmt) -> Self {
        Self::Select(stmt)
    }
}
