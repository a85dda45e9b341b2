//! FROM / JOIN sources: plain tables, derived tables and CTEs

use serde::{Deserialize, Serialize};

use super::statement::SqlSelect;

/// A named table, optionally aliased.
///
/// A raw table's name is emitted verbatim instead of being quoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub raw: bool,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            raw: false,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(name).with_alias(alias)
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_raw(mut self) -> Self {
        self.raw = true;
        self
    }
}

impl From<&str> for Table {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Table {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A subquery used as a FROM or JOIN source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedTable {
    pub select: Box<SqlSelect>,
    pub alias: String,
}

impl DerivedTable {
    pub fn new(select: SqlSelect, alias: impl Into<String>) -> Self {
        Self {
            select: Box::new(select),
            alias: alias.into(),
        }
    }
}

/// Body of a common table expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CteQuery {
    Select(Box<SqlSelect>),
    RawSql(String),
}

/// A named derived table declared in a `with` clause and referenced by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonTableExpression {
    pub alias: String,
    pub query: CteQuery,
}

impl CommonTableExpression {
    pub fn new(select: SqlSelect, alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            query: CteQuery::Select(Box::new(select)),
        }
    }

    /// A CTE whose body is a verbatim SQL query
    pub fn raw(sql: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            query: CteQuery::RawSql(sql.into()),
        }
    }

    /// The inner select, if this CTE is not raw
    pub fn select(&self) -> Option<&SqlSelect> {
        match &self.query {
            CteQuery::Select(select) => Some(select),
            CteQuery::RawSql(_) => None,
        }
    }
}

/// Where a select reads its rows from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FromSource {
    Table(Table),
    Derived(DerivedTable),
    Cte(CommonTableExpression),
}

impl From<Table> for FromSource {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<DerivedTable> for FromSource {
    fn from(derived: DerivedTable) -> Self {
        Self::Derived(derived)
    }
}

impl From<CommonTableExpression> for FromSource {
    fn from(cte: CommonTableExpression) -> Self {
        Self::Cte(cte)
    }
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}
