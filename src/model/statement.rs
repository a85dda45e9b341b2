//! The four statement shapes and the tagged [`Statement`] wrapping them

use serde::{Deserialize, Serialize};

use super::expression::Expression;
use super::field::{Field, FieldValue, GroupBy, Sort};
use super::filter::Filter;
use super::join::Join;
use super::table::{CommonTableExpression, DerivedTable, FromSource, Table};
use crate::error::{FacadeError, FacadeResult};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlSelect {
    /// CTEs declared ahead of this select
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ctes: Vec<CommonTableExpression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<FromSource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<Join>,
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub where_filter: Option<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_bys: Vec<GroupBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub having: Option<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Sort>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub combines: Vec<SqlCombine>,
}

impl SqlSelect {
    /// Select from a table
    pub fn new(table: impl Into<Table>) -> Self {
        Self {
            from: Some(FromSource::Table(table.into())),
            ..Default::default()
        }
    }

    /// Select from a subquery
    pub fn from_derived(derived: DerivedTable) -> Self {
        Self {
            from: Some(FromSource::Derived(derived)),
            ..Default::default()
        }
    }

    /// Select from a CTE.
    ///
    /// CTEs already declared by the CTE's own select are copied onto the new
    /// select in declaration order. The CTE itself is not added to the list;
    /// it is declared when the select is compiled.
    pub fn from_cte(cte: CommonTableExpression) -> Self {
        let ctes = cte.select().map(|s| s.ctes.clone()).unwrap_or_default();
        Self {
            ctes,
            from: Some(FromSource::Cte(cte)),
            ..Default::default()
        }
    }

    pub fn with_cte(mut self, cte: CommonTableExpression) -> Self {
        self.ctes.push(cte);
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn with_where(mut self, filter: Filter) -> Self {
        self.where_filter = Some(filter);
        self
    }

    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_bys.push(group_by);
        self
    }

    pub fn with_having(mut self, filter: Filter) -> Self {
        self.having = Some(filter);
        self
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    pub fn with_combine(mut self, combine: SqlCombine) -> Self {
        self.combines.push(combine);
        self
    }

    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }

    pub fn clear_sorts(&mut self) {
        self.sorts.clear();
    }

    pub fn clear_joins(&mut self) {
        self.joins.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOperation {
    Union,
    UnionAll,
    Intersect,
    Except,
}

/// A secondary select appended through a set operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlCombine {
    pub select: Box<SqlSelect>,
    pub operation: SetOperation,
}

impl SqlCombine {
    pub fn new(select: SqlSelect, operation: SetOperation) -> Self {
        Self {
            select: Box::new(select),
            operation,
        }
    }
}

/// Insert either literal column values or the rows of a query.
///
/// The two shapes are exclusive: when `query` is set, the query's projected
/// fields (alias if present, else name) become the target columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlInsert {
    pub table: Table,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Box<SqlSelect>>,
}

impl SqlInsert {
    pub fn new(table: impl Into<Table>) -> Self {
        Self {
            table: table.into(),
            fields: Vec::new(),
            query: None,
        }
    }

    pub fn with_field(mut self, field: FieldValue) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_query(mut self, query: SqlSelect) -> Self {
        self.query = Some(Box::new(query));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlUpdate {
    pub table: Table,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Expression>,
}

impl SqlUpdate {
    pub fn new(table: impl Into<Table>) -> Self {
        Self {
            table: table.into(),
            fields: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldValue) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_filter(mut self, expression: Expression) -> Self {
        self.filters.push(expression);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlDelete {
    pub table: Table,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Expression>,
}

impl SqlDelete {
    pub fn new(table: impl Into<Table>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, expression: Expression) -> Self {
        self.filters.push(expression);
        self
    }
}

/// The closed set of statement tags used in serialized documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    pub fn parse(tag: &str) -> FacadeResult<Self> {
        match tag {
            "select" => Ok(Self::Select),
            "insert" => Ok(Self::Insert),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(FacadeError::validation(format!(
                "unknown statement type '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for StatementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SqlSelect),
    Insert(SqlInsert),
    Update(SqlUpdate),
    Delete(SqlDelete),
}

impl Statement {
    pub fn statement_type(&self) -> StatementType {
        match self {
            Self::Select(_) => StatementType::Select,
            Self::Insert(_) => StatementType::Insert,
            Self::Update(_) => StatementType::Update,
            Self::Delete(_) => StatementType::Delete,
        }
    }

    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Select(_))
    }

    pub fn as_select(&self) -> Option<&SqlSelect> {
        match self {
            Self::Select(select) => Some(select),
            _ => None,
        }
    }
}

impl From<SqlSelect> for Statement {
    fn from(stmt: SqlSelect) -> Self {
        Self::Select(stmt)
    }
}

impl From<SqlInsert> for Statement {
    fn from(stmt: SqlInsert) -> Self {
        Self::Insert(stmt)
    }
}

impl From<SqlUpdate> for Statement {
    fn from(stmt: SqlUpdate) -> Self {
        Self::Update(stmt)
    }
}

impl From<SqlDelete> for Statement {
    fn from(stmt: SqlDelete) -> Self {
        Self::Delete(stmt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas_select() -> SqlSelect {
        SqlSelect::new("canvas")
            .with_field(Field::new("id"))
            .with_field(Field::new("color"))
    }

    #[test]
    fn test_select_builder() {
        let select = canvas_select()
            .with_where(Filter::new().with_expression(Expression::new("id", "123")))
            .with_sort(Sort::new("id"));

        assert!(matches!(select.from, Some(FromSource::Table(ref t)) if t.name == "canvas"));
        assert_eq!(select.fields.len(), 2);
        assert!(select.sorts[0].ascending);
    }

    #[test]
    fn test_from_cte_bubbles_inner_ctes() {
        let inner = canvas_select()
            .with_cte(CommonTableExpression::raw("select 1 as a", "a"))
            .with_cte(CommonTableExpression::raw("select 2 as b", "b"))
            .with_cte(CommonTableExpression::new(canvas_select(), "c"));
        let select = SqlSelect::from_cte(CommonTableExpression::new(inner, "outer"));

        let names: Vec<&str> = select.ctes.iter().map(|c| c.alias.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_from_raw_cte_has_no_ctes() {
        let select = SqlSelect::from_cte(CommonTableExpression::raw("select 'a' as col1", "c2"));
        assert!(select.ctes.is_empty());
    }

    #[test]
    fn test_statement_type_parse() {
        assert_eq!(StatementType::parse("update").unwrap(), StatementType::Update);
        assert!(StatementType::parse("Wrong Type").unwrap_err().is_validation());
        assert!(StatementType::parse("").is_err());
    }

    #[test]
    fn test_statement_from_impls() {
        let stmt: Statement = SqlDelete::new("canvas").into();
        assert_eq!(stmt.statement_type(), StatementType::Delete);
        assert!(stmt.is_write());
        let stmt: Statement = canvas_select().into();
        assert!(!stmt.is_write());
        assert!(stmt.as_select().is_some());
    }
}
