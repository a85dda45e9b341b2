//! Tests for the AST module across dialects
//!
//! These tests verify that the AST correctly represents SQL constructs
//! and renders them properly for every supported engine.

use super::*;

mod expr_tests {
    use super::*;

    const PG: Dialect = Dialect::Postgres;

    #[test]
    fn test_column_expressions() {
        // Simple column
        let col = Expr::column("id");
        assert_eq!(render_expr(&col, PG), "\"id\"");

        // Qualified column
        let col = Expr::qualified_column("users", "email");
        assert_eq!(render_expr(&col, PG), "\"users\".\"email\"");
        assert_eq!(render_expr(&col, Dialect::SqlServer), "[users].[email]");

        // Star stays bare
        assert_eq!(render_expr(&Expr::column_path("v.*"), PG), "\"v\".*");
    }

    #[test]
    fn test_literal_expressions() {
        assert_eq!(render_expr(&Expr::null(), PG), "null");
        assert_eq!(render_expr(&Expr::bool(true), PG), "true");
        assert_eq!(render_expr(&Expr::bool(false), PG), "false");
        assert_eq!(render_expr(&Expr::bool(true), Dialect::Sqlite), "1");
        assert_eq!(render_expr(&Expr::bool(false), Dialect::SqlServer), "0");
        assert_eq!(render_expr(&Expr::int(42), PG), "42");
        assert_eq!(render_expr(&Expr::int(-100), PG), "-100");
        assert_eq!(render_expr(&Expr::string("hello"), PG), "'hello'");
    }

    #[test]
    fn test_binary_operations() {
        // Equality
        let expr = Expr::column("id").eq(Expr::int(1));
        assert_eq!(render_expr(&expr, PG), "\"id\" = 1");

        // Comparison
        let expr = Expr::binary(Expr::column("age"), BinaryOperator::GtEq, Expr::int(18));
        assert!(render_expr(&expr, PG).contains(">= 18"));

        let expr = Expr::binary(Expr::column("age"), BinaryOperator::NotEq, Expr::int(18));
        assert!(render_expr(&expr, PG).contains("<> 18"));

        // Logical AND
        let expr = Expr::column("a")
            .eq(Expr::int(1))
            .and(Expr::column("b").eq(Expr::int(2)));
        assert_eq!(render_expr(&expr, PG), "\"a\" = 1 and \"b\" = 2");

        // Logical OR inside a group
        let expr = Expr::column("a")
            .eq(Expr::int(1))
            .or(Expr::column("b").eq(Expr::int(2)))
            .nested();
        assert_eq!(render_expr(&expr, PG), "(\"a\" = 1 or \"b\" = 2)");
    }

    #[test]
    fn test_negation() {
        let expr = Expr::not(Expr::binary(
            Expr::column("id"),
            BinaryOperator::Gt,
            Expr::bound("uuid-32"),
        ));
        assert_eq!(render_expr(&expr, PG), "not(\"id\" > 'uuid-32')");
    }

    #[test]
    fn test_is_null() {
        let expr = Expr::is_null(Expr::column("deleted_at"));
        assert!(render_expr(&expr, PG).ends_with("is null"));

        let expr = Expr::is_not_null(Expr::column("deleted_at"));
        assert!(render_expr(&expr, PG).ends_with("is not null"));
    }

    #[test]
    fn test_in_list() {
        let expr = Expr::in_list(
            Expr::column("status"),
            vec![Expr::bound("active"), Expr::bound("pending")],
        );
        assert_eq!(
            render_expr(&expr, PG),
            "\"status\" in ('active', 'pending')"
        );

        let expr = Expr::InList {
            expr: Box::new(Expr::column("status")),
            list: vec![Expr::string("deleted")],
            negated: true,
        };
        assert!(render_expr(&expr, PG).contains("not in ("));
    }

    #[test]
    fn test_exists() {
        let inner = SelectStmt::new()
            .with_from(FromClause::table("canvas"))
            .with_where(Expr::column("id").eq(Expr::bound("uuid-32")));
        let expr = Expr::exists(inner);
        assert_eq!(
            render_expr(&expr, PG),
            "exists (select * from \"canvas\" where \"id\" = 'uuid-32')"
        );
    }

    #[test]
    fn test_in_subquery() {
        let inner = SelectStmt::columns(vec![SelectColumn::expr(Expr::column("id"))])
            .with_from(FromClause::table("canvas"));
        let expr = Expr::in_subquery(Expr::column("id"), inner);
        assert_eq!(
            render_expr(&expr, PG),
            "\"id\" in (select \"id\" from \"canvas\")"
        );
    }

    #[test]
    fn test_raw_without_bindings_is_verbatim() {
        let expr = Expr::raw("count(color) = 1");
        assert_eq!(render_expr(&expr, PG), "count(color) = 1");
    }
}

mod stmt_tests {
    use super::*;

    const PG: Dialect = Dialect::Postgres;

    #[test]
    fn test_simple_select() {
        let stmt =
            SelectStmt::columns(vec![SelectColumn::star()]).with_from(FromClause::table("users"));
        let sql = render_inline(&Stmt::Select(stmt), PG);
        assert!(sql.starts_with("select *"));
        assert!(sql.contains("from \"users\""));
    }

    #[test]
    fn test_select_with_join() {
        let stmt = SelectStmt::columns(vec![
            SelectColumn::expr(Expr::qualified_column("v", "id")),
            SelectColumn::expr_as(Expr::qualified_column("m", "extra_data"), "ExtraData"),
        ])
        .with_from(FromClause::table("canvas").with_alias("v").left_join(
            FromClause::table("canvas-metdata").with_alias("m"),
            Expr::qualified_column("v", "id").eq(Expr::qualified_column("m", "id")),
        ));
        let sql = render_inline(&Stmt::Select(stmt), Dialect::Sqlite);
        assert_eq!(
            sql,
            "select \"v\".\"id\", \"m\".\"extra_data\" as \"ExtraData\" \
             from \"canvas\" as \"v\" left join \"canvas-metdata\" as \"m\" \
             on \"v\".\"id\" = \"m\".\"id\""
        );
    }

    #[test]
    fn test_select_from_subquery() {
        let inner = SelectStmt::new().with_from(FromClause::table("canvas"));
        let outer = SelectStmt::new().with_from(FromClause::subquery(inner, "v"));
        let sql = render_inline(&Stmt::Select(outer), PG);
        assert_eq!(sql, "select * from (select * from \"canvas\") as \"v\"");
    }

    #[test]
    fn test_select_with_group_by_having() {
        let stmt = SelectStmt::columns(vec![SelectColumn::expr_as(
            Expr::raw("substr(id, 0, 7)"),
            "uuidgroup",
        )])
        .with_from(FromClause::table("canvas"))
        .with_group_by(vec![Expr::column("uuidgroup")]);
        let stmt = SelectStmt {
            having: Some(Expr::raw("count(color) = 1")),
            ..stmt
        };
        let sql = render_inline(&Stmt::Select(stmt), PG);
        assert_eq!(
            sql,
            "select substr(id, 0, 7) as \"uuidgroup\" from \"canvas\" \
             group by \"uuidgroup\" having count(color) = 1"
        );
    }

    #[test]
    fn test_select_with_order_limit_offset() {
        let stmt = SelectStmt::columns(vec![SelectColumn::star()])
            .with_from(FromClause::table("users"))
            .with_order_by(vec![
                OrderByExpr::asc(Expr::column("id")),
                OrderByExpr::desc(Expr::column("created_at")),
            ])
            .with_limit(10)
            .with_offset(20);
        let sql = render_inline(&Stmt::Select(stmt), PG);
        assert!(sql.contains("order by \"id\" asc, \"created_at\" desc"));
        assert!(sql.ends_with("limit 10 offset 20"));
    }

    #[test]
    fn test_sqlserver_pagination_keeps_existing_order() {
        let stmt = SelectStmt::new()
            .with_from(FromClause::table("users"))
            .with_order_by(vec![OrderByExpr::asc(Expr::column("id"))])
            .with_limit(10)
            .with_offset(20);
        let sql = render_inline(&Stmt::Select(stmt), Dialect::SqlServer);
        assert_eq!(
            sql,
            "select * from [users] order by [id] asc offset 20 rows fetch next 10 rows only"
        );
    }

    #[test]
    fn test_insert_multiple_rows() {
        let stmt = InsertStmt::new(
            TableRef::new("users"),
            vec![Ident::new("name")],
            InsertValues::Values(vec![vec![Expr::bound("Alice")], vec![Expr::bound("Bob")]]),
        );
        let compiled = render(&Stmt::Insert(stmt), PG);
        assert_eq!(
            compiled.sql,
            "insert into \"users\" (\"name\") values ($1), ($2)"
        );
        assert_eq!(compiled.params.len(), 2);
    }

    #[test]
    fn test_insert_from_query() {
        let query = SelectStmt::columns(vec![
            SelectColumn::expr_as(Expr::raw("'cloned-uuid'"), "id"),
            SelectColumn::expr(Expr::column("color")),
        ])
        .with_from(FromClause::table("canvas"))
        .with_where(Expr::column("id").eq(Expr::bound("123")));
        let stmt = InsertStmt::new(
            TableRef::new("canvas"),
            vec![Ident::new("id"), Ident::new("color")],
            InsertValues::Query(Box::new(query)),
        );
        let compiled = render(&Stmt::Insert(stmt), Dialect::Sqlite);
        assert_eq!(
            compiled.sql,
            "insert into \"canvas\" (\"id\", \"color\") select 'cloned-uuid' as \"id\", \"color\" \
             from \"canvas\" where \"id\" = ?1"
        );
    }

    #[test]
    fn test_update_basic() {
        let stmt = UpdateStmt::new(
            TableRef::new("users"),
            vec![
                (Ident::new("name"), Expr::bound("Bob")),
                (Ident::new("updated_at"), Expr::raw("now()")),
            ],
        )
        .with_where(Expr::column("id").eq(Expr::bound(1i64)));
        let sql = render_inline(&Stmt::Update(stmt), PG);
        assert_eq!(
            sql,
            "update \"users\" set \"name\" = 'Bob', \"updated_at\" = now() where \"id\" = 1"
        );
    }

    #[test]
    fn test_delete_basic() {
        let stmt = DeleteStmt::new(TableRef::new("users"))
            .with_where(Expr::column("active").eq(Expr::bound(false)));
        let compiled = render(&Stmt::Delete(stmt), Dialect::SqlServer);
        assert_eq!(compiled.sql, "delete from [users] where [active] = @p0");
        assert_eq!(compiled.params, vec![ParamValue::Bool(false)]);
    }

    #[test]
    fn test_schema_qualified_table() {
        let stmt = DeleteStmt::new(TableRef::new("dbo.users"));
        let sql = render_inline(&Stmt::Delete(stmt), Dialect::SqlServer);
        assert_eq!(sql, "delete from [dbo].[users]");
    }
}

mod cte_tests {
    use super::*;

    #[test]
    fn test_multiple_ctes() {
        let cte1 = Cte::select(
            "a",
            SelectStmt::columns(vec![SelectColumn::expr(Expr::int(1))]),
        );
        let cte2 = Cte::raw("b", "select 2 as two");

        let outer = SelectStmt::new()
            .with_from(FromClause::table("a").inner_join(FromClause::table("b"), Expr::raw("1 = 1")))
            .with_ctes(vec![cte1, cte2]);

        let sql = render_inline(&Stmt::Select(outer), Dialect::Sqlite);
        assert_eq!(
            sql,
            "with \"a\" as (select 1), \"b\" as (select 2 as two) \
             select * from \"a\" inner join \"b\" on 1 = 1"
        );
    }

    #[test]
    fn test_cte_params_numbered_before_body() {
        let inner = SelectStmt::new()
            .with_from(FromClause::table("canvas"))
            .with_where(Expr::column("color").eq(Expr::bound("green")));
        let outer = SelectStmt::new()
            .with_from(FromClause::table("c1"))
            .with_where(Expr::column("id").eq(Expr::bound("123")))
            .with_ctes(vec![Cte::select("c1", inner)]);

        let compiled = render(&Stmt::Select(outer), Dialect::Postgres);
        assert_eq!(
            compiled.sql,
            "with \"c1\" as (select * from \"canvas\" where \"color\" = $1) \
             select * from \"c1\" where \"id\" = $2"
        );
        assert_eq!(
            compiled.params,
            vec![ParamValue::from("green"), ParamValue::from("123")]
        );
    }
}

mod params_tests {
    use super::*;

    #[test]
    fn test_param_collection() {
        let mut collector = ParamCollector::new();

        collector.add(ParamValue::String("test".into()));
        collector.add(ParamValue::Integer(42));
        collector.add(ParamValue::Null);

        assert_eq!(collector.len(), 3);
        assert!(!collector.is_empty());

        let params = collector.into_params();
        assert_eq!(params[0].index, 1);
        assert_eq!(params[1].index, 2);
        assert_eq!(params[2].index, 3);
    }

    #[test]
    fn test_raw_bindings_share_numbering() {
        let stmt = SelectStmt::new()
            .with_from(FromClause::table("canvas"))
            .with_where(
                Expr::column("color").eq(Expr::bound("green")).and(Expr::Raw {
                    sql: "id in (?, ?)".to_string(),
                    bindings: vec![ParamValue::from("1"), ParamValue::from("2")],
                }),
            );

        let compiled = render(&Stmt::Select(stmt), Dialect::Postgres);
        assert!(compiled.sql.ends_with("\"color\" = $1 and id in ($2, $3)"));
        assert_eq!(compiled.params.len(), 3);
    }

    #[test]
    fn test_inline_rendering_has_no_params() {
        let stmt = SelectStmt::new()
            .with_from(FromClause::table("canvas"))
            .with_where(Expr::column("color").eq(Expr::bound("it's")));
        let mut renderer = SqlRenderer::new(Dialect::Sqlite);
        renderer.render_stmt(&Stmt::Select(stmt));
        let compiled = renderer.finish();
        assert!(!compiled.parameterized);
        assert!(compiled.params.is_empty());
        assert!(compiled.sql.ends_with("\"color\" = 'it''s'"));
    }
}
