//! SELECT builder using the typestate pattern.
//!
//! `build()` is only available once the select list and the FROM clause are
//! both given, and row filters can only be attached after FROM.

use std::marker::PhantomData;

use crate::ast::{
    CompositeQuery, Distinct, Expr, GroupItem, Ident, InvariantError, Join, JoinKind, ObjectName,
    OrderItem, Pagination, Predicate, Query, Select, SelectItem, SetOpKind, SetOperator, TableRef,
};

// Typestate markers (zero-sized types)

/// Marker: No columns specified yet.
pub struct NoColumns;
/// Marker: Columns have been specified.
pub struct HasColumns;
/// Marker: No FROM clause specified yet.
pub struct NoFrom;
/// Marker: FROM clause has been specified.
pub struct HasFrom;

/// Builds a [`Query`] one clause at a time.
pub struct SelectBuilder<Cols, From> {
    select: Select,
    _state: PhantomData<(Cols, From)>,
}

impl SelectBuilder<NoColumns, NoFrom> {
    /// Creates a new SELECT builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            select: Select::default(),
            _state: PhantomData,
        }
    }
}

impl Default for SelectBuilder<NoColumns, NoFrom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Cols, From> SelectBuilder<Cols, From> {
    fn transition<C, F>(self) -> SelectBuilder<C, F> {
        SelectBuilder {
            select: self.select,
            _state: PhantomData,
        }
    }
}

// Transition: NoColumns -> HasColumns
impl<From> SelectBuilder<NoColumns, From> {
    /// Selects columns by dotted path; `*` and `t.*` select wildcards.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> SelectBuilder<HasColumns, From> {
        self.select.items = cols.iter().copied().map(select_item).collect();
        self.transition()
    }

    /// Selects all columns (*).
    #[must_use]
    pub fn all(mut self) -> SelectBuilder<HasColumns, From> {
        self.select.items = vec![SelectItem::Wildcard];
        self.transition()
    }

    /// Selects a single expression with an optional alias.
    #[must_use]
    pub fn expr(mut self, expr: Expr, alias: Option<&str>) -> SelectBuilder<HasColumns, From> {
        self.select.items = vec![SelectItem::Expr {
            expr,
            alias: alias.map(Ident::new),
        }];
        self.transition()
    }
}

fn select_item(path: &str) -> SelectItem {
    if path == "*" {
        return SelectItem::Wildcard;
    }
    if let Some(table) = path.strip_suffix(".*") {
        return SelectItem::QualifiedWildcard(ObjectName::from_dotted(table));
    }
    SelectItem::Expr {
        expr: Expr::column(path),
        alias: None,
    }
}

// Methods available with columns
impl<From> SelectBuilder<HasColumns, From> {
    /// Adds another expression to the select list.
    #[must_use]
    pub fn and_expr(mut self, expr: Expr, alias: Option<&str>) -> Self {
        self.select.items.push(SelectItem::Expr {
            expr,
            alias: alias.map(Ident::new),
        });
        self
    }

    /// Sets DISTINCT.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.select.distinct = Some(Distinct::Distinct);
        self
    }
}

// Transition: NoFrom -> HasFrom
impl<Cols> SelectBuilder<Cols, NoFrom> {
    /// Specifies the table to select from.
    #[must_use]
    pub fn from(self, table: &str) -> SelectBuilder<Cols, HasFrom> {
        self.from_table(TableRef::table(table))
    }

    /// Specifies an arbitrary FROM item.
    #[must_use]
    pub fn from_table(mut self, table: TableRef) -> SelectBuilder<Cols, HasFrom> {
        self.select.from = vec![table];
        self.transition()
    }
}

// Methods available after FROM
impl<Cols> SelectBuilder<Cols, HasFrom> {
    /// Adds a WHERE condition; repeated calls are ANDed together.
    #[must_use]
    pub fn where_clause(mut self, predicate: Predicate) -> Self {
        self.select.where_clause = Some(match self.select.where_clause.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    /// Adds an INNER JOIN.
    #[must_use]
    pub fn join(self, table: TableRef, on: Predicate) -> Self {
        self.join_on(JoinKind::Inner, table, on)
    }

    /// Adds a LEFT JOIN.
    #[must_use]
    pub fn left_join(self, table: TableRef, on: Predicate) -> Self {
        self.join_on(JoinKind::Left, table, on)
    }

    /// Adds a RIGHT JOIN.
    #[must_use]
    pub fn right_join(self, table: TableRef, on: Predicate) -> Self {
        self.join_on(JoinKind::Right, table, on)
    }

    fn join_on(mut self, kind: JoinKind, table: TableRef, condition: Predicate) -> Self {
        self.select.joins.push(Join::On {
            kind,
            table,
            condition,
        });
        self
    }

    /// Adds a CROSS JOIN.
    #[must_use]
    pub fn cross_join(mut self, table: TableRef) -> Self {
        self.select.joins.push(Join::Cross { table });
        self
    }
}

impl SelectBuilder<HasColumns, HasFrom> {
    /// Adds a GROUP BY clause.
    #[must_use]
    pub fn group_by(mut self, cols: &[&str]) -> Self {
        self.select.group_by = cols
            .iter()
            .map(|c| GroupItem::Expr(Expr::column(c)))
            .collect();
        self
    }

    /// Adds a HAVING clause.
    #[must_use]
    pub fn having(mut self, predicate: Predicate) -> Self {
        self.select.having = Some(predicate);
        self
    }

    /// Adds ORDER BY keys.
    #[must_use]
    pub fn order_by(mut self, items: impl IntoIterator<Item = OrderItem>) -> Self {
        self.select.order_by.extend(items);
        self
    }

    /// Adds a LIMIT clause.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.select.limit = Some(n);
        self
    }

    /// Adds an OFFSET clause.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.select.offset = Some(n);
        self
    }

    /// Finishes the query.
    #[must_use]
    pub fn build(self) -> Query {
        self.select.into()
    }

    /// Combines this query with `other` under `UNION [ALL]`.
    ///
    /// # Errors
    ///
    /// Returns an error if either side carries ORDER BY or pagination.
    pub fn union(self, other: Query, all: bool) -> Result<Query, InvariantError> {
        let op = SetOperator {
            kind: SetOpKind::Union,
            all,
        };
        let terms = vec![self.build(), other];
        CompositeQuery::new(terms, vec![op], Vec::new(), Pagination::default())
            .map(|composite| Query::Composite(Box::new(composite)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{col, param};
    use crate::dialect::SqlDialect;

    fn ansi(query: &Query) -> String {
        SqlDialect::ansi().render(query).unwrap()
    }

    #[test]
    fn test_simple_select() {
        let query = SelectBuilder::new()
            .columns(&["id", "name"])
            .from("users")
            .build();
        assert_eq!(ansi(&query), "SELECT id, name\nFROM users");
    }

    #[test]
    fn test_select_all_distinct() {
        let query = SelectBuilder::new().all().distinct().from("orders").build();
        assert_eq!(ansi(&query), "SELECT DISTINCT *\nFROM orders");
    }

    #[test]
    fn test_where_clauses_are_anded() {
        let query = SelectBuilder::new()
            .columns(&["id"])
            .from("users")
            .where_clause(col("active").eq(true))
            .where_clause(col("age").gt_eq(param("min_age")).or(col("vip").eq(true)))
            .build();
        assert_eq!(
            ansi(&query),
            "SELECT id\nFROM users\nWHERE active = TRUE\n\
             AND (\n  age >= :min_age\n  OR vip = TRUE\n)"
        );
    }

    #[test]
    fn test_join_group_order() {
        let query = SelectBuilder::new()
            .columns(&["u.id"])
            .and_expr(
                Expr::function("count", vec![Expr::column("o.id")]),
                Some("n"),
            )
            .from_table(TableRef::table("users").alias("u"))
            .left_join(
                TableRef::table("orders").alias("o"),
                col("u.id").eq(col("o.user_id")),
            )
            .group_by(&["u.id"])
            .order_by([col("n").desc()])
            .limit(10)
            .offset(20)
            .build();
        assert_eq!(
            ansi(&query),
            "SELECT u.id, count(o.id) AS n\nFROM users AS u\n\
             LEFT JOIN orders AS o ON u.id = o.user_id\n\
             GROUP BY u.id\nORDER BY n DESC\nOFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
        );
    }

    #[test]
    fn test_union_rejects_term_tail() {
        let ordered = SelectBuilder::new()
            .all()
            .from("a")
            .order_by([col("x").asc()])
            .union(SelectBuilder::new().all().from("b").build(), false);
        assert_eq!(ordered, Err(InvariantError::TermTail { index: 0 }));

        let union = SelectBuilder::new()
            .columns(&["t.*"])
            .from("t")
            .union(SelectBuilder::new().all().from("u").build(), true)
            .unwrap();
        assert_eq!(
            ansi(&union),
            "SELECT t.*\nFROM t\nUNION ALL\nSELECT *\nFROM u"
        );
    }
}
