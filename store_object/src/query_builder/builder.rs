//! Query builder over JSON documents
//!
//! The same `QueryBuilder` renders to PostgreSQL over a JSONB column and
//! evaluates directly against `serde_json::Value` documents, so every
//! repository backend shares filter and ordering semantics.

use crate::query_builder::filter::QueryFilter;
use crate::query_builder::matcher;
use crate::query_builder::ordering::{OrderBy, SortKind, SortOrder};
use crate::query_builder::sql_generation::{SqlGenerator, SqlParam};
use serde_json::Value;

/// Query builder for constructing document queries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    pub(crate) conditions: Vec<QueryFilter>,
    pub(crate) order_by: Vec<OrderBy>,
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter condition
    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.conditions.push(filter);
        self
    }

    /// Add multiple filters (combined with AND)
    pub fn filters(mut self, filters: Vec<QueryFilter>) -> Self {
        self.conditions.extend(filters);
        self
    }

    /// Add an equality condition when `value` is present
    pub fn eq_opt<V: Into<Value>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.filter(QueryFilter::eq(field, value)),
            None => self,
        }
    }

    /// Add ordering
    pub fn order_by(mut self, field: &str, kind: SortKind, order: SortOrder) -> Self {
        self.order_by.push(OrderBy {
            field: field.to_string(),
            kind,
            order,
        });
        self
    }

    /// Add limit
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Add offset
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Apply optional paging values
    pub fn paginate(mut self, limit: Option<i64>, offset: Option<i64>) -> Self {
        if limit.is_some() {
            self.limit = limit;
        }
        if offset.is_some() {
            self.offset = offset;
        }
        self
    }

    /// Same conditions, no ordering or paging; what a count needs
    pub fn without_paging(mut self) -> Self {
        self.order_by.clear();
        self.limit = None;
        self.offset = None;
        self
    }

    pub fn conditions(&self) -> &[QueryFilter] {
        &self.conditions
    }

    /// Build WHERE clause
    pub fn build_where_clause(&self) -> (String, Vec<SqlParam>) {
        SqlGenerator::build_where_clause(&self.conditions)
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(&self) -> String {
        SqlGenerator::build_order_clause(&self.order_by)
    }

    /// Build LIMIT/OFFSET clause
    pub fn build_limit_clause(&self) -> String {
        SqlGenerator::build_limit_clause(self.limit, self.offset)
    }

    /// Build complete query parts (WHERE, ORDER BY, LIMIT, params)
    pub fn build(&self) -> (String, String, String, Vec<SqlParam>) {
        let (where_clause, params) = self.build_where_clause();
        let order_clause = self.build_order_clause();
        let limit_clause = self.build_limit_clause();

        (where_clause, order_clause, limit_clause, params)
    }

    /// Whether a single document satisfies every condition
    pub fn matches(&self, document: &Value) -> bool {
        self.conditions
            .iter()
            .all(|filter| matcher::filter_matches(filter, document))
    }

    /// Filter, sort and page a set of documents
    pub fn apply(&self, documents: Vec<Value>) -> Vec<Value> {
        let mut selected: Vec<Value> = documents
            .into_iter()
            .filter(|doc| self.matches(doc))
            .collect();
        selected.sort_by(|a, b| matcher::compare_documents(&self.order_by, a, b));

        let offset = self.offset.unwrap_or(0).max(0) as usize;
        let iter = selected.into_iter().skip(offset);
        match self.limit {
            Some(limit) => iter.take(limit.max(0) as usize).collect(),
            None => iter.collect(),
        }
    }
}
