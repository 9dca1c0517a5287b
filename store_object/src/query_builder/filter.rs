//! Filter conditions over JSON document fields

use serde_json::Value;

/// Query condition operators
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOperator {
    Eq,                  // =
    Gte,                 // >=
    Lte,                 // <=
    ContainsInsensitive, // ILIKE '%value%'
    HasElement,          // array @> [value]
}

/// Single condition on a top-level document field
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCondition {
    pub field: String,
    pub operator: QueryOperator,
    pub value: Value,
}

/// Logical operators for combining conditions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogicalOperator {
    And,
    Or,
}

/// Query filter that can be nested
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
    Condition(QueryCondition),
    Group {
        operator: LogicalOperator,
        filters: Vec<QueryFilter>,
    },
}

impl QueryFilter {
    /// Create a simple condition
    pub fn condition(field: &str, operator: QueryOperator, value: Value) -> Self {
        Self::Condition(QueryCondition {
            field: field.to_string(),
            operator,
            value,
        })
    }

    /// Create AND group
    pub fn and(filters: Vec<QueryFilter>) -> Self {
        Self::Group {
            operator: LogicalOperator::And,
            filters,
        }
    }

    /// Create OR group
    pub fn or(filters: Vec<QueryFilter>) -> Self {
        Self::Group {
            operator: LogicalOperator::Or,
            filters,
        }
    }

    /// Equal condition
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::condition(field, QueryOperator::Eq, value.into())
    }

    /// Greater than or equal condition; numbers compare numerically, anything else as text
    pub fn gte(field: &str, value: impl Into<Value>) -> Self {
        Self::condition(field, QueryOperator::Gte, value.into())
    }

    /// Less than or equal condition
    pub fn lte(field: &str, value: impl Into<Value>) -> Self {
        Self::condition(field, QueryOperator::Lte, value.into())
    }

    /// Case-insensitive substring match
    pub fn contains_insensitive(field: &str, needle: &str) -> Self {
        Self::condition(
            field,
            QueryOperator::ContainsInsensitive,
            Value::String(needle.to_string()),
        )
    }

    /// Array field holds `element`
    pub fn has_element(field: &str, element: impl Into<Value>) -> Self {
        Self::condition(field, QueryOperator::HasElement, element.into())
    }
}
