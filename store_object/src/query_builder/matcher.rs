//! In-process evaluation of query filters and ordering
//!
//! Mirrors the SQL produced by `SqlGenerator`: a missing field never
//! satisfies a condition, and missing sort values go last in both
//! directions.

use crate::query_builder::filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
use crate::query_builder::ordering::{OrderBy, SortKind, SortOrder};
use crate::query_builder::sql_generation::value_text;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;

pub(crate) fn filter_matches(filter: &QueryFilter, document: &Value) -> bool {
    match filter {
        QueryFilter::Condition(condition) => condition_matches(condition, document),
        QueryFilter::Group { operator, filters } => match operator {
            LogicalOperator::And => filters.iter().all(|f| filter_matches(f, document)),
            LogicalOperator::Or => filters.iter().any(|f| filter_matches(f, document)),
        },
    }
}

fn condition_matches(condition: &QueryCondition, document: &Value) -> bool {
    let Some(actual) = document.get(&condition.field).filter(|v| !v.is_null()) else {
        return false;
    };

    match condition.operator {
        QueryOperator::Eq => json_eq(actual, &condition.value),
        QueryOperator::Gte => compare_bound(actual, &condition.value).is_some_and(|o| o.is_ge()),
        QueryOperator::Lte => compare_bound(actual, &condition.value).is_some_and(|o| o.is_le()),
        QueryOperator::ContainsInsensitive => value_text(actual)
            .to_lowercase()
            .contains(&value_text(&condition.value).to_lowercase()),
        QueryOperator::HasElement => actual
            .as_array()
            .is_some_and(|items| items.iter().any(|item| json_eq(item, &condition.value))),
    }
}

/// JSON equality with numbers compared by value (1 == 1.0)
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn compare_bound(actual: &Value, bound: &Value) -> Option<Ordering> {
    match bound.as_f64() {
        Some(limit) => numeric(actual)?.partial_cmp(&limit),
        None => Some(value_text(actual).cmp(&value_text(bound))),
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn compare_field(kind: SortKind, a: &Value, b: &Value) -> Option<Ordering> {
    match kind {
        SortKind::Text => Some(value_text(a).cmp(&value_text(b))),
        SortKind::Number => numeric(a)?.partial_cmp(&numeric(b)?),
        SortKind::Bool => Some(boolean(a)?.cmp(&boolean(b)?)),
        SortKind::Timestamp => Some(timestamp(a)?.cmp(&timestamp(b)?)),
    }
}

fn has_sort_value(kind: SortKind, value: Option<&Value>) -> bool {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return false;
    };
    match kind {
        SortKind::Text => true,
        SortKind::Number => numeric(value).is_some(),
        SortKind::Bool => boolean(value).is_some(),
        SortKind::Timestamp => timestamp(value).is_some(),
    }
}

pub(crate) fn compare_documents(order_by: &[OrderBy], a: &Value, b: &Value) -> Ordering {
    for item in order_by {
        let left = a.get(&item.field);
        let right = b.get(&item.field);

        let ordering = match (has_sort_value(item.kind, left), has_sort_value(item.kind, right)) {
            (false, false) => Ordering::Equal,
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (true, true) => {
                let (Some(left), Some(right)) = (left, right) else {
                    continue;
                };
                let natural = compare_field(item.kind, left, right).unwrap_or(Ordering::Equal);
                match item.order {
                    SortOrder::Asc => natural,
                    SortOrder::Desc => natural.reverse(),
                }
            }
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    let id = |doc: &Value| doc.get("id").map(value_text).unwrap_or_default();
    id(a).cmp(&id(b))
}
