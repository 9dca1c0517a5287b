//! SQL rendering for document queries
//!
//! Every entity lives in a table with an `id` column and a JSONB `data`
//! column. Field references become `data -> 'field'` / `data ->> 'field'`
//! expressions; values are always bound as parameters.

use crate::query_builder::filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
use crate::query_builder::ordering::{OrderBy, SortKind};
use serde_json::Value;

/// A bound query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Json(Value),
    Float(f64),
    Text(String),
}

pub struct SqlGenerator;

impl SqlGenerator {
    /// Build WHERE clause from conditions
    pub fn build_where_clause(conditions: &[QueryFilter]) -> (String, Vec<SqlParam>) {
        if conditions.is_empty() {
            return ("".to_string(), Vec::new());
        }

        let mut params = Vec::new();
        let conditions_sql = conditions
            .iter()
            .map(|condition| Self::build_condition_sql(condition, &mut params))
            .collect::<Vec<_>>()
            .join(" AND ");

        (format!("WHERE {}", conditions_sql), params)
    }

    fn build_condition_sql(filter: &QueryFilter, params: &mut Vec<SqlParam>) -> String {
        match filter {
            QueryFilter::Condition(condition) => Self::build_single_condition_sql(condition, params),
            QueryFilter::Group { operator, filters } => {
                if filters.is_empty() {
                    return match operator {
                        LogicalOperator::And => "TRUE".to_string(),
                        LogicalOperator::Or => "FALSE".to_string(),
                    };
                }

                let operator_str = match operator {
                    LogicalOperator::And => " AND ",
                    LogicalOperator::Or => " OR ",
                };

                let group_conditions = filters
                    .iter()
                    .map(|f| Self::build_condition_sql(f, params))
                    .collect::<Vec<_>>()
                    .join(operator_str);

                format!("({})", group_conditions)
            }
        }
    }

    fn build_single_condition_sql(condition: &QueryCondition, params: &mut Vec<SqlParam>) -> String {
        let field = quote_field(&condition.field);

        match &condition.operator {
            QueryOperator::Eq => {
                let param = push(params, SqlParam::Json(condition.value.clone()));
                format!("data -> {} = {}", field, param)
            }
            QueryOperator::Gte | QueryOperator::Lte => {
                let op = if condition.operator == QueryOperator::Gte {
                    ">="
                } else {
                    "<="
                };
                match condition.value.as_f64() {
                    Some(number) => {
                        let param = push(params, SqlParam::Float(number));
                        format!("(data ->> {})::float8 {} {}", field, op, param)
                    }
                    None => {
                        let param = push(params, SqlParam::Text(value_text(&condition.value)));
                        format!("data ->> {} {} {}", field, op, param)
                    }
                }
            }
            QueryOperator::ContainsInsensitive => {
                let pattern = format!("%{}%", escape_like(&value_text(&condition.value)));
                let param = push(params, SqlParam::Text(pattern));
                format!("data ->> {} ILIKE {}", field, param)
            }
            QueryOperator::HasElement => {
                let param = push(params, SqlParam::Json(Value::Array(vec![condition.value.clone()])));
                format!("data -> {} @> {}", field, param)
            }
        }
    }

    /// Build ORDER BY clause; `id` always breaks ties so paging is stable
    pub fn build_order_clause(order_by: &[OrderBy]) -> String {
        let mut order_items: Vec<String> = order_by
            .iter()
            .map(|item| {
                let field = quote_field(&item.field);
                let expr = match item.kind {
                    SortKind::Text => format!("data ->> {}", field),
                    SortKind::Number => format!("(data ->> {})::float8", field),
                    SortKind::Bool => format!("(data ->> {})::boolean", field),
                    SortKind::Timestamp => format!("(data ->> {})::timestamptz", field),
                };
                format!("{} {} NULLS LAST", expr, item.order.to_sql())
            })
            .collect();
        order_items.push("id ASC".to_string());

        format!("ORDER BY {}", order_items.join(", "))
    }

    /// Build LIMIT/OFFSET clause
    pub fn build_limit_clause(limit: Option<i64>, offset: Option<i64>) -> String {
        let mut clauses = Vec::new();

        if let Some(limit) = limit {
            clauses.push(format!("LIMIT {}", limit.max(0)));
        }

        if let Some(offset) = offset {
            clauses.push(format!("OFFSET {}", offset.max(0)));
        }

        clauses.join(" ")
    }
}

fn push(params: &mut Vec<SqlParam>, param: SqlParam) -> String {
    params.push(param);
    format!("${}", params.len())
}

/// Field name as a SQL string literal
fn quote_field(field: &str) -> String {
    format!("'{}'", field.replace('\'', "''"))
}

/// Text form of a value, as `->>` would render it
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
