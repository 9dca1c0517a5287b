//! Query builder tests

#[cfg(test)]
mod tests {
    use crate::query_builder::{QueryBuilder, QueryFilter, SortKind, SortOrder, SqlParam};
    use serde_json::{json, Value};

    fn ids(documents: &[Value]) -> Vec<&str> {
        documents
            .iter()
            .map(|doc| doc["id"].as_str().unwrap_or_default())
            .collect()
    }

    fn tickets() -> Vec<Value> {
        vec![
            json!({"id": "t1", "city": "Rome", "price": 20, "priority": 2, "isRecommended": true, "type": "MUSEUM"}),
            json!({"id": "t2", "city": "rome", "price": 12.5, "priority": 1, "isRecommended": false, "type": "CITY"}),
            json!({"id": "t3", "city": "Barcelona", "price": 30, "priority": 1, "isRecommended": true, "type": "MUSEUM"}),
            json!({"id": "t4", "city": "Romería", "price": null, "priority": 3, "type": "POPULAR"}),
        ]
    }

    // ========================================
    // SQL Generation
    // ========================================

    #[test]
    fn test_empty_query_has_no_where_clause() {
        let (where_clause, order_clause, limit_clause, params) = QueryBuilder::new().build();
        assert_eq!(where_clause, "");
        assert_eq!(order_clause, "ORDER BY id ASC");
        assert_eq!(limit_clause, "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_conditions_number_their_parameters() {
        let query = QueryBuilder::new()
            .filter(QueryFilter::eq("type", "MUSEUM"))
            .filter(QueryFilter::gte("price", 10))
            .filter(QueryFilter::contains_insensitive("city", "ro"));

        let (where_clause, params) = query.build_where_clause();
        assert_eq!(
            where_clause,
            "WHERE data -> 'type' = $1 AND (data ->> 'price')::float8 >= $2 AND data ->> 'city' ILIKE $3"
        );
        assert_eq!(
            params,
            vec![
                SqlParam::Json(json!("MUSEUM")),
                SqlParam::Float(10.0),
                SqlParam::Text("%ro%".to_string()),
            ]
        );
    }

    #[test]
    fn test_text_bounds_and_array_membership() {
        let query = QueryBuilder::new()
            .filter(QueryFilter::lte("expirationTime", "2030-01-01T00:00:00Z"))
            .filter(QueryFilter::has_element("memberIds", "u1"));

        let (where_clause, params) = query.build_where_clause();
        assert_eq!(
            where_clause,
            "WHERE data ->> 'expirationTime' <= $1 AND data -> 'memberIds' @> $2"
        );
        assert_eq!(params[1], SqlParam::Json(json!(["u1"])));
    }

    #[test]
    fn test_groups_and_like_escaping() {
        let query = QueryBuilder::new().filter(QueryFilter::or(vec![
            QueryFilter::contains_insensitive("name", "50%_off"),
            QueryFilter::eq("isActive", true),
        ]));

        let (where_clause, params) = query.build_where_clause();
        assert_eq!(
            where_clause,
            "WHERE (data ->> 'name' ILIKE $1 OR data -> 'isActive' = $2)"
        );
        assert_eq!(params[0], SqlParam::Text("%50\\%\\_off%".to_string()));

        let empty_or = QueryBuilder::new().filter(QueryFilter::or(vec![]));
        assert_eq!(empty_or.build_where_clause().0, "WHERE FALSE");
    }

    #[test]
    fn test_field_names_are_quoted() {
        let query = QueryBuilder::new().filter(QueryFilter::eq("x'; DROP TABLE users; --", 1));
        let (where_clause, _) = query.build_where_clause();
        assert_eq!(where_clause, "WHERE data -> 'x''; DROP TABLE users; --' = $1");
    }

    #[test]
    fn test_order_and_limit_clauses() {
        let query = QueryBuilder::new()
            .order_by("priority", SortKind::Number, SortOrder::Asc)
            .order_by("createdAt", SortKind::Timestamp, SortOrder::Desc)
            .limit(10)
            .offset(20);

        assert_eq!(
            query.build_order_clause(),
            "ORDER BY (data ->> 'priority')::float8 ASC NULLS LAST, (data ->> 'createdAt')::timestamptz DESC NULLS LAST, id ASC"
        );
        assert_eq!(query.build_limit_clause(), "LIMIT 10 OFFSET 20");

        let count_query = query.without_paging();
        assert_eq!(count_query.build_limit_clause(), "");
        assert_eq!(count_query.build_order_clause(), "ORDER BY id ASC");
    }

    // ========================================
    // In-process Evaluation
    // ========================================

    #[test]
    fn test_equality_and_numeric_bounds() {
        let query = QueryBuilder::new()
            .filter(QueryFilter::eq("type", "MUSEUM"))
            .filter(QueryFilter::lte("price", 25));
        assert_eq!(ids(&query.apply(tickets())), vec!["t1"]);

        let float_eq = QueryBuilder::new().filter(QueryFilter::eq("price", 20.0));
        assert_eq!(ids(&float_eq.apply(tickets())), vec!["t1"]);
    }

    #[test]
    fn test_missing_and_null_fields_never_match() {
        let query = QueryBuilder::new().filter(QueryFilter::gte("price", 0));
        assert_eq!(ids(&query.apply(tickets())), vec!["t1", "t2", "t3"]);

        let recommended = QueryBuilder::new().filter(QueryFilter::eq("isRecommended", false));
        assert_eq!(ids(&recommended.apply(tickets())), vec!["t2"]);
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let query = QueryBuilder::new().filter(QueryFilter::contains_insensitive("city", "ROM"));
        assert_eq!(ids(&query.apply(tickets())), vec!["t1", "t2", "t4"]);
    }

    #[test]
    fn test_has_element() {
        let tours = vec![
            json!({"id": "a", "memberIds": ["u1", "u2"]}),
            json!({"id": "b", "memberIds": ["u3"]}),
            json!({"id": "c"}),
        ];
        let query = QueryBuilder::new().filter(QueryFilter::has_element("memberIds", "u2"));
        assert_eq!(ids(&query.apply(tours)), vec!["a"]);
    }

    #[test]
    fn test_ordering_with_ties_and_nulls() {
        let query = QueryBuilder::new()
            .order_by("priority", SortKind::Number, SortOrder::Asc)
            .order_by("price", SortKind::Number, SortOrder::Desc);
        assert_eq!(ids(&query.apply(tickets())), vec!["t3", "t2", "t1", "t4"]);

        let by_price = QueryBuilder::new().order_by("price", SortKind::Number, SortOrder::Desc);
        // null price goes last even when descending
        assert_eq!(ids(&by_price.apply(tickets())), vec!["t3", "t1", "t2", "t4"]);
    }

    #[test]
    fn test_bool_and_timestamp_ordering() {
        let docs = vec![
            json!({"id": "m1", "isActive": false, "createdAt": "2024-05-01T10:00:00.5Z"}),
            json!({"id": "m2", "isActive": true, "createdAt": "2024-05-01T10:00:00.25Z"}),
            json!({"id": "m3", "isActive": true, "createdAt": "2024-05-01T10:00:01Z"}),
        ];
        let query = QueryBuilder::new()
            .order_by("isActive", SortKind::Bool, SortOrder::Desc)
            .order_by("createdAt", SortKind::Timestamp, SortOrder::Desc);
        assert_eq!(ids(&query.apply(docs)), vec!["m3", "m2", "m1"]);
    }

    #[test]
    fn test_paging_after_sorting() {
        let query = QueryBuilder::new()
            .order_by("priority", SortKind::Number, SortOrder::Desc)
            .paginate(Some(2), Some(1));
        assert_eq!(ids(&query.apply(tickets())), vec!["t1", "t2"]);

        let past_end = QueryBuilder::new().offset(10);
        assert!(past_end.apply(tickets()).is_empty());
    }

    #[test]
    fn test_optional_equality() {
        let none: Option<&str> = None;
        let query = QueryBuilder::new()
            .eq_opt("city", Some("Rome"))
            .eq_opt("type", none);
        assert_eq!(query.conditions().len(), 1);
        assert_eq!(ids(&query.apply(tickets())), vec!["t1"]);
    }
}
