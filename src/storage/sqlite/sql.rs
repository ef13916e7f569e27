//! SQL construction for entry queries.
//!
//! Filters are rendered with numbered parameters (`?1`, `?2`, ...). Column
//! names in `ORDER BY` come from [`SortColumn::as_str`], never from caller
//! text.

use crate::models::{EntryQuery, SortColumn, SortDirection, TimeRange, UserId};
use rusqlite::types::Value;

/// Condition restricting entries to feeds not hidden from aggregate views.
pub const GLOBALLY_VISIBLE_CONDITION: &str =
    "e.feed_id IN (SELECT f.id FROM feeds f WHERE f.user_id = e.user_id AND f.hide_globally = 0)";

/// A rendered `WHERE` clause and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    /// Conditions joined with `AND`, without the `WHERE` keyword.
    pub sql: String,
    /// Parameter values, `params[0]` binds `?1`.
    pub params: Vec<Value>,
}

/// Builds the `WHERE` conditions for an entry query.
///
/// # Examples
///
/// ```
/// use feedbuckets::models::{EntryQuery, EntryStatus, UserId};
/// use feedbuckets::storage::sqlite::build_filter_clause;
///
/// let query = EntryQuery::new(UserId::new(7)).with_status(EntryStatus::Unread);
/// let clause = build_filter_clause(&query);
///
/// assert_eq!(clause.sql, "e.user_id = ?1 AND e.status = ?2");
/// assert_eq!(clause.params.len(), 2);
/// ```
#[must_use]
pub fn build_filter_clause(query: &EntryQuery) -> FilterClause {
    let mut conditions = vec!["e.user_id = ?1".to_string()];
    let mut params = vec![Value::Integer(query.user_id.get())];

    if let Some(status) = query.status {
        params.push(Value::Text(status.as_str().to_string()));
        conditions.push(format!("e.status = ?{}", params.len()));
    }

    if query.globally_visible {
        conditions.push(GLOBALLY_VISIBLE_CONDITION.to_string());
    }

    push_range_conditions(&query.range, &mut conditions, &mut params);

    FilterClause {
        sql: conditions.join(" AND "),
        params,
    }
}

/// Builds the `WHERE` conditions for a range-scoped read mutation.
///
/// Targets the same entries an unread, globally visible query over `range`
/// would count.
#[must_use]
pub fn build_mark_read_clause(user_id: UserId, range: &TimeRange) -> FilterClause {
    let mut conditions = vec![
        "e.user_id = ?1".to_string(),
        "e.status = 'unread'".to_string(),
        GLOBALLY_VISIBLE_CONDITION.to_string(),
    ];
    let mut params = vec![Value::Integer(user_id.get())];

    push_range_conditions(range, &mut conditions, &mut params);

    FilterClause {
        sql: conditions.join(" AND "),
        params,
    }
}

/// Builds an `ORDER BY` clause, or an empty string when there is no sorting.
#[must_use]
pub fn build_order_clause(sorting: &[(SortColumn, SortDirection)]) -> String {
    if sorting.is_empty() {
        return String::new();
    }
    let terms: Vec<String> = sorting
        .iter()
        .map(|(column, direction)| format!("e.{} {}", column.as_str(), direction.as_sql()))
        .collect();
    format!(" ORDER BY {}", terms.join(", "))
}

fn push_range_conditions(range: &TimeRange, conditions: &mut Vec<String>, params: &mut Vec<Value>) {
    if let Some(after) = range.after {
        params.push(Value::Integer(after.timestamp()));
        conditions.push(format!("e.published_at >= ?{}", params.len()));
    }
    if let Some(before) = range.before {
        params.push(Value::Integer(before.timestamp()));
        conditions.push(format!("e.published_at < ?{}", params.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryStatus;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_minimal_filter() {
        let clause = build_filter_clause(&EntryQuery::new(UserId::new(3)));
        assert_eq!(clause.sql, "e.user_id = ?1");
        assert_eq!(clause.params, vec![Value::Integer(3)]);
    }

    #[test]
    fn test_full_filter_numbers_params_in_order() {
        let after = Utc.with_ymd_and_hms(2024, 6, 14, 12, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let query = EntryQuery::new(UserId::new(1))
            .with_status(EntryStatus::Unread)
            .with_globally_visible()
            .after(after)
            .before(before);

        let clause = build_filter_clause(&query);
        assert_eq!(
            clause.sql,
            format!(
                "e.user_id = ?1 AND e.status = ?2 AND {GLOBALLY_VISIBLE_CONDITION} \
                 AND e.published_at >= ?3 AND e.published_at < ?4"
            )
        );
        assert_eq!(
            clause.params,
            vec![
                Value::Integer(1),
                Value::Text("unread".to_string()),
                Value::Integer(after.timestamp()),
                Value::Integer(before.timestamp()),
            ]
        );
    }

    #[test]
    fn test_open_ended_range() {
        let before = Utc.with_ymd_and_hms(2024, 5, 16, 12, 0, 0).unwrap();
        let clause = build_mark_read_clause(UserId::new(9), &TimeRange::until(before));
        assert!(clause.sql.ends_with("e.published_at < ?2"));
        assert!(!clause.sql.contains(">="));
        assert_eq!(clause.params.len(), 2);
    }

    #[test]
    fn test_order_clause() {
        assert_eq!(build_order_clause(&[]), "");
        assert_eq!(
            build_order_clause(&[
                (SortColumn::PublishedAt, SortDirection::Desc),
                (SortColumn::Id, SortDirection::Desc),
            ]),
            " ORDER BY e.published_at DESC, e.id DESC"
        );
    }
}
