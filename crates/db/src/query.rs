//! Rendering of [`ListQuery`] parts into SQLite SQL.
//!
//! Callers start the statement with a `WHERE` clause of their own (usually the
//! soft-delete guard); conditions are appended with `AND`.

use bookstore_kernel::query::{Condition, FieldSet, FilterSpec, PageRequest, SortField};
use sqlx::{QueryBuilder, Sqlite};

/// `LIKE` pattern matching `needle` literally anywhere in the value.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub fn push_filter<F: FieldSet>(qb: &mut QueryBuilder<'_, Sqlite>, spec: &FilterSpec<F>) {
    for condition in spec.conditions() {
        qb.push(" AND ");
        match condition {
            Condition::ContainsAny { fields, needle } => {
                if fields.is_empty() {
                    qb.push("0");
                    continue;
                }
                let pattern = contains_pattern(needle);
                qb.push("(");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        qb.push(" OR ");
                    }
                    qb.push(field.column())
                        .push(" LIKE ")
                        .push_bind(pattern.clone())
                        .push(" ESCAPE '\\'");
                }
                qb.push(")");
            }
            Condition::Range { field, min, max } => {
                qb.push("(1");
                if let Some(min) = min {
                    qb.push(" AND ")
                        .push(field.column())
                        .push(" >= ")
                        .push_bind(*min);
                }
                if let Some(max) = max {
                    qb.push(" AND ")
                        .push(field.column())
                        .push(" <= ")
                        .push_bind(*max);
                }
                qb.push(")");
            }
        }
    }
}

/// Appends `ORDER BY`, always ending with `tie_breaker ASC` so that paging is
/// stable.
pub fn push_order_by<F: FieldSet>(
    qb: &mut QueryBuilder<'_, Sqlite>,
    sorting: &[SortField<F>],
    tie_breaker: &str,
) {
    qb.push(" ORDER BY ");
    for sort in sorting {
        qb.push(sort.field.column())
            .push(" ")
            .push(sort.direction.as_sql())
            .push(", ");
    }
    qb.push(tie_breaker).push(" ASC");
}

pub fn push_page(qb: &mut QueryBuilder<'_, Sqlite>, page: PageRequest) {
    qb.push(" LIMIT ")
        .push_bind(i64::try_from(page.limit).unwrap_or(i64::MAX))
        .push(" OFFSET ")
        .push_bind(i64::try_from(page.skip).unwrap_or(i64::MAX));
}
