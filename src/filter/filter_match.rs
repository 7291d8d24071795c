use std::cmp::Ordering;

use serde_json::Value;

use super::filter::Filter;
use super::types::{FilterOp, FilterWhereInfo, SortDirection};
use crate::record::Record;

/// Evaluates a `Filter` against rows held in memory, with the same
/// semantics the REST backend applies.
pub struct FilterMatch;

impl FilterMatch {
    pub fn execute(filter: &Filter, rows: &[Record]) -> Vec<Record> {
        let mut out: Vec<Record> = rows
            .iter()
            .filter(|row| Self::matches(filter.conditions(), row))
            .cloned()
            .collect();

        let order = filter.order_info();
        if !order.is_empty() {
            out.sort_by(|a, b| {
                for info in order {
                    let ord = Self::compare(a.get(&info.column), b.get(&info.column));
                    let ord = match info.sort {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    };
                    if ord != Ordering::Equal { return ord; }
                }
                Ordering::Equal
            });
        }

        if let Some(limit) = filter.limit_value() {
            out.truncate(limit.max(0) as usize);
        }
        out
    }

    pub fn matches(conditions: &[FilterWhereInfo], row: &Record) -> bool {
        conditions.iter().all(|c| Self::matches_one(c, row))
    }

    fn matches_one(condition: &FilterWhereInfo, row: &Record) -> bool {
        let field = row.get(&condition.column).filter(|v| !v.is_null());
        match condition.operator {
            FilterOp::Eq => match (field, &condition.data) {
                (None, Value::Null) => true,
                (Some(v), data) if !data.is_null() => Self::text(v) == Self::text(data),
                _ => false,
            },
            FilterOp::ILike => match (field, condition.data.as_str()) {
                (Some(v), Some(pattern)) => {
                    like(&pattern.to_lowercase(), &Self::text(v).to_lowercase())
                }
                _ => false,
            },
            FilterOp::In => match (field, condition.data.as_array()) {
                (Some(v), Some(values)) => {
                    let needle = Self::text(v);
                    values.iter().any(|candidate| Self::text(candidate) == needle)
                }
                _ => false,
            },
        }
    }

    fn text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    // Nulls sort after everything else, as Postgres does for ascending order
    fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        let a = a.filter(|v| !v.is_null());
        let b = b.filter(|v| !v.is_null());
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(Value::Number(x)), Some(Value::Number(y))) => {
                let x = x.as_f64().unwrap_or(0.0);
                let y = y.as_f64().unwrap_or(0.0);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (Some(x), Some(y)) => Self::text(x).cmp(&Self::text(y)),
        }
    }
}

/// SQL LIKE: `%` matches any run of characters, `_` exactly one.
fn like(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0usize, 0usize);
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '_' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '%' {
            backtrack = Some((pi, ti));
            pi += 1;
        } else if let Some((bp, bt)) = backtrack {
            pi = bp + 1;
            ti = bt + 1;
            backtrack = Some((bp, bt + 1));
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == '%' {
        pi += 1;
    }
    pi == p.len()
}
