use serde_json::Value;

use super::error::FilterError;
use super::types::{FilterOp, FilterWhereInfo, QueryParams};

pub struct FilterWhere;

impl FilterWhere {
    pub fn generate(conditions: &[FilterWhereInfo]) -> Result<QueryParams, FilterError> {
        let mut params = Vec::with_capacity(conditions.len());
        for condition in conditions {
            Self::validate(condition)?;
            params.push((condition.column.clone(), Self::build_rest_condition(condition)));
        }
        Ok(params)
    }

    pub fn validate(condition: &FilterWhereInfo) -> Result<(), FilterError> {
        match (&condition.operator, &condition.data) {
            (FilterOp::In, Value::Array(values)) => {
                if values.iter().any(|v| v.is_array() || v.is_object()) {
                    return Err(FilterError::InvalidOperatorData { operator: "in", reason: "values must be scalars" });
                }
                Ok(())
            }
            (FilterOp::In, _) => Err(FilterError::InvalidOperatorData { operator: "in", reason: "requires a list" }),
            (FilterOp::ILike, Value::String(_)) => Ok(()),
            (FilterOp::ILike, _) => Err(FilterError::InvalidOperatorData { operator: "ilike", reason: "requires a string pattern" }),
            (FilterOp::Eq, Value::Array(_)) | (FilterOp::Eq, Value::Object(_)) => {
                Err(FilterError::InvalidOperatorData { operator: "eq", reason: "requires a scalar value" })
            }
            (FilterOp::Eq, _) => Ok(()),
        }
    }

    fn build_rest_condition(condition: &FilterWhereInfo) -> String {
        match condition.operator {
            FilterOp::Eq => {
                if condition.data.is_null() { "is.null".to_string() }
                else { format!("eq.{}", Self::scalar(&condition.data)) }
            }
            FilterOp::ILike => format!("ilike.{}", Self::scalar(&condition.data)),
            FilterOp::In => {
                let values = condition.data.as_array().map(Vec::as_slice).unwrap_or_default();
                let quoted: Vec<String> = values.iter().map(|v| Self::quote(&Self::scalar(v))).collect();
                format!("in.({})", quoted.join(","))
            }
        }
    }

    fn scalar(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Null => "null".to_string(),
            other => other.to_string(),
        }
    }

    // List members are double-quoted so commas and parentheses survive
    fn quote(raw: &str) -> String {
        format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generates_rest_operators() {
        let params = FilterWhere::generate(&[
            FilterWhereInfo::eq("id", "42"),
            FilterWhereInfo::ilike("ward", "Kilimani"),
            FilterWhereInfo::in_list("sub_county", &["Westlands".to_string(), "Dagoretti North".to_string()]),
        ])
        .unwrap();

        assert_eq!(params[0], ("id".to_string(), "eq.42".to_string()));
        assert_eq!(params[1], ("ward".to_string(), "ilike.Kilimani".to_string()));
        assert_eq!(params[2], ("sub_county".to_string(), "in.(\"Westlands\",\"Dagoretti North\")".to_string()));
    }

    #[test]
    fn test_null_equality_becomes_is_null() {
        let params = FilterWhere::generate(&[FilterWhereInfo::eq("ward", Value::Null)]).unwrap();
        assert_eq!(params[0].1, "is.null");
    }

    #[test]
    fn test_in_requires_array() {
        let bad = FilterWhereInfo { column: "ward".into(), operator: FilterOp::In, data: json!("Kilimani") };
        assert!(matches!(FilterWhere::generate(&[bad]), Err(FilterError::InvalidOperatorData { .. })));
    }
}
