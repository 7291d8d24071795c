use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    #[serde(rename = "$eq")] Eq,
    #[serde(rename = "$ilike")] ILike,
    #[serde(rename = "$in")] In,
}

impl FilterOp {
    /// Operator prefix understood by the REST backend (`col=eq.value`)
    pub fn to_rest(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::ILike => "ilike",
            FilterOp::In => "in",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
    pub data: Value,
}

impl FilterWhereInfo {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { column: column.into(), operator: FilterOp::Eq, data: value.into() }
    }

    pub fn ilike(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self { column: column.into(), operator: FilterOp::ILike, data: Value::String(pattern.into()) }
    }

    pub fn in_list(column: impl Into<String>, values: &[String]) -> Self {
        let data = Value::Array(values.iter().cloned().map(Value::String).collect());
        Self { column: column.into(), operator: FilterOp::In, data }
    }
}

/// Row restriction applied to a query before it is executed.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// No restriction.
    Unrestricted,
    /// Matches no row at all.
    MatchNone,
    Where(FilterWhereInfo),
}

impl Predicate {
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Predicate::Unrestricted)
    }

    /// Lower the predicate into plain conditions. `MatchNone` becomes an
    /// equality against the nil uuid, which no stored id can take.
    pub fn conditions(&self) -> Vec<FilterWhereInfo> {
        match self {
            Predicate::Unrestricted => vec![],
            Predicate::MatchNone => vec![FilterWhereInfo::eq("id", Uuid::nil().to_string())],
            Predicate::Where(info) => vec![info.clone()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_rest(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

/// Query string pairs ready for the REST endpoint
pub type QueryParams = Vec<(String, String)>;
