use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterOrderInfo, FilterWhereInfo, Predicate, QueryParams, SortDirection};

/// A table read: select list, conditions, ordering and limit.
#[derive(Debug, Clone)]
pub struct Filter {
    table_name: String,
    select_columns: Vec<String>,
    conditions: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i32>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            select_columns: vec![],
            conditions: vec![],
            order_data: vec![],
            limit: None,
        })
    }

    pub fn table(&self) -> &str {
        &self.table_name
    }

    pub fn conditions(&self) -> &[FilterWhereInfo] {
        &self.conditions
    }

    pub fn order_info(&self) -> &[FilterOrderInfo] {
        &self.order_data
    }

    pub fn limit_value(&self) -> Option<i32> {
        self.limit
    }

    pub fn select(&mut self, columns: Vec<String>) -> Result<&mut Self, FilterError> {
        Self::validate_select_columns(&columns)?;
        self.select_columns = columns;
        Ok(self)
    }

    pub fn where_clause(&mut self, condition: FilterWhereInfo) -> Result<&mut Self, FilterError> {
        Self::validate_column(&condition.column)?;
        FilterWhere::validate(&condition)?;
        self.conditions.push(condition);
        Ok(self)
    }

    pub fn eq(&mut self, column: &str, value: impl Into<serde_json::Value>) -> Result<&mut Self, FilterError> {
        self.where_clause(FilterWhereInfo::eq(column, value))
    }

    pub fn ilike(&mut self, column: &str, pattern: impl Into<String>) -> Result<&mut Self, FilterError> {
        self.where_clause(FilterWhereInfo::ilike(column, pattern))
    }

    pub fn in_list(&mut self, column: &str, values: &[String]) -> Result<&mut Self, FilterError> {
        self.where_clause(FilterWhereInfo::in_list(column, values))
    }

    /// AND a predicate into the existing conditions
    pub fn apply(&mut self, predicate: &Predicate) -> Result<&mut Self, FilterError> {
        for condition in predicate.conditions() {
            self.where_clause(condition)?;
        }
        Ok(self)
    }

    pub fn order(&mut self, column: &str, sort: SortDirection) -> Result<&mut Self, FilterError> {
        Self::validate_column(column)?;
        self.order_data.push(FilterOrderInfo { column: column.to_string(), sort });
        Ok(self)
    }

    pub fn limit(&mut self, limit: i32) -> Result<&mut Self, FilterError> {
        if limit < 0 { return Err(FilterError::InvalidLimit(limit)); }
        self.limit = Some(limit);
        Ok(self)
    }

    /// Query string for `GET /rest/v1/{table}`
    pub fn to_query_params(&self) -> Result<QueryParams, FilterError> {
        let mut params = vec![("select".to_string(), self.build_select_clause())];
        params.extend(FilterWhere::generate(&self.conditions)?);
        if let Some(order) = FilterOrder::generate(&self.order_data) {
            params.push(("order".to_string(), order));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        Ok(params)
    }

    /// Query string for mutations, which only carry the row conditions
    pub fn to_where_params(&self) -> Result<QueryParams, FilterError> {
        FilterWhere::generate(&self.conditions)
    }

    pub fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if !Self::is_identifier(name) {
            return Err(FilterError::InvalidTableName(name.to_string()));
        }
        Ok(())
    }

    fn validate_column(column: &str) -> Result<(), FilterError> {
        if !Self::is_identifier(column) {
            return Err(FilterError::InvalidColumn(column.to_string()));
        }
        Ok(())
    }

    fn validate_select_columns(columns: &[String]) -> Result<(), FilterError> {
        for column in columns {
            if column == "*" { continue; }
            Self::validate_column(column)?;
        }
        Ok(())
    }

    fn is_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() || first == '_' => {
                chars.all(|c| c.is_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }

    fn build_select_clause(&self) -> String {
        if self.select_columns.is_empty() || self.select_columns.iter().any(|c| c == "*") {
            "*".to_string()
        } else {
            self.select_columns.join(",")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_params() {
        let mut filter = Filter::new("premises").unwrap();
        filter.ilike("name", "%clin%").unwrap().order("name", SortDirection::Asc).unwrap();

        let params = filter.to_query_params().unwrap();
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("name".to_string(), "ilike.%clin%".to_string()),
                ("order".to_string(), "name.asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_match_none_uses_nil_uuid() {
        let mut filter = Filter::new("premises").unwrap();
        filter.apply(&Predicate::MatchNone).unwrap();
        let params = filter.to_where_params().unwrap();
        assert_eq!(params, vec![("id".to_string(), "eq.00000000-0000-0000-0000-000000000000".to_string())]);
    }

    #[test]
    fn test_rejects_bad_identifiers() {
        assert!(Filter::new("").is_err());
        assert!(Filter::new("1premises").is_err());
        let mut filter = Filter::new("premises").unwrap();
        assert!(filter.eq("name; drop", "x").is_err());
        assert!(filter.limit(-1).is_err());
    }

    #[test]
    fn test_point_fetch_chain() {
        let mut filter = Filter::new("premises").unwrap();
        filter.eq("id", "p-001").unwrap().limit(1).unwrap();

        assert_eq!(filter.limit_value(), Some(1));
        assert_eq!(
            filter.to_query_params().unwrap(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("id".to_string(), "eq.p-001".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }
}
