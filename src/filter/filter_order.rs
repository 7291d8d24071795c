use super::types::FilterOrderInfo;

pub struct FilterOrder;

impl FilterOrder {
    /// Render as the backend's `order=col.asc,col2.desc` value
    pub fn generate(infos: &[FilterOrderInfo]) -> Option<String> {
        if infos.is_empty() { return None; }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("{}.{}", i.column, i.sort.to_rest()))
            .collect();
        Some(parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::SortDirection;

    #[test]
    fn test_generate_in_sequence() {
        let infos = vec![
            FilterOrderInfo { column: "name".into(), sort: SortDirection::Asc },
            FilterOrderInfo { column: "created_at".into(), sort: SortDirection::Desc },
        ];
        assert_eq!(FilterOrder::generate(&infos).as_deref(), Some("name.asc,created_at.desc"));
    }

    #[test]
    fn test_empty_order_renders_nothing() {
        assert!(FilterOrder::generate(&[]).is_none());
    }
}
