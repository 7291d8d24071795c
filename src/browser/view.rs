use serde::Serialize;

use crate::modules::ModuleConfig;
use crate::record::Record;
use crate::ui::FormView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    Edit,
    Delete,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Edit => "Edit",
            RowAction::Delete => "Delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub id: Option<String>,
    pub cells: Vec<String>,
    pub actions: Vec<RowAction>,
}

/// Data-only rendering of a module's listing
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableView {
    pub title: String,
    pub subtitle: String,
    pub headers: Vec<String>,
    pub rows: Vec<RowView>,
}

impl TableView {
    /// Title, subtitle and one header per column plus "Actions"
    pub fn for_module(config: &ModuleConfig) -> Self {
        let mut headers: Vec<String> = config.columns.iter().map(|c| c.label.clone()).collect();
        headers.push("Actions".to_string());
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn set_rows(&mut self, config: &ModuleConfig, records: &[Record]) {
        self.rows = records
            .iter()
            .map(|record| RowView {
                id: record.id(),
                cells: config.columns.iter().map(|c| record.display(&c.name)).collect(),
                actions: vec![RowAction::Edit, RowAction::Delete],
            })
            .collect();
    }

    pub fn clear_rows(&mut self) {
        self.rows.clear();
    }
}

/// Plain-text table for terminals
pub fn render_table(view: &TableView) -> String {
    let mut headers: Vec<String> = vec!["ID".to_string()];
    headers.extend(view.headers.iter().take(view.headers.len().saturating_sub(1)).cloned());

    let lines: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| {
            let mut line = vec![row.id.clone().unwrap_or_default()];
            line.extend(row.cells.iter().cloned());
            line
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for line in &lines {
        for (i, cell) in line.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let format_line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&view.title);
    out.push('\n');
    if !view.subtitle.is_empty() {
        out.push_str(&view.subtitle);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&format_line(&headers));
    out.push('\n');
    for line in &lines {
        out.push_str(&format_line(line));
        out.push('\n');
    }
    if lines.is_empty() {
        out.push_str("(no records)\n");
    }
    out
}

pub fn render_form(form: &FormView) -> String {
    let mut out = format!("{}\n", form.title);
    for field in &form.fields {
        let marker = if field.required { "*" } else { "" };
        out.push_str(&format!(
            "  {}{} [{}] ({}) = {}\n",
            field.label,
            marker,
            field.name,
            field.input_type.as_str(),
            field.value
        ));
    }
    out
}
