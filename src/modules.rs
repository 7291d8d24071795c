use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// HTML input type of a form field. Unknown types fall back to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Text,
    Number,
    Date,
    Email,
    Tel,
    #[serde(other)]
    Other,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text | InputType::Other => "text",
            InputType::Number => "number",
            InputType::Date => "date",
            InputType::Email => "email",
            InputType::Tel => "tel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub input_type: InputType,
}

impl ColumnSpec {
    pub fn new(name: &str, label: &str, input_type: InputType) -> Self {
        Self { name: name.to_string(), label: label.to_string(), input_type }
    }
}

/// What a record browser screen is bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub table: String,
    pub columns: Vec<ColumnSpec>,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Restrict listings to the signed-in user's jurisdiction
    #[serde(default)]
    pub scoped: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("Unknown module: {0}")]
    UnknownModule(String),
    #[error("Module '{0}' has no columns")]
    NoColumns(String),
    #[error("Failed to read module definitions: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid module definitions: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, ModuleConfig>,
}

impl ModuleRegistry {
    /// Registry holding the premises, complaints and inspections screens
    pub fn builtin() -> Self {
        use InputType::*;

        let mut modules = BTreeMap::new();
        modules.insert(
            "premises".to_string(),
            ModuleConfig {
                table: "premises".to_string(),
                columns: vec![
                    ColumnSpec::new("name", "Premise Name", Text),
                    ColumnSpec::new("type", "Type", Text),
                    ColumnSpec::new("category", "Category", Text),
                    ColumnSpec::new("ward", "Ward", Text),
                    ColumnSpec::new("sub_county", "Sub-County", Text),
                    ColumnSpec::new("county", "County", Text),
                    ColumnSpec::new("ownership", "Ownership", Text),
                    ColumnSpec::new("registration_status", "Registration Status", Text),
                ],
                title: "Premises Management".to_string(),
                subtitle: "Registered food, health and trade premises".to_string(),
                scoped: true,
            },
        );
        modules.insert(
            "complaints".to_string(),
            ModuleConfig {
                table: "complaints".to_string(),
                columns: vec![
                    ColumnSpec::new("subject", "Subject", Text),
                    ColumnSpec::new("complainant", "Complainant", Text),
                    ColumnSpec::new("phone", "Phone", Tel),
                    ColumnSpec::new("ward", "Ward", Text),
                    ColumnSpec::new("date_received", "Date Received", Date),
                    ColumnSpec::new("status", "Status", Text),
                ],
                title: "Complaints".to_string(),
                subtitle: "Public health complaints and follow-up".to_string(),
                scoped: true,
            },
        );
        modules.insert(
            "inspections".to_string(),
            ModuleConfig {
                table: "inspections".to_string(),
                columns: vec![
                    ColumnSpec::new("premise_name", "Premise", Text),
                    ColumnSpec::new("inspector", "Inspector", Text),
                    ColumnSpec::new("inspection_date", "Inspection Date", Date),
                    ColumnSpec::new("score", "Score", Number),
                    ColumnSpec::new("outcome", "Outcome", Text),
                ],
                title: "Inspections".to_string(),
                subtitle: "Routine and follow-up inspection records".to_string(),
                scoped: false,
            },
        );
        Self { modules }
    }

    /// Built-in modules overlaid with any definitions found in `path`
    pub fn load(path: &Path) -> Result<Self, ModuleError> {
        let mut registry = Self::builtin();
        if path.exists() {
            let content = fs::read_to_string(path)?;
            registry.merge_yaml(&content)?;
        }
        Ok(registry)
    }

    pub fn merge_yaml(&mut self, content: &str) -> Result<(), ModuleError> {
        let extra: BTreeMap<String, ModuleConfig> = serde_yaml::from_str(content)?;
        for (name, config) in extra {
            if config.columns.is_empty() {
                return Err(ModuleError::NoColumns(name));
            }
            tracing::debug!(module = %name, table = %config.table, "loaded module definition");
            self.modules.insert(name, config);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&ModuleConfig, ModuleError> {
        self.modules.get(name).ok_or_else(|| ModuleError::UnknownModule(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleConfig)> {
        self.modules.iter().map(|(k, v)| (k.as_str(), v))
    }
}
