//! Premise context banner shown above every premise-dependent form.

use serde::Serialize;

use crate::client::DataClient;
use crate::error::ClientError;
use crate::record::Record;

pub const PREMISES_TABLE: &str = "premises";

const PLACEHOLDER: &str = "—";

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("No premise ID provided. Please return to premises management.")]
    MissingPremiseId,
    #[error("Premise not found.")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] ClientError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Premise {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub premise_type: Option<String>,
    pub category: Option<String>,
    pub ward: Option<String>,
    pub sub_county: Option<String>,
    pub county: Option<String>,
    pub address: Option<String>,
    pub ownership: Option<String>,
    pub registration_status: Option<String>,
}

impl Premise {
    /// Lift the known fields out of a row. Blank strings count as absent.
    pub fn from_record(record: &Record) -> Self {
        let text = |key: &str| record.get_str(key).map(str::to_string);
        Self {
            id: record.id().unwrap_or_default(),
            name: record.display("name"),
            premise_type: text("type"),
            category: text("category"),
            ward: text("ward"),
            sub_county: text("sub_county"),
            county: text("county"),
            address: text("address"),
            ownership: text("ownership"),
            registration_status: text("registration_status"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusClass {
    Compliant,
    NonCompliant,
    Pending,
}

impl StatusClass {
    pub fn classify(status: &str) -> Self {
        match status {
            "Registered" => StatusClass::Compliant,
            "Suspended" | "Closed" => StatusClass::NonCompliant,
            _ => StatusClass::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackLink {
    pub label: &'static str,
    pub module: &'static str,
}

pub const BACK_TO_PREMISES: BackLink = BackLink { label: "Back to Premises", module: PREMISES_TABLE };

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PremiseHeader {
    pub name: String,
    pub type_line: String,
    pub location: String,
    pub address: Option<String>,
    pub ownership: String,
    pub status: String,
    pub status_class: StatusClass,
    pub back_link: BackLink,
}

impl PremiseHeader {
    pub fn from_premise(premise: &Premise) -> Self {
        let mut type_line = premise.premise_type.clone().unwrap_or_else(|| PLACEHOLDER.to_string());
        if let Some(category) = &premise.category {
            type_line.push_str(" | ");
            type_line.push_str(category);
        }

        let parts: Vec<&str> = [&premise.ward, &premise.sub_county, &premise.county]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect();
        let location = if parts.is_empty() { PLACEHOLDER.to_string() } else { parts.join(", ") };

        let status = premise.registration_status.clone().unwrap_or_else(|| "Unknown".to_string());

        Self {
            name: premise.name.clone(),
            type_line,
            location,
            address: premise.address.clone(),
            ownership: premise.ownership.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
            status_class: StatusClass::classify(&status),
            status,
            back_link: BACK_TO_PREMISES,
        }
    }
}

/// Where the banner is drawn
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum HeaderSlot {
    #[default]
    Empty,
    Error(String),
    Summary(PremiseHeader),
}

/// Fetch the premise and fill `slot` with its summary, or with the error
/// that stopped it. An empty id fails without touching the backend.
pub async fn load_premise_context(
    client: &dyn DataClient,
    premise_id: &str,
    slot: &mut HeaderSlot,
) -> Result<Premise, ContextError> {
    let premise_id = premise_id.trim();
    if premise_id.is_empty() {
        let err = ContextError::MissingPremiseId;
        *slot = HeaderSlot::Error(err.to_string());
        return Err(err);
    }

    let premise = match client.fetch_by_id(PREMISES_TABLE, premise_id).await {
        Ok(Some(record)) => Premise::from_record(&record),
        Ok(None) => {
            *slot = HeaderSlot::Error(ContextError::NotFound.to_string());
            return Err(ContextError::NotFound);
        }
        Err(e) => {
            tracing::error!(premise_id, "loading premise context failed: {}", e);
            *slot = HeaderSlot::Error(e.to_string());
            return Err(e.into());
        }
    };

    *slot = HeaderSlot::Summary(PremiseHeader::from_premise(&premise));
    Ok(premise)
}

pub fn render_header(slot: &HeaderSlot) -> String {
    match slot {
        HeaderSlot::Empty => String::new(),
        HeaderSlot::Error(message) => format!("Error: {}\n", message),
        HeaderSlot::Summary(header) => {
            let mut out = format!("{}  [{}]\n", header.name, header.status);
            out.push_str(&format!("  Type:      {}\n", header.type_line));
            out.push_str(&format!("  Location:  {}\n", header.location));
            if let Some(address) = &header.address {
                out.push_str(&format!("  Address:   {}\n", address));
            }
            out.push_str(&format!("  Ownership: {}\n", header.ownership));
            out.push_str(&format!("  <- {} (ephis data list {})\n", header.back_link.label, header.back_link.module));
            out
        }
    }
}
