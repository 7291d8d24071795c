#![allow(dead_code)]

pub mod stub;

use std::sync::Arc;

use ephis_admin::auth::User;
use ephis_admin::client::MemoryClient;
use ephis_admin::modules::{ColumnSpec, InputType, ModuleConfig};
use serde_json::{json, Value};

pub fn user(id: &str, metadata: Value) -> User {
    User {
        id: id.to_string(),
        email: Some(format!("{}@ephis.test", id)),
        user_metadata: metadata.as_object().cloned().unwrap_or_default(),
    }
}

pub fn premises() -> Vec<Value> {
    vec![
        json!({ "id": "p1", "name": "Westlands Clinic", "ward": "Parklands", "sub_county": "Westlands", "county": "Nairobi" }),
        json!({ "id": "p2", "name": "Kilimani Clinic", "ward": "Kilimani", "sub_county": "Dagoretti North", "county": "Nairobi" }),
        json!({ "id": "p3", "name": "Alpha Bakery", "ward": "KILIMANI", "sub_county": "Dagoretti North", "county": "Nairobi" }),
        json!({ "id": "p4", "name": "CLINICAL Labs", "ward": "Karen", "sub_county": "Langata", "county": "Nairobi" }),
        json!({ "id": "p5", "name": "Thika Butchery", "ward": "Township", "sub_county": "Thika Town", "county": "Kiambu" }),
    ]
}

pub fn premises_module() -> ModuleConfig {
    ModuleConfig {
        table: "premises".to_string(),
        columns: vec![
            ColumnSpec::new("name", "Premise Name", InputType::Text),
            ColumnSpec::new("ward", "Ward", InputType::Text),
        ],
        title: "Premises Management".to_string(),
        subtitle: String::new(),
        scoped: true,
    }
}

/// Seeded backend; signed in as `signed_in` when given
pub fn backend(signed_in: Option<User>) -> Arc<MemoryClient> {
    let client = MemoryClient::new();
    client.seed_json("premises", premises());
    let client = match signed_in {
        Some(user) => client.with_session(user),
        None => client,
    };
    Arc::new(client)
}
