use serde_json::{json, Map, Value};

use crate::access::profile::PROFILES_TABLE;
use crate::auth::User;
use crate::client::MemoryClient;

pub const DEMO_EMAIL: &str = "admin@ephis.local";
pub const DEMO_PASSWORD: &str = "admin";

fn demo_user() -> User {
    let mut metadata = Map::new();
    metadata.insert("role".to_string(), Value::String("admin".to_string()));
    User {
        id: "0b6f6c1e-3f6e-4c55-9a52-6f1a2b0c7d01".to_string(),
        email: Some(DEMO_EMAIL.to_string()),
        user_metadata: metadata,
    }
}

/// In-memory backend for `--offline`, already signed in as the demo admin.
/// Nothing written here outlives the process.
pub fn offline_client() -> MemoryClient {
    let user = demo_user();
    let client = MemoryClient::new();
    client.add_account(DEMO_EMAIL, DEMO_PASSWORD, user.clone());

    client.seed_json(
        PROFILES_TABLE,
        vec![json!({
            "id": user.id,
            "email": DEMO_EMAIL,
            "role": "admin",
            "county": "Nairobi",
        })],
    );

    client.seed_json(
        "premises",
        vec![
            json!({
                "id": "p-001", "name": "Westlands Medical Clinic", "type": "Health Facility",
                "category": "Clinic", "ward": "Parklands", "sub_county": "Westlands",
                "county": "Nairobi", "address": "Ring Road Parklands", "ownership": "Private",
                "registration_status": "Registered"
            }),
            json!({
                "id": "p-002", "name": "Kilimani Bakery", "type": "Food Premise",
                "category": "Bakery", "ward": "Kilimani", "sub_county": "Dagoretti North",
                "county": "Nairobi", "ownership": "Private", "registration_status": "Pending"
            }),
            json!({
                "id": "p-003", "name": "Gikomba Butchery", "type": "Food Premise",
                "ward": "Kamukunji", "county": "Nairobi", "registration_status": "Suspended"
            }),
        ],
    );

    client.seed_json(
        "complaints",
        vec![
            json!({
                "id": "c-001", "subject": "Blocked drainage", "complainant": "J. Wanjiru",
                "phone": "+254700000001", "ward": "Kilimani", "date_received": "2026-09-02",
                "status": "Open"
            }),
            json!({
                "id": "c-002", "subject": "Uncollected refuse", "complainant": "P. Otieno",
                "ward": "Parklands", "date_received": "2026-09-14", "status": "Resolved"
            }),
        ],
    );

    client.seed_json(
        "inspections",
        vec![
            json!({
                "id": "i-001", "premise_id": "p-001", "premise_name": "Westlands Medical Clinic",
                "inspector": "A. Kamau", "inspection_date": "2026-08-21", "score": 88,
                "outcome": "Compliant"
            }),
            json!({
                "id": "i-002", "premise_id": "p-003", "premise_name": "Gikomba Butchery",
                "inspector": "M. Njeri", "inspection_date": "2026-09-03", "score": 41,
                "outcome": "Closure notice"
            }),
        ],
    );

    client.with_session(user)
}
