use serde_json::{json, Value};

use super::{Role, UserProfile};
use crate::auth::User;
use crate::client::DataClient;

pub const PROFILES_TABLE: &str = "profiles";

/// Load the signed-in user's profile row. When the row cannot be read the
/// profile is rebuilt from the auth user's metadata; row-level security
/// still limits what that fallback can reach.
pub async fn get_current_user_profile(client: &dyn DataClient) -> Option<UserProfile> {
    let user = match client.current_user().await {
        Ok(Some(user)) => user,
        Ok(None) => return None,
        Err(e) => {
            tracing::error!("unexpected error loading user profile: {}", e);
            return None;
        }
    };

    match client.fetch_by_id(PROFILES_TABLE, &user.id).await {
        Ok(Some(row)) => match serde_json::from_value::<UserProfile>(row.into_json()) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!("unreadable profile row for {}: {}", user.id, e);
                Some(profile_from_user(&user))
            }
        },
        Ok(None) => {
            tracing::warn!("no profile row for {}, using auth metadata", user.id);
            Some(profile_from_user(&user))
        }
        Err(e) => {
            tracing::warn!("error fetching user profile: {}", e);
            Some(profile_from_user(&user))
        }
    }
}

/// Profile synthesized from the auth user: id, email, role (default
/// "user"), with any metadata fields layered on top.
pub fn profile_from_user(user: &User) -> UserProfile {
    let role = user
        .user_metadata
        .get("role")
        .and_then(Value::as_str)
        .unwrap_or("user");

    let mut merged = json!({
        "id": user.id,
        "role": role,
        "email": user.email,
    });
    if let Value::Object(map) = &mut merged {
        for (key, value) in &user.user_metadata {
            map.insert(key.clone(), value.clone());
        }
    }

    serde_json::from_value(merged).unwrap_or_else(|e| {
        tracing::warn!("ignoring malformed user metadata for {}: {}", user.id, e);
        UserProfile { email: user.email.clone(), ..UserProfile::new(user.id.clone(), Role::from(role)) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[test]
    fn test_profile_from_metadata() {
        let mut meta = Map::new();
        meta.insert("role".into(), json!("inspector"));
        meta.insert("ward".into(), json!("Kilimani"));
        let user = User { id: "u1".into(), email: Some("i@ephis.ke".into()), user_metadata: meta };

        let profile = profile_from_user(&user);
        assert_eq!(profile.role, Role::Inspector);
        assert_eq!(profile.ward(), Some("Kilimani"));
        assert_eq!(profile.email.as_deref(), Some("i@ephis.ke"));
    }

    #[test]
    fn test_profile_defaults_to_user_role() {
        let user = User { id: "u2".into(), email: None, user_metadata: Map::new() };
        assert_eq!(profile_from_user(&user).role, Role::User);
    }

    #[test]
    fn test_malformed_metadata_keeps_identity() {
        let mut meta = Map::new();
        meta.insert("role".into(), json!("officer"));
        meta.insert("allowed_wards".into(), json!("not-a-list"));
        let user = User { id: "u3".into(), email: None, user_metadata: meta };

        let profile = profile_from_user(&user);
        assert_eq!(profile.id, "u3");
        assert_eq!(profile.role, Role::Officer);
        assert!(profile.allowed_wards().is_none());
    }
}
