//! Location-based visibility for admin screens.
//!
//! A signed-in user's profile carries a role and, optionally, the
//! jurisdiction they work in. [`apply_location_filters`] turns that into a
//! [`Predicate`] for listings. These are advisory hints only: the backend's
//! row-level security remains the authority on what a user may read.

pub mod profile;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::filter::{FilterWhereInfo, Predicate};

pub use profile::get_current_user_profile;

/// Open role enumeration; unknown roles are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Supervisor,
    Director,
    Officer,
    Inspector,
    User,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Director => "director",
            Role::Officer => "officer",
            Role::Inspector => "inspector",
            Role::User => "user",
            Role::Other(s) => s,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "admin" => Role::Admin,
            "supervisor" => Role::Supervisor,
            "director" => Role::Director,
            "officer" => Role::Officer,
            "inspector" => Role::Inspector,
            "user" => Role::User,
            other => Role::Other(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::from(s.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub ward: Option<String>,
    #[serde(default)]
    pub sub_county: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub allowed_wards: Option<Vec<String>>,
    #[serde(default)]
    pub allowed_subcounties: Option<Vec<String>>,
    /// Remaining profile columns, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self { id: id.into(), role, ..Self::default() }
    }

    pub fn ward(&self) -> Option<&str> {
        set(&self.ward)
    }

    pub fn sub_county(&self) -> Option<&str> {
        set(&self.sub_county)
    }

    pub fn county(&self) -> Option<&str> {
        set(&self.county)
    }

    pub fn allowed_wards(&self) -> Option<&[String]> {
        non_empty(&self.allowed_wards)
    }

    pub fn allowed_subcounties(&self) -> Option<&[String]> {
        non_empty(&self.allowed_subcounties)
    }
}

fn set(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn non_empty(list: &Option<Vec<String>>) -> Option<&[String]> {
    list.as_deref().filter(|l| !l.is_empty())
}

/// What a profile sees when no jurisdiction rule applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackScope {
    Unrestricted,
    Deny,
}

impl FallbackScope {
    pub fn to_predicate(self) -> Predicate {
        match self {
            FallbackScope::Unrestricted => Predicate::Unrestricted,
            FallbackScope::Deny => Predicate::MatchNone,
        }
    }
}

impl FromStr for FallbackScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" | "unrestricted" => Ok(FallbackScope::Unrestricted),
            "deny" | "none" => Ok(FallbackScope::Deny),
            other => Err(format!("unknown fallback scope: {}", other)),
        }
    }
}

/// Named policy for the cases the jurisdiction fields do not decide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Roles that always see every row
    pub unrestricted_roles: Vec<Role>,
    /// Roles expected to carry a jurisdiction
    pub field_roles: Vec<Role>,
    /// No profile could be loaded
    pub missing_profile: FallbackScope,
    /// A field role with no jurisdiction assigned
    pub unassigned_field_role: FallbackScope,
    /// Any other role with no jurisdiction assigned
    pub unassigned_other_role: FallbackScope,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            unrestricted_roles: vec![Role::Admin, Role::Supervisor, Role::Director],
            field_roles: vec![Role::Officer, Role::Inspector],
            missing_profile: FallbackScope::Unrestricted,
            unassigned_field_role: FallbackScope::Deny,
            unassigned_other_role: FallbackScope::Unrestricted,
        }
    }
}

/// Predicate restricting listings to the profile's jurisdiction.
///
/// Single-value fields win in the order ward, sub-county, county and match
/// case-insensitively; otherwise the allowed lists are tried (wards first).
/// Profiles with neither fall back to the policy.
pub fn apply_location_filters(profile: Option<&UserProfile>, policy: &AccessPolicy) -> Predicate {
    let Some(profile) = profile else {
        return policy.missing_profile.to_predicate();
    };

    if policy.unrestricted_roles.contains(&profile.role) {
        return Predicate::Unrestricted;
    }

    if let Some(ward) = profile.ward() {
        return Predicate::Where(FilterWhereInfo::ilike("ward", ward));
    }
    if let Some(sub_county) = profile.sub_county() {
        return Predicate::Where(FilterWhereInfo::ilike("sub_county", sub_county));
    }
    if let Some(county) = profile.county() {
        return Predicate::Where(FilterWhereInfo::ilike("county", county));
    }

    if let Some(wards) = profile.allowed_wards() {
        return Predicate::Where(FilterWhereInfo::in_list("ward", wards));
    }
    if let Some(sub_counties) = profile.allowed_subcounties() {
        return Predicate::Where(FilterWhereInfo::in_list("sub_county", sub_counties));
    }

    if policy.field_roles.contains(&profile.role) {
        if policy.unassigned_field_role == FallbackScope::Deny {
            tracing::warn!(user = %profile.id, role = %profile.role, "no location assigned, restricting view");
        }
        return policy.unassigned_field_role.to_predicate();
    }

    policy.unassigned_other_role.to_predicate()
}

/// Short label for the scope a profile is viewing, e.g. "Kilimani Ward".
pub fn describe_location_filter(profile: Option<&UserProfile>) -> String {
    let Some(profile) = profile else {
        return "Guest".to_string();
    };

    match profile.role {
        Role::Admin => return "All Locations (Admin)".to_string(),
        Role::Supervisor => return "All Locations (Supervisor)".to_string(),
        _ => {}
    }

    if let Some(ward) = profile.ward() {
        return format!("{} Ward", ward);
    }
    if let Some(sub_county) = profile.sub_county() {
        return format!("{} Sub-County", sub_county);
    }
    if let Some(county) = profile.county() {
        return format!("{} County", county);
    }
    if let Some(wards) = profile.allowed_wards() {
        return format!("{} Ward(s) Access", wards.len());
    }
    if let Some(sub_counties) = profile.allowed_subcounties() {
        return format!("{} Sub-County(s) Access", sub_counties.len());
    }

    "All Locations".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: Value) -> UserProfile {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_role_roundtrips_unknown_values() {
        let p = profile(json!({ "id": "1", "role": "chief_officer" }));
        assert_eq!(p.role, Role::Other("chief_officer".into()));
        assert_eq!(serde_json::to_value(&p.role).unwrap(), json!("chief_officer"));
    }

    #[test]
    fn test_null_lists_and_missing_role() {
        let p = profile(json!({ "id": "1", "allowed_wards": null }));
        assert_eq!(p.role, Role::User);
        assert!(p.allowed_wards().is_none());
        assert!(p.extra.is_empty());
    }

    #[test]
    fn test_empty_strings_count_as_unset() {
        let p = profile(json!({ "id": "1", "role": "officer", "ward": "", "county": "Kiambu" }));
        assert_eq!(
            apply_location_filters(Some(&p), &AccessPolicy::default()),
            Predicate::Where(FilterWhereInfo::ilike("county", "Kiambu"))
        );
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe_location_filter(None), "Guest");
        let admin = UserProfile { ward: Some("Kilimani".into()), ..UserProfile::new("1", Role::Admin) };
        assert_eq!(describe_location_filter(Some(&admin)), "All Locations (Admin)");

        let officer = UserProfile { sub_county: Some("Westlands".into()), ..UserProfile::new("2", Role::Officer) };
        assert_eq!(describe_location_filter(Some(&officer)), "Westlands Sub-County");

        let multi = UserProfile {
            allowed_wards: Some(vec!["A".into(), "B".into()]),
            ..UserProfile::new("3", Role::Inspector)
        };
        assert_eq!(describe_location_filter(Some(&multi)), "2 Ward(s) Access");

        let director = UserProfile::new("4", Role::Director);
        assert_eq!(describe_location_filter(Some(&director)), "All Locations");
    }

    #[test]
    fn test_fallback_scope_parse() {
        assert_eq!("deny".parse::<FallbackScope>().unwrap(), FallbackScope::Deny);
        assert_eq!(" Allow ".parse::<FallbackScope>().unwrap(), FallbackScope::Unrestricted);
        assert!("maybe".parse::<FallbackScope>().is_err());
    }
}
