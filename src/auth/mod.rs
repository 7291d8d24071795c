pub mod gate;
pub mod store;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use gate::{logout, require_login, AuthGate, LOGIN_PAGE};
pub use store::{SessionError, SessionStore};

/// Claims carried by the backend's access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug)]
pub enum JwtError {
    Malformed(String),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Malformed(msg) => write!(f, "Malformed access token: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

/// Read token claims without verifying the signature. The backend verifies
/// every request; locally the claims only report identity and expiry.
pub fn decode_claims(token: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| JwtError::Malformed(e.to_string()))
}

/// Authenticated identity as reported by the auth service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
}

/// Password grant response from the auth service
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: User,
}

impl Session {
    pub fn from_token_response(response: TokenResponse) -> Self {
        let expires_at = response
            .expires_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .or_else(|| response.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)))
            .or_else(|| {
                decode_claims(&response.access_token)
                    .ok()
                    .and_then(|c| Utc.timestamp_opt(c.exp, 0).single())
            });

        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at,
            user: response.user,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token(exp: i64) -> String {
        let claims = Claims { sub: "user-1".into(), exp, email: Some("a@b.ke".into()), role: Some("authenticated".into()) };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-side-secret")).unwrap()
    }

    #[test]
    fn test_decode_claims_ignores_signature() {
        let claims = decode_claims(&token(1_900_000_000)).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.exp, 1_900_000_000);
    }

    #[test]
    fn test_decode_claims_accepts_audience() {
        let claims = json!({ "sub": "u1", "exp": 1_900_000_000i64, "aud": "authenticated" });
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-side-secret")).unwrap();

        let decoded = decode_claims(&token).unwrap();
        assert_eq!(decoded.sub, "u1");
        assert_eq!(decoded.exp, 1_900_000_000);
    }

    #[test]
    fn test_decode_claims_rejects_garbage() {
        assert!(decode_claims("not-a-jwt").is_err());
    }

    #[test]
    fn test_session_expiry_falls_back_to_claims() {
        let response: TokenResponse = serde_json::from_value(json!({
            "access_token": token(1_000),
            "user": { "id": "user-1" }
        }))
        .unwrap();
        let session = Session::from_token_response(response);
        assert_eq!(session.expires_at.unwrap().timestamp(), 1_000);
        assert!(session.is_expired(Utc::now()));
    }

    #[test]
    fn test_session_prefers_explicit_expiry() {
        let response: TokenResponse = serde_json::from_value(json!({
            "access_token": token(1_000),
            "refresh_token": "r",
            "expires_at": 2_000_000_000i64,
            "user": { "id": "user-1", "email": "a@b.ke" }
        }))
        .unwrap();
        let session = Session::from_token_response(response);
        assert_eq!(session.expires_at.unwrap().timestamp(), 2_000_000_000);
        assert!(!session.is_expired(Utc::now()));
    }
}
