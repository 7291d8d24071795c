use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use url::Url;

use super::DataClient;
use crate::auth::{Session, TokenResponse, User};
use crate::config::BackendConfig;
use crate::error::ClientError;
use crate::filter::filter_where::FilterWhere;
use crate::filter::{Filter, FilterWhereInfo, QueryParams};
use crate::record::Record;

/// Client for the hosted backend: row access under `/rest/v1`, auth under
/// `/auth/v1`. Requests carry the project key plus the session token when
/// one is held, so row-level security sees the signed-in user.
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    anon_key: String,
    session: RwLock<Option<Session>>,
}

impl RestClient {
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        // Url::join drops the last segment unless the base ends in '/'
        let mut base = config.url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            anon_key: config.anon_key.clone(),
            session: RwLock::new(None),
        })
    }

    /// Resume a session persisted by an earlier run
    pub fn with_session(self, session: Option<Session>) -> Self {
        Self { session: RwLock::new(session), ..self }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    async fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => self.anon_key.clone(),
        };
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_response(status.as_u16(), &body))
    }

    fn id_params(id: &str) -> Result<QueryParams, ClientError> {
        Ok(FilterWhere::generate(&[FilterWhereInfo::eq("id", id)])?)
    }

    async fn mutate(
        &self,
        method: Method,
        table: &str,
        params: &QueryParams,
        body: Option<Value>,
    ) -> Result<(), ClientError> {
        Filter::validate_table_name(table)?;
        let url = self.endpoint(&format!("rest/v1/{}", table))?;
        tracing::debug!(%method, table, ?params, "backend mutation");

        let mut req = self
            .request(method, url)
            .await
            .query(params)
            .header("Prefer", "return=minimal");
        if let Some(body) = body {
            req = req.json(&body);
        }
        Self::check(req.send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl DataClient for RestClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let url = self.endpoint("auth/v1/token")?;
        tracing::debug!(email, "password sign-in");

        let response = self
            .http
            .post(url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let token: TokenResponse = Self::check(response).await?.json().await?;

        let session = Session::from_token_response(token);
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), ClientError> {
        if self.session.read().await.is_none() {
            return Ok(());
        }
        let url = self.endpoint("auth/v1/logout")?;
        let result = Self::check(self.request(Method::POST, url).await.send().await?).await;

        match result {
            // An expired token is as signed out as it gets
            Ok(_) | Err(ClientError::Unauthorized(_)) => {
                *self.session.write().await = None;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn current_user(&self) -> Result<Option<User>, ClientError> {
        if self.session.read().await.is_none() {
            return Ok(None);
        }
        let url = self.endpoint("auth/v1/user")?;
        match Self::check(self.request(Method::GET, url).await.send().await?).await {
            Ok(response) => Ok(Some(response.json::<User>().await?)),
            Err(ClientError::Unauthorized(_)) | Err(ClientError::Forbidden(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn select(&self, filter: &Filter) -> Result<Vec<Record>, ClientError> {
        let url = self.endpoint(&format!("rest/v1/{}", filter.table()))?;
        let params = filter.to_query_params()?;
        tracing::debug!(table = filter.table(), ?params, "backend select");

        let response = self.request(Method::GET, url).await.query(&params).send().await?;
        let rows: Vec<Value> = Self::check(response).await?.json().await?;

        rows.into_iter()
            .map(|row| Record::from_json(row).map_err(|e| ClientError::Backend {
                status: 200,
                code: None,
                message: e.to_string(),
            }))
            .collect()
    }

    async fn insert(&self, table: &str, payload: &Record) -> Result<(), ClientError> {
        let body = Value::Array(vec![payload.to_json()]);
        self.mutate(Method::POST, table, &Vec::new(), Some(body)).await
    }

    async fn update(&self, table: &str, id: &str, payload: &Record) -> Result<(), ClientError> {
        let params = Self::id_params(id)?;
        self.mutate(Method::PATCH, table, &params, Some(payload.to_json())).await
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), ClientError> {
        let params = Self::id_params(id)?;
        self.mutate(Method::DELETE, table, &params, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterError;

    fn config(url: &str) -> BackendConfig {
        BackendConfig { url: url.to_string(), anon_key: "anon".into(), request_timeout_secs: 5 }
    }

    #[test]
    fn test_endpoint_keeps_project_path() {
        let client = RestClient::new(&config("https://example.test/project")).unwrap();
        assert_eq!(
            client.endpoint("rest/v1/premises").unwrap().as_str(),
            "https://example.test/project/rest/v1/premises"
        );

        let client = RestClient::new(&config("https://example.test/")).unwrap();
        assert_eq!(client.endpoint("auth/v1/user").unwrap().as_str(), "https://example.test/auth/v1/user");
    }

    #[test]
    fn test_rejects_invalid_url() {
        assert!(matches!(RestClient::new(&config("not a url")), Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_id_params() {
        assert_eq!(RestClient::id_params("p-1").unwrap(), vec![("id".to_string(), "eq.p-1".to_string())]);
    }

    #[tokio::test]
    async fn test_no_session_means_no_user_and_no_request() {
        let client = RestClient::new(&config("http://127.0.0.1:9")).unwrap();
        assert!(client.current_user().await.unwrap().is_none());
        assert!(client.sign_out().await.is_ok());
    }

    #[tokio::test]
    async fn test_mutations_reject_path_like_tables() {
        let client = RestClient::new(&config("http://127.0.0.1:9")).unwrap();
        let payload = Record::new();

        let err = client.insert("../auth/v1/logout", &payload).await.unwrap_err();
        assert!(matches!(err, ClientError::Filter(FilterError::InvalidTableName(_))));
        assert!(client.delete("premises/x", "p-1").await.is_err());
    }
}
