pub mod memory;
pub mod rest;

use async_trait::async_trait;

use crate::auth::{Session, User};
use crate::error::ClientError;
use crate::filter::Filter;
use crate::record::Record;

pub use memory::{Call, MemoryClient};
pub use rest::RestClient;

/// Everything the admin screens need from the hosted backend. Handles are
/// constructed explicitly and passed down as `Arc<dyn DataClient>`.
#[async_trait]
pub trait DataClient: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError>;

    async fn sign_out(&self) -> Result<(), ClientError>;

    /// `None` when no session is active
    async fn current_user(&self) -> Result<Option<User>, ClientError>;

    async fn select(&self, filter: &Filter) -> Result<Vec<Record>, ClientError>;

    async fn insert(&self, table: &str, payload: &Record) -> Result<(), ClientError>;

    async fn update(&self, table: &str, id: &str, payload: &Record) -> Result<(), ClientError>;

    async fn delete(&self, table: &str, id: &str) -> Result<(), ClientError>;

    /// Point fetch by primary key
    async fn fetch_by_id(&self, table: &str, id: &str) -> Result<Option<Record>, ClientError> {
        let mut filter = Filter::new(table)?;
        filter.eq("id", id)?.limit(1)?;
        Ok(self.select(&filter).await?.into_iter().next())
    }
}
