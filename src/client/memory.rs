use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::DataClient;
use crate::auth::{Session, User};
use crate::error::ClientError;
use crate::filter::{Filter, FilterMatch, QueryParams};
use crate::record::Record;

/// A backend call as seen by the in-memory client
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SignIn { email: String },
    SignOut,
    CurrentUser,
    Select { table: String, params: QueryParams },
    Insert { table: String, payload: Record },
    Update { table: String, id: String, payload: Record },
    Delete { table: String, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SignOut,
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Record>>,
    accounts: HashMap<String, (String, User)>,
    session: Option<Session>,
    calls: Vec<Call>,
    failures: Vec<(Operation, String)>,
}

/// In-process backend: same trait, same predicate semantics, every call
/// recorded. Drives the test suites and `--offline` mode.
#[derive(Default)]
pub struct MemoryClient {
    state: Mutex<MemoryState>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn seed(&self, table: &str, rows: Vec<Record>) {
        self.state().tables.entry(table.to_string()).or_default().extend(rows);
    }

    /// Seed rows from JSON objects; non-objects are skipped
    pub fn seed_json(&self, table: &str, rows: Vec<Value>) {
        let rows = rows.into_iter().filter_map(|v| Record::from_json(v).ok()).collect();
        self.seed(table, rows);
    }

    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.state().tables.get(table).cloned().unwrap_or_default()
    }

    pub fn add_account(&self, email: &str, password: &str, user: User) {
        self.state().accounts.insert(email.to_string(), (password.to_string(), user));
    }

    /// Start already signed in as `user`
    pub fn with_session(self, user: User) -> Self {
        self.state().session = Some(Session {
            access_token: format!("memory-{}", Uuid::new_v4().simple()),
            refresh_token: String::new(),
            expires_at: None,
            user,
        });
        self
    }

    /// Make the next call of `op` fail with `message`
    pub fn fail_next(&self, op: Operation, message: &str) {
        self.state().failures.push((op, message.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn count_calls(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state().calls.iter().filter(|c| pred(c)).count()
    }

    fn take_failure(state: &mut MemoryState, op: Operation) -> Result<(), ClientError> {
        if let Some(pos) = state.failures.iter().position(|(o, _)| *o == op) {
            let (_, message) = state.failures.remove(pos);
            return Err(ClientError::Backend { status: 400, code: None, message });
        }
        Ok(())
    }
}

#[async_trait]
impl DataClient for MemoryClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let mut state = self.state();
        state.calls.push(Call::SignIn { email: email.to_string() });

        let user = match state.accounts.get(email) {
            Some((expected, user)) if expected == password => user.clone(),
            _ => return Err(ClientError::BadRequest("Invalid login credentials".to_string())),
        };
        let session = Session {
            access_token: format!("memory-{}", Uuid::new_v4().simple()),
            refresh_token: String::new(),
            expires_at: None,
            user,
        };
        state.session = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), ClientError> {
        let mut state = self.state();
        state.calls.push(Call::SignOut);
        Self::take_failure(&mut state, Operation::SignOut)?;
        state.session = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<User>, ClientError> {
        let mut state = self.state();
        state.calls.push(Call::CurrentUser);
        Ok(state.session.as_ref().map(|s| s.user.clone()))
    }

    async fn select(&self, filter: &Filter) -> Result<Vec<Record>, ClientError> {
        let mut state = self.state();
        state.calls.push(Call::Select { table: filter.table().to_string(), params: filter.to_query_params()? });
        Self::take_failure(&mut state, Operation::Select)?;

        let rows = state.tables.get(filter.table()).map(Vec::as_slice).unwrap_or_default();
        Ok(FilterMatch::execute(filter, rows))
    }

    async fn insert(&self, table: &str, payload: &Record) -> Result<(), ClientError> {
        let mut state = self.state();
        state.calls.push(Call::Insert { table: table.to_string(), payload: payload.clone() });
        Self::take_failure(&mut state, Operation::Insert)?;

        let mut row = payload.clone();
        if row.id().is_none() {
            row.set("id", Uuid::new_v4().to_string());
        }
        state.tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    async fn update(&self, table: &str, id: &str, payload: &Record) -> Result<(), ClientError> {
        let mut state = self.state();
        state.calls.push(Call::Update { table: table.to_string(), id: id.to_string(), payload: payload.clone() });
        Self::take_failure(&mut state, Operation::Update)?;

        // Matches the REST backend: updating zero rows is not an error
        if let Some(rows) = state.tables.get_mut(table) {
            for row in rows.iter_mut().filter(|r| r.id().as_deref() == Some(id)) {
                for (key, value) in payload.fields() {
                    row.set(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), ClientError> {
        let mut state = self.state();
        state.calls.push(Call::Delete { table: table.to_string(), id: id.to_string() });
        Self::take_failure(&mut state, Operation::Delete)?;

        if let Some(rows) = state.tables.get_mut(table) {
            rows.retain(|r| r.id().as_deref() != Some(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    #[tokio::test]
    async fn test_crud_roundtrip_and_call_log() {
        let client = MemoryClient::new();
        client.seed_json("premises", vec![json!({ "id": "p1", "name": "Alpha" })]);

        let mut payload = Record::new();
        payload.set("name", "Beta");
        client.insert("premises", &payload).await.unwrap();
        assert_eq!(client.rows("premises").len(), 2);

        let mut change = Record::new();
        change.set("name", "Alpha Prime");
        client.update("premises", "p1", &change).await.unwrap();
        let fetched = client.fetch_by_id("premises", "p1").await.unwrap().unwrap();
        assert_eq!(fetched.display("name"), "Alpha Prime");

        client.delete("premises", "p1").await.unwrap();
        assert!(client.fetch_by_id("premises", "p1").await.unwrap().is_none());

        assert_eq!(client.count_calls(|c| matches!(c, Call::Delete { .. })), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_is_consumed_once() {
        let client = MemoryClient::new();
        client.fail_next(Operation::Insert, "permission denied for table premises");

        let err = client.insert("premises", &Record::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "permission denied for table premises");
        assert!(client.insert("premises", &Record::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_in_checks_password() {
        let client = MemoryClient::new();
        let user = User { id: "u1".into(), email: Some("a@ephis.ke".into()), user_metadata: Map::new() };
        client.add_account("a@ephis.ke", "secret", user.clone());

        assert!(client.sign_in("a@ephis.ke", "wrong").await.is_err());
        assert!(client.current_user().await.unwrap().is_none());

        client.sign_in("a@ephis.ke", "secret").await.unwrap();
        assert_eq!(client.current_user().await.unwrap(), Some(user));

        client.sign_out().await.unwrap();
        assert!(client.current_user().await.unwrap().is_none());
    }
}
