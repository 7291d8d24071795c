//! Generic record browser: one listing screen per module configuration,
//! with search, add/edit forms and confirmed deletes.

pub mod view;

use std::sync::Arc;
use std::time::Duration;

use crate::client::DataClient;
use crate::error::ClientError;
use crate::filter::{Filter, FilterError, Predicate, SortDirection};
use crate::modules::ModuleConfig;
use crate::record::Record;
use crate::ui::{check_values, form_data, populate_form, FormError, FormValues, FormView, Prompt, Severity, ToastStack};

pub use view::{render_form, render_table, RowAction, RowView, TableView};

pub const DELETE_CONFIRMATION: &str = "Delete this record?";

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error(transparent)]
    Backend(#[from] ClientError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("Module '{0}' has no columns configured")]
    NoColumns(String),
    #[error("No form is open")]
    NoOpenForm,
    #[error("Record {0} not found")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BrowserState {
    Idle,
    Listing,
    AddEditing { edit_id: Option<String>, form: FormView },
    Deleting { id: String },
}

/// A listing that has been issued but not yet rendered
#[derive(Debug, Clone)]
pub struct ListRequest {
    pub ticket: u64,
    pub filter: Filter,
}

pub struct RecordBrowser {
    client: Arc<dyn DataClient>,
    prompt: Arc<dyn Prompt>,
    config: ModuleConfig,
    scope: Predicate,
    state: BrowserState,
    table: TableView,
    toasts: ToastStack,
    issued: u64,
    rendered: u64,
}

impl RecordBrowser {
    pub fn new(
        client: Arc<dyn DataClient>,
        prompt: Arc<dyn Prompt>,
        config: ModuleConfig,
    ) -> Result<Self, BrowserError> {
        if config.columns.is_empty() {
            return Err(BrowserError::NoColumns(config.table.clone()));
        }
        Ok(Self {
            client,
            prompt,
            table: TableView::for_module(&config),
            config,
            scope: Predicate::Unrestricted,
            state: BrowserState::Idle,
            toasts: ToastStack::default(),
            issued: 0,
            rendered: 0,
        })
    }

    /// Restrict every listing with `scope` in addition to the search
    pub fn with_scope(mut self, scope: Predicate) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_toast_duration(mut self, duration: Duration) -> Self {
        self.toasts = ToastStack::new(duration);
        self
    }

    /// Bind headers and run the first listing
    pub async fn initialize(&mut self) -> Result<(), BrowserError> {
        self.table = TableView::for_module(&self.config);
        self.list("").await?;
        Ok(())
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    pub fn table(&self) -> &TableView {
        &self.table
    }

    pub fn toasts(&self) -> &ToastStack {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastStack {
        &mut self.toasts
    }

    /// Search column[0] for `search` and render the result. Returns whether
    /// this listing was the newest one and therefore rendered.
    pub async fn list(&mut self, search: &str) -> Result<bool, BrowserError> {
        let request = self.begin_list(search)?;
        let result = self.fetch(&request).await;
        Ok(self.complete_list(request.ticket, result))
    }

    /// Issue a listing ticket and build its query
    pub fn begin_list(&mut self, search: &str) -> Result<ListRequest, BrowserError> {
        let search_column = &self.config.columns[0].name;

        let mut filter = Filter::new(&self.config.table)?;
        filter
            .ilike(search_column, format!("%{}%", search.trim()))?
            .apply(&self.scope)?
            .order(search_column, SortDirection::Asc)?;

        self.issued += 1;
        Ok(ListRequest { ticket: self.issued, filter })
    }

    pub async fn fetch(&self, request: &ListRequest) -> Result<Vec<Record>, ClientError> {
        self.client.select(&request.filter).await
    }

    /// Render a finished listing unless a newer one has been issued since.
    /// Read failures render an empty table.
    pub fn complete_list(&mut self, ticket: u64, result: Result<Vec<Record>, ClientError>) -> bool {
        if ticket < self.issued || ticket <= self.rendered {
            tracing::debug!(ticket, latest = self.issued, table = %self.config.table, "discarding stale listing");
            return false;
        }
        self.rendered = ticket;

        match result {
            Ok(rows) => self.table.set_rows(&self.config, &rows),
            Err(e) => {
                tracing::error!(table = %self.config.table, "listing failed: {}", e);
                self.table.clear_rows();
            }
        }

        if matches!(self.state, BrowserState::Idle | BrowserState::Deleting { .. }) {
            self.state = BrowserState::Listing;
        }
        true
    }

    pub fn open_add(&mut self) -> FormView {
        let form = FormView::from_columns("Add Record", &self.config.columns);
        self.state = BrowserState::AddEditing { edit_id: None, form: form.clone() };
        form
    }

    /// Fetch `id` and open a pre-filled form. A failed or empty fetch alerts
    /// and leaves the listing as it was.
    pub async fn open_edit(&mut self, id: &str) -> Result<FormView, BrowserError> {
        let record = match self.client.fetch_by_id(&self.config.table, id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.prompt.alert(&format!("Error: Record {} not found", id));
                return Err(BrowserError::NotFound(id.to_string()));
            }
            Err(e) => {
                self.prompt.alert(&format!("Error: {}", e));
                return Err(e.into());
            }
        };

        let mut form = FormView::from_columns("Edit Record", &self.config.columns);
        populate_form(&mut form, &record);
        self.state = BrowserState::AddEditing { edit_id: Some(id.to_string()), form: form.clone() };
        Ok(form)
    }

    pub fn form(&self) -> Option<&FormView> {
        match &self.state {
            BrowserState::AddEditing { form, .. } => Some(form),
            _ => None,
        }
    }

    /// Dismiss an open form without saving
    pub fn close(&mut self) {
        if matches!(self.state, BrowserState::AddEditing { .. }) {
            self.state = BrowserState::Listing;
        }
    }

    /// Save the open form. On a backend error the form stays open and the
    /// listing is left alone; on success the form closes and the table is
    /// fetched again from scratch.
    pub async fn submit(&mut self, values: &FormValues) -> Result<(), BrowserError> {
        let (edit_id, form) = match &self.state {
            BrowserState::AddEditing { edit_id, form } => (edit_id.clone(), form),
            _ => return Err(BrowserError::NoOpenForm),
        };

        check_values(form, values)?;
        let payload = form_data(form, values);

        let result = match &edit_id {
            Some(id) => self.client.update(&self.config.table, id, &payload).await,
            None => self.client.insert(&self.config.table, &payload).await,
        };

        if let Err(e) = result {
            tracing::error!(table = %self.config.table, "save failed: {}", e);
            self.prompt.alert(&format!("Error: {}", e));
            return Err(e.into());
        }

        self.state = BrowserState::Listing;
        let message = if edit_id.is_some() { "Record updated" } else { "Record added" };
        self.toasts.show(message, Severity::Success);
        self.list("").await?;
        Ok(())
    }

    /// Delete after confirmation. Returns false when the user declined.
    pub async fn delete(&mut self, id: &str) -> Result<bool, BrowserError> {
        self.state = BrowserState::Deleting { id: id.to_string() };

        if !self.prompt.confirm(DELETE_CONFIRMATION) {
            self.state = BrowserState::Listing;
            return Ok(false);
        }

        if let Err(e) = self.client.delete(&self.config.table, id).await {
            tracing::error!(table = %self.config.table, id, "delete failed: {}", e);
            self.prompt.alert(&format!("Error: {}", e));
            self.state = BrowserState::Listing;
            return Err(e.into());
        }

        self.toasts.show("Record deleted", Severity::Success);
        self.list("").await?;
        Ok(true)
    }
}
