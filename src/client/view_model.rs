//! Page-level orchestration.
//!
//! [`EntryViewModel`] is the only owner of the entry snapshot and the only
//! component that talks to the store. The snapshot is never patched: after
//! every successful mutation it is replaced by a fresh List. At most one
//! form (create or edit) is open at a time.

use chrono::{NaiveDate, Utc};

use super::form::{EntryForm, FormRequest};
use super::list::{EntryList, ListIntent};
use super::store::{EntryStore, StoreError};
use crate::models::entry::{CreateEntryRequest, Entry, UpdateEntryRequest};

/// Banner text when the snapshot could not be loaded.
pub const LOAD_FAILED: &str = "Failed to load entries";

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this entry?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Creating(EntryForm),
    /// The form holds the entry captured when editing started.
    Editing(EntryForm),
}

pub struct EntryViewModel<S> {
    store: S,
    phase: Phase,
    entries: Vec<Entry>,
    banner: Option<String>,
    mode: Mode,
}

impl<S: EntryStore> EntryViewModel<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            phase: Phase::Loading,
            entries: Vec::new(),
            banner: None,
            mode: Mode::Idle,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn list(&self) -> EntryList<'_> {
        EntryList::new(&self.entries)
    }

    /// Page-level error text, if any.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn form(&self) -> Option<&EntryForm> {
        match &self.mode {
            Mode::Creating(form) | Mode::Editing(form) => Some(form),
            Mode::Idle => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut EntryForm> {
        match &mut self.mode {
            Mode::Creating(form) | Mode::Editing(form) => Some(form),
            Mode::Idle => None,
        }
    }

    pub fn editing(&self) -> Option<&Entry> {
        match &self.mode {
            Mode::Editing(form) => form.entry(),
            _ => None,
        }
    }

    /// The "add entry" affordance is offered only when no form is open.
    pub fn shows_add_entry(&self) -> bool {
        self.phase == Phase::Ready && self.mode == Mode::Idle
    }

    /// Initial List. Always ends in `Ready`, even when the List fails.
    pub async fn load(&mut self) {
        self.phase = Phase::Loading;
        self.refresh().await;
        self.phase = Phase::Ready;
    }

    /// Replace the snapshot with a fresh List. On failure the previous
    /// snapshot stays and the banner is set.
    pub async fn refresh(&mut self) -> bool {
        match self.store.list().await {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "Snapshot refreshed");
                self.entries = entries;
                self.banner = None;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Refreshing entries failed");
                self.banner = Some(LOAD_FAILED.to_string());
                false
            }
        }
    }

    pub fn start_create(&mut self) {
        self.start_create_on(Utc::now().date_naive());
    }

    /// Open the create form with `today` as its default date. An open edit
    /// is discarded; an open create form is kept as is.
    pub fn start_create_on(&mut self, today: NaiveDate) {
        if matches!(self.mode, Mode::Creating(_)) {
            return;
        }
        self.mode = Mode::Creating(EntryForm::create(today).with_cancel());
    }

    /// Open the edit form for `entry`, discarding whatever form was open.
    pub fn start_edit(&mut self, entry: Entry) {
        self.mode = Mode::Editing(EntryForm::edit(entry).with_cancel());
    }

    pub fn cancel(&mut self) {
        self.mode = Mode::Idle;
    }

    /// Create, then refresh and close the form. On failure nothing changes.
    pub async fn submit_create(&mut self, request: CreateEntryRequest) -> Result<(), StoreError> {
        let entry = self.store.create(&request).await?;
        tracing::info!(entry_id = entry.id, date = %entry.date, "Entry created");
        self.refresh().await;
        self.mode = Mode::Idle;
        Ok(())
    }

    /// Update the entry being edited. A no-op when nothing is being edited.
    pub async fn submit_edit(&mut self, request: UpdateEntryRequest) -> Result<(), StoreError> {
        let Some(id) = self.editing().map(|e| e.id) else {
            tracing::debug!("Update submitted with no entry being edited");
            return Ok(());
        };
        self.store.update(id, &request).await?;
        tracing::info!(entry_id = id, "Entry updated");
        self.refresh().await;
        self.mode = Mode::Idle;
        Ok(())
    }

    /// Submit the open form through its busy/error protocol. Returns whether
    /// the entry was saved; on failure the form stays open with its input
    /// and the error text.
    pub async fn submit(&mut self) -> bool {
        let request = match self.form_mut() {
            Some(form) => form.begin_submit(),
            None => None,
        };
        let Some(request) = request else {
            return false;
        };

        let outcome = match request {
            FormRequest::Create(request) => self.submit_create(request).await,
            FormRequest::Update(request) => self.submit_edit(request).await,
        };
        let saved = outcome.is_ok();

        if let Some(form) = self.form_mut() {
            form.finish_submit(outcome);
        }
        saved
    }

    /// Delete after `confirm` agrees. Returns whether a delete was issued
    /// and succeeded. A failed delete sets the banner and leaves both the
    /// snapshot and any open form untouched.
    pub async fn remove<C>(&mut self, id: i64, confirm: C) -> Result<bool, StoreError>
    where
        C: FnOnce(&str) -> bool,
    {
        if !confirm(DELETE_PROMPT) {
            return Ok(false);
        }

        if let Err(e) = self.store.delete(id).await {
            self.banner = Some(e.message().to_string());
            return Err(e);
        }
        tracing::info!(entry_id = id, "Entry deleted");
        self.refresh().await;
        Ok(true)
    }

    /// Route an intent raised by the list.
    pub async fn dispatch<C>(&mut self, intent: ListIntent, confirm: C) -> Result<(), StoreError>
    where
        C: FnOnce(&str) -> bool,
    {
        match intent {
            ListIntent::Edit(entry) => {
                self.start_edit(entry);
                Ok(())
            }
            ListIntent::Delete(id) => self.remove(id, confirm).await.map(|_| ()),
        }
    }
}
