use std::fmt;
use std::future::Future;

use chrono::NaiveDate;

use crate::models::entry::{is_valid_score, CreateEntryRequest, Entry, UpdateEntryRequest, SCORE_RANGE};

/// Shown when a failed save carries no text of its own.
pub const GENERIC_ERROR: &str = "An error occurred";

/// What a form submission hands to its save function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormRequest {
    Create(CreateEntryRequest),
    Update(UpdateEntryRequest),
}

/// Input state for one entry.
///
/// Built in create mode (date visible, defaults to today) or edit mode
/// (date hidden, score and note prefilled from the entry). Fields hold raw
/// text the way an input control would; the request is only assembled on
/// submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    entry: Option<Entry>,
    date: String,
    score: String,
    note: String,
    busy: bool,
    error: Option<String>,
    cancellable: bool,
}

/// An empty note means no note.
pub fn normalize_note(note: &str) -> Option<String> {
    if note.is_empty() {
        None
    } else {
        Some(note.to_string())
    }
}

impl EntryForm {
    pub fn create(today: NaiveDate) -> Self {
        Self {
            entry: None,
            date: today.format("%Y-%m-%d").to_string(),
            score: String::new(),
            note: String::new(),
            busy: false,
            error: None,
            cancellable: false,
        }
    }

    pub fn edit(entry: Entry) -> Self {
        Self {
            date: entry.date.format("%Y-%m-%d").to_string(),
            score: entry.score.to_string(),
            note: entry.note.clone().unwrap_or_default(),
            entry: Some(entry),
            busy: false,
            error: None,
            cancellable: false,
        }
    }

    /// Offer a cancel control.
    pub fn with_cancel(mut self) -> Self {
        self.cancellable = true;
        self
    }

    pub fn is_edit(&self) -> bool {
        self.entry.is_some()
    }

    /// The entry being edited, if any.
    pub fn entry(&self) -> Option<&Entry> {
        self.entry.as_ref()
    }

    pub fn shows_date(&self) -> bool {
        !self.is_edit()
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn score(&self) -> &str {
        &self.score
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = date.into();
    }

    pub fn set_score(&mut self, score: impl Into<String>) {
        self.score = score.into();
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    /// Range hint for the score input. Out-of-range values still submit.
    pub fn score_in_range(&self) -> bool {
        self.score
            .trim()
            .parse::<i32>()
            .map(is_valid_score)
            .unwrap_or(false)
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_cancel(&self) -> bool {
        self.cancellable
    }

    pub fn submit_label(&self) -> &'static str {
        if self.busy {
            "Saving..."
        } else if self.is_edit() {
            "Update"
        } else {
            "Create"
        }
    }

    /// Assemble the request from the current fields. Only presence and
    /// shape are checked here.
    pub fn build_request(&self) -> Result<FormRequest, String> {
        let score = self.score.trim();
        if score.is_empty() {
            return Err("Score is required".into());
        }
        let score = score
            .parse::<i32>()
            .map_err(|_| "Score must be a number".to_string())?;
        let note = normalize_note(&self.note);

        if self.is_edit() {
            return Ok(FormRequest::Update(UpdateEntryRequest { score, note }));
        }

        let date = self.date.trim();
        if date.is_empty() {
            return Err("Date is required".into());
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| "Date must be in YYYY-MM-DD format".to_string())?;

        Ok(FormRequest::Create(CreateEntryRequest { date, score, note }))
    }

    /// Enter the busy state and return the request to save. `None` while a
    /// save is already in flight, or when a required field is missing (the
    /// reason is left in [`error`](Self::error)).
    pub fn begin_submit(&mut self) -> Option<FormRequest> {
        if self.busy {
            return None;
        }
        match self.build_request() {
            Ok(request) => {
                self.busy = true;
                self.error = None;
                Some(request)
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    /// Leave the busy state. Field values are kept either way.
    pub fn finish_submit<E: fmt::Display>(&mut self, outcome: Result<(), E>) {
        self.busy = false;
        if let Err(e) = outcome {
            let message = e.to_string();
            self.error = Some(if message.is_empty() {
                GENERIC_ERROR.to_string()
            } else {
                message
            });
        }
    }

    /// Run the whole submission against a caller-supplied save function.
    /// Returns whether the save succeeded.
    pub async fn submit<F, Fut, E>(&mut self, save: F) -> bool
    where
        F: FnOnce(FormRequest) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        let Some(request) = self.begin_submit() else {
            return false;
        };
        let outcome = save(request).await;
        let saved = outcome.is_ok();
        self.finish_submit(outcome);
        saved
    }
}

impl fmt::Display for EntryForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shows_date() {
            writeln!(f, "Date *: {}", self.date)?;
        }
        write!(f, "Score ({}-{}) *: {}", SCORE_RANGE.start(), SCORE_RANGE.end(), self.score)?;
        if !self.score.trim().is_empty() && !self.score_in_range() {
            write!(f, "  (expected {}-{})", SCORE_RANGE.start(), SCORE_RANGE.end())?;
        }
        writeln!(f)?;
        writeln!(f, "Note: {}", self.note)?;
        if let Some(error) = &self.error {
            writeln!(f, "{}", error)?;
        }
        write!(f, "[{}]", self.submit_label())?;
        if self.cancellable {
            write!(f, " [Cancel]")?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::store::StoreError;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn entry() -> Entry {
        Entry {
            id: 1,
            date: today(),
            score: 4,
            note: Some("Great day".into()),
        }
    }

    #[test]
    fn test_create_mode_shows_date_defaulting_to_today() {
        let form = EntryForm::create(today());
        assert!(form.shows_date());
        assert_eq!(form.date(), "2024-01-15");
        assert_eq!(form.score(), "");
        assert_eq!(form.submit_label(), "Create");
    }

    #[test]
    fn test_edit_mode_hides_date_and_prefills() {
        let form = EntryForm::edit(entry());
        assert!(!form.shows_date());
        assert_eq!(form.score(), "4");
        assert_eq!(form.note(), "Great day");
        assert_eq!(form.submit_label(), "Update");
        assert!(!form.to_string().contains("Date"));
    }

    #[test]
    fn test_edit_round_trip_matches_original_fields() {
        let original = entry();
        let form = EntryForm::edit(original.clone());
        assert_eq!(
            form.build_request().unwrap(),
            FormRequest::Update(UpdateEntryRequest::from(&original))
        );

        let no_note = Entry { note: None, ..original };
        let form = EntryForm::edit(no_note.clone());
        assert_eq!(
            form.build_request().unwrap(),
            FormRequest::Update(UpdateEntryRequest {
                score: no_note.score,
                note: None
            })
        );
    }

    #[test]
    fn test_empty_note_is_no_note() {
        let mut form = EntryForm::create(today());
        form.set_score("3");
        form.set_note("");
        let empty = form.build_request().unwrap();

        let untouched = {
            let mut form = EntryForm::create(today());
            form.set_score("3");
            form.build_request().unwrap()
        };

        assert_eq!(empty, untouched);
        match empty {
            FormRequest::Create(req) => assert_eq!(req.note, None),
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_missing_score_blocks_submit() {
        let mut form = EntryForm::create(today());
        assert_eq!(form.begin_submit(), None);
        assert_eq!(form.error(), Some("Score is required"));
        assert!(!form.is_busy());
    }

    #[test]
    fn test_missing_date_blocks_submit_in_create_mode() {
        let mut form = EntryForm::create(today());
        form.set_score("3");
        form.set_date("");
        assert_eq!(form.begin_submit(), None);
        assert_eq!(form.error(), Some("Date is required"));
    }

    #[test]
    fn test_out_of_range_score_still_submits() {
        let mut form = EntryForm::create(today());
        form.set_score("9");
        assert!(!form.score_in_range());
        match form.begin_submit() {
            Some(FormRequest::Create(req)) => assert_eq!(req.score, 9),
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_busy_state_relabels_and_blocks_second_submit() {
        let mut form = EntryForm::create(today());
        form.set_score("4");
        assert!(form.begin_submit().is_some());
        assert!(form.is_busy());
        assert_eq!(form.submit_label(), "Saving...");
        assert_eq!(form.begin_submit(), None);

        form.finish_submit(Ok::<(), StoreError>(()));
        assert!(!form.is_busy());
        assert_eq!(form.submit_label(), "Create");
    }

    #[tokio::test]
    async fn test_submit_passes_request_to_save() {
        let mut form = EntryForm::create(today());
        form.set_score("5");
        form.set_note("Test note");

        let mut seen = None;
        let saved = form
            .submit(|request| {
                seen = Some(request);
                async { Ok::<(), StoreError>(()) }
            })
            .await;

        assert!(saved);
        assert_eq!(
            seen,
            Some(FormRequest::Create(CreateEntryRequest {
                date: today(),
                score: 5,
                note: Some("Test note".into()),
            }))
        );
        assert_eq!(form.error(), None);
    }

    #[tokio::test]
    async fn test_submit_failure_shows_message_and_keeps_input() {
        let mut form = EntryForm::create(today());
        form.set_score("3");
        form.set_note("Keep me");

        let saved = form
            .submit(|_| async { Err(StoreError::Validation("Date already exists".into())) })
            .await;

        assert!(!saved);
        assert!(!form.is_busy());
        assert_eq!(form.error(), Some("Date already exists"));
        assert_eq!(form.score(), "3");
        assert_eq!(form.note(), "Keep me");
        assert_eq!(form.date(), "2024-01-15");
    }

    #[tokio::test]
    async fn test_submit_failure_without_text_uses_generic_message() {
        let mut form = EntryForm::edit(entry());
        let saved = form.submit(|_| async { Err(String::new()) }).await;
        assert!(!saved);
        assert_eq!(form.error(), Some(GENERIC_ERROR));
    }

    #[test]
    fn test_render_create_form() {
        let mut form = EntryForm::create(today()).with_cancel();
        form.set_score("7");
        let text = form.to_string();
        assert!(text.contains("Date *: 2024-01-15"));
        assert!(text.contains("Score (1-5) *: 7  (expected 1-5)"));
        assert!(text.contains("[Create] [Cancel]"));
    }
}
