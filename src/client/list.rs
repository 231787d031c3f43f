use std::fmt;

use crate::models::entry::{Entry, SCORE_RANGE};

pub const EMPTY_MESSAGE: &str = "No entries yet. Create your first entry!";

/// User intent raised from a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListIntent {
    Edit(Entry),
    Delete(i64),
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow<'a> {
    pub id: i64,
    pub date: String,
    pub score: String,
    pub note: Option<&'a str>,
}

/// Read-only view over the snapshot, in the order the store returned it.
#[derive(Debug, Clone, Copy)]
pub struct EntryList<'a> {
    entries: &'a [Entry],
}

impl<'a> EntryList<'a> {
    pub fn new(entries: &'a [Entry]) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rows(&self) -> Vec<EntryRow<'a>> {
        self.entries
            .iter()
            .map(|entry| EntryRow {
                id: entry.id,
                date: entry.date.format("%Y-%m-%d").to_string(),
                score: format!("Score: {}/{}", entry.score, SCORE_RANGE.end()),
                note: entry.note.as_deref().filter(|n| !n.is_empty()),
            })
            .collect()
    }

    /// Edit control of the row at `index`.
    pub fn edit(&self, index: usize) -> Option<ListIntent> {
        self.entries.get(index).cloned().map(ListIntent::Edit)
    }

    /// Delete control of the row at `index`.
    pub fn delete(&self, index: usize) -> Option<ListIntent> {
        self.entries.get(index).map(|e| ListIntent::Delete(e.id))
    }
}

impl fmt::Display for EntryList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "{}", EMPTY_MESSAGE);
        }
        for row in self.rows() {
            writeln!(f, "#{} {}  [Edit] [Delete]", row.id, row.date)?;
            writeln!(f, "\t{}", row.score)?;
            if let Some(note) = row.note {
                writeln!(f, "\t{}", note)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn sample() -> Vec<Entry> {
        vec![
            Entry {
                id: 1,
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                score: 4,
                note: Some("Test".into()),
            },
            Entry {
                id: 2,
                date: NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
                score: 2,
                note: None,
            },
        ]
    }

    #[test]
    fn test_empty_state() {
        let list = EntryList::new(&[]);
        assert!(list.is_empty());
        assert_eq!(list.to_string().trim(), EMPTY_MESSAGE);
    }

    #[test]
    fn test_row_shows_date_score_and_note() {
        let entries = sample();
        let list = EntryList::new(&entries);
        let rows = list.rows();
        assert_eq!(rows[0].date, "2024-01-15");
        assert_eq!(rows[0].score, "Score: 4/5");
        assert_eq!(rows[0].note, Some("Test"));
        assert_eq!(rows[1].note, None);

        let text = list.to_string();
        assert!(text.contains("2024-01-15"));
        assert!(text.contains("Score: 4/5"));
        assert!(text.contains("Test"));
    }

    #[test]
    fn test_keeps_store_order() {
        let mut entries = sample();
        entries.reverse();
        let ids: Vec<i64> = EntryList::new(&entries).rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_intents_carry_entry_or_id() {
        let entries = sample();
        let list = EntryList::new(&entries);
        assert_eq!(list.edit(0), Some(ListIntent::Edit(entries[0].clone())));
        assert_eq!(list.delete(1), Some(ListIntent::Delete(2)));
        assert_eq!(list.edit(5), None);
    }
}
