use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::entry::Entry;

/// Where entries are persisted. Both backends order listings by id and
/// assign ids themselves.
#[derive(Clone)]
pub enum EntryRepository {
    Postgres(PgPool),
    Memory(Arc<RwLock<MemoryEntries>>),
}

#[derive(Debug, Default)]
pub struct MemoryEntries {
    rows: BTreeMap<i64, Entry>,
    last_id: i64,
}

impl EntryRepository {
    pub fn memory() -> Self {
        EntryRepository::Memory(Arc::new(RwLock::new(MemoryEntries::default())))
    }

    pub async fn list(&self) -> AppResult<Vec<Entry>> {
        match self {
            EntryRepository::Postgres(db) => {
                let entries = sqlx::query_as::<_, Entry>(
                    "SELECT id, date, score, note FROM entries ORDER BY id ASC",
                )
                .fetch_all(db)
                .await?;
                Ok(entries)
            }
            EntryRepository::Memory(mem) => Ok(mem.read().await.rows.values().cloned().collect()),
        }
    }

    pub async fn find(&self, id: i64) -> AppResult<Option<Entry>> {
        match self {
            EntryRepository::Postgres(db) => {
                let entry = sqlx::query_as::<_, Entry>(
                    "SELECT id, date, score, note FROM entries WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(db)
                .await?;
                Ok(entry)
            }
            EntryRepository::Memory(mem) => Ok(mem.read().await.rows.get(&id).cloned()),
        }
    }

    /// Inserts unless an entry already exists for `date`, in which case
    /// nothing is written and `None` is returned. The check and the write
    /// are a single step on both backends.
    pub async fn insert(
        &self,
        date: NaiveDate,
        score: i32,
        note: Option<String>,
    ) -> AppResult<Option<Entry>> {
        match self {
            EntryRepository::Postgres(db) => {
                let entry = sqlx::query_as::<_, Entry>(
                    r#"
                    INSERT INTO entries (date, score, note)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (date) DO NOTHING
                    RETURNING id, date, score, note
                    "#,
                )
                .bind(date)
                .bind(score)
                .bind(note)
                .fetch_optional(db)
                .await?;
                Ok(entry)
            }
            EntryRepository::Memory(mem) => {
                let mut mem = mem.write().await;
                if mem.rows.values().any(|e| e.date == date) {
                    return Ok(None);
                }
                mem.last_id += 1;
                let entry = Entry {
                    id: mem.last_id,
                    date,
                    score,
                    note,
                };
                mem.rows.insert(entry.id, entry.clone());
                Ok(Some(entry))
            }
        }
    }

    /// Replaces score and note. Returns `None` when no entry has this id.
    pub async fn update(
        &self,
        id: i64,
        score: i32,
        note: Option<String>,
    ) -> AppResult<Option<Entry>> {
        match self {
            EntryRepository::Postgres(db) => {
                let entry = sqlx::query_as::<_, Entry>(
                    r#"
                    UPDATE entries SET score = $2, note = $3
                    WHERE id = $1
                    RETURNING id, date, score, note
                    "#,
                )
                .bind(id)
                .bind(score)
                .bind(note)
                .fetch_optional(db)
                .await?;
                Ok(entry)
            }
            EntryRepository::Memory(mem) => {
                let mut mem = mem.write().await;
                Ok(mem.rows.get_mut(&id).map(|entry| {
                    entry.score = score;
                    entry.note = note;
                    entry.clone()
                }))
            }
        }
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        match self {
            EntryRepository::Postgres(db) => {
                let result = sqlx::query("DELETE FROM entries WHERE id = $1")
                    .bind(id)
                    .execute(db)
                    .await?;
                Ok(result.rows_affected() > 0)
            }
            EntryRepository::Memory(mem) => Ok(mem.write().await.rows.remove(&id).is_some()),
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            EntryRepository::Postgres(_) => "postgres",
            EntryRepository::Memory(_) => "memory",
        }
    }

    pub async fn ping(&self) -> bool {
        match self {
            EntryRepository::Postgres(db) => sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(db)
                .await
                .is_ok(),
            EntryRepository::Memory(_) => true,
        }
    }
}
