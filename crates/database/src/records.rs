use crate::connection::{connect, run_migrations};
use crate::repository::KvRepository;
use crate::DbError;
use core_types::Record;
use std::path::Path;

/// Whether [`RecordStore::upsert`] added a new day or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// The caller's answer to "delete ALL data?". Clearing never happens implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearConfirmation {
    Confirmed,
    Declined,
}

/// The durable, date-keyed collection of daily records.
///
/// The whole collection lives as one JSON array under a single key and is rewritten
/// on every mutation. After any write it is sorted by date with at most one record
/// per date.
#[derive(Debug, Clone)]
pub struct RecordStore {
    repo: KvRepository,
    key: String,
}

impl RecordStore {
    pub fn new(repo: KvRepository, key: impl Into<String>) -> Self {
        Self {
            repo,
            key: key.into(),
        }
    }

    /// Connects to the SQLite file at `path`, applies migrations and returns a store
    /// bound to `key`.
    pub async fn open(path: &Path, key: impl Into<String>) -> Result<Self, DbError> {
        let pool = connect(path).await?;
        run_migrations(&pool).await?;
        Ok(Self::new(KvRepository::new(pool), key))
    }

    /// Returns every record, oldest first.
    ///
    /// A missing, unreadable or malformed payload yields an empty collection; read
    /// failures are logged and never reach the caller. Individual entries that do not
    /// decode are skipped.
    pub async fn load_all(&self) -> Vec<Record> {
        match self.repo.get(&self.key).await {
            Ok(Some(payload)) => decode(&self.key, &payload).unwrap_or_else(|e| {
                tracing::warn!(key = %self.key, error = %e, "Stored payload is malformed; treating as empty.");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Record store unavailable; treating as empty.");
                Vec::new()
            }
        }
    }

    /// Inserts `record`, or replaces the record with the same date entirely.
    ///
    /// Unlike [`load_all`](Self::load_all), a read failure or a payload that is not a
    /// JSON array is an error here, so the stored collection is never replaced by
    /// one built from nothing.
    pub async fn upsert(&self, record: Record) -> Result<UpsertOutcome, DbError> {
        let mut records = match self.repo.get(&self.key).await? {
            Some(payload) => decode(&self.key, &payload).map_err(|source| DbError::Unreadable {
                key: self.key.clone(),
                source,
            })?,
            None => Vec::new(),
        };
        let date = record.date;

        let outcome = match records.iter_mut().find(|existing| existing.date == date) {
            Some(existing) => {
                *existing = record;
                UpsertOutcome::Updated
            }
            None => {
                records.push(record);
                UpsertOutcome::Inserted
            }
        };
        records.sort_by_key(|r| r.date);

        let payload = serde_json::to_string(&records)?;
        self.repo.put(&self.key, &payload).await?;

        tracing::info!(%date, ?outcome, total = records.len(), "Record saved.");
        Ok(outcome)
    }

    /// Deletes every record in one operation. Returns `false` without touching the
    /// store when the caller declined.
    pub async fn clear_all(&self, confirmation: ClearConfirmation) -> Result<bool, DbError> {
        if confirmation == ClearConfirmation::Declined {
            tracing::debug!(key = %self.key, "Clear declined; store left untouched.");
            return Ok(false);
        }
        let removed = self.repo.delete(&self.key).await?;
        tracing::info!(key = %self.key, removed, "All records cleared.");
        Ok(true)
    }
}

/// Parses a stored payload, restoring the ordering and uniqueness invariants in case
/// the payload was written by something other than this store.
///
/// Only a payload that is not a JSON array fails. Entries that are not valid records
/// (a `null` amount, a bad date) are dropped one by one.
fn decode(key: &str, payload: &str) -> Result<Vec<Record>, serde_json::Error> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(payload)?;
    let total = entries.len();
    let mut records: Vec<Record> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    if records.len() < total {
        tracing::warn!(%key, skipped = total - records.len(), "Skipped unreadable stored entries.");
    }
    records.sort_by_key(|r| r.date);

    // Later entries win for duplicated dates.
    let mut unique: Vec<Record> = Vec::with_capacity(records.len());
    for record in records {
        match unique.last_mut() {
            Some(last) if last.date == record.date => *last = record,
            _ => unique.push(record),
        }
    }
    Ok(unique)
}
