//! Database initialization, table definitions and ad storage
//!
//! Ads live in an embedded redb file. Records are stored as JSON keyed by
//! id, and a second table keeps the insertion order so listings come back
//! in the order ads were created.

use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::error::StoreError;
use crate::model::{AdRecord, AdStatus};
use crate::seeder::{Clock, SystemClock};

/// Main table for storing ad records
///
/// Key: ad id (e.g. "ad-5b0c...")
/// Value: JSON-serialized AdRecord
pub const TABLE_ADS: TableDefinition<&str, &str> = TableDefinition::new("ads_v1");

/// Insertion order index
///
/// Key: monotonically increasing sequence number
/// Value: ad id
///
/// Iterating this table yields ids oldest first.
pub const TABLE_ORDER: TableDefinition<u64, &str> = TableDefinition::new("ads_order_v1");

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe reference to the embedded database
    pub db: Arc<Database>,

    /// Date source for ads seeded server-side
    pub clock: Arc<dyn Clock + Send + Sync>,

    /// When set, API requests must carry this value in `Authorization`
    pub auth_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(db),
            clock: Arc::new(SystemClock),
            auth_token: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Empty tokens are ignored
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.is_empty()).map(Arc::from);
        self
    }
}

/// Initializes the embedded database and creates required tables
///
/// # Example
///
/// ```no_run
/// # use adpulse::database::init_db;
/// let db = init_db("ads.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, StoreError> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_ADS)?;
        write_txn.open_table(TABLE_ORDER)?;
    }
    write_txn.commit()?;

    Ok(db)
}

/// Returns every stored ad, oldest first
pub fn list_ads(db: &Database) -> Result<Vec<AdRecord>, StoreError> {
    let read_txn = db.begin_read()?;
    let order = read_txn.open_table(TABLE_ORDER)?;
    let ads = read_txn.open_table(TABLE_ADS)?;

    let mut records = Vec::new();
    for entry in order.iter()? {
        let (_, id) = entry?;
        if let Some(value) = ads.get(id.value())? {
            records.push(serde_json::from_str::<AdRecord>(value.value())?);
        }
    }

    Ok(records)
}

pub fn get_ad(db: &Database, id: &str) -> Result<Option<AdRecord>, StoreError> {
    let read_txn = db.begin_read()?;
    let ads = read_txn.open_table(TABLE_ADS)?;

    match ads.get(id)? {
        Some(value) => Ok(Some(serde_json::from_str(value.value())?)),
        None => Ok(None),
    }
}

/// Persists a new ad and echoes back the stored record
///
/// Fails with [`StoreError::Conflict`] when the id is already taken.
pub fn insert_ad(db: &Database, record: &AdRecord) -> Result<AdRecord, StoreError> {
    let record_json = serde_json::to_string(record)?;

    let write_txn = db.begin_write()?;
    {
        let mut ads = write_txn.open_table(TABLE_ADS)?;
        if ads.get(record.id.as_str())?.is_some() {
            return Err(StoreError::Conflict(record.id.clone()));
        }
        ads.insert(record.id.as_str(), record_json.as_str())?;

        let mut order = write_txn.open_table(TABLE_ORDER)?;
        let next = order.last()?.map_or(0, |(seq, _)| seq.value() + 1);
        order.insert(next, record.id.as_str())?;
    }
    write_txn.commit()?;

    tracing::debug!(id = %record.id, "ad stored");
    Ok(record.clone())
}

/// Changes an ad's status and returns the updated record
///
/// Returns `Ok(None)` when no ad has the given id.
pub fn set_status(
    db: &Database,
    id: &str,
    status: AdStatus,
) -> Result<Option<AdRecord>, StoreError> {
    update_ad(db, id, |ad| ad.with_status(status))
}

/// Flips an ad between active and paused
pub fn toggle_status(db: &Database, id: &str) -> Result<Option<AdRecord>, StoreError> {
    update_ad(db, id, AdRecord::with_status_toggled)
}

fn update_ad(
    db: &Database,
    id: &str,
    update: impl FnOnce(&AdRecord) -> AdRecord,
) -> Result<Option<AdRecord>, StoreError> {
    let write_txn = db.begin_write()?;
    let updated = {
        let mut ads = write_txn.open_table(TABLE_ADS)?;
        let existing = ads.get(id)?.map(|value| value.value().to_string());

        match existing {
            Some(json) => {
                let current: AdRecord = serde_json::from_str(&json)?;
                let next = update(&current);
                ads.insert(id, serde_json::to_string(&next)?.as_str())?;
                Some(next)
            }
            None => None,
        }
    };

    if updated.is_some() {
        write_txn.commit()?;
        tracing::debug!(id, "ad status updated");
    } else {
        write_txn.abort()?;
    }

    Ok(updated)
}
