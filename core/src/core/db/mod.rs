//! Database layer for showcase records.
//!
//! One redb table per record kind (RecordId → version-tagged postcard bytes),
//! plus:
//! - a sequence table handing out per-kind ids in increasing order
//! - a unique index from subscriber email to subscriber id

use crate::core::db::error::DatabaseError;
use crate::core::db::record_table::RecordTable;
use crate::types::record::StoredRecord;
use crate::types::{Client, Config, Contact, Project, RecordId, Subscriber};
use redb::{ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use std::time::SystemTime;

pub mod error {
    use crate::types::record::versioned::CodecError;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum DatabaseError {
        #[error("Database error: {0}")]
        Redb(#[from] redb::DatabaseError),

        #[error("Table error: {0}")]
        TableError(#[from] redb::TableError),

        #[error("Storage error: {0}")]
        StorageError(#[from] redb::StorageError),

        #[error("Transaction error: {0}")]
        TransactionError(#[from] redb::TransactionError),

        #[error("Commit error: {0}")]
        CommitError(#[from] redb::CommitError),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Corrupt record: {0}")]
        Codec(#[from] CodecError),

        #[error("Record not found")]
        NotFound,

        #[error("Email already subscribed")]
        AlreadySubscribed,
    }
}

mod record_table;

/// Sequence table: record table name → last allocated id.
const SEQUENCES: TableDefinition<&str, RecordId> = TableDefinition::new("sequences");

/// Subscriber email → subscriber id.
const SUBSCRIBER_EMAILS: TableDefinition<&str, RecordId> =
    TableDefinition::new("subscriber_emails");

/// Record kinds with no secondary index; generic create/delete is safe for them.
pub trait Unindexed: StoredRecord {}

impl Unindexed for Project {}
impl Unindexed for Client {}
impl Unindexed for Contact {}

/// The main database struct wrapping redb.
pub struct Database {
    db: redb::Database,
}

impl Database {
    /// Creates or opens a database using paths from the config.
    pub fn new(config: &Config) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&config.base_path)?;

        let db = redb::Database::create(config.db_path())?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SEQUENCES)?;
            let _ = write_txn.open_table(SUBSCRIBER_EMAILS)?;
            RecordTable::<Project>::new().init(&write_txn)?;
            RecordTable::<Client>::new().init(&write_txn)?;
            RecordTable::<Contact>::new().init(&write_txn)?;
            RecordTable::<Subscriber>::new().init(&write_txn)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    fn next_id(txn: &WriteTransaction, table_name: &str) -> Result<RecordId, DatabaseError> {
        let mut sequences = txn.open_table(SEQUENCES)?;
        let next = sequences.get(table_name)?.map(|g| g.value()).unwrap_or(0) + 1;
        sequences.insert(table_name, next)?;
        Ok(next)
    }
}

/// Read operations.
impl Database {
    /// Returns every record of one kind, newest first.
    pub fn list<R: StoredRecord>(&self) -> Result<Vec<R>, DatabaseError> {
        let read_txn = self.db.begin_read()?;
        RecordTable::<R>::new().newest_first(&read_txn)
    }
}

/// Create and delete operations.
impl Database {
    /// Allocates an id, builds the record from it and stores it.
    pub fn create<R, F>(&self, build: F) -> Result<R, DatabaseError>
    where
        R: Unindexed,
        F: FnOnce(RecordId) -> R,
    {
        let write_txn = self.db.begin_write()?;
        let id = Self::next_id(&write_txn, R::TABLE_NAME)?;
        let record = build(id);
        RecordTable::<R>::new().insert(&write_txn, &record)?;
        write_txn.commit()?;
        Ok(record)
    }

    /// Returns `Err(NotFound)` if no record has this id.
    pub fn delete<R: Unindexed>(&self, id: RecordId) -> Result<R, DatabaseError> {
        let write_txn = self.db.begin_write()?;
        let removed = RecordTable::<R>::new()
            .remove(&write_txn, id)?
            .ok_or(DatabaseError::NotFound)?;
        write_txn.commit()?;
        Ok(removed)
    }

    /// Returns `Err(AlreadySubscribed)` if the email is already present.
    pub fn create_subscriber(
        &self,
        email: &str,
        now: SystemTime,
    ) -> Result<Subscriber, DatabaseError> {
        let write_txn = self.db.begin_write()?;

        {
            let emails = write_txn.open_table(SUBSCRIBER_EMAILS)?;
            if emails.get(email)?.is_some() {
                return Err(DatabaseError::AlreadySubscribed);
            }
        }

        let subscriber = Subscriber {
            id: Self::next_id(&write_txn, Subscriber::TABLE_NAME)?,
            email: email.to_string(),
            created_at: now,
        };

        {
            let mut emails = write_txn.open_table(SUBSCRIBER_EMAILS)?;
            emails.insert(email, subscriber.id)?;
        }
        RecordTable::<Subscriber>::new().insert(&write_txn, &subscriber)?;

        write_txn.commit()?;
        Ok(subscriber)
    }

    /// Returns `Err(NotFound)` if no subscriber has this id.
    pub fn delete_subscriber(&self, id: RecordId) -> Result<Subscriber, DatabaseError> {
        let write_txn = self.db.begin_write()?;

        let removed = RecordTable::<Subscriber>::new()
            .remove(&write_txn, id)?
            .ok_or(DatabaseError::NotFound)?;
        {
            let mut emails = write_txn.open_table(SUBSCRIBER_EMAILS)?;
            emails.remove(removed.email.as_str())?;
        }

        write_txn.commit()?;
        Ok(removed)
    }
}
