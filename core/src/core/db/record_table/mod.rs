use crate::core::db::error::DatabaseError;
use crate::types::RecordId;
use crate::types::record::{StoredRecord, versioned};
use redb::{ReadTransaction, ReadableTable, TableDefinition, WriteTransaction};
use std::marker::PhantomData;

/// Typed view over one record table. Rows are keyed by id, so iteration
/// order is allocation order.
pub struct RecordTable<R> {
    definition: TableDefinition<'static, RecordId, &'static [u8]>,
    _record: PhantomData<R>,
}

impl<R: StoredRecord> RecordTable<R> {
    pub const fn new() -> Self {
        Self {
            definition: TableDefinition::new(R::TABLE_NAME),
            _record: PhantomData,
        }
    }

    pub fn init(&self, txn: &WriteTransaction) -> Result<(), DatabaseError> {
        txn.open_table(self.definition)?;
        Ok(())
    }

    pub fn insert(&self, txn: &WriteTransaction, record: &R) -> Result<(), DatabaseError> {
        let bytes = versioned::encode(record)?;
        let mut table = txn.open_table(self.definition)?;
        table.insert(record.id(), bytes.as_slice())?;
        Ok(())
    }

    /// Returns the removed record, or `None` if the id was absent.
    pub fn remove(&self, txn: &WriteTransaction, id: RecordId) -> Result<Option<R>, DatabaseError> {
        let mut table = txn.open_table(self.definition)?;
        let Some(guard) = table.remove(id)? else {
            return Ok(None);
        };
        Ok(Some(versioned::decode(guard.value())?))
    }

    pub fn newest_first(&self, txn: &ReadTransaction) -> Result<Vec<R>, DatabaseError> {
        let table = txn.open_table(self.definition)?;
        let mut records = Vec::new();

        for entry in table.iter()?.rev() {
            let (_, value_guard) = entry?;
            records.push(versioned::decode(value_guard.value())?);
        }

        Ok(records)
    }
}
