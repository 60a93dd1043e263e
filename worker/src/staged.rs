use std::cell::{Cell, RefCell};

use bingo_core::{BingoError, Identifier, RecordStore, Result, UserRecord};

/// Holds the one record a board object owns while a request runs against it.
///
/// Durable Object storage is async, so the record is fetched before the session runs and
/// written back afterwards if the session changed it.
#[derive(Debug)]
pub struct StagedStore {
    identifier: Identifier,
    record: RefCell<Result<Option<UserRecord>>>,
    dirty: Cell<bool>,
}

impl StagedStore {
    /// `loaded` is what came back from storage; an error is replayed on every read.
    pub fn new(identifier: Identifier, loaded: Result<Option<UserRecord>>) -> Self {
        Self {
            identifier,
            record: RefCell::new(loaded),
            dirty: Cell::new(false),
        }
    }

    /// The record to persist, if anything was written.
    pub fn into_dirty(self) -> Option<UserRecord> {
        if !self.dirty.get() {
            return None;
        }
        self.record.into_inner().ok().flatten()
    }
}

impl RecordStore for StagedStore {
    fn get(&self, identifier: &Identifier) -> Result<Option<UserRecord>> {
        if identifier != &self.identifier {
            return Ok(None);
        }
        match &*self.record.borrow() {
            Ok(record) => Ok(record
                .clone()
                .map(|record| record.with_identifier(identifier.clone()))),
            Err(err) => Err(err.clone()),
        }
    }

    fn put(&self, identifier: &Identifier, record: &UserRecord) -> Result<()> {
        if identifier != &self.identifier {
            return Err(BingoError::StoreUnavailable(format!(
                "board object for {} cannot hold {identifier}",
                self.identifier
            )));
        }
        *self.record.borrow_mut() = Ok(Some(record.clone()));
        self.dirty.set(true);
        Ok(())
    }
}
