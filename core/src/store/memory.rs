use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::*;

/// Records kept in process memory, for tests and single-process setups.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<Identifier, UserRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, identifier: &Identifier) -> Result<Option<UserRecord>> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records
            .get(identifier)
            .cloned()
            .map(|record| record.with_identifier(identifier.clone())))
    }

    fn put(&self, identifier: &Identifier, record: &UserRecord) -> Result<()> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.insert(identifier.clone(), record.clone());
        Ok(())
    }
}
