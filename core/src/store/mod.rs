use std::sync::Arc;

use crate::*;
pub use file::*;
pub use memory::*;

mod file;
mod memory;

/// Persistence boundary for user records.
///
/// Writes are last-writer-wins per identifier. Failing to reach the backing store must be
/// reported as [`BingoError::StoreUnavailable`], never as a missing record.
pub trait RecordStore {
    fn get(&self, identifier: &Identifier) -> Result<Option<UserRecord>>;

    fn put(&self, identifier: &Identifier, record: &UserRecord) -> Result<()>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn get(&self, identifier: &Identifier) -> Result<Option<UserRecord>> {
        (**self).get(identifier)
    }

    fn put(&self, identifier: &Identifier, record: &UserRecord) -> Result<()> {
        (**self).put(identifier, record)
    }
}

impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn get(&self, identifier: &Identifier) -> Result<Option<UserRecord>> {
        (**self).get(identifier)
    }

    fn put(&self, identifier: &Identifier, record: &UserRecord) -> Result<()> {
        (**self).put(identifier, record)
    }
}
