use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::*;

/// On-disk layout, `{ "users": { "<identifier>": record } }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Database {
    #[serde(default)]
    users: BTreeMap<Identifier, UserRecord>,
}

/// Single JSON file holding every record.
///
/// Each write goes to a sibling temporary file that is renamed over the database, so a crash
/// mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifiers of every stored record.
    pub fn identifiers(&self) -> Result<Vec<Identifier>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read()?.users.into_keys().collect())
    }

    fn read(&self) -> Result<Database> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("No database at {}, starting empty", self.path.display());
                return Ok(Database::default());
            }
            Err(err) => return Err(self.unavailable(err)),
        };
        if raw.trim().is_empty() {
            return Ok(Database::default());
        }
        serde_json::from_str(&raw).map_err(|err| self.unavailable(err))
    }

    fn write(&self, db: &Database) -> Result<()> {
        let raw = serde_json::to_string_pretty(db).map_err(|err| self.unavailable(err))?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, raw).map_err(|err| self.unavailable(err))?;
        fs::rename(&tmp, &self.path).map_err(|err| self.unavailable(err))
    }

    fn unavailable(&self, err: impl std::fmt::Display) -> BingoError {
        log::error!("Database {} unavailable: {err}", self.path.display());
        BingoError::StoreUnavailable(format!("{}: {err}", self.path.display()))
    }
}

impl RecordStore for FileStore {
    fn get(&self, identifier: &Identifier) -> Result<Option<UserRecord>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut db = self.read()?;
        Ok(db
            .users
            .remove(identifier)
            .map(|record| record.with_identifier(identifier.clone())))
    }

    fn put(&self, identifier: &Identifier, record: &UserRecord) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut db = self.read()?;
        db.users.insert(identifier.clone(), record.clone());
        self.write(&db)
    }
}
