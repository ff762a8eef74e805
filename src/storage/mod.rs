mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use log::{ info, warn };
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::cli::Args;
use crate::error::StorageError;

/// Synchronous key-value surface used for history and token storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Read,
    Write,
    Remove,
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageOp::Read => write!(f, "read"),
            StorageOp::Write => write!(f, "write"),
            StorageOp::Remove => write!(f, "remove"),
        }
    }
}

/// Non-fatal channel for persistence failures. Called once per failed
/// storage operation; never influences the caller's result.
pub trait PersistenceHook: Send + Sync {
    fn on_failure(&self, op: StorageOp, key: &str, error: &StorageError);
}

pub struct LogPersistenceHook;

impl PersistenceHook for LogPersistenceHook {
    fn on_failure(&self, op: StorageOp, key: &str, error: &StorageError) {
        warn!("Could not {} '{}' in storage: {}", op, key, error);
    }
}

pub fn create_store(args: &Args) -> Result<Arc<dyn KeyValueStore>, Box<dyn Error + Send + Sync>> {
    match args.store_type.to_lowercase().as_str() {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "file" => {
            let store = FileStore::new(&args.store_dir)?;
            Ok(Arc::new(store))
        }
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported store type: {}", args.store_type)
                    )
                )
            ),
    }
}

pub fn initialize_store(args: &Args) -> Result<Arc<dyn KeyValueStore>, Box<dyn Error + Send + Sync>> {
    info!("Assistant state will be stored in: {} at {}", args.store_type, args.store_dir);
    create_store(args)
}
