use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use gigline_chat::{ConversationStore, InMemoryDirectory};
use gigline_types::models::Language;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub directory: RwLock<InMemoryDirectory>,
    pub store: Mutex<ConversationStore>,
    pub jwt_secret: String,
    pub default_language: Language,
}

impl AppStateInner {
    pub fn new(directory: InMemoryDirectory, jwt_secret: String, default_language: Language) -> Self {
        Self {
            directory: RwLock::new(directory),
            store: Mutex::new(ConversationStore::new()),
            jwt_secret,
            default_language,
        }
    }

    pub fn directory(&self) -> Result<RwLockReadGuard<'_, InMemoryDirectory>, ApiError> {
        self.directory.read().map_err(|_| ApiError::StatePoisoned)
    }

    pub fn directory_mut(&self) -> Result<RwLockWriteGuard<'_, InMemoryDirectory>, ApiError> {
        self.directory.write().map_err(|_| ApiError::StatePoisoned)
    }

    /// Store mutations are serialized here; guards are never held across an await.
    pub fn store(&self) -> Result<MutexGuard<'_, ConversationStore>, ApiError> {
        self.store.lock().map_err(|_| ApiError::StatePoisoned)
    }
}
