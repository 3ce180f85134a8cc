// account-backend/src/repository/memory_storage.rs

use super::{Storable, Storage};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// プロセス内のキーバリューストア（開発・テスト用）
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn not_found(key: &[u8]) -> AppError {
    AppError::NotFound(format!("No entry for key {}", String::from_utf8_lossy(key)))
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, obj: &mut dyn Storable) -> AppResult<()> {
        let key = obj.key();
        let entries = self.entries.read().await;
        let data = entries.get(&key).ok_or_else(|| not_found(&key))?;
        obj.deserialize(data)
    }

    async fn put(&self, obj: &dyn Storable) -> AppResult<()> {
        let data = obj.serialize()?;
        self.entries.write().await.insert(obj.key(), data);
        Ok(())
    }

    async fn delete(&self, obj: &dyn Storable) -> AppResult<()> {
        let key = obj.key();
        match self.entries.write().await.remove(&key) {
            Some(_) => Ok(()),
            None => Err(not_found(&key)),
        }
    }
}
