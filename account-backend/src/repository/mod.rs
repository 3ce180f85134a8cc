// account-backend/src/repository/mod.rs

pub mod memory_storage;

use crate::error::AppResult;
use async_trait::async_trait;

pub use memory_storage::MemoryStorage;

/// キーバリューストアに保存できるオブジェクト
pub trait Storable: Send + Sync {
    /// ストア上の一意なキー
    fn key(&self) -> Vec<u8>;

    /// レコード全体をバイト列にエンコード
    fn serialize(&self) -> AppResult<Vec<u8>>;

    /// `serialize`が生成したバイト列からフィールドを復元
    ///
    /// エラー時、呼び出し側はこのオブジェクトを破棄すること。
    fn deserialize(&mut self, data: &[u8]) -> AppResult<()>;
}

/// `Storable`を永続化するキーバリューストア
#[async_trait]
pub trait Storage: Send + Sync {
    /// `obj`のキーで保存された値を読み込み、`obj`に反映する
    async fn get(&self, obj: &mut dyn Storable) -> AppResult<()>;

    /// `obj`をキーで保存する（既存の値は上書き）
    async fn put(&self, obj: &dyn Storable) -> AppResult<()>;

    /// `obj`のキーを削除する
    async fn delete(&self, obj: &dyn Storable) -> AppResult<()>;
}
