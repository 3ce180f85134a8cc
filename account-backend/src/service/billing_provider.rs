// account-backend/src/service/billing_provider.rs

use crate::domain::customer_model::CustomerSnapshot;
use crate::error::AppResult;
use async_trait::async_trait;

/// 外部の決済プロバイダーに対する操作
///
/// どの操作も1回のリクエストで完結し、リトライは行わない。
/// 失敗は`AppError::ProviderError`として返す。
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// `email`で顧客を作成し、`plan`に登録する
    async fn create_customer(&self, email: &str, plan: &str) -> AppResult<CustomerSnapshot>;

    /// 顧客の最新のスナップショットを取得する
    async fn get_customer(&self, customer_id: &str) -> AppResult<CustomerSnapshot>;

    /// 支払い方法のトークンを顧客のソースとして設定する
    async fn update_customer_source(
        &self,
        customer_id: &str,
        token: &str,
    ) -> AppResult<CustomerSnapshot>;
}
