use crate::domain::account_model::Account;
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::repository::Storage;
use crate::service::billing_provider::BillingProvider;
use std::sync::Arc;
use tokio::sync::Mutex;

/// アカウントの読み込み、決済プロバイダーとの同期、保存をまとめたサービス
pub struct AccountService<S, P>
where
    S: Storage + ?Sized,
    P: BillingProvider + ?Sized,
{
    storage: Arc<S>,
    provider: Arc<P>,
    // 存在確認からputまでを直列化する（クローン間で共有）
    creation_lock: Arc<Mutex<()>>,
}

impl<S, P> Clone for AccountService<S, P>
where
    S: Storage + ?Sized,
    P: BillingProvider + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            provider: Arc::clone(&self.provider),
            creation_lock: Arc::clone(&self.creation_lock),
        }
    }
}

impl<S, P> AccountService<S, P>
where
    S: Storage + ?Sized,
    P: BillingProvider + ?Sized,
{
    pub fn new(storage: Arc<S>, provider: Arc<P>) -> Self {
        Self {
            storage,
            provider,
            creation_lock: Arc::new(Mutex::new(())),
        }
    }

    /// アカウントを作成し、決済プロバイダー上の顧客と紐付けて保存する
    ///
    /// 同じメールアドレスでの同時作成は一方が`Conflict`になる。
    pub async fn create_account(&self, email: &str) -> AppResult<Account> {
        let _guard = self.creation_lock.lock().await;

        if self.find_account(email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Account already exists: {}",
                email
            )));
        }

        let mut account = Account::new(email);
        account.create_customer(self.provider.as_ref()).await?;
        self.storage.put(&account).await?;

        log_with_context!(
            tracing::Level::INFO,
            "Account created",
            "email" => email,
            "customer_id" => account.customer().map(|c| c.id.as_str()),
        );

        Ok(account)
    }

    pub async fn get_account(&self, email: &str) -> AppResult<Account> {
        let mut account = Account::new(email);
        self.storage.get(&mut account).await?;
        Ok(account)
    }

    /// 保存されていなければ`None`
    pub async fn find_account(&self, email: &str) -> AppResult<Option<Account>> {
        match self.get_account(email).await {
            Ok(account) => Ok(Some(account)),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// 顧客情報を最新化して保存する
    pub async fn refresh_account(&self, email: &str) -> AppResult<Account> {
        let mut account = self.get_account(email).await?;
        account.update_customer(self.provider.as_ref()).await?;
        self.storage.put(&account).await?;

        log_with_context!(
            tracing::Level::INFO,
            "Account refreshed",
            "email" => email,
            "active" => account.has_active_subscription(),
            "trial_days" => account.remaining_trial_days(),
        );

        Ok(account)
    }

    pub async fn set_payment_source(&self, email: &str, token: &str) -> AppResult<Account> {
        let mut account = self.get_account(email).await?;
        account
            .set_payment_source(self.provider.as_ref(), token)
            .await?;
        self.storage.put(&account).await?;

        log_with_context!(
            tracing::Level::INFO,
            "Account payment source set",
            "email" => email,
        );

        Ok(account)
    }

    pub async fn delete_account(&self, email: &str) -> AppResult<()> {
        self.storage.delete(&Account::new(email)).await?;

        log_with_context!(tracing::Level::INFO, "Account deleted", "email" => email);

        Ok(())
    }
}
