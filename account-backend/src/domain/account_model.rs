// account-backend/src/domain/account_model.rs

use crate::config::stripe::PLAN_MONTHLY;
use crate::domain::customer_model::{CustomerSnapshot, SubscriptionSnapshot};
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::repository::Storable;
use crate::service::billing_provider::BillingProvider;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// ローカルのアカウント情報と、決済プロバイダー側の顧客スナップショットの組
///
/// `customer`はプロバイダー呼び出しが成功するたびに丸ごと置き換えられる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(alias = "Email")]
    email: String,
    #[serde(alias = "Created")]
    created: DateTime<Utc>,
    customer: Option<CustomerSnapshot>,
}

impl Account {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            created: Utc::now(),
            customer: None,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn customer(&self) -> Option<&CustomerSnapshot> {
        self.customer.as_ref()
    }

    /// 顧客の先頭のサブスクリプション
    pub fn subscription(&self) -> Option<&SubscriptionSnapshot> {
        self.customer
            .as_ref()
            .and_then(CustomerSnapshot::first_subscription)
    }

    pub fn has_active_subscription(&self) -> bool {
        self.subscription()
            .is_some_and(|sub| sub.status().is_active())
    }

    pub fn remaining_trial_period(&self) -> Duration {
        self.remaining_trial_period_at(Utc::now())
    }

    /// `now`時点でのトライアル残り期間（過ぎていれば0）
    pub fn remaining_trial_period_at(&self, now: DateTime<Utc>) -> Duration {
        let Some(trial_end) = self.subscription().and_then(|sub| sub.trial_end) else {
            return Duration::zero();
        };

        let remaining = trial_end - now;
        if remaining < Duration::zero() {
            Duration::zero()
        } else {
            remaining
        }
    }

    pub fn remaining_trial_days(&self) -> i64 {
        self.remaining_trial_days_at(Utc::now())
    }

    /// 表示用の残り日数。残り0でも1を返す
    pub fn remaining_trial_days_at(&self, now: DateTime<Utc>) -> i64 {
        self.remaining_trial_period_at(now).num_hours() / 24 + 1
    }

    /// プロバイダー上に顧客を作成し、月額プランに登録する
    pub async fn create_customer<P>(&mut self, provider: &P) -> AppResult<()>
    where
        P: BillingProvider + ?Sized,
    {
        let customer = provider.create_customer(&self.email, PLAN_MONTHLY).await?;

        log_with_context!(
            tracing::Level::DEBUG,
            "Billing customer created",
            "email" => &self.email,
            "customer_id" => &customer.id,
        );

        self.customer = Some(customer);
        Ok(())
    }

    /// 顧客情報を最新の状態に更新する（顧客未作成なら何もしない）
    pub async fn update_customer<P>(&mut self, provider: &P) -> AppResult<()>
    where
        P: BillingProvider + ?Sized,
    {
        let Some(current) = &self.customer else {
            return Ok(());
        };

        let customer = provider.get_customer(&current.id).await?;
        self.customer = Some(customer);
        Ok(())
    }

    /// 支払い方法のトークンを顧客のソースとして設定する
    pub async fn set_payment_source<P>(&mut self, provider: &P, token: &str) -> AppResult<()>
    where
        P: BillingProvider + ?Sized,
    {
        let customer_id = self
            .customer
            .as_ref()
            .map(|c| c.id.clone())
            .ok_or_else(|| {
                AppError::InvalidState(format!(
                    "Account {} has no billing customer",
                    self.email
                ))
            })?;

        let customer = provider
            .update_customer_source(&customer_id, token)
            .await?;

        log_with_context!(
            tracing::Level::DEBUG,
            "Payment source updated",
            "email" => &self.email,
            "customer_id" => &customer_id,
        );

        self.customer = Some(customer);
        Ok(())
    }
}

impl Storable for Account {
    fn key(&self) -> Vec<u8> {
        self.email.as_bytes().to_vec()
    }

    fn serialize(&self) -> AppResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(AppError::EncodingError)
    }

    fn deserialize(&mut self, data: &[u8]) -> AppResult<()> {
        *self = serde_json::from_slice(data).map_err(AppError::DecodingError)?;
        Ok(())
    }
}
