// tests/common/mock_provider.rs

use account_backend::domain::customer_model::{CustomerSnapshot, SubscriptionSnapshot};
use account_backend::error::{AppError, AppResult};
use account_backend::service::billing_provider::BillingProvider;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// 呼び出し回数を記録する
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub create_customer: usize,
    pub get_customer: usize,
    pub update_customer_source: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.create_customer + self.get_customer + self.update_customer_source
    }
}

/// テスト用のモック決済プロバイダー
///
/// 顧客はプロセス内に保持し、作成時は14日間のトライアル中サブスクリプションを付与する。
#[derive(Default)]
pub struct MockBillingProvider {
    customers: Mutex<HashMap<String, CustomerSnapshot>>,
    calls: Mutex<CallCounts>,
    failure: Mutex<Option<String>>,
    last_plan: Mutex<Option<String>>,
}

impl MockBillingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以降の呼び出しを全て失敗させる
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn calls(&self) -> CallCounts {
        *self.calls.lock().unwrap()
    }

    pub fn last_plan(&self) -> Option<String> {
        self.last_plan.lock().unwrap().clone()
    }

    /// リモート側の顧客のサブスクリプション状態を書き換える
    pub fn set_subscription(&self, customer_id: &str, status: &str, trial_end: Option<DateTime<Utc>>) {
        let mut customers = self.customers.lock().unwrap();
        let customer = customers.get_mut(customer_id).expect("unknown customer");
        if let Some(sub) = customer.subscriptions.first_mut() {
            sub.status = status.to_string();
            sub.trial_end = trial_end;
        }
    }

    fn check_failure(&self) -> AppResult<()> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(AppError::ProviderError(message.clone())),
            None => Ok(()),
        }
    }

    fn lookup(&self, customer_id: &str) -> AppResult<CustomerSnapshot> {
        self.customers
            .lock()
            .unwrap()
            .get(customer_id)
            .cloned()
            .ok_or_else(|| AppError::ProviderError(format!("No such customer: {}", customer_id)))
    }
}

#[async_trait]
impl BillingProvider for MockBillingProvider {
    async fn create_customer(&self, email: &str, plan: &str) -> AppResult<CustomerSnapshot> {
        self.calls.lock().unwrap().create_customer += 1;
        *self.last_plan.lock().unwrap() = Some(plan.to_string());
        self.check_failure()?;

        let mut customers = self.customers.lock().unwrap();
        let id = format!("cus_mock_{}", customers.len() + 1);
        let now = Utc::now();

        let mut customer = CustomerSnapshot::new(id.clone());
        customer.email = Some(email.to_string());
        customer.created = DateTime::from_timestamp(now.timestamp(), 0);
        customer.subscriptions.push(SubscriptionSnapshot {
            id: format!("sub_mock_{}", customers.len() + 1),
            status: "trialing".to_string(),
            plan_id: Some(plan.to_string()),
            trial_end: DateTime::from_timestamp((now + Duration::days(14)).timestamp(), 0),
            current_period_end: DateTime::from_timestamp((now + Duration::days(14)).timestamp(), 0),
        });

        customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn get_customer(&self, customer_id: &str) -> AppResult<CustomerSnapshot> {
        self.calls.lock().unwrap().get_customer += 1;
        self.check_failure()?;
        self.lookup(customer_id)
    }

    async fn update_customer_source(
        &self,
        customer_id: &str,
        token: &str,
    ) -> AppResult<CustomerSnapshot> {
        self.calls.lock().unwrap().update_customer_source += 1;
        self.check_failure()?;

        let mut customers = self.customers.lock().unwrap();
        let customer = customers
            .get_mut(customer_id)
            .ok_or_else(|| AppError::ProviderError(format!("No such customer: {}", customer_id)))?;
        customer.default_source = Some(format!("card_for_{}", token));
        Ok(customer.clone())
    }
}
