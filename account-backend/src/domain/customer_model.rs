// account-backend/src/domain/customer_model.rs

use crate::domain::subscription_status::SubscriptionStatus;
use crate::types::datetime::optional_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 決済プロバイダー側の顧客情報のスナップショット
///
/// プロバイダーから取得した内容をそのまま保持し、ローカルで部分的に書き換えることはない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(with = "optional_timestamp", default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub default_source: Option<String>,
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionSnapshot>,
}

impl CustomerSnapshot {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            created: None,
            default_source: None,
            subscriptions: Vec::new(),
        }
    }

    /// 先頭のサブスクリプションを取得
    pub fn first_subscription(&self) -> Option<&SubscriptionSnapshot> {
        self.subscriptions.first()
    }
}

/// サブスクリプションのスナップショット
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSnapshot {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(with = "optional_timestamp", default)]
    pub trial_end: Option<DateTime<Utc>>,
    #[serde(with = "optional_timestamp", default)]
    pub current_period_end: Option<DateTime<Utc>>,
}

impl SubscriptionSnapshot {
    pub fn status(&self) -> SubscriptionStatus {
        SubscriptionStatus::from(self.status.as_str())
    }
}
