use crate::config::stripe::StripeConfig;
use crate::domain::customer_model::{CustomerSnapshot, SubscriptionSnapshot};
use crate::error::{AppError, AppResult};
use crate::service::billing_provider::BillingProvider;
use crate::types::datetime::from_epoch_seconds;
use async_trait::async_trait;
use std::future::Future;
use stripe::{
    Client, CreateCustomer, CreateSubscription, CreateSubscriptionItems, Customer, CustomerId,
    PaymentSourceParams, SourceId, StripeError, Subscription, TokenId, UpdateCustomer,
};

/// スナップショットにサブスクリプション一覧を含めるための展開指定
const EXPAND_SUBSCRIPTIONS: &[&str] = &["subscriptions"];

/// Stripe APIを使う`BillingProvider`
#[derive(Clone)]
pub struct StripeProvider {
    client: Client,
}

impl StripeProvider {
    pub fn new(config: &StripeConfig) -> Self {
        if config.is_test_mode() {
            tracing::info!("Stripe provider running in test mode");
        }

        Self {
            client: Client::new(config.secret_key.clone()),
        }
    }

    pub fn from_env() -> AppResult<Self> {
        let config = StripeConfig::from_env()?;
        Ok(Self::new(&config))
    }

    async fn retrieve(&self, customer_id: &CustomerId) -> AppResult<CustomerSnapshot> {
        let customer = Customer::retrieve(&self.client, customer_id, EXPAND_SUBSCRIPTIONS)
            .await
            .map_err(|e| {
                tracing::error!("Failed to retrieve Stripe customer {}: {}", customer_id, e);
                AppError::from(e)
            })?;

        customer_snapshot(&customer)
    }
}

#[async_trait]
impl BillingProvider for StripeProvider {
    async fn create_customer(&self, email: &str, plan: &str) -> AppResult<CustomerSnapshot> {
        let customer_params = CreateCustomer {
            email: Some(email),
            ..Default::default()
        };

        let customer = Customer::create(&self.client, customer_params)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create Stripe customer: {}", e);
                AppError::from(e)
            })?;

        // プランへの登録（プランのトライアル期間を適用）
        let mut subscription_params = CreateSubscription::new(customer.id.clone());
        subscription_params.items = Some(vec![CreateSubscriptionItems {
            price: Some(plan.to_string()),
            ..Default::default()
        }]);
        subscription_params.trial_from_plan = Some(true);

        let customer_id = customer.id.clone();
        subscribe_or_rollback(
            Subscription::create(&self.client, subscription_params),
            || Customer::delete(&self.client, &customer_id),
        )
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to subscribe Stripe customer {} to plan {}: {}",
                customer.id,
                plan,
                e
            );
            e
        })?;

        tracing::info!("Stripe customer {} subscribed to plan {}", customer.id, plan);

        self.retrieve(&customer.id).await
    }

    async fn get_customer(&self, customer_id: &str) -> AppResult<CustomerSnapshot> {
        let customer_id = parse_customer_id(customer_id)?;
        self.retrieve(&customer_id).await
    }

    async fn update_customer_source(
        &self,
        customer_id: &str,
        token: &str,
    ) -> AppResult<CustomerSnapshot> {
        let customer_id = parse_customer_id(customer_id)?;
        let source = parse_source(token)?;

        let params = UpdateCustomer {
            source: Some(source),
            expand: EXPAND_SUBSCRIPTIONS,
            ..Default::default()
        };

        let customer = Customer::update(&self.client, &customer_id, params)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update Stripe customer {} source: {}", customer_id, e);
                AppError::from(e)
            })?;

        customer_snapshot(&customer)
    }
}

/// プラン登録に失敗したら作成済みの顧客を削除し、登録時のエラーを返す
async fn subscribe_or_rollback<T, S, R, RF, D>(subscribe: S, rollback: R) -> AppResult<T>
where
    S: Future<Output = Result<T, StripeError>>,
    R: FnOnce() -> RF,
    RF: Future<Output = Result<D, StripeError>>,
{
    match subscribe.await {
        Ok(subscription) => Ok(subscription),
        Err(e) => {
            if let Err(cleanup_err) = rollback().await {
                tracing::error!(
                    "Failed to delete Stripe customer after subscription failure: {}",
                    cleanup_err
                );
            }
            Err(AppError::from(e))
        }
    }
}

fn parse_customer_id(id: &str) -> AppResult<CustomerId> {
    id.parse()
        .map_err(|_| AppError::ProviderError(format!("Invalid customer ID format: {:?}", id)))
}

fn parse_source(token: &str) -> AppResult<PaymentSourceParams> {
    let invalid = || AppError::ProviderError(format!("Invalid payment source token: {:?}", token));

    if token.starts_with("src_") {
        token
            .parse::<SourceId>()
            .map(PaymentSourceParams::Source)
            .map_err(|_| invalid())
    } else {
        token
            .parse::<TokenId>()
            .map(PaymentSourceParams::Token)
            .map_err(|_| invalid())
    }
}

/// Stripeの顧客オブジェクトをスナップショットに変換
fn customer_snapshot(customer: &Customer) -> AppResult<CustomerSnapshot> {
    if customer.deleted {
        return Err(AppError::ProviderError(format!(
            "Stripe customer {} has been deleted",
            customer.id
        )));
    }

    let subscriptions = customer.subscriptions.as_ref().map_or_else(Vec::new, |list| {
        list.data.iter().map(subscription_snapshot).collect()
    });

    Ok(CustomerSnapshot {
        id: customer.id.to_string(),
        email: customer.email.clone(),
        created: customer.created.and_then(from_epoch_seconds),
        default_source: customer
            .default_source
            .as_ref()
            .map(|source| source.id().to_string()),
        subscriptions,
    })
}

fn subscription_snapshot(subscription: &Subscription) -> SubscriptionSnapshot {
    SubscriptionSnapshot {
        id: subscription.id.to_string(),
        status: subscription.status.to_string(),
        plan_id: subscription
            .items
            .data
            .first()
            .and_then(|item| item.price.as_ref())
            .map(|price| price.id.to_string()),
        trial_end: subscription.trial_end.and_then(from_epoch_seconds),
        current_period_end: from_epoch_seconds(subscription.current_period_end),
    }
}
