use crate::error::{AppError, AppResult};
use std::env;

/// 新規顧客を登録する月額プラン
pub const PLAN_MONTHLY: &str = "padlock-cloud-monthly";

#[derive(Clone, Debug)]
pub struct StripeConfig {
    pub secret_key: String,
    pub development_mode: bool,
}

impl StripeConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)

        let development_mode = env::var("PAYMENT_DEVELOPMENT_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        let secret_key = env::var("STRIPE_SECRET_KEY").unwrap_or_default();

        Self::new(secret_key, development_mode)
    }

    pub fn new(secret_key: impl Into<String>, development_mode: bool) -> AppResult<Self> {
        let secret_key = secret_key.into();

        if development_mode {
            tracing::info!("Payment development mode enabled");
            if secret_key.is_empty() {
                tracing::warn!("Stripe client initialized with empty key - payments will not work");
            }
        } else if secret_key.is_empty() {
            return Err(AppError::ConfigurationError(
                "STRIPE_SECRET_KEY must be set when not in development mode".to_string(),
            ));
        } else if secret_key.starts_with("pk_") {
            // 公開可能キーはAPI呼び出しに使えない
            tracing::error!("STRIPE_SECRET_KEY is a publishable key");
            return Err(AppError::ConfigurationError(
                "STRIPE_SECRET_KEY must be a secret key (sk_...), not a publishable key".to_string(),
            ));
        }

        Ok(Self {
            secret_key,
            development_mode,
        })
    }

    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_") || self.development_mode
    }
}
