use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::donations::PaymentMethod;

#[derive(Clone, Debug, Deserialize)]
pub struct Payee {
    pub vpa: String,
    pub name: String,
    pub note: String,
    pub currency: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Payments {
    /// Methods offered on the donation form.
    pub methods: Vec<PaymentMethod>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Wallet {
    /// Mock charity wallet balance, in whole rupees.
    pub balance: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Timing {
    pub processing_delay_ms: u64,
    pub success_display_ms: u64,
    pub typing_delay_min_ms: u64,
    pub typing_delay_max_ms: u64,
    pub recommendation_delay_ms: u64,
    pub session_ttl_secs: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub payee: Payee,
    pub payments: Payments,
    pub wallet: Wallet,
    pub timing: Timing,
}

impl Settings {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = Self::defaults()?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("NOBEL_HANDS").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Built-in settings, without reading any file or environment variable.
    pub fn default_settings() -> Result<Self, ConfigError> {
        Self::defaults()?.build()?.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("payee.vpa", "nobelhands@upi")?
            .set_default("payee.name", "Nobel Hands")?
            .set_default("payee.note", "Donation to feed the hungry")?
            .set_default("payee.currency", "INR")?
            .set_default("payments.methods", vec!["qr", "upi", "wallet", "card", "netbanking"])?
            .set_default("wallet.balance", 1250_i64)?
            .set_default("timing.processing_delay_ms", 2500_i64)?
            .set_default("timing.success_display_ms", 3000_i64)?
            .set_default("timing.typing_delay_min_ms", 1000_i64)?
            .set_default("timing.typing_delay_max_ms", 2000_i64)?
            .set_default("timing.recommendation_delay_ms", 1500_i64)?
            .set_default("timing.session_ttl_secs", 900_i64)
    }
}
