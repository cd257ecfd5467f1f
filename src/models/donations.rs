use std::fmt;

use serde::{Deserialize, Serialize};

use super::recommendation::PROFILES;

pub const PRESET_AMOUNTS: [u64; 4] = [2, 50, 100, 500];
pub const MINIMUM_DONATION_RUPEES: f64 = 1.0;

const PAISE_PER_RUPEE: u64 = 100;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DonationError {
    #[error("Please enter a valid donation amount")]
    InvalidAmount,
    #[error("Unknown preset amount: {0}")]
    UnknownPreset(f64),
    #[error("{} payments are not available right now", .0.label())]
    MethodUnavailable(PaymentMethod),
}

impl DonationError {
    pub fn title(&self) -> &'static str {
        match self {
            DonationError::MethodUnavailable(_) => "Payment Method Unavailable",
            _ => "Invalid Amount",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Qr,
    Upi,
    Wallet,
    Card,
    #[serde(rename = "netbanking")]
    NetBanking,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Qr => "QR Code",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Wallet => "Charity Wallet",
            PaymentMethod::Card => "Card",
            PaymentMethod::NetBanking => "Net Banking",
        }
    }

    /// Methods paid by scanning or opening a UPI payment intent.
    pub fn uses_payment_intent(&self) -> bool {
        matches!(self, PaymentMethod::Qr | PaymentMethod::Upi)
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Qr
    }
}

/// Donation amount in paise. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(into = "f64")]
pub struct DonationAmount(u64);

impl DonationAmount {
    pub fn from_rupees(rupees: f64) -> Result<Self, DonationError> {
        if !rupees.is_finite() || rupees < MINIMUM_DONATION_RUPEES {
            return Err(DonationError::InvalidAmount);
        }

        let paise = (rupees * PAISE_PER_RUPEE as f64).round();
        if paise > u64::MAX as f64 {
            return Err(DonationError::InvalidAmount);
        }

        Ok(Self(paise as u64))
    }

    pub fn from_whole_rupees(rupees: u64) -> Result<Self, DonationError> {
        match rupees.checked_mul(PAISE_PER_RUPEE) {
            Some(paise) if paise > 0 => Ok(Self(paise)),
            _ => Err(DonationError::InvalidAmount),
        }
    }

    pub fn paise(&self) -> u64 {
        self.0
    }

    pub fn whole_rupees(&self) -> u64 {
        self.0 / PAISE_PER_RUPEE
    }

    pub fn as_rupees(&self) -> f64 {
        self.0 as f64 / PAISE_PER_RUPEE as f64
    }
}

impl From<DonationAmount> for f64 {
    fn from(amount: DonationAmount) -> Self {
        amount.as_rupees()
    }
}

/// Rupees without decimals when whole, otherwise with two decimals.
impl fmt::Display for DonationAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rupees = self.0 / PAISE_PER_RUPEE;
        let paise = self.0 % PAISE_PER_RUPEE;

        if paise == 0 {
            write!(f, "{}", rupees)
        } else {
            write!(f, "{}.{:02}", rupees, paise)
        }
    }
}

/// A custom amount as typed, sent either as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    fn rupees(&self) -> Result<f64, DonationError> {
        match self {
            AmountInput::Number(rupees) => Ok(*rupees),
            AmountInput::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| DonationError::InvalidAmount),
        }
    }
}

impl From<&str> for AmountInput {
    fn from(text: &str) -> Self {
        AmountInput::Text(text.to_string())
    }
}

/// Whole-rupee amounts the site offers as one-tap choices: the presets and
/// whatever the recommender may suggest.
pub fn is_selectable_amount(rupees: u64) -> bool {
    PRESET_AMOUNTS.contains(&rupees)
        || PROFILES
            .iter()
            .any(|profile| profile.recommended_amount == rupees)
}

/// The donation form as submitted by the site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonationForm {
    pub preset_amount: Option<f64>,
    pub custom_amount: Option<AmountInput>,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationRequest {
    pub amount: DonationAmount,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub payment_method: PaymentMethod,
}

impl DonationForm {
    pub fn validate(self) -> Result<DonationRequest, DonationError> {
        let amount = self.resolve_amount()?;

        Ok(DonationRequest {
            amount,
            donor_name: non_blank(self.donor_name),
            donor_email: non_blank(self.donor_email),
            payment_method: self.payment_method,
        })
    }

    fn resolve_amount(&self) -> Result<DonationAmount, DonationError> {
        if let Some(preset) = self.preset_amount {
            if !preset.is_finite() || preset < MINIMUM_DONATION_RUPEES {
                return Err(DonationError::InvalidAmount);
            }
            if preset.fract() != 0.0 || !is_selectable_amount(preset as u64) {
                return Err(DonationError::UnknownPreset(preset));
            }
            return DonationAmount::from_whole_rupees(preset as u64);
        }

        let rupees = self
            .custom_amount
            .as_ref()
            .ok_or(DonationError::InvalidAmount)?
            .rupees()?;

        DonationAmount::from_rupees(rupees)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(amount: &str) -> DonationForm {
        DonationForm {
            custom_amount: Some(amount.into()),
            ..Default::default()
        }
    }

    #[test]
    fn rejects_non_positive_amounts() {
        for amount in ["0", "-1", "-500", "0.0", "-0.01"] {
            assert_eq!(
                custom(amount).validate().unwrap_err(),
                DonationError::InvalidAmount,
                "amount {amount} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_missing_or_garbage_amounts() {
        assert_eq!(
            DonationForm::default().validate().unwrap_err(),
            DonationError::InvalidAmount
        );
        assert_eq!(custom("   ").validate().unwrap_err(), DonationError::InvalidAmount);
        assert_eq!(custom("abc").validate().unwrap_err(), DonationError::InvalidAmount);
        assert_eq!(custom("NaN").validate().unwrap_err(), DonationError::InvalidAmount);
        assert_eq!(custom("0.5").validate().unwrap_err(), DonationError::InvalidAmount);
    }

    #[test]
    fn preset_wins_over_custom_amount() {
        let form = DonationForm {
            preset_amount: Some(100.0),
            custom_amount: Some("42".into()),
            ..Default::default()
        };

        let request = form.validate().unwrap();
        assert_eq!(request.amount.whole_rupees(), 100);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let form = DonationForm {
            preset_amount: Some(75.0),
            ..Default::default()
        };

        assert_eq!(form.validate().unwrap_err(), DonationError::UnknownPreset(75.0));
    }

    #[test]
    fn non_positive_presets_are_invalid_amounts() {
        for preset in [0.0, -5.0, 0.5, f64::NAN] {
            let form = DonationForm {
                preset_amount: Some(preset),
                ..Default::default()
            };
            assert_eq!(
                form.validate().unwrap_err(),
                DonationError::InvalidAmount,
                "preset {preset} should be rejected"
            );
        }
    }

    #[test]
    fn recommended_amounts_are_selectable() {
        for profile in PROFILES {
            let form = DonationForm {
                preset_amount: Some(profile.recommended_amount as f64),
                ..Default::default()
            };
            let request = form.validate().unwrap();
            assert_eq!(request.amount.whole_rupees(), profile.recommended_amount);
        }
    }

    #[test]
    fn custom_amount_accepts_numbers_and_text() {
        let form: DonationForm =
            serde_json::from_str(r#"{"custom_amount": -5, "payment_method": "upi"}"#).unwrap();
        assert_eq!(form.validate().unwrap_err(), DonationError::InvalidAmount);

        let form: DonationForm = serde_json::from_str(r#"{"custom_amount": 12.5}"#).unwrap();
        assert_eq!(form.validate().unwrap().amount.paise(), 1250);

        let form: DonationForm = serde_json::from_str(r#"{"custom_amount": "75"}"#).unwrap();
        assert_eq!(form.validate().unwrap().amount.whole_rupees(), 75);
    }

    #[test]
    fn blank_donor_fields_are_dropped() {
        let form = DonationForm {
            custom_amount: Some(" 12.5 ".into()),
            donor_name: Some("  Asha ".to_string()),
            donor_email: Some("   ".to_string()),
            payment_method: PaymentMethod::Upi,
            ..Default::default()
        };

        let request = form.validate().unwrap();
        assert_eq!(request.amount.paise(), 1250);
        assert_eq!(request.donor_name.as_deref(), Some("Asha"));
        assert_eq!(request.donor_email, None);
        assert_eq!(request.payment_method, PaymentMethod::Upi);
    }

    #[test]
    fn amount_display() {
        assert_eq!(DonationAmount::from_whole_rupees(500).unwrap().to_string(), "500");
        assert_eq!(DonationAmount::from_rupees(12.5).unwrap().to_string(), "12.50");
        assert_eq!(DonationAmount::from_rupees(1.05).unwrap().to_string(), "1.05");
    }

    #[test]
    fn payment_method_wire_names() {
        let method: PaymentMethod = serde_json::from_str("\"netbanking\"").unwrap();
        assert_eq!(method, PaymentMethod::NetBanking);
        assert_eq!(serde_json::to_string(&PaymentMethod::Qr).unwrap(), "\"qr\"");
    }
}
