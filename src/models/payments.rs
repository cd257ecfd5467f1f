use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::donations::{DonationAmount, DonationRequest, PaymentMethod};

pub const CARD_NUMBER_LENGTH: usize = 16;
pub const CARD_EXPIRY_MAX_LENGTH: usize = 5;
pub const CARD_CVV_LENGTH: usize = 3;
pub const TRANSACTION_ID_PREFIX: &str = "NH";
pub const INSUFFICIENT_BALANCE_WARNING: &str =
    "Insufficient balance. Please top up your wallet or choose another payment method.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment details are incomplete for {0}")]
    Incomplete(&'static str),
    #[error("Payment is not accepting changes while {0}")]
    InvalidStep(PaymentStep),
    #[error("Unknown bank: {0}")]
    UnknownBank(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStep {
    Form,
    Processing,
    Success,
    Closed,
}

impl std::fmt::Display for PaymentStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let step = match self {
            PaymentStep::Form => "form",
            PaymentStep::Processing => "processing",
            PaymentStep::Success => "success",
            PaymentStep::Closed => "closed",
        };
        f.write_str(step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Bank {
    #[serde(rename = "SBI")]
    Sbi,
    #[serde(rename = "HDFC")]
    Hdfc,
    #[serde(rename = "ICICI")]
    Icici,
    Axis,
    #[serde(rename = "PNB")]
    Pnb,
    Kotak,
    #[serde(rename = "BOB")]
    Bob,
}

impl Bank {
    pub const ALL: [Bank; 7] = [
        Bank::Sbi,
        Bank::Hdfc,
        Bank::Icici,
        Bank::Axis,
        Bank::Pnb,
        Bank::Kotak,
        Bank::Bob,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Bank::Sbi => "SBI",
            Bank::Hdfc => "HDFC",
            Bank::Icici => "ICICI",
            Bank::Axis => "Axis",
            Bank::Pnb => "PNB",
            Bank::Kotak => "Kotak",
            Bank::Bob => "BOB",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Bank::Sbi => "State Bank of India",
            Bank::Hdfc => "HDFC Bank",
            Bank::Icici => "ICICI Bank",
            Bank::Axis => "Axis Bank",
            Bank::Pnb => "Punjab National Bank",
            Bank::Kotak => "Kotak Mahindra Bank",
            Bank::Bob => "Bank of Baroda",
        }
    }

    pub fn from_code(code: &str) -> Option<Bank> {
        Bank::ALL.into_iter().find(|bank| bank.code() == code)
    }
}

/// Partial update of the payment dialog fields. Absent fields are left as-is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentDetails {
    pub upi_id: Option<String>,
    pub card_number: Option<String>,
    pub card_name: Option<String>,
    pub card_expiry: Option<String>,
    pub card_cvv: Option<String>,
    pub bank: Option<String>,
}

/// Method-specific fields collected while the dialog is in `form`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    pub upi_id: String,
    pub card_number: String,
    pub card_name: String,
    pub card_expiry: String,
    pub card_cvv: String,
    pub bank: Option<Bank>,
}

impl PaymentForm {
    pub fn apply(&mut self, details: PaymentDetails) -> Result<(), PaymentError> {
        // Resolve the bank first so a bad code leaves the form untouched.
        let bank = match details.bank.as_deref().map(str::trim) {
            None => self.bank,
            Some("") => None,
            Some(code) => Some(
                Bank::from_code(code).ok_or_else(|| PaymentError::UnknownBank(code.to_string()))?,
            ),
        };

        if let Some(upi_id) = details.upi_id {
            self.upi_id = upi_id.trim().to_string();
        }
        if let Some(number) = details.card_number {
            self.card_number = number
                .chars()
                .filter(|c| !c.is_whitespace())
                .take(CARD_NUMBER_LENGTH)
                .collect();
        }
        if let Some(name) = details.card_name {
            self.card_name = name;
        }
        if let Some(expiry) = details.card_expiry {
            self.card_expiry = expiry.chars().take(CARD_EXPIRY_MAX_LENGTH).collect();
        }
        if let Some(cvv) = details.card_cvv {
            self.card_cvv = cvv.chars().take(CARD_CVV_LENGTH).collect();
        }
        self.bank = bank;

        Ok(())
    }

    pub fn can_submit(
        &self,
        method: PaymentMethod,
        amount: DonationAmount,
        wallet_balance_paise: u64,
    ) -> bool {
        match method {
            PaymentMethod::Qr => true,
            PaymentMethod::Upi => !self.upi_id.is_empty(),
            PaymentMethod::Wallet => amount.paise() <= wallet_balance_paise,
            PaymentMethod::Card => {
                self.card_number.len() == CARD_NUMBER_LENGTH
                    && self.card_number.chars().all(|c| c.is_ascii_digit())
                    && !self.card_name.trim().is_empty()
                    && !self.card_expiry.is_empty()
                    && self.card_cvv.chars().count() == CARD_CVV_LENGTH
            }
            PaymentMethod::NetBanking => self.bank.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub id: String,
    pub amount: DonationAmount,
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn generate(amount: DonationAmount, timestamp: DateTime<Utc>) -> Self {
        let suffix: u32 = rand::thread_rng().gen_range(0..1000);
        let id = format!(
            "{}{}{}",
            TRANSACTION_ID_PREFIX,
            timestamp.timestamp_millis(),
            suffix
        );

        Self {
            id,
            amount,
            timestamp,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentSession {
    pub id: Uuid,
    pub donation: DonationRequest,
    pub form: PaymentForm,
    pub step: PaymentStep,
    pub transaction: Option<TransactionRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentSession {
    pub fn open(donation: DonationRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            donation,
            form: PaymentForm::default(),
            step: PaymentStep::Form,
            transaction: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_details(
        &mut self,
        details: PaymentDetails,
        now: DateTime<Utc>,
    ) -> Result<(), PaymentError> {
        if self.step != PaymentStep::Form {
            return Err(PaymentError::InvalidStep(self.step));
        }

        self.form.apply(details)?;
        self.updated_at = now;
        Ok(())
    }

    pub fn can_submit(&self, wallet_balance_paise: u64) -> bool {
        self.form.can_submit(
            self.donation.payment_method,
            self.donation.amount,
            wallet_balance_paise,
        )
    }

    /// Leaves `form` for `processing` when the method's fields are complete.
    pub fn submit(
        &mut self,
        wallet_balance_paise: u64,
        now: DateTime<Utc>,
    ) -> Result<(), PaymentError> {
        if self.step != PaymentStep::Form {
            return Err(PaymentError::InvalidStep(self.step));
        }
        if !self.can_submit(wallet_balance_paise) {
            return Err(PaymentError::Incomplete(self.donation.payment_method.label()));
        }

        self.step = PaymentStep::Processing;
        self.updated_at = now;
        Ok(())
    }

    /// Finishes processing. Returns `None` if the session already left `processing`.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Option<&TransactionRecord> {
        if self.step != PaymentStep::Processing {
            return None;
        }

        self.step = PaymentStep::Success;
        self.updated_at = now;
        self.transaction = Some(TransactionRecord::generate(self.donation.amount, now));
        self.transaction.as_ref()
    }

    /// Closes the dialog and clears the method fields. The transaction, if any, is kept.
    pub fn close(&mut self, now: DateTime<Utc>) {
        self.step = PaymentStep::Closed;
        self.form = PaymentForm::default();
        self.updated_at = now;
    }

    pub fn warnings(&self, wallet_balance_paise: u64) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.donation.payment_method == PaymentMethod::Wallet
            && self.donation.amount.paise() > wallet_balance_paise
        {
            warnings.push(INSUFFICIENT_BALANCE_WARNING);
        }
        warnings
    }
}
