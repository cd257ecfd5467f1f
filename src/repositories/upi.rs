use qrcode::render::svg;
use qrcode::QrCode;
use serde::Serialize;
use url::form_urlencoded;

use crate::models::donations::DonationAmount;
use crate::settings::Payee;

const UPI_SCHEME: &str = "upi://pay";
const QR_MIN_DIMENSION: u32 = 300;
const QR_DARK: &str = "#000000";
const QR_LIGHT: &str = "#FFFFFF";

#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error("Invalid payee VPA: {0}")]
    InvalidVpa(String),
    #[error("Could not encode QR code: {0}")]
    Qr(#[from] qrcode::types::QrError),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaymentIntent {
    pub link: String,
    pub payee: String,
    pub amount: DonationAmount,
}

/// Builds UPI payment intents for the charity's payee account.
#[derive(Clone, Debug)]
pub struct UpiRepository {
    vpa: String,
    name: String,
    note: String,
    currency: String,
}

impl UpiRepository {
    pub fn new(payee: &Payee) -> Result<Self, IntentError> {
        if !is_valid_vpa(&payee.vpa) {
            return Err(IntentError::InvalidVpa(payee.vpa.clone()));
        }

        Ok(Self {
            vpa: payee.vpa.clone(),
            name: payee.name.clone(),
            note: payee.note.clone(),
            currency: payee.currency.clone(),
        })
    }

    pub fn payment_intent(&self, amount: DonationAmount) -> PaymentIntent {
        let link = format!(
            "{}?pa={}&pn={}&am={}&cu={}&tn={}",
            UPI_SCHEME,
            self.vpa,
            encode(&self.name),
            amount,
            encode(&self.currency),
            encode(&self.note)
        );

        PaymentIntent {
            link,
            payee: self.vpa.clone(),
            amount,
        }
    }

    pub fn qr_svg(&self, intent: &PaymentIntent) -> Result<String, IntentError> {
        let code = QrCode::new(intent.link.as_bytes())?;
        let image = code
            .render::<svg::Color>()
            .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
            .dark_color(svg::Color(QR_DARK))
            .light_color(svg::Color(QR_LIGHT))
            .build();

        Ok(image)
    }
}

fn encode(value: &str) -> String {
    // form_urlencoded writes spaces as '+' and escapes a literal '+' as %2B.
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn is_valid_vpa(vpa: &str) -> bool {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_');

    match vpa.split_once('@') {
        Some((local, handle)) => {
            !local.is_empty()
                && !handle.is_empty()
                && local.chars().all(allowed)
                && handle.chars().all(allowed)
        }
        None => false,
    }
}
