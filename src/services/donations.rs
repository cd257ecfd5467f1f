use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::oneshot;
use uuid::Uuid;

use super::{RequestHandler, Service, ServiceError};
use crate::models::donations::{DonationAmount, DonationError, DonationForm, PaymentMethod};
use crate::models::impact::ImpactSummary;
use crate::models::payments::{PaymentDetails, PaymentSession, PaymentStep, TransactionRecord};
use crate::repositories::sessions::SessionRepository;
use crate::repositories::upi::{PaymentIntent, UpiRepository};
use crate::settings::Settings;

pub enum DonationServiceRequest {
    StartDonation {
        form: DonationForm,
        response: oneshot::Sender<Result<PaymentView, ServiceError>>,
    },
    GetPayment {
        id: Uuid,
        response: oneshot::Sender<Result<PaymentView, ServiceError>>,
    },
    UpdateDetails {
        id: Uuid,
        details: PaymentDetails,
        response: oneshot::Sender<Result<PaymentView, ServiceError>>,
    },
    SubmitPayment {
        id: Uuid,
        response: oneshot::Sender<Result<PaymentView, ServiceError>>,
    },
    ClosePayment {
        id: Uuid,
        response: oneshot::Sender<Result<PaymentView, ServiceError>>,
    },
    DiscardPayment {
        id: Uuid,
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
    GetQrCode {
        id: Uuid,
        response: oneshot::Sender<Result<String, ServiceError>>,
    },
    GetSummary {
        id: Uuid,
        response: oneshot::Sender<Result<ImpactSummary, ServiceError>>,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct WalletView {
    pub balance: f64,
    pub remaining: f64,
}

/// What the payment dialog renders for a session.
#[derive(Clone, Debug, Serialize)]
pub struct PaymentView {
    pub id: Uuid,
    pub step: PaymentStep,
    pub amount: DonationAmount,
    pub payment_method: PaymentMethod,
    pub donor_name: Option<String>,
    pub can_submit: bool,
    pub warnings: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent: Option<PaymentIntent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<WalletView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_last_digits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<TransactionRecord>,
}

#[derive(Clone)]
pub struct DonationRequestHandler {
    sessions: SessionRepository,
    upi: UpiRepository,
    methods: Arc<Vec<PaymentMethod>>,
    wallet_balance_paise: u64,
    processing_delay: Duration,
    success_display: Duration,
    session_ttl: Duration,
}

impl DonationRequestHandler {
    pub fn new(settings: &Settings) -> Result<Self, anyhow::Error> {
        let upi = UpiRepository::new(&settings.payee)?;

        Ok(Self {
            sessions: SessionRepository::new(),
            upi,
            methods: Arc::new(settings.payments.methods.clone()),
            wallet_balance_paise: settings.wallet.balance.saturating_mul(100),
            processing_delay: Duration::from_millis(settings.timing.processing_delay_ms),
            success_display: Duration::from_millis(settings.timing.success_display_ms),
            session_ttl: Duration::from_secs(settings.timing.session_ttl_secs),
        })
    }

    pub async fn start_session_sweep_task(&self) {
        self.sessions.start_sweep_task(self.session_ttl).await
    }

    fn view(&self, session: &PaymentSession) -> PaymentView {
        let method = session.donation.payment_method;
        let amount = session.donation.amount;

        let payment_intent = method
            .uses_payment_intent()
            .then(|| self.upi.payment_intent(amount));
        let wallet = (method == PaymentMethod::Wallet).then(|| WalletView {
            balance: self.wallet_balance_paise as f64 / 100.0,
            remaining: (self.wallet_balance_paise as f64 - amount.paise() as f64) / 100.0,
        });
        let card_last_digits = (method == PaymentMethod::Card
            && !session.form.card_number.is_empty())
        .then(|| {
            let digits: Vec<char> = session.form.card_number.chars().collect();
            digits[digits.len().saturating_sub(4)..].iter().collect()
        });

        PaymentView {
            id: session.id,
            step: session.step,
            amount,
            payment_method: method,
            donor_name: session.donation.donor_name.clone(),
            can_submit: session.step == PaymentStep::Form
                && session.can_submit(self.wallet_balance_paise),
            warnings: session.warnings(self.wallet_balance_paise),
            payment_intent,
            wallet,
            card_last_digits,
            bank: session.form.bank.map(|bank| bank.name()),
            transaction: session.transaction.clone(),
        }
    }

    fn not_found(id: &Uuid) -> ServiceError {
        ServiceError::NotFound("Payment", id.to_string())
    }

    fn start_donation(&self, form: DonationForm) -> Result<PaymentView, ServiceError> {
        let donation = form.validate()?;
        if !self.methods.contains(&donation.payment_method) {
            return Err(DonationError::MethodUnavailable(donation.payment_method).into());
        }

        let session = PaymentSession::open(donation, Utc::now());
        let view = self.view(&session);
        log::info!(
            "Opened payment {} for ₹{} via {}.",
            session.id,
            session.donation.amount,
            session.donation.payment_method.label()
        );
        self.sessions.insert(session);

        Ok(view)
    }

    fn get_payment(&self, id: &Uuid) -> Result<PaymentView, ServiceError> {
        self.sessions
            .get(id)
            .map(|session| self.view(&session))
            .ok_or_else(|| Self::not_found(id))
    }

    fn update_details(
        &self,
        id: &Uuid,
        details: PaymentDetails,
    ) -> Result<PaymentView, ServiceError> {
        self.sessions
            .update(id, |session| -> Result<PaymentView, ServiceError> {
                session.update_details(details, Utc::now())?;
                Ok(self.view(session))
            })
            .ok_or_else(|| Self::not_found(id))?
    }

    fn submit_payment(&self, id: &Uuid) -> Result<PaymentView, ServiceError> {
        let view = self
            .sessions
            .update(id, |session| -> Result<PaymentView, ServiceError> {
                session.submit(self.wallet_balance_paise, Utc::now())?;
                Ok(self.view(session))
            })
            .ok_or_else(|| Self::not_found(id))??;

        log::info!("Processing payment {}.", id);
        self.schedule_completion(*id);

        Ok(view)
    }

    /// Drives a submitted session through `success` and on to `closed`.
    fn schedule_completion(&self, id: Uuid) {
        let handler = self.clone();

        tokio::spawn(async move {
            tokio::time::sleep(handler.processing_delay).await;

            let transaction_id = handler
                .sessions
                .update(&id, |session| {
                    session
                        .complete(Utc::now())
                        .map(|transaction| transaction.id.clone())
                })
                .flatten();

            match transaction_id {
                Some(transaction_id) => {
                    log::info!("Payment {} succeeded with transaction {}.", id, transaction_id)
                }
                None => {
                    log::debug!("Payment {} left processing before completing.", id);
                    return;
                }
            }

            tokio::time::sleep(handler.success_display).await;

            handler.sessions.update(&id, |session| {
                if session.step == PaymentStep::Success {
                    session.close(Utc::now());
                    log::debug!("Closed payment {} after success.", id);
                }
            });
        });
    }

    fn close_payment(&self, id: &Uuid) -> Result<PaymentView, ServiceError> {
        self.sessions
            .update(id, |session| {
                session.close(Utc::now());
                self.view(session)
            })
            .ok_or_else(|| Self::not_found(id))
    }

    fn discard_payment(&self, id: &Uuid) -> Result<(), ServiceError> {
        self.sessions
            .remove(id)
            .map(|_| log::debug!("Discarded payment {}.", id))
            .ok_or_else(|| Self::not_found(id))
    }

    fn qr_code(&self, id: &Uuid) -> Result<String, ServiceError> {
        let session = self.sessions.get(id).ok_or_else(|| Self::not_found(id))?;
        if !session.donation.payment_method.uses_payment_intent() {
            return Err(ServiceError::NotFound("QR code", id.to_string()));
        }

        let intent = self.upi.payment_intent(session.donation.amount);
        self.upi
            .qr_svg(&intent)
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }

    fn summary(&self, id: &Uuid) -> Result<ImpactSummary, ServiceError> {
        let session = self.sessions.get(id).ok_or_else(|| Self::not_found(id))?;
        let transaction = session
            .transaction
            .as_ref()
            .ok_or_else(|| ServiceError::NotFound("Transaction", id.to_string()))?;

        Ok(ImpactSummary::new(
            transaction.amount,
            session.donation.donor_name.as_deref(),
            &transaction.id,
        ))
    }
}

#[async_trait]
impl RequestHandler<DonationServiceRequest> for DonationRequestHandler {
    async fn handle_request(&self, request: DonationServiceRequest) {
        match request {
            DonationServiceRequest::StartDonation { form, response } => {
                let _ = response.send(self.start_donation(form));
            }
            DonationServiceRequest::GetPayment { id, response } => {
                let _ = response.send(self.get_payment(&id));
            }
            DonationServiceRequest::UpdateDetails {
                id,
                details,
                response,
            } => {
                let _ = response.send(self.update_details(&id, details));
            }
            DonationServiceRequest::SubmitPayment { id, response } => {
                let _ = response.send(self.submit_payment(&id));
            }
            DonationServiceRequest::ClosePayment { id, response } => {
                let _ = response.send(self.close_payment(&id));
            }
            DonationServiceRequest::DiscardPayment { id, response } => {
                let _ = response.send(self.discard_payment(&id));
            }
            DonationServiceRequest::GetQrCode { id, response } => {
                let _ = response.send(self.qr_code(&id));
            }
            DonationServiceRequest::GetSummary { id, response } => {
                let _ = response.send(self.summary(&id));
            }
        }
    }
}

pub struct DonationService;

impl DonationService {
    pub fn new() -> Self {
        DonationService {}
    }
}

#[async_trait]
impl Service<DonationServiceRequest, DonationRequestHandler> for DonationService {}
