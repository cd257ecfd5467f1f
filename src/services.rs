use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::models::donations::DonationError;
use crate::models::payments::PaymentError;
use crate::settings::Settings;

pub mod assistant;
pub mod donations;
pub mod http;

const CHANNEL_CAPACITY: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] DonationError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error("Message must not be empty")]
    EmptyMessage,
    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

/// Spawns the donation and assistant services and returns the state the HTTP layer needs.
pub async fn spawn_services(settings: &Settings) -> Result<http::AppState, anyhow::Error> {
    let (donation_tx, mut donation_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (assistant_tx, mut assistant_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let mut donation_service = donations::DonationService::new();
    let mut assistant_service = assistant::AssistantService::new();

    log::info!("Starting donation service.");
    let donation_handler = donations::DonationRequestHandler::new(settings)?;
    donation_handler.start_session_sweep_task().await;
    tokio::spawn(async move {
        donation_service
            .run(donation_handler, &mut donation_rx)
            .await;
    });

    log::info!("Starting assistant service.");
    let assistant_handler = assistant::AssistantRequestHandler::new(&settings.timing);
    assistant_handler.start_conversation_sweep_task().await;
    tokio::spawn(async move {
        assistant_service
            .run(assistant_handler, &mut assistant_rx)
            .await;
    });

    Ok(http::AppState::new(
        donation_tx,
        assistant_tx,
        &settings.payments.methods,
    ))
}

pub async fn start_services(settings: Settings, listen: &str) -> Result<(), anyhow::Error> {
    let state = spawn_services(&settings).await?;

    log::info!("Starting HTTP server.");
    http::start_http_server(listen, state).await
}
