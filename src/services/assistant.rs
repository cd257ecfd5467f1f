use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use tokio::sync::oneshot;
use uuid::Uuid;

use super::{RequestHandler, Service, ServiceError};
use crate::models::chat::{self, ChatMessage};
use crate::models::recommendation::{self, DonationProfile};
use crate::repositories::conversations::ConversationRepository;
use crate::settings::Timing;

pub enum AssistantRequest {
    SendMessage {
        conversation_id: Option<Uuid>,
        text: String,
        response: oneshot::Sender<Result<ChatExchange, ServiceError>>,
    },
    GetTranscript {
        conversation_id: Uuid,
        response: oneshot::Sender<Result<Vec<ChatMessage>, ServiceError>>,
    },
    Recommend {
        response: oneshot::Sender<Result<DonationProfile, ServiceError>>,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatExchange {
    pub conversation_id: Uuid,
    pub message: ChatMessage,
    pub reply: ChatMessage,
}

#[derive(Clone)]
pub struct AssistantRequestHandler {
    conversations: ConversationRepository,
    typing_delay_ms: (u64, u64),
    recommendation_delay: Duration,
    conversation_ttl: Duration,
}

impl AssistantRequestHandler {
    pub fn new(timing: &Timing) -> Self {
        let min = timing.typing_delay_min_ms;
        let max = timing.typing_delay_max_ms.max(min);

        Self {
            conversations: ConversationRepository::new(),
            typing_delay_ms: (min, max),
            recommendation_delay: Duration::from_millis(timing.recommendation_delay_ms),
            conversation_ttl: Duration::from_secs(timing.session_ttl_secs),
        }
    }

    pub async fn start_conversation_sweep_task(&self) {
        self.conversations
            .start_sweep_task(self.conversation_ttl)
            .await
    }

    fn typing_delay(&self) -> Duration {
        let (min, max) = self.typing_delay_ms;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    async fn send_message(
        &self,
        conversation_id: Option<Uuid>,
        text: String,
    ) -> Result<ChatExchange, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::EmptyMessage);
        }

        let conversation_id = self.conversations.get_or_start(conversation_id, Utc::now());
        let message = ChatMessage::from_user(text);
        self.conversations
            .append(&conversation_id, message.clone(), Utc::now());

        tokio::time::sleep(self.typing_delay()).await;

        let answer = chat::respond(text);
        log::debug!(
            "Conversation {} matched {:?}.",
            conversation_id,
            answer.topic
        );
        let reply = ChatMessage::from_ai(answer);
        self.conversations
            .append(&conversation_id, reply.clone(), Utc::now());

        Ok(ChatExchange {
            conversation_id,
            message,
            reply,
        })
    }

    fn transcript(&self, conversation_id: &Uuid) -> Result<Vec<ChatMessage>, ServiceError> {
        self.conversations
            .transcript(conversation_id)
            .ok_or_else(|| ServiceError::NotFound("Conversation", conversation_id.to_string()))
    }

    async fn recommend(&self) -> Result<DonationProfile, ServiceError> {
        tokio::time::sleep(self.recommendation_delay).await;

        let profile = recommendation::pick(&mut rand::thread_rng());
        Ok(profile)
    }
}

#[async_trait]
impl RequestHandler<AssistantRequest> for AssistantRequestHandler {
    async fn handle_request(&self, request: AssistantRequest) {
        match request {
            AssistantRequest::SendMessage {
                conversation_id,
                text,
                response,
            } => {
                let exchange = self.send_message(conversation_id, text).await;
                let _ = response.send(exchange);
            }
            AssistantRequest::GetTranscript {
                conversation_id,
                response,
            } => {
                let _ = response.send(self.transcript(&conversation_id));
            }
            AssistantRequest::Recommend { response } => {
                let profile = self.recommend().await;
                let _ = response.send(profile);
            }
        }
    }
}

pub struct AssistantService;

impl AssistantService {
    pub fn new() -> Self {
        AssistantService {}
    }
}

#[async_trait]
impl Service<AssistantRequest, AssistantRequestHandler> for AssistantService {}
