use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::chat::ChatMessage;

struct Conversation {
    messages: Vec<ChatMessage>,
    updated_at: DateTime<Utc>,
}

impl Conversation {
    fn start(now: DateTime<Utc>) -> Self {
        Self {
            messages: vec![ChatMessage::welcome()],
            updated_at: now,
        }
    }
}

#[derive(Clone, Default)]
pub struct ConversationRepository {
    conversations: Arc<DashMap<Uuid, Conversation>>,
}

impl ConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of an existing conversation, or starts a new one with the welcome message.
    pub fn get_or_start(&self, id: Option<Uuid>, now: DateTime<Utc>) -> Uuid {
        let id = id.unwrap_or_else(Uuid::new_v4);
        self.conversations
            .entry(id)
            .or_insert_with(|| Conversation::start(now))
            .updated_at = now;
        id
    }

    pub fn append(&self, id: &Uuid, message: ChatMessage, now: DateTime<Utc>) {
        let mut conversation = self
            .conversations
            .entry(*id)
            .or_insert_with(|| Conversation::start(now));
        conversation.messages.push(message);
        conversation.updated_at = now;
    }

    pub fn transcript(&self, id: &Uuid) -> Option<Vec<ChatMessage>> {
        self.conversations
            .get(id)
            .map(|entry| entry.value().messages.clone())
    }

    /// Drops conversations idle for longer than `ttl`. Returns how many were dropped.
    pub fn sweep(&self, ttl: chrono::Duration, now: DateTime<Utc>) -> usize {
        let before = self.conversations.len();
        self.conversations
            .retain(|_, conversation| now - conversation.updated_at <= ttl);
        before.saturating_sub(self.conversations.len())
    }

    pub async fn start_sweep_task(&self, ttl: Duration) {
        let repository = self.clone();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));

            loop {
                interval.tick().await;

                let dropped = repository.sweep(ttl, Utc::now());
                if dropped > 0 {
                    log::info!("Dropped {} idle conversations.", dropped);
                }
            }
        });

        log::info!("Conversation sweep task started");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::{Sender, WELCOME_MESSAGE};

    #[test]
    fn new_conversation_starts_with_welcome() {
        let repository = ConversationRepository::new();
        let id = repository.get_or_start(None, Utc::now());

        let transcript = repository.transcript(&id).unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].sender, Sender::Ai);
        assert_eq!(transcript[0].text, WELCOME_MESSAGE);
    }

    #[test]
    fn existing_conversation_is_reused() {
        let repository = ConversationRepository::new();
        let id = repository.get_or_start(None, Utc::now());
        repository.append(&id, ChatMessage::from_user("hello"), Utc::now());

        assert_eq!(repository.get_or_start(Some(id), Utc::now()), id);
        assert_eq!(repository.transcript(&id).unwrap().len(), 2);
        assert!(repository.transcript(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn sweep_only_drops_idle_conversations() {
        let repository = ConversationRepository::new();
        let now = Utc::now();
        let an_hour_ago = now - chrono::Duration::hours(1);

        let abandoned = repository.get_or_start(None, an_hour_ago);
        let resumed = repository.get_or_start(None, an_hour_ago);
        repository.append(&resumed, ChatMessage::from_user("still there?"), now);
        let fresh = repository.get_or_start(None, now);

        let dropped = repository.sweep(chrono::Duration::minutes(15), now);

        assert_eq!(dropped, 1);
        assert!(repository.transcript(&abandoned).is_none());
        assert_eq!(repository.transcript(&resumed).unwrap().len(), 2);
        assert!(repository.transcript(&fresh).is_some());
    }
}
