use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::payments::PaymentSession;

/// In-memory payment sessions. Nothing here outlives the process.
#[derive(Clone, Default)]
pub struct SessionRepository {
    sessions: Arc<DashMap<Uuid, PaymentSession>>,
}

impl SessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: PaymentSession) {
        self.sessions.insert(session.id, session);
    }

    pub fn get(&self, id: &Uuid) -> Option<PaymentSession> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Runs `f` on the session while holding its entry lock.
    pub fn update<F, R>(&self, id: &Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut PaymentSession) -> R,
    {
        self.sessions.get_mut(id).map(|mut entry| f(entry.value_mut()))
    }

    pub fn remove(&self, id: &Uuid) -> Option<PaymentSession> {
        self.sessions.remove(id).map(|(_, session)| session)
    }

    /// Drops sessions untouched for longer than `ttl`. Returns how many were dropped.
    pub fn sweep(&self, ttl: chrono::Duration, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| now - session.updated_at <= ttl);
        before.saturating_sub(self.sessions.len())
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
                    log::info!("Dropped {} idle payment sessions.", dropped);
                }
            }
        });

        log::info!("Payment session sweep task started");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::donations::{DonationAmount, DonationRequest, PaymentMethod};
    use crate::models::payments::PaymentStep;

    fn session(now: DateTime<Utc>) -> PaymentSession {
        let donation = DonationRequest {
            amount: DonationAmount::from_whole_rupees(50).unwrap(),
            donor_name: None,
            donor_email: None,
            payment_method: PaymentMethod::Qr,
        };
        PaymentSession::open(donation, now)
    }

    #[test]
    fn update_mutates_in_place() {
        let repository = SessionRepository::new();
        let session = session(Utc::now());
        let id = session.id;
        repository.insert(session);

        let step = repository.update(&id, |s| {
            s.close(Utc::now());
            s.step
        });

        assert_eq!(step, Some(PaymentStep::Closed));
        assert_eq!(repository.get(&id).unwrap().step, PaymentStep::Closed);
        assert!(repository.update(&Uuid::new_v4(), |_| ()).is_none());
    }

    #[test]
    fn sweep_only_drops_idle_sessions() {
        let repository = SessionRepository::new();
        let now = Utc::now();
        let an_hour_ago = now - chrono::Duration::hours(1);

        let abandoned = session(an_hour_ago);
        let mut closed_stale = session(an_hour_ago);
        closed_stale.close(an_hour_ago);
        let mut closed_fresh = session(an_hour_ago);
        closed_fresh.close(now);

        let (abandoned_id, stale_id, fresh_id) = (abandoned.id, closed_stale.id, closed_fresh.id);
        repository.insert(abandoned);
        repository.insert(closed_stale);
        repository.insert(closed_fresh);

        let dropped = repository.sweep(chrono::Duration::minutes(15), now);

        assert_eq!(dropped, 2);
        assert!(repository.get(&abandoned_id).is_none());
        assert!(repository.get(&stale_id).is_none());
        assert!(repository.get(&fresh_id).is_some());
    }
}
