//! Fire-and-forget order notifications over a tokio broadcast channel.
//!
//! Events are emitted only after the owning transaction commits. A send
//! with no live subscribers is logged and swallowed; notification
//! delivery never affects order processing.

use crate::config::Config;
use crate::models::OrderStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::warn;

pub const NOTIFY_CHANNEL_CAPACITY: usize = 1024;

/// Post-commit order events, ready for serialization toward clients.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum NotifyEvent {
    OrderCreated {
        order_id: String,
        total: Decimal,
        created_at: DateTime<Utc>,
    },
    StatusChanged {
        order_id: String,
        status: OrderStatus,
    },
}

#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<NotifyEvent>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_capacity(NOTIFY_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Channel backlog taken from `NOTIFY_CHANNEL_CAPACITY` via [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::with_capacity(config.notify_channel_capacity)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotifyEvent> {
        self.tx.subscribe()
    }

    /// Best-effort send. Slow or absent receivers never block the caller.
    pub fn broadcast(&self, event: NotifyEvent) {
        if self.tx.send(event).is_err() {
            warn!("Notification broadcast failed: no active receivers");
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_receives_event() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        let event = NotifyEvent::StatusChanged {
            order_id: "o1".to_string(),
            status: OrderStatus::Completed,
        };
        notifier.broadcast(event.clone());

        assert_eq!(rx.try_recv().unwrap(), event);
    }

    #[test]
    fn test_broadcast_without_receivers_does_not_panic() {
        let notifier = Notifier::new();
        notifier.broadcast(NotifyEvent::StatusChanged {
            order_id: "o1".to_string(),
            status: OrderStatus::Delivered,
        });
    }

    #[test]
    fn test_capacity_comes_from_config() {
        let config = Config {
            work_dir: "./work_dir".to_string(),
            log_level: "info".to_string(),
            environment: "development".to_string(),
            notify_channel_capacity: 1,
        };
        let notifier = Notifier::from_config(&config);
        let mut rx = notifier.subscribe();

        // With a backlog of one, the second send evicts the first.
        for status in [OrderStatus::Completed, OrderStatus::Delivered] {
            notifier.broadcast(NotifyEvent::StatusChanged {
                order_id: "o1".to_string(),
                status,
            });
        }

        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Lagged(1))
        ));
        assert_eq!(
            rx.try_recv().unwrap(),
            NotifyEvent::StatusChanged {
                order_id: "o1".to_string(),
                status: OrderStatus::Delivered,
            }
        );
    }

    #[test]
    fn test_each_subscriber_gets_its_own_copy() {
        let notifier = Notifier::new();
        let mut rx1 = notifier.subscribe();
        let mut rx2 = notifier.subscribe();

        notifier.broadcast(NotifyEvent::OrderCreated {
            order_id: "o1".to_string(),
            total: Decimal::new(1500, 2),
            created_at: Utc::now(),
        });

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }
}
