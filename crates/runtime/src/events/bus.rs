//! Topic-based event bus.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};

use super::types::{ClockEvent, ProgressionEvent, QuestEvent};

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// XP, levels, prestige, achievements.
    Progression,
    /// Claims and rotation refreshes.
    Quest,
    /// Trusted clock sync results.
    Clock,
}

/// Event wrapper that carries the topic and typed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Progression(ProgressionEvent),
    Quest(QuestEvent),
    Clock(ClockEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Progression(_) => Topic::Progression,
            Event::Quest(_) => Topic::Quest,
            Event::Clock(_) => Topic::Clock,
        }
    }
}

/// Topic-based event bus.
///
/// Consumers subscribe to specific topics and only receive events they care
/// about. Publishing is best-effort: a topic without subscribers drops its
/// events, which is normal.
pub struct EventBus {
    channels: Arc<RwLock<HashMap<Topic, broadcast::Sender<Event>>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with the given capacity per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut channels = HashMap::new();
        channels.insert(Topic::Progression, broadcast::channel(capacity).0);
        channels.insert(Topic::Quest, broadcast::channel(capacity).0);
        channels.insert(Topic::Clock, broadcast::channel(capacity).0);

        Self {
            channels: Arc::new(RwLock::new(channels)),
        }
    }

    /// Publishes an event to its corresponding topic.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        // try_read to avoid blocking in async context; events are
        // best-effort.
        match self.channels.try_read() {
            Ok(channels) => {
                if let Some(tx) = channels.get(&topic)
                    && tx.send(event).is_err()
                {
                    tracing::trace!("no subscribers for topic {:?}", topic);
                }
            }
            Err(_) => {
                tracing::debug!("event bus busy, dropping event for topic {:?}", topic);
            }
        }
    }

    /// Subscribes to a single topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        let channels = self
            .channels
            .try_read()
            .expect("event channel map is only written during construction");
        channels
            .get(&topic)
            .expect("topic channel not initialized")
            .subscribe()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
