//! Subscription registry implementation.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::{ClientId, Geofence, Location, Topic};

/// A single (client, topic, geofence) subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub client_id: ClientId,
    pub topic: Topic,
    pub geofence: Geofence,
}

/// Topic-indexed subscription table.
///
/// Keyed by (client, topic): a client holds at most one geofence per topic.
/// A reverse index by client keeps `remove_all` proportional to that
/// client's own subscriptions.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    /// topic -> client -> geofence
    by_topic: HashMap<Topic, HashMap<ClientId, Geofence>>,
    /// client -> topics it subscribes to
    by_client: HashMap<ClientId, HashSet<Topic>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the (client, topic) subscription.
    ///
    /// Returns the geofence that was replaced, if any.
    pub fn subscribe(
        &mut self,
        client_id: &ClientId,
        topic: &Topic,
        geofence: Geofence,
    ) -> Option<Geofence> {
        self.by_client
            .entry(client_id.clone())
            .or_default()
            .insert(topic.clone());
        self.by_topic
            .entry(topic.clone())
            .or_default()
            .insert(client_id.clone(), geofence)
    }

    /// Remove the (client, topic) subscription. Idempotent.
    ///
    /// Returns true if a subscription existed.
    pub fn unsubscribe(&mut self, client_id: &ClientId, topic: &Topic) -> bool {
        let removed = self.remove_from_topic(client_id, topic);
        if let Some(topics) = self.by_client.get_mut(client_id) {
            topics.remove(topic);
            if topics.is_empty() {
                self.by_client.remove(client_id);
            }
        }
        removed
    }

    /// Remove every subscription held by `client_id`.
    ///
    /// Returns the number of subscriptions removed.
    pub fn remove_all(&mut self, client_id: &ClientId) -> usize {
        let Some(topics) = self.by_client.remove(client_id) else {
            return 0;
        };
        topics
            .iter()
            .filter(|topic| self.remove_from_topic(client_id, topic))
            .count()
    }

    /// Every client subscribed to `topic` whose geofence contains `location`.
    ///
    /// Linear in the number of subscribers of `topic`. The publisher is not
    /// excluded. A spatial index per topic would be the extension point for
    /// very large per-topic fan-in.
    pub fn match_subscribers(&self, topic: &Topic, location: &Location) -> BTreeSet<ClientId> {
        self.by_topic
            .get(topic)
            .map(|subscribers| {
                subscribers
                    .iter()
                    .filter(|(_, geofence)| geofence.contains(location))
                    .map(|(client_id, _)| client_id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Geofence of the (client, topic) subscription, if present.
    pub fn get(&self, client_id: &ClientId, topic: &Topic) -> Option<&Geofence> {
        self.by_topic.get(topic)?.get(client_id)
    }

    /// All subscriptions held by `client_id`.
    pub fn subscriptions_of(&self, client_id: &ClientId) -> Vec<Subscription> {
        let Some(topics) = self.by_client.get(client_id) else {
            return Vec::new();
        };
        topics
            .iter()
            .filter_map(|topic| {
                self.get(client_id, topic).map(|geofence| Subscription {
                    client_id: client_id.clone(),
                    topic: topic.clone(),
                    geofence: geofence.clone(),
                })
            })
            .collect()
    }

    /// Whether `client_id` holds any subscription.
    pub fn has_subscriptions(&self, client_id: &ClientId) -> bool {
        self.by_client.contains_key(client_id)
    }

    /// Total number of subscriptions.
    pub fn len(&self) -> usize {
        self.by_topic.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_topic.is_empty()
    }

    /// Number of topics with at least one subscriber.
    pub fn topic_count(&self) -> usize {
        self.by_topic.len()
    }

    /// Drop every subscription.
    pub fn clear(&mut self) -> usize {
        let removed = self.len();
        self.by_topic.clear();
        self.by_client.clear();
        removed
    }

    fn remove_from_topic(&mut self, client_id: &ClientId, topic: &Topic) -> bool {
        let Some(subscribers) = self.by_topic.get_mut(topic) else {
            return false;
        };
        let removed = subscribers.remove(client_id).is_some();
        if subscribers.is_empty() {
            self.by_topic.remove(topic);
        }
        removed
    }
}
