//! # Subscription Registry (Geofence Matcher)
//!
//! Indexes subscriptions by topic and resolves the recipients of a publish:
//! every subscriber of the topic whose geofence contains the publisher's
//! location.
//!
//! Topic lookup is a hash probe; within a topic each subscriber's geofence
//! is tested in turn. No spatial index is kept.

mod registry;

pub use registry::{Subscription, SubscriptionRegistry};
