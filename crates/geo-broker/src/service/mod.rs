//! # Message Router
//!
//! Drives the per-client protocol state machine:
//!
//! | State | Packet | Action | Next |
//! |---|---|---|---|
//! | UNCONNECTED | CONNECT | create session, CONNACK(success) | CONNECTED |
//! | UNCONNECTED | any other | negative ack | UNCONNECTED |
//! | CONNECTED | CONNECT | CONNACK(AlreadyConnected) | CONNECTED |
//! | CONNECTED | SUBSCRIBE | insert or replace, SUBACK | CONNECTED |
//! | CONNECTED | UNSUBSCRIBE | remove if present, SUBACK | CONNECTED |
//! | CONNECTED | PUBLISH | match, PUBACK + PUBLISH to each recipient | CONNECTED |
//! | CONNECTED | PINGREQ | record location, PINGRESP | CONNECTED |
//! | CONNECTED | DISCONNECT | disconnect + drop subscriptions | DISCONNECTED |
//! | DISCONNECTED | CONNECT | reactivate session, CONNACK(success) | CONNECTED |
//!
//! Every packet refreshes the sender's liveness before dispatch. The sweep
//! (`expire_stale`, `purge_disconnected`) runs on the host's timer.

mod core;
mod dispatch;
mod maintenance;

pub use core::{BrokerStats, Router};
pub use maintenance::SweepReport;
