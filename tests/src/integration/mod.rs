//! # Integration Tests
//!
//! Drive a `BrokerRuntime` the way a transport would: attach an outbox per
//! client, submit packets, read what comes back.

pub mod load;
pub mod scenarios;

#[cfg(test)]
pub(crate) mod support {
    use std::time::Duration;

    use geo_broker::{ClientId, ClientOutbox, ControlPacket};
    use tokio::time::timeout;

    pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn id(s: &str) -> ClientId {
        ClientId::new(s).unwrap()
    }

    /// Next packet for this outbox, failing the test after `RECV_TIMEOUT`.
    pub async fn next(outbox: &mut ClientOutbox) -> ControlPacket {
        timeout(RECV_TIMEOUT, outbox.recv())
            .await
            .expect("timeout waiting for packet")
            .expect("outbox closed")
    }

    /// Assert that nothing else arrives within `window`.
    pub async fn assert_quiet(outbox: &mut ClientOutbox, window: Duration) {
        if let Ok(Some(packet)) = timeout(window, outbox.recv()).await {
            panic!("unexpected packet for {}: {packet:?}", outbox.client_id());
        }
    }
}
