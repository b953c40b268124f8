//! # Routing Scenarios
//!
//! End-to-end checks through the runtime:
//!
//! 1. **Self echo**: a client subscribed to its own topic with a zero-radius
//!    fence receives its own publish exactly once
//! 2. **Zone**: a 5 km fence admits a publisher a few meters away and rejects
//!    one on another continent
//! 3. **Stale expiry**: a silent client is disconnected by the sweep and
//!    stops matching
//! 4. **Ordering**: a SUBSCRIBE before CONNECT is rejected and creates nothing
//! 5. **Shutdown**: every connected client gets a DISCONNECT and all state
//!    is released

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use geo_broker::{
        AckPayload, BrokerApi, BrokerConfig, BrokerRuntime, ConnectionConfig, ControlPacket,
        ControllableTimeSource, ReasonCode, SystemTimeSource,
    };

    use crate::integration::support::{assert_quiet, id, next};

    /// Fast sweep and drain, but a wall-clock heartbeat long enough that
    /// nothing expires mid-test.
    fn start_runtime() -> BrokerRuntime {
        let config = BrokerConfig {
            connection: ConnectionConfig::default(),
            ..BrokerConfig::for_testing()
        };
        BrokerRuntime::start(config, Box::new(SystemTimeSource::new())).unwrap()
    }

    #[tokio::test]
    async fn test_self_subscription_receives_one_echo() {
        let runtime = start_runtime();
        let mut c1 = runtime.attach(id("c1"));

        runtime.submit(id("c1"), ControlPacket::Connect).await.unwrap();
        runtime
            .submit(id("c1"), ControlPacket::subscribe_circle("c1", 0.0, 0.0, 0.0))
            .await
            .unwrap();
        runtime
            .submit(id("c1"), ControlPacket::publish("c1", 0.0, 0.0, "echo"))
            .await
            .unwrap();

        assert_eq!(next(&mut c1).await, ControlPacket::ConnAck(AckPayload::success()));
        assert_eq!(next(&mut c1).await, ControlPacket::SubAck(AckPayload::success()));
        assert_eq!(next(&mut c1).await, ControlPacket::PubAck(AckPayload::success()));
        assert_eq!(
            next(&mut c1).await,
            ControlPacket::publish("c1", 0.0, 0.0, "echo")
        );
        assert_quiet(&mut c1, Duration::from_millis(100)).await;

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_zone_subscription_filters_by_distance() {
        let runtime = start_runtime();
        let mut c2 = runtime.attach(id("c2"));
        let mut c3 = runtime.attach(id("c3"));

        runtime.submit(id("c2"), ControlPacket::Connect).await.unwrap();
        runtime.submit(id("c3"), ControlPacket::Connect).await.unwrap();
        runtime
            .submit(
                id("c2"),
                ControlPacket::subscribe_circle("zone", 10.0, 10.0, 5_000.0),
            )
            .await
            .unwrap();
        next(&mut c2).await;
        next(&mut c2).await;
        next(&mut c3).await;

        // ~11 m east of the center
        runtime
            .submit(id("c3"), ControlPacket::publish("zone", 10.0, 10.0001, "near"))
            .await
            .unwrap();
        assert_eq!(next(&mut c3).await, ControlPacket::PubAck(AckPayload::success()));
        assert_eq!(
            next(&mut c2).await,
            ControlPacket::publish("zone", 10.0, 10.0001, "near")
        );

        runtime
            .submit(id("c3"), ControlPacket::publish("zone", 50.0, 50.0, "far"))
            .await
            .unwrap();
        assert_eq!(
            next(&mut c3).await,
            ControlPacket::PubAck(AckPayload::success_with(ReasonCode::NoMatchingSubscribers))
        );
        assert_quiet(&mut c2, Duration::from_millis(100)).await;

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_stale_session_expires_without_disconnect() {
        let clock = ControllableTimeSource::from_secs(1_000);
        let runtime =
            BrokerRuntime::start(BrokerConfig::for_testing(), Box::new(clock.clone())).unwrap();
        let mut quiet = runtime.attach(id("quiet"));
        let mut publisher = runtime.attach(id("pub"));

        runtime.submit(id("quiet"), ControlPacket::Connect).await.unwrap();
        runtime
            .submit(id("quiet"), ControlPacket::subscribe_circle("t", 0.0, 0.0, 100.0))
            .await
            .unwrap();
        next(&mut quiet).await;
        next(&mut quiet).await;

        // Testing heartbeat timeout is 2s
        clock.advance_secs(3);
        assert_eq!(next(&mut quiet).await, ControlPacket::Disconnect);
        assert!(!runtime.router().is_connected(&id("quiet")));
        assert!(runtime.router().subscriptions_of(&id("quiet")).is_empty());

        runtime.submit(id("pub"), ControlPacket::Connect).await.unwrap();
        runtime
            .submit(id("pub"), ControlPacket::publish("t", 0.0, 0.0, "anyone?"))
            .await
            .unwrap();
        next(&mut publisher).await;
        assert_eq!(
            next(&mut publisher).await,
            ControlPacket::PubAck(AckPayload::success_with(ReasonCode::NoMatchingSubscribers))
        );
        assert_quiet(&mut quiet, Duration::from_millis(100)).await;

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_subscribe_before_connect_is_rejected() {
        let runtime = start_runtime();
        let mut c1 = runtime.attach(id("c1"));

        runtime
            .submit(id("c1"), ControlPacket::subscribe_circle("t", 0.0, 0.0, 10.0))
            .await
            .unwrap();

        assert_eq!(
            next(&mut c1).await,
            ControlPacket::SubAck(AckPayload::failure(ReasonCode::NotConnected))
        );
        assert!(runtime.router().subscriptions_of(&id("c1")).is_empty());
        assert_eq!(runtime.router().stats().subscriptions, 0);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_disconnects_everyone() {
        let runtime = start_runtime();
        let mut outboxes = Vec::new();
        for n in 0..5 {
            let client = id(&format!("client-{n}"));
            let mut outbox = runtime.attach(client.clone());
            runtime.submit(client.clone(), ControlPacket::Connect).await.unwrap();
            runtime
                .submit(client, ControlPacket::subscribe_circle("all", 0.0, 0.0, 1_000.0))
                .await
                .unwrap();
            next(&mut outbox).await;
            next(&mut outbox).await;
            outboxes.push(outbox);
        }
        assert_eq!(runtime.router().stats().connected_sessions, 5);

        runtime.shutdown().await;

        for outbox in &mut outboxes {
            assert_eq!(next(outbox).await, ControlPacket::Disconnect);
            assert!(outbox.recv().await.is_none());
        }
        let stats = runtime.router().stats();
        assert_eq!(stats.connected_sessions, 0);
        assert_eq!(stats.subscriptions, 0);
    }
}
