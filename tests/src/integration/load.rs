//! # Concurrent Load
//!
//! Reproduces the load-generation pattern clients use against the broker:
//! each client connects, subscribes to a topic named after itself with a
//! zero-radius fence at the origin, then runs rounds of PINGREQ + PUBLISH to
//! that topic from the origin.
//!
//! Per client the expected traffic is exactly `3 × rounds + 2` packets:
//! one CONNACK, one SUBACK, and per round a PINGRESP, a PUBACK and the
//! PUBLISH echo.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use geo_broker::{
        BrokerApi, BrokerConfig, BrokerRuntime, ControlPacket, PacketType, SystemTimeSource,
    };
    use rand::Rng;

    use crate::integration::support::{assert_quiet, id, next};

    const CLIENTS: usize = 10;
    const ROUNDS: usize = 1_000;

    async fn run_client(runtime: Arc<BrokerRuntime>, name: String) -> HashMap<PacketType, usize> {
        let client = id(&name);
        let mut outbox = runtime.attach(client.clone());

        runtime.submit(client.clone(), ControlPacket::Connect).await.unwrap();
        runtime
            .submit(
                client.clone(),
                ControlPacket::subscribe_circle(name.as_str(), 0.0, 0.0, 0.0),
            )
            .await
            .unwrap();

        for round in 0..ROUNDS {
            runtime
                .submit(client.clone(), ControlPacket::ping_req(0.0, 0.0))
                .await
                .unwrap();
            runtime
                .submit(
                    client.clone(),
                    ControlPacket::publish(name.as_str(), 0.0, 0.0, format!("{name}-{round}")),
                )
                .await
                .unwrap();
        }

        let mut counts = HashMap::new();
        for _ in 0..(3 * ROUNDS + 2) {
            let packet = next(&mut outbox).await;
            *counts.entry(packet.packet_type()).or_insert(0) += 1;
        }
        assert_quiet(&mut outbox, Duration::from_millis(200)).await;
        counts
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_self_publish_accounting() {
        let config = BrokerConfig {
            worker_count: 4,
            ..BrokerConfig::default()
        };
        let runtime =
            Arc::new(BrokerRuntime::start(config, Box::new(SystemTimeSource::new())).unwrap());

        let handles: Vec<_> = (0..CLIENTS)
            .map(|n| tokio::spawn(run_client(Arc::clone(&runtime), format!("client-{n}"))))
            .collect();

        for handle in handles {
            let counts = handle.await.unwrap();
            assert_eq!(counts.values().sum::<usize>(), 3 * ROUNDS + 2);
            assert_eq!(counts[&PacketType::ConnAck], 1);
            assert_eq!(counts[&PacketType::SubAck], 1);
            assert_eq!(counts[&PacketType::PingResp], ROUNDS);
            assert_eq!(counts[&PacketType::PubAck], ROUNDS);
            assert_eq!(counts[&PacketType::Publish], ROUNDS);
        }

        let stats = runtime.router().stats();
        assert_eq!(stats.connected_sessions, CLIENTS);
        assert_eq!(stats.publishes_delivered, (CLIENTS * ROUNDS) as u64);

        runtime.shutdown().await;
    }

    /// Echo content arrives in publish order for each client.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_per_sender_order_is_preserved() {
        let runtime = Arc::new(
            BrokerRuntime::start(BrokerConfig::default(), Box::new(SystemTimeSource::new()))
                .unwrap(),
        );
        let client = id("ordered");
        let mut outbox = runtime.attach(client.clone());
        runtime.submit(client.clone(), ControlPacket::Connect).await.unwrap();
        runtime
            .submit(client.clone(), ControlPacket::subscribe_circle("ordered", 0.0, 0.0, 50.0))
            .await
            .unwrap();
        next(&mut outbox).await;
        next(&mut outbox).await;

        // Jitter inside the fence so locations differ between publishes
        let mut rng = rand::thread_rng();
        let sent: Vec<String> = (0..200).map(|n| format!("msg-{n}")).collect();
        for content in &sent {
            let lat = rng.gen_range(-0.0001..0.0001);
            runtime
                .submit(
                    client.clone(),
                    ControlPacket::publish("ordered", lat, 0.0, content.as_str()),
                )
                .await
                .unwrap();
        }

        let mut received = Vec::new();
        while received.len() < sent.len() {
            if let ControlPacket::Publish(payload) = next(&mut outbox).await {
                received.push(payload.content);
            }
        }
        assert_eq!(received, sent);

        runtime.shutdown().await;
    }
}
