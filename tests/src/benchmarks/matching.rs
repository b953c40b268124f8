//! # Subscription Matching Benchmarks
//!
//! Matching is a topic lookup followed by a containment test per subscriber
//! of that topic. These benchmarks measure how that scan scales with the
//! per-topic subscriber count and with geofence shape.
//!
//! Conditions:
//! - 10 to 10 000 subscribers on one hot topic, fences scattered worldwide
//! - Many cold topics alongside, which must not affect hot-topic cost
//! - Full router path (lock, validate, fan-out) for a self-echo publish

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use geo_broker::{
    ClientId, ConnectionConfig, ControlPacket, Geofence, Location, Router, SubscriptionRegistry,
    SystemTimeSource, Topic,
};
use rand::Rng;
use std::time::Duration;

fn random_location(rng: &mut impl Rng) -> Location {
    Location::new(rng.gen_range(-89.0..89.0), rng.gen_range(-179.0..179.0))
        .expect("generated coordinates are in range")
}

/// Registry with `subscribers` circular fences on `hot` plus cold topics.
fn populated_registry(subscribers: usize, cold_topics: usize) -> SubscriptionRegistry {
    let mut rng = rand::thread_rng();
    let mut registry = SubscriptionRegistry::new();
    let hot = Topic::new("hot").expect("valid topic");

    for n in 0..subscribers {
        let client = ClientId::new(format!("sub-{n}")).expect("valid id");
        let fence = Geofence::circle(random_location(&mut rng), rng.gen_range(1_000.0..500_000.0))
            .expect("valid circle");
        registry.subscribe(&client, &hot, fence);
    }
    for n in 0..cold_topics {
        let client = ClientId::new(format!("cold-{n}")).expect("valid id");
        let topic = Topic::new(format!("cold-{n}")).expect("valid topic");
        let fence = Geofence::circle(random_location(&mut rng), 10_000.0).expect("valid circle");
        registry.subscribe(&client, &topic, fence);
    }
    registry
}

pub fn match_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("geo-broker/match/scaling");
    group.measurement_time(Duration::from_secs(5));
    let hot = Topic::new("hot").expect("valid topic");

    for subscribers in [10usize, 100, 1_000, 10_000] {
        let registry = populated_registry(subscribers, 1_000);
        let mut rng = rand::thread_rng();
        let probes: Vec<Location> = (0..64).map(|_| random_location(&mut rng)).collect();

        group.throughput(Throughput::Elements(subscribers as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &registry,
            |b, registry| {
                let mut i = 0;
                b.iter(|| {
                    i = (i + 1) % probes.len();
                    black_box(registry.match_subscribers(&hot, &probes[i]))
                })
            },
        );
    }

    group.finish();
}

pub fn containment_by_shape(c: &mut Criterion) {
    let mut group = c.benchmark_group("geo-broker/match/shape");
    let origin = Location::new(0.0, 0.0).expect("origin");
    let probe = Location::new(0.01, 0.01).expect("probe");

    let circle = Geofence::circle(origin, 5_000.0).expect("circle");
    let rectangle = Geofence::rectangle(
        Location::new(-1.0, -1.0).expect("sw"),
        Location::new(1.0, 1.0).expect("ne"),
    )
    .expect("rectangle");
    let polygon = Geofence::polygon(
        (0..32)
            .map(|k| {
                let angle = f64::from(k) * std::f64::consts::TAU / 32.0;
                Location::new(angle.sin(), angle.cos()).expect("vertex")
            })
            .collect(),
    )
    .expect("polygon");

    group.bench_function("circle_haversine", |b| {
        b.iter(|| black_box(circle.contains(black_box(&probe))))
    });
    group.bench_function("rectangle", |b| {
        b.iter(|| black_box(rectangle.contains(black_box(&probe))))
    });
    group.bench_function("polygon_32_vertices", |b| {
        b.iter(|| black_box(polygon.contains(black_box(&probe))))
    });

    group.finish();
}

pub fn router_self_echo(c: &mut Criterion) {
    let mut group = c.benchmark_group("geo-broker/router");
    let router = Router::new(ConnectionConfig::default(), Box::new(SystemTimeSource::new()));
    let client = ClientId::new("bench").expect("valid id");

    router.handle_packet(&client, ControlPacket::Connect);
    router.handle_packet(&client, ControlPacket::subscribe_circle("bench", 0.0, 0.0, 0.0));

    group.throughput(Throughput::Elements(1));
    group.bench_function("publish_self_echo", |b| {
        b.iter(|| {
            black_box(router.handle_packet(
                &client,
                ControlPacket::publish("bench", 0.0, 0.0, "payload"),
            ))
        })
    });
    group.bench_function("pingreq", |b| {
        b.iter(|| black_box(router.handle_packet(&client, ControlPacket::ping_req(0.0, 0.0))))
    });

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    match_scaling(c);
    containment_by_shape(c);
    router_self_echo(c);
}
