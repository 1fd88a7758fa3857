//! # End-to-End Worker Flow
//!
//! Background poller → in-memory store → status monitor, wired by
//! `WorkerRuntime` the same way the binary does it. Time is paused and
//! advanced by the tokio test clock.
//!
//! ```text
//! BackgroundPoller ──set──→ InMemoryStore ──notify──→ SubscriptionRegistry ──→ StatusMonitor
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use tokio::sync::watch;

    use shared_store::{
        Decoded, InMemoryStore, ScopedStoreApi, ScopedStoreClient, StoreContext, StoreScope,
        StoreTransport, SubscriptionRegistry,
    };
    use store_telemetry::{encode_metrics, register_metrics, WORKER_TICKS};
    use worker_runtime::{
        BackgroundPoller, StatusMonitor, TickData, WorkerConfig, WorkerRuntime, WorkerStatus,
        HISTORY_LIMIT, TASK_LABELS, TICK_INTERVAL, WORKER_STATE_KEY,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn worker_runtime() -> (Arc<InMemoryStore>, WorkerRuntime) {
        let transport = Arc::new(InMemoryStore::new());
        let config = WorkerConfig::from_lookup(|name| match name {
            "SDK_APPLICATION_INSTANCE" => Some("display-01".to_string()),
            _ => None,
        });
        let runtime = WorkerRuntime::new(config, transport.clone()).with_seed(2026);
        (transport, runtime)
    }

    async fn stored_status(transport: &InMemoryStore) -> WorkerStatus {
        let raw = transport
            .get(&StoreScope::Instance, WORKER_STATE_KEY)
            .await
            .unwrap()
            .expect("worker_state should be written");
        serde_json::from_str(&raw).unwrap()
    }

    // =============================================================================
    // E2E TESTS
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_monitor_follows_worker_ticks() {
        let (transport, runtime) = worker_runtime();
        runtime.start().await.unwrap();

        tokio::time::sleep(TICK_INTERVAL * 3 + Duration::from_secs(1)).await;

        let monitor = runtime.monitor();
        let latest = monitor.latest().expect("monitor should have a status");
        assert_eq!(latest.tick_count, 4);
        assert_eq!(latest.message, format!("Tick #4: {}", TASK_LABELS[4]));
        assert!(latest.is_running);
        assert_eq!(stored_status(&transport).await, latest);

        let ticks: Vec<u64> = monitor.history().iter().map(|s| s.tick_count).collect();
        // "Worker started" carries tick 0
        assert_eq!(ticks, vec![4, 3, 2, 1, 0]);

        let data: TickData = serde_json::from_value(latest.data.unwrap()).unwrap();
        assert_eq!(data.task, TASK_LABELS[4]);

        let state = runtime.shutdown().await.unwrap();
        assert_eq!(state.tick_count, 4);
        assert_eq!(state.publish_failures, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_publishes_final_status() {
        let (transport, runtime) = worker_runtime();
        runtime.start().await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        runtime.shutdown().await.unwrap();

        let final_status = stored_status(&transport).await;
        assert_eq!(final_status.message, "Worker stopped");
        assert!(!final_status.is_running);
        assert_eq!(final_status.tick_count, 1);
        assert_eq!(transport.subscriber_count(&StoreScope::Instance, WORKER_STATE_KEY), 0);
        assert!(!runtime.monitor().is_attached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_capped_over_long_run() {
        let (_, runtime) = worker_runtime();
        runtime.start().await.unwrap();

        tokio::time::sleep(TICK_INTERVAL * 14 + Duration::from_secs(1)).await;

        let history = runtime.monitor().history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].tick_count, 15);
        assert_eq!(history[HISTORY_LIMIT - 1].tick_count, 6);

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_monitor_sees_current_status_first() {
        let transport = Arc::new(InMemoryStore::new());
        let client = Arc::new(ScopedStoreClient::new(
            transport.clone(),
            StoreContext::new("late-monitor"),
        ));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let poller = BackgroundPoller::with_seed(client.clone(), 9);
        let worker = tokio::spawn(poller.run(shutdown_rx));

        tokio::time::sleep(TICK_INTERVAL + Duration::from_secs(1)).await;

        let registry = Arc::new(SubscriptionRegistry::new(client.clone()));
        let monitor = StatusMonitor::new(client.clone(), registry);
        monitor.attach().await.unwrap();
        assert_eq!(monitor.latest().map(|s| s.tick_count), Some(2));
        assert_eq!(monitor.history().len(), 1);

        tokio::time::sleep(TICK_INTERVAL).await;
        assert_eq!(monitor.latest().map(|s| s.tick_count), Some(3));

        shutdown_tx.send(true).unwrap();
        worker.await.unwrap();
        monitor.detach().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_run_exported_as_metrics() {
        let _metrics = register_metrics().unwrap();
        let ticks_before = WORKER_TICKS.get();

        let (_, runtime) = worker_runtime();
        runtime.start().await.unwrap();
        tokio::time::sleep(TICK_INTERVAL + Duration::from_secs(1)).await;
        runtime.shutdown().await.unwrap();

        // other tests in this binary bump the same counters
        assert!(WORKER_TICKS.get() - ticks_before >= 2.0);

        let text = encode_metrics().unwrap();
        assert!(text.contains("sdk_worker_ticks_total"));
        assert!(text.contains("sdk_worker_publish_duration_seconds"));
        assert!(text.contains(r#"sdk_monitor_updates_total{outcome="recorded"}"#));
    }

    #[tokio::test]
    async fn test_e2e_instance_store_test_key() {
        let (_, runtime) = worker_runtime();
        let client = runtime.client();

        client
            .set(&StoreScope::Instance, "testKey", &json!({"a": 1}))
            .await
            .unwrap();
        let value = client.get(&StoreScope::Instance, "testKey").await.unwrap();

        assert_eq!(value.map(Decoded::into_value), Some(json!({"a": 1})));
        assert_eq!(client.context().instance_label(), "display-01");
    }
}
