//! Topic Store Tests
//!
//! Validates the node-local topic table: idempotent creation, append-only
//! publish ordering, absent-topic semantics, subscriber handling, and safety
//! under concurrent publishers.

#[cfg(test)]
mod tests {
    use crate::topics::store::{TopicError, TopicStore};
    use std::sync::Arc;

    // ============================================================
    // CREATION
    // ============================================================

    #[test]
    fn test_create_topic_is_idempotent() {
        let store = TopicStore::new();

        assert!(store.create_topic("orders"), "first create is new");
        assert!(!store.create_topic("orders"), "second create is a no-op");

        assert_eq!(store.topic_count(), 1);
        assert!(store.fetch_messages("orders").is_empty());
        assert_eq!(store.subscriber_count("orders"), Some(0));
    }

    #[test]
    fn test_recreate_does_not_wipe_state() {
        let store = TopicStore::new();
        store.create_topic("orders");
        store.publish("orders", "A").unwrap();
        store.subscribe("orders", "s1").unwrap();

        store.create_topic("orders");

        assert_eq!(store.fetch_messages("orders"), vec!["A".to_string()]);
        assert_eq!(store.subscriber_count("orders"), Some(1));
    }

    // ============================================================
    // PUBLISH / FETCH
    // ============================================================

    #[test]
    fn test_publish_preserves_order() {
        let store = TopicStore::new();
        store.create_topic("orders");

        store.publish("orders", "m1").unwrap();
        store.publish("orders", "m2").unwrap();
        store.publish("orders", "m3").unwrap();

        assert_eq!(
            store.fetch_messages("orders"),
            vec!["m1".to_string(), "m2".to_string(), "m3".to_string()]
        );
    }

    #[test]
    fn test_publish_to_missing_topic_fails() {
        let store = TopicStore::new();

        let result = store.publish("missing", "x");
        assert_eq!(result, Err(TopicError::TopicNotFound("missing".to_string())));
    }

    #[test]
    fn test_fetch_missing_topic_is_empty_not_error() {
        let store = TopicStore::new();
        assert!(store.fetch_messages("missing").is_empty());
    }

    #[test]
    fn test_publish_returns_subscriber_count() {
        let store = TopicStore::new();
        store.create_topic("orders");
        store.subscribe("orders", "s1").unwrap();
        store.subscribe("orders", "s2").unwrap();

        let notified = store.publish("orders", "hello").unwrap();
        assert_eq!(notified, 2);
    }

    // ============================================================
    // SUBSCRIBERS
    // ============================================================

    #[test]
    fn test_subscribe_is_idempotent() {
        let store = TopicStore::new();
        store.create_topic("orders");

        store.subscribe("orders", "s1").unwrap();
        store.subscribe("orders", "s1").unwrap();

        assert_eq!(store.subscriber_count("orders"), Some(1));
    }

    #[test]
    fn test_subscribe_to_missing_topic_fails() {
        let store = TopicStore::new();

        let result = store.subscribe("missing", "s1");
        assert_eq!(result, Err(TopicError::TopicNotFound("missing".to_string())));
    }

    // ============================================================
    // DIRECTORY LISTING
    // ============================================================

    #[test]
    fn test_dump_maps_names_to_logs() {
        let store = TopicStore::new();
        store.create_topic("orders");
        store.create_topic("alerts");
        store.publish("orders", "A").unwrap();

        let dump = store.dump();
        assert_eq!(dump.len(), 2);
        assert_eq!(dump["orders"], vec!["A".to_string()]);
        assert!(dump["alerts"].is_empty());

        let mut names = store.topic_names();
        names.sort();
        assert_eq!(names, vec!["alerts".to_string(), "orders".to_string()]);
    }

    // ============================================================
    // REPLICA APPLY
    // ============================================================

    #[test]
    fn test_replica_apply_creates_missing_topic() {
        let store = TopicStore::new();

        store.apply_replica_message("orders", "A");
        store.apply_replica_message("orders", "B");

        assert_eq!(
            store.fetch_messages("orders"),
            vec!["A".to_string(), "B".to_string()]
        );
    }

    // ============================================================
    // CONCURRENCY
    // ============================================================

    #[tokio::test]
    async fn test_concurrent_publishes_lose_nothing() {
        let store = Arc::new(TopicStore::new());
        store.create_topic("orders");

        let mut handles = Vec::new();
        for i in 0..100 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.publish("orders", &format!("msg-{}", i)).unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let messages = store.fetch_messages("orders");
        assert_eq!(messages.len(), 100, "no message lost or duplicated");

        let mut sorted: Vec<String> = messages.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 100, "every message appears exactly once");
    }

    #[tokio::test]
    async fn test_concurrent_subscribes_stay_unique() {
        let store = Arc::new(TopicStore::new());
        store.create_topic("orders");

        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.subscribe("orders", "s1").unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.subscriber_count("orders"), Some(1));
    }
}
