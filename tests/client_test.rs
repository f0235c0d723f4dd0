//! Wire-level tests for the remote store backend

mod common;

#[cfg(test)]
mod tests {
    use super::common::{create_mock_server, setup_remote_store};
    use distcache::{CacheConfig, CacheError, RemoteStore, StoreBackend};
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_set_sends_base64_payload() {
        let (store, mut server) = setup_remote_store().await;

        let mock = server
            .mock("POST", "/api/v1/command")
            .match_body(Matcher::PartialJson(json!({
                "command": "kv.set",
                "payload": {
                    "key": "user:1",
                    "db": 0,
                    "value": "AQID",
                    "ttl": 60
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "payload": {}}"#)
            .create_async()
            .await;

        store
            .set("user:1", vec![1, 2, 3], Some(Duration::from_secs(60)))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_without_ttl() {
        let (store, mut server) = setup_remote_store().await;

        let mock = server
            .mock("POST", "/api/v1/command")
            .match_body(Matcher::PartialJson(json!({
                "command": "kv.set",
                "payload": {"key": "k", "db": 0, "ttl": null}
            })))
            .with_status(200)
            .with_body(r#"{"success": true, "payload": {}}"#)
            .create_async()
            .await;

        store.set("k", vec![0xFF], None).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_found() {
        let (store, mut server) = setup_remote_store().await;

        let mock = server
            .mock("POST", "/api/v1/command")
            .match_body(Matcher::PartialJson(json!({
                "command": "kv.get",
                "payload": {"key": "user:1", "db": 0}
            })))
            .with_status(200)
            .with_body(r#"{"success": true, "payload": "AQID"}"#)
            .create_async()
            .await;

        let bytes = store.get("user:1").await.unwrap();
        assert_eq!(bytes, Some(vec![1, 2, 3]));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let (store, mut server) = setup_remote_store().await;

        let mock = server
            .mock("POST", "/api/v1/command")
            .with_status(200)
            .with_body(r#"{"success": true, "payload": null}"#)
            .create_async()
            .await;

        let bytes = store.get("nonexistent").await.unwrap();
        assert_eq!(bytes, None);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_invalid_base64() {
        let (store, mut server) = setup_remote_store().await;

        let _mock = server
            .mock("POST", "/api/v1/command")
            .with_status(200)
            .with_body(r#"{"success": true, "payload": "not base64!!!"}"#)
            .create_async()
            .await;

        let err = store.get("k").await.unwrap_err();
        assert!(matches!(err, CacheError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_string_accessors() {
        let (store, mut server) = setup_remote_store().await;

        let set_mock = server
            .mock("POST", "/api/v1/command")
            .match_body(Matcher::PartialJson(json!({
                "command": "kv.setstr",
                "payload": {"key": "greeting", "db": 0, "value": "hello"}
            })))
            .with_status(200)
            .with_body(r#"{"success": true, "payload": {}}"#)
            .create_async()
            .await;

        store.set_string("greeting", "hello", None).await.unwrap();
        set_mock.assert_async().await;

        let get_mock = server
            .mock("POST", "/api/v1/command")
            .match_body(Matcher::PartialJson(json!({
                "command": "kv.getstr",
                "payload": {"key": "greeting", "db": 0}
            })))
            .with_status(200)
            .with_body(r#"{"success": true, "payload": "hello"}"#)
            .create_async()
            .await;

        let text = store.get_string("greeting").await.unwrap();
        assert_eq!(text, Some("hello".to_string()));
        get_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_remove() {
        let (store, mut server) = setup_remote_store().await;

        let mock = server
            .mock("POST", "/api/v1/command")
            .match_body(Matcher::PartialJson(json!({
                "command": "kv.del",
                "payload": {"key": "user:1", "db": 0}
            })))
            .with_status(200)
            .with_body(r#"{"success": true, "payload": {"deleted": true}}"#)
            .create_async()
            .await;

        store.remove("user:1").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_prefix_and_database_on_the_wire() {
        let mut server = create_mock_server().await;
        let config = CacheConfig::new(server.url(), 3)
            .with_prefix("orders")
            .with_timeout(Duration::from_secs(5));
        let store = RemoteStore::new(config).unwrap();

        let mock = server
            .mock("POST", "/api/v1/command")
            .match_body(Matcher::PartialJson(json!({
                "command": "kv.get",
                "payload": {"key": "orders:pending", "db": 3}
            })))
            .with_status(200)
            .with_body(r#"{"success": true, "payload": null}"#)
            .create_async()
            .await;

        assert_eq!(store.get("pending").await.unwrap(), None);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_propagates() {
        let (store, mut server) = setup_remote_store().await;

        let _mock = server
            .mock("POST", "/api/v1/command")
            .with_status(200)
            .with_body(r#"{"success": false, "error": "database is loading"}"#)
            .create_async()
            .await;

        let err = store.get("k").await.unwrap_err();
        match err {
            CacheError::StoreError(msg) => assert_eq!(msg, "database is loading"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_failure_propagates() {
        let (store, mut server) = setup_remote_store().await;

        let _mock = server
            .mock("POST", "/api/v1/command")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let err = store.set("k", vec![1], None).await.unwrap_err();
        assert!(matches!(err, CacheError::StoreError(_)));
    }
}
