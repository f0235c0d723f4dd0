//! Common test utilities

use distcache::{CacheConfig, RemoteStore};
use mockito::{Server, ServerGuard};

/// Create a mock store server for testing
#[allow(dead_code)] // Used by other test modules
pub async fn create_mock_server() -> ServerGuard {
    Server::new_async().await
}

/// Setup a remote store pointing to a mock server
#[allow(dead_code)] // Used by other test modules
pub async fn setup_remote_store() -> (RemoteStore, ServerGuard) {
    let server = create_mock_server().await;
    let config =
        CacheConfig::new(server.url(), 0).with_timeout(std::time::Duration::from_secs(5));
    let store = RemoteStore::new(config).unwrap();
    (store, server)
}
