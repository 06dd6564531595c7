use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use skv_client::{CacheClient, ClientError, Connection};
use skv_engine::Cache;
use skv_server::{app, AppState};

/// Serves one real cache shard on an ephemeral port.
async fn spawn_shard(secret: Option<&str>) -> String {
    let state = AppState {
        cache: Arc::new(Cache::with_sweep_interval(Duration::from_millis(50))),
        secret: secret.map(Arc::from),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.expect("serve");
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn scalar_lifecycle_on_one_shard() {
    let base = spawn_shard(None).await;
    let client = CacheClient::new(vec![Connection::new(base.as_str())]).unwrap();

    client.set("k", "v", 30).await.unwrap();
    assert_eq!(client.get("k").await.unwrap(), "v");

    client.update("k", "v2").await.unwrap();
    assert_eq!(client.get("k").await.unwrap(), "v2");

    client.update_with_ttl("k", "v3", 60).await.unwrap();
    assert_eq!(client.get("k").await.unwrap(), "v3");

    client.delete("k").await.unwrap();
    assert!(matches!(
        client.get("k").await,
        Err(ClientError::KeyNotFound)
    ));
    assert!(matches!(
        client.delete("k").await,
        Err(ClientError::KeyNotFound)
    ));
}

#[tokio::test]
async fn keys_scatter_across_shards_and_gather() {
    let first = spawn_shard(None).await;
    let second = spawn_shard(None).await;
    let client = CacheClient::new(vec![
        Connection::new(first.as_str()),
        Connection::new(second.as_str()),
    ])
    .unwrap();

    for index in 1..=10 {
        client.set(&index.to_string(), "v", 30).await.unwrap();
    }

    let mut keys = client.keys().await.unwrap();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 10);

    // Each shard holds a non-empty slice of the keyspace.
    for base in [&first, &second] {
        let single = CacheClient::new(vec![Connection::new(base.as_str())]).unwrap();
        assert!(!single.keys().await.unwrap().is_empty());
    }

    // Reads route to the same shard the writes went to.
    for index in 1..=10 {
        assert_eq!(client.get(&index.to_string()).await.unwrap(), "v");
    }
}

#[tokio::test]
async fn keys_fan_out_fails_on_unreachable_shard() {
    let live = spawn_shard(None).await;
    let client = CacheClient::new(vec![
        Connection::new(live.as_str()),
        Connection::new("http://127.0.0.1:1"),
    ])
    .unwrap();

    assert!(matches!(
        client.keys().await,
        Err(ClientError::Transport(_))
    ));
}

#[tokio::test]
async fn list_operations_round_trip() {
    let base = spawn_shard(None).await;
    let client = CacheClient::new(vec![Connection::new(base.as_str())]).unwrap();

    for value in ["a", "b", "c"] {
        client.lpush("l", value).await.unwrap();
    }
    assert_eq!(client.lrange("l", 0, 2).await.unwrap(), vec!["a", "b", "c"]);
    assert_eq!(
        client.lrange("l", 5, 1).await.unwrap(),
        Vec::<String>::new()
    );

    assert_eq!(client.lpop("l").await.unwrap(), "a");
    assert_eq!(client.rpop("l").await.unwrap(), "c");

    client.rpush("l", "front").await.unwrap();
    assert_eq!(client.lrange("l", 0, 10).await.unwrap(), vec!["front", "b"]);
}

#[tokio::test]
async fn hash_operations_round_trip() {
    let base = spawn_shard(None).await;
    let client = CacheClient::new(vec![Connection::new(base.as_str())]).unwrap();

    client.hset("h", "f", "v").await.unwrap();
    assert_eq!(client.hget("h", "f").await.unwrap(), "v");
    assert!(matches!(
        client.hget("h", "g").await,
        Err(ClientError::KeyNotFound)
    ));
    assert!(matches!(
        client.hget("m", "f").await,
        Err(ClientError::KeyNotFound)
    ));
}

#[tokio::test]
async fn shape_mismatch_surfaces_as_server_error() {
    let base = spawn_shard(None).await;
    let client = CacheClient::new(vec![Connection::new(base.as_str())]).unwrap();

    client.set("k", "v", 30).await.unwrap();
    assert!(matches!(
        client.lpush("k", "x").await,
        Err(ClientError::ServerError)
    ));
}

#[tokio::test]
async fn shared_secret_round_trip() {
    let base = spawn_shard(Some("sesame")).await;

    let authed =
        CacheClient::new(vec![Connection::with_secret(base.as_str(), "sesame")]).unwrap();
    authed.set("k", "v", 30).await.unwrap();
    assert_eq!(authed.get("k").await.unwrap(), "v");

    let anonymous = CacheClient::new(vec![Connection::new(base.as_str())]).unwrap();
    assert!(matches!(
        anonymous.get("k").await,
        Err(ClientError::UnexpectedStatus(401))
    ));
}
