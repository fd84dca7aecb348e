//! Redis quota store
//!
//! Thin wrapper over a Redis connection manager exposing the hash commands
//! used by quota tracking (HGET, HINCRBY, HSCAN).

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, instrument};

use crate::{
    config::ConnectionConfig,
    error::AppResult,
    routes::metrics::record_store_operation,
    store::{QuotaStore, ScanPage},
};

/// Redis-backed quota store
///
/// Cloning is cheap; clones share the same multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisStore {
    /// Wrap an existing connection manager
    pub fn new(conn: redis::aio::ConnectionManager) -> Self {
        Self { conn }
    }

    /// Open a new connection manager for the given configuration
    #[instrument(skip(config), fields(host = %config.host, port = config.port, db = config.db))]
    pub async fn connect(config: &ConnectionConfig) -> AppResult<Self> {
        let client = redis::Client::open(config.redis_url().as_str())?;
        let conn = redis::aio::ConnectionManager::new(client).await?;
        debug!("Connected to quota store");
        Ok(Self { conn })
    }
}

/// HSCAN reply: next cursor and raw field/value pairs
type ScanReply = (u64, Vec<(Vec<u8>, Vec<u8>)>);

fn hscan_cmd(key: &str, cursor: u64, count: usize) -> redis::Cmd {
    let mut cmd = redis::cmd("HSCAN");
    cmd.arg(key).arg(cursor).arg("COUNT").arg(count);
    cmd
}

fn outcome<T>(result: &redis::RedisResult<T>) -> &'static str {
    if result.is_ok() {
        "ok"
    } else {
        "error"
    }
}

#[async_trait]
impl QuotaStore for RedisStore {
    async fn hget(&self, key: &str, field: &str) -> AppResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: redis::RedisResult<Option<Vec<u8>>> = conn.hget(key, field).await;
        record_store_operation("hget", outcome(&result));
        Ok(result?)
    }

    async fn hincr_by(&self, key: &str, field: &str, amount: i64) -> AppResult<i64> {
        let mut conn = self.conn.clone();
        let result: redis::RedisResult<i64> = conn.hincr(key, field, amount).await;
        record_store_operation("hincrby", outcome(&result));
        Ok(result?)
    }

    async fn hscan(&self, key: &str, cursor: u64, count: usize) -> AppResult<ScanPage> {
        let mut conn = self.conn.clone();
        let result: redis::RedisResult<ScanReply> =
            hscan_cmd(key, cursor, count).query_async(&mut conn).await;
        record_store_operation("hscan", outcome(&result));
        let (cursor, entries) = result?;
        Ok(ScanPage { cursor, entries })
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let result = redis::cmd("PING").query_async::<_, String>(&mut conn).await;
        record_store_operation("ping", outcome(&result));
        result?;
        Ok(())
    }
}
