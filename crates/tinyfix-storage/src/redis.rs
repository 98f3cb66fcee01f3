use ::redis::aio::MultiplexedConnection;
use ::redis::{RedisError, Script, Value};
use async_trait::async_trait;
use tinyfix_core::store::Result;
use tinyfix_core::{
    Compare, KvStore, StorageError, StoreKey, Txn, TxnOp, TxnOpResponse, TxnResponse, Versioned,
};
use tracing::{debug, trace, warn};

/// Default prefix for every key written by [`RedisStore`].
pub const DEFAULT_KEY_PREFIX: &str = "tinyfix:";

const PUT_SCRIPT: &str = r#"
redis.call('HSET', KEYS[1], 'value', ARGV[1])
return redis.call('HINCRBY', KEYS[1], 'version', 1)
"#;

// KEYS: compare keys, then success op keys, then failure op keys.
// ARGV: #compares, #success, #failure,
//       (kind, op, operand) per compare,
//       (kind, value) per success op, then per failure op.
const TXN_SCRIPT: &str = r#"
local ncmp = tonumber(ARGV[1])
local nsucc = tonumber(ARGV[2])
local nfail = tonumber(ARGV[3])
local keyi = 1
local argi = 4

local function holds(op, ord)
  if op == 'eq' then return ord == 0 end
  if op == 'ne' then return ord ~= 0 end
  if op == 'gt' then return ord > 0 end
  return ord < 0
end

local function order(a, b)
  if a == b then return 0 end
  if a < b then return -1 end
  return 1
end

local succeeded = true
for _ = 1, ncmp do
  local key = KEYS[keyi]
  local kind, op, operand = ARGV[argi], ARGV[argi + 1], ARGV[argi + 2]
  keyi = keyi + 1
  argi = argi + 3
  if kind == 'version' then
    local version = tonumber(redis.call('HGET', key, 'version') or '0')
    if not holds(op, order(version, tonumber(operand))) then succeeded = false end
  else
    local value = redis.call('HGET', key, 'value')
    if not value or not holds(op, order(value, operand)) then succeeded = false end
  end
end

local function run(count)
  local out = {}
  for i = 1, count do
    local key = KEYS[keyi]
    local kind, value = ARGV[argi], ARGV[argi + 1]
    keyi = keyi + 1
    argi = argi + 2
    if kind == 'put' then
      redis.call('HSET', key, 'value', value)
      out[i] = {'put', redis.call('HINCRBY', key, 'version', 1)}
    else
      local got = redis.call('HMGET', key, 'value', 'version')
      if got[1] then
        out[i] = {'get', got[1], tonumber(got[2])}
      else
        out[i] = {'get'}
      end
    end
  end
  return out
end

if succeeded then
  return {1, run(nsucc)}
end
keyi = keyi + nsucc
argi = argi + 2 * nsucc
return {0, run(nfail)}
"#;

fn map_redis_error(operation: &str, err: RedisError) -> StorageError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StorageError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Operation(message)
    }
}

fn invalid_reply(what: &str, reply: &Value) -> StorageError {
    StorageError::InvalidData(format!("unexpected {what} reply from Redis: {reply:?}"))
}

fn reply_string(value: &Value) -> Option<String> {
    match value {
        Value::BulkString(bytes) => String::from_utf8(bytes.clone()).ok(),
        Value::SimpleString(s) => Some(s.clone()),
        _ => None,
    }
}

fn reply_int(value: &Value) -> Option<u64> {
    match value {
        Value::Int(n) => u64::try_from(*n).ok(),
        other => reply_string(other).and_then(|s| s.parse().ok()),
    }
}

/// A Redis-backed implementation of [`KvStore`].
///
/// Each logical key is a Redis hash with a `value` and a `version` field,
/// stored under `{key_prefix}{StoreKey::path()}`. Writes and transactions run
/// as Lua scripts, so a transaction's compares and its writes execute as one
/// atomic step on the server.
///
/// Transactions touch several keys at once. On Redis Cluster those keys must
/// share a slot, so use a hash-tagged prefix such as `"{tinyfix}:"` there.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
    key_prefix: String,
    put_script: Script,
    txn_script: Script,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl RedisStore {
    /// Creates a new Redis store.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self::with_prefix(conn, DEFAULT_KEY_PREFIX)
    }

    /// Creates a new Redis store with a custom key prefix.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    /// * `key_prefix` - Custom prefix for store keys (e.g., "myapp:")
    pub fn with_prefix(conn: MultiplexedConnection, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
            put_script: Script::new(PUT_SCRIPT),
            txn_script: Script::new(TXN_SCRIPT),
        }
    }

    /// Opens a multiplexed connection to `redis_url` and wraps it.
    pub async fn connect(redis_url: &str, key_prefix: impl Into<String>) -> Result<Self> {
        let client = ::redis::Client::open(redis_url)
            .map_err(|e| map_redis_error("invalid Redis url", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::with_prefix(conn, key_prefix))
    }

    fn redis_key(&self, key: &StoreKey) -> String {
        format!("{}{}", self.key_prefix, key.path())
    }

    fn parse_get(
        &self,
        key: &StoreKey,
        value: Option<String>,
        version: Option<u64>,
    ) -> Result<Option<Versioned>> {
        match (value, version) {
            (Some(value), Some(version)) => Ok(Some(Versioned { value, version })),
            (None, None) => Ok(None),
            _ => Err(StorageError::InvalidData(format!(
                "entry '{}' is missing its value or version",
                self.redis_key(key)
            ))),
        }
    }

    fn parse_op_response(reply: &Value) -> Result<TxnOpResponse> {
        let Value::Array(fields) = reply else {
            return Err(invalid_reply("transaction op", reply));
        };

        match fields.first().and_then(reply_string).as_deref() {
            Some("put") => fields
                .get(1)
                .and_then(reply_int)
                .map(|version| TxnOpResponse::Put { version })
                .ok_or_else(|| invalid_reply("put", reply)),
            Some("get") if fields.len() == 1 => Ok(TxnOpResponse::Get(None)),
            Some("get") => {
                let value = fields.get(1).and_then(reply_string);
                let version = fields.get(2).and_then(reply_int);
                match (value, version) {
                    (Some(value), Some(version)) => {
                        Ok(TxnOpResponse::Get(Some(Versioned { value, version })))
                    }
                    _ => Err(invalid_reply("get", reply)),
                }
            }
            _ => Err(invalid_reply("transaction op", reply)),
        }
    }

    fn parse_txn_reply(reply: &Value) -> Result<TxnResponse> {
        let Value::Array(parts) = reply else {
            return Err(invalid_reply("transaction", reply));
        };

        let succeeded = match parts.first().and_then(reply_int) {
            Some(1) => true,
            Some(0) => false,
            _ => return Err(invalid_reply("transaction", reply)),
        };

        let responses = match parts.get(1) {
            Some(Value::Array(ops)) => ops
                .iter()
                .map(Self::parse_op_response)
                .collect::<Result<Vec<_>>>()?,
            // Lua turns an empty table into an empty array or nil depending on version.
            Some(Value::Nil) | None => Vec::new(),
            Some(_) => return Err(invalid_reply("transaction", reply)),
        };

        Ok(TxnResponse {
            succeeded,
            responses,
        })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<Versioned>> {
        let redis_key = self.redis_key(key);
        trace!(key = %redis_key, "Reading entry from Redis");

        let mut conn = self.conn.clone();
        let (value, version): (Option<String>, Option<u64>) = ::redis::cmd("HMGET")
            .arg(&redis_key)
            .arg("value")
            .arg("version")
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                warn!(key = %redis_key, error = %e, "Redis error on get");
                map_redis_error("failed to read entry from Redis", e)
            })?;

        self.parse_get(key, value, version)
    }

    async fn put(&self, key: &StoreKey, value: String) -> Result<u64> {
        let redis_key = self.redis_key(key);
        trace!(key = %redis_key, "Writing entry to Redis");

        let mut conn = self.conn.clone();
        let version: u64 = self
            .put_script
            .key(&redis_key)
            .arg(value)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                warn!(key = %redis_key, error = %e, "Redis error on put");
                map_redis_error("failed to write entry to Redis", e)
            })?;

        debug!(key = %redis_key, version, "Wrote entry to Redis");
        Ok(version)
    }

    async fn txn(&self, txn: Txn) -> Result<TxnResponse> {
        let mut invocation = self.txn_script.prepare_invoke();
        invocation
            .arg(txn.compares().len())
            .arg(txn.success().len())
            .arg(txn.failure().len());

        for compare in txn.compares() {
            invocation.key(self.redis_key(compare.key()));
            match compare {
                Compare::Version { op, version, .. } => {
                    invocation.arg("version").arg(op.as_str()).arg(*version);
                }
                Compare::Value { op, value, .. } => {
                    invocation.arg("value").arg(op.as_str()).arg(value.as_str());
                }
            }
        }

        for op in txn.success().iter().chain(txn.failure()) {
            match op {
                TxnOp::Put { key, value } => {
                    invocation.key(self.redis_key(key));
                    invocation.arg("put").arg(value.as_str());
                }
                TxnOp::Get { key } => {
                    invocation.key(self.redis_key(key));
                    invocation.arg("get").arg("");
                }
            }
        }

        let mut conn = self.conn.clone();
        let reply: Value = invocation.invoke_async(&mut conn).await.map_err(|e| {
            warn!(error = %e, "Redis error on transaction");
            map_redis_error("failed to run transaction in Redis", e)
        })?;

        let response = Self::parse_txn_reply(&reply)?;
        trace!(succeeded = response.succeeded, "Ran transaction in Redis");
        Ok(response)
    }
}
