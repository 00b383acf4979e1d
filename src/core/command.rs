use crate::proto::frame::Frame;
use bytes::Bytes;

/// A command ready to be sent to Redis.
///
/// Commands are built with the builder pattern and turned into a RESP array
/// of bulk strings for transmission.
///
/// # Example
///
/// ```
/// use redkey::command::{self, Cmd};
///
/// let cmd = Cmd::new("SET").arg("key").arg("value");
/// assert_eq!(cmd, command::set("key", "value"));
/// assert_eq!(cmd.name(), b"SET");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    args: Vec<Bytes>,
}

impl Cmd {
    /// Creates a new command with the given name.
    #[inline]
    pub fn new(name: impl Into<Bytes>) -> Self {
        Self {
            args: vec![name.into()],
        }
    }

    /// Appends an argument to the command.
    #[inline]
    pub fn arg<T: Into<Bytes>>(mut self, arg: T) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends every item of `items` as an argument.
    #[inline]
    pub fn args<I, T>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        self.args.extend(items.into_iter().map(Into::into));
        self
    }

    /// The command name, as it will be sent.
    #[inline]
    pub fn name(&self) -> &[u8] {
        &self.args[0]
    }

    /// Every part of the command, name first.
    #[inline]
    pub fn parts(&self) -> &[Bytes] {
        &self.args
    }

    /// Converts the command to a RESP Array frame.
    #[inline]
    pub fn into_frame(self) -> Frame {
        Frame::Array(
            self.args
                .into_iter()
                .map(|b| Frame::BulkString(Some(b)))
                .collect(),
        )
    }
}

/// Where LINSERT places the new element relative to the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Insert just before the pivot.
    Before,
    /// Insert just after the pivot.
    After,
}

impl InsertPosition {
    fn as_str(self) -> &'static str {
        match self {
            InsertPosition::Before => "BEFORE",
            InsertPosition::After => "AFTER",
        }
    }
}

// Connection

/// Creates a PING command.
#[inline]
pub fn ping() -> Cmd {
    Cmd::new("PING")
}

/// Creates an AUTH command with password only.
#[inline]
pub fn auth(password: impl Into<Bytes>) -> Cmd {
    Cmd::new("AUTH").arg(password)
}

/// Creates an AUTH command with username and password (ACL style).
#[inline]
pub fn auth_with_username(username: impl Into<Bytes>, password: impl Into<Bytes>) -> Cmd {
    Cmd::new("AUTH").arg(username).arg(password)
}

/// Creates a SELECT command.
#[inline]
pub fn select(db: u8) -> Cmd {
    Cmd::new("SELECT").arg(db.to_string())
}

/// Creates a CLIENT SETNAME command.
#[inline]
pub fn client_setname(name: impl Into<Bytes>) -> Cmd {
    Cmd::new("CLIENT").arg("SETNAME").arg(name)
}

// Generic keys

/// Creates a DEL command for a single key.
#[inline]
pub fn del(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("DEL").arg(key)
}

/// Creates an UNLINK command for a single key.
#[inline]
pub fn unlink(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("UNLINK").arg(key)
}

/// Creates an EXISTS command for a single key.
#[inline]
pub fn exists(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("EXISTS").arg(key)
}

/// Creates a RENAME command.
#[inline]
pub fn rename(key: impl Into<Bytes>, newkey: impl Into<Bytes>) -> Cmd {
    Cmd::new("RENAME").arg(key).arg(newkey)
}

/// Creates a RENAMENX command.
#[inline]
pub fn renamenx(key: impl Into<Bytes>, newkey: impl Into<Bytes>) -> Cmd {
    Cmd::new("RENAMENX").arg(key).arg(newkey)
}

/// Creates an EXPIRE command.
#[inline]
pub fn expire(key: impl Into<Bytes>, seconds: i64) -> Cmd {
    Cmd::new("EXPIRE").arg(key).arg(seconds.to_string())
}

/// Creates a PEXPIRE command.
#[inline]
pub fn pexpire(key: impl Into<Bytes>, milliseconds: i64) -> Cmd {
    Cmd::new("PEXPIRE").arg(key).arg(milliseconds.to_string())
}

/// Creates an EXPIREAT command.
#[inline]
pub fn expireat(key: impl Into<Bytes>, timestamp: i64) -> Cmd {
    Cmd::new("EXPIREAT").arg(key).arg(timestamp.to_string())
}

/// Creates a PEXPIREAT command.
#[inline]
pub fn pexpireat(key: impl Into<Bytes>, timestamp_ms: i64) -> Cmd {
    Cmd::new("PEXPIREAT").arg(key).arg(timestamp_ms.to_string())
}

/// Creates a MOVE command.
#[inline]
pub fn move_db(key: impl Into<Bytes>, db: u8) -> Cmd {
    Cmd::new("MOVE").arg(key).arg(db.to_string())
}

/// Creates a PERSIST command.
#[inline]
pub fn persist(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("PERSIST").arg(key)
}

/// Creates a TTL command.
#[inline]
pub fn ttl(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("TTL").arg(key)
}

/// Creates a PTTL command.
#[inline]
pub fn pttl(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("PTTL").arg(key)
}

/// Creates a TYPE command.
#[inline]
pub fn key_type(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("TYPE").arg(key)
}

/// Creates a DUMP command.
#[inline]
pub fn dump(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("DUMP").arg(key)
}

// Strings

/// Creates an APPEND command.
#[inline]
pub fn append(key: impl Into<Bytes>, value: impl Into<Bytes>) -> Cmd {
    Cmd::new("APPEND").arg(key).arg(value)
}

/// Creates a BITCOUNT command over a byte range.
#[inline]
pub fn bitcount(key: impl Into<Bytes>, start: i64, stop: i64) -> Cmd {
    Cmd::new("BITCOUNT")
        .arg(key)
        .arg(start.to_string())
        .arg(stop.to_string())
}

/// Creates a GET command.
#[inline]
pub fn get(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("GET").arg(key)
}

/// Creates a SET command.
#[inline]
pub fn set(key: impl Into<Bytes>, value: impl Into<Bytes>) -> Cmd {
    Cmd::new("SET").arg(key).arg(value)
}

/// Creates a `SET key value NX` command: set only if the key is absent.
#[inline]
pub fn set_nx(key: impl Into<Bytes>, value: impl Into<Bytes>) -> Cmd {
    set(key, value).arg("NX")
}

/// Creates a SETEX command.
#[inline]
pub fn setex(key: impl Into<Bytes>, seconds: u64, value: impl Into<Bytes>) -> Cmd {
    Cmd::new("SETEX")
        .arg(key)
        .arg(seconds.to_string())
        .arg(value)
}

/// Creates a PSETEX command.
#[inline]
pub fn psetex(key: impl Into<Bytes>, milliseconds: u64, value: impl Into<Bytes>) -> Cmd {
    Cmd::new("PSETEX")
        .arg(key)
        .arg(milliseconds.to_string())
        .arg(value)
}

/// Creates a GETSET command.
#[inline]
pub fn getset(key: impl Into<Bytes>, value: impl Into<Bytes>) -> Cmd {
    Cmd::new("GETSET").arg(key).arg(value)
}

/// Creates an INCR command.
#[inline]
pub fn incr(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("INCR").arg(key)
}

/// Creates an INCRBY command.
#[inline]
pub fn incr_by(key: impl Into<Bytes>, amount: i64) -> Cmd {
    Cmd::new("INCRBY").arg(key).arg(amount.to_string())
}

/// Creates an INCRBYFLOAT command.
#[inline]
pub fn incr_by_float(key: impl Into<Bytes>, amount: f64) -> Cmd {
    Cmd::new("INCRBYFLOAT").arg(key).arg(amount.to_string())
}

/// Creates a DECR command.
#[inline]
pub fn decr(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("DECR").arg(key)
}

/// Creates a DECRBY command.
#[inline]
pub fn decr_by(key: impl Into<Bytes>, amount: i64) -> Cmd {
    Cmd::new("DECRBY").arg(key).arg(amount.to_string())
}

/// Creates a GETRANGE command.
#[inline]
pub fn getrange(key: impl Into<Bytes>, start: i64, stop: i64) -> Cmd {
    Cmd::new("GETRANGE")
        .arg(key)
        .arg(start.to_string())
        .arg(stop.to_string())
}

/// Creates a SETRANGE command.
#[inline]
pub fn setrange(key: impl Into<Bytes>, offset: u64, value: impl Into<Bytes>) -> Cmd {
    Cmd::new("SETRANGE")
        .arg(key)
        .arg(offset.to_string())
        .arg(value)
}

/// Creates a STRLEN command.
#[inline]
pub fn strlen(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("STRLEN").arg(key)
}

// Hashes

/// Creates an HDEL command.
#[inline]
pub fn hdel<I, F>(key: impl Into<Bytes>, fields: I) -> Cmd
where
    I: IntoIterator<Item = F>,
    F: Into<Bytes>,
{
    Cmd::new("HDEL").arg(key).args(fields)
}

/// Creates an HEXISTS command.
#[inline]
pub fn hexists(key: impl Into<Bytes>, field: impl Into<Bytes>) -> Cmd {
    Cmd::new("HEXISTS").arg(key).arg(field)
}

/// Creates an HGET command.
#[inline]
pub fn hget(key: impl Into<Bytes>, field: impl Into<Bytes>) -> Cmd {
    Cmd::new("HGET").arg(key).arg(field)
}

/// Creates an HGETALL command.
#[inline]
pub fn hgetall(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("HGETALL").arg(key)
}

/// Creates an HINCRBY command.
#[inline]
pub fn hincrby(key: impl Into<Bytes>, field: impl Into<Bytes>, increment: i64) -> Cmd {
    Cmd::new("HINCRBY")
        .arg(key)
        .arg(field)
        .arg(increment.to_string())
}

/// Creates an HINCRBYFLOAT command.
#[inline]
pub fn hincrbyfloat(key: impl Into<Bytes>, field: impl Into<Bytes>, increment: f64) -> Cmd {
    Cmd::new("HINCRBYFLOAT")
        .arg(key)
        .arg(field)
        .arg(increment.to_string())
}

/// Creates an HKEYS command.
#[inline]
pub fn hkeys(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("HKEYS").arg(key)
}

/// Creates an HLEN command.
#[inline]
pub fn hlen(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("HLEN").arg(key)
}

/// Creates an HMGET command.
#[inline]
pub fn hmget<I, F>(key: impl Into<Bytes>, fields: I) -> Cmd
where
    I: IntoIterator<Item = F>,
    F: Into<Bytes>,
{
    Cmd::new("HMGET").arg(key).args(fields)
}

/// Creates a multi-field HSET command.
#[inline]
pub fn hset<I, F, V>(key: impl Into<Bytes>, pairs: I) -> Cmd
where
    I: IntoIterator<Item = (F, V)>,
    F: Into<Bytes>,
    V: Into<Bytes>,
{
    pairs
        .into_iter()
        .fold(Cmd::new("HSET").arg(key), |cmd, (field, value)| {
            cmd.arg(field).arg(value)
        })
}

/// Creates an HSETNX command.
#[inline]
pub fn hsetnx(key: impl Into<Bytes>, field: impl Into<Bytes>, value: impl Into<Bytes>) -> Cmd {
    Cmd::new("HSETNX").arg(key).arg(field).arg(value)
}

/// Creates an HSTRLEN command.
#[inline]
pub fn hstrlen(key: impl Into<Bytes>, field: impl Into<Bytes>) -> Cmd {
    Cmd::new("HSTRLEN").arg(key).arg(field)
}

/// Creates an HVALS command.
#[inline]
pub fn hvals(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("HVALS").arg(key)
}

// Lists

/// Creates an LPUSH command.
#[inline]
pub fn lpush<I, T>(key: impl Into<Bytes>, elements: I) -> Cmd
where
    I: IntoIterator<Item = T>,
    T: Into<Bytes>,
{
    Cmd::new("LPUSH").arg(key).args(elements)
}

/// Creates an RPUSH command.
#[inline]
pub fn rpush<I, T>(key: impl Into<Bytes>, elements: I) -> Cmd
where
    I: IntoIterator<Item = T>,
    T: Into<Bytes>,
{
    Cmd::new("RPUSH").arg(key).args(elements)
}

/// Creates an LPUSHX command.
#[inline]
pub fn lpushx<I, T>(key: impl Into<Bytes>, elements: I) -> Cmd
where
    I: IntoIterator<Item = T>,
    T: Into<Bytes>,
{
    Cmd::new("LPUSHX").arg(key).args(elements)
}

/// Creates an RPUSHX command.
#[inline]
pub fn rpushx<I, T>(key: impl Into<Bytes>, elements: I) -> Cmd
where
    I: IntoIterator<Item = T>,
    T: Into<Bytes>,
{
    Cmd::new("RPUSHX").arg(key).args(elements)
}

/// Creates an LINDEX command.
#[inline]
pub fn lindex(key: impl Into<Bytes>, index: i64) -> Cmd {
    Cmd::new("LINDEX").arg(key).arg(index.to_string())
}

/// Creates an LINSERT command.
#[inline]
pub fn linsert(
    key: impl Into<Bytes>,
    position: InsertPosition,
    pivot: impl Into<Bytes>,
    element: impl Into<Bytes>,
) -> Cmd {
    Cmd::new("LINSERT")
        .arg(key)
        .arg(position.as_str())
        .arg(pivot)
        .arg(element)
}

/// Creates an LLEN command.
#[inline]
pub fn llen(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("LLEN").arg(key)
}

/// Creates an LPOP command.
#[inline]
pub fn lpop(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("LPOP").arg(key)
}

/// Creates an RPOP command.
#[inline]
pub fn rpop(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("RPOP").arg(key)
}

/// Creates an LSET command.
#[inline]
pub fn lset(key: impl Into<Bytes>, index: i64, element: impl Into<Bytes>) -> Cmd {
    Cmd::new("LSET")
        .arg(key)
        .arg(index.to_string())
        .arg(element)
}

/// Creates an LRANGE command.
#[inline]
pub fn lrange(key: impl Into<Bytes>, start: i64, stop: i64) -> Cmd {
    Cmd::new("LRANGE")
        .arg(key)
        .arg(start.to_string())
        .arg(stop.to_string())
}

/// Creates an LREM command.
#[inline]
pub fn lrem(key: impl Into<Bytes>, count: i64, element: impl Into<Bytes>) -> Cmd {
    Cmd::new("LREM")
        .arg(key)
        .arg(count.to_string())
        .arg(element)
}

/// Creates an LTRIM command.
#[inline]
pub fn ltrim(key: impl Into<Bytes>, start: i64, stop: i64) -> Cmd {
    Cmd::new("LTRIM")
        .arg(key)
        .arg(start.to_string())
        .arg(stop.to_string())
}

/// Creates an RPOPLPUSH command.
#[inline]
pub fn rpoplpush(source: impl Into<Bytes>, destination: impl Into<Bytes>) -> Cmd {
    Cmd::new("RPOPLPUSH").arg(source).arg(destination)
}

// Sets

/// Creates an SADD command.
#[inline]
pub fn sadd<I, T>(key: impl Into<Bytes>, members: I) -> Cmd
where
    I: IntoIterator<Item = T>,
    T: Into<Bytes>,
{
    Cmd::new("SADD").arg(key).args(members)
}

/// Creates an SCARD command.
#[inline]
pub fn scard(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("SCARD").arg(key)
}

/// Creates an SDIFF command; `key` is the set the others are subtracted from.
#[inline]
pub fn sdiff<I, T>(key: impl Into<Bytes>, others: I) -> Cmd
where
    I: IntoIterator<Item = T>,
    T: Into<Bytes>,
{
    Cmd::new("SDIFF").arg(key).args(others)
}

/// Creates an SDIFFSTORE command.
#[inline]
pub fn sdiffstore<I, T>(destination: impl Into<Bytes>, key: impl Into<Bytes>, others: I) -> Cmd
where
    I: IntoIterator<Item = T>,
    T: Into<Bytes>,
{
    Cmd::new("SDIFFSTORE").arg(destination).arg(key).args(others)
}

/// Creates an SINTER command.
#[inline]
pub fn sinter<I, T>(key: impl Into<Bytes>, others: I) -> Cmd
where
    I: IntoIterator<Item = T>,
    T: Into<Bytes>,
{
    Cmd::new("SINTER").arg(key).args(others)
}

/// Creates an SINTERSTORE command.
#[inline]
pub fn sinterstore<I, T>(destination: impl Into<Bytes>, key: impl Into<Bytes>, others: I) -> Cmd
where
    I: IntoIterator<Item = T>,
    T: Into<Bytes>,
{
    Cmd::new("SINTERSTORE").arg(destination).arg(key).args(others)
}

/// Creates an SISMEMBER command.
#[inline]
pub fn sismember(key: impl Into<Bytes>, member: impl Into<Bytes>) -> Cmd {
    Cmd::new("SISMEMBER").arg(key).arg(member)
}

/// Creates an SMEMBERS command.
#[inline]
pub fn smembers(key: impl Into<Bytes>) -> Cmd {
    Cmd::new("SMEMBERS").arg(key)
}

/// Creates an SMOVE command.
#[inline]
pub fn smove(
    source: impl Into<Bytes>,
    destination: impl Into<Bytes>,
    member: impl Into<Bytes>,
) -> Cmd {
    Cmd::new("SMOVE").arg(source).arg(destination).arg(member)
}

// Keyspace-wide

/// Creates a KEYS command.
#[inline]
pub fn keys(pattern: impl Into<Bytes>) -> Cmd {
    Cmd::new("KEYS").arg(pattern)
}

/// Creates a RANDOMKEY command.
#[inline]
pub fn randomkey() -> Cmd {
    Cmd::new("RANDOMKEY")
}

/// Creates an MGET command.
#[inline]
pub fn mget<I, T>(keys: I) -> Cmd
where
    I: IntoIterator<Item = T>,
    T: Into<Bytes>,
{
    Cmd::new("MGET").args(keys)
}

/// Creates an MSET command.
#[inline]
pub fn mset<I, K, V>(pairs: I) -> Cmd
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Bytes>,
    V: Into<Bytes>,
{
    pairs
        .into_iter()
        .fold(Cmd::new("MSET"), |cmd, (key, value)| cmd.arg(key).arg(value))
}

/// Creates an INFO command, optionally for one section.
#[inline]
pub fn info(section: Option<&str>) -> Cmd {
    let cmd = Cmd::new("INFO");
    match section {
        Some(section) => cmd.arg(section.to_string()),
        None => cmd,
    }
}
