//! In-process Redis stand-in for integration tests.
//!
//! Speaks RESP2 through the crate's own codec and keeps an in-memory
//! keyspace with sixteen logical databases, enough of the command set to
//! drive every handle operation.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use redkey::proto::codec::{Decoder, Encoder};
use redkey::proto::frame::Frame;
use redkey::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const DATABASES: usize = 16;
const WRONGTYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

type Key = Vec<u8>;

#[derive(Debug, Clone)]
enum Value {
    Str(Vec<u8>),
    Hash(BTreeMap<Key, Vec<u8>>),
    List(VecDeque<Vec<u8>>),
    Set(BTreeSet<Vec<u8>>),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Hash(_) => "hash",
            Value::List(_) => "list",
            Value::Set(_) => "set",
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Value::Str(_) => false,
            Value::Hash(h) => h.is_empty(),
            Value::List(l) => l.is_empty(),
            Value::Set(s) => s.is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

#[derive(Debug, Default)]
struct Db {
    entries: HashMap<Key, Entry>,
}

impl Db {
    fn live(&mut self, key: &[u8]) -> Option<&mut Entry> {
        let expired = self
            .entries
            .get(key)
            .and_then(|e| e.expires_at)
            .is_some_and(|at| at <= Instant::now());
        if expired {
            self.entries.remove(key);
        }
        self.entries.get_mut(key)
    }

    fn contains(&mut self, key: &[u8]) -> bool {
        self.live(key).is_some()
    }

    fn take(&mut self, key: &[u8]) -> Option<Entry> {
        self.live(key)?;
        self.entries.remove(key)
    }

    fn put(&mut self, key: Key, value: Value) {
        self.entries.insert(
            key,
            Entry {
                value,
                expires_at: None,
            },
        );
    }

    /// Drops a collection left empty by the last command.
    fn prune(&mut self, key: &[u8]) {
        if self.entries.get(key).is_some_and(|e| e.value.is_empty()) {
            self.entries.remove(key);
        }
    }
}

#[derive(Debug)]
struct Store {
    dbs: Vec<Db>,
}

impl Store {
    fn new() -> Self {
        Self {
            dbs: (0..DATABASES).map(|_| Db::default()).collect(),
        }
    }
}

/// A running mock server; aborted on drop.
pub struct MockServer {
    addr: SocketAddr,
    task: JoinHandle<()>,
    commands: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockServer {
    pub async fn start() -> Self {
        Self::start_with_password(None).await
    }

    pub async fn start_with_password(password: Option<&str>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let store = Arc::new(Mutex::new(Store::new()));
        let commands = Arc::new(Mutex::new(Vec::new()));
        let password = password.map(str::to_string);

        let log = Arc::clone(&commands);
        let task = tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let store = Arc::clone(&store);
                let log = Arc::clone(&log);
                let password = password.clone();
                tokio::spawn(serve(socket, store, log, password));
            }
        });

        Self {
            addr,
            task,
            commands,
        }
    }

    pub fn url(&self) -> String {
        format!("redis://{}", self.addr)
    }

    pub async fn client(&self) -> Arc<Client> {
        Arc::new(Client::connect(self.url()).await.unwrap())
    }

    /// Every command received so far, across connections.
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands.lock().unwrap().clone()
    }

    /// The last command received.
    pub fn last_command(&self) -> Vec<String> {
        self.commands().pop().unwrap_or_default()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct Session {
    db: usize,
    authenticated: bool,
}

async fn serve(
    mut socket: TcpStream,
    store: Arc<Mutex<Store>>,
    log: Arc<Mutex<Vec<Vec<String>>>>,
    password: Option<String>,
) {
    let mut decoder = Decoder::new();
    let mut encoder = Encoder::new();
    let mut buf = [0u8; 4096];
    let mut session = Session {
        db: 0,
        authenticated: password.is_none(),
    };

    loop {
        let n = match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        decoder.append(&buf[..n]);

        while let Ok(Some(frame)) = decoder.decode() {
            let args = match command_args(frame) {
                Some(args) if !args.is_empty() => args,
                _ => {
                    encoder.encode(&err("ERR Protocol error"));
                    continue;
                }
            };
            log.lock().unwrap().push(
                args.iter()
                    .map(|a| String::from_utf8_lossy(a).into_owned())
                    .collect(),
            );

            let reply = {
                let mut store = store.lock().unwrap();
                dispatch(&mut store, &mut session, password.as_deref(), args)
            };
            encoder.encode(&reply);
        }

        let data = encoder.take();
        if socket.write_all(&data).await.is_err() {
            return;
        }
    }
}

fn command_args(frame: Frame) -> Option<Vec<Vec<u8>>> {
    match frame {
        Frame::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Frame::BulkString(Some(b)) => Some(b.to_vec()),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

fn ok() -> Frame {
    Frame::simple("OK")
}

fn int(n: impl TryInto<i64>) -> Frame {
    Frame::Integer(n.try_into().unwrap_or(i64::MAX))
}

fn bulk(data: &[u8]) -> Frame {
    Frame::bulk(Bytes::copy_from_slice(data))
}

fn err(message: &str) -> Frame {
    Frame::error(message)
}

fn array<'a>(items: impl IntoIterator<Item = &'a Vec<u8>>) -> Frame {
    Frame::Array(items.into_iter().map(|i| bulk(i)).collect())
}

fn parse_i64(raw: &[u8]) -> Option<i64> {
    std::str::from_utf8(raw).ok()?.parse().ok()
}

fn parse_f64(raw: &[u8]) -> Option<f64> {
    std::str::from_utf8(raw).ok()?.parse().ok()
}

/// Resolves a Redis inclusive range against `len`.
fn span(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

fn dispatch(
    store: &mut Store,
    session: &mut Session,
    password: Option<&str>,
    args: Vec<Vec<u8>>,
) -> Frame {
    let name = String::from_utf8_lossy(&args[0]).to_ascii_uppercase();
    let args = &args[1..];

    match name.as_str() {
        "AUTH" => {
            let given = args.last().map(|p| p.as_slice());
            if password.map(str::as_bytes) == given {
                session.authenticated = true;
                ok()
            } else {
                err("WRONGPASS invalid username-password pair or user is disabled.")
            }
        }
        _ if !session.authenticated => err("NOAUTH Authentication required."),
        "PING" => Frame::simple("PONG"),
        "CLIENT" => ok(),
        "SELECT" => match args.first().and_then(|a| parse_i64(a)) {
            Some(db) if (0..DATABASES as i64).contains(&db) => {
                session.db = db as usize;
                ok()
            }
            _ => err("ERR DB index is out of range"),
        },
        "MOVE" => {
            let target = match args.get(1).and_then(|a| parse_i64(a)) {
                Some(db) if (0..DATABASES as i64).contains(&db) => db as usize,
                _ => return err("ERR DB index is out of range"),
            };
            if target == session.db {
                return err("ERR source and destination objects are the same");
            }
            let key = &args[0];
            if store.dbs[target].contains(key) {
                return int(0);
            }
            match store.dbs[session.db].take(key) {
                Some(entry) => {
                    store.dbs[target].entries.insert(key.clone(), entry);
                    int(1)
                }
                None => int(0),
            }
        }
        "INFO" => {
            let db = &store.dbs[session.db];
            bulk(format!("# Keyspace\r\ndb{}:keys={}\r\n", session.db, db.entries.len()).as_bytes())
        }
        "KEYS" | "RANDOMKEY" | "MGET" | "MSET" => server_wide(&mut store.dbs[session.db], &name, args),
        _ => keyspace(&mut store.dbs[session.db], &name, args),
    }
}

/// Commands that are not scoped to a single key.
fn server_wide(db: &mut Db, name: &str, args: &[Vec<u8>]) -> Frame {
    let mut live: Vec<Key> = db.entries.keys().cloned().collect();
    live.retain(|k| db.contains(k));
    live.sort();

    match name {
        "KEYS" => {
            // Only `*` suffix globs are understood.
            let pattern = args.first().cloned().unwrap_or_default();
            let matched = live.into_iter().filter(|k| match pattern.strip_suffix(b"*") {
                Some(prefix) => k.starts_with(prefix),
                None => *k == pattern,
            });
            Frame::Array(matched.map(|k| bulk(&k)).collect())
        }
        "RANDOMKEY" => live.first().map_or(Frame::nil(), |k| bulk(k)),
        "MGET" => Frame::Array(
            args.iter()
                .map(|k| match db.live(k).map(|e| &e.value) {
                    Some(Value::Str(v)) => bulk(v),
                    _ => Frame::nil(),
                })
                .collect(),
        ),
        _ => {
            if args.is_empty() || args.len() % 2 != 0 {
                return err("ERR wrong number of arguments for 'mset' command");
            }
            for pair in args.chunks(2) {
                store_string(db, &pair[0], pair[1].clone());
            }
            ok()
        }
    }
}

fn keyspace(db: &mut Db, name: &str, args: &[Vec<u8>]) -> Frame {
    let Some(key) = args.first() else {
        return err("ERR wrong number of arguments");
    };
    let key = key.clone();
    let rest = &args[1..];

    match name {
        // Generic keys
        "DEL" | "UNLINK" => int(args.iter().filter(|k| db.take(k).is_some()).count()),
        "EXISTS" => int(args.iter().filter(|k| db.contains(k)).count()),
        "TYPE" => Frame::simple(db.live(&key).map_or("none", |e| e.value.type_name())),
        "RENAME" | "RENAMENX" => {
            let target = rest[0].clone();
            if !db.contains(&key) {
                return err("ERR no such key");
            }
            if name == "RENAMENX" && db.contains(&target) {
                return int(0);
            }
            if let Some(entry) = db.take(&key) {
                db.entries.insert(target, entry);
            }
            if name == "RENAME" {
                ok()
            } else {
                int(1)
            }
        }
        "EXPIRE" | "PEXPIRE" | "EXPIREAT" | "PEXPIREAT" => {
            let Some(n) = parse_i64(&rest[0]) else {
                return err("ERR value is not an integer or out of range");
            };
            let ttl_ms = match name {
                "EXPIRE" => n.saturating_mul(1000),
                "PEXPIRE" => n,
                "EXPIREAT" => n.saturating_mul(1000) - now_ms(),
                _ => n - now_ms(),
            };
            if !db.contains(&key) {
                return int(0);
            }
            if ttl_ms <= 0 {
                db.take(&key);
            } else if let Some(entry) = db.live(&key) {
                entry.expires_at = Some(Instant::now() + Duration::from_millis(ttl_ms as u64));
            }
            int(1)
        }
        "PERSIST" => match db.live(&key) {
            Some(entry) if entry.expires_at.is_some() => {
                entry.expires_at = None;
                int(1)
            }
            _ => int(0),
        },
        "TTL" | "PTTL" => match db.live(&key) {
            None => int(-2),
            Some(Entry {
                expires_at: None, ..
            }) => int(-1),
            Some(Entry {
                expires_at: Some(at),
                ..
            }) => {
                let left = at.saturating_duration_since(Instant::now()).as_millis() as i64;
                if name == "TTL" {
                    int((left + 500) / 1000)
                } else {
                    int(left)
                }
            }
        },
        "DUMP" => match db.live(&key) {
            Some(entry) => bulk(format!("\u{0}{}", entry.value.type_name()).as_bytes()),
            None => Frame::nil(),
        },
        _ => typed(db, name, key, rest),
    }
}

fn typed(db: &mut Db, name: &str, key: Key, rest: &[Vec<u8>]) -> Frame {
    let reply = match name {
        "GET" | "SET" | "SETEX" | "PSETEX" | "GETSET" | "APPEND" | "STRLEN" | "INCR"
        | "INCRBY" | "DECR" | "DECRBY" | "INCRBYFLOAT" | "GETRANGE" | "SETRANGE"
        | "BITCOUNT" => strings(db, name, &key, rest),
        n if n.starts_with('H') => hashes(db, name, &key, rest),
        n if n.starts_with('L') || n.starts_with('R') => lists(db, name, &key, rest),
        n if n.starts_with('S') => sets(db, name, &key, rest),
        _ => Err(format!("ERR unknown command '{name}'")),
    };
    db.prune(&key);
    reply.unwrap_or_else(|message| err(&message))
}

type Reply = Result<Frame, String>;

fn string_value(db: &mut Db, key: &[u8]) -> Result<Option<Vec<u8>>, String> {
    match db.live(key).map(|e| &e.value) {
        None => Ok(None),
        Some(Value::Str(s)) => Ok(Some(s.clone())),
        Some(_) => Err(WRONGTYPE.to_string()),
    }
}

fn strings(db: &mut Db, name: &str, key: &Key, rest: &[Vec<u8>]) -> Reply {
    if name == "SET" {
        let nx = rest
            .get(1)
            .is_some_and(|flag| flag.eq_ignore_ascii_case(b"NX"));
        if nx && db.contains(key) {
            return Ok(Frame::nil());
        }
        db.put(key.clone(), Value::Str(rest[0].clone()));
        return Ok(ok());
    }

    let current = string_value(db, key)?;
    let reply = match name {
        "GET" => current.map_or(Frame::nil(), |v| bulk(&v)),
        "SETEX" | "PSETEX" => {
            let n = parse_i64(&rest[0]).filter(|n| *n > 0).ok_or_else(|| {
                "ERR invalid expire time".to_string()
            })?;
            let ms = if name == "SETEX" { n * 1000 } else { n };
            db.put(key.clone(), Value::Str(rest[1].clone()));
            if let Some(entry) = db.live(key) {
                entry.expires_at = Some(Instant::now() + Duration::from_millis(ms as u64));
            }
            ok()
        }
        "GETSET" => {
            db.put(key.clone(), Value::Str(rest[0].clone()));
            current.map_or(Frame::nil(), |v| bulk(&v))
        }
        "APPEND" => {
            let mut value = current.unwrap_or_default();
            value.extend_from_slice(&rest[0]);
            let len = value.len();
            store_string(db, key, value);
            int(len)
        }
        "STRLEN" => int(current.map_or(0, |v| v.len())),
        "INCR" | "INCRBY" | "DECR" | "DECRBY" => {
            let by = match name {
                "INCR" => 1,
                "DECR" => -1,
                _ => {
                    let n = parse_i64(&rest[0]).ok_or("ERR value is not an integer or out of range")?;
                    if name == "DECRBY" {
                        -n
                    } else {
                        n
                    }
                }
            };
            let base = match current {
                Some(v) => parse_i64(&v).ok_or("ERR value is not an integer or out of range")?,
                None => 0,
            };
            let next = base + by;
            store_string(db, key, next.to_string().into_bytes());
            int(next)
        }
        "INCRBYFLOAT" => {
            let by = parse_f64(&rest[0]).ok_or("ERR value is not a valid float")?;
            let base = match current {
                Some(v) => parse_f64(&v).ok_or("ERR value is not a valid float")?,
                None => 0.0,
            };
            let next = (base + by).to_string().into_bytes();
            store_string(db, key, next.clone());
            bulk(&next)
        }
        "GETRANGE" => {
            let value = current.unwrap_or_default();
            let start = parse_i64(&rest[0]).unwrap_or(0);
            let stop = parse_i64(&rest[1]).unwrap_or(-1);
            match span(value.len(), start, stop) {
                Some((a, b)) => bulk(&value[a..=b]),
                None => bulk(b""),
            }
        }
        "SETRANGE" => {
            let offset = parse_i64(&rest[0])
                .and_then(|o| usize::try_from(o).ok())
                .ok_or("ERR offset is out of range")?;
            let mut value = current.unwrap_or_default();
            let patch = &rest[1];
            if value.len() < offset + patch.len() {
                value.resize(offset + patch.len(), 0);
            }
            value[offset..offset + patch.len()].copy_from_slice(patch);
            let len = value.len();
            store_string(db, key, value);
            int(len)
        }
        "BITCOUNT" => {
            let value = current.unwrap_or_default();
            let start = rest.first().and_then(|s| parse_i64(s)).unwrap_or(0);
            let stop = rest.get(1).and_then(|s| parse_i64(s)).unwrap_or(-1);
            let ones = span(value.len(), start, stop)
                .map(|(a, b)| value[a..=b].iter().map(|b| i64::from(b.count_ones())).sum::<i64>())
                .unwrap_or(0);
            int(ones)
        }
        _ => unreachable!(),
    };
    Ok(reply)
}

/// Overwrites a string value, keeping any expiry.
fn store_string(db: &mut Db, key: &Key, value: Vec<u8>) {
    match db.live(key) {
        Some(entry) => entry.value = Value::Str(value),
        None => db.put(key.clone(), Value::Str(value)),
    }
}

fn hash_mut<'a>(db: &'a mut Db, key: &Key, create: bool) -> Result<Option<&'a mut BTreeMap<Key, Vec<u8>>>, String> {
    if create && !db.contains(key) {
        db.put(key.clone(), Value::Hash(BTreeMap::new()));
    }
    match db.live(key).map(|e| &mut e.value) {
        None => Ok(None),
        Some(Value::Hash(h)) => Ok(Some(h)),
        Some(_) => Err(WRONGTYPE.to_string()),
    }
}

fn hashes(db: &mut Db, name: &str, key: &Key, rest: &[Vec<u8>]) -> Reply {
    let writes = matches!(name, "HSET" | "HSETNX" | "HINCRBY" | "HINCRBYFLOAT");
    let mut scratch = BTreeMap::new();
    let hash = match hash_mut(db, key, writes)? {
        Some(h) => h,
        None => &mut scratch,
    };

    let reply = match name {
        "HSET" => {
            let mut added = 0;
            for pair in rest.chunks(2) {
                if hash.insert(pair[0].clone(), pair[1].clone()).is_none() {
                    added += 1;
                }
            }
            int(added)
        }
        "HSETNX" => {
            if hash.contains_key(&rest[0]) {
                int(0)
            } else {
                hash.insert(rest[0].clone(), rest[1].clone());
                int(1)
            }
        }
        "HGET" => hash.get(&rest[0]).map_or(Frame::nil(), |v| bulk(v)),
        "HDEL" => int(rest.iter().filter(|f| hash.remove(*f).is_some()).count()),
        "HEXISTS" => int(hash.contains_key(&rest[0]) as i64),
        "HGETALL" => Frame::Array(
            hash.iter()
                .flat_map(|(f, v)| [bulk(f), bulk(v)])
                .collect(),
        ),
        "HKEYS" => array(hash.keys()),
        "HVALS" => array(hash.values()),
        "HLEN" => int(hash.len()),
        "HMGET" => Frame::Array(
            rest.iter()
                .map(|f| hash.get(f).map_or(Frame::nil(), |v| bulk(v)))
                .collect(),
        ),
        "HSTRLEN" => int(hash.get(&rest[0]).map_or(0, Vec::len)),
        "HINCRBY" => {
            let by = parse_i64(&rest[1]).ok_or("ERR value is not an integer or out of range")?;
            let base = match hash.get(&rest[0]) {
                Some(v) => parse_i64(v).ok_or("ERR hash value is not an integer")?,
                None => 0,
            };
            hash.insert(rest[0].clone(), (base + by).to_string().into_bytes());
            int(base + by)
        }
        "HINCRBYFLOAT" => {
            let by = parse_f64(&rest[1]).ok_or("ERR value is not a valid float")?;
            let base = match hash.get(&rest[0]) {
                Some(v) => parse_f64(v).ok_or("ERR hash value is not a float")?,
                None => 0.0,
            };
            let next = (base + by).to_string().into_bytes();
            hash.insert(rest[0].clone(), next.clone());
            bulk(&next)
        }
        _ => return Err(format!("ERR unknown command '{name}'")),
    };
    Ok(reply)
}

fn list_mut<'a>(db: &'a mut Db, key: &Key, create: bool) -> Result<Option<&'a mut VecDeque<Vec<u8>>>, String> {
    if create && !db.contains(key) {
        db.put(key.clone(), Value::List(VecDeque::new()));
    }
    match db.live(key).map(|e| &mut e.value) {
        None => Ok(None),
        Some(Value::List(l)) => Ok(Some(l)),
        Some(_) => Err(WRONGTYPE.to_string()),
    }
}

fn lists(db: &mut Db, name: &str, key: &Key, rest: &[Vec<u8>]) -> Reply {
    if name == "RPOPLPUSH" {
        let Some(element) = list_mut(db, key, false)?.and_then(|l| l.pop_back()) else {
            return Ok(Frame::nil());
        };
        db.prune(key);
        if let Some(dest) = list_mut(db, &rest[0], true)? {
            dest.push_front(element.clone());
        }
        return Ok(bulk(&element));
    }

    let creates = matches!(name, "LPUSH" | "RPUSH");
    let mut scratch = VecDeque::new();
    let exists = db.contains(key);
    let list = match list_mut(db, key, creates)? {
        Some(l) => l,
        None => &mut scratch,
    };

    let reply = match name {
        "LPUSH" | "RPUSH" | "LPUSHX" | "RPUSHX" => {
            if !exists && name.ends_with('X') {
                return Ok(int(0));
            }
            for element in rest {
                if name.starts_with('L') {
                    list.push_front(element.clone());
                } else {
                    list.push_back(element.clone());
                }
            }
            int(list.len())
        }
        "LLEN" => int(list.len()),
        "LINDEX" => {
            let index = parse_i64(&rest[0]).unwrap_or(0);
            let index = if index < 0 { list.len() as i64 + index } else { index };
            usize::try_from(index)
                .ok()
                .and_then(|i| list.get(i))
                .map_or(Frame::nil(), |v| bulk(v))
        }
        "LINSERT" => {
            if !exists {
                return Ok(int(0));
            }
            let before = rest[0].eq_ignore_ascii_case(b"BEFORE");
            match list.iter().position(|e| *e == rest[1]) {
                Some(at) => {
                    list.insert(if before { at } else { at + 1 }, rest[2].clone());
                    int(list.len())
                }
                None => int(-1),
            }
        }
        "LPOP" => list.pop_front().map_or(Frame::nil(), |v| bulk(&v)),
        "RPOP" => list.pop_back().map_or(Frame::nil(), |v| bulk(&v)),
        "LSET" => {
            if !exists {
                return Err("ERR no such key".to_string());
            }
            let index = parse_i64(&rest[0]).unwrap_or(i64::MAX);
            let index = if index < 0 { list.len() as i64 + index } else { index };
            match usize::try_from(index).ok().and_then(|i| list.get_mut(i)) {
                Some(slot) => {
                    *slot = rest[1].clone();
                    ok()
                }
                None => return Err("ERR index out of range".to_string()),
            }
        }
        "LRANGE" => {
            let start = parse_i64(&rest[0]).unwrap_or(0);
            let stop = parse_i64(&rest[1]).unwrap_or(-1);
            match span(list.len(), start, stop) {
                Some((a, b)) => array(list.range(a..=b)),
                None => Frame::Array(Vec::new()),
            }
        }
        "LREM" => {
            let count = parse_i64(&rest[0]).unwrap_or(0);
            let target = &rest[1];
            let limit = if count == 0 { usize::MAX } else { count.unsigned_abs() as usize };
            let mut removed = 0;
            if count < 0 {
                let mut i = list.len();
                while i > 0 && removed < limit {
                    i -= 1;
                    if list[i] == *target {
                        list.remove(i);
                        removed += 1;
                    }
                }
            } else {
                let mut i = 0;
                while i < list.len() && removed < limit {
                    if list[i] == *target {
                        list.remove(i);
                        removed += 1;
                    } else {
                        i += 1;
                    }
                }
            }
            int(removed)
        }
        "LTRIM" => {
            let start = parse_i64(&rest[0]).unwrap_or(0);
            let stop = parse_i64(&rest[1]).unwrap_or(-1);
            match span(list.len(), start, stop) {
                Some((a, b)) => {
                    list.truncate(b + 1);
                    list.drain(..a);
                }
                None => list.clear(),
            }
            ok()
        }
        _ => return Err(format!("ERR unknown command '{name}'")),
    };
    Ok(reply)
}

fn set_members(db: &mut Db, key: &[u8]) -> Result<BTreeSet<Vec<u8>>, String> {
    match db.live(key).map(|e| &e.value) {
        None => Ok(BTreeSet::new()),
        Some(Value::Set(s)) => Ok(s.clone()),
        Some(_) => Err(WRONGTYPE.to_string()),
    }
}

fn combine(db: &mut Db, name: &str, key: &[u8], others: &[Vec<u8>]) -> Result<BTreeSet<Vec<u8>>, String> {
    let mut result = set_members(db, key)?;
    for other in others {
        let other = set_members(db, other)?;
        if name.starts_with("SDIFF") {
            result.retain(|m| !other.contains(m));
        } else {
            result.retain(|m| other.contains(m));
        }
    }
    Ok(result)
}

fn sets(db: &mut Db, name: &str, key: &Key, rest: &[Vec<u8>]) -> Reply {
    let reply = match name {
        "SADD" => {
            let mut members = set_members(db, key)?;
            let added = rest.iter().filter(|m| members.insert((*m).clone())).count();
            match db.live(key) {
                Some(entry) => entry.value = Value::Set(members),
                None => db.put(key.clone(), Value::Set(members)),
            }
            int(added)
        }
        "SCARD" => int(set_members(db, key)?.len()),
        "SISMEMBER" => int(set_members(db, key)?.contains(&rest[0]) as i64),
        "SMEMBERS" => array(&set_members(db, key)?),
        "SDIFF" | "SINTER" => array(&combine(db, name, key, rest)?),
        "SDIFFSTORE" | "SINTERSTORE" => {
            // The destination comes first; `key` holds it here.
            let result = combine(db, name, &rest[0], &rest[1..])?;
            let size = result.len();
            db.take(key);
            if !result.is_empty() {
                db.put(key.clone(), Value::Set(result));
            }
            int(size)
        }
        "SMOVE" => {
            let (destination, member) = (&rest[0], &rest[1]);
            let mut source = set_members(db, key)?;
            let mut target = set_members(db, destination)?;
            if !source.remove(member) {
                return Ok(int(0));
            }
            target.insert(member.clone());
            match db.live(key) {
                Some(entry) => entry.value = Value::Set(source),
                None => unreachable!(),
            }
            match db.live(destination) {
                Some(entry) => entry.value = Value::Set(target),
                None => db.put(destination.clone(), Value::Set(target)),
            }
            db.prune(destination);
            int(1)
        }
        _ => return Err(format!("ERR unknown command '{name}'")),
    };
    Ok(reply)
}
