//! Conversions from reply frames to Rust values.
//!
//! Every helper maps an error reply to [`Error::Server`] and any frame whose
//! shape the command does not promise to [`Error::Protocol`].

use bytes::Bytes;

use crate::proto::error::{Error, Result};
use crate::proto::frame::Frame;

fn unexpected(expected: &str, frame: &Frame) -> Error {
    Error::protocol(format!("expected {expected}, got {frame:?}"))
}

/// Passes the frame through unless it is an error reply.
#[inline]
pub fn parse_frame_response(frame: Frame) -> Result<Frame> {
    match frame {
        Frame::Error(e) => Err(Error::server(&e)),
        _ => Ok(frame),
    }
}

/// Accepts a status reply such as `OK`.
#[inline]
pub fn frame_to_unit(frame: Frame) -> Result<()> {
    match frame {
        Frame::SimpleString(_) => Ok(()),
        Frame::Error(e) => Err(Error::server(&e)),
        other => Err(unexpected("status reply", &other)),
    }
}

/// Converts a frame to an integer.
#[inline]
pub fn frame_to_int(frame: Frame) -> Result<i64> {
    match frame {
        Frame::Integer(i) => Ok(i),
        Frame::BulkString(Some(b)) => std::str::from_utf8(&b)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| Error::protocol("invalid integer")),
        Frame::Error(e) => Err(Error::server(&e)),
        other => Err(unexpected("integer", &other)),
    }
}

/// Converts a `0`/`1` integer reply to a boolean.
#[inline]
pub fn frame_to_bool(frame: Frame) -> Result<bool> {
    frame_to_int(frame).map(|i| i != 0)
}

/// Converts a length or cardinality reply.
#[inline]
pub fn frame_to_len(frame: Frame) -> Result<usize> {
    let n = frame_to_int(frame)?;
    usize::try_from(n).map_err(|_| Error::protocol(format!("negative length {n}")))
}

/// Converts a float reply, which RESP2 carries as a bulk string.
#[inline]
pub fn frame_to_float(frame: Frame) -> Result<f64> {
    match frame {
        Frame::BulkString(Some(b)) => parse_float(&b),
        Frame::SimpleString(s) => parse_float(&s),
        Frame::Error(e) => Err(Error::server(&e)),
        other => Err(unexpected("float", &other)),
    }
}

fn parse_float(raw: &[u8]) -> Result<f64> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| Error::protocol("invalid float value"))
}

/// Converts a bulk string reply; nil becomes `None`.
#[inline]
pub fn frame_to_bytes(frame: Frame) -> Result<Option<Bytes>> {
    match frame {
        Frame::BulkString(b) => Ok(b),
        Frame::Null => Ok(None),
        Frame::Error(e) => Err(Error::server(&e)),
        other => Err(unexpected("bulk string", &other)),
    }
}

/// Converts a status or bulk string reply to a string.
#[inline]
pub fn frame_to_string(frame: Frame) -> Result<String> {
    match frame {
        Frame::SimpleString(s) => Ok(String::from_utf8_lossy(&s).into_owned()),
        Frame::BulkString(Some(b)) => Ok(String::from_utf8_lossy(&b).into_owned()),
        Frame::BulkString(None) | Frame::Null => Ok(String::new()),
        Frame::Error(e) => Err(Error::server(&e)),
        other => Err(unexpected("string", &other)),
    }
}

/// Reply of `SET ... NX`: `OK` when written, nil when the key already existed.
#[inline]
pub fn frame_to_written(frame: Frame) -> Result<bool> {
    match frame {
        Frame::SimpleString(_) => Ok(true),
        Frame::BulkString(None) | Frame::Null => Ok(false),
        Frame::Error(e) => Err(Error::server(&e)),
        other => Err(unexpected("status or nil", &other)),
    }
}

fn frame_to_array(frame: Frame) -> Result<Vec<Frame>> {
    match frame {
        Frame::Array(items) => Ok(items),
        Frame::Null => Ok(Vec::new()),
        Frame::Error(e) => Err(Error::server(&e)),
        other => Err(unexpected("array", &other)),
    }
}

/// Converts an array reply whose items may be nil (HMGET).
#[inline]
pub fn frame_to_vec_opt_bytes(frame: Frame) -> Result<Vec<Option<Bytes>>> {
    frame_to_array(frame)?
        .into_iter()
        .map(frame_to_bytes)
        .collect()
}

/// Converts an array of bulk strings. A nil item is a protocol error.
#[inline]
pub fn frame_to_vec_bytes(frame: Frame) -> Result<Vec<Bytes>> {
    frame_to_array(frame)?
        .into_iter()
        .map(|item| {
            frame_to_bytes(item)?.ok_or_else(|| Error::protocol("unexpected nil in array reply"))
        })
        .collect()
}

/// Converts a flat `[field, value, field, value, ...]` reply (HGETALL).
/// Fields and values are kept as raw bytes.
#[inline]
pub fn frame_to_pairs(frame: Frame) -> Result<Vec<(Bytes, Bytes)>> {
    let items = frame_to_array(frame)?;
    if items.len() % 2 != 0 {
        return Err(Error::protocol(
            "HGETALL response must have even number of elements",
        ));
    }

    let mut pairs = Vec::with_capacity(items.len() / 2);
    let mut iter = items.into_iter();
    while let (Some(field), Some(value)) = (iter.next(), iter.next()) {
        let field = frame_to_bytes(field)?
            .ok_or_else(|| Error::protocol("unexpected nil field in HGETALL reply"))?;
        let value = frame_to_bytes(value)?.unwrap_or_default();
        pairs.push((field, value));
    }
    Ok(pairs)
}
