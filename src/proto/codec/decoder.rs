use bytes::{Bytes, BytesMut};

use crate::proto::error::DecodeError;
use crate::proto::frame::Frame;

const DEFAULT_MAX_FRAME_SIZE: usize = 512 * 1024 * 1024; // 512 MB, the Redis proto-max-bulk-len default
const MAX_DEPTH: usize = 512;

/// A RESP decoder that converts bytes to [`Frame`] values.
///
/// Data is fed with [`append`](Decoder::append) as it arrives from the
/// socket and frames are pulled with [`decode`](Decoder::decode). The
/// buffer is only consumed once a whole frame is available, so a reply
/// split across any number of reads decodes the same as one delivered in
/// a single read.
///
/// Completeness is checked by a scan that resumes where the previous call
/// stopped, so a large reply arriving in many reads is walked once. The
/// frame is built only after the scan finds its end, with bulk strings
/// sliced out of the buffer rather than copied.
///
/// # Example
///
/// ```
/// use redkey::proto::codec::Decoder;
/// use redkey::proto::frame::Frame;
///
/// let mut decoder = Decoder::new();
/// decoder.append(b"*1\r\n$4\r\nPI");
/// assert!(decoder.decode().unwrap().is_none());
/// decoder.append(b"NG\r\n");
/// let frame = decoder.decode().unwrap().unwrap();
/// assert_eq!(frame, Frame::Array(vec![Frame::bulk("PING")]));
/// ```
#[derive(Debug)]
pub struct Decoder {
    buf: BytesMut,
    max_frame_size: usize,
    scan: Scan,
}

/// Progress through the frame at the front of the buffer.
#[derive(Debug, Default)]
struct Scan {
    /// Offset of the first element not yet scanned.
    pos: usize,
    /// Elements still owed by each open array, innermost last.
    open: Vec<usize>,
}

impl Decoder {
    /// Creates a new decoder with an empty buffer.
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Creates a new decoder with a custom maximum frame size in bytes.
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            max_frame_size,
            scan: Scan::default(),
        }
    }

    /// Appends raw bytes received from the network.
    pub fn append(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Number of buffered bytes not yet consumed by a decoded frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Attempts to decode one frame from the buffer.
    ///
    /// Returns `Ok(None)` when more data is needed. Nothing is consumed in
    /// that case.
    pub fn decode(&mut self) -> Result<Option<Frame>, DecodeError> {
        if self.buf.is_empty() {
            return Ok(None);
        }
        if self.buf.len() > self.max_frame_size {
            return Err(DecodeError::TooLarge {
                max: self.max_frame_size,
            });
        }

        let end = match self.scan_frame() {
            Ok(Some(end)) => end,
            Ok(None) => return Ok(None),
            Err(e) => {
                self.scan = Scan::default();
                return Err(e);
            }
        };
        self.scan = Scan::default();

        let raw = self.buf.split_to(end).freeze();
        let mut pos = 0;
        build_frame(&raw, &mut pos).map(Some)
    }

    /// Advances the scan over complete elements. Returns the frame's end
    /// offset once its last element is buffered.
    fn scan_frame(&mut self) -> Result<Option<usize>, DecodeError> {
        loop {
            let start = self.scan.pos;
            let Some(&prefix) = self.buf.get(start) else {
                return Ok(None);
            };
            let Some((line, next)) = read_line(&self.buf, start + 1) else {
                return Ok(None);
            };

            let mut end = next;
            match prefix {
                b'+' | b'-' => {}
                b':' => {
                    parse_int(line)?;
                }
                b'$' => {
                    let len = parse_int(line)?;
                    if len != -1 {
                        let data_end = next + checked_len(len, self.max_frame_size)?;
                        if self.buf.len() < data_end + 2 {
                            return Ok(None);
                        }
                        if &self.buf[data_end..data_end + 2] != b"\r\n" {
                            return Err(DecodeError::MissingTerminator);
                        }
                        end = data_end + 2;
                    }
                }
                b'*' => {
                    let len = parse_int(line)?;
                    if len != -1 {
                        // Assume at least 16 bytes per element when bounding the array.
                        let len = checked_len(len, self.max_frame_size / 16)?;
                        if len > 0 {
                            if self.scan.open.len() >= MAX_DEPTH {
                                return Err(DecodeError::TooDeep { max: MAX_DEPTH });
                            }
                            self.scan.open.push(len);
                            self.scan.pos = next;
                            continue;
                        }
                    }
                }
                other => return Err(DecodeError::UnknownType(other as char)),
            }

            self.scan.pos = end;
            // The element is complete; close every array it finishes.
            loop {
                let Some(remaining) = self.scan.open.last_mut() else {
                    return Ok(Some(end));
                };
                *remaining -= 1;
                if *remaining > 0 {
                    break;
                }
                self.scan.open.pop();
            }
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a frame from bytes the scan has already validated. Recursion is
/// bounded by the scan's depth limit.
fn build_frame(raw: &Bytes, pos: &mut usize) -> Result<Frame, DecodeError> {
    let prefix = *raw.get(*pos).ok_or(DecodeError::MissingTerminator)?;
    let (line, next) = read_line(raw, *pos + 1).ok_or(DecodeError::MissingTerminator)?;
    *pos = next;

    let frame = match prefix {
        b'+' => Frame::SimpleString(line.to_vec()),
        b'-' => Frame::Error(line.to_vec()),
        b':' => Frame::Integer(parse_int(line)?),
        b'$' => match parse_int(line)? {
            -1 => Frame::BulkString(None),
            len => {
                let end = next + checked_len(len, raw.len())?;
                *pos = end + 2;
                Frame::BulkString(Some(raw.slice(next..end)))
            }
        },
        b'*' => match parse_int(line)? {
            -1 => Frame::Null,
            len => {
                let len = checked_len(len, raw.len())?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(build_frame(raw, pos)?);
                }
                Frame::Array(items)
            }
        },
        other => return Err(DecodeError::UnknownType(other as char)),
    };
    Ok(frame)
}

/// Finds the CRLF-terminated line starting at `start`; returns it without
/// the terminator, plus the offset just past the terminator.
fn read_line(buf: &[u8], start: usize) -> Option<(&[u8], usize)> {
    let rest = buf.get(start..)?;
    let end = rest.windows(2).position(|w| w == b"\r\n")?;
    Some((&rest[..end], start + end + 2))
}

fn parse_int(line: &[u8]) -> Result<i64, DecodeError> {
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| DecodeError::InvalidInteger(String::from_utf8_lossy(line).into_owned()))
}

fn checked_len(len: i64, max: usize) -> Result<usize, DecodeError> {
    let len = usize::try_from(len).map_err(|_| DecodeError::InvalidLength(len))?;
    if len > max {
        return Err(DecodeError::TooLarge { max });
    }
    Ok(len)
}
