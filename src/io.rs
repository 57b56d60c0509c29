//! Byte source and byte sink helpers.
//!
//! Interrupted and would-block results are retried silently; every other
//! I/O error is returned.

use crate::error::Result;
use std::io::{self, ErrorKind, Read, Write};

const CHUNK: usize = 8 * 1024;

fn is_transient(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock)
}

/// Reads `reader` until end of stream.
pub fn read_source<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut buf = [0u8; CHUNK];

    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(out),
            Ok(n) => out.extend_from_slice(&buf[..n]),
            Err(e) if is_transient(&e) => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Writes all of `bytes` to `writer` and flushes it.
pub fn write_sink<W: Write>(mut writer: W, mut bytes: &[u8]) -> Result<()> {
    while !bytes.is_empty() {
        match writer.write(bytes) {
            Ok(0) => {
                return Err(io::Error::new(ErrorKind::WriteZero, "sink accepted no bytes").into());
            }
            Ok(n) => bytes = &bytes[n..],
            Err(e) if is_transient(&e) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    loop {
        match writer.flush() {
            Ok(()) => return Ok(()),
            Err(e) if is_transient(&e) => continue,
            Err(e) => return Err(e.into()),
        }
    }
}
