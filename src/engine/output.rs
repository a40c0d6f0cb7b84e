//! Shared output stream with positioned writes.

use std::io::{self, Seek, SeekFrom, Write};

use parking_lot::Mutex;

use crate::error::{HashError, Result};

#[derive(Debug)]
struct Cursor<W> {
    writer: W,
    /// Where the writer is known to be, `None` after an error.
    position: Option<u64>,
    seeks: u64,
}

impl<W: Write + Seek> Cursor<W> {
    fn write_at(&mut self, position: u64, bytes: &[u8]) -> io::Result<()> {
        if self.position != Some(position) {
            self.writer.seek(SeekFrom::Start(position))?;
            self.seeks += 1;
        }
        self.writer.write_all(bytes)
    }
}

/// A single output stream shared by all workers.
///
/// Seek and write happen under one lock, so no other worker can move the
/// cursor in between. Sequential writers skip the seek entirely.
#[derive(Debug)]
pub struct SharedOutput<W> {
    inner: Mutex<Cursor<W>>,
}

impl<W: Write + Seek> SharedOutput<W> {
    /// Wraps `writer`. The first write always seeks.
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(Cursor {
                writer,
                position: None,
                seeks: 0,
            }),
        }
    }

    /// Writes `bytes` at byte offset `position`.
    pub fn write_at(&self, position: u64, bytes: &[u8]) -> Result<()> {
        let mut cursor = self.inner.lock();
        match cursor.write_at(position, bytes) {
            Ok(()) => {
                cursor.position = Some(position + bytes.len() as u64);
                Ok(())
            }
            Err(source) => {
                cursor.position = None;
                Err(HashError::Write { position, source })
            }
        }
    }

    /// Returns how many seeks were issued so far.
    pub fn seeks(&self) -> u64 {
        self.inner.lock().seeks
    }

    /// Flushes and returns the writer.
    pub fn into_inner(self) -> Result<W> {
        let mut writer = self.inner.into_inner().writer;
        writer.flush()?;
        Ok(writer)
    }
}
