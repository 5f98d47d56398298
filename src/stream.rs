//! The minimal stream abstraction the codec is parametric over (§5/§6).
//!
//! `WriteStream` is what an [`Encoder`](crate::Encoder) writes into;
//! `ReadStream` is what a [`Decoder`](crate::Decoder) reads from. Both are
//! deliberately narrow -- just the operations the core dispatch engine
//! actually needs -- so any in-memory buffer, file, or socket can back an
//! encoder/decoder by implementing a handful of methods.

use std::io;

/// A byte sink supporting sequential writes and a position counter.
///
/// Implementations are expected to be opened in binary mode; this trait
/// does not verify that on the caller's behalf.
pub trait WriteStream {
    /// Append `bytes` to the sink.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Append a single byte to the sink.
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.write_all(&[byte])
    }

    /// Current byte position of the sink.
    fn position(&self) -> u64;

    /// Flush any buffered bytes to the underlying medium.
    fn flush(&mut self) -> io::Result<()>;
}

/// A byte source supporting single-byte peek, single-byte and multi-byte
/// reads, a one-byte pushback, a position counter, and an at-EOF signal.
pub trait ReadStream {
    /// Look at the next byte without consuming it. `Ok(None)` at EOF.
    fn peek(&mut self) -> io::Result<Option<u8>>;

    /// Consume and return the next byte. `Ok(None)` at EOF.
    fn get(&mut self) -> io::Result<Option<u8>>;

    /// Consume exactly `buf.len()` bytes, or fail.
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Push a byte back so the next `peek`/`get` returns it again. Callers
    /// only ever push back the byte they just consumed with `get`.
    fn unget(&mut self, byte: u8);

    /// Current byte position of the source.
    fn position(&self) -> u64;

    /// True if no further bytes are available.
    fn eof(&mut self) -> io::Result<bool> {
        Ok(self.peek()?.is_none())
    }
}

impl<T: WriteStream + ?Sized> WriteStream for &mut T {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_all(bytes)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_byte(byte)
    }

    fn position(&self) -> u64 {
        (**self).position()
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

impl<T: ReadStream + ?Sized> ReadStream for &mut T {
    fn peek(&mut self) -> io::Result<Option<u8>> {
        (**self).peek()
    }

    fn get(&mut self) -> io::Result<Option<u8>> {
        (**self).get()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).read_exact(buf)
    }

    fn unget(&mut self, byte: u8) {
        (**self).unget(byte)
    }

    fn position(&self) -> u64 {
        (**self).position()
    }

    fn eof(&mut self) -> io::Result<bool> {
        (**self).eof()
    }
}

/// A [`WriteStream`] backed directly by a growable in-memory buffer.
impl WriteStream for Vec<u8> {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn position(&self) -> u64 {
        self.len() as u64
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Wraps any [`std::io::Write`] (a file, a socket, ...) with the position
/// counter the trait requires. `io::Write` alone has no notion of position,
/// and not every writer supports `Seek` (sockets don't), so the counter is
/// tracked here instead of delegated.
pub struct CountingWriter<W> {
    inner: W,
    pos: u64,
}

impl<W: io::Write> CountingWriter<W> {
    /// Wrap `inner`, starting the position counter at zero.
    pub fn new(inner: W) -> Self {
        Self { inner, pos: 0 }
    }

    /// Wrap `inner`, starting the position counter at `offset`.
    pub fn with_offset(inner: W, offset: u64) -> Self {
        Self { inner, pos: offset }
    }

    /// Consume the wrapper, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> WriteStream for CountingWriter<W> {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)?;
        self.pos += bytes.len() as u64;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// A [`ReadStream`] backed by a borrowed byte slice.
pub struct SliceReader<'a> {
    data: &'a [u8],
    idx: usize,
    start_offset: u64,
    pending: Option<u8>,
}

impl<'a> SliceReader<'a> {
    /// Build a reader over `data`, with `position()` starting at zero.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            idx: 0,
            start_offset: 0,
            pending: None,
        }
    }

    /// Build a reader over `data`, with `position()` starting at `offset`.
    pub fn with_offset(data: &'a [u8], offset: u64) -> Self {
        Self {
            data,
            idx: 0,
            start_offset: offset,
            pending: None,
        }
    }
}

impl<'a> ReadStream for SliceReader<'a> {
    fn peek(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.pending {
            return Ok(Some(b));
        }
        Ok(self.data.get(self.idx).copied())
    }

    fn get(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.pending.take() {
            return Ok(Some(b));
        }
        let b = self.data.get(self.idx).copied();
        if b.is_some() {
            self.idx += 1;
        }
        Ok(b)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        for slot in buf.iter_mut() {
            *slot = self.get()?.ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "slice reader ran out of bytes")
            })?;
        }
        Ok(())
    }

    fn unget(&mut self, byte: u8) {
        debug_assert!(self.pending.is_none(), "unget called twice without an intervening get");
        self.pending = Some(byte);
    }

    fn position(&self) -> u64 {
        self.start_offset + self.idx as u64 - self.pending.is_some() as u64
    }
}

/// Wraps any [`std::io::Read`] (a file, a socket, ...) with peek/unget and a
/// position counter, none of which `io::Read` provides on its own.
pub struct CountingReader<R> {
    inner: R,
    pos: u64,
    pending: Option<u8>,
}

impl<R: io::Read> CountingReader<R> {
    /// Wrap `inner`, starting the position counter at zero.
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0, pending: None }
    }

    /// Wrap `inner`, starting the position counter at `offset`.
    pub fn with_offset(inner: R, offset: u64) -> Self {
        Self { inner, pos: offset, pending: None }
    }

    /// Consume the wrapper, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill_pending(&mut self) -> io::Result<Option<u8>> {
        if self.pending.is_none() {
            let mut byte = [0u8; 1];
            let n = read_all_or_nothing(&mut self.inner, &mut byte)?;
            if n == 0 {
                return Ok(None);
            }
            self.pending = Some(byte[0]);
        }
        Ok(self.pending)
    }
}

/// Reads either a full buffer or zero bytes (true EOF); anything in between
/// is the short-read case `io::Read::read` allows but this crate's streams
/// never want to special-case.
fn read_all_or_nothing<R: io::Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

impl<R: io::Read> ReadStream for CountingReader<R> {
    fn peek(&mut self) -> io::Result<Option<u8>> {
        self.fill_pending()
    }

    fn get(&mut self) -> io::Result<Option<u8>> {
        let b = self.fill_pending()?;
        if b.is_some() {
            self.pending = None;
            self.pos += 1;
        }
        Ok(b)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let mut filled = 0;
        if let Some(b) = self.pending.take() {
            buf[0] = b;
            filled = 1;
            self.pos += 1;
        }
        if filled < buf.len() {
            self.inner.read_exact(&mut buf[filled..])?;
            self.pos += (buf.len() - filled) as u64;
        }
        Ok(())
    }

    fn unget(&mut self, byte: u8) {
        debug_assert!(self.pending.is_none(), "unget called twice without an intervening get");
        self.pending = Some(byte);
        self.pos -= 1;
    }

    fn position(&self) -> u64 {
        self.pos
    }
}
