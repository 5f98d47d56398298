//! The encoder: dispatches a caller's statically typed value to the
//! narrowest MessagePack family that represents it, then writes tag+payload
//! to the sink in canonical order (§4.2).

use crate::endian::to_big_endian;
use crate::error::{Error, Result};
use crate::marker::Marker;
use crate::stream::WriteStream;
use crate::value::Encodable;

/// Writes MessagePack-encoded values to a byte sink.
///
/// An `Encoder` owns its sink for its whole lifetime and is not safe to
/// share between threads. Dropping it flushes the sink.
pub struct Encoder<W> {
    sink: W,
    start_offset: u64,
}

impl<W: WriteStream> Encoder<W> {
    /// Bind a fresh encoder to `sink`, using its current position as the
    /// start offset for [`byte_count`](Self::byte_count).
    pub fn new(sink: W) -> Self {
        let start_offset = sink.position();
        Encoder { sink, start_offset }
    }

    /// Bind a fresh encoder to `sink`, overriding the start offset used by
    /// [`byte_count`](Self::byte_count).
    pub fn with_offset(sink: W, start_offset: u64) -> Self {
        Encoder { sink, start_offset }
    }

    /// Bytes written to the sink since construction.
    pub fn byte_count(&self) -> u64 {
        self.sink.position() - self.start_offset
    }

    /// Encode one value and append it to the sink. Returns `&mut Self` so
    /// calls chain: `enc.put(&a)?.put(&b)?.put(&c)?;` -- the idiomatic
    /// stand-in, in a language without parameter packs, for a single
    /// variadic `serialize` call (Design Note 9). A chain is semantically
    /// equal to calling `put` in sequence: a failure partway through leaves
    /// every earlier value already committed to the sink.
    pub fn put<T: Encodable + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        value.encode(self)?;
        Ok(self)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.sink.write_all(bytes).map_err(Error::from)
    }

    fn write_tag(&mut self, marker: Marker) -> Result<()> {
        self.sink.write_byte(marker.into_u8()).map_err(Error::from)
    }

    fn write_be16(&mut self, v: u16) -> Result<()> {
        self.write_bytes(&to_big_endian(v).to_ne_bytes())
    }

    fn write_be32(&mut self, v: u32) -> Result<()> {
        self.write_bytes(&to_big_endian(v).to_ne_bytes())
    }

    fn write_be64(&mut self, v: u64) -> Result<()> {
        self.write_bytes(&to_big_endian(v).to_ne_bytes())
    }

    pub(crate) fn encode_bool(&mut self, v: bool) -> Result<()> {
        self.write_tag(if v { Marker::True } else { Marker::False })
    }

    /// Narrowest unsigned encoding: positive fixint, then uint8/16/32/64.
    pub(crate) fn encode_unsigned(&mut self, v: u64) -> Result<()> {
        if v <= 0x7f {
            self.write_tag(Marker::PosFixInt(v as u8))
        } else if v <= u8::MAX as u64 {
            self.write_tag(Marker::UInt8)?;
            self.write_bytes(&[v as u8])
        } else if v <= u16::MAX as u64 {
            self.write_tag(Marker::UInt16)?;
            self.write_be16(v as u16)
        } else if v <= u32::MAX as u64 {
            self.write_tag(Marker::UInt32)?;
            self.write_be32(v as u32)
        } else {
            self.write_tag(Marker::UInt64)?;
            self.write_be64(v)
        }
    }

    /// Narrowest signed encoding: negative fixint (>= -32), positive fixint
    /// (0..=127), then int8/16/32/64.
    pub(crate) fn encode_signed(&mut self, v: i64) -> Result<()> {
        if v < 0 && v >= crate::marker::NEG_FIXINT_MIN as i64 {
            self.write_tag(Marker::NegFixInt(v as i8))
        } else if (0..=127).contains(&v) {
            self.write_tag(Marker::PosFixInt(v as u8))
        } else if v >= i8::MIN as i64 && v <= i8::MAX as i64 {
            self.write_tag(Marker::Int8)?;
            self.write_bytes(&[v as i8 as u8])
        } else if v >= i16::MIN as i64 && v <= i16::MAX as i64 {
            self.write_tag(Marker::Int16)?;
            self.write_be16(v as i16 as u16)
        } else if v >= i32::MIN as i64 && v <= i32::MAX as i64 {
            self.write_tag(Marker::Int32)?;
            self.write_be32(v as i32 as u32)
        } else {
            self.write_tag(Marker::Int64)?;
            self.write_be64(v as u64)
        }
    }

    pub(crate) fn encode_f32(&mut self, v: f32) -> Result<()> {
        self.write_tag(Marker::F32)?;
        self.write_be32(v.to_bits())
    }

    pub(crate) fn encode_f64(&mut self, v: f64) -> Result<()> {
        self.write_tag(Marker::F64)?;
        self.write_be64(v.to_bits())
    }

    pub(crate) fn encode_str(&mut self, v: &str) -> Result<()> {
        let len = v.len();
        if len <= 31 {
            self.write_tag(Marker::FixStr(len as u8))?;
        } else if len <= u8::MAX as usize {
            self.write_tag(Marker::Str8)?;
            self.write_bytes(&[len as u8])?;
        } else if len <= u16::MAX as usize {
            self.write_tag(Marker::Str16)?;
            self.write_be16(len as u16)?;
        } else if len <= u32::MAX as usize {
            self.write_tag(Marker::Str32)?;
            self.write_be32(len as u32)?;
        } else {
            return Err(Error::LengthOverflow);
        }
        self.write_bytes(v.as_bytes())
    }

    /// Writes the array's tag and count; the caller is responsible for
    /// encoding each element afterward (elements are not this method's
    /// concern -- it only picks and writes the header).
    pub(crate) fn encode_array_header(&mut self, len: usize) -> Result<()> {
        if len <= 15 {
            self.write_tag(Marker::FixArray(len as u8))
        } else if len <= u16::MAX as usize {
            self.write_tag(Marker::Array16)?;
            self.write_be16(len as u16)
        } else if len <= u32::MAX as usize {
            self.write_tag(Marker::Array32)?;
            self.write_be32(len as u32)
        } else {
            Err(Error::LengthOverflow)
        }
    }
}

impl<W> Drop for Encoder<W>
where
    W: WriteStream,
{
    fn drop(&mut self) {
        let _ = self.sink.flush();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn encode_bytes<T: Encodable + ?Sized>(v: &T) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut enc = Encoder::new(&mut buf);
            enc.put(v).unwrap();
        }
        buf
    }

    #[test]
    fn bool_byte_exact() {
        assert_eq!(encode_bytes(&true), vec![0xc3]);
        assert_eq!(encode_bytes(&false), vec![0xc2]);
    }

    #[test]
    fn narrowest_unsigned() {
        assert_eq!(encode_bytes(&0u32), vec![0x00]);
        assert_eq!(encode_bytes(&127u32), vec![0x7f]);
        assert_eq!(encode_bytes(&128u32), vec![0xcc, 0x80]);
        assert_eq!(encode_bytes(&255u32), vec![0xcc, 0xff]);
        assert_eq!(encode_bytes(&256u32), vec![0xcd, 0x01, 0x00]);
        assert_eq!(encode_bytes(&65535u32), vec![0xcd, 0xff, 0xff]);
        assert_eq!(encode_bytes(&65536u64), vec![0xce, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(
            encode_bytes(&u64::MAX),
            vec![0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn narrowest_signed() {
        assert_eq!(encode_bytes(&-1i64), vec![0xff]);
        assert_eq!(encode_bytes(&-32i64), vec![0xe0]);
        assert_eq!(encode_bytes(&-33i64), vec![0xd0, 0xdf]);
        assert_eq!(encode_bytes(&0i64), vec![0x00]);
        assert_eq!(encode_bytes(&127i64), vec![0x7f]);
        assert_eq!(encode_bytes(&(-32001i64)), vec![0xd1, 0x82, 0xff]);
    }

    #[test]
    fn string_byte_exact() {
        assert_eq!(encode_bytes("abc"), vec![0xa3, 0x61, 0x62, 0x63]);
    }

    #[test]
    fn array_byte_exact() {
        let arr: [u32; 4] = [5, 4, 3, 2];
        assert_eq!(encode_bytes(arr.as_slice()), vec![0x94, 0x05, 0x04, 0x03, 0x02]);
    }

    #[test]
    fn byte_count_tracks_everything_written() {
        let mut buf: Vec<u8> = Vec::new();
        let mut enc = Encoder::new(&mut buf);
        enc.put(&true).unwrap();
        enc.put(&false).unwrap();
        assert_eq!(enc.byte_count(), 2);
        drop(enc);
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn chained_puts_commit_in_order() {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut enc = Encoder::new(&mut buf);
            enc.put(&0u32).unwrap().put(&35u32).unwrap().put(&127u32).unwrap();
        }
        assert_eq!(buf, vec![0x00, 0x23, 0x7f]);
    }
}
