//! The type-to-family dispatch traits (Design Note 9): one `Encodable` or
//! `Decodable` implementation per MessagePack family, plus a generic entry
//! point (`Encoder::put`/`Decoder::get`) that forwards to it.

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{Error, Result};
use crate::stream::{ReadStream, WriteStream};

/// A value that can be written to an [`Encoder`] by dispatching on its own
/// static type to the narrowest matching MessagePack family.
pub trait Encodable {
    /// Append this value's tag and payload to `enc`.
    fn encode<W: WriteStream>(&self, enc: &mut Encoder<W>) -> Result<()>;
}

/// A mutable destination that [`Decoder::get`] can fill from the next value
/// in the source.
///
/// The destination is filled in place rather than constructed fresh, which
/// is what lets a single fixed-size buffer (`[u8; N]`, `[T; N]`) act as
/// both a capacity bound and a place to write.
pub trait Decodable: Sized {
    /// Decode the next value from `dec` into `self`.
    fn decode_into<R: ReadStream>(&mut self, dec: &mut Decoder<R>) -> Result<()>;
}

/// Elements of a growable container (`Vec<T>`, `String`-via-bytes) need a
/// way to be materialized before they can be decoded into, since there's no
/// existing slot to mutate. Anything `Decodable + Default` gets this for
/// free.
trait DecodableNew: Decodable + Default {
    fn decode_new<R: ReadStream>(dec: &mut Decoder<R>) -> Result<Self> {
        let mut v = Self::default();
        v.decode_into(dec)?;
        Ok(v)
    }
}

impl<T: Decodable + Default> DecodableNew for T {}

impl Encodable for bool {
    fn encode<W: WriteStream>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.encode_bool(*self)
    }
}

impl Decodable for bool {
    fn decode_into<R: ReadStream>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        *self = dec.decode_bool()?;
        Ok(())
    }
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {$(
        impl Encodable for $t {
            fn encode<W: WriteStream>(&self, enc: &mut Encoder<W>) -> Result<()> {
                enc.encode_unsigned(*self as u64)
            }
        }

        impl Decodable for $t {
            fn decode_into<R: ReadStream>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
                let v = dec.decode_unsigned(<$t>::MAX as u64)?;
                *self = v as $t;
                Ok(())
            }
        }
    )*};
}

impl_unsigned!(u8, u16, u32, u64);

macro_rules! impl_signed {
    ($($t:ty),*) => {$(
        impl Encodable for $t {
            fn encode<W: WriteStream>(&self, enc: &mut Encoder<W>) -> Result<()> {
                enc.encode_signed(*self as i64)
            }
        }

        impl Decodable for $t {
            fn decode_into<R: ReadStream>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
                let v = dec.decode_signed(<$t>::MIN as i64, <$t>::MAX as i64)?;
                *self = v as $t;
                Ok(())
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64);

impl Encodable for f32 {
    fn encode<W: WriteStream>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.encode_f32(*self)
    }
}

impl Decodable for f32 {
    fn decode_into<R: ReadStream>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        *self = dec.decode_f32()?;
        Ok(())
    }
}

impl Encodable for f64 {
    fn encode<W: WriteStream>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.encode_f64(*self)
    }
}

impl Decodable for f64 {
    fn decode_into<R: ReadStream>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        *self = dec.decode_f64()?;
        Ok(())
    }
}

impl Encodable for str {
    fn encode<W: WriteStream>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.encode_str(self)
    }
}

impl Encodable for String {
    fn encode<W: WriteStream>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.encode_str(self.as_str())
    }
}

/// Growable string destination. Appends a trailing NUL after the decoded
/// text, mirroring the fixed-buffer form's byte count -- unusual for a
/// length-prefixed format, but kept for round-trip comparability with
/// [`FixedStr`]. Callers that want the text alone should decode into
/// [`PlainString`] instead.
impl Decodable for String {
    fn decode_into<R: ReadStream>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        let bytes = dec.decode_string_raw()?;
        let mut s = String::from_utf8(bytes).map_err(|_| Error::TypeMismatch)?;
        s.push('\0');
        *self = s;
        Ok(())
    }
}

/// A growable string destination that opts out of `String`'s NUL-appending
/// behavior, recovering exactly the encoded text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlainString(pub String);

impl Decodable for PlainString {
    fn decode_into<R: ReadStream>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        let bytes = dec.decode_string_raw()?;
        self.0 = String::from_utf8(bytes).map_err(|_| Error::TypeMismatch)?;
        Ok(())
    }
}

/// A fixed-capacity byte buffer of size `N`, used as a string destination
/// (not an array destination -- see [`FixedStr::decode_into`]). Holds the
/// decoded bytes followed by a single NUL terminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedStr<const N: usize>(pub [u8; N]);

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        FixedStr([0u8; N])
    }
}

impl<const N: usize> Decodable for FixedStr<N> {
    fn decode_into<R: ReadStream>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        let bytes = dec.decode_string_raw()?;
        if N < bytes.len() + 1 {
            return Err(Error::CapacityTooSmall);
        }
        self.0[..bytes.len()].copy_from_slice(&bytes);
        self.0[bytes.len()] = 0;
        Ok(())
    }
}

impl<T: Encodable> Encodable for [T] {
    fn encode<W: WriteStream>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.encode_array_header(self.len())?;
        for elem in self {
            elem.encode(enc)?;
        }
        Ok(())
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn encode<W: WriteStream>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.as_slice().encode(enc)
    }
}

impl<T: Encodable, const N: usize> Encodable for [T; N] {
    fn encode<W: WriteStream>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.as_slice().encode(enc)
    }
}

/// Growable sequence destination: resized to the decoded count, each
/// element decoded in turn via the element's own static type.
impl<T: Decodable + Default> Decodable for Vec<T> {
    fn decode_into<R: ReadStream>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        let count = dec.decode_array_len()?;
        self.clear();
        self.reserve(count);
        for _ in 0..count {
            self.push(T::decode_new(dec)?);
        }
        Ok(())
    }
}

/// Fixed-capacity array destination of size `N`: fails `CapacityTooSmall` if
/// the decoded count exceeds `N`. Elements past the decoded count are left
/// untouched (the destination is mutated in place, not rebuilt).
impl<T: Decodable, const N: usize> Decodable for [T; N] {
    fn decode_into<R: ReadStream>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        let count = dec.decode_array_len()?;
        if count > N {
            return Err(Error::CapacityTooSmall);
        }
        for slot in self.iter_mut().take(count) {
            slot.decode_into(dec)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stream::SliceReader;

    fn round_trip<T>(v: T) -> T
    where
        T: Encodable + Decodable + Default,
    {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut enc = Encoder::new(&mut buf);
            enc.put(&v).unwrap();
        }
        let mut dec = Decoder::new(SliceReader::new(&buf));
        let mut dest = T::default();
        dec.get(&mut dest).unwrap();
        dest
    }

    #[test]
    fn scalar_round_trips() {
        assert_eq!(round_trip(true), true);
        assert_eq!(round_trip(42u8), 42u8);
        assert_eq!(round_trip(40000u32), 40000u32);
        assert_eq!(round_trip(-32001i32), -32001i32);
        assert_eq!(round_trip(3.14159f32), 3.14159f32);
        assert_eq!(round_trip(1.14f64), 1.14f64);
    }

    #[test]
    fn string_round_trip_appends_nul() {
        assert_eq!(round_trip("hello world".to_string()), "hello world\0");
    }

    #[test]
    fn array_round_trip_growable() {
        let v: Vec<u32> = vec![5, 4, 3, 2];
        assert_eq!(round_trip(v), vec![5u32, 4, 3, 2]);
    }

    #[test]
    fn fixed_array_capacity_too_small() {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut enc = Encoder::new(&mut buf);
            enc.put(&vec![1u32, 2, 3, 4]).unwrap();
        }
        let mut dec = Decoder::new(SliceReader::new(&buf));
        let mut dest: [u32; 3] = [0; 3];
        assert!(matches!(dec.get(&mut dest), Err(Error::CapacityTooSmall)));
    }

    #[test]
    fn fixed_array_resizes_into_growable() {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut enc = Encoder::new(&mut buf);
            enc.put(&vec![1u32, 2, 3, 4]).unwrap();
        }
        let mut dec = Decoder::new(SliceReader::new(&buf));
        let mut dest: Vec<u32> = Vec::new();
        dec.get(&mut dest).unwrap();
        assert_eq!(dest, vec![1, 2, 3, 4]);
    }

    #[test]
    fn fixed_str_nul_terminates() {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut enc = Encoder::new(&mut buf);
            enc.put("abc").unwrap();
        }
        let mut dec = Decoder::new(SliceReader::new(&buf));
        let mut dest: FixedStr<4> = FixedStr::default();
        dec.get(&mut dest).unwrap();
        assert_eq!(&dest.0, b"abc\0");

        let mut dec = Decoder::new(SliceReader::new(&buf));
        let mut too_small: FixedStr<3> = FixedStr::default();
        assert!(matches!(dec.get(&mut too_small), Err(Error::CapacityTooSmall)));
    }

    #[test]
    fn plain_string_opts_out_of_nul() {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut enc = Encoder::new(&mut buf);
            enc.put("abc").unwrap();
        }
        let mut dec = Decoder::new(SliceReader::new(&buf));
        let mut nulled = String::new();
        dec.get(&mut nulled).unwrap();
        assert_eq!(nulled, "abc\0");

        let mut dec = Decoder::new(SliceReader::new(&buf));
        let mut plain = PlainString::default();
        dec.get(&mut plain).unwrap();
        assert_eq!(plain.0, "abc");
    }
}

/// Property-style round-trip sampling per the testable-properties harness
/// guidance: every supported scalar width, plus strings up to 2^20 bytes
/// and arrays up to 2^17 elements. Hand-rolled sample loops with `rand`,
/// matching the teacher's own `roundtrip` tests in `element.rs` rather than
/// a `proptest`/`quickcheck` harness.
#[cfg(test)]
mod property {
    use super::*;
    use crate::stream::SliceReader;
    use rand::prelude::*;

    fn round_trip<T>(v: T) -> T
    where
        T: Encodable + Decodable + Default,
    {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut enc = Encoder::new(&mut buf);
            enc.put(&v).unwrap();
        }
        let mut dec = Decoder::new(SliceReader::new(&buf));
        let mut dest = T::default();
        dec.get(&mut dest).unwrap();
        dest
    }

    #[test]
    fn random_integers_and_floats_round_trip() {
        let mut rng = thread_rng();
        for _ in 0..200 {
            let v: u64 = rng.gen();
            assert_eq!(round_trip(v), v);
            let v: i64 = rng.gen();
            assert_eq!(round_trip(v), v);
            let v: f32 = rng.gen();
            assert_eq!(round_trip(v), v);
            let v: f64 = rng.gen();
            assert_eq!(round_trip(v), v);
        }
    }

    #[test]
    fn random_length_strings_round_trip() {
        let mut rng = thread_rng();
        // Boundary-adjacent lengths (fixstr/str8/str16/str32 thresholds),
        // plus the spec's upper bound of 2^20 bytes.
        let lengths = [0usize, 1, 30, 31, 32, 255, 256, 65535, 65536, 1 << 20];
        for len in lengths {
            let text: String = rand::distributions::Alphanumeric
                .sample_iter(&mut rng)
                .take(len)
                .map(char::from)
                .collect();
            let mut buf: Vec<u8> = Vec::new();
            {
                let mut enc = Encoder::new(&mut buf);
                enc.put(text.as_str()).unwrap();
            }
            let mut dec = Decoder::new(SliceReader::new(&buf));
            let mut dest = PlainString::default();
            dec.get(&mut dest).unwrap();
            assert_eq!(dest.0, text);
        }
    }

    #[test]
    fn random_length_arrays_round_trip() {
        let mut rng = thread_rng();
        // Boundary-adjacent counts (fixarray/array16/array32 thresholds),
        // plus the spec's upper bound of 2^17 elements.
        let lengths = [0usize, 1, 15, 16, 17, 65535, 65536, 1 << 17];
        for len in lengths {
            let values: Vec<u64> = (0..len).map(|_| rng.gen()).collect();
            assert_eq!(round_trip(values.clone()), values);
        }
    }
}
