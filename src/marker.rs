//! The format-tag table: a single source of truth for the MessagePack
//! families this crate implements, shared by the encoder and the decoder.
//!
//! Tag numbering here is canonical. Changing a tag's byte value here changes
//! the wire format in both directions simultaneously.

/// Top bit of a positive fixint tag is always clear.
pub const POS_FIXINT_MASK: u8 = 0x80;
/// A fixstr tag has its top three bits set to `101`.
pub const FIXSTR_MASK: u8 = 0xa0;
/// A fixarray tag has its top four bits set to `1001`.
pub const FIXARR_MASK: u8 = 0x90;
/// Smallest value a negative fixint tag can hold.
pub const NEG_FIXINT_MIN: i8 = -32;

/// A decoded MessagePack format tag, with any in-tag payload already
/// extracted.
///
/// Nil, map, extension, and BIN types are intentionally absent: this crate
/// never emits them, and [`Marker::from_u8`] maps their tag bytes to
/// [`Marker::Reserved`] so the decoder can reject them uniformly with
/// `TypeMismatch`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    PosFixInt(u8),
    NegFixInt(i8),
    FixStr(u8),
    FixArray(u8),
    False,
    True,
    F32,
    F64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Str8,
    Str16,
    Str32,
    Array16,
    Array32,
    /// Nil, map, extension, BIN, or any other tag byte this crate does not
    /// implement. Always a decode-time `TypeMismatch`.
    Reserved,
}

impl Marker {
    /// Construct a marker from a single tag byte. Any in-tag payload (the
    /// low bits of a fixint/fixstr/fixarray tag) is extracted eagerly.
    pub fn from_u8(n: u8) -> Marker {
        match n {
            0x00..=0x7f => Marker::PosFixInt(n),
            0x80..=0x8f => Marker::Reserved, // fixmap
            0x90..=0x9f => Marker::FixArray(n & 0x0f),
            0xa0..=0xbf => Marker::FixStr(n & 0x1f),
            0xc0 => Marker::Reserved, // nil
            0xc1 => Marker::Reserved,
            0xc2 => Marker::False,
            0xc3 => Marker::True,
            0xc4..=0xc6 => Marker::Reserved, // bin8/16/32
            0xc7..=0xc9 => Marker::Reserved, // ext8/16/32
            0xca => Marker::F32,
            0xcb => Marker::F64,
            0xcc => Marker::UInt8,
            0xcd => Marker::UInt16,
            0xce => Marker::UInt32,
            0xcf => Marker::UInt64,
            0xd0 => Marker::Int8,
            0xd1 => Marker::Int16,
            0xd2 => Marker::Int32,
            0xd3 => Marker::Int64,
            0xd4..=0xd8 => Marker::Reserved, // fixext1/2/4/8/16
            0xd9 => Marker::Str8,
            0xda => Marker::Str16,
            0xdb => Marker::Str32,
            0xdc => Marker::Array16,
            0xdd => Marker::Array32,
            0xde..=0xdf => Marker::Reserved, // map16/32
            0xe0..=0xff => Marker::NegFixInt(n as i8),
        }
    }

    /// Convert a marker back into its tag byte. Assumes any in-tag payload
    /// has already been masked into range by the caller.
    pub fn into_u8(self) -> u8 {
        match self {
            Marker::PosFixInt(val) => val,
            Marker::NegFixInt(val) => val as u8,
            Marker::FixStr(len) => FIXSTR_MASK | len,
            Marker::FixArray(len) => FIXARR_MASK | len,
            Marker::False => 0xc2,
            Marker::True => 0xc3,
            Marker::F32 => 0xca,
            Marker::F64 => 0xcb,
            Marker::UInt8 => 0xcc,
            Marker::UInt16 => 0xcd,
            Marker::UInt32 => 0xce,
            Marker::UInt64 => 0xcf,
            Marker::Int8 => 0xd0,
            Marker::Int16 => 0xd1,
            Marker::Int32 => 0xd2,
            Marker::Int64 => 0xd3,
            Marker::Str8 => 0xd9,
            Marker::Str16 => 0xda,
            Marker::Str32 => 0xdb,
            Marker::Array16 => 0xdc,
            Marker::Array32 => 0xdd,
            Marker::Reserved => 0xc1,
        }
    }

    /// True for a tag's top three bits being `111` and the tag not being one
    /// of the named multi-byte format tags in `0xc0..=0xdf`. This is the
    /// negative-fixint predicate: `0xe0..=0xff` satisfies the bit test, and
    /// nothing in that range is reserved for another family.
    pub fn is_neg_fixint(tag: u8) -> bool {
        (0xe0..=0xff).contains(&tag)
    }
}

impl From<u8> for Marker {
    fn from(val: u8) -> Marker {
        Marker::from_u8(val)
    }
}

impl From<Marker> for u8 {
    fn from(val: Marker) -> u8 {
        val.into_u8()
    }
}
