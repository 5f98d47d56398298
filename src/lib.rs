//! `packio` is a small, dependency-light MessagePack encoder and decoder
//! bound to byte streams.
//!
//! An [`Encoder`] writes values into anything implementing [`WriteStream`];
//! a [`Decoder`] reads them back out of anything implementing
//! [`ReadStream`]. Each call picks the narrowest MessagePack family that
//! represents the value being written, and on read rejects any destination
//! type too narrow to hold every value the decoded family could carry.
//!
//! Nil, map, extension, and bin types are out of scope -- see
//! [`Marker`] for the full family list this crate implements.
//!
//! ```
//! use packio::{Decoder, Encoder, PlainString};
//!
//! let mut buf: Vec<u8> = Vec::new();
//! {
//!     let mut enc = Encoder::new(&mut buf);
//!     enc.put(&true).unwrap().put(&128u32).unwrap().put("hi").unwrap();
//! }
//!
//! let mut dec = Decoder::new(packio::stream::SliceReader::new(&buf));
//! let (mut flag, mut n, mut s) = (false, 0u32, PlainString::default());
//! dec.get(&mut flag).unwrap().get(&mut n).unwrap().get(&mut s).unwrap();
//! assert_eq!((flag, n, s.0.as_str()), (true, 128, "hi"));
//! ```

#![allow(dead_code)]

mod decoder;
mod encoder;
mod endian;
mod error;
mod marker;
pub mod stream;
mod value;

pub use crate::decoder::Decoder;
pub use crate::encoder::Encoder;
pub use crate::error::{Error, Result};
pub use crate::marker::Marker;
pub use crate::stream::{ReadStream, WriteStream};
pub use crate::value::{Decodable, Encodable, FixedStr, PlainString};
