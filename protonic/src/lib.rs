#![doc(html_root_url = "https://docs.rs/protonic/0.1.0")]

//! A protoc-free Protocol Buffers runtime for Rust.
//!
//! `protonic` is the runtime half of the Protonic toolchain: the wire-format
//! codec that code generated by `protonic-build` calls into. It provides the
//! [`Message`] trait, the per-type encoding modules in [`encoding`], the
//! [`UnknownFieldSet`] that keeps messages forward compatible, and the
//! [`OpenEnum`] wrapper for open enumeration semantics.
//!
//! Encoding and decoding operate on in-memory buffers through the
//! [`bytes`] crate's `Buf`/`BufMut` traits and never perform I/O.

// Re-export the bytes crate for use within generated code.
pub use bytes;

mod error;
mod message;
mod open_enum;
mod unknown;

#[doc(hidden)]
pub mod encoding;

pub use crate::encoding::length_delimiter::{
    decode_length_delimiter, encode_length_delimiter, length_delimiter_len,
};
pub use crate::error::{DecodeError, EncodeError, UnknownEnumValue};
pub use crate::message::Message;
pub use crate::open_enum::OpenEnum;
pub use crate::unknown::{UnknownField, UnknownFieldSet};

// See `encoding::DecodeContext` for more info.
// 100 is the default recursion limit in the C++ implementation.
const RECURSION_LIMIT: u32 = 100;
