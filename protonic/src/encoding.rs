//! Utility functions and types for encoding and decoding Protobuf types.
//!
//! Meant to be used only from `Message` implementations.

#![allow(clippy::implicit_hasher, clippy::ptr_arg)]

use std::collections::BTreeMap;
use std::mem;

use ::bytes::{Buf, BufMut, Bytes};

use crate::DecodeError;
use crate::Message;

pub mod varint;
pub use varint::{decode_varint, encode_varint, encoded_len_varint};

pub mod length_delimiter;
pub use length_delimiter::{
    decode_length_delimiter, encode_length_delimiter, length_delimiter_len,
};

pub mod wire_type;
pub use wire_type::{check_wire_type, WireType};

/// Additional state threaded through every decode and merge call.
///
/// The context should be passed by value and can be freely cloned. When
/// passing to a function which is decoding a nested object, use
/// `enter_recursion`.
#[derive(Clone, Debug)]
pub struct DecodeContext {
    /// How many times we can recurse in the current decode stack before we
    /// hit the recursion limit. The limit matches the default of the C++
    /// implementation.
    recurse_count: u32,
    /// Whether missing proto2 `required` fields are decode errors.
    strict: bool,
}

impl Default for DecodeContext {
    #[inline]
    fn default() -> DecodeContext {
        DecodeContext {
            recurse_count: crate::RECURSION_LIMIT,
            strict: false,
        }
    }
}

impl DecodeContext {
    /// A context which additionally requires every proto2 `required` field
    /// to appear on the wire.
    pub fn strict() -> DecodeContext {
        DecodeContext {
            strict: true,
            ..DecodeContext::default()
        }
    }

    /// Whether missing `required` fields fail the decode.
    #[inline]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Returns the context for the next level of nesting. The current
    /// context remains in use at the current level.
    #[inline]
    pub(crate) fn enter_recursion(&self) -> DecodeContext {
        DecodeContext {
            recurse_count: self.recurse_count - 1,
            strict: self.strict,
        }
    }

    /// Checks whether the recursion limit has been reached in the stack of
    /// decodes described by this context.
    ///
    /// Returns `Ok(())` if it is ok to continue recursing.
    #[inline]
    pub(crate) fn limit_reached(&self) -> Result<(), DecodeError> {
        if self.recurse_count == 0 {
            Err(DecodeError::new("recursion limit reached"))
        } else {
            Ok(())
        }
    }
}

pub const MIN_TAG: u32 = 1;
pub const MAX_TAG: u32 = (1 << 29) - 1;

/// Encodes a Protobuf field key, which consists of a wire type designator
/// and the field tag.
#[inline]
pub fn encode_key(tag: u32, wire_type: WireType, buf: &mut impl BufMut) {
    debug_assert!((MIN_TAG..=MAX_TAG).contains(&tag));
    let key = (tag << 3) | wire_type as u32;
    encode_varint(u64::from(key), buf);
}

/// Decodes a Protobuf field key, which consists of a wire type designator
/// and the field tag.
#[inline(always)]
pub fn decode_key(buf: &mut impl Buf) -> Result<(u32, WireType), DecodeError> {
    let key = decode_varint(buf)?;
    if key > u64::from(u32::MAX) {
        return Err(DecodeError::new(format!("invalid key value: {}", key)));
    }
    let wire_type = WireType::try_from(key & 0x07)?;
    let tag = key as u32 >> 3;

    if tag < MIN_TAG {
        return Err(DecodeError::new("invalid tag value: 0"));
    }

    Ok((tag, wire_type))
}

/// Returns the width of an encoded Protobuf field key with the given tag.
/// The returned width will be between 1 and 5 bytes (inclusive).
#[inline]
pub fn key_len(tag: u32) -> usize {
    encoded_len_varint(u64::from(tag << 3))
}

/// Encodes a signed 32-bit value with the ZigZag mapping, so that small
/// magnitudes of either sign stay small on the wire.
#[inline]
pub fn zigzag_encode32(value: i32) -> u64 {
    ((value << 1) ^ (value >> 31)) as u32 as u64
}

/// Inverse of [`zigzag_encode32`].
#[inline]
pub fn zigzag_decode32(raw: u64) -> i32 {
    let raw = raw as u32;
    ((raw >> 1) as i32) ^ (-((raw & 1) as i32))
}

/// Encodes a signed 64-bit value with the ZigZag mapping.
#[inline]
pub fn zigzag_encode64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode64`].
#[inline]
pub fn zigzag_decode64(raw: u64) -> i64 {
    ((raw >> 1) as i64) ^ (-((raw & 1) as i64))
}

/// Helper function which abstracts reading a length delimiter prefix
/// followed by decoding values until the length of bytes is exhausted.
pub fn merge_loop<T, M, B>(
    value: &mut T,
    buf: &mut B,
    ctx: DecodeContext,
    mut merge: M,
) -> Result<(), DecodeError>
where
    M: FnMut(&mut T, &mut B, DecodeContext) -> Result<(), DecodeError>,
    B: Buf,
{
    let len = decode_varint(buf)?;
    let remaining = buf.remaining();
    if len > remaining as u64 {
        return Err(DecodeError::new("buffer underflow"));
    }

    let limit = remaining - len as usize;
    while buf.remaining() > limit {
        merge(value, buf, ctx.clone())?;
    }

    if buf.remaining() != limit {
        return Err(DecodeError::new("delimited length exceeded"));
    }
    Ok(())
}

/// Consumes and discards one record of the given wire type, validating
/// group balance along the way.
pub fn skip_field(
    wire_type: WireType,
    tag: u32,
    buf: &mut impl Buf,
    ctx: DecodeContext,
) -> Result<(), DecodeError> {
    ctx.limit_reached()?;
    let len = match wire_type {
        WireType::Varint => decode_varint(buf).map(|_| 0)?,
        WireType::ThirtyTwoBit => 4,
        WireType::SixtyFourBit => 8,
        WireType::LengthDelimited => decode_varint(buf)?,
        WireType::StartGroup => loop {
            let (inner_tag, inner_wire_type) = decode_key(buf)?;
            match inner_wire_type {
                WireType::EndGroup => {
                    if inner_tag != tag {
                        return Err(DecodeError::new("unexpected end group tag"));
                    }
                    break 0;
                }
                _ => skip_field(inner_wire_type, inner_tag, buf, ctx.enter_recursion())?,
            }
        },
        WireType::EndGroup => return Err(DecodeError::new("unexpected end group tag")),
    };

    if len > buf.remaining() as u64 {
        return Err(DecodeError::new("buffer underflow"));
    }

    buf.advance(len as usize);
    Ok(())
}

/// Emits a module containing the encoding functions for a numeric type
/// carried in a varint record.
macro_rules! varint_codec {
    ($ty:ty, $proto_ty:ident) => {
        varint_codec!($ty, $proto_ty,
                      raw(value) { *value as u64 },
                      val(raw) { raw as $ty });
    };

    ($ty:ty, $proto_ty:ident,
     raw($value:ident) $into_raw:block,
     val($raw:ident) $from_raw:block) => {
        pub mod $proto_ty {
            use crate::encoding::*;

            #[inline]
            fn to_raw($value: &$ty) -> u64 $into_raw

            #[inline]
            fn from_raw($raw: u64) -> $ty $from_raw

            pub fn encode(tag: u32, value: &$ty, buf: &mut impl BufMut) {
                encode_key(tag, WireType::Varint, buf);
                encode_varint(to_raw(value), buf);
            }

            pub fn merge(wire_type: WireType, value: &mut $ty, buf: &mut impl Buf, _ctx: DecodeContext) -> Result<(), DecodeError> {
                check_wire_type(WireType::Varint, wire_type)?;
                *value = from_raw(decode_varint(buf)?);
                Ok(())
            }

            pub fn encode_repeated(tag: u32, values: &[$ty], buf: &mut impl BufMut) {
                for value in values {
                    encode(tag, value, buf);
                }
            }

            pub fn encode_packed(tag: u32, values: &[$ty], buf: &mut impl BufMut) {
                if values.is_empty() {
                    return;
                }

                encode_key(tag, WireType::LengthDelimited, buf);
                let len: usize = values.iter().map(|value| encoded_len_varint(to_raw(value))).sum();
                encode_varint(len as u64, buf);

                for value in values {
                    encode_varint(to_raw(value), buf);
                }
            }

            /// Accepts both the packed and the unpacked representation,
            /// regardless of the field's declared packedness.
            pub fn merge_repeated(wire_type: WireType, values: &mut Vec<$ty>, buf: &mut impl Buf, ctx: DecodeContext) -> Result<(), DecodeError> {
                if wire_type == WireType::LengthDelimited {
                    merge_loop(values, buf, ctx, |values, buf, ctx| {
                        let mut value = <$ty>::default();
                        merge(WireType::Varint, &mut value, buf, ctx)?;
                        values.push(value);
                        Ok(())
                    })
                } else {
                    let mut value = <$ty>::default();
                    merge(wire_type, &mut value, buf, ctx)?;
                    values.push(value);
                    Ok(())
                }
            }

            #[inline]
            pub fn encoded_len(tag: u32, value: &$ty) -> usize {
                key_len(tag) + encoded_len_varint(to_raw(value))
            }

            #[inline]
            pub fn encoded_len_repeated(tag: u32, values: &[$ty]) -> usize {
                key_len(tag) * values.len()
                    + values.iter().map(|value| encoded_len_varint(to_raw(value))).sum::<usize>()
            }

            #[inline]
            pub fn encoded_len_packed(tag: u32, values: &[$ty]) -> usize {
                if values.is_empty() {
                    0
                } else {
                    let len = values.iter()
                                    .map(|value| encoded_len_varint(to_raw(value)))
                                    .sum::<usize>();
                    key_len(tag) + encoded_len_varint(len as u64) + len
                }
            }

        }
    };
}

varint_codec!(bool, bool,
              raw(value) { u64::from(*value) },
              val(raw) { raw != 0 });
varint_codec!(i32, int32);
varint_codec!(i64, int64);
varint_codec!(u32, uint32);
varint_codec!(u64, uint64);
varint_codec!(i32, sint32,
              raw(value) { zigzag_encode32(*value) },
              val(raw) { zigzag_decode32(raw) });
varint_codec!(i64, sint64,
              raw(value) { zigzag_encode64(*value) },
              val(raw) { zigzag_decode64(raw) });

/// Emits a module containing the encoding functions for a fixed width
/// numeric type.
macro_rules! fixed_codec {
    ($ty:ty, $proto_ty:ident, $width:expr, $wire_type:expr, $put:ident, $get:ident) => {
        pub mod $proto_ty {
            use crate::encoding::*;

            pub fn encode(tag: u32, value: &$ty, buf: &mut impl BufMut) {
                encode_key(tag, $wire_type, buf);
                buf.$put(*value);
            }

            pub fn merge(
                wire_type: WireType,
                value: &mut $ty,
                buf: &mut impl Buf,
                _ctx: DecodeContext,
            ) -> Result<(), DecodeError> {
                check_wire_type($wire_type, wire_type)?;
                if buf.remaining() < $width {
                    return Err(DecodeError::new("buffer underflow"));
                }
                *value = buf.$get();
                Ok(())
            }

            pub fn encode_repeated(tag: u32, values: &[$ty], buf: &mut impl BufMut) {
                for value in values {
                    encode(tag, value, buf);
                }
            }

            pub fn encode_packed(tag: u32, values: &[$ty], buf: &mut impl BufMut) {
                if values.is_empty() {
                    return;
                }

                encode_key(tag, WireType::LengthDelimited, buf);
                let len = values.len() as u64 * $width;
                encode_varint(len, buf);

                for value in values {
                    buf.$put(*value);
                }
            }

            /// Accepts both the packed and the unpacked representation,
            /// regardless of the field's declared packedness.
            pub fn merge_repeated(
                wire_type: WireType,
                values: &mut Vec<$ty>,
                buf: &mut impl Buf,
                ctx: DecodeContext,
            ) -> Result<(), DecodeError> {
                if wire_type == WireType::LengthDelimited {
                    merge_loop(values, buf, ctx, |values, buf, ctx| {
                        let mut value = <$ty>::default();
                        merge($wire_type, &mut value, buf, ctx)?;
                        values.push(value);
                        Ok(())
                    })
                } else {
                    let mut value = <$ty>::default();
                    merge(wire_type, &mut value, buf, ctx)?;
                    values.push(value);
                    Ok(())
                }
            }

            #[inline]
            pub fn encoded_len(tag: u32, _: &$ty) -> usize {
                key_len(tag) + $width
            }

            #[inline]
            pub fn encoded_len_repeated(tag: u32, values: &[$ty]) -> usize {
                (key_len(tag) + $width) * values.len()
            }

            #[inline]
            pub fn encoded_len_packed(tag: u32, values: &[$ty]) -> usize {
                if values.is_empty() {
                    0
                } else {
                    let len = $width * values.len();
                    key_len(tag) + encoded_len_varint(len as u64) + len
                }
            }

            #[cfg(test)]
            mod test {
                use proptest::prelude::*;

                use super::super::test::{check_collection_type, check_type};
                use super::*;

                proptest! {
                    #[test]
                    fn check(value: $ty, tag in MIN_TAG..=MAX_TAG) {
                        check_type(value, tag, $wire_type,
                                   encode, merge, encoded_len)?;
                    }
                    #[test]
                    fn check_repeated(value: Vec<$ty>, tag in MIN_TAG..=MAX_TAG) {
                        check_collection_type(value, tag, $wire_type,
                                              encode_repeated, merge_repeated,
                                              encoded_len_repeated)?;
                    }
                    #[test]
                    fn check_packed(value: Vec<$ty>, tag in MIN_TAG..=MAX_TAG) {
                        check_type(value, tag, WireType::LengthDelimited,
                                   encode_packed, merge_repeated,
                                   encoded_len_packed)?;
                    }
                }
            }
        }
    };
}

fixed_codec!(f32, float, 4, WireType::ThirtyTwoBit, put_f32_le, get_f32_le);
fixed_codec!(f64, double, 8, WireType::SixtyFourBit, put_f64_le, get_f64_le);
fixed_codec!(u32, fixed32, 4, WireType::ThirtyTwoBit, put_u32_le, get_u32_le);
fixed_codec!(u64, fixed64, 8, WireType::SixtyFourBit, put_u64_le, get_u64_le);
fixed_codec!(i32, sfixed32, 4, WireType::ThirtyTwoBit, put_i32_le, get_i32_le);
fixed_codec!(i64, sfixed64, 8, WireType::SixtyFourBit, put_i64_le, get_i64_le);

/// Emits encoding functions shared by the length-delimited types.
macro_rules! length_delimited {
    ($ty:ty) => {
        pub fn encode_repeated(tag: u32, values: &[$ty], buf: &mut impl BufMut) {
            for value in values {
                encode(tag, value, buf);
            }
        }

        pub fn merge_repeated(
            wire_type: WireType,
            values: &mut Vec<$ty>,
            buf: &mut impl Buf,
            ctx: DecodeContext,
        ) -> Result<(), DecodeError> {
            check_wire_type(WireType::LengthDelimited, wire_type)?;
            let mut value = Default::default();
            merge(wire_type, &mut value, buf, ctx)?;
            values.push(value);
            Ok(())
        }

        #[inline]
        pub fn encoded_len(tag: u32, value: &$ty) -> usize {
            key_len(tag) + encoded_len_varint(value.len() as u64) + value.len()
        }

        #[inline]
        pub fn encoded_len_repeated(tag: u32, values: &[$ty]) -> usize {
            key_len(tag) * values.len()
                + values
                    .iter()
                    .map(|value| encoded_len_varint(value.len() as u64) + value.len())
                    .sum::<usize>()
        }
    };
}

pub mod string {
    use super::*;

    pub fn encode(tag: u32, value: &String, buf: &mut impl BufMut) {
        encode_key(tag, WireType::LengthDelimited, buf);
        encode_varint(value.len() as u64, buf);
        buf.put_slice(value.as_bytes());
    }

    /// Merges one length-delimited record into `value`, validating that the
    /// data is well-formed UTF-8.
    ///
    /// On any failure the field is left cleared so that partially copied or
    /// invalid data never leaks into the backing `String`. The previous
    /// allocation is reused when possible.
    pub fn merge(
        wire_type: WireType,
        value: &mut String,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        let mut utf8 = mem::take(value).into_bytes();
        utf8.clear();
        bytes::merge(wire_type, &mut utf8, buf, ctx)?;
        match String::from_utf8(utf8) {
            Ok(merged) => {
                *value = merged;
                Ok(())
            }
            Err(_) => Err(DecodeError::new(
                "invalid string value: data is not UTF-8 encoded",
            )),
        }
    }

    length_delimited!(String);

    #[cfg(test)]
    mod test {
        use proptest::prelude::*;

        use super::super::test::{check_collection_type, check_type};
        use super::*;

        proptest! {
            #[test]
            fn check(value: String, tag in MIN_TAG..=MAX_TAG) {
                check_type(value, tag, WireType::LengthDelimited,
                           encode, merge, encoded_len)?;
            }
            #[test]
            fn check_repeated(value: Vec<String>, tag in MIN_TAG..=MAX_TAG) {
                check_collection_type(value, tag, WireType::LengthDelimited,
                                      encode_repeated, merge_repeated,
                                      encoded_len_repeated)?;
            }
        }

        #[test]
        fn merge_invalid_utf8() {
            let mut value = String::from("previous");
            let buf = b"\x02\x80\x80";

            string::merge(
                WireType::LengthDelimited,
                &mut value,
                &mut &buf[..],
                DecodeContext::default(),
            )
            .expect_err("must be an error");
            assert!(value.is_empty());
        }
    }
}

/// A container type which can back a Protobuf `bytes` field.
pub trait BytesAdapter: sealed::BytesAdapter {}

mod sealed {
    use super::{Buf, BufMut};

    pub trait BytesAdapter: Default + Sized + 'static {
        fn len(&self) -> usize;

        /// Replace contents of this buffer with the contents of another
        /// buffer.
        fn replace_with(&mut self, buf: impl Buf);

        /// Appends this buffer to the (contents of) other buffer.
        fn append_to(&self, buf: &mut impl BufMut);

        fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }
}

impl BytesAdapter for Bytes {}

impl sealed::BytesAdapter for Bytes {
    fn len(&self) -> usize {
        Buf::remaining(self)
    }

    fn replace_with(&mut self, mut buf: impl Buf) {
        *self = buf.copy_to_bytes(buf.remaining());
    }

    fn append_to(&self, buf: &mut impl BufMut) {
        buf.put(self.clone())
    }
}

impl BytesAdapter for Vec<u8> {}

impl sealed::BytesAdapter for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn replace_with(&mut self, buf: impl Buf) {
        self.clear();
        self.reserve(buf.remaining());
        self.put(buf);
    }

    fn append_to(&self, buf: &mut impl BufMut) {
        buf.put(self.as_slice())
    }
}

pub mod bytes {
    use super::*;

    pub fn encode(tag: u32, value: &impl BytesAdapter, buf: &mut impl BufMut) {
        encode_key(tag, WireType::LengthDelimited, buf);
        encode_varint(value.len() as u64, buf);
        value.append_to(buf);
    }

    /// Merges one length-delimited record into `value`, replacing any
    /// previous contents.
    ///
    /// An encoded message should never carry more than one record for a
    /// non-repeated field, but parsers are expected to accept it and keep
    /// the last value seen, so the old contents are discarded.
    pub fn merge(
        wire_type: WireType,
        value: &mut impl BytesAdapter,
        buf: &mut impl Buf,
        _ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        check_wire_type(WireType::LengthDelimited, wire_type)?;
        let len = decode_varint(buf)?;
        if len > buf.remaining() as u64 {
            return Err(DecodeError::new("buffer underflow"));
        }

        value.replace_with(buf.take(len as usize));
        Ok(())
    }

    length_delimited!(impl BytesAdapter);

    #[cfg(test)]
    mod test {
        use proptest::prelude::*;

        use super::super::test::{check_collection_type, check_type};
        use super::*;

        proptest! {
            #[test]
            fn check_vec(value: Vec<u8>, tag in MIN_TAG..=MAX_TAG) {
                check_type::<Vec<u8>, Vec<u8>>(value, tag, WireType::LengthDelimited,
                                               encode, merge, encoded_len)?;
            }

            #[test]
            fn check_bytes(value: Vec<u8>, tag in MIN_TAG..=MAX_TAG) {
                let value = Bytes::from(value);
                check_type::<Bytes, Bytes>(value, tag, WireType::LengthDelimited,
                                           encode, merge, encoded_len)?;
            }

            #[test]
            fn check_repeated_vec(value: Vec<Vec<u8>>, tag in MIN_TAG..=MAX_TAG) {
                check_collection_type(value, tag, WireType::LengthDelimited,
                                      encode_repeated, merge_repeated,
                                      encoded_len_repeated)?;
            }
        }
    }
}

pub mod message {
    use super::*;

    pub fn encode<M>(tag: u32, msg: &M, buf: &mut impl BufMut)
    where
        M: Message,
    {
        encode_key(tag, WireType::LengthDelimited, buf);
        encode_varint(msg.encoded_len() as u64, buf);
        msg.encode_raw(buf);
    }

    /// Merges one length-delimited message record into `msg`.
    ///
    /// The nested decode is bounded to the delimited length with
    /// [`Buf::take`] and routed through [`Message::merge_raw`], so messages
    /// which track `required` presence see every record addressed to them.
    pub fn merge<M, B>(
        wire_type: WireType,
        msg: &mut M,
        buf: &mut B,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>
    where
        M: Message,
        B: Buf,
    {
        check_wire_type(WireType::LengthDelimited, wire_type)?;
        ctx.limit_reached()?;
        let len = decode_varint(buf)?;
        if len > buf.remaining() as u64 {
            return Err(DecodeError::new("buffer underflow"));
        }

        let mut body = buf.take(len as usize);
        msg.merge_raw(&mut body, ctx.enter_recursion())
    }

    pub fn encode_repeated<M>(tag: u32, messages: &[M], buf: &mut impl BufMut)
    where
        M: Message,
    {
        for msg in messages {
            encode(tag, msg, buf);
        }
    }

    pub fn merge_repeated<M>(
        wire_type: WireType,
        messages: &mut Vec<M>,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>
    where
        M: Message + Default,
    {
        check_wire_type(WireType::LengthDelimited, wire_type)?;
        let mut msg = M::default();
        merge(WireType::LengthDelimited, &mut msg, buf, ctx)?;
        messages.push(msg);
        Ok(())
    }

    #[inline]
    pub fn encoded_len<M>(tag: u32, msg: &M) -> usize
    where
        M: Message,
    {
        let len = msg.encoded_len();
        key_len(tag) + encoded_len_varint(len as u64) + len
    }

    #[inline]
    pub fn encoded_len_repeated<M>(tag: u32, messages: &[M]) -> usize
    where
        M: Message,
    {
        key_len(tag) * messages.len()
            + messages
                .iter()
                .map(Message::encoded_len)
                .map(|len| len + encoded_len_varint(len as u64))
                .sum::<usize>()
    }
}

pub mod group {
    use super::*;

    pub fn encode<M>(tag: u32, msg: &M, buf: &mut impl BufMut)
    where
        M: Message,
    {
        encode_key(tag, WireType::StartGroup, buf);
        msg.encode_raw(buf);
        encode_key(tag, WireType::EndGroup, buf);
    }

    pub fn merge<M>(
        tag: u32,
        wire_type: WireType,
        msg: &mut M,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>
    where
        M: Message,
    {
        check_wire_type(WireType::StartGroup, wire_type)?;

        ctx.limit_reached()?;
        loop {
            let (field_tag, field_wire_type) = decode_key(buf)?;
            if field_wire_type == WireType::EndGroup {
                if field_tag != tag {
                    return Err(DecodeError::new("unexpected end group tag"));
                }
                return Ok(());
            }

            msg.merge_field(field_tag, field_wire_type, buf, ctx.enter_recursion())?;
        }
    }

    pub fn encode_repeated<M>(tag: u32, messages: &[M], buf: &mut impl BufMut)
    where
        M: Message,
    {
        for msg in messages {
            encode(tag, msg, buf);
        }
    }

    pub fn merge_repeated<M>(
        tag: u32,
        wire_type: WireType,
        messages: &mut Vec<M>,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>
    where
        M: Message + Default,
    {
        check_wire_type(WireType::StartGroup, wire_type)?;
        let mut msg = M::default();
        merge(tag, WireType::StartGroup, &mut msg, buf, ctx)?;
        messages.push(msg);
        Ok(())
    }

    #[inline]
    pub fn encoded_len<M>(tag: u32, msg: &M) -> usize
    where
        M: Message,
    {
        2 * key_len(tag) + msg.encoded_len()
    }

    #[inline]
    pub fn encoded_len_repeated<M>(tag: u32, messages: &[M]) -> usize
    where
        M: Message,
    {
        2 * key_len(tag) * messages.len() + messages.iter().map(Message::encoded_len).sum::<usize>()
    }
}

pub mod open_enum {
    use super::*;
    use crate::OpenEnum;

    pub fn encode<T>(tag: u32, value: &OpenEnum<T>, buf: &mut impl BufMut)
    where
        T: Clone + Into<i32>,
    {
        int32::encode(tag, &value.to_raw(), buf);
    }

    pub fn merge<T>(
        wire_type: WireType,
        value: &mut OpenEnum<T>,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>
    where
        i32: TryInto<T>,
    {
        let mut raw = 0i32;
        int32::merge(wire_type, &mut raw, buf, ctx)?;
        *value = OpenEnum::from_raw(raw);
        Ok(())
    }

    pub fn encode_repeated<T>(tag: u32, values: &[OpenEnum<T>], buf: &mut impl BufMut)
    where
        T: Clone + Into<i32>,
    {
        for value in values {
            encode(tag, value, buf);
        }
    }

    pub fn encode_packed<T>(tag: u32, values: &[OpenEnum<T>], buf: &mut impl BufMut)
    where
        T: Clone + Into<i32>,
    {
        if values.is_empty() {
            return;
        }

        encode_key(tag, WireType::LengthDelimited, buf);
        let len: usize = values
            .iter()
            .map(|value| encoded_len_varint(value.to_raw() as u64))
            .sum();
        encode_varint(len as u64, buf);

        for value in values {
            encode_varint(value.to_raw() as u64, buf);
        }
    }

    /// Accepts both the packed and the unpacked representation, regardless
    /// of the field's declared packedness.
    pub fn merge_repeated<T>(
        wire_type: WireType,
        values: &mut Vec<OpenEnum<T>>,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>
    where
        i32: TryInto<T>,
    {
        if wire_type == WireType::LengthDelimited {
            merge_loop(values, buf, ctx, |values, buf, ctx| {
                let mut value = OpenEnum::from_raw(0);
                merge(WireType::Varint, &mut value, buf, ctx)?;
                values.push(value);
                Ok(())
            })
        } else {
            let mut value = OpenEnum::from_raw(0);
            merge(wire_type, &mut value, buf, ctx)?;
            values.push(value);
            Ok(())
        }
    }

    #[inline]
    pub fn encoded_len<T>(tag: u32, value: &OpenEnum<T>) -> usize
    where
        T: Clone + Into<i32>,
    {
        key_len(tag) + encoded_len_varint(value.to_raw() as u64)
    }

    #[inline]
    pub fn encoded_len_repeated<T>(tag: u32, values: &[OpenEnum<T>]) -> usize
    where
        T: Clone + Into<i32>,
    {
        key_len(tag) * values.len()
            + values
                .iter()
                .map(|value| encoded_len_varint(value.to_raw() as u64))
                .sum::<usize>()
    }

    #[inline]
    pub fn encoded_len_packed<T>(tag: u32, values: &[OpenEnum<T>]) -> usize
    where
        T: Clone + Into<i32>,
    {
        if values.is_empty() {
            0
        } else {
            let len = values
                .iter()
                .map(|value| encoded_len_varint(value.to_raw() as u64))
                .sum::<usize>();
            key_len(tag) + encoded_len_varint(len as u64) + len
        }
    }
}

/// Rust doesn't have a `Map` trait, so macros are currently the best way to
/// be generic over `HashMap` and `BTreeMap`.
macro_rules! map_codec {
    ($map_ty:ident) => {
        use crate::encoding::*;
        use core::hash::Hash;

        /// Generic protobuf map encode function.
        pub fn encode<K, V, B, KE, KL, VE, VL>(
            key_encode: KE,
            key_encoded_len: KL,
            val_encode: VE,
            val_encoded_len: VL,
            tag: u32,
            values: &$map_ty<K, V>,
            buf: &mut B,
        ) where
            K: Default + Eq + Hash + Ord,
            V: Default + PartialEq,
            B: BufMut,
            KE: Fn(u32, &K, &mut B),
            KL: Fn(u32, &K) -> usize,
            VE: Fn(u32, &V, &mut B),
            VL: Fn(u32, &V) -> usize,
        {
            encode_with_default(
                key_encode,
                key_encoded_len,
                val_encode,
                val_encoded_len,
                &V::default(),
                tag,
                values,
                buf,
            )
        }

        /// Generic protobuf map merge function.
        pub fn merge<K, V, B, KM, VM>(
            key_merge: KM,
            val_merge: VM,
            values: &mut $map_ty<K, V>,
            buf: &mut B,
            ctx: DecodeContext,
        ) -> Result<(), DecodeError>
        where
            K: Default + Eq + Hash + Ord,
            V: Default,
            B: Buf,
            KM: Fn(WireType, &mut K, &mut B, DecodeContext) -> Result<(), DecodeError>,
            VM: Fn(WireType, &mut V, &mut B, DecodeContext) -> Result<(), DecodeError>,
        {
            merge_with_default(key_merge, val_merge, V::default(), values, buf, ctx)
        }

        /// Generic protobuf map encoded length function.
        pub fn encoded_len<K, V, KL, VL>(
            key_encoded_len: KL,
            val_encoded_len: VL,
            tag: u32,
            values: &$map_ty<K, V>,
        ) -> usize
        where
            K: Default + Eq + Hash + Ord,
            V: Default + PartialEq,
            KL: Fn(u32, &K) -> usize,
            VL: Fn(u32, &V) -> usize,
        {
            encoded_len_with_default(key_encoded_len, val_encoded_len, &V::default(), tag, values)
        }

        /// Generic protobuf map encode function with an overridden value
        /// default.
        ///
        /// This is necessary because enumeration values can have a default
        /// value other than 0 in proto2.
        pub fn encode_with_default<K, V, B, KE, KL, VE, VL>(
            key_encode: KE,
            key_encoded_len: KL,
            val_encode: VE,
            val_encoded_len: VL,
            val_default: &V,
            tag: u32,
            values: &$map_ty<K, V>,
            buf: &mut B,
        ) where
            K: Default + Eq + Hash + Ord,
            V: PartialEq,
            B: BufMut,
            KE: Fn(u32, &K, &mut B),
            KL: Fn(u32, &K) -> usize,
            VE: Fn(u32, &V, &mut B),
            VL: Fn(u32, &V) -> usize,
        {
            for (key, val) in values.iter() {
                let skip_key = key == &K::default();
                let skip_val = val == val_default;

                let len = (if skip_key { 0 } else { key_encoded_len(1, key) })
                    + (if skip_val { 0 } else { val_encoded_len(2, val) });

                encode_key(tag, WireType::LengthDelimited, buf);
                encode_varint(len as u64, buf);
                if !skip_key {
                    key_encode(1, key, buf);
                }
                if !skip_val {
                    val_encode(2, val, buf);
                }
            }
        }

        /// Generic protobuf map merge function with an overridden value
        /// default.
        ///
        /// Entries may arrive in any order; a duplicate key overwrites the
        /// previous entry, and a missing key or value takes its default.
        pub fn merge_with_default<K, V, B, KM, VM>(
            key_merge: KM,
            val_merge: VM,
            val_default: V,
            values: &mut $map_ty<K, V>,
            buf: &mut B,
            ctx: DecodeContext,
        ) -> Result<(), DecodeError>
        where
            K: Default + Eq + Hash + Ord,
            B: Buf,
            KM: Fn(WireType, &mut K, &mut B, DecodeContext) -> Result<(), DecodeError>,
            VM: Fn(WireType, &mut V, &mut B, DecodeContext) -> Result<(), DecodeError>,
        {
            let mut key = Default::default();
            let mut val = val_default;
            ctx.limit_reached()?;
            merge_loop(
                &mut (&mut key, &mut val),
                buf,
                ctx.enter_recursion(),
                |&mut (ref mut key, ref mut val), buf, ctx| {
                    let (tag, wire_type) = decode_key(buf)?;
                    match tag {
                        1 => key_merge(wire_type, key, buf, ctx),
                        2 => val_merge(wire_type, val, buf, ctx),
                        _ => skip_field(wire_type, tag, buf, ctx),
                    }
                },
            )?;
            values.insert(key, val);

            Ok(())
        }

        /// Generic protobuf map encoded length function with an overridden
        /// value default.
        pub fn encoded_len_with_default<K, V, KL, VL>(
            key_encoded_len: KL,
            val_encoded_len: VL,
            val_default: &V,
            tag: u32,
            values: &$map_ty<K, V>,
        ) -> usize
        where
            K: Default + Eq + Hash + Ord,
            V: PartialEq,
            KL: Fn(u32, &K) -> usize,
            VL: Fn(u32, &V) -> usize,
        {
            key_len(tag) * values.len()
                + values
                    .iter()
                    .map(|(key, val)| {
                        let len = (if key == &K::default() {
                            0
                        } else {
                            key_encoded_len(1, key)
                        }) + (if val == val_default {
                            0
                        } else {
                            val_encoded_len(2, val)
                        });
                        encoded_len_varint(len as u64) + len
                    })
                    .sum::<usize>()
        }
    };
}

pub mod hash_map {
    use std::collections::HashMap;
    map_codec!(HashMap);
}

pub mod btree_map {
    map_codec!(BTreeMap);
}

#[cfg(test)]
mod test {
    use core::borrow::Borrow;
    use core::fmt::Debug;
    use std::collections::HashMap;

    use ::bytes::BytesMut;
    use proptest::{prelude::*, test_runner::TestCaseResult};

    use super::*;

    pub fn check_type<T, B>(
        value: T,
        tag: u32,
        wire_type: WireType,
        encode: fn(u32, &B, &mut BytesMut),
        merge: fn(WireType, &mut T, &mut Bytes, DecodeContext) -> Result<(), DecodeError>,
        encoded_len: fn(u32, &B) -> usize,
    ) -> TestCaseResult
    where
        T: Debug + Default + PartialEq + Borrow<B>,
        B: ?Sized,
    {
        prop_assume!((MIN_TAG..=MAX_TAG).contains(&tag));

        let expected_len = encoded_len(tag, value.borrow());

        let mut buf = BytesMut::with_capacity(expected_len);
        encode(tag, value.borrow(), &mut buf);

        let mut buf = buf.freeze();

        prop_assert_eq!(
            buf.remaining(),
            expected_len,
            "encoded_len wrong; expected: {}, actual: {}",
            expected_len,
            buf.remaining()
        );

        if !buf.has_remaining() {
            // Short circuit for empty packed values.
            return Ok(());
        }

        let (decoded_tag, decoded_wire_type) =
            decode_key(&mut buf).map_err(|error| TestCaseError::fail(error.to_string()))?;
        prop_assert_eq!(
            tag,
            decoded_tag,
            "decoded tag does not match; expected: {}, actual: {}",
            tag,
            decoded_tag
        );

        prop_assert_eq!(
            wire_type,
            decoded_wire_type,
            "decoded wire type does not match; expected: {:?}, actual: {:?}",
            wire_type,
            decoded_wire_type,
        );

        match wire_type {
            WireType::SixtyFourBit if buf.remaining() != 8 => Err(TestCaseError::fail(format!(
                "64bit wire type illegal remaining: {}, tag: {}",
                buf.remaining(),
                tag
            ))),
            WireType::ThirtyTwoBit if buf.remaining() != 4 => Err(TestCaseError::fail(format!(
                "32bit wire type illegal remaining: {}, tag: {}",
                buf.remaining(),
                tag
            ))),
            _ => Ok(()),
        }?;

        let mut roundtrip_value = T::default();
        merge(
            wire_type,
            &mut roundtrip_value,
            &mut buf,
            DecodeContext::default(),
        )
        .map_err(|error| TestCaseError::fail(error.to_string()))?;

        prop_assert!(
            !buf.has_remaining(),
            "expected buffer to be empty, remaining: {}",
            buf.remaining()
        );

        prop_assert_eq!(value, roundtrip_value);

        Ok(())
    }

    pub fn check_collection_type<T, B, E, M, L>(
        value: T,
        tag: u32,
        wire_type: WireType,
        encode: E,
        mut merge: M,
        encoded_len: L,
    ) -> TestCaseResult
    where
        T: Debug + Default + PartialEq + Borrow<B>,
        B: ?Sized,
        E: FnOnce(u32, &B, &mut BytesMut),
        M: FnMut(WireType, &mut T, &mut Bytes, DecodeContext) -> Result<(), DecodeError>,
        L: FnOnce(u32, &B) -> usize,
    {
        prop_assume!((MIN_TAG..=MAX_TAG).contains(&tag));

        let expected_len = encoded_len(tag, value.borrow());

        let mut buf = BytesMut::with_capacity(expected_len);
        encode(tag, value.borrow(), &mut buf);

        let mut buf = buf.freeze();

        prop_assert_eq!(
            buf.remaining(),
            expected_len,
            "encoded_len wrong; expected: {}, actual: {}",
            expected_len,
            buf.remaining()
        );

        let mut roundtrip_value = Default::default();
        while buf.has_remaining() {
            let (decoded_tag, decoded_wire_type) =
                decode_key(&mut buf).map_err(|error| TestCaseError::fail(error.to_string()))?;

            prop_assert_eq!(
                tag,
                decoded_tag,
                "decoded tag does not match; expected: {}, actual: {}",
                tag,
                decoded_tag
            );

            prop_assert_eq!(
                wire_type,
                decoded_wire_type,
                "decoded wire type does not match; expected: {:?}, actual: {:?}",
                wire_type,
                decoded_wire_type
            );

            merge(
                wire_type,
                &mut roundtrip_value,
                &mut buf,
                DecodeContext::default(),
            )
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        }

        prop_assert_eq!(value, roundtrip_value);

        Ok(())
    }

    proptest! {
        #[test]
        fn check_hash_map(values: HashMap<i32, i32>, tag in MIN_TAG..=MAX_TAG) {
            check_collection_type(values, tag, WireType::LengthDelimited,
                                  |tag, values, buf| {
                                      hash_map::encode(int32::encode,
                                                       int32::encoded_len,
                                                       int32::encode,
                                                       int32::encoded_len,
                                                       tag,
                                                       values,
                                                       buf)
                                  },
                                  |wire_type, values, buf, ctx| {
                                      check_wire_type(WireType::LengthDelimited, wire_type)?;
                                      hash_map::merge(int32::merge, int32::merge, values, buf, ctx)
                                  },
                                  |tag, values| {
                                      hash_map::encoded_len(int32::encoded_len,
                                                            int32::encoded_len,
                                                            tag,
                                                            values)
                                  })?;
        }

        #[test]
        fn check_btree_map(values: BTreeMap<String, String>, tag in MIN_TAG..=MAX_TAG) {
            check_collection_type(values, tag, WireType::LengthDelimited,
                                  |tag, values, buf| {
                                      btree_map::encode(string::encode,
                                                        string::encoded_len,
                                                        string::encode,
                                                        string::encoded_len,
                                                        tag,
                                                        values,
                                                        buf)
                                  },
                                  |wire_type, values, buf, ctx| {
                                      check_wire_type(WireType::LengthDelimited, wire_type)?;
                                      btree_map::merge(string::merge, string::merge, values, buf, ctx)
                                  },
                                  |tag, values| {
                                      btree_map::encoded_len(string::encoded_len,
                                                             string::encoded_len,
                                                             tag,
                                                             values)
                                  })?;
        }
    }

    #[test]
    fn zigzag() {
        assert_eq!(zigzag_encode32(0), 0);
        assert_eq!(zigzag_encode32(-1), 1);
        assert_eq!(zigzag_encode32(1), 2);
        assert_eq!(zigzag_encode32(i32::MIN), u64::from(u32::MAX));
        assert_eq!(zigzag_encode64(i64::MIN), u64::MAX);

        for value in [0i64, 1, -1, 42, -42, i64::MIN, i64::MAX] {
            assert_eq!(zigzag_decode64(zigzag_encode64(value)), value);
        }
        for value in [0i32, 1, -1, 42, -42, i32::MIN, i32::MAX] {
            assert_eq!(zigzag_decode32(zigzag_encode32(value)), value);
        }
    }

    #[test]
    fn key_rejects_tag_zero() {
        let mut bytes: &[u8] = &[0x00];
        decode_key(&mut bytes).expect_err("decoding a tag of zero succeeded");
    }

    #[test]
    fn key_rejects_overlong_value() {
        // A key above u32::MAX.
        let mut buf = Vec::new();
        encode_varint(u64::from(u32::MAX) + 1, &mut buf);
        decode_key(&mut &buf[..]).expect_err("decoding an out-of-range key succeeded");
    }

    #[test]
    fn skip_field_balances_groups() {
        // A group containing a varint field, properly terminated.
        let mut buf = Vec::new();
        encode_key(2, WireType::Varint, &mut buf);
        encode_varint(150, &mut buf);
        encode_key(1, WireType::EndGroup, &mut buf);

        let mut bytes = &buf[..];
        skip_field(
            WireType::StartGroup,
            1,
            &mut bytes,
            DecodeContext::default(),
        )
        .expect("skipping a balanced group failed");
        assert!(bytes.is_empty());

        // Mismatched end group tag.
        let mut buf = Vec::new();
        encode_key(3, WireType::EndGroup, &mut buf);
        let mut bytes = &buf[..];
        skip_field(
            WireType::StartGroup,
            1,
            &mut bytes,
            DecodeContext::default(),
        )
        .expect_err("skipping a mismatched group succeeded");
    }

    #[test]
    fn map_duplicate_keys_last_wins() {
        let mut buf = Vec::new();
        // Two entries with the same key and different values.
        for value in [7i32, 13] {
            let len = int32::encoded_len(1, &42) + int32::encoded_len(2, &value);
            encode_key(1, WireType::LengthDelimited, &mut buf);
            encode_varint(len as u64, &mut buf);
            int32::encode(1, &42, &mut buf);
            int32::encode(2, &value, &mut buf);
        }

        let mut values = HashMap::new();
        let mut bytes = &buf[..];
        while !bytes.is_empty() {
            let (tag, wire_type) = decode_key(&mut bytes).unwrap();
            assert_eq!(tag, 1);
            assert_eq!(wire_type, WireType::LengthDelimited);
            hash_map::merge(
                int32::merge,
                int32::merge,
                &mut values,
                &mut bytes,
                DecodeContext::default(),
            )
            .unwrap();
        }

        assert_eq!(values, HashMap::from([(42, 13)]));
    }

    #[test]
    fn map_missing_key_and_value_default() {
        // An empty entry decodes to the zero key and zero value.
        let mut buf = Vec::new();
        encode_varint(0, &mut buf);

        let mut values = HashMap::new();
        let mut bytes = &buf[..];
        hash_map::merge(
            int32::merge,
            int32::merge,
            &mut values,
            &mut bytes,
            DecodeContext::default(),
        )
        .unwrap();

        assert_eq!(values, HashMap::from([(0, 0)]));
    }
}
