use std::collections::btree_map::BTreeMap;

use bytes::{Buf, BufMut, Bytes};

use crate::encoding::{self, DecodeContext, WireType};
use crate::{DecodeError, Message};

/// The set of unknown fields captured while decoding a message.
///
/// Any record whose field number is not declared by the enclosing message
/// lands here, keyed by tag in declaration-independent ascending order.
/// Encoders re-emit the set after all known fields, so unknown data
/// round-trips unchanged and schema evolution stays forward compatible.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct UnknownFieldSet {
    fields: BTreeMap<u32, Vec<UnknownField>>,
}

/// A single unknown field record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnknownField {
    /// An unknown field with the `Varint` wire type.
    Varint(u64),
    /// An unknown field with the `SixtyFourBit` wire type.
    SixtyFourBit(u64),
    /// An unknown field with the `LengthDelimited` wire type.
    LengthDelimited(Bytes),
    /// An unknown field with the group wire type.
    Group(UnknownFieldSet),
    /// An unknown field with the `ThirtyTwoBit` wire type.
    ThirtyTwoBit(u32),
}

impl UnknownFieldSet {
    /// Creates an empty `UnknownFieldSet`.
    pub fn new() -> Self {
        Default::default()
    }

    /// Whether any unknown fields were captured.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Gets an iterator over the fields contained in this set, in ascending
    /// tag order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &UnknownField)> {
        self.fields
            .iter()
            .flat_map(|(tag, fields)| core::iter::repeat(*tag).zip(fields))
    }
}

impl Message for UnknownFieldSet {
    fn encode_raw(&self, buf: &mut impl BufMut)
    where
        Self: Sized,
    {
        for (tag, field) in self.iter() {
            match field {
                UnknownField::Varint(value) => {
                    encoding::encode_key(tag, WireType::Varint, buf);
                    encoding::encode_varint(*value, buf);
                }
                UnknownField::SixtyFourBit(value) => {
                    encoding::encode_key(tag, WireType::SixtyFourBit, buf);
                    buf.put_u64_le(*value);
                }
                UnknownField::LengthDelimited(value) => {
                    encoding::bytes::encode(tag, value, buf);
                }
                UnknownField::Group(value) => {
                    encoding::group::encode(tag, value, buf);
                }
                UnknownField::ThirtyTwoBit(value) => {
                    encoding::encode_key(tag, WireType::ThirtyTwoBit, buf);
                    buf.put_u32_le(*value);
                }
            }
        }
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>
    where
        Self: Sized,
    {
        let field = match wire_type {
            WireType::Varint => {
                let value = encoding::decode_varint(buf)?;
                UnknownField::Varint(value)
            }
            WireType::SixtyFourBit => {
                if buf.remaining() < 8 {
                    return Err(DecodeError::new("buffer underflow"));
                }
                UnknownField::SixtyFourBit(buf.get_u64_le())
            }
            WireType::LengthDelimited => {
                let mut value = Bytes::default();
                encoding::bytes::merge(wire_type, &mut value, buf, ctx)?;
                UnknownField::LengthDelimited(value)
            }
            WireType::StartGroup => {
                let mut value = UnknownFieldSet::default();
                encoding::group::merge(tag, wire_type, &mut value, buf, ctx)?;
                UnknownField::Group(value)
            }
            WireType::EndGroup => {
                return Err(DecodeError::new("unexpected end group tag"));
            }
            WireType::ThirtyTwoBit => {
                if buf.remaining() < 4 {
                    return Err(DecodeError::new("buffer underflow"));
                }
                UnknownField::ThirtyTwoBit(buf.get_u32_le())
            }
        };

        self.fields.entry(tag).or_default().push(field);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        self.iter()
            .map(|(tag, field)| match field {
                UnknownField::Varint(value) => {
                    encoding::key_len(tag) + encoding::encoded_len_varint(*value)
                }
                UnknownField::SixtyFourBit(_) => encoding::key_len(tag) + 8,
                UnknownField::LengthDelimited(value) => encoding::bytes::encoded_len(tag, value),
                UnknownField::Group(value) => encoding::group::encoded_len(tag, value),
                UnknownField::ThirtyTwoBit(_) => encoding::key_len(tag) + 4,
            })
            .sum()
    }

    fn clear(&mut self) {
        self.fields.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_records() {
        let mut buf = Vec::new();
        encoding::encode_key(3, WireType::Varint, &mut buf);
        encoding::encode_varint(150, &mut buf);
        encoding::encode_key(5, WireType::LengthDelimited, &mut buf);
        encoding::encode_varint(2, &mut buf);
        buf.extend_from_slice(b"hi");
        encoding::encode_key(9, WireType::ThirtyTwoBit, &mut buf);
        buf.extend_from_slice(&7u32.to_le_bytes());

        let set = UnknownFieldSet::decode(&buf[..]).unwrap();
        assert_eq!(set.iter().count(), 3);
        assert_eq!(set.encoded_len(), buf.len());
        assert_eq!(set.encode_to_vec(), buf);
    }

    #[test]
    fn nested_group_roundtrips() {
        let mut buf = Vec::new();
        encoding::encode_key(4, WireType::StartGroup, &mut buf);
        encoding::encode_key(1, WireType::Varint, &mut buf);
        encoding::encode_varint(42, &mut buf);
        encoding::encode_key(4, WireType::EndGroup, &mut buf);

        let set = UnknownFieldSet::decode(&buf[..]).unwrap();
        assert_eq!(set.encode_to_vec(), buf);
    }

    #[test]
    fn bare_end_group_is_an_error() {
        let mut buf = Vec::new();
        encoding::encode_key(4, WireType::EndGroup, &mut buf);
        UnknownFieldSet::decode(&buf[..]).expect_err("decoding a bare end group succeeded");
    }
}
