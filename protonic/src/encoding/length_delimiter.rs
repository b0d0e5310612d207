use bytes::{Buf, BufMut};

use crate::encoding::varint::{decode_varint, encode_varint, encoded_len_varint};
use crate::{DecodeError, EncodeError};

/// Encodes a length delimiter to the buffer.
///
/// See [`Message::encode_length_delimited`](crate::Message::encode_length_delimited)
/// for more info.
///
/// An error will be returned if the buffer does not have sufficient
/// capacity to encode the delimiter.
pub fn encode_length_delimiter(length: usize, buf: &mut impl BufMut) -> Result<(), EncodeError> {
    let length = length as u64;
    let required = encoded_len_varint(length);
    let remaining = buf.remaining_mut();
    if required > remaining {
        return Err(EncodeError::new(required, remaining));
    }
    encode_varint(length, buf);
    Ok(())
}

/// Returns the encoded length of a length delimiter.
///
/// Applications may use this method to ensure sufficient buffer capacity
/// before calling `encode_length_delimiter`. The returned size will be
/// between 1 and 10, inclusive.
pub fn length_delimiter_len(length: usize) -> usize {
    encoded_len_varint(length as u64)
}

/// Decodes a length delimiter from the buffer.
///
/// This method allows the length delimiter to be decoded independently of
/// the message, when the message is encoded with
/// [`Message::encode_length_delimited`](crate::Message::encode_length_delimited).
pub fn decode_length_delimiter(mut buf: impl Buf) -> Result<usize, DecodeError> {
    let length = decode_varint(&mut buf)?;
    if length > usize::MAX as u64 {
        return Err(DecodeError::new(
            "length delimiter exceeds maximum usize value",
        ));
    }
    Ok(length as usize)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn length_delimiter_roundtrip() {
        for length in [0usize, 1, 127, 128, 300, usize::from(u16::MAX)] {
            let mut buf = Vec::new();
            encode_length_delimiter(length, &mut buf).unwrap();
            assert_eq!(buf.len(), length_delimiter_len(length));
            assert_eq!(decode_length_delimiter(&buf[..]).unwrap(), length);
        }
    }
}
