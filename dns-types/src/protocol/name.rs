//! Encoding and decoding of DNS names, including pointer compression.
//!
//! See RFC 1035 section 4.1.4. A name is a sequence of labels, each a
//! length octet followed by that many octets, terminated by a zero
//! length octet. A length octet whose top two bits are both set is
//! instead a 14-bit pointer to another offset in the message, where
//! the rest of the name continues.

use super::CodecError;

/// A label may be at most this many octets.
const LABEL_MAX_LEN: usize = 63;

/// An encoded name (length octets plus label octets plus the
/// terminating zero) may be at most this many octets.
const NAME_MAX_LEN: usize = 255;

/// Top two bits set: this length octet is actually the first octet
/// of a compression pointer.
const POINTER_TAG: u8 = 0b1100_0000;

/// Hard cap on the number of pointer jumps a single name decode may
/// follow, so a cyclic or adversarial pointer chain can't spin
/// forever.
const MAX_POINTER_JUMPS: usize = 128;

/// Encode a dotted hostname (e.g. `"www.example.com"`) as a
/// zero-terminated sequence of length-prefixed labels. The empty
/// string encodes to the single zero octet (the root name).
///
/// # Errors
///
/// If any label is longer than 63 octets, or the encoded name would
/// be longer than 255 octets.
pub fn encode_name(name: &str) -> Result<Vec<u8>, CodecError> {
    let mut octets = Vec::with_capacity(name.len() + 2);

    if !name.is_empty() {
        for label in name.split('.') {
            if label.len() > LABEL_MAX_LEN {
                return Err(CodecError::LabelTooLong);
            }
            octets.push(label.len() as u8);
            octets.extend_from_slice(label.as_bytes());
        }
    }
    octets.push(0);

    if octets.len() > NAME_MAX_LEN {
        return Err(CodecError::NameTooLong);
    }
    Ok(octets)
}

/// Decode a name starting at `offset` in `message`, following
/// compression pointers as needed.
///
/// Returns the dotted-string form of the name and the cursor
/// immediately past whatever was read at `offset` — that is, past the
/// two-octet pointer if `offset` was (or led through) a pointer,
/// regardless of where the pointer chain actually bottoms out.
///
/// # Errors
///
/// If the name runs past the end of the message, a label exceeds 63
/// octets without being a pointer, a pointer targets an offset at or
/// past the end of the message, or following pointers exceeds
/// [`MAX_POINTER_JUMPS`] (a guard against cyclic/adversarial pointer
/// chains).
pub fn decode_name(message: &[u8], offset: usize) -> Result<(String, usize), CodecError> {
    let mut labels: Vec<&str> = Vec::new();
    let mut cursor = offset;
    let mut cursor_past_reference = None;
    let mut jumps = 0;

    loop {
        let length = *message.get(cursor).ok_or(CodecError::MalformedName)?;

        if length & POINTER_TAG == 0 {
            if length == 0 {
                cursor += 1;
                cursor_past_reference.get_or_insert(cursor);
                break;
            }

            let label_start = cursor + 1;
            let label_end = label_start + length as usize;
            let label_octets = message
                .get(label_start..label_end)
                .ok_or(CodecError::MalformedName)?;
            labels.push(std::str::from_utf8(label_octets).map_err(|_| CodecError::MalformedName)?);
            cursor = label_end;
        } else if length & POINTER_TAG == POINTER_TAG {
            let lo = *message.get(cursor + 1).ok_or(CodecError::MalformedName)?;
            let pointer = (usize::from(length & !POINTER_TAG) << 8) | usize::from(lo);
            cursor_past_reference.get_or_insert(cursor + 2);

            if pointer >= message.len() {
                return Err(CodecError::MalformedName);
            }

            jumps += 1;
            if jumps > MAX_POINTER_JUMPS {
                return Err(CodecError::MalformedName);
            }
            cursor = pointer;
        } else {
            // top bits `01` or `10`: reserved, not a valid label length
            return Err(CodecError::MalformedName);
        }
    }

    let name = labels.join(".");
    if name.len() > NAME_MAX_LEN {
        return Err(CodecError::MalformedName);
    }

    Ok((name, cursor_past_reference.expect("set before loop exits")))
}
