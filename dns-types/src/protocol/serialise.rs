//! Construction of outgoing query messages.

use super::deserialise::CodecError;
use super::name::encode_name;
use super::types::RecordType;

/// Standard query, recursion not requested: `QR=0, Opcode=0, RD=0`.
/// The resolver never delegates to an upstream recursive resolver, so
/// there is no reason to ask one to recurse on its behalf (`spec.md`
/// section 9's open question on the RD bit).
const FLAGS: u16 = 0x0000;

const QCLASS_IN: u16 = 1;

/// Build a query message for `name`/`rtype` with the given 16-bit
/// transaction id.
///
/// # Errors
///
/// If `name` cannot be encoded (see [`encode_name`]).
pub fn build_query(id: u16, name: &str, rtype: RecordType) -> Result<Vec<u8>, CodecError> {
    let encoded_name = encode_name(name)?;

    let mut message = Vec::with_capacity(12 + encoded_name.len() + 4);
    message.extend_from_slice(&id.to_be_bytes());
    message.extend_from_slice(&FLAGS.to_be_bytes());
    message.extend_from_slice(&1u16.to_be_bytes()); // qdcount
    message.extend_from_slice(&0u16.to_be_bytes()); // ancount
    message.extend_from_slice(&0u16.to_be_bytes()); // nscount
    message.extend_from_slice(&0u16.to_be_bytes()); // arcount

    message.extend_from_slice(&encoded_name);
    message.extend_from_slice(&rtype.code().to_be_bytes());
    message.extend_from_slice(&QCLASS_IN.to_be_bytes());

    Ok(message)
}
