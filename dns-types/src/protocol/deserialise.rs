//! Decoding of resource records and whole response messages.
//!
//! See RFC 1035 section 4.1 for the header/question/record layout
//! this module implements.

use super::name::decode_name;
use super::types::{ParsedResponse, Record, RecordType, RecordValue};

/// Length, in octets, of the fixed header every message starts with.
const HEADER_LEN: usize = 12;

/// Errors encountered while decoding a record or a whole response.
///
/// All of these collapse to "no usable response" at the resolution
/// engine boundary (`spec.md` section 7): none of them are surfaced
/// as typed errors past `parse_response`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CodecError {
    /// A name's labels, or the pointer chasing them, ran past the
    /// end of the message, a label was too long to be a valid label
    /// length, or a pointer chain exceeded the jump budget.
    MalformedName,
    /// An encoded name would be longer than 255 octets.
    NameTooLong,
    /// A single label is longer than 63 octets.
    LabelTooLong,
    /// The message ends before a fixed-size field (header, record
    /// header, or rdata) that was expected to be present.
    Truncated,
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CodecError::MalformedName => write!(f, "malformed or cyclic name"),
            CodecError::NameTooLong => write!(f, "encoded name exceeds 255 octets"),
            CodecError::LabelTooLong => write!(f, "label exceeds 63 octets"),
            CodecError::Truncated => write!(f, "message ended before expected field"),
        }
    }
}

impl std::error::Error for CodecError {}

fn read_u16(message: &[u8], offset: usize) -> Result<u16, CodecError> {
    let bytes = message
        .get(offset..offset + 2)
        .ok_or(CodecError::Truncated)?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn read_u32(message: &[u8], offset: usize) -> Result<u32, CodecError> {
    let bytes = message
        .get(offset..offset + 4)
        .ok_or(CodecError::Truncated)?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Parse one resource record at `start`, returning the record and the
/// cursor immediately past it.
///
/// # Errors
///
/// If the owner name, the fixed 10-octet record header, or the rdata
/// itself runs past the end of `message`.
pub fn decode_record(message: &[u8], start: usize) -> Result<(Record, usize), CodecError> {
    let (name, p) = decode_name(message, start)?;

    let rtype_code = read_u16(message, p)?;
    // class (16 bits) at p+2 is always 1 (Internet) and is not retained.
    let ttl_end = p + 8;
    let rdlength = read_u16(message, ttl_end)?;
    let rdata_start = ttl_end + 2;
    let mut rdata_end = rdata_start + rdlength as usize;

    if message.get(rdata_start..rdata_end).is_none() {
        return Err(CodecError::Truncated);
    }

    let rtype = RecordType::from(rtype_code);
    let value = match rtype {
        RecordType::A => {
            let octets: [u8; 4] = message
                .get(rdata_start..rdata_start + 4)
                .ok_or(CodecError::Truncated)?
                .try_into()
                .map_err(|_| CodecError::Truncated)?;
            RecordValue::A(octets)
        }
        RecordType::Aaaa => {
            rdata_end = rdata_start + 16;
            let octets: [u8; 16] = message
                .get(rdata_start..rdata_end)
                .ok_or(CodecError::Truncated)?
                .try_into()
                .map_err(|_| CodecError::Truncated)?;
            RecordValue::Aaaa(octets)
        }
        RecordType::Ns | RecordType::Cname => {
            let (target, _) = decode_name(message, rdata_start)?;
            RecordValue::Name(target)
        }
        RecordType::Mx => {
            // preference (16 bits) at rdata_start is parsed and discarded.
            let (exchange, next) = decode_name(message, rdata_start + 2)?;
            rdata_end = next;
            RecordValue::Name(exchange)
        }
        RecordType::Soa => {
            let (mname, after_mname) = decode_name(message, rdata_start)?;
            let (_rname, after_rname) = decode_name(message, after_mname)?;
            // serial, refresh, retry, expire, minimum: five 32-bit fields.
            for i in 0..5 {
                read_u32(message, after_rname + i * 4)?;
            }
            rdata_end = after_rname + 20;
            RecordValue::Name(mname)
        }
        RecordType::Unknown(_) => RecordValue::Unsupported,
    };

    Ok((Record::new(name, rtype, value), rdata_end))
}

/// Parse a whole response message, checking the transaction id and
/// decoding the question and all three record sections.
///
/// Returns `None` if the id doesn't match, or if any part of the
/// message fails to decode.
#[must_use]
pub fn parse_response(message: &[u8], expected_id: u16) -> Option<ParsedResponse> {
    if message.len() < HEADER_LEN {
        return None;
    }

    let id = u16::from_be_bytes([message[0], message[1]]);
    if id != expected_id {
        return None;
    }

    // flags (16 bits) at offset 2 are not inspected: the iterative
    // logic does not depend on a server honoring RD/RA/etc.
    let ancount = u16::from_be_bytes([message[6], message[7]]) as usize;
    let nscount = u16::from_be_bytes([message[8], message[9]]) as usize;
    let arcount = u16::from_be_bytes([message[10], message[11]]) as usize;

    let (query_name, after_name) = decode_name(message, HEADER_LEN).ok()?;
    let qtype = read_u16(message, after_name).ok()?;
    // qclass (16 bits) follows and is always 1 (Internet); not retained.
    let mut cursor = after_name + 4;

    let mut answers = Vec::with_capacity(ancount);
    let mut authorities = Vec::with_capacity(nscount);
    let mut additional = Vec::with_capacity(arcount);

    for (count, section) in [
        (ancount, &mut answers),
        (nscount, &mut authorities),
        (arcount, &mut additional),
    ] {
        for _ in 0..count {
            let (record, next) = decode_record(message, cursor).ok()?;
            section.push(record);
            cursor = next;
        }
    }

    Some(ParsedResponse {
        query_name,
        query_type: RecordType::from(qtype),
        answers,
        authorities,
        additional,
    })
}
