//! The DNS wire format: record types and values, name compression,
//! and (de)serialisation of queries and responses.
//!
//! See RFC 1035 section 4 for the on-the-wire layout this module
//! implements.

pub mod deserialise;
pub mod name;
pub mod serialise;
pub mod types;

pub use deserialise::{decode_record, parse_response, CodecError};
pub use name::{decode_name, encode_name};
pub use serialise::build_query;
pub use types::{ParsedResponse, Record, RecordType, RecordValue};
