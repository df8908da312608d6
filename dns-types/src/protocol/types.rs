//! The data model shared by the codec: record types, record values,
//! and the parsed shape of a response.

/// The wire-level record type tag. See RFC 1035 section 3.2.2 (and
/// RFC 3596 for `AAAA`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RecordType {
    A,
    Ns,
    Cname,
    Soa,
    Mx,
    Aaaa,
    /// Any type code not named above, preserved verbatim.
    Unknown(u16),
}

impl RecordType {
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::Ns => 2,
            RecordType::Cname => 5,
            RecordType::Soa => 6,
            RecordType::Mx => 15,
            RecordType::Aaaa => 28,
            RecordType::Unknown(code) => code,
        }
    }
}

impl Default for RecordType {
    /// Defaulted only so [`ParsedResponse`] can derive `Default` for
    /// test fixtures; an actual query always names a real type.
    fn default() -> Self {
        RecordType::A
    }
}

impl From<u16> for RecordType {
    fn from(code: u16) -> Self {
        match code {
            1 => RecordType::A,
            2 => RecordType::Ns,
            5 => RecordType::Cname,
            6 => RecordType::Soa,
            15 => RecordType::Mx,
            28 => RecordType::Aaaa,
            other => RecordType::Unknown(other),
        }
    }
}

/// The per-type payload of a [`Record`].
///
/// Deliberately four shapes only, per the source's simplification:
/// `NS`/`CNAME`/`MX`/`SOA` all reduce to a single stored name (the
/// preference, serial, refresh, etc. fields are parsed to keep the
/// cursor correct and then discarded).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum RecordValue {
    A([u8; 4]),
    Aaaa([u8; 16]),
    Name(String),
    Unsupported,
}

/// A single resource record, as it appears in a response's answer,
/// authority, or additional section.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Record {
    pub name: String,
    pub rtype: RecordType,
    pub value: RecordValue,
}

impl Record {
    #[must_use]
    pub fn new(name: String, rtype: RecordType, value: RecordValue) -> Self {
        Self { name, rtype, value }
    }

    /// Render this record's value the way a caller wants to display
    /// or return it: dotted-decimal for `A`, colon-joined hex groups
    /// for `AAAA`, and the stored string for everything else.
    #[must_use]
    pub fn value_string(&self) -> String {
        match &self.value {
            RecordValue::A(octets) => octets
                .iter()
                .map(u8::to_string)
                .collect::<Vec<_>>()
                .join("."),
            RecordValue::Aaaa(octets) => octets
                .chunks(2)
                .map(|pair| format!("{:02x}{:02x}", pair[0], pair[1]))
                .collect::<Vec<_>>()
                .join(":"),
            RecordValue::Name(name) => name.clone(),
            RecordValue::Unsupported => "unsupported".to_string(),
        }
    }
}

/// A fully-parsed response message: the echoed question plus the
/// three record sections, in wire order.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct ParsedResponse {
    pub query_name: String,
    pub query_type: RecordType,
    pub answers: Vec<Record>,
    pub authorities: Vec<Record>,
    pub additional: Vec<Record>,
}

impl ParsedResponse {
    /// The first record in `answers` whose owner name and type both
    /// match, if any.
    #[must_use]
    pub fn get_answer(&self, name: &str, rtype: RecordType) -> Option<&Record> {
        self.answers
            .iter()
            .find(|record| record.name == name && record.rtype == rtype)
    }
}

/// Fixture-building helpers for tests, grounded in the teacher's
/// `protocol::types::test_util` module.
#[cfg(any(test, feature = "test-util"))]
pub mod test_util {
    use super::{ParsedResponse, Record, RecordType, RecordValue};

    #[must_use]
    pub fn a_record(name: &str, octets: [u8; 4]) -> Record {
        Record::new(name.to_string(), RecordType::A, RecordValue::A(octets))
    }

    #[must_use]
    pub fn aaaa_record(name: &str, octets: [u8; 16]) -> Record {
        Record::new(name.to_string(), RecordType::Aaaa, RecordValue::Aaaa(octets))
    }

    #[must_use]
    pub fn cname_record(name: &str, target: &str) -> Record {
        Record::new(
            name.to_string(),
            RecordType::Cname,
            RecordValue::Name(target.to_string()),
        )
    }

    #[must_use]
    pub fn ns_record(zone: &str, nameserver: &str) -> Record {
        Record::new(
            zone.to_string(),
            RecordType::Ns,
            RecordValue::Name(nameserver.to_string()),
        )
    }

    #[must_use]
    pub fn mx_record(zone: &str, exchange: &str) -> Record {
        Record::new(
            zone.to_string(),
            RecordType::Mx,
            RecordValue::Name(exchange.to_string()),
        )
    }

    #[must_use]
    pub fn soa_record(zone: &str, mname: &str) -> Record {
        Record::new(
            zone.to_string(),
            RecordType::Soa,
            RecordValue::Name(mname.to_string()),
        )
    }

    #[must_use]
    pub fn empty_response(query_name: &str, query_type: RecordType) -> ParsedResponse {
        ParsedResponse {
            query_name: query_name.to_string(),
            query_type,
            ..ParsedResponse::default()
        }
    }
}
