//! Internal failure reasons, logged but never surfaced past
//! [`crate::Resolver::resolve`] (`spec.md` section 7: the sole outward
//! signal is "optional answer").

/// Why a single resolution step, or the whole walk, failed.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ResolutionError {
    /// Every server in the current list timed out.
    AllServersTimedOut,
    /// The reply's transaction id didn't match the query's.
    IdMismatch,
    /// The reply didn't parse: a malformed name, a truncated
    /// section, or a bad record.
    MalformedResponse,
    /// The hostname has no extractable top-level domain.
    InvalidHostname,
    /// `authorities` held an `SOA` record with no matching answer:
    /// the name does not exist for the requested type.
    NameDoesNotExist,
    /// Neither an answer nor an authority record was present.
    EmptyResponse,
    /// The step budget (`spec.md` section 9) was exhausted before an
    /// answer or a definitive failure was reached.
    StepBudgetExceeded,
}

impl std::fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ResolutionError::AllServersTimedOut => write!(f, "all servers timed out"),
            ResolutionError::IdMismatch => write!(f, "reply id did not match the query"),
            ResolutionError::MalformedResponse => write!(f, "could not parse response"),
            ResolutionError::InvalidHostname => write!(f, "hostname has no valid top-level domain"),
            ResolutionError::NameDoesNotExist => write!(f, "name does not exist for this record type"),
            ResolutionError::EmptyResponse => write!(f, "response had no answer or authority records"),
            ResolutionError::StepBudgetExceeded => write!(f, "exceeded the resolution step budget"),
        }
    }
}

impl std::error::Error for ResolutionError {}
