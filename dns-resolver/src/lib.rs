#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

//! The iterative resolution engine and its transport, built on top of
//! the wire codec in `dns-types`.
//!
//! Single-threaded and strictly sequential: one outstanding query at
//! a time, with the transport call the only blocking point
//! (`spec.md` section 5).

pub mod error;
pub mod id;
pub mod iterative;
pub mod transport;

pub use error::ResolutionError;
pub use id::{IdGenerator, RandomId};
pub use iterative::Resolver;
pub use transport::{Transport, UdpTransport};
