//! Transaction-id generation, threaded explicitly so tests can make
//! resolution deterministic (`spec.md` section 9's design note on
//! the only process-wide state this resolver has).

use rand::Rng;

/// A source of 16-bit query transaction ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> u16;
}

/// Chooses each id uniformly at random in `[0, 65535]`, as `spec.md`
/// section 3 requires for production use.
#[derive(Debug, Default)]
pub struct RandomId;

impl IdGenerator for RandomId {
    fn next_id(&mut self) -> u16 {
        rand::thread_rng().gen()
    }
}

/// Always returns the same id. Used in tests to pin down a
/// resolution's otherwise-random transaction id, per `spec.md`
/// section 8's scenario 7 (id fixed to 731).
#[derive(Debug, Clone, Copy)]
pub struct FixedId(pub u16);

impl IdGenerator for FixedId {
    fn next_id(&mut self) -> u16 {
        self.0
    }
}

/// Returns ids from a fixed sequence, cycling the last one once
/// exhausted. Useful when a test needs to distinguish the query id
/// used for an outer resolution from one used for a nested NS lookup.
#[derive(Debug, Clone)]
pub struct SequenceId {
    ids: Vec<u16>,
    next: usize,
}

impl SequenceId {
    #[must_use]
    pub fn new(ids: Vec<u16>) -> Self {
        assert!(!ids.is_empty(), "SequenceId needs at least one id");
        Self { ids, next: 0 }
    }
}

impl IdGenerator for SequenceId {
    fn next_id(&mut self) -> u16 {
        let id = self.ids[self.next.min(self.ids.len() - 1)];
        self.next += 1;
        id
    }
}
