//! Opaque identifier minting.
//!
//! All entity ids and `request_id`s are minted through an `IdGen` rather than
//! calling `Uuid::new_v4()` ad hoc, so tests can inject a deterministic
//! generator the same way they inject a `FixedClock`.

use uuid::Uuid;

pub trait IdGen: Send + Sync {
    fn new_id(&self) -> Uuid;

    fn new_request_id(&self) -> String {
        format!("req_{}", self.new_id().simple())
    }
}

#[derive(Debug, Clone, Default)]
pub struct UuidGen;

impl IdGen for UuidGen {
    fn new_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic generator for tests: hands out ids from a fixed sequence
/// seeded from a counter, so assertions can name expected ids.
#[derive(Debug, Clone)]
pub struct SequentialGen {
    counter: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

impl Default for SequentialGen {
    fn default() -> Self {
        Self {
            counter: std::sync::Arc::new(std::sync::atomic::AtomicU64::new(1)),
        }
    }
}

impl IdGen for SequentialGen {
    fn new_id(&self) -> Uuid {
        let n = self.counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Uuid::from_u128(n as u128)
    }
}
