use crate::BlockId;
use chrono::Utc;

/// Source of fresh block ids. Every constructor that creates blocks takes one
/// of these instead of reaching for global state.
pub trait IdSource {
    fn next_id(&mut self) -> BlockId;
}

/// Generate a session seed from the current time
pub fn session_seed() -> String {
    format!("{:x}", Utc::now().timestamp_millis())
}

/// Sequential ID generator for blocks within an editing session
#[derive(Debug, Clone)]
pub struct SequentialIds {
    seed: String, // Session timestamp (hex millis)
    count: u64,   // Sequential counter
}

impl SequentialIds {
    /// Seeded from the wall clock, so ids stay distinct across page reloads
    pub fn from_clock() -> Self {
        Self::from_seed(session_seed())
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Get session seed
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.count
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> BlockId {
        self.count += 1;
        BlockId::new(format!("blk-{}-{}", self.seed, self.count))
    }
}

impl<T: IdSource + ?Sized> IdSource for &mut T {
    fn next_id(&mut self) -> BlockId {
        (**self).next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut gen = SequentialIds::from_seed("test");

        let id1 = gen.next_id();
        let id2 = gen.next_id();
        let id3 = gen.next_id();

        assert_eq!(id1.as_str(), "blk-test-1");
        assert_eq!(id2.as_str(), "blk-test-2");
        assert_eq!(id3.as_str(), "blk-test-3");
        assert_eq!(gen.issued(), 3);
    }

    #[test]
    fn test_clock_seed_is_hex() {
        let gen = SequentialIds::from_clock();
        assert!(!gen.seed().is_empty());
        assert!(gen.seed().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_distinct_seeds_never_collide() {
        let mut a = SequentialIds::from_seed("a");
        let mut b = SequentialIds::from_seed("b");
        assert_ne!(a.next_id(), b.next_id());
    }
}
