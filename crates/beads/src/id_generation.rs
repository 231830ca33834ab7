//! Issue ID generation.
//!
//! IDs are `prefix-N` with a monotonically increasing counter, matching what
//! agents and humans expect to type (`beads-1`, `beads-2`, ...). The counter
//! never reuses a number: IDs loaded from the JSONL mirror are registered so
//! generation continues past the highest suffix ever seen, even after issues
//! are deleted.

use std::collections::HashSet;

/// Generator for sequential `prefix-N` issue IDs.
#[derive(Debug)]
pub struct IdGenerator {
    prefix: String,
    next: u64,
    used: HashSet<String>,
}

impl IdGenerator {
    /// Create a generator for the given prefix, starting at `prefix-1`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
            used: HashSet::new(),
        }
    }

    /// Register an existing ID so it is never handed out again.
    ///
    /// IDs with this generator's prefix and a numeric suffix advance the
    /// counter past that suffix. Foreign-prefix or non-numeric IDs are
    /// remembered only for collision avoidance.
    pub fn register_id(&mut self, id: &str) {
        if let Some(suffix) = id.strip_prefix(&self.prefix).and_then(|s| s.strip_prefix('-')) {
            if let Ok(n) = suffix.parse::<u64>() {
                self.next = self.next.max(n + 1);
            }
        }
        self.used.insert(id.to_string());
    }

    /// Generate the next unused ID.
    pub fn generate(&mut self) -> String {
        loop {
            let candidate = format!("{}-{}", self.prefix, self.next);
            self.next += 1;
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_sequential_ids() {
        let mut generator = IdGenerator::new("beads");
        assert_eq!(generator.generate(), "beads-1");
        assert_eq!(generator.generate(), "beads-2");
        assert_eq!(generator.generate(), "beads-3");
    }

    #[test]
    fn continues_past_registered_ids() {
        let mut generator = IdGenerator::new("beads");
        generator.register_id("beads-7");
        generator.register_id("beads-3");
        assert_eq!(generator.generate(), "beads-8");
    }

    #[test]
    fn never_reuses_a_registered_id() {
        let mut generator = IdGenerator::new("beads");
        generator.register_id("beads-1");
        generator.register_id("beads-2");
        assert_eq!(generator.generate(), "beads-3");
    }

    #[test]
    fn ignores_foreign_prefixes_for_the_counter() {
        let mut generator = IdGenerator::new("beads");
        generator.register_id("other-99");
        assert_eq!(generator.generate(), "beads-1");
    }

    #[test]
    fn ignores_non_numeric_suffixes_for_the_counter() {
        let mut generator = IdGenerator::new("beads");
        generator.register_id("beads-abc");
        assert_eq!(generator.generate(), "beads-1");
    }
}
