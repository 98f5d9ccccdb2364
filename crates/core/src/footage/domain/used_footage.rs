use std::collections::HashSet;
use std::sync::Mutex;

/// Clip identities already assigned during one pipeline run.
///
/// Shared by every matching worker; membership check and insert happen
/// under the same lock so two workers can never claim the same clip.
#[derive(Debug, Default)]
pub struct UsedFootageSet {
    claimed: Mutex<HashSet<String>>,
}

impl UsedFootageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `identity`; returns `false` if it was already taken.
    pub fn try_claim(&self, identity: &str) -> bool {
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if claimed.contains(identity) {
            return false;
        }
        claimed.insert(identity.to_string())
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(identity)
    }

    pub fn len(&self) -> usize {
        self.claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_claim_once() {
        let used = UsedFootageSet::new();
        assert!(used.try_claim("clip-1"));
        assert!(!used.try_claim("clip-1"));
        assert!(used.try_claim("clip-2"));
        assert_eq!(used.len(), 2);
        assert!(used.contains("clip-1"));
    }

    #[test]
    fn test_concurrent_claims_have_single_winner() {
        let used = UsedFootageSet::new();
        let winners = AtomicUsize::new(0);
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    if used.try_claim("contested") {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });
        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }
}
