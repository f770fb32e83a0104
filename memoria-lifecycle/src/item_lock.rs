//! Per-`memory_id` serialization (§5: "OutcomeRecorder and Promoter MUST NOT
//! race"). Shared by both so a promotion and a concurrent outcome event on
//! the same item never interleave.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

#[derive(Default)]
pub struct ItemLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ItemLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `memory_id`, creating the lock on
    /// first use. Distinct `memory_id`s never block each other.
    pub fn with_lock<R>(&self, memory_id: &str, f: impl FnOnce() -> R) -> R {
        let entry = self
            .locks
            .entry(memory_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = entry.lock().unwrap();
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn same_key_serializes_across_threads() {
        let locks = Arc::new(ItemLocks::new());
        let counter = Arc::new(Mutex::new(0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let counter = counter.clone();
            handles.push(thread::spawn(move || {
                locks.with_lock("m1", || {
                    let mut c = counter.lock().unwrap();
                    *c += 1;
                });
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*counter.lock().unwrap(), 8);
    }

    #[test]
    fn distinct_keys_do_not_block_each_other() {
        let locks = ItemLocks::new();
        locks.with_lock("a", || {});
        locks.with_lock("b", || {});
    }
}
