//! In-memory history implementation

use crate::storage::traits::{domain_of, DomainCount, HistoryStore, StorageError, StorageResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// History kept only for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryHistory {
    urls: Mutex<HashMap<String, String>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn urls(&self) -> StorageResult<MutexGuard<'_, HashMap<String, String>>> {
        self.urls.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl HistoryStore for MemoryHistory {
    fn seen(&self, url: &str) -> StorageResult<bool> {
        Ok(self.urls()?.contains_key(url))
    }

    fn mark_seen(&self, url: &str, title: &str) -> StorageResult<()> {
        self.urls()?.insert(url.to_string(), title.to_string());
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.urls()?.clear();
        Ok(())
    }

    fn count(&self) -> StorageResult<u64> {
        Ok(self.urls()?.len() as u64)
    }

    fn count_by_domain(&self) -> StorageResult<Vec<DomainCount>> {
        let mut per_domain: BTreeMap<String, u64> = BTreeMap::new();
        for url in self.urls()?.keys() {
            *per_domain.entry(domain_of(url)).or_default() += 1;
        }

        let mut counts: Vec<DomainCount> = per_domain
            .into_iter()
            .map(|(domain, count)| DomainCount { domain, count })
            .collect();
        // Stable sort keeps the alphabetical order among equal counts
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(counts)
    }
}
