use std::collections::BTreeSet;
use std::sync::Arc;

use crate::downsample::Downsampled;
use crate::resolution::Resolution;

/// Identifies a downsampled result: one trace of one session at a set of
/// normalized resolutions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey {
    pub session_id: String,
    pub trace: String,
    pub resolutions: BTreeSet<Resolution>,
}

/// Storage for computed results. Eviction is up to the implementation; an
/// LRU is the usual choice.
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<Arc<Downsampled>>;
    fn put(&self, key: CacheKey, value: Arc<Downsampled>);
}
