use indexmap::IndexMap;
use serde::Deserialize;

use crate::cache::ThreadCache;

use super::{SharedThread, ThreadChannel, ThreadMember};

/// Body of the active and archived thread listings.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ThreadList {
    #[serde(default)]
    pub threads: Vec<ThreadChannel>,
    /// Memberships of the requesting user. Each record carries the id of the
    /// thread it belongs to as its own `id`.
    #[serde(default)]
    pub members: Vec<ThreadMember>,
    /// Only sent by the archived listings.
    #[serde(default)]
    pub has_more: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct FetchedThreads {
    pub threads: IndexMap<String, SharedThread>,
    /// Whether another page may exist. The service can under-report this.
    pub has_more: bool,
}

impl FetchedThreads {
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}

/// Materializes a listing through the cache.
///
/// With `parent_id` set, threads of other channels are dropped. Membership
/// records attach to the thread that shares their identifier.
pub fn map_threads(
    raw: ThreadList,
    cache: &ThreadCache,
    parent_id: Option<&str>,
    cache_threads: bool,
) -> FetchedThreads {
    let threads: IndexMap<String, SharedThread> = raw
        .threads
        .into_iter()
        .map(|payload| cache.add(payload, cache_threads))
        .filter(|thread| match parent_id {
            Some(parent_id) => thread.read().parent_id.as_deref() == Some(parent_id),
            None => true,
        })
        .map(|thread| {
            let id = thread.read().id.clone();
            (id, thread)
        })
        .collect();

    for member in raw.members {
        let Some(thread_id) = member.id.clone() else {
            continue;
        };
        let thread = threads
            .get(&thread_id)
            .cloned()
            .or_else(|| cache.get(&thread_id));
        match thread {
            Some(thread) => thread.write().attach_member(member),
            None => log::trace!("no thread {thread_id} for membership record"),
        }
    }

    FetchedThreads {
        threads,
        has_more: raw.has_more.unwrap_or(false),
    }
}
