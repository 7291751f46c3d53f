//! Turns raw creation responses into live cached entities.

use serde_json::Value;

use crate::{
    cache::ThreadCache,
    threads::{SharedThread, ThreadChannel},
    ApiResponseOrError,
};

pub struct ThreadCreateAction;

impl ThreadCreateAction {
    /// Decodes a thread creation response and stores the thread.
    pub fn handle(cache: &ThreadCache, payload: Value) -> ApiResponseOrError<SharedThread> {
        let thread: ThreadChannel = serde_json::from_value(payload)?;
        log::trace!("materializing created thread {}", thread.id);
        Ok(cache.add(thread, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn created_thread_lands_in_cache() {
        let cache = ThreadCache::new();
        let thread = ThreadCreateAction::handle(
            &cache,
            json!({
                "id": "600000000000000000",
                "type": 11,
                "parent_id": "300000000000000000",
                "name": "release notes"
            }),
        )
        .unwrap();

        let cached = cache.get("600000000000000000").unwrap();
        assert!(std::sync::Arc::ptr_eq(&thread, &cached));
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        let cache = ThreadCache::new();
        let error = ThreadCreateAction::handle(&cache, json!({ "name": "no id" })).unwrap_err();
        assert_eq!(error.kind, crate::ErrorKind::Decode);
        assert!(cache.is_empty());
    }
}
