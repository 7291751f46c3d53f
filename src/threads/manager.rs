use derive_builder::Builder;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    actions::ThreadCreateAction, cache::ThreadCache, channels::ParentChannel,
    client::DiscordClient, ApiError, ApiResponseOrError,
};

use super::{
    map_threads, ArchivedQuery, CreateThreadRequest, FetchArchivedThreadOptions, FetchedThreads,
    PreparedCreate, SharedThread, ThreadChannel, ThreadList, ThreadResolvable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Store fetched threads in the cache.
    pub cache: bool,
    /// Skip the cache lookup of single fetches.
    pub force: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            cache: true,
            force: false,
        }
    }
}

/// What [`ThreadManager::fetch`] should read.
///
/// A resolvable `thread` wins over `archived`. With neither, active threads
/// are listed.
#[derive(Builder, Debug, Clone, Default)]
#[builder(derive(Debug))]
#[builder(pattern = "owned")]
#[builder(name = "FetchThreadsBuilder")]
#[builder(setter(strip_option, into))]
pub struct FetchThreadsRequest {
    #[builder(default)]
    pub thread: Option<ThreadResolvable>,
    #[builder(default)]
    pub archived: Option<FetchArchivedThreadOptions>,
}

impl FetchThreadsRequest {
    pub fn builder() -> FetchThreadsBuilder {
        FetchThreadsBuilder::create_empty()
    }
}

impl From<FetchThreadsBuilderError> for ApiError {
    fn from(value: FetchThreadsBuilderError) -> Self {
        ApiError::invalid_argument(value.to_string())
    }
}

#[derive(Debug, Clone)]
pub enum Fetched {
    Thread(SharedThread),
    Threads(FetchedThreads),
}

impl Fetched {
    pub fn into_thread(self) -> Option<SharedThread> {
        match self {
            Fetched::Thread(thread) => Some(thread),
            Fetched::Threads(_) => None,
        }
    }

    pub fn into_threads(self) -> Option<FetchedThreads> {
        match self {
            Fetched::Thread(_) => None,
            Fetched::Threads(threads) => Some(threads),
        }
    }
}

/// Manages the threads of one parent channel.
#[derive(Debug, Clone)]
pub struct ThreadManager {
    client: DiscordClient,
    channel: ParentChannel,
    cache: Arc<ThreadCache>,
}

impl ThreadManager {
    pub fn new(client: DiscordClient, channel: ParentChannel, cache: Arc<ThreadCache>) -> Self {
        Self {
            client,
            channel,
            cache,
        }
    }

    pub fn channel(&self) -> &ParentChannel {
        &self.channel
    }

    /// Cached threads of this channel, in insertion order.
    pub fn cache(&self) -> IndexMap<String, SharedThread> {
        self.cache.filter_parent(&self.channel.id)
    }

    pub fn resolve(&self, resolvable: &ThreadResolvable) -> Option<SharedThread> {
        match resolvable {
            ThreadResolvable::Thread(thread) => Some(Arc::clone(thread)),
            ThreadResolvable::Id(_) => {
                let id = resolvable.resolve_id()?;
                self.cache.get(&id)
            }
        }
    }

    pub fn resolve_id(&self, resolvable: &ThreadResolvable) -> Option<String> {
        resolvable.resolve_id()
    }

    /// Creates a thread in this channel.
    ///
    /// ## Examples
    ///
    /// ```no_run
    /// # use guild_threads::{threads::ThreadManager, ApiResponseOrError};
    /// # async fn run(manager: ThreadManager) -> ApiResponseOrError<()> {
    /// use guild_threads::threads::CreateThreadRequest;
    ///
    /// let request = CreateThreadRequest::builder("release notes")
    ///     .reason("weekly release")
    ///     .build()?;
    /// let thread = manager.create(request).await?;
    /// println!("created {}", thread.read().id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(&self, request: CreateThreadRequest) -> ApiResponseOrError<SharedThread> {
        let prepared = PreparedCreate::new(&self.channel, request)?;
        log::debug!(
            "creating thread {:?} in channel {} as {:?}",
            prepared.body.name,
            self.channel.id,
            prepared.body.kind
        );
        let payload: Value = self
            .client
            .post(prepared.route, &prepared.body, prepared.reason.as_deref())
            .await?;
        ThreadCreateAction::handle(&self.cache, payload)
    }

    /// Fetches one thread, an archived page, or the active threads.
    pub async fn fetch(
        &self,
        request: Option<FetchThreadsRequest>,
        options: FetchOptions,
    ) -> ApiResponseOrError<Fetched> {
        let Some(request) = request else {
            return self.fetch_active(options.cache).await.map(Fetched::Threads);
        };

        if let Some(id) = request.thread.as_ref().and_then(ThreadResolvable::resolve_id) {
            return self.fetch_single(&id, options).await.map(Fetched::Thread);
        }

        match request.archived {
            Some(archived) => self
                .fetch_archived(archived, options.cache)
                .await
                .map(Fetched::Threads),
            None => self.fetch_active(options.cache).await.map(Fetched::Threads),
        }
    }

    async fn fetch_single(
        &self,
        id: &str,
        options: FetchOptions,
    ) -> ApiResponseOrError<SharedThread> {
        if !options.force {
            if let Some(thread) = self.cache.get(id) {
                log::trace!("thread {id} served from cache");
                return Ok(thread);
            }
        }
        let thread: ThreadChannel = self.client.get(format!("channels/{id}"), &[]).await?;
        if !thread.kind.is_thread() {
            return Err(ApiError::invalid_argument(format!(
                "channel {id} is a {:?}, not a thread",
                thread.kind
            )));
        }
        Ok(self.cache.add(thread, options.cache))
    }

    /// Active threads of this channel.
    ///
    /// The service only lists active threads per guild, so the listing is
    /// narrowed to this channel.
    pub async fn fetch_active(&self, cache: bool) -> ApiResponseOrError<FetchedThreads> {
        let guild_id = self.channel.guild_id.as_deref().ok_or_else(|| {
            ApiError::invalid_argument(format!(
                "channel {} is not in a guild, so it has no active thread listing",
                self.channel.id
            ))
        })?;
        let raw = Self::get_active(&self.client, guild_id).await?;
        Ok(map_threads(raw, &self.cache, Some(&self.channel.id), cache))
    }

    /// Every active thread of a guild, across all of its channels.
    pub async fn fetch_guild_active(
        client: &DiscordClient,
        cache: &ThreadCache,
        guild_id: &str,
        cache_threads: bool,
    ) -> ApiResponseOrError<FetchedThreads> {
        let raw = Self::get_active(client, guild_id).await?;
        Ok(map_threads(raw, cache, None, cache_threads))
    }

    async fn get_active(client: &DiscordClient, guild_id: &str) -> ApiResponseOrError<ThreadList> {
        client
            .get(format!("guilds/{guild_id}/threads/active"), &[])
            .await
    }

    /// One page of archived threads of this channel.
    pub async fn fetch_archived(
        &self,
        options: FetchArchivedThreadOptions,
        cache: bool,
    ) -> ApiResponseOrError<FetchedThreads> {
        let query = ArchivedQuery::build(&options, &self.cache)?;
        log::debug!(
            "archived threads of {} via {:?}, before {:?}",
            self.channel.id,
            query.endpoint,
            query.before
        );
        let raw: ThreadList = self
            .client
            .get(query.endpoint.route(&self.channel.id), &query.pairs())
            .await?;
        Ok(map_threads(raw, &self.cache, Some(&self.channel.id), cache))
    }
}
