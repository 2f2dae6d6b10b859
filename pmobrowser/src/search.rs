//! Cache des recherches
//!
//! Chaque requête distincte possède au plus une entrée : une tâche de
//! recherche partagée (`Shared`) que tous les appelants attendent. Une requête
//! identique arrivant pendant le calcul rejoint la tâche existante au lieu
//! d'en lancer une seconde.
//!
//! ## Invalidation
//!
//! Toute modification de la bibliothèque vide le cache : chaque entrée voit
//! son jeton d'annulation déclenché, et les appelants en attente reçoivent
//! [`SearchError::Cancelled`] au lieu d'un résultat périmé.
//!
//! ```text
//! SearchCache
//!   ├─ scope (CancellationToken)
//!   │   ├─ child token ── "rock"  → Shared<task>
//!   │   └─ child token ── "jazz"  → Shared<task>
//!   └─ entries: Mutex<HashMap<query, entry>>
//! ```

use crate::item::MediaItem;
use crate::paginate::paginate;
use crate::settings::BrowserSettings;
use futures::future::{BoxFuture, FutureExt, Shared};
use pmolibrary::{DeviceLibrary, LibraryProvider, SearchEngine, SearchItems, UserLibrary};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Why a search produced no result
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("Search cancelled")]
    Cancelled,

    #[error("Search timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Search failed: {0}")]
    Failed(String),
}

/// Outcome of a search computation
pub type SearchResult = Result<Arc<SearchItems>, SearchError>;

type SearchTask = Shared<BoxFuture<'static, SearchResult>>;

struct SearchEntry {
    id: u64,
    token: CancellationToken,
    task: SearchTask,
}

/// Deduplicating, invalidation-aware cache of search computations
pub struct SearchCache {
    engine: Arc<dyn SearchEngine>,
    entries: Mutex<HashMap<String, SearchEntry>>,
    scope: CancellationToken,
    next_id: AtomicU64,
    /// Bumped under the map lock by every invalidation
    generation: AtomicU64,
    timeout: Option<Duration>,
}

impl SearchCache {
    pub fn new(engine: Arc<dyn SearchEngine>, settings: &BrowserSettings) -> Self {
        Self {
            engine,
            entries: Mutex::new(HashMap::new()),
            scope: CancellationToken::new(),
            next_id: AtomicU64::new(1),
            generation: AtomicU64::new(0),
            timeout: settings.search_timeout,
        }
    }

    /// Runs (or joins) the search for `query` and returns its match count
    ///
    /// An unavailable result counts as zero matches.
    pub async fn prepare(&self, query: &str, library: &dyn LibraryProvider) -> usize {
        match self.run(query, library).await {
            Ok(items) => items.count(),
            Err(_) => 0,
        }
    }

    /// Runs (or joins) the search for `query` and returns one page of results
    ///
    /// Categories are concatenated in a fixed order: songs, albums, artists,
    /// genres, playlists. `None` when the search was cancelled or failed, or
    /// when the page is out of range.
    pub async fn results(
        &self,
        query: &str,
        library: &dyn LibraryProvider,
        page: u32,
        page_size: u32,
    ) -> Option<Vec<MediaItem>> {
        let items = self.run(query, library).await.ok()?;
        let list = concat(&items);
        if list.is_empty() {
            return Some(list);
        }
        paginate(list, page, page_size)
    }

    /// Awaits the shared computation for `query`, starting it if needed
    ///
    /// An empty query, or a library that is not fully loaded, yields an empty
    /// result without starting a computation nor creating an entry.
    pub async fn run(&self, query: &str, library: &dyn LibraryProvider) -> SearchResult {
        if query.is_empty() {
            return Ok(Arc::new(SearchItems::default()));
        }

        let (id, task) = loop {
            let generation = self.generation.load(Ordering::SeqCst);
            let (Some(device), Some(user)) = (library.device_library(), library.user_library())
            else {
                tracing::debug!(query = %query, "Library not loaded, nothing to search");
                return Ok(Arc::new(SearchItems::default()));
            };
            match self.task(query, generation, &device, &user)? {
                Some(handle) => break handle,
                None => {
                    tracing::debug!(query = %query, "Library changed while starting search, retrying");
                }
            }
        };
        let result = task.await;

        match &result {
            Ok(items) => {
                tracing::debug!(query = %query, matches = items.count(), "Search completed");
            }
            Err(SearchError::Cancelled) => {
                tracing::debug!(query = %query, "Search cancelled before completion");
            }
            Err(err) => {
                tracing::warn!(query = %query, "Search unavailable: {}", err);
                self.evict(query, id);
            }
        }

        result
    }

    /// Cancels every cached or running search and empties the cache
    pub fn invalidate(&self) {
        let mut entries = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        let count = entries.len();
        for (_, entry) in entries.drain() {
            entry.token.cancel();
        }
        tracing::debug!(entries = count, "Search cache invalidated");
    }

    /// Cancels everything for good; later searches are reported cancelled
    pub fn shutdown(&self) {
        let mut entries = self.lock();
        self.scope.cancel();
        entries.clear();
        tracing::debug!("Search cache shut down");
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SearchEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks up or inserts the entry for `query` under a single lock
    ///
    /// Returns `None` when an invalidation happened since `generation` was
    /// read: the libraries the caller holds may predate it.
    fn task(
        &self,
        query: &str,
        generation: u64,
        device: &DeviceLibrary,
        user: &UserLibrary,
    ) -> Result<Option<(u64, SearchTask)>, SearchError> {
        let mut entries = self.lock();
        if self.scope.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        // Les entrées présentes sont toujours de la génération courante
        if let Some(entry) = entries.get(query) {
            tracing::trace!(query = %query, "Joining existing search");
            return Ok(Some((entry.id, entry.task.clone())));
        }

        if self.generation.load(Ordering::SeqCst) != generation {
            return Ok(None);
        }

        let entry = self.spawn(query, SearchItems::from_libraries(device, user));
        let handle = (entry.id, entry.task.clone());
        entries.insert(query.to_string(), entry);
        Ok(Some(handle))
    }

    fn spawn(&self, query: &str, items: SearchItems) -> SearchEntry {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = self.scope.child_token();
        tracing::debug!(query = %query, id, "Starting search");

        let engine = self.engine.clone();
        let owned_query = query.to_string();
        let work = tokio::task::spawn_blocking(move || engine.search(&items, &owned_query));

        let timeout = self.timeout;
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            let joined = async {
                work.await
                    .map(Arc::new)
                    .map_err(|err| SearchError::Failed(err.to_string()))
            };
            let bounded = async {
                match timeout {
                    Some(limit) => tokio::time::timeout(limit, joined)
                        .await
                        .unwrap_or(Err(SearchError::TimedOut(limit))),
                    None => joined.await,
                }
            };

            tokio::select! {
                _ = task_token.cancelled() => Err(SearchError::Cancelled),
                result = bounded => result,
            }
        });

        let waiter_token = token.clone();
        let task = async move {
            let result = match handle.await {
                Ok(result) => result,
                Err(err) => Err(SearchError::Failed(err.to_string())),
            };
            // Un résultat terminé après l'annulation n'est jamais livré
            if waiter_token.is_cancelled() {
                Err(SearchError::Cancelled)
            } else {
                result
            }
        }
        .boxed()
        .shared();

        SearchEntry { id, token, task }
    }

    /// Drops a failed entry so the next request retries
    fn evict(&self, query: &str, id: u64) {
        let mut entries = self.lock();
        if entries.get(query).is_some_and(|entry| entry.id == id) {
            if let Some(entry) = entries.remove(query) {
                entry.token.cancel();
            }
        }
    }
}

impl Drop for SearchCache {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

/// Flattens categorized results in the fixed category order
fn concat(items: &SearchItems) -> Vec<MediaItem> {
    let mut list = Vec::with_capacity(items.count());
    if let Some(songs) = &items.songs {
        list.extend(songs.iter().map(|song| MediaItem::song(song, None)));
    }
    if let Some(albums) = &items.albums {
        list.extend(albums.iter().map(|album| MediaItem::album(album)));
    }
    if let Some(artists) = &items.artists {
        list.extend(artists.iter().map(|artist| MediaItem::artist(artist)));
    }
    if let Some(genres) = &items.genres {
        list.extend(genres.iter().map(|genre| MediaItem::genre(genre)));
    }
    if let Some(playlists) = &items.playlists {
        list.extend(playlists.iter().map(|playlist| MediaItem::playlist(playlist)));
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::MediaType;
    use pmolibrary::{Album, Genre, MusicRepository, NameSearchEngine, Playlist, Song};
    use std::sync::atomic::AtomicUsize;

    /// Moteur qui compte ses invocations et peut simuler un calcul long
    struct CountingEngine {
        calls: AtomicUsize,
        delay: Duration,
    }

    impl CountingEngine {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SearchEngine for CountingEngine {
        fn search(&self, items: &SearchItems, query: &str) -> SearchItems {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            NameSearchEngine.search(items, query)
        }
    }

    fn library() -> Arc<MusicRepository> {
        let rock = Arc::new(Song::new("Rock Lobster"));
        let other = Arc::new(Song::new("Blue"));
        let album = Arc::new(Album::new("Rock Anthems", vec![rock.clone()]));
        let genre = Arc::new(Genre::new("Rock", vec![rock.clone()]));
        let playlist = Arc::new(Playlist::new("Rock Mix", vec![rock.clone()]));
        let repo = Arc::new(MusicRepository::new());
        repo.set_libraries(
            DeviceLibrary::new(vec![rock, other], vec![album], vec![], vec![genre]),
            UserLibrary::new(vec![playlist]),
        );
        repo
    }

    #[tokio::test]
    async fn test_prepare_counts_all_categories() {
        let engine = CountingEngine::new(Duration::ZERO);
        let cache = SearchCache::new(engine.clone(), &BrowserSettings::default());
        let repo = library();

        assert_eq!(cache.prepare("rock", &*repo).await, 4);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_results_follow_category_order() {
        let cache = SearchCache::new(CountingEngine::new(Duration::ZERO), &BrowserSettings::default());
        let repo = library();

        let results = cache.results("rock", &*repo, 0, 10).await.unwrap();
        let types: Vec<_> = results.iter().map(|i| i.media_type).collect();
        assert_eq!(
            types,
            vec![
                MediaType::Music,
                MediaType::Album,
                MediaType::Genre,
                MediaType::Playlist
            ]
        );

        let again = cache.results("rock", &*repo, 0, 10).await.unwrap();
        assert_eq!(results, again);
    }

    #[tokio::test]
    async fn test_results_are_paginated() {
        let cache = SearchCache::new(CountingEngine::new(Duration::ZERO), &BrowserSettings::default());
        let repo = library();

        let page = cache.results("rock", &*repo, 1, 3).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].media_type, MediaType::Playlist);
        assert!(cache.results("rock", &*repo, 2, 3).await.is_none());
    }

    #[tokio::test]
    async fn test_no_match_is_an_empty_list() {
        let cache = SearchCache::new(CountingEngine::new(Duration::ZERO), &BrowserSettings::default());
        let repo = library();

        assert_eq!(
            cache.results("polka", &*repo, 0, 10).await,
            Some(vec![])
        );
    }

    #[tokio::test]
    async fn test_concurrent_identical_queries_share_one_search() {
        let engine = CountingEngine::new(Duration::from_millis(100));
        let cache = SearchCache::new(engine.clone(), &BrowserSettings::default());
        let repo = library();

        let (a, b) = tokio::join!(
            cache.prepare("rock", &*repo),
            cache.prepare("rock", &*repo)
        );

        assert_eq!(a, 4);
        assert_eq!(b, 4);
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn test_completed_search_is_reused() {
        let engine = CountingEngine::new(Duration::ZERO);
        let cache = SearchCache::new(engine.clone(), &BrowserSettings::default());
        let repo = library();

        cache.prepare("rock", &*repo).await;
        cache.results("rock", &*repo, 0, 10).await;
        cache.prepare("blue", &*repo).await;

        assert_eq!(engine.calls(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_new_search() {
        let engine = CountingEngine::new(Duration::ZERO);
        let cache = SearchCache::new(engine.clone(), &BrowserSettings::default());
        let repo = library();

        cache.prepare("rock", &*repo).await;
        cache.invalidate();
        assert!(cache.is_empty());

        cache.results("rock", &*repo, 0, 10).await.unwrap();
        assert_eq!(engine.calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_cancels_waiters() {
        let engine = CountingEngine::new(Duration::from_millis(300));
        let cache = Arc::new(SearchCache::new(engine.clone(), &BrowserSettings::default()));
        let repo = library();

        let waiter = {
            let cache = cache.clone();
            let repo = repo.clone();
            tokio::spawn(async move { cache.run("rock", &*repo).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.len(), 1);
        cache.invalidate();

        assert_eq!(waiter.await.unwrap(), Err(SearchError::Cancelled));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_evicts_entry() {
        let engine = CountingEngine::new(Duration::from_millis(300));
        let settings = BrowserSettings::default().with_search_timeout(Duration::from_millis(20));
        let cache = SearchCache::new(engine.clone(), &settings);
        let repo = library();

        let result = cache.run("rock", &*repo).await;
        assert_eq!(result, Err(SearchError::TimedOut(Duration::from_millis(20))));
        assert!(cache.is_empty());
        assert_eq!(cache.prepare("rock", &*repo).await, 0);
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_searches() {
        let engine = CountingEngine::new(Duration::ZERO);
        let cache = SearchCache::new(engine.clone(), &BrowserSettings::default());
        let repo = library();

        cache.shutdown();

        assert_eq!(cache.prepare("rock", &*repo).await, 0);
        assert!(cache.results("rock", &*repo, 0, 10).await.is_none());
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_query_never_reaches_engine() {
        let engine = CountingEngine::new(Duration::ZERO);
        let cache = SearchCache::new(engine.clone(), &BrowserSettings::default());
        let repo = library();

        assert_eq!(cache.prepare("", &*repo).await, 0);
        assert_eq!(cache.results("", &*repo, 0, 10).await, Some(vec![]));
        assert_eq!(engine.calls(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_unloaded_library_creates_no_entry() {
        let engine = CountingEngine::new(Duration::ZERO);
        let cache = SearchCache::new(engine.clone(), &BrowserSettings::default());
        let repo = MusicRepository::new();
        repo.set_device_library(DeviceLibrary::default());

        assert_eq!(cache.prepare("rock", &repo).await, 0);
        assert_eq!(cache.results("rock", &repo, 0, 10).await, Some(vec![]));
        assert_eq!(engine.calls(), 0);
        assert!(cache.is_empty());
    }
}
