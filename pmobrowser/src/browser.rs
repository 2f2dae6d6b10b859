//! Façade du service de navigation
//!
//! [`MediaItemBrowser`] regroupe le résolveur d'arborescence et le cache de
//! recherche derrière l'interface exposée aux clients. Il s'abonne aux
//! changements de la bibliothèque entre [`attach`](MediaItemBrowser::attach)
//! et [`release`](MediaItemBrowser::release) : chaque changement vide le cache
//! de recherche et signale au client les adresses devenues obsolètes.

use crate::address::{Address, Category};
use crate::item::MediaItem;
use crate::search::SearchCache;
use crate::settings::BrowserSettings;
use crate::tree::TreeResolver;
use pmolibrary::{LibraryChanges, LibraryProvider, ListenerId, SearchEngine};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Receiver of stale address lists
///
/// Implemented for any `Fn(Vec<String>)` closure.
pub trait Invalidator: Send + Sync {
    fn invalidate(&self, media_ids: Vec<String>);
}

impl<F> Invalidator for F
where
    F: Fn(Vec<String>) + Send + Sync,
{
    fn invalidate(&self, media_ids: Vec<String>) {
        self(media_ids)
    }
}

struct BrowserInner {
    library: Arc<dyn LibraryProvider>,
    tree: TreeResolver,
    search: SearchCache,
    invalidator: RwLock<Option<Arc<dyn Invalidator>>>,
    listener: Mutex<Option<ListenerId>>,
}

/// Browsing and search service over a [`LibraryProvider`]
///
/// Cheap to clone; clones share the same cache and subscription.
#[derive(Clone)]
pub struct MediaItemBrowser {
    inner: Arc<BrowserInner>,
}

impl MediaItemBrowser {
    pub fn new(library: Arc<dyn LibraryProvider>, engine: Arc<dyn SearchEngine>) -> Self {
        Self::with_settings(library, engine, &BrowserSettings::default())
    }

    pub fn with_settings(
        library: Arc<dyn LibraryProvider>,
        engine: Arc<dyn SearchEngine>,
        settings: &BrowserSettings,
    ) -> Self {
        Self {
            inner: Arc::new(BrowserInner {
                tree: TreeResolver::new(library.clone()),
                search: SearchCache::new(engine, settings),
                library,
                invalidator: RwLock::new(None),
                listener: Mutex::new(None),
            }),
        }
    }

    /// Installs the invalidation sink and subscribes to library changes
    ///
    /// Calling it again replaces the sink but keeps the single subscription.
    pub fn attach(&self, invalidator: impl Invalidator + 'static) {
        *self
            .inner
            .invalidator
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(invalidator));

        let mut listener = self.inner.listener.lock().unwrap_or_else(PoisonError::into_inner);
        if listener.is_some() {
            tracing::debug!("Browser already attached, sink replaced");
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        let id = self
            .inner
            .library
            .add_update_listener(Arc::new(move |changes: &LibraryChanges| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_library_changed(changes);
                }
            }));
        *listener = Some(id);
        tracing::info!(listener = ?id, "Media browser attached to library");
    }

    /// Detaches from the library and tears the search cache down
    ///
    /// Once this returns, the sink is never called again. Pending and later
    /// searches are reported unavailable. Must not be called from inside the
    /// invalidation sink.
    pub fn release(&self) {
        let id = self
            .inner
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(id) = id {
            self.inner.library.remove_update_listener(id);
        }

        self.inner
            .invalidator
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.inner.search.shutdown();
        tracing::info!("Media browser released");
    }

    /// Whether a library subscription is active
    pub fn is_attached(&self) -> bool {
        self.inner
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn root(&self) -> MediaItem {
        self.inner.tree.root()
    }

    /// Address of the root node
    pub fn root_id(&self) -> String {
        Address::from(Category::Root).encode()
    }

    pub fn get_item(&self, media_id: &str) -> Option<MediaItem> {
        tracing::debug!(media_id = %media_id, "Get item");
        self.inner.tree.item(media_id)
    }

    pub fn get_children(&self, media_id: &str, page: u32, page_size: u32) -> Option<Vec<MediaItem>> {
        tracing::debug!(media_id = %media_id, page, page_size, "Get children");
        self.inner.tree.children(media_id, page, page_size)
    }

    /// Starts (or joins) the search for `query` and returns its match count
    pub async fn prepare_search(&self, query: &str) -> usize {
        tracing::debug!(query = %query, "Prepare search");
        self.inner
            .search
            .prepare(query, self.inner.library.as_ref())
            .await
    }

    /// One page of search results, reusing a prepared search when available
    pub async fn get_search_result(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Option<Vec<MediaItem>> {
        tracing::debug!(query = %query, page, page_size, "Get search results");
        self.inner
            .search
            .results(query, self.inner.library.as_ref(), page, page_size)
            .await
    }
}

impl BrowserInner {
    fn on_library_changed(&self, changes: &LibraryChanges) {
        if !changes.any() {
            return;
        }
        self.search.invalidate();

        let stale = self.stale_media_ids(changes);
        tracing::debug!(
            device = changes.device_library,
            user = changes.user_library,
            stale = stale.len(),
            "Library changed"
        );
        if stale.is_empty() {
            return;
        }

        let invalidator = self
            .invalidator
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(invalidator) = invalidator {
            invalidator.invalidate(stale);
        }
    }

    /// Addresses to refresh after a change; a library that is not loaded
    /// contributes nothing
    fn stale_media_ids(&self, changes: &LibraryChanges) -> Vec<String> {
        let device = changes
            .device_library
            .then(|| self.library.device_library())
            .flatten();
        let user = changes
            .user_library
            .then(|| self.library.user_library())
            .flatten();

        let mut ids: Vec<String> = Category::ALL
            .into_iter()
            .filter(|category| {
                (device.is_some() && Category::DEVICE_MUSIC.contains(category))
                    || (user.is_some() && Category::USER_MUSIC.contains(category))
            })
            .map(|category| Address::from(category).encode())
            .collect();

        if let Some(device) = &device {
            let uids = device
                .albums()
                .iter()
                .map(|album| album.uid)
                .chain(device.artists().iter().map(|artist| artist.uid))
                .chain(device.genres().iter().map(|genre| genre.uid));
            ids.extend(uids.map(|uid| Address::Single(uid).encode()));
        }

        if let Some(user) = &user {
            ids.extend(
                user.playlists()
                    .iter()
                    .map(|playlist| Address::Single(playlist.uid).encode()),
            );
        }

        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmolibrary::{Album, DeviceLibrary, MusicRepository, NameSearchEngine, Playlist, Song, UserLibrary};

    fn browser() -> (Arc<MusicRepository>, MediaItemBrowser) {
        let repo = Arc::new(MusicRepository::new());
        let browser = MediaItemBrowser::new(repo.clone(), Arc::new(NameSearchEngine::new()));
        (repo, browser)
    }

    fn recorder() -> (Arc<Mutex<Vec<Vec<String>>>>, impl Fn(Vec<String>) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |ids: Vec<String>| sink.lock().unwrap().push(ids))
    }

    #[test]
    fn test_root_id() {
        let (_, browser) = browser();
        assert_eq!(browser.root_id(), "category:root");
        assert_eq!(browser.root().media_id, browser.root_id());
    }

    #[test]
    fn test_attach_registers_once() {
        let (repo, browser) = browser();
        browser.attach(|_: Vec<String>| {});
        browser.attach(|_: Vec<String>| {});

        assert!(browser.is_attached());
        assert_eq!(repo.listener_count(), 1);

        browser.release();
        assert!(!browser.is_attached());
        assert_eq!(repo.listener_count(), 0);
    }

    #[test]
    fn test_device_change_reports_device_addresses() {
        let (repo, browser) = browser();
        let (seen, sink) = recorder();
        browser.attach(sink);

        let album = Arc::new(Album::new("A", vec![]));
        repo.set_device_library(DeviceLibrary::new(vec![], vec![album.clone()], vec![], vec![]));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            vec![
                "category:root".to_string(),
                "category:songs".to_string(),
                "category:albums".to_string(),
                "category:artists".to_string(),
                "category:genres".to_string(),
                Address::Single(album.uid).encode(),
            ]
        );
    }

    #[test]
    fn test_user_change_reports_playlists() {
        let (repo, browser) = browser();
        let (seen, sink) = recorder();
        browser.attach(sink);

        let playlist = Arc::new(Playlist::new("Mix", vec![Arc::new(Song::new("S"))]));
        repo.set_user_library(UserLibrary::new(vec![playlist.clone()]));

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen[0],
            vec![
                "category:root".to_string(),
                "category:playlists".to_string(),
                Address::Single(playlist.uid).encode(),
            ]
        );
    }

    #[test]
    fn test_combined_change_reports_root_once() {
        let (repo, browser) = browser();
        let (seen, sink) = recorder();
        browser.attach(sink);

        repo.set_libraries(DeviceLibrary::default(), UserLibrary::default());

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].len(), Category::ALL.len());
    }

    #[test]
    fn test_released_browser_is_not_notified() {
        let (repo, browser) = browser();
        let (seen, sink) = recorder();
        browser.attach(sink);
        browser.release();

        repo.set_device_library(DeviceLibrary::default());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unloaded_library_search() {
        let (_, browser) = browser();
        assert_eq!(browser.prepare_search("rock").await, 0);
        assert_eq!(browser.get_search_result("rock", 0, 10).await, Some(vec![]));
    }

    #[tokio::test]
    async fn test_search_unavailable_after_release() {
        let (repo, browser) = browser();
        repo.set_libraries(
            DeviceLibrary::new(vec![Arc::new(Song::new("Rock"))], vec![], vec![], vec![]),
            UserLibrary::default(),
        );
        browser.attach(|_: Vec<String>| {});
        assert_eq!(browser.prepare_search("rock").await, 1);

        browser.release();
        assert_eq!(browser.prepare_search("rock").await, 0);
        assert!(browser.get_search_result("rock", 0, 10).await.is_none());
    }

    #[test]
    fn test_unloaded_libraries_are_not_stale() {
        let (_, browser) = browser();
        let changes = LibraryChanges {
            device_library: true,
            user_library: true,
        };

        assert!(browser.inner.stale_media_ids(&changes).is_empty());
    }

    #[test]
    fn test_only_loaded_library_is_stale() {
        let (repo, browser) = browser();
        let playlist = Arc::new(Playlist::new("Mix", vec![]));
        repo.set_user_library(UserLibrary::new(vec![playlist.clone()]));

        let changes = LibraryChanges {
            device_library: true,
            user_library: true,
        };
        assert_eq!(
            browser.inner.stale_media_ids(&changes),
            vec![
                "category:root".to_string(),
                "category:playlists".to_string(),
                Address::Single(playlist.uid).encode(),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_query_is_empty() {
        let (repo, browser) = browser();
        repo.set_libraries(
            DeviceLibrary::new(vec![Arc::new(Song::new("Rock"))], vec![], vec![], vec![]),
            UserLibrary::default(),
        );

        assert_eq!(browser.prepare_search("").await, 0);
        assert_eq!(browser.get_search_result("", 0, 10).await, Some(vec![]));
        assert!(browser.inner.search.is_empty());
    }
}
