//! MusicRepository : point d'accès partagé à la bibliothèque chargée
//!
//! Le dépôt détient la bibliothèque de l'appareil et celle de l'utilisateur,
//! chacune pouvant ne pas être encore chargée, et notifie les listeners
//! enregistrés à chaque remplacement.

use crate::library::{DeviceLibrary, UserLibrary};
use crate::model::Music;
use crate::uid::MusicUid;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Flags describing which parts of the library changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryChanges {
    pub device_library: bool,
    pub user_library: bool,
}

impl LibraryChanges {
    pub fn any(&self) -> bool {
        self.device_library || self.user_library
    }
}

/// Callback invoked on library changes
pub type UpdateListener = Arc<dyn Fn(&LibraryChanges) + Send + Sync>;

/// Token returned by [`LibraryProvider::add_update_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Read access to the loaded library plus change notifications
///
/// This is the seam the browsing layer depends on. [`MusicRepository`] is the
/// in-memory implementation.
pub trait LibraryProvider: Send + Sync {
    /// Device library, or `None` while it is not loaded yet
    fn device_library(&self) -> Option<Arc<DeviceLibrary>>;

    /// User library, or `None` while it is not loaded yet
    fn user_library(&self) -> Option<Arc<UserLibrary>>;

    /// Looks an entity up in whichever library is loaded
    fn find(&self, uid: &MusicUid) -> Option<Music> {
        if let Some(found) = self.device_library().and_then(|lib| lib.find(uid)) {
            return Some(found);
        }
        self.user_library().and_then(|lib| lib.find(uid))
    }

    /// Registers a change listener
    fn add_update_listener(&self, listener: UpdateListener) -> ListenerId;

    /// Unregisters a change listener
    ///
    /// Once this returns, the listener is never invoked again, even by a
    /// notification that was being dispatched concurrently. Must not be called
    /// from inside a listener.
    fn remove_update_listener(&self, id: ListenerId) -> bool;
}

/// Thread-safe in-memory library holder
#[derive(Default)]
pub struct MusicRepository {
    device: RwLock<Option<Arc<DeviceLibrary>>>,
    user: RwLock<Option<Arc<UserLibrary>>>,
    listeners: RwLock<BTreeMap<u64, UpdateListener>>,
    listener_counter: AtomicU64,
}

impl MusicRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the device library and notifies listeners
    pub fn set_device_library(&self, library: DeviceLibrary) {
        tracing::info!(
            songs = library.songs().len(),
            albums = library.albums().len(),
            artists = library.artists().len(),
            genres = library.genres().len(),
            "Device library updated"
        );
        *self.device.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(library));
        self.notify(LibraryChanges {
            device_library: true,
            user_library: false,
        });
    }

    /// Replaces the user library and notifies listeners
    pub fn set_user_library(&self, library: UserLibrary) {
        tracing::info!(playlists = library.playlists().len(), "User library updated");
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(library));
        self.notify(LibraryChanges {
            device_library: false,
            user_library: true,
        });
    }

    /// Replaces both libraries with a single notification
    pub fn set_libraries(&self, device: DeviceLibrary, user: UserLibrary) {
        *self.device.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(device));
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(user));
        self.notify(LibraryChanges {
            device_library: true,
            user_library: true,
        });
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn notify(&self, changes: LibraryChanges) {
        // Le verrou de lecture reste tenu pendant la diffusion : un retrait
        // concurrent attend la fin de la notification en cours.
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(
            listeners = listeners.len(),
            device = changes.device_library,
            user = changes.user_library,
            "Dispatching library changes"
        );
        for listener in listeners.values() {
            listener(&changes);
        }
    }
}

impl LibraryProvider for MusicRepository {
    fn device_library(&self) -> Option<Arc<DeviceLibrary>> {
        self.device
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn user_library(&self) -> Option<Arc<UserLibrary>> {
        self.user.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn add_update_listener(&self, listener: UpdateListener) -> ListenerId {
        let id = self.listener_counter.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, listener);
        ListenerId(id)
    }

    fn remove_update_listener(&self, id: ListenerId) -> bool {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id.0)
            .is_some()
    }
}
