//! Résolution de l'arborescence navigable
//!
//! ```text
//! category:root
//!   ├─ category:songs      → item:<song>
//!   ├─ category:albums     → item:<album>     → item:<album>><song>
//!   ├─ category:artists    → item:<artist>    → item:<album>, item:<artist>><song>
//!   ├─ category:genres     → item:<genre>     → item:<genre>><song>
//!   └─ category:playlists  → item:<playlist>  → item:<playlist>><song>
//! ```
//!
//! Les morceaux listés sous un parent reçoivent une adresse `Joined` pour que
//! le client sache par quel chemin ils ont été atteints.

use crate::address::{Address, Category};
use crate::item::MediaItem;
use crate::paginate::paginate;
use pmolibrary::{DeviceLibrary, LibraryProvider, Music, MusicUid, UserLibrary};
use std::sync::Arc;

/// Answers item and children requests against the library
#[derive(Clone)]
pub struct TreeResolver {
    library: Arc<dyn LibraryProvider>,
}

impl TreeResolver {
    pub fn new(library: Arc<dyn LibraryProvider>) -> Self {
        Self { library }
    }

    /// Root folder
    pub fn root(&self) -> MediaItem {
        MediaItem::category(Category::Root)
    }

    /// Resolves a single node
    ///
    /// Joined addresses resolve to their child entity. Returns `None` for
    /// malformed addresses and unknown entities.
    pub fn item(&self, media_id: &str) -> Option<MediaItem> {
        let address = Address::decode(media_id)?;
        match address {
            Address::Category(category) => Some(MediaItem::category(category)),
            Address::Single(uid) | Address::Joined { child: uid, .. } => {
                let music = self.library.find(&uid);
                if music.is_none() {
                    tracing::debug!(media_id = %media_id, "Item not found in library");
                }
                music.as_ref().map(MediaItem::music)
            }
        }
    }

    /// Lists one page of a node's children
    ///
    /// While either library is not loaded yet the answer is an empty list, not
    /// `None`: the client shows an empty state rather than an error. The same
    /// goes for a node without children. Songs are leaves and answer `None`, as
    /// do out of range pages.
    pub fn children(&self, media_id: &str, page: u32, page_size: u32) -> Option<Vec<MediaItem>> {
        let (Some(device), Some(user)) = (self.library.device_library(), self.library.user_library())
        else {
            tracing::debug!(media_id = %media_id, "Library not loaded, no children yet");
            return Some(Vec::new());
        };

        let items = self.child_items(media_id, &device, &user)?;
        if items.is_empty() {
            return Some(items);
        }
        paginate(items, page, page_size)
    }

    fn child_items(
        &self,
        media_id: &str,
        device: &DeviceLibrary,
        user: &UserLibrary,
    ) -> Option<Vec<MediaItem>> {
        match Address::decode(media_id)? {
            Address::Category(category) => Some(category_children(category, device, user)),
            Address::Single(uid) | Address::Joined { child: uid, .. } => {
                self.entity_children(&uid)
            }
        }
    }

    fn entity_children(&self, uid: &MusicUid) -> Option<Vec<MediaItem>> {
        match self.library.find(uid)? {
            Music::Album(album) => Some(
                album
                    .songs
                    .iter()
                    .map(|song| MediaItem::song(song, Some(album.uid)))
                    .collect(),
            ),
            Music::Artist(artist) => Some(
                artist
                    .explicit_albums
                    .iter()
                    .chain(artist.implicit_albums.iter())
                    .map(|album| MediaItem::album(album))
                    .chain(
                        artist
                            .songs
                            .iter()
                            .map(|song| MediaItem::song(song, Some(artist.uid))),
                    )
                    .collect(),
            ),
            Music::Genre(genre) => Some(
                genre
                    .songs
                    .iter()
                    .map(|song| MediaItem::song(song, Some(genre.uid)))
                    .collect(),
            ),
            Music::Playlist(playlist) => Some(
                playlist
                    .songs
                    .iter()
                    .map(|song| MediaItem::song(song, Some(playlist.uid)))
                    .collect(),
            ),
            // Les morceaux sont des feuilles
            Music::Song(_) => None,
        }
    }
}

fn category_children(
    category: Category,
    device: &DeviceLibrary,
    user: &UserLibrary,
) -> Vec<MediaItem> {
    match category {
        Category::Root => Category::IMPORTANT
            .into_iter()
            .map(MediaItem::category)
            .collect(),
        Category::Songs => device
            .songs()
            .iter()
            .map(|song| MediaItem::song(song, None))
            .collect(),
        Category::Albums => device.albums().iter().map(|a| MediaItem::album(a)).collect(),
        Category::Artists => device.artists().iter().map(|a| MediaItem::artist(a)).collect(),
        Category::Genres => device.genres().iter().map(|g| MediaItem::genre(g)).collect(),
        Category::Playlists => user
            .playlists()
            .iter()
            .map(|p| MediaItem::playlist(p))
            .collect(),
    }
}
