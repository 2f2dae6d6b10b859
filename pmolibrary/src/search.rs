//! Recherche dans la bibliothèque
//!
//! Le moteur reçoit les collections complètes et une requête, et renvoie une
//! liste par catégorie. Une catégorie absente (`None`) n'a pas été cherchée et
//! compte pour zéro résultat ; elle se distingue d'une liste vide.

use crate::library::{DeviceLibrary, UserLibrary};
use crate::model::{Album, Artist, Genre, Playlist, Song};
use std::sync::Arc;

/// Categorized collection of music, used both as search input and output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchItems {
    pub songs: Option<Vec<Arc<Song>>>,
    pub albums: Option<Vec<Arc<Album>>>,
    pub artists: Option<Vec<Arc<Artist>>>,
    pub genres: Option<Vec<Arc<Genre>>>,
    pub playlists: Option<Vec<Arc<Playlist>>>,
}

impl SearchItems {
    /// Every collection of both libraries, as search input
    pub fn from_libraries(device: &DeviceLibrary, user: &UserLibrary) -> Self {
        Self {
            songs: Some(device.songs().to_vec()),
            albums: Some(device.albums().to_vec()),
            artists: Some(device.artists().to_vec()),
            genres: Some(device.genres().to_vec()),
            playlists: Some(user.playlists().to_vec()),
        }
    }

    /// Total number of entries across all present categories
    pub fn count(&self) -> usize {
        self.songs.as_ref().map_or(0, Vec::len)
            + self.albums.as_ref().map_or(0, Vec::len)
            + self.artists.as_ref().map_or(0, Vec::len)
            + self.genres.as_ref().map_or(0, Vec::len)
            + self.playlists.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Search collaborator
///
/// Implementations are called off the async runtime and may be CPU bound.
pub trait SearchEngine: Send + Sync {
    fn search(&self, items: &SearchItems, query: &str) -> SearchItems;
}

/// Case-insensitive substring search on entity names
///
/// Every category present in the input is searched; categories absent from
/// the input stay absent in the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameSearchEngine;

impl NameSearchEngine {
    pub fn new() -> Self {
        Self
    }

    fn filter<T>(
        items: &Option<Vec<Arc<T>>>,
        needle: &str,
        name: impl Fn(&T) -> &str,
    ) -> Option<Vec<Arc<T>>> {
        items.as_ref().map(|list| {
            list.iter()
                .filter(|item| {
                    let item: &T = item;
                    name(item).to_lowercase().contains(needle)
                })
                .cloned()
                .collect()
        })
    }
}

impl SearchEngine for NameSearchEngine {
    fn search(&self, items: &SearchItems, query: &str) -> SearchItems {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return SearchItems::default();
        }

        SearchItems {
            songs: Self::filter(&items.songs, &needle, |s: &Song| s.title.as_str()),
            albums: Self::filter(&items.albums, &needle, |a: &Album| a.title.as_str()),
            artists: Self::filter(&items.artists, &needle, |a: &Artist| a.name.as_str()),
            genres: Self::filter(&items.genres, &needle, |g: &Genre| g.name.as_str()),
            playlists: Self::filter(&items.playlists, &needle, |p: &Playlist| p.name.as_str()),
        }
    }
}
