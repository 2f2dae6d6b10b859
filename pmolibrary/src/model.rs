//! Entités de la bibliothèque musicale
//!
//! Les entités sont partagées via `Arc` : un même morceau apparaît dans son
//! album, chez ses artistes, dans ses genres et dans les playlists qui le
//! référencent.

use crate::uid::{MusicKind, MusicUid};
use std::sync::Arc;

/// A single track of the device library
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub uid: MusicUid,
    pub title: String,
    /// Artist names, in tag order
    pub artists: Vec<String>,
    /// Title of the album this song belongs to
    pub album: Option<String>,
    pub genres: Vec<String>,
    pub track: Option<u32>,
    pub duration_ms: Option<u64>,
    pub cover_uri: Option<String>,
}

impl Song {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            uid: MusicUid::new(MusicKind::Song),
            title: title.into(),
            artists: Vec::new(),
            album: None,
            genres: Vec::new(),
            track: None,
            duration_ms: None,
            cover_uri: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Album {
    pub uid: MusicUid,
    pub title: String,
    pub artists: Vec<String>,
    pub year: Option<i32>,
    pub cover_uri: Option<String>,
    pub songs: Vec<Arc<Song>>,
}

impl Album {
    pub fn new(title: impl Into<String>, songs: Vec<Arc<Song>>) -> Self {
        Self {
            uid: MusicUid::new(MusicKind::Album),
            title: title.into(),
            artists: Vec::new(),
            year: None,
            cover_uri: None,
            songs,
        }
    }
}

/// An artist with the albums credited to it
///
/// `explicit_albums` are albums the artist is credited on as album artist,
/// `implicit_albums` are albums where the artist only appears on some songs.
#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub uid: MusicUid,
    pub name: String,
    pub explicit_albums: Vec<Arc<Album>>,
    pub implicit_albums: Vec<Arc<Album>>,
    pub songs: Vec<Arc<Song>>,
}

impl Artist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uid: MusicUid::new(MusicKind::Artist),
            name: name.into(),
            explicit_albums: Vec::new(),
            implicit_albums: Vec::new(),
            songs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Genre {
    pub uid: MusicUid,
    pub name: String,
    pub songs: Vec<Arc<Song>>,
}

impl Genre {
    pub fn new(name: impl Into<String>, songs: Vec<Arc<Song>>) -> Self {
        Self {
            uid: MusicUid::new(MusicKind::Genre),
            name: name.into(),
            songs,
        }
    }
}

/// A user-defined playlist
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub uid: MusicUid,
    pub name: String,
    pub songs: Vec<Arc<Song>>,
}

impl Playlist {
    pub fn new(name: impl Into<String>, songs: Vec<Arc<Song>>) -> Self {
        Self {
            uid: MusicUid::new(MusicKind::Playlist),
            name: name.into(),
            songs,
        }
    }
}

/// Any entity the library can resolve from a UID
#[derive(Debug, Clone, PartialEq)]
pub enum Music {
    Song(Arc<Song>),
    Album(Arc<Album>),
    Artist(Arc<Artist>),
    Genre(Arc<Genre>),
    Playlist(Arc<Playlist>),
}

impl Music {
    pub fn uid(&self) -> MusicUid {
        match self {
            Music::Song(s) => s.uid,
            Music::Album(a) => a.uid,
            Music::Artist(a) => a.uid,
            Music::Genre(g) => g.uid,
            Music::Playlist(p) => p.uid,
        }
    }

    /// Display name of the entity (title for songs and albums)
    pub fn name(&self) -> &str {
        match self {
            Music::Song(s) => &s.title,
            Music::Album(a) => &a.title,
            Music::Artist(a) => &a.name,
            Music::Genre(g) => &g.name,
            Music::Playlist(p) => &p.name,
        }
    }
}
