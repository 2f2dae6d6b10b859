//! Bibliothèques chargées : appareil (scan) et utilisateur (playlists)

use crate::model::{Album, Artist, Genre, Music, Playlist, Song};
use crate::uid::MusicUid;
use std::collections::HashMap;
use std::sync::Arc;

/// Music found by scanning the device
///
/// Collections keep the order they were given in; lookups by UID go through
/// an index built once at construction.
#[derive(Debug, Clone, Default)]
pub struct DeviceLibrary {
    songs: Vec<Arc<Song>>,
    albums: Vec<Arc<Album>>,
    artists: Vec<Arc<Artist>>,
    genres: Vec<Arc<Genre>>,
    index: HashMap<MusicUid, Music>,
}

impl DeviceLibrary {
    pub fn new(
        songs: Vec<Arc<Song>>,
        albums: Vec<Arc<Album>>,
        artists: Vec<Arc<Artist>>,
        genres: Vec<Arc<Genre>>,
    ) -> Self {
        let mut index = HashMap::with_capacity(
            songs.len() + albums.len() + artists.len() + genres.len(),
        );
        for song in &songs {
            index.insert(song.uid, Music::Song(song.clone()));
        }
        for album in &albums {
            index.insert(album.uid, Music::Album(album.clone()));
        }
        for artist in &artists {
            index.insert(artist.uid, Music::Artist(artist.clone()));
        }
        for genre in &genres {
            index.insert(genre.uid, Music::Genre(genre.clone()));
        }

        Self {
            songs,
            albums,
            artists,
            genres,
            index,
        }
    }

    pub fn songs(&self) -> &[Arc<Song>] {
        &self.songs
    }

    pub fn albums(&self) -> &[Arc<Album>] {
        &self.albums
    }

    pub fn artists(&self) -> &[Arc<Artist>] {
        &self.artists
    }

    pub fn genres(&self) -> &[Arc<Genre>] {
        &self.genres
    }

    pub fn find(&self, uid: &MusicUid) -> Option<Music> {
        self.index.get(uid).cloned()
    }
}

/// Music defined by the user (playlists)
#[derive(Debug, Clone, Default)]
pub struct UserLibrary {
    playlists: Vec<Arc<Playlist>>,
    index: HashMap<MusicUid, Arc<Playlist>>,
}

impl UserLibrary {
    pub fn new(playlists: Vec<Arc<Playlist>>) -> Self {
        let index = playlists.iter().map(|p| (p.uid, p.clone())).collect();
        Self { playlists, index }
    }

    pub fn playlists(&self) -> &[Arc<Playlist>] {
        &self.playlists
    }

    pub fn find(&self, uid: &MusicUid) -> Option<Music> {
        self.index.get(uid).cloned().map(Music::Playlist)
    }
}
