//! Chargement d'une bibliothèque depuis un instantané JSON
//!
//! L'instantané décrit explicitement chaque entité et ses relations par UID.
//! Il ne s'agit pas d'un scanner : les métadonnées sont supposées déjà
//! extraites.
//!
//! ```json
//! {
//!   "songs": [{ "uid": "song:…", "title": "Intro", "album": "First" }],
//!   "albums": [{ "uid": "album:…", "title": "First", "songs": ["song:…"] }],
//!   "playlists": [{ "uid": "playlist:…", "name": "Mix", "songs": ["song:…"] }]
//! }
//! ```

use crate::library::{DeviceLibrary, UserLibrary};
use crate::model::{Album, Artist, Genre, Playlist, Song};
use crate::uid::{MusicKind, MusicUid};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRecord {
    pub uid: MusicUid,
    pub title: String,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub track: Option<u32>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub cover_uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub uid: MusicUid,
    pub title: String,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub cover_uri: Option<String>,
    #[serde(default)]
    pub songs: Vec<MusicUid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub uid: MusicUid,
    pub name: String,
    #[serde(default)]
    pub explicit_albums: Vec<MusicUid>,
    #[serde(default)]
    pub implicit_albums: Vec<MusicUid>,
    #[serde(default)]
    pub songs: Vec<MusicUid>,
}

/// Genre or playlist: a named list of songs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRecord {
    pub uid: MusicUid,
    pub name: String,
    #[serde(default)]
    pub songs: Vec<MusicUid>,
}

/// Serialized form of a complete library
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    #[serde(default)]
    pub songs: Vec<SongRecord>,
    #[serde(default)]
    pub albums: Vec<AlbumRecord>,
    #[serde(default)]
    pub artists: Vec<ArtistRecord>,
    #[serde(default)]
    pub genres: Vec<GroupRecord>,
    #[serde(default)]
    pub playlists: Vec<GroupRecord>,
}

impl LibrarySnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading library snapshot");
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Resolves every cross-reference and builds both libraries
    ///
    /// Fails on duplicate UIDs, on UIDs of the wrong kind, and on references
    /// to entities the snapshot does not define.
    pub fn build(self) -> Result<(DeviceLibrary, UserLibrary)> {
        let mut songs = Vec::with_capacity(self.songs.len());
        let mut song_index = HashMap::with_capacity(self.songs.len());
        for record in self.songs {
            expect_kind(&record.uid, MusicKind::Song)?;
            let song = Arc::new(Song {
                uid: record.uid,
                title: record.title,
                artists: record.artists,
                album: record.album,
                genres: record.genres,
                track: record.track,
                duration_ms: record.duration_ms,
                cover_uri: record.cover_uri,
            });
            if song_index.insert(song.uid, song.clone()).is_some() {
                return Err(Error::DuplicateUid(song.uid.to_string()));
            }
            songs.push(song);
        }

        let mut albums = Vec::with_capacity(self.albums.len());
        let mut album_index = HashMap::with_capacity(self.albums.len());
        for record in self.albums {
            expect_kind(&record.uid, MusicKind::Album)?;
            let album = Arc::new(Album {
                uid: record.uid,
                title: record.title,
                artists: record.artists,
                year: record.year,
                cover_uri: record.cover_uri,
                songs: resolve(&record.songs, &song_index)?,
            });
            if album_index.insert(album.uid, album.clone()).is_some() {
                return Err(Error::DuplicateUid(album.uid.to_string()));
            }
            albums.push(album);
        }

        let mut artists = Vec::with_capacity(self.artists.len());
        for record in self.artists {
            expect_kind(&record.uid, MusicKind::Artist)?;
            artists.push(Arc::new(Artist {
                uid: record.uid,
                name: record.name,
                explicit_albums: resolve(&record.explicit_albums, &album_index)?,
                implicit_albums: resolve(&record.implicit_albums, &album_index)?,
                songs: resolve(&record.songs, &song_index)?,
            }));
        }

        let mut genres = Vec::with_capacity(self.genres.len());
        for record in self.genres {
            expect_kind(&record.uid, MusicKind::Genre)?;
            genres.push(Arc::new(Genre {
                uid: record.uid,
                name: record.name,
                songs: resolve(&record.songs, &song_index)?,
            }));
        }

        let mut playlists = Vec::with_capacity(self.playlists.len());
        for record in self.playlists {
            expect_kind(&record.uid, MusicKind::Playlist)?;
            playlists.push(Arc::new(Playlist {
                uid: record.uid,
                name: record.name,
                songs: resolve(&record.songs, &song_index)?,
            }));
        }

        check_unique(artists.iter().map(|a| a.uid))?;
        check_unique(genres.iter().map(|g| g.uid))?;
        check_unique(playlists.iter().map(|p| p.uid))?;

        Ok((
            DeviceLibrary::new(songs, albums, artists, genres),
            UserLibrary::new(playlists),
        ))
    }
}

fn expect_kind(uid: &MusicUid, expected: MusicKind) -> Result<()> {
    if uid.kind() == expected {
        Ok(())
    } else {
        Err(Error::KindMismatch {
            uid: uid.to_string(),
            expected: expected.as_str(),
        })
    }
}

fn resolve<T>(uids: &[MusicUid], index: &HashMap<MusicUid, Arc<T>>) -> Result<Vec<Arc<T>>> {
    uids.iter()
        .map(|uid| {
            index
                .get(uid)
                .cloned()
                .ok_or_else(|| Error::DanglingReference(uid.to_string()))
        })
        .collect()
}

fn check_unique(uids: impl Iterator<Item = MusicUid>) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for uid in uids {
        if !seen.insert(uid) {
            return Err(Error::DuplicateUid(uid.to_string()));
        }
    }
    Ok(())
}
