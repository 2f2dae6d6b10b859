//! Représentation des nœuds envoyée au client
//!
//! Chaque [`MediaItem`] porte son adresse encodée (`media_id`), ce qui permet
//! au client de revenir vers le service avec le même identifiant.

use crate::address::{Address, Category};
use pmolibrary::{Album, Artist, Genre, Music, MusicUid, Playlist, Song};
use serde::Serialize;

/// Kind of node, as understood by media session clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    /// Root folder mixing several kinds of children
    FolderMixed,
    FolderSongs,
    FolderAlbums,
    FolderArtists,
    FolderGenres,
    FolderPlaylists,
    Music,
    Album,
    Artist,
    Genre,
    Playlist,
}

impl From<Category> for MediaType {
    fn from(category: Category) -> Self {
        match category {
            Category::Root => MediaType::FolderMixed,
            Category::Songs => MediaType::FolderSongs,
            Category::Albums => MediaType::FolderAlbums,
            Category::Artists => MediaType::FolderArtists,
            Category::Genres => MediaType::FolderGenres,
            Category::Playlists => MediaType::FolderPlaylists,
        }
    }
}

/// A browsable or playable node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaItem {
    /// Encoded [`Address`] of the node
    pub media_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub media_type: MediaType,
    pub browsable: bool,
    pub playable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artwork_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_count: Option<usize>,
}

impl MediaItem {
    fn new(address: Address, title: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            media_id: address.encode(),
            title: title.into(),
            subtitle: None,
            media_type,
            browsable: false,
            playable: false,
            artwork_uri: None,
            duration_ms: None,
            child_count: None,
        }
    }

    /// Decodes the item's address
    pub fn address(&self) -> Option<Address> {
        Address::decode(&self.media_id)
    }

    /// Synthetic folder for a category
    pub fn category(category: Category) -> Self {
        let mut item = Self::new(category.into(), category.title(), category.into());
        item.browsable = true;
        if category == Category::Root {
            item.child_count = Some(Category::IMPORTANT.len());
        }
        item
    }

    /// Song leaf
    ///
    /// With a `parent`, the song is addressed as reached through that parent
    /// (`Joined`), otherwise as a standalone entity (`Single`).
    pub fn song(song: &Song, parent: Option<MusicUid>) -> Self {
        let address = match parent {
            Some(parent) => Address::Joined {
                parent,
                child: song.uid,
            },
            None => Address::Single(song.uid),
        };
        let mut item = Self::new(address, song.title.clone(), MediaType::Music);
        item.playable = true;
        item.subtitle = join_names(&song.artists);
        item.artwork_uri = song.cover_uri.clone();
        item.duration_ms = song.duration_ms;
        item
    }

    pub fn album(album: &Album) -> Self {
        let mut item = Self::new(
            Address::Single(album.uid),
            album.title.clone(),
            MediaType::Album,
        );
        item.browsable = true;
        item.playable = true;
        item.subtitle = join_names(&album.artists);
        item.artwork_uri = album.cover_uri.clone();
        item.child_count = Some(album.songs.len());
        item
    }

    pub fn artist(artist: &Artist) -> Self {
        let mut item = Self::new(
            Address::Single(artist.uid),
            artist.name.clone(),
            MediaType::Artist,
        );
        let albums = artist.explicit_albums.len() + artist.implicit_albums.len();
        item.browsable = true;
        item.playable = true;
        item.subtitle = Some(format!(
            "{} albums, {} songs",
            albums,
            artist.songs.len()
        ));
        item.child_count = Some(albums + artist.songs.len());
        item
    }

    pub fn genre(genre: &Genre) -> Self {
        let mut item = Self::new(
            Address::Single(genre.uid),
            genre.name.clone(),
            MediaType::Genre,
        );
        item.browsable = true;
        item.playable = true;
        item.subtitle = Some(format!("{} songs", genre.songs.len()));
        item.child_count = Some(genre.songs.len());
        item
    }

    pub fn playlist(playlist: &Playlist) -> Self {
        let mut item = Self::new(
            Address::Single(playlist.uid),
            playlist.name.clone(),
            MediaType::Playlist,
        );
        item.browsable = true;
        item.playable = true;
        item.subtitle = Some(format!("{} songs", playlist.songs.len()));
        item.child_count = Some(playlist.songs.len());
        item
    }

    /// Item for any entity, songs being addressed without parent
    pub fn music(music: &Music) -> Self {
        match music {
            Music::Song(song) => Self::song(song, None),
            Music::Album(album) => Self::album(album),
            Music::Artist(artist) => Self::artist(artist),
            Music::Genre(genre) => Self::genre(genre),
            Music::Playlist(playlist) => Self::playlist(playlist),
        }
    }
}

fn join_names(names: &[String]) -> Option<String> {
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmolibrary::MusicKind;
    use std::sync::Arc;

    #[test]
    fn test_category_item() {
        let item = MediaItem::category(Category::Albums);

        assert_eq!(item.media_id, "category:albums");
        assert_eq!(item.media_type, MediaType::FolderAlbums);
        assert!(item.browsable);
        assert!(!item.playable);
    }

    #[test]
    fn test_song_without_parent_is_single() {
        let song = Song::new("Intro");
        let item = MediaItem::song(&song, None);

        assert_eq!(item.address(), Some(Address::Single(song.uid)));
        assert!(item.playable);
        assert!(!item.browsable);
    }

    #[test]
    fn test_song_with_parent_is_joined() {
        let mut song = Song::new("Intro");
        song.artists = vec!["A".to_string(), "B".to_string()];
        let parent = MusicUid::new(MusicKind::Album);
        let item = MediaItem::song(&song, Some(parent));

        assert_eq!(
            item.address(),
            Some(Address::Joined {
                parent,
                child: song.uid
            })
        );
        assert_eq!(item.subtitle.as_deref(), Some("A, B"));
    }

    #[test]
    fn test_album_item_counts_songs() {
        let songs = vec![Arc::new(Song::new("1")), Arc::new(Song::new("2"))];
        let album = Album::new("First", songs);
        let item = MediaItem::album(&album);

        assert_eq!(item.child_count, Some(2));
        assert_eq!(item.media_type, MediaType::Album);
        assert!(item.browsable && item.playable);
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let json = serde_json::to_value(MediaItem::category(Category::Songs)).unwrap();

        assert_eq!(json["media_type"], "folder_songs");
        assert!(json.get("subtitle").is_none());
        assert!(json.get("artwork_uri").is_none());
    }
}
