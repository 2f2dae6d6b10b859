//! # PMOLibrary
//!
//! In-memory music library for PMOMusic.
//!
//! This crate is the library side of the browsing service: it holds the
//! scanned device library and the user library, resolves entities by their
//! stable [`MusicUid`], notifies listeners when either library is replaced,
//! and provides the [`SearchEngine`] collaborator used by search.
//!
//! ## Features
//!
//! - **Stable identifiers**: `<kind>:<uuid>` UIDs, safe to embed in composite ids.
//! - **Change notifications**: [`LibraryProvider::add_update_listener`] with
//!   [`LibraryChanges`] flags.
//! - **Search**: [`NameSearchEngine`], a case-insensitive name matcher.
//! - **Snapshots**: [`LibrarySnapshot`] loads a library from JSON.
//! - **Configuration**: `pmoconfig` integration (feature `pmoconfig`).
//!
//! ## Usage
//!
//! ```
//! use pmolibrary::{DeviceLibrary, LibraryProvider, MusicRepository, Song, UserLibrary};
//! use std::sync::Arc;
//!
//! let repository = MusicRepository::new();
//! let song = Arc::new(Song::new("Intro"));
//! repository.set_libraries(
//!     DeviceLibrary::new(vec![song.clone()], vec![], vec![], vec![]),
//!     UserLibrary::default(),
//! );
//!
//! assert!(repository.find(&song.uid).is_some());
//! ```

pub mod error;
pub mod library;
pub mod model;
pub mod repository;
pub mod search;
pub mod snapshot;
pub mod uid;

#[cfg(feature = "pmoconfig")]
pub mod config_ext;

pub use error::{Error, Result};
pub use library::{DeviceLibrary, UserLibrary};
pub use model::{Album, Artist, Genre, Music, Playlist, Song};
pub use repository::{LibraryChanges, LibraryProvider, ListenerId, MusicRepository, UpdateListener};
pub use search::{NameSearchEngine, SearchEngine, SearchItems};
pub use snapshot::LibrarySnapshot;
pub use uid::{MusicKind, MusicUid};

#[cfg(feature = "pmoconfig")]
pub use config_ext::LibraryConfigExt;
