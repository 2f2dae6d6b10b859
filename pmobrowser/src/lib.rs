//! # PMOBrowser
//!
//! Browsing and search service over a PMOMusic library.
//!
//! Clients navigate the library as a tree of [`MediaItem`]s identified by
//! address strings, list children page by page, and run text searches whose
//! results are cached and shared between concurrent callers.
//!
//! ## Addresses
//!
//! | Address | Wire form | Meaning |
//! |---------|-----------|---------|
//! | `Category` | `category:albums` | Synthetic folder |
//! | `Single` | `item:album:<uuid>` | An entity |
//! | `Joined` | `item:album:<uuid>>song:<uuid>` | A song reached through a parent |
//!
//! ## Usage
//!
//! ```
//! use pmobrowser::MediaItemBrowser;
//! use pmolibrary::{Album, DeviceLibrary, MusicRepository, NameSearchEngine, Song, UserLibrary};
//! use std::sync::Arc;
//!
//! let repository = Arc::new(MusicRepository::new());
//! let song = Arc::new(Song::new("Intro"));
//! let album = Arc::new(Album::new("First", vec![song.clone()]));
//! repository.set_libraries(
//!     DeviceLibrary::new(vec![song], vec![album.clone()], vec![], vec![]),
//!     UserLibrary::default(),
//! );
//!
//! let browser = MediaItemBrowser::new(repository, Arc::new(NameSearchEngine::new()));
//! let albums = browser.get_children("category:albums", 0, 10).unwrap();
//! assert_eq!(albums[0].title, "First");
//!
//! let songs = browser.get_children(&albums[0].media_id, 0, 10).unwrap();
//! assert!(songs[0].media_id.contains('>'));
//! ```

pub mod address;
pub mod browser;
pub mod item;
pub mod paginate;
pub mod search;
pub mod settings;
pub mod tree;

#[cfg(feature = "pmoconfig")]
pub mod config_ext;

pub use address::{Address, AddressError, Category};
pub use browser::{Invalidator, MediaItemBrowser};
pub use item::{MediaItem, MediaType};
pub use paginate::{PAGE_ALL, paginate};
pub use search::{SearchCache, SearchError, SearchResult};
pub use settings::{BrowserSettings, DEFAULT_PAGE_SIZE};
pub use tree::TreeResolver;

#[cfg(feature = "pmoconfig")]
pub use config_ext::BrowserConfigExt;
