//! Adresses des nœuds navigables
//!
//! Une [`Address`] est la forme typée des identifiants échangés avec le
//! client. Trois variantes :
//!
//! - `Category` : une collection de premier niveau (`category:songs`)
//! - `Single` : une entité de la bibliothèque (`item:<uid>`)
//! - `Joined` : une entité atteinte depuis un parent précis
//!   (`item:<parent uid>><child uid>`)
//!
//! Le décodage ne lève jamais d'erreur vers le client : une chaîne invalide est
//! traitée comme un objet introuvable.

use pmolibrary::MusicUid;
use std::fmt;
use std::str::FromStr;

/// Prefix of category addresses
pub const CATEGORY_PREFIX: &str = "category";
/// Prefix of entity addresses
pub const ITEM_PREFIX: &str = "item";

const PREFIX_SEPARATOR: char = ':';
/// Never appears in a [`MusicUid`] textual form
const JOIN_SEPARATOR: char = '>';

/// Fixed top-level collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Root,
    Songs,
    Albums,
    Artists,
    Genres,
    Playlists,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Root,
        Category::Songs,
        Category::Albums,
        Category::Artists,
        Category::Genres,
        Category::Playlists,
    ];

    /// Children of the root, in display order
    pub const IMPORTANT: [Category; 5] = [
        Category::Songs,
        Category::Albums,
        Category::Artists,
        Category::Genres,
        Category::Playlists,
    ];

    /// Categories whose content comes from the device library
    pub const DEVICE_MUSIC: [Category; 5] = [
        Category::Root,
        Category::Songs,
        Category::Albums,
        Category::Artists,
        Category::Genres,
    ];

    /// Categories whose content comes from the user library
    pub const USER_MUSIC: [Category; 2] = [Category::Root, Category::Playlists];

    /// Wire name of the category
    pub fn name(&self) -> &'static str {
        match self {
            Category::Root => "root",
            Category::Songs => "songs",
            Category::Albums => "albums",
            Category::Artists => "artists",
            Category::Genres => "genres",
            Category::Playlists => "playlists",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Human readable title
    pub fn title(&self) -> &'static str {
        match self {
            Category::Root => "PMOMusic",
            Category::Songs => "Songs",
            Category::Albums => "Albums",
            Category::Artists => "Artists",
            Category::Genres => "Genres",
            Category::Playlists => "Playlists",
        }
    }
}

/// Reasons an address string could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Empty address")]
    Empty,

    #[error("Address has no prefix: {0}")]
    MissingPrefix(String),

    #[error("Unknown address prefix: {0}")]
    UnknownPrefix(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid UID in address: {0}")]
    InvalidUid(String),
}

/// Typed form of a browsable node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    Category(Category),
    Single(MusicUid),
    Joined { parent: MusicUid, child: MusicUid },
}

impl Address {
    /// Serializes the address to its wire form
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parses a wire address, `None` when it is malformed
    ///
    /// # Examples
    ///
    /// ```
    /// use pmobrowser::{Address, Category};
    ///
    /// assert_eq!(Address::decode("category:albums"), Some(Address::Category(Category::Albums)));
    /// assert_eq!(Address::decode("category:podcasts"), None);
    /// assert_eq!(Address::decode(""), None);
    /// ```
    pub fn decode(s: &str) -> Option<Self> {
        match s.parse() {
            Ok(address) => Some(address),
            Err(err) => {
                tracing::trace!(address = %s, "Undecodable address: {}", err);
                None
            }
        }
    }

    /// Entity the address designates; the child for joined addresses
    pub fn target(&self) -> Option<&MusicUid> {
        match self {
            Address::Category(_) => None,
            Address::Single(uid) => Some(uid),
            Address::Joined { child, .. } => Some(child),
        }
    }

    /// Parent the entity was reached through, for joined addresses
    pub fn parent(&self) -> Option<&MusicUid> {
        match self {
            Address::Joined { parent, .. } => Some(parent),
            _ => None,
        }
    }
}

impl From<Category> for Address {
    fn from(category: Category) -> Self {
        Address::Category(category)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Category(category) => {
                write!(f, "{CATEGORY_PREFIX}{PREFIX_SEPARATOR}{}", category.name())
            }
            Address::Single(uid) => write!(f, "{ITEM_PREFIX}{PREFIX_SEPARATOR}{uid}"),
            Address::Joined { parent, child } => {
                write!(f, "{ITEM_PREFIX}{PREFIX_SEPARATOR}{parent}{JOIN_SEPARATOR}{child}")
            }
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AddressError::Empty);
        }

        let (prefix, body) = s
            .split_once(PREFIX_SEPARATOR)
            .ok_or_else(|| AddressError::MissingPrefix(s.to_string()))?;

        match prefix {
            CATEGORY_PREFIX => Category::from_name(body)
                .map(Address::Category)
                .ok_or_else(|| AddressError::UnknownCategory(body.to_string())),
            ITEM_PREFIX => match body.split_once(JOIN_SEPARATOR) {
                Some((parent, child)) => Ok(Address::Joined {
                    parent: parse_uid(parent)?,
                    child: parse_uid(child)?,
                }),
                None => Ok(Address::Single(parse_uid(body)?)),
            },
            other => Err(AddressError::UnknownPrefix(other.to_string())),
        }
    }
}

fn parse_uid(s: &str) -> Result<MusicUid, AddressError> {
    s.parse()
        .map_err(|_| AddressError::InvalidUid(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmolibrary::MusicKind;

    #[test]
    fn test_category_round_trip() {
        for category in Category::ALL {
            let address = Address::Category(category);
            assert_eq!(Address::decode(&address.encode()), Some(address));
        }
    }

    #[test]
    fn test_single_round_trip() {
        let address = Address::Single(MusicUid::new(MusicKind::Album));
        assert_eq!(Address::decode(&address.encode()), Some(address));
    }

    #[test]
    fn test_joined_round_trip() {
        let address = Address::Joined {
            parent: MusicUid::new(MusicKind::Artist),
            child: MusicUid::new(MusicKind::Song),
        };
        let decoded = Address::decode(&address.encode()).unwrap();

        assert_eq!(decoded, address);
        assert_eq!(decoded.target(), address.target());
        assert_eq!(decoded.parent(), address.parent());
    }

    #[test]
    fn test_wire_forms() {
        assert_eq!(Address::Category(Category::Root).encode(), "category:root");

        let uid: MusicUid = "song:00000000-0000-4000-8000-000000000001".parse().unwrap();
        assert_eq!(
            Address::Single(uid).encode(),
            "item:song:00000000-0000-4000-8000-000000000001"
        );
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!("".parse::<Address>(), Err(AddressError::Empty));
        assert!(matches!(
            "songs".parse::<Address>(),
            Err(AddressError::MissingPrefix(_))
        ));
        assert!(matches!(
            "folder:songs".parse::<Address>(),
            Err(AddressError::UnknownPrefix(p)) if p == "folder"
        ));
        assert!(matches!(
            "category:ROOT".parse::<Address>(),
            Err(AddressError::UnknownCategory(_))
        ));
        assert!(matches!(
            "item:song:garbage".parse::<Address>(),
            Err(AddressError::InvalidUid(_))
        ));
        assert!(matches!(
            "item:>".parse::<Address>(),
            Err(AddressError::InvalidUid(_))
        ));
    }

    #[test]
    fn test_joined_with_malformed_child_is_invalid() {
        let parent = MusicUid::new(MusicKind::Album);
        assert_eq!(Address::decode(&format!("item:{parent}>song:nope")), None);
    }

    #[test]
    fn test_important_excludes_root() {
        assert!(!Category::IMPORTANT.contains(&Category::Root));
        assert_eq!(Category::IMPORTANT.len(), Category::ALL.len() - 1);
    }
}
