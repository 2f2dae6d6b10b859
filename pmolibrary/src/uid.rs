//! Identifiants stables des entités musicales
//!
//! Un [`MusicUid`] combine le type de l'entité et un UUID. Sa forme textuelle
//! est `<kind>:<uuid>` (par exemple `album:67e55044-10b1-426f-9247-bb680e5fe0c8`).
//! Elle ne contient jamais `>` ni `/`, ce qui permet de l'embarquer telle
//! quelle dans des identifiants composés.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of library entity a UID refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MusicKind {
    Song,
    Album,
    Artist,
    Genre,
    Playlist,
}

impl MusicKind {
    /// Returns the lowercase name used in the textual UID form
    pub fn as_str(&self) -> &'static str {
        match self {
            MusicKind::Song => "song",
            MusicKind::Album => "album",
            MusicKind::Artist => "artist",
            MusicKind::Genre => "genre",
            MusicKind::Playlist => "playlist",
        }
    }
}

impl fmt::Display for MusicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MusicKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "song" => Ok(MusicKind::Song),
            "album" => Ok(MusicKind::Album),
            "artist" => Ok(MusicKind::Artist),
            "genre" => Ok(MusicKind::Genre),
            "playlist" => Ok(MusicKind::Playlist),
            other => Err(Error::UnknownKind(other.to_string())),
        }
    }
}

/// Globally unique, stable identifier of a library entity
///
/// # Examples
///
/// ```
/// use pmolibrary::{MusicKind, MusicUid};
///
/// let uid = MusicUid::new(MusicKind::Album);
/// let parsed: MusicUid = uid.to_string().parse().unwrap();
/// assert_eq!(uid, parsed);
/// assert_eq!(parsed.kind(), MusicKind::Album);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MusicUid {
    kind: MusicKind,
    uuid: Uuid,
}

impl MusicUid {
    /// Generates a fresh random UID for the given kind
    pub fn new(kind: MusicKind) -> Self {
        Self {
            kind,
            uuid: Uuid::new_v4(),
        }
    }

    /// Builds a UID from an existing UUID
    pub fn from_uuid(kind: MusicKind, uuid: Uuid) -> Self {
        Self { kind, uuid }
    }

    pub fn kind(&self) -> MusicKind {
        self.kind
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl fmt::Display for MusicUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.uuid.hyphenated())
    }
}

impl FromStr for MusicUid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, uuid) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidUid(s.to_string()))?;
        let kind = kind.parse::<MusicKind>()?;
        let uuid = Uuid::try_parse(uuid).map_err(|_| Error::InvalidUid(s.to_string()))?;
        Ok(Self { kind, uuid })
    }
}

impl Serialize for MusicUid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MusicUid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let uuid = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let uid = MusicUid::from_uuid(MusicKind::Genre, uuid);

        assert_eq!(uid.to_string(), "genre:67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(uid.to_string().parse::<MusicUid>().unwrap(), uid);
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let err = "podcast:67e55044-10b1-426f-9247-bb680e5fe0c8"
            .parse::<MusicUid>()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownKind(k) if k == "podcast"));
    }

    #[test]
    fn test_parse_rejects_malformed_uuid() {
        assert!("song:not-a-uuid".parse::<MusicUid>().is_err());
        assert!("song".parse::<MusicUid>().is_err());
        assert!("".parse::<MusicUid>().is_err());
    }

    #[test]
    fn test_textual_form_has_no_separators() {
        for kind in [
            MusicKind::Song,
            MusicKind::Album,
            MusicKind::Artist,
            MusicKind::Genre,
            MusicKind::Playlist,
        ] {
            let text = MusicUid::new(kind).to_string();
            assert!(!text.contains('>'));
            assert!(!text.contains('/'));
        }
    }

    #[test]
    fn test_serde_as_string() {
        let uid = MusicUid::new(MusicKind::Song);
        let json = serde_json::to_string(&uid).unwrap();
        assert_eq!(json, format!("\"{}\"", uid));
        let back: MusicUid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uid);
    }
}
