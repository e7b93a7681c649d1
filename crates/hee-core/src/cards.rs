// crates/hee-core/src/cards.rs

//! Reference cards: short documents bundled into the binary, optionally
//! extended or shadowed by `<name>.md` files in a user card directory.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::{HeeError, Result};

pub const CARD_USAGE: &str = "hee card <name>";

const BUNDLED: &[(&str, &str)] = &[
    ("evidence", include_str!("../cards/evidence.md")),
    ("principle", include_str!("../cards/principle.md")),
    ("signature", include_str!("../cards/signature.md")),
];

const CARD_EXT: &str = "md";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardSource {
    Bundled,
    File(PathBuf),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub name: String,
    pub body: String,
    pub source: CardSource,
}

/// `[a-z0-9][a-z0-9_-]*`. Rules out path separators and dot segments.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

#[derive(Clone, Debug, Default)]
pub struct CardStore {
    dir: Option<PathBuf>,
}

impl CardStore {
    pub fn bundled_only() -> Self {
        CardStore { dir: None }
    }

    /// A directory that does not exist behaves like an empty one.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        CardStore {
            dir: Some(dir.into()),
        }
    }

    /// Sorted, deduplicated names of every available card.
    pub fn names(&self) -> Result<Vec<String>> {
        let mut names: BTreeSet<String> = BUNDLED.iter().map(|(n, _)| n.to_string()).collect();

        if let Some(dir) = &self.dir {
            let entries = match std::fs::read_dir(dir) {
                Ok(entries) => Some(entries),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => return Err(HeeError::io(dir, e)),
            };
            for entry in entries.into_iter().flatten() {
                let path = entry.map_err(|e| HeeError::io(dir, e))?.path();
                if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(CARD_EXT) {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if is_valid_name(stem) {
                        names.insert(stem.to_string());
                    }
                }
            }
        }

        Ok(names.into_iter().collect())
    }

    pub fn get(&self, name: &str) -> Result<Card> {
        if is_valid_name(name) {
            if let Some(card) = self.get_from_dir(name)? {
                return Ok(card);
            }
            if let Some((n, body)) = BUNDLED.iter().find(|(n, _)| *n == name) {
                return Ok(Card {
                    name: n.to_string(),
                    body: body.to_string(),
                    source: CardSource::Bundled,
                });
            }
        }

        tracing::debug!(card = name, "card not found");
        Err(HeeError::NotFound {
            name: name.to_string(),
            available: self.names()?,
        })
    }

    fn get_from_dir(&self, name: &str) -> Result<Option<Card>> {
        let Some(dir) = &self.dir else {
            return Ok(None);
        };
        let path = dir.join(format!("{name}.{CARD_EXT}"));
        match std::fs::read_to_string(&path) {
            Ok(body) => Ok(Some(Card {
                name: name.to_string(),
                body,
                source: CardSource::File(path),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HeeError::io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_cards_are_listed_sorted() {
        let names = CardStore::bundled_only().names().unwrap();
        assert_eq!(names, vec!["evidence", "principle", "signature"]);
    }

    #[test]
    fn bundled_principle_card_carries_the_principle() {
        let card = CardStore::bundled_only().get("principle").unwrap();
        assert_eq!(card.source, CardSource::Bundled);
        assert!(card.body.contains("small, proven, compounding steps"));
    }

    #[test]
    fn name_validation() {
        assert!(is_valid_name("principle"));
        assert!(is_valid_name("on-call_2"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("-x"));
        assert!(!is_valid_name("../etc/passwd"));
        assert!(!is_valid_name("Principle"));
    }

    #[test]
    fn invalid_names_are_not_found_with_listing() {
        match CardStore::bundled_only().get("../secret") {
            Err(HeeError::NotFound { name, available }) => {
                assert_eq!(name, "../secret");
                assert!(available.contains(&"principle".to_string()));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn missing_dir_is_treated_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CardStore::with_dir(tmp.path().join("absent"));
        assert_eq!(store.names().unwrap().len(), BUNDLED.len());
        assert!(store.get("evidence").is_ok());
    }
}
