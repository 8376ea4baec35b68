use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rand::Rng;
use rand::seq::IteratorRandom;
use rust_embed::Embed;
use serde::Deserialize;

use crate::error::{QuizError, Result};

#[derive(Embed)]
#[folder = "assets/vocab/"]
struct VocabAssets;

/// One symbol and the answer expected for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub key: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
struct VocabFile {
    #[serde(default)]
    name: Option<String>,
    items: BTreeMap<String, String>,
}

/// An immutable symbol -> answer mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabulary {
    name: String,
    items: BTreeMap<String, String>,
}

impl Vocabulary {
    pub fn new(name: impl Into<String>, items: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    pub fn from_toml_str(fallback_name: &str, content: &str) -> Result<Self> {
        let file: VocabFile =
            toml::from_str(content).map_err(|source| QuizError::VocabularyParse {
                name: fallback_name.to_string(),
                source,
            })?;
        let name = file.name.unwrap_or_else(|| fallback_name.to_string());
        Ok(Self::new(name, file.items))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| QuizError::VocabularyRead {
            path: path.to_path_buf(),
            source,
        })?;
        let fallback = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_toml_str(&fallback, &content)
    }

    pub fn builtin(name: &str) -> Result<Self> {
        let file = VocabAssets::get(&format!("{name}.toml"))
            .ok_or_else(|| QuizError::UnknownVocabulary(name.to_string()))?;
        let content = String::from_utf8_lossy(file.data.as_ref());
        Self::from_toml_str(name, &content)
    }

    pub fn builtin_names() -> Vec<String> {
        let mut names: Vec<String> = VocabAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }

    /// Union of all sets; a later set wins when two sets share a key.
    pub fn merge<I>(sets: I) -> Self
    where
        I: IntoIterator<Item = Vocabulary>,
    {
        let mut names = Vec::new();
        let mut items = BTreeMap::new();
        for set in sets {
            names.push(set.name);
            items.extend(set.items);
        }
        Self::new(names.join("+"), items)
    }

    /// Keep a random subset of `count` items. A count of zero, or one that
    /// covers the whole set, leaves the vocabulary unchanged.
    pub fn limit<R: Rng + ?Sized>(self, count: usize, rng: &mut R) -> Self {
        if count == 0 || count >= self.items.len() {
            return self;
        }
        let items = self
            .items
            .into_iter()
            .choose_multiple(rng, count)
            .into_iter()
            .collect();
        Self::new(self.name, items)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn answer(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn item(&self, key: &str) -> Option<Item> {
        self.items.get_key_value(key).map(|(k, v)| Item {
            key: k.clone(),
            answer: v.clone(),
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
