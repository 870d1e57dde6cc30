//! Music widget bookkeeping: built-in playlists plus user-added ones persisted in a
//! [`KeyValueStore`] as a JSON array of `{id, name}`.

use crate::error::HostResult;
use crate::storage::KeyValueStore;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const CUSTOM_PLAYLISTS_KEY: &str = "widget-custom-playlists";

const MAX_NAME_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

impl Playlist {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

pub fn default_playlists() -> Vec<Playlist> {
    vec![
        Playlist::new("37i9dQZF1DX5trt9i14X7j", "Coding Mode"),
        Playlist::new("6KTkmUbzqDH9WhwzkxiqbA", "Bollywood Hits"),
        Playlist::new("37i9dQZF1DX0XUfTFmNBRM", "Bollywood Butter"),
        Playlist::new("37i9dQZF1DWZeKCadgRdKQ", "Deep Focus"),
        Playlist::new("37i9dQZF1DX1i3hvzHpcQV", "Punjabi Pop"),
    ]
}

static PLAYLIST_URL_REGEX: OnceLock<Regex> = OnceLock::new();
static PLAYLIST_ID_REGEX: OnceLock<Regex> = OnceLock::new();

/// Accepts a playlist URL (including embed URLs) or a bare 22-character id.
pub fn extract_playlist_id(input: &str) -> Option<String> {
    let url_re = PLAYLIST_URL_REGEX.get_or_init(|| Regex::new(r"playlist/([a-zA-Z0-9]+)").unwrap());
    if let Some(caps) = url_re.captures(input) {
        return Some(caps[1].to_string());
    }
    let id_re = PLAYLIST_ID_REGEX.get_or_init(|| Regex::new(r"^[a-zA-Z0-9]{22}$").unwrap());
    let trimmed = input.trim();
    id_re.is_match(trimmed).then(|| trimmed.to_string())
}

pub fn embed_url(id: &str) -> String {
    format!(
        "https://open.spotify.com/embed/playlist/{}?utm_source=generator&theme=0",
        id
    )
}

pub struct PlaylistBook<K: KeyValueStore> {
    store: K,
    defaults: Vec<Playlist>,
    custom: Vec<Playlist>,
    active: Playlist,
}

impl<K: KeyValueStore> PlaylistBook<K> {
    /// Reads custom playlists once. Unreadable data is treated as none saved.
    pub fn load(store: K) -> Self {
        let custom = match store.get(CUSTOM_PLAYLISTS_KEY) {
            Some(raw) => serde_json::from_str::<Vec<Playlist>>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring unreadable custom playlists");
                Vec::new()
            }),
            None => Vec::new(),
        };
        let defaults = default_playlists();
        let active = defaults[0].clone();
        Self {
            store,
            defaults,
            custom,
            active,
        }
    }

    /// Built-in playlists first, then custom ones in insertion order.
    pub fn all(&self) -> Vec<&Playlist> {
        self.defaults.iter().chain(self.custom.iter()).collect()
    }

    pub fn custom(&self) -> &[Playlist] {
        &self.custom
    }

    pub fn active(&self) -> &Playlist {
        &self.active
    }

    pub fn select(&mut self, id: &str) -> Option<&Playlist> {
        let found = self.all().into_iter().find(|p| p.id == id).cloned()?;
        self.active = found;
        Some(&self.active)
    }

    /// Adds and activates a playlist. Returns `Ok(None)` when no id can be extracted.
    pub fn add(&mut self, input: &str, name: &str) -> HostResult<Option<Playlist>> {
        let Some(id) = extract_playlist_id(input) else {
            return Ok(None);
        };
        let trimmed: String = name.trim().chars().take(MAX_NAME_CHARS).collect();
        let name = if trimmed.is_empty() {
            format!("Playlist {}", self.defaults.len() + self.custom.len() + 1)
        } else {
            trimmed
        };
        let playlist = Playlist { id, name };
        self.custom.push(playlist.clone());
        self.active = playlist.clone();
        self.save()?;
        Ok(Some(playlist))
    }

    /// Removes a custom playlist; the first built-in becomes active if it was active.
    pub fn remove(&mut self, id: &str) -> HostResult<bool> {
        let before = self.custom.len();
        self.custom.retain(|p| p.id != id);
        if self.custom.len() == before {
            return Ok(false);
        }
        if self.active.id == id {
            self.active = self.defaults[0].clone();
        }
        self.save()?;
        Ok(true)
    }

    pub fn into_store(self) -> K {
        self.store
    }

    fn save(&mut self) -> HostResult<()> {
        let json = serde_json::to_string(&self.custom)?;
        self.store.set(CUSTOM_PLAYLISTS_KEY, json)
    }
}
