//! Search engines and search URL building.

use crate::config;
use crate::i18n::Rejection;
use crate::id;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A search engine with a `%s` URL template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEngine {
    pub id: String,
    pub name: String,
    pub search_url: String,
    /// Emoji, inline SVG markup or image URL
    pub icon: String,
}

/// How an engine icon should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineIcon<'a> {
    /// Image URL or data URI
    Image(&'a str),
    /// Inline SVG markup
    Svg(&'a str),
    /// Emoji or other text
    Glyph(&'a str),
}

impl<'a> EngineIcon<'a> {
    pub fn classify(icon: &'a str) -> Self {
        if icon.starts_with("http") || icon.starts_with("data:") {
            EngineIcon::Image(icon)
        } else if icon.trim().starts_with("<svg") {
            EngineIcon::Svg(icon)
        } else {
            EngineIcon::Glyph(icon)
        }
    }
}

impl SearchEngine {
    /// Substitute the first `%s` in the template with the escaped query
    pub fn build_search_url(&self, query: &str) -> String {
        let encoded = urlencoding::encode(query);
        self.search_url.replacen(config::QUERY_PLACEHOLDER, &encoded, 1)
    }

    pub fn icon(&self) -> EngineIcon<'_> {
        EngineIcon::classify(&self.icon)
    }
}

/// Built-in engines: (id, name, url_template, icon)
pub const DEFAULT_SEARCH_ENGINES: &[(&str, &str, &str, &str)] = &[
    ("google", "Google", "https://www.google.com/search?q=%s", "G"),
    ("bing", "Bing", "https://www.bing.com/search?q=%s", "B"),
    ("duckduckgo", "DuckDuckGo", "https://duckduckgo.com/?q=%s", "🦆"),
    ("baidu", "百度", "https://www.baidu.com/s?wd=%s", "🐾"),
];

/// Ordered list of search engines, never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SearchEngine>", into = "Vec<SearchEngine>")]
pub struct EngineCatalog {
    engines: Vec<SearchEngine>,
}

impl From<Vec<SearchEngine>> for EngineCatalog {
    fn from(engines: Vec<SearchEngine>) -> Self {
        Self::new(engines)
    }
}

impl From<EngineCatalog> for Vec<SearchEngine> {
    fn from(catalog: EngineCatalog) -> Self {
        catalog.engines
    }
}

impl Default for EngineCatalog {
    fn default() -> Self {
        Self {
            engines: DEFAULT_SEARCH_ENGINES
                .iter()
                .map(|(id, name, url, icon)| SearchEngine {
                    id: id.to_string(),
                    name: name.to_string(),
                    search_url: url.to_string(),
                    icon: icon.to_string(),
                })
                .collect(),
        }
    }
}

impl EngineCatalog {
    /// Wrap a list; an empty list falls back to the built-in engines
    pub fn new(engines: Vec<SearchEngine>) -> Self {
        if engines.is_empty() {
            log::warn!("Engine list is empty, using built-in engines");
            return Self::default();
        }
        Self { engines }
    }

    /// The persisted engines, or the built-in set
    pub fn initial(persisted: Option<Vec<SearchEngine>>) -> Self {
        persisted.map(Self::new).unwrap_or_default()
    }

    pub fn engines(&self) -> &[SearchEngine] {
        &self.engines
    }

    pub fn get(&self, id: &str) -> Option<&SearchEngine> {
        self.engines.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Check that engine ids are unique
    pub fn validate(&self) -> Result<(), String> {
        let mut ids = HashSet::new();
        for engine in &self.engines {
            if !ids.insert(engine.id.as_str()) {
                return Err(format!("duplicate engine id '{}'", engine.id));
            }
        }
        Ok(())
    }

    /// Append a user engine, returning the new list and the engine id
    pub fn try_add(
        &self,
        name: &str,
        search_url: &str,
        icon: &str,
    ) -> Result<(EngineCatalog, String), Rejection> {
        let name = name.trim();
        let search_url = search_url.trim();
        if name.is_empty() {
            return Err(Rejection::EmptyName);
        }
        if search_url.is_empty() {
            return Err(Rejection::EmptyUrl);
        }
        if !search_url.contains(config::QUERY_PLACEHOLDER) {
            log::warn!("Engine '{}' has no {} placeholder", name, config::QUERY_PLACEHOLDER);
        }

        let icon = match icon.trim() {
            "" => config::DEFAULT_ENGINE_ICON,
            icon => icon,
        };
        let engine = SearchEngine {
            id: format!("{}{}", config::CUSTOM_ENGINE_PREFIX, id::generate()),
            name: name.to_string(),
            search_url: search_url.to_string(),
            icon: icon.to_string(),
        };
        let id = engine.id.clone();

        let mut next = self.clone();
        next.engines.push(engine);
        Ok((next, id))
    }

    pub fn add(&self, name: &str, search_url: &str, icon: &str) -> EngineCatalog {
        self.try_add(name, search_url, icon)
            .map(|(engines, _)| engines)
            .unwrap_or_else(|reason| {
                log::debug!("Engine not added: {:?}", reason);
                self.clone()
            })
    }

    /// Remove an engine. The last remaining engine cannot be removed.
    pub fn delete(&self, id: &str) -> Result<EngineCatalog, Rejection> {
        if self.engines.len() <= 1 {
            return Err(Rejection::LastEngine);
        }
        let mut next = self.clone();
        next.engines.retain(|e| e.id != id);
        if next.engines.is_empty() {
            return Err(Rejection::LastEngine);
        }
        Ok(next)
    }

    /// The engine with `selected_id`, else the first one
    pub fn resolve_selected(&self, selected_id: Option<&str>) -> &SearchEngine {
        selected_id
            .and_then(|id| self.get(id))
            .unwrap_or(&self.engines[0])
    }
}
