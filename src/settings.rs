//! User preferences.
//!
//! Settings are a flat record. Persisted or imported JSON is merged over the
//! defaults one known field at a time through [`SettingChange::from_json`], so
//! unknown keys never reach the in-memory model and a badly typed value only
//! loses that one field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Interface language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    /// Pick a language from a locale string such as `zh_CN.UTF-8` or `en-US`
    pub fn from_locale(locale: &str) -> Self {
        if locale.trim().to_lowercase().starts_with("zh") {
            Language::Zh
        } else {
            Language::En
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

/// How links inside a category are laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Card,
    #[default]
    List,
    Compact,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    #[default]
    Default,
    Color,
    Image,
}

/// All user preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub language: Language,
    pub theme: Theme,
    pub layout_mode: LayoutMode,
    pub show_favicons: bool,
    pub show_shortcuts: bool,
    pub show_footer: bool,
    pub open_search_in_new_tab: bool,
    pub open_links_in_new_tab: bool,
    pub background_mode: BackgroundMode,
    pub background_color_light: String,
    pub background_color_dark: String,
    pub custom_wallpaper: String,
    pub wallpaper_blur: bool,
    pub greeting_name: String,
    /// Soft reference to the selected engine id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_engine: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::En,
            theme: Theme::System,
            layout_mode: LayoutMode::List,
            show_favicons: true,
            show_shortcuts: true,
            show_footer: true,
            open_search_in_new_tab: false,
            open_links_in_new_tab: false,
            background_mode: BackgroundMode::Default,
            background_color_light: String::new(),
            background_color_dark: String::new(),
            custom_wallpaper: String::new(),
            wallpaper_blur: false,
            greeting_name: String::new(),
            search_engine: None,
        }
    }
}

/// A single-field update
#[derive(Debug, Clone, PartialEq)]
pub enum SettingChange {
    Language(Language),
    Theme(Theme),
    LayoutMode(LayoutMode),
    ShowFavicons(bool),
    ShowShortcuts(bool),
    ShowFooter(bool),
    OpenSearchInNewTab(bool),
    OpenLinksInNewTab(bool),
    BackgroundMode(BackgroundMode),
    BackgroundColorLight(String),
    BackgroundColorDark(String),
    CustomWallpaper(String),
    WallpaperBlur(bool),
    GreetingName(String),
    SearchEngine(Option<String>),
}

/// Serialized names of every known field
pub const SETTING_KEYS: &[&str] = &[
    "language",
    "theme",
    "layoutMode",
    "showFavicons",
    "showShortcuts",
    "showFooter",
    "openSearchInNewTab",
    "openLinksInNewTab",
    "backgroundMode",
    "backgroundColorLight",
    "backgroundColorDark",
    "customWallpaper",
    "wallpaperBlur",
    "greetingName",
    "searchEngine",
];

impl SettingChange {
    /// Build a change from a serialized key and JSON value.
    ///
    /// Returns None for unknown keys and for values of the wrong type.
    pub fn from_json(key: &str, value: &Value) -> Option<Self> {
        fn parse<T: serde::de::DeserializeOwned>(key: &str, value: &Value) -> Option<T> {
            match serde_json::from_value(value.clone()) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    log::warn!("Ignoring setting '{}': {}", key, e);
                    None
                }
            }
        }

        let change = match key {
            "language" => SettingChange::Language(parse(key, value)?),
            "theme" => SettingChange::Theme(parse(key, value)?),
            "layoutMode" => SettingChange::LayoutMode(parse(key, value)?),
            "showFavicons" => SettingChange::ShowFavicons(parse(key, value)?),
            "showShortcuts" => SettingChange::ShowShortcuts(parse(key, value)?),
            "showFooter" => SettingChange::ShowFooter(parse(key, value)?),
            "openSearchInNewTab" => SettingChange::OpenSearchInNewTab(parse(key, value)?),
            "openLinksInNewTab" => SettingChange::OpenLinksInNewTab(parse(key, value)?),
            "backgroundMode" => SettingChange::BackgroundMode(parse(key, value)?),
            "backgroundColorLight" => SettingChange::BackgroundColorLight(parse(key, value)?),
            "backgroundColorDark" => SettingChange::BackgroundColorDark(parse(key, value)?),
            "customWallpaper" => SettingChange::CustomWallpaper(parse(key, value)?),
            "wallpaperBlur" => SettingChange::WallpaperBlur(parse(key, value)?),
            "greetingName" => SettingChange::GreetingName(parse(key, value)?),
            "searchEngine" => SettingChange::SearchEngine(parse(key, value)?),
            _ => {
                log::debug!("Ignoring unknown setting '{}'", key);
                return None;
            }
        };

        Some(change)
    }
}

impl Settings {
    /// Defaults with the given interface language
    pub fn for_language(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Settings at start-up.
    ///
    /// `persisted` is the raw stored JSON, if any. Its fields are merged over
    /// defaults whose language comes from `locale_hint`, so a stored language
    /// wins and the hint only fills in when none was stored.
    pub fn initial(persisted: Option<&str>, locale_hint: &str) -> Self {
        let base = Self::for_language(Language::from_locale(locale_hint));

        let Some(raw) = persisted else {
            return base;
        };

        match serde_json::from_str::<Value>(raw) {
            Ok(value) => base.merged(&value),
            Err(e) => {
                log::warn!("Stored settings are malformed, using defaults: {}", e);
                base
            }
        }
    }

    /// Merge a partial record over the defaults
    pub fn import_from(partial: &Value) -> Self {
        Self::default().merged(partial)
    }

    /// Merge every known field of `partial` over `self`.
    /// Anything that is not a JSON object leaves `self` unchanged.
    pub fn merged(&self, partial: &Value) -> Self {
        let Some(fields) = partial.as_object() else {
            log::warn!("Settings record is not an object, ignoring");
            return self.clone();
        };

        fields
            .iter()
            .filter_map(|(key, value)| SettingChange::from_json(key, value))
            .fold(self.clone(), |settings, change| settings.update(change))
    }

    /// Replace one field
    pub fn update(&self, change: SettingChange) -> Self {
        let mut next = self.clone();
        match change {
            SettingChange::Language(v) => next.language = v,
            SettingChange::Theme(v) => next.theme = v,
            SettingChange::LayoutMode(v) => next.layout_mode = v,
            SettingChange::ShowFavicons(v) => next.show_favicons = v,
            SettingChange::ShowShortcuts(v) => next.show_shortcuts = v,
            SettingChange::ShowFooter(v) => next.show_footer = v,
            SettingChange::OpenSearchInNewTab(v) => next.open_search_in_new_tab = v,
            SettingChange::OpenLinksInNewTab(v) => next.open_links_in_new_tab = v,
            SettingChange::BackgroundMode(v) => next.background_mode = v,
            SettingChange::BackgroundColorLight(v) => next.background_color_light = v,
            SettingChange::BackgroundColorDark(v) => next.background_color_dark = v,
            SettingChange::CustomWallpaper(v) => next.custom_wallpaper = v,
            SettingChange::WallpaperBlur(v) => next.wallpaper_blur = v,
            SettingChange::GreetingName(v) => next.greeting_name = v,
            SettingChange::SearchEngine(v) => next.search_engine = v,
        }
        next
    }
}
