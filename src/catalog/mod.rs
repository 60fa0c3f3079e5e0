//! Bookmark categories and their links.
//!
//! Every operation takes `&self` and returns a new [`Catalog`]; when its
//! preconditions are not met it returns an unchanged copy.

pub mod defaults;

use crate::i18n::Rejection;
use crate::id;
use crate::settings::Language;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single bookmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// A titled, ordered group of links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Category {
    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }
}

/// The ordered list of categories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

/// Prefix `https://` unless the URL already has an http(s) scheme
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Move the item at `source` to the index `target` held before the move
fn move_item<T>(items: &mut Vec<T>, source: usize, target: usize) {
    let item = items.remove(source);
    items.insert(target, item);
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The persisted catalog, or the defaults for `language` on first start
    pub fn initial(persisted: Option<Catalog>, language: Language) -> Self {
        match persisted {
            Some(catalog) => catalog,
            None => {
                log::info!("No stored catalog, using {} defaults", language.code());
                defaults::default_catalog(language)
            }
        }
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Check id uniqueness: categories within the catalog, links within
    /// their category. Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let mut category_ids = HashSet::new();
        for category in &self.categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(format!("duplicate category id '{}'", category.id));
            }

            let mut link_ids = HashSet::new();
            for link in &category.links {
                if !link_ids.insert(link.id.as_str()) {
                    return Err(format!(
                        "duplicate link id '{}' in category '{}'",
                        link.id, category.id
                    ));
                }
            }
        }
        Ok(())
    }

    /// Append an empty category, returning the new catalog and its id
    pub fn try_add_category(&self, title: &str) -> Result<(Catalog, String), Rejection> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Rejection::EmptyTitle);
        }

        let category = Category {
            id: id::generate(),
            title: title.to_string(),
            links: Vec::new(),
        };
        let id = category.id.clone();

        let mut next = self.clone();
        next.categories.push(category);
        Ok((next, id))
    }

    pub fn add_category(&self, title: &str) -> Catalog {
        self.try_add_category(title)
            .map(|(catalog, _)| catalog)
            .unwrap_or_else(|reason| {
                log::debug!("Category not added: {:?}", reason);
                self.clone()
            })
    }

    pub fn delete_category(&self, id: &str) -> Catalog {
        let mut next = self.clone();
        next.categories.retain(|c| c.id != id);
        next
    }

    /// Append a link to a category, returning the new catalog and the link id
    pub fn try_add_link(
        &self,
        category_id: &str,
        title: &str,
        url: &str,
    ) -> Result<(Catalog, String), Rejection> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Rejection::EmptyTitle);
        }
        if url.trim().is_empty() {
            return Err(Rejection::EmptyUrl);
        }
        let index = self
            .position(category_id)
            .ok_or(Rejection::UnknownCategory)?;

        let link = Link {
            id: id::generate(),
            title: title.to_string(),
            url: normalize_url(url),
        };
        let id = link.id.clone();

        let mut next = self.clone();
        next.categories[index].links.push(link);
        Ok((next, id))
    }

    pub fn add_link(&self, category_id: &str, title: &str, url: &str) -> Catalog {
        self.try_add_link(category_id, title, url)
            .map(|(catalog, _)| catalog)
            .unwrap_or_else(|reason| {
                log::debug!("Link not added to '{}': {:?}", category_id, reason);
                self.clone()
            })
    }

    pub fn delete_link(&self, category_id: &str, link_id: &str) -> Catalog {
        let mut next = self.clone();
        if let Some(category) = next.categories.iter_mut().find(|c| c.id == category_id) {
            category.links.retain(|l| l.id != link_id);
        }
        next
    }

    /// Rewrite default category titles into `language`; other titles are kept
    pub fn retranslate(&self, language: Language) -> Catalog {
        let mut next = self.clone();
        for category in &mut next.categories {
            if let Some(title) = defaults::translate_title(&category.title, language) {
                if category.title != title {
                    category.title = title.to_string();
                }
            }
        }
        next
    }

    /// Move category `source_id` to the position currently held by `target_id`
    pub fn reorder_categories(&self, source_id: &str, target_id: &str) -> Catalog {
        let mut next = self.clone();
        if source_id == target_id {
            return next;
        }

        let (Some(source), Some(target)) = (self.position(source_id), self.position(target_id))
        else {
            log::debug!("Category reorder ignored: '{}' -> '{}'", source_id, target_id);
            return next;
        };

        move_item(&mut next.categories, source, target);
        next
    }

    /// Move a link within one category, same semantics as
    /// [`Catalog::reorder_categories`]
    pub fn reorder_links(&self, category_id: &str, source_id: &str, target_id: &str) -> Catalog {
        let mut next = self.clone();
        if source_id == target_id {
            return next;
        }

        let Some(category) = next.categories.iter_mut().find(|c| c.id == category_id) else {
            return next;
        };

        let source = category.links.iter().position(|l| l.id == source_id);
        let target = category.links.iter().position(|l| l.id == target_id);
        match (source, target) {
            (Some(source), Some(target)) => move_item(&mut category.links, source, target),
            _ => log::debug!(
                "Link reorder ignored in '{}': '{}' -> '{}'",
                category_id,
                source_id,
                target_id
            ),
        }
        next
    }
}
