use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(pub u32);

impl AppId {
    /// Anything that is not a plain non-negative integer reads as absent.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u32>().ok().map(Self)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PageId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for PageId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub struct AppEntry<C> {
    title: String,
    default_page: PageId,
    pages: Vec<(PageId, C)>,
}

impl<C> AppEntry<C> {
    pub fn new(title: impl Into<String>, default_page: impl Into<PageId>) -> Self {
        Self {
            title: title.into(),
            default_page: default_page.into(),
            pages: Vec::new(),
        }
    }

    pub fn with_page(mut self, id: impl Into<PageId>, component: C) -> Self {
        self.pages.push((id.into(), component));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn default_page(&self) -> &PageId {
        &self.default_page
    }

    pub fn page(&self, id: &PageId) -> Option<&C> {
        self.pages
            .iter()
            .find(|(page_id, _)| page_id == id)
            .map(|(_, component)| component)
    }

    pub fn pages(&self) -> impl Iterator<Item = &PageId> {
        self.pages.iter().map(|(id, _)| id)
    }

    // Total only for entries that passed registry validation, which rejects
    // empty page sets and unregistered default pages.
    pub(crate) fn resolve(&self, id: &PageId) -> &C {
        self.page(id)
            .or_else(|| self.page(&self.default_page))
            .unwrap_or(&self.pages[0].1)
    }
}

/// Static ordered application catalogue, validated at construction.
pub struct Registry<C> {
    default_app: AppId,
    default_index: usize,
    apps: Vec<(AppId, AppEntry<C>)>,
}

impl<C> Registry<C> {
    pub fn new(default_app: AppId, apps: Vec<(AppId, AppEntry<C>)>) -> AppResult<Self> {
        if apps.is_empty() {
            return Err(AppError::registry("catalogue must list at least one application"));
        }

        let mut default_index = None;
        for (index, (id, entry)) in apps.iter().enumerate() {
            if apps[..index].iter().any(|(seen, _)| seen == id) {
                return Err(AppError::registry(format!("duplicate application id {id}")));
            }
            if entry.pages.is_empty() {
                return Err(AppError::registry(format!(
                    "application {id} registers no pages"
                )));
            }
            for (page_index, (page_id, _)) in entry.pages.iter().enumerate() {
                if entry.pages[..page_index]
                    .iter()
                    .any(|(seen, _)| seen == page_id)
                {
                    return Err(AppError::registry(format!(
                        "application {id} registers page \"{page_id}\" twice"
                    )));
                }
            }
            if entry.page(&entry.default_page).is_none() {
                return Err(AppError::registry(format!(
                    "application {id} designates unregistered default page \"{}\"",
                    entry.default_page
                )));
            }
            if *id == default_app {
                default_index = Some(index);
            }
        }

        let Some(default_index) = default_index else {
            return Err(AppError::registry(format!(
                "default application {default_app} is not registered"
            )));
        };

        Ok(Self {
            default_app,
            default_index,
            apps,
        })
    }

    pub fn default_app(&self) -> AppId {
        self.default_app
    }

    pub fn contains(&self, id: AppId) -> bool {
        self.apps.iter().any(|(app_id, _)| *app_id == id)
    }

    pub fn entry(&self, id: AppId) -> Option<&AppEntry<C>> {
        self.apps
            .iter()
            .find(|(app_id, _)| *app_id == id)
            .map(|(_, entry)| entry)
    }

    pub fn apps(&self) -> impl Iterator<Item = (AppId, &AppEntry<C>)> {
        self.apps.iter().map(|(id, entry)| (*id, entry))
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Unknown ids substitute the default application's default page.
    pub fn default_page(&self, id: AppId) -> PageId {
        self.entry(id)
            .unwrap_or(&self.apps[self.default_index].1)
            .default_page
            .clone()
    }

    /// Component for (`app`, `page`) with silent fallback at both levels.
    pub fn resolve(&self, app: AppId, page: &PageId) -> &C {
        self.entry(app)
            .unwrap_or(&self.apps[self.default_index].1)
            .resolve(page)
    }
}
