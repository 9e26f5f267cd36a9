use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::{AppError, AppResult};
use crate::registry::{AppId, PageId};

pub const CURRENT_APP_KEY: &str = "nav.current-app";
pub const CURRENT_PAGES_KEY: &str = "nav.current-pages";

/// Durable string key/value storage. Implementations may fail; the
/// `PersistenceStore` wrapper above them degrades every failure to "absent".
pub trait StorageBackend {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

#[derive(Default)]
pub struct MemoryBackend {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Single JSON object file, read-modify-written on every store.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_entries(&self) -> AppResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path).map_err(|source| {
            AppError::io_with_context(
                source,
                format!("failed to read state file: {}", self.path.display()),
            )
        })?;
        serde_json::from_str(&raw).map_err(|source| {
            AppError::invalid_argument(format!(
                "state file {} is not a string map: {source}",
                self.path.display()
            ))
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| {
                AppError::io_with_context(
                    source,
                    format!("failed to create state directory: {}", parent.display()),
                )
            })?;
        }
        let raw = serde_json::to_string(entries).map_err(|source| {
            AppError::invalid_argument(format!("state map failed to serialize: {source}"))
        })?;
        fs::write(&self.path, raw).map_err(|source| {
            AppError::io_with_context(
                source,
                format!("failed to write state file: {}", self.path.display()),
            )
        })
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.read_entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// Fail-soft mirror of the last navigation location. Reads that fail or fail
/// to parse count as absent; writes swallow every error.
#[derive(Clone)]
pub struct PersistenceStore {
    backend: Rc<dyn StorageBackend>,
}

impl PersistenceStore {
    pub fn new(backend: Rc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn load_app(&self) -> Option<AppId> {
        match self.backend.get(CURRENT_APP_KEY) {
            Ok(Some(raw)) => AppId::parse(&raw),
            Ok(None) => None,
            Err(err) => {
                log::debug!("application slot read failed: {err}");
                None
            }
        }
    }

    pub fn save_app(&self, app: AppId) {
        if let Err(err) = self.backend.set(CURRENT_APP_KEY, &app.to_string()) {
            log::debug!("application slot write failed: {err}");
        }
    }

    pub fn load_page(&self, app: AppId) -> Option<PageId> {
        self.page_map().remove(&app.to_string())
    }

    pub fn save_page(&self, app: AppId, page: &PageId) {
        let mut pages = self.page_map();
        pages.insert(app.to_string(), page.clone());
        match serde_json::to_string(&pages) {
            Ok(raw) => {
                if let Err(err) = self.backend.set(CURRENT_PAGES_KEY, &raw) {
                    log::debug!("page map write failed: {err}");
                }
            }
            Err(err) => log::debug!("page map failed to serialize: {err}"),
        }
    }

    pub fn clear(&self) {
        for key in [CURRENT_APP_KEY, CURRENT_PAGES_KEY] {
            if let Err(err) = self.backend.remove(key) {
                log::debug!("state slot {key} removal failed: {err}");
            }
        }
    }

    fn page_map(&self) -> BTreeMap<String, PageId> {
        let raw = match self.backend.get(CURRENT_PAGES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(err) => {
                log::debug!("page map read failed: {err}");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(pages) => pages,
            Err(err) => {
                log::debug!("page map failed to parse: {err}");
                BTreeMap::new()
            }
        }
    }
}

pub fn default_state_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("OPSDECK_STATE_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_STATE_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("opsdeck").join("state.json"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("opsdeck")
                .join("state.json"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("opsdeck").join("state.json"));
    }
    None
}
