use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

use crate::error::AppResult;
use crate::nav::bridge::NavigationBridge;
use crate::nav::history::{HistorySlot, HistoryStateCodec, SessionHost};
use crate::nav::page_nav::PageNavigator;
use crate::nav::store::{MemoryBackend, PersistenceStore, StorageBackend};
use crate::registry::{AppEntry, AppId, Registry};

pub fn registry() -> Rc<Registry<&'static str>> {
    Rc::new(
        Registry::new(
            AppId(1),
            vec![
                (
                    AppId(1),
                    AppEntry::new("Accounts", "index")
                        .with_page("index", "accounts-index")
                        .with_page("users", "accounts-users")
                        .with_page("roles", "accounts-roles"),
                ),
                (
                    AppId(2),
                    AppEntry::new("Catalog", "index")
                        .with_page("index", "catalog-index")
                        .with_page("items", "catalog-items"),
                ),
                (
                    AppId(3),
                    AppEntry::new("Reports", "index")
                        .with_page("index", "reports-index")
                        .with_page("export", "reports-export"),
                ),
            ],
        )
        .expect("test catalogue is valid"),
    )
}

/// History slot double that records write counts instead of keeping a stack.
#[derive(Default)]
pub struct CountingSlot {
    state: RefCell<Option<Value>>,
    pub pushes: Cell<usize>,
    pub replaces: Cell<usize>,
}

impl HistorySlot for CountingSlot {
    fn read_state(&self) -> AppResult<Option<Value>> {
        Ok(self.state.borrow().clone())
    }

    fn push_state(&self, state: Value) -> AppResult<()> {
        self.pushes.set(self.pushes.get() + 1);
        *self.state.borrow_mut() = Some(state);
        Ok(())
    }

    fn replace_state(&self, state: Value) -> AppResult<()> {
        self.replaces.set(self.replaces.get() + 1);
        *self.state.borrow_mut() = Some(state);
        Ok(())
    }
}

/// Storage double that logs the key of every write.
#[derive(Default)]
pub struct CountingBackend {
    entries: RefCell<BTreeMap<String, String>>,
    pub writes: RefCell<Vec<String>>,
}

impl CountingBackend {
    pub fn writes_to(&self, key: &str) -> usize {
        self.writes.borrow().iter().filter(|k| *k == key).count()
    }
}

impl StorageBackend for CountingBackend {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.writes.borrow_mut().push(key.to_string());
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

/// Counting doubles wired together, for the write-accounting properties.
pub struct CountingHarness {
    pub slot: Rc<CountingSlot>,
    pub backend: Rc<CountingBackend>,
    pub codec: HistoryStateCodec,
    pub store: PersistenceStore,
    pub bridge: NavigationBridge,
    pub registry: Rc<Registry<&'static str>>,
}

impl CountingHarness {
    pub fn new() -> Self {
        let slot = Rc::new(CountingSlot::default());
        let backend = Rc::new(CountingBackend::default());
        Self {
            codec: HistoryStateCodec::new(Rc::clone(&slot) as Rc<dyn HistorySlot>),
            store: PersistenceStore::new(Rc::clone(&backend) as Rc<dyn StorageBackend>),
            bridge: NavigationBridge::new(),
            registry: registry(),
            slot,
            backend,
        }
    }

    pub fn navigator(&self) -> PageNavigator<&'static str> {
        PageNavigator::new(
            Rc::clone(&self.registry),
            self.codec.clone(),
            self.store.clone(),
            &self.bridge,
        )
    }
}

/// The real in-process host plus memory-backed durable storage, for the
/// traversal scenarios.
pub struct HostHarness {
    pub bridge: NavigationBridge,
    pub host: SessionHost,
    pub codec: HistoryStateCodec,
    pub backend: Rc<MemoryBackend>,
    pub store: PersistenceStore,
    pub registry: Rc<Registry<&'static str>>,
}

impl HostHarness {
    pub fn new() -> Self {
        let bridge = NavigationBridge::new();
        let host = SessionHost::new(16, bridge.clone());
        let backend = Rc::new(MemoryBackend::new());
        Self {
            codec: HistoryStateCodec::new(Rc::new(host.clone()) as Rc<dyn HistorySlot>),
            store: PersistenceStore::new(Rc::clone(&backend) as Rc<dyn StorageBackend>),
            bridge,
            host,
            backend,
            registry: registry(),
        }
    }

    pub fn navigator(&self) -> PageNavigator<&'static str> {
        PageNavigator::new(
            Rc::clone(&self.registry),
            self.codec.clone(),
            self.store.clone(),
            &self.bridge,
        )
    }
}
