use std::cell::Cell;
use std::rc::Rc;

use crate::registry::{AppId, Registry};

use super::bridge::{NavigationBridge, PopEvent, Subscription};
use super::history::HistoryStateCodec;
use super::record::NavRecord;
use super::store::PersistenceStore;

/// Owner of the active application id. Startup resolution order is slot,
/// then store, then catalogue default; the first validated value wins.
pub struct AppNavigator<C> {
    registry: Rc<Registry<C>>,
    codec: HistoryStateCodec,
    store: PersistenceStore,
    current: Rc<Cell<AppId>>,
    _subscription: Subscription,
}

impl<C: 'static> AppNavigator<C> {
    pub fn new(
        registry: Rc<Registry<C>>,
        codec: HistoryStateCodec,
        store: PersistenceStore,
        bridge: &NavigationBridge,
    ) -> Self {
        let embedded = codec.read().app.filter(|id| registry.contains(*id));
        let resolved = embedded
            .or_else(|| store.load_app().filter(|id| registry.contains(*id)))
            .unwrap_or_else(|| registry.default_app());

        // A slot without a valid application id gets the resolved value
        // written back without creating a spurious history entry.
        if embedded.is_none() {
            codec.replace(NavRecord::with_app(resolved));
        }
        store.save_app(resolved);

        let current = Rc::new(Cell::new(resolved));
        let subscription = bridge.subscribe({
            let registry = Rc::clone(&registry);
            let store = store.clone();
            let current = Rc::clone(&current);
            move |event: &PopEvent| {
                let record = NavRecord::decode(event.state.as_ref());
                let next = record
                    .app
                    .filter(|id| registry.contains(*id))
                    .or_else(|| store.load_app().filter(|id| registry.contains(*id)))
                    .unwrap_or_else(|| registry.default_app());
                if next != current.get() {
                    log::debug!("history event adopts application {next}");
                    current.set(next);
                    store.save_app(next);
                }
            }
        });

        Self {
            registry,
            codec,
            store,
            current,
            _subscription: subscription,
        }
    }

    pub fn current_app(&self) -> AppId {
        self.current.get()
    }

    /// Unknown ids and the current id are ignored without any write.
    pub fn navigate(&self, next: AppId) {
        if next == self.current.get() || !self.registry.contains(next) {
            return;
        }

        self.codec.append(NavRecord::with_app(next));
        self.current.set(next);
        self.store.save_app(next);
        log::debug!("application switched to {next}");
    }

    pub fn registry(&self) -> &Rc<Registry<C>> {
        &self.registry
    }

    pub(crate) fn current_handle(&self) -> Rc<Cell<AppId>> {
        Rc::clone(&self.current)
    }
}
