use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::registry::{AppId, PageId, Registry};

use super::app_nav::AppNavigator;
use super::bridge::{NavigationBridge, PopEvent, Subscription};
use super::history::HistoryStateCodec;
use super::record::NavRecord;
use super::store::PersistenceStore;

/// Owner of the active page, scoped to the active application. Re-derives
/// its state from scratch every time the application changes, so a page id
/// set under one application never leaks as current under another.
pub struct PageNavigator<C> {
    app_nav: AppNavigator<C>,
    registry: Rc<Registry<C>>,
    codec: HistoryStateCodec,
    store: PersistenceStore,
    current: Rc<RefCell<PageId>>,
    scoped_app: Rc<Cell<AppId>>,
    _subscription: Subscription,
}

impl<C: 'static> PageNavigator<C> {
    pub fn new(
        registry: Rc<Registry<C>>,
        codec: HistoryStateCodec,
        store: PersistenceStore,
        bridge: &NavigationBridge,
    ) -> Self {
        // The application navigator subscribes first, so our listener always
        // observes the already-adopted application id.
        let app_nav = AppNavigator::new(Rc::clone(&registry), codec.clone(), store.clone(), bridge);
        let app = app_nav.current_app();

        let current = Rc::new(RefCell::new(registry.default_page(app)));
        let scoped_app = Rc::new(Cell::new(app));
        rescope(&registry, &codec, &store, &current, &scoped_app, app);

        let subscription = bridge.subscribe({
            let registry = Rc::clone(&registry);
            let codec = codec.clone();
            let store = store.clone();
            let current = Rc::clone(&current);
            let scoped_app = Rc::clone(&scoped_app);
            let app_current = app_nav.current_handle();
            move |event: &PopEvent| {
                let app_now = app_current.get();
                if app_now != scoped_app.get() {
                    // The traversal switched applications; derive fresh
                    // state for the one we landed on.
                    rescope(&registry, &codec, &store, &current, &scoped_app, app_now);
                    return;
                }

                // Same application: adopt the frame's entry if it has one.
                // A frame without an entry predates any page navigation and
                // implies the value already shown; keep state rather than
                // consulting durable storage.
                let record = NavRecord::decode(event.state.as_ref());
                if let Some(page) = record.page_for(app_now)
                    && *current.borrow() != *page
                {
                    log::debug!("history event adopts page \"{page}\"");
                    *current.borrow_mut() = page.clone();
                }
            }
        });

        Self {
            app_nav,
            registry,
            codec,
            store,
            current,
            scoped_app,
            _subscription: subscription,
        }
    }

    pub fn current_app(&self) -> AppId {
        self.app_nav.current_app()
    }

    pub fn current_page(&self) -> PageId {
        self.current.borrow().clone()
    }

    /// Switches the active application and re-scopes page state for it.
    pub fn navigate_app(&self, next: AppId) {
        let before = self.app_nav.current_app();
        self.app_nav.navigate(next);
        let now = self.app_nav.current_app();
        if now != before {
            rescope(
                &self.registry,
                &self.codec,
                &self.store,
                &self.current,
                &self.scoped_app,
                now,
            );
        }
    }

    /// `None` means the application's designated default page. Equal targets
    /// are ignored; a real transition issues a replace-type write only.
    pub fn navigate_page(&self, next: Option<PageId>) {
        let app = self.app_nav.current_app();
        let next = next.unwrap_or_else(|| self.registry.default_page(app));
        if *self.current.borrow() == next {
            return;
        }

        *self.current.borrow_mut() = next.clone();
        self.store.save_page(app, &next);
        self.codec.replace(NavRecord::with_page(app, next));
    }

    pub fn current_screen(&self) -> &C {
        let page = self.current.borrow();
        self.registry.resolve(self.app_nav.current_app(), &page)
    }

    pub fn registry(&self) -> &Rc<Registry<C>> {
        &self.registry
    }

    pub fn app_navigator(&self) -> &AppNavigator<C> {
        &self.app_nav
    }
}

// Resolution order: history frame entry, then the durable page map, then the
// application's default page. A frame without an entry for `app` gets the
// resolved page written back in place.
fn rescope<C>(
    registry: &Registry<C>,
    codec: &HistoryStateCodec,
    store: &PersistenceStore,
    current: &Rc<RefCell<PageId>>,
    scoped_app: &Rc<Cell<AppId>>,
    app: AppId,
) {
    let record = codec.read();
    let page = record
        .page_for(app)
        .cloned()
        .or_else(|| store.load_page(app))
        .unwrap_or_else(|| registry.default_page(app));

    scoped_app.set(app);
    *current.borrow_mut() = page.clone();

    if record.page_for(app).is_none() {
        codec.replace(NavRecord::with_page(app, page));
    }
}
