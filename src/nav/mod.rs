pub mod app_nav;
pub mod bridge;
pub mod history;
pub mod page_nav;
pub mod record;
pub mod store;

#[cfg(test)]
mod tests;

pub use app_nav::AppNavigator;
pub use bridge::{NavigationBridge, PopEvent, Subscription};
pub use history::{HistorySlot, HistoryStateCodec, SessionHistory, SessionHost};
pub use page_nav::PageNavigator;
pub use record::NavRecord;
pub use store::{
    CURRENT_APP_KEY, CURRENT_PAGES_KEY, FileBackend, MemoryBackend, PersistenceStore,
    StorageBackend, default_state_path,
};
