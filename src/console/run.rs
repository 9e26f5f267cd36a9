use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::Frame;

use crate::config::Config;
use crate::error::AppResult;
use crate::nav::{
    HistorySlot, HistoryStateCodec, NavigationBridge, PageNavigator, PersistenceStore, SessionHost,
};
use crate::registry::{PageId, Registry};

use super::chrome::{ChromeView, RailItem, TabItem, draw_chrome, split_layout};
use super::keymap::{Command, KeymapPreset, map_key};
use super::screens::{Screen, demo_registry};
use super::session::TerminalSession;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(200);

pub fn run(config: Config, store: PersistenceStore) -> AppResult<()> {
    let registry = Rc::new(demo_registry()?);
    let bridge = NavigationBridge::new();
    let host = SessionHost::new(config.history.max_entries, bridge.clone());
    let codec = HistoryStateCodec::new(Rc::new(host.clone()) as Rc<dyn HistorySlot>);
    let nav = PageNavigator::new(Rc::clone(&registry), codec, store, &bridge);

    let mut console = Console {
        registry,
        host,
        nav,
        preset: KeymapPreset::parse(&config.keymap.preset),
        selected: 0,
    };
    console.sync_selection();

    let mut session = TerminalSession::enter()?;
    let outcome = console.event_loop(&mut session);
    session.restore()?;
    outcome
}

struct Console {
    registry: Rc<Registry<Screen>>,
    host: SessionHost,
    nav: PageNavigator<Screen>,
    preset: KeymapPreset,
    selected: usize,
}

impl Console {
    fn event_loop(&mut self, session: &mut TerminalSession) -> AppResult<()> {
        loop {
            session.draw(|frame| self.draw(frame))?;

            if !event::poll(INPUT_POLL_TIMEOUT)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                    if let Some(command) = map_key(key, self.preset)
                        && self.apply(command)
                    {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    /// Applies one mapped command; returns true when the console should quit.
    fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::SwitchApp(ordinal) => {
                let target = self
                    .registry
                    .apps()
                    .nth(usize::from(ordinal) - 1)
                    .map(|(id, _)| id);
                if let Some(id) = target {
                    self.nav.navigate_app(id);
                    self.sync_selection();
                }
            }
            Command::RailDown => {
                let count = self.page_count();
                if count > 0 {
                    self.selected = (self.selected + 1).min(count - 1);
                }
            }
            Command::RailUp => {
                self.selected = self.selected.saturating_sub(1);
            }
            Command::OpenSelected => {
                if let Some(page) = self.selected_page() {
                    self.nav.navigate_page(Some(page));
                }
            }
            Command::HistoryBack => {
                if self.host.back() {
                    self.sync_selection();
                }
            }
            Command::HistoryForward => {
                if self.host.forward() {
                    self.sync_selection();
                }
            }
            Command::Quit => return true,
        }
        false
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let layout = split_layout(frame.area());
        let current_app = self.nav.current_app();
        let current_page = self.nav.current_page();

        let tabs = self
            .registry
            .apps()
            .enumerate()
            .map(|(index, (id, entry))| TabItem {
                ordinal: index + 1,
                title: entry.title().to_string(),
                active: id == current_app,
            })
            .collect();

        let rail = match self.registry.entry(current_app) {
            Some(entry) => entry
                .pages()
                .enumerate()
                .map(|(index, page)| RailItem {
                    label: page.to_string(),
                    current: *page == current_page,
                    selected: index == self.selected,
                })
                .collect(),
            None => Vec::new(),
        };

        let status = format!(
            "app {current_app} | page {current_page} | history {}/{} | ^o back  ^i forward  q quit",
            self.host.cursor() + 1,
            self.host.depth(),
        );

        let view = ChromeView {
            tabs,
            rail,
            screen: self.nav.current_screen(),
            status,
        };
        draw_chrome(frame, layout, &view);
    }

    fn page_count(&self) -> usize {
        self.registry
            .entry(self.nav.current_app())
            .map(|entry| entry.pages().count())
            .unwrap_or(0)
    }

    fn selected_page(&self) -> Option<PageId> {
        self.registry
            .entry(self.nav.current_app())?
            .pages()
            .nth(self.selected)
            .cloned()
    }

    fn sync_selection(&mut self) {
        let current_page = self.nav.current_page();
        self.selected = self
            .registry
            .entry(self.nav.current_app())
            .and_then(|entry| entry.pages().position(|page| *page == current_page))
            .unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::nav::{
        HistorySlot, HistoryStateCodec, MemoryBackend, NavigationBridge, PageNavigator,
        PersistenceStore, SessionHost, StorageBackend,
    };
    use crate::registry::{AppId, PageId};

    use super::{Command, Console, KeymapPreset, demo_registry};

    fn console() -> Console {
        let registry = Rc::new(demo_registry().expect("demo catalogue should validate"));
        let bridge = NavigationBridge::new();
        let host = SessionHost::new(16, bridge.clone());
        let codec = HistoryStateCodec::new(Rc::new(host.clone()) as Rc<dyn HistorySlot>);
        let store = PersistenceStore::new(Rc::new(MemoryBackend::new()) as Rc<dyn StorageBackend>);
        let nav = PageNavigator::new(Rc::clone(&registry), codec, store, &bridge);

        let mut console = Console {
            registry,
            host,
            nav,
            preset: KeymapPreset::Default,
            selected: 0,
        };
        console.sync_selection();
        console
    }

    #[test]
    fn switch_app_command_navigates_and_resets_the_rail() {
        let mut console = console();

        assert!(!console.apply(Command::SwitchApp(2)));
        assert_eq!(console.nav.current_app(), AppId(2));
        assert_eq!(console.nav.current_page(), PageId::from("index"));
        assert_eq!(console.selected, 0);

        // Ordinals past the tab row are ignored.
        assert!(!console.apply(Command::SwitchApp(9)));
        assert_eq!(console.nav.current_app(), AppId(2));
    }

    #[test]
    fn rail_and_history_commands_round_trip() {
        let mut console = console();

        console.apply(Command::RailDown);
        assert!(!console.apply(Command::OpenSelected));
        assert_eq!(console.nav.current_page(), PageId::from("users"));

        console.apply(Command::SwitchApp(3));
        assert_eq!(console.nav.current_app(), AppId(3));

        assert!(!console.apply(Command::HistoryBack));
        assert_eq!(console.nav.current_app(), AppId(1));
        assert_eq!(console.nav.current_page(), PageId::from("users"));
        assert_eq!(console.selected, 1);

        assert!(console.apply(Command::Quit));
    }
}
