mod chrome;
mod keymap;
mod run;
mod screens;
mod session;

pub use keymap::{Command, KeymapPreset, map_key};
pub use run::run;
pub use screens::{Screen, demo_registry};
