//! Key hint overlay: shows the keys that can extend a partially typed key-chord
//! sequence in a transient, column-laid-out panel.
//!
//! The crate owns scheduling and layout. Drawing, text metrics and window geometry
//! belong to the host and are reached through the traits in [`ui::surface`].

pub mod actor;
pub mod common;
pub mod layout_engine;
pub mod model;
pub mod sys;
pub mod ui;

pub use common::config::{ConfigService, KeyHintSettings, PopupPosition, TomlConfig};
pub use layout_engine::LayoutPlan;
pub use model::{Candidate, MappingEntry, SortOption};
pub use ui::scheduler::{DisplayScheduler, Phase};
