pub mod config;
pub mod document;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod pagination;
pub mod storage;
pub mod svg;
pub mod views;

pub use config::{ConfigError, LayoutConfig};
pub use document::{DocumentError, TimelineDocument};
pub use model::{ClearMode, Session};
