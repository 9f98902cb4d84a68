//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events
//! - Score and message display (DOM on web)
//! - Image loading (HtmlImageElement on web)

pub mod headless;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::{PlaceholderLoader, RecordingUi, poll_immediate};
pub use input::PointerInput;
