//! Host pieces for running a round without a browser
//!
//! Used by the native demo binary and by tests.

use std::future::{Future, Ready, ready};
use std::pin::pin;
use std::task::{Context, Poll, Waker};

use crate::GameError;
use crate::assets::{ImageId, ImageLoader, SpriteImage};
use crate::game::GameUi;

/// Poll a future once; `Some` if it completed without suspending
pub fn poll_immediate<F: Future>(future: F) -> Option<F::Output> {
    let mut future = pin!(future);
    let mut cx = Context::from_waker(Waker::noop());
    match future.as_mut().poll(&mut cx) {
        Poll::Ready(output) => Some(output),
        Poll::Pending => None,
    }
}

/// Loader that produces solid-color stand-ins instantly
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderLoader {
    pub width: u32,
    pub height: u32,
}

impl Default for PlaceholderLoader {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
        }
    }
}

impl ImageLoader for PlaceholderLoader {
    type Pending = Ready<Result<SpriteImage, GameError>>;

    fn request(&self, image: ImageId, url: &str) -> Self::Pending {
        log::trace!("Placeholder for {url}");
        // Distinct, stable color per image
        let hue = (image as u32).wrapping_mul(2_654_435_761);
        let color = [(hue >> 24) as u8, (hue >> 16) as u8, (hue >> 8) as u8, 255];
        ready(Ok(SpriteImage::solid(image, self.width, self.height, color)))
    }
}

/// UI that logs and remembers every callback
#[derive(Debug, Default, Clone)]
pub struct RecordingUi {
    pub ticks: Vec<f32>,
    pub misses: Vec<u32>,
    pub wins: Vec<f32>,
    pub errors: Vec<String>,
}

impl GameUi for RecordingUi {
    fn on_score_tick(&mut self, elapsed_seconds: f32) {
        self.ticks.push(elapsed_seconds);
    }

    fn on_miss(&mut self, misses: u32) {
        log::info!("Wrong clicks: {misses}");
        self.misses.push(misses);
    }

    fn on_win(&mut self, elapsed_seconds: f32) {
        log::info!("You found the target shape in {elapsed_seconds:.1} seconds!");
        self.wins.push(elapsed_seconds);
    }

    fn on_init_error(&mut self, message: &str) {
        log::error!("Failed to initialize game: {message}");
        self.errors.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_loader_resolves_immediately() {
        let loader = PlaceholderLoader::default();
        let image = poll_immediate(loader.request(4, "/assets/flower-cuts/P2.png"))
            .unwrap()
            .unwrap();
        assert_eq!(image.image, 4);
        assert_eq!((image.width, image.height), (64, 64));
        assert_eq!(image.rgba.len(), 64 * 64 * 4);
    }

    #[test]
    fn test_poll_immediate_pending() {
        assert_eq!(poll_immediate(std::future::pending::<()>()), None);
    }
}
