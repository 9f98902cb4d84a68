//! Browser host: DOM score/message display and image loading

use std::future::Future;
use std::pin::Pin;

use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlImageElement};

use crate::GameError;
use crate::assets::{FlowerInfo, ImageId, ImageLoader, SpriteImage};
use crate::game::GameUi;

/// Find an element by id, creating a `<div>` under `<body>` if missing
fn element_or_create(document: &Document, id: &str) -> Option<Element> {
    if let Some(el) = document.get_element_by_id(id) {
        return Some(el);
    }
    let el = document.create_element("div").ok()?;
    el.set_id(id);
    document.body()?.append_child(&el).ok()?;
    Some(el)
}

fn show(el: &Element) {
    let _ = el.set_attribute("class", "");
}

fn hide(el: &Element) {
    let _ = el.set_attribute("class", "hidden");
}

/// Score, win and error display written straight into the page
#[derive(Clone)]
pub struct DomUi {
    document: Document,
    score: Option<Element>,
}

impl DomUi {
    pub fn new(document: Document) -> Self {
        let score = element_or_create(&document, "score-display");
        Self { document, score }
    }

    /// Show the flower the player has to find
    pub fn show_target(&self, info: &FlowerInfo, url: &str) {
        let Some(card) = element_or_create(&self.document, "target-card") else {
            return;
        };
        card.set_inner_html(&format!(
            "<img src=\"{url}\" alt=\"{name}\"><h3>{name}</h3>\
             <p>Blooms: {bloom}</p><p>{conditions}</p>",
            name = info.name,
            bloom = info.bloom_period,
            conditions = info.growing_conditions,
        ));
        show(&card);
    }

    pub fn set_loading(&self, loading: bool) {
        if let Some(el) = self.document.get_element_by_id("loading") {
            if loading {
                show(&el);
            } else {
                hide(&el);
            }
        }
    }

    fn overlay(&self, id: &str, text: &str) {
        if let Some(el) = element_or_create(&self.document, id) {
            el.set_text_content(Some(text));
            show(&el);
        }
    }
}

impl GameUi for DomUi {
    fn on_score_tick(&mut self, elapsed_seconds: f32) {
        if let Some(el) = &self.score {
            el.set_text_content(Some(&format!("Time: {elapsed_seconds:.1}s")));
        }
    }

    fn on_miss(&mut self, misses: u32) {
        if let Some(el) = self.document.get_element_by_id("miss-count") {
            el.set_text_content(Some(&misses.to_string()));
        }
    }

    fn on_win(&mut self, elapsed_seconds: f32) {
        self.overlay(
            "win-message",
            &format!("You found the target shape in {elapsed_seconds:.1} seconds!"),
        );
    }

    fn on_init_error(&mut self, message: &str) {
        self.set_loading(false);
        self.overlay(
            "error-message",
            &format!("Failed to initialize game: {message}"),
        );
    }
}

/// Loads images with `HtmlImageElement` and decodes them through a 2D canvas
#[derive(Debug, Clone, Default)]
pub struct WebImageLoader;

type PendingImage = Pin<Box<dyn Future<Output = Result<SpriteImage, GameError>>>>;

impl WebImageLoader {
    /// Create the element and set `src`, which starts the download
    fn begin(url: &str) -> Result<(HtmlImageElement, Promise), GameError> {
        let element = HtmlImageElement::new()
            .map_err(|e| GameError::asset_load(url, format!("{e:?}")))?;
        element.set_cross_origin(Some("anonymous"));
        let loaded = Promise::new(&mut |resolve, reject| {
            element.set_onload(Some(&resolve));
            element.set_onerror(Some(&reject));
        });
        element.set_src(url);
        Ok((element, loaded))
    }

    fn decode(image: ImageId, element: &HtmlImageElement, url: &str) -> Result<SpriteImage, GameError> {
        let fail = |reason: String| GameError::asset_load(url, reason);

        let (width, height) = (element.natural_width(), element.natural_height());
        if width == 0 || height == 0 {
            return Err(fail("image has no size".into()));
        }

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| fail("no document".into()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| fail(format!("{e:?}")))?
            .dyn_into()
            .map_err(|_| fail("not a canvas".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|e| fail(format!("{e:?}")))?
            .ok_or_else(|| fail("no 2d context".into()))?
            .dyn_into()
            .map_err(|_| fail("not a 2d context".into()))?;
        ctx.draw_image_with_html_image_element(element, 0.0, 0.0)
            .map_err(|e| fail(format!("{e:?}")))?;
        let data = ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .map_err(|e| fail(format!("{e:?}")))?;

        Ok(SpriteImage {
            image,
            width,
            height,
            rgba: data.data().0,
        })
    }
}

impl ImageLoader for WebImageLoader {
    type Pending = PendingImage;

    fn request(&self, image: ImageId, url: &str) -> Self::Pending {
        let started = Self::begin(url);
        let url = url.to_string();
        Box::pin(async move {
            let (element, loaded) = started?;
            JsFuture::from(loaded)
                .await
                .map_err(|_| GameError::asset_load(&url, "load failed"))?;
            log::debug!("Loaded {url}");
            Self::decode(image, &element, &url)
        })
    }
}
