//! Flower image catalog and the image loading seam
//!
//! The catalog is injected into the body factory; nothing here is global.

use std::collections::HashSet;
use std::future::Future;

use rand::Rng;
use serde::Serialize;

use crate::GameError;

/// Index into an asset catalog
pub type ImageId = usize;

/// Display metadata for one flower image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlowerInfo {
    /// File name under the flower-cuts directory
    pub file: &'static str,
    pub name: &'static str,
    pub bloom_period: &'static str,
    pub growing_conditions: &'static str,
}

/// Source of sprite images
pub trait AssetCatalog {
    /// Total number of distinct images
    fn count(&self) -> usize;

    /// Loadable URL for an image
    fn resolve(&self, id: ImageId) -> Result<String, GameError>;

    /// Uniformly random image not in `excluding`
    fn random_id<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        excluding: &HashSet<ImageId>,
    ) -> Option<ImageId> {
        let candidates: Vec<ImageId> = (0..self.count())
            .filter(|id| !excluding.contains(id))
            .collect();
        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.random_range(0..candidates.len())])
        }
    }
}

/// Decoded RGBA8 image ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteImage {
    pub image: ImageId,
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

impl SpriteImage {
    /// Width / height (1.0 for empty images)
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Solid-color image, used for placeholders and headless runs
    pub fn solid(image: ImageId, width: u32, height: u32, color: [u8; 4]) -> Self {
        let rgba = color
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self {
            image,
            width,
            height,
            rgba,
        }
    }
}

/// Asynchronous image loading
///
/// `request` must begin loading immediately so that several requests made
/// before any is awaited load concurrently.
pub trait ImageLoader {
    type Pending: Future<Output = Result<SpriteImage, GameError>>;

    fn request(&self, image: ImageId, url: &str) -> Self::Pending;
}

/// Flowers shipped with the game
pub const FLOWERS: &[FlowerInfo] = &[
    FlowerInfo {
        file: "P1.png",
        name: "Asiatic Lily",
        bloom_period: "Summer",
        growing_conditions: "Full sun to partial shade, well-drained rich soil",
    },
    FlowerInfo {
        file: "3_2.png",
        name: "Bougainvillea",
        bloom_period: "Year-round in warm climates",
        growing_conditions: "Full sun, drought tolerant, warm temperatures",
    },
    FlowerInfo {
        file: "4.png",
        name: "Tulip",
        bloom_period: "Spring",
        growing_conditions: "Full sun, well-drained soil, cold winter dormancy",
    },
    FlowerInfo {
        file: "R3.png",
        name: "Anemone",
        bloom_period: "Spring/Fall",
        growing_conditions: "Full to partial sun, moist well-drained soil",
    },
    FlowerInfo {
        file: "P2.png",
        name: "Cyclamen",
        bloom_period: "Winter-Spring",
        growing_conditions: "Partial shade, well-drained soil, cool temperatures",
    },
    FlowerInfo {
        file: "R2.png",
        name: "Poppy",
        bloom_period: "Spring-Summer",
        growing_conditions: "Full sun, well-drained soil, drought tolerant once established",
    },
    FlowerInfo {
        file: "Y1.png",
        name: "Tulip",
        bloom_period: "Late Spring",
        growing_conditions: "Full sun, well-drained soil, cold winter dormancy",
    },
    FlowerInfo {
        file: "W9.png",
        name: "Blue Star",
        bloom_period: "Spring",
        growing_conditions: "Full to partial sun, well-drained soil",
    },
    FlowerInfo {
        file: "10.png",
        name: "Daffodil stem end",
        bloom_period: "Spring",
        growing_conditions: "Full to partial sun, well-drained soil",
    },
    FlowerInfo {
        file: "11.png",
        name: "Camellia",
        bloom_period: "Winter-Spring",
        growing_conditions: "Partial shade, acidic soil, protection from harsh sun",
    },
    FlowerInfo {
        file: "12.png",
        name: "Dogwood",
        bloom_period: "Spring",
        growing_conditions: "Partial shade, moist well-drained soil",
    },
    FlowerInfo {
        file: "Y2.png",
        name: "Tulip",
        bloom_period: "Spring",
        growing_conditions: "Full sun, well-drained soil, cold winter dormancy",
    },
    FlowerInfo {
        file: "15.png",
        name: "Hyacinth",
        bloom_period: "Early Spring",
        growing_conditions: "Full sun, well-drained soil, cold winter required",
    },
    FlowerInfo {
        file: "16.png",
        name: "Lilac",
        bloom_period: "Spring",
        growing_conditions: "Full sun, well-drained alkaline soil",
    },
    FlowerInfo {
        file: "18.png",
        name: "Hyacinth",
        bloom_period: "Early Spring",
        growing_conditions: "Full sun, well-drained soil, cold winter required",
    },
    FlowerInfo {
        file: "19.png",
        name: "Cherry Blossom",
        bloom_period: "Spring",
        growing_conditions: "Full sun, well-drained soil",
    },
    FlowerInfo {
        file: "Y8.png",
        name: "Yellow Tulip",
        bloom_period: "Spring",
        growing_conditions: "Full sun, well-drained soil, requires cold dormancy period",
    },
    FlowerInfo {
        file: "Y9.png",
        name: "Double Tulip",
        bloom_period: "Mid-Late Spring",
        growing_conditions: "Full sun, well-drained soil, requires cold winter, plant bulbs in fall",
    },
    FlowerInfo {
        file: "W4.png",
        name: "Bearded Iris",
        bloom_period: "Late Spring-Early Summer",
        growing_conditions: "Full sun, well-drained soil, rhizomes planted shallowly",
    },
    FlowerInfo {
        file: "25.png",
        name: "Camellia",
        bloom_period: "Winter-Early Spring",
        growing_conditions: "Partial shade, acidic soil, sheltered from harsh sun and wind",
    },
    FlowerInfo {
        file: "W3.png",
        name: "White Camellia",
        bloom_period: "Winter-Early Spring",
        growing_conditions: "Partial shade, acidic soil, protection from harsh conditions",
    },
    FlowerInfo {
        file: "27.png",
        name: "Japanese Quince",
        bloom_period: "Early Spring",
        growing_conditions: "Full sun to partial shade, adaptable to various soil types",
    },
    FlowerInfo {
        file: "W5.png",
        name: "Dandelion Seed Head",
        bloom_period: "Spring-Fall",
        growing_conditions: "Highly adaptable, grows in most conditions, considered a weed",
    },
    FlowerInfo {
        file: "29.png",
        name: "Trumpet Flower",
        bloom_period: "Summer-Fall",
        growing_conditions: "Full sun, fertile well-drained soil, protection from frost",
    },
    FlowerInfo {
        file: "30.png",
        name: "Star Magnolia",
        bloom_period: "Early Spring",
        growing_conditions: "Full sun to partial shade, rich moist acidic soil",
    },
    FlowerInfo {
        file: "31.png",
        name: "Magnolia",
        bloom_period: "Early Spring",
        growing_conditions: "Full sun to partial shade, rich moist acidic soil",
    },
    FlowerInfo {
        file: "33.png",
        name: "Lotus",
        bloom_period: "Summer",
        growing_conditions: "Full sun, aquatic plant grown in water/mud, tropical to warm temperate",
    },
    FlowerInfo {
        file: "W6.png",
        name: "White Hydrangea",
        bloom_period: "Summer-Fall",
        growing_conditions: "Morning sun/afternoon shade, moist rich well-drained soil",
    },
    FlowerInfo {
        file: "R1.png",
        name: "Pansy",
        bloom_period: "Spring, Fall (cool seasons)",
        growing_conditions: "Partial sun, rich moist well-drained soil, regular watering",
    },
    FlowerInfo {
        file: "9.png",
        name: "Hyacinth",
        bloom_period: "Early-Mid Spring",
        growing_conditions: "Full sun to partial shade, well-drained soil, planted bulbs need cold winter",
    },
];

/// Built-in flower catalog served from `{base_url}/assets/flower-cuts/`
#[derive(Debug, Clone)]
pub struct FlowerCatalog {
    base_url: String,
    flowers: &'static [FlowerInfo],
}

impl FlowerCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_flowers(base_url, FLOWERS)
    }

    pub fn with_flowers(base_url: impl Into<String>, flowers: &'static [FlowerInfo]) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, flowers }
    }

    pub fn info(&self, id: ImageId) -> Option<&FlowerInfo> {
        self.flowers.get(id)
    }

    /// Look up an image by file name (with or without directories)
    pub fn find_by_file(&self, path: &str) -> Option<ImageId> {
        let file = path.rsplit('/').next().unwrap_or(path);
        self.flowers.iter().position(|f| f.file == file)
    }

    /// Pick a random target flower
    pub fn random_target<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(ImageId, &FlowerInfo)> {
        let id = self.random_id(rng, &HashSet::new())?;
        self.flowers.get(id).map(|info| (id, info))
    }
}

impl AssetCatalog for FlowerCatalog {
    fn count(&self) -> usize {
        self.flowers.len()
    }

    fn resolve(&self, id: ImageId) -> Result<String, GameError> {
        self.flowers
            .get(id)
            .map(|f| format!("{}/assets/flower-cuts/{}", self.base_url, f.file))
            .ok_or_else(|| {
                GameError::Config(format!(
                    "image index {id} out of range (catalog has {})",
                    self.flowers.len()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_catalog_files_unique() {
        let files: HashSet<_> = FLOWERS.iter().map(|f| f.file).collect();
        assert_eq!(files.len(), FLOWERS.len());
    }

    #[test]
    fn test_resolve() {
        let catalog = FlowerCatalog::new("https://example.test/");
        assert_eq!(
            catalog.resolve(2).unwrap(),
            "https://example.test/assets/flower-cuts/4.png"
        );
        assert!(matches!(catalog.resolve(999), Err(GameError::Config(_))));
        assert_eq!(catalog.find_by_file("/src/assets/flower-cuts/4.png"), Some(2));
    }

    #[test]
    fn test_random_id_respects_exclusions() {
        let catalog = FlowerCatalog::new("");
        let mut rng = Pcg32::seed_from_u64(3);
        let excluding: HashSet<ImageId> = (0..catalog.count() - 1).collect();
        for _ in 0..20 {
            assert_eq!(
                catalog.random_id(&mut rng, &excluding),
                Some(catalog.count() - 1)
            );
        }
        let all: HashSet<ImageId> = (0..catalog.count()).collect();
        assert_eq!(catalog.random_id(&mut rng, &all), None);
    }

    #[test]
    fn test_solid_image() {
        let img = SpriteImage::solid(0, 4, 2, [255, 0, 0, 255]);
        assert_eq!(img.rgba.len(), 32);
        assert_eq!(img.aspect(), 2.0);
        assert_eq!(SpriteImage::solid(0, 0, 0, [0; 4]).aspect(), 1.0);
    }
}
