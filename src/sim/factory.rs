//! Body factory: image rotation, spawn position, scale and velocity
//!
//! Creation is split in two so images can load asynchronously:
//! `plan` draws every random value in request order, `finish` applies the
//! loaded image's aspect ratio once it arrives.

use std::collections::HashSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{Arena, Body, BodyId, NO_TINT};
use crate::GameError;
use crate::assets::{AssetCatalog, ImageId, SpriteImage};
use crate::consts::*;

/// Round-robin-without-replacement over the catalog.
///
/// No decoy image repeats until every image has been used once; the
/// target's image is permanently reserved.
#[derive(Debug, Clone)]
pub struct ImageRotation {
    target: ImageId,
    used: HashSet<ImageId>,
}

impl ImageRotation {
    pub fn new(target: ImageId) -> Self {
        let mut used = HashSet::new();
        used.insert(target);
        Self { target, used }
    }

    /// Pick the next decoy image
    pub fn next<C, R>(&mut self, catalog: &C, rng: &mut R) -> Result<ImageId, GameError>
    where
        C: AssetCatalog + ?Sized,
        R: Rng + ?Sized,
    {
        if self.used.len() >= catalog.count() {
            self.used.clear();
            self.used.insert(self.target);
            log::debug!("All {} images used, starting new cycle", catalog.count());
        }

        let id = catalog
            .random_id(rng, &self.used)
            .ok_or_else(|| GameError::Config("catalog has no decoy images".into()))?;
        self.used.insert(id);
        Ok(id)
    }

    /// Images still unused in the current cycle
    pub fn remaining(&self, total: usize) -> usize {
        total.saturating_sub(self.used.len())
    }
}

/// Everything about a body that does not depend on its loaded image
#[derive(Debug, Clone, PartialEq)]
pub struct BodyPlan {
    pub is_target: bool,
    pub image: ImageId,
    pub url: String,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Uniform scale before aspect correction
    pub base_scale: f32,
}

impl BodyPlan {
    /// Complete the body once its image has loaded
    pub fn finish(&self, id: BodyId, image: &SpriteImage) -> Body {
        let mut body = Body {
            id,
            image: self.image,
            pos: self.pos,
            vel: self.vel,
            scale: Vec2::ONE,
            aspect: image.aspect(),
            spin: 0.0,
            tint: NO_TINT,
            is_target: self.is_target,
        };
        body.set_uniform_scale(self.base_scale);
        body
    }
}

/// Produces target and decoy bodies from an injected catalog
#[derive(Debug, Clone)]
pub struct BodyFactory<C: AssetCatalog> {
    catalog: C,
    target_image: ImageId,
    rotation: ImageRotation,
    rng: Pcg32,
}

impl<C: AssetCatalog> BodyFactory<C> {
    /// Create a factory; fails if the target image is not in the catalog
    pub fn new(catalog: C, target_image: ImageId, seed: u64) -> Result<Self, GameError> {
        if target_image >= catalog.count() {
            return Err(GameError::Config(format!(
                "target image {target_image} not in catalog of {}",
                catalog.count()
            )));
        }
        Ok(Self {
            catalog,
            target_image,
            rotation: ImageRotation::new(target_image),
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn target_image(&self) -> ImageId {
        self.target_image
    }

    /// Plan one body. `scale_factor` of `None` picks a random scale.
    pub fn plan(
        &mut self,
        is_target: bool,
        arena: &Arena,
        scale_factor: Option<f32>,
    ) -> Result<BodyPlan, GameError> {
        let image = if is_target {
            self.target_image
        } else {
            let id = self.rotation.next(&self.catalog, &mut self.rng)?;
            log::trace!(
                "Using image #{id}, unused images remaining: {}",
                self.rotation.remaining(self.catalog.count())
            );
            id
        };
        let url = self.catalog.resolve(image)?;

        let pos = Vec2::new(
            self.rng.random_range(-arena.half_width..=arena.half_width),
            self.rng.random_range(-arena.half_height..=arena.half_height),
        );

        let mut scale = match scale_factor {
            Some(factor) => factor,
            None => self.rng.random_range(MIN_RANDOM_SCALE..=MAX_RANDOM_SCALE),
        };
        // Decoys vary slightly so they look less uniform
        if !is_target && scale_factor.is_some() {
            scale *= 1.0 + self.rng.random_range(-DECOY_SCALE_JITTER..=DECOY_SCALE_JITTER);
        }
        let base_scale = scale * SPRITE_BASE_SCALE;

        let vel = self.create_velocity();

        Ok(BodyPlan {
            is_target,
            image,
            url,
            pos,
            vel,
            base_scale,
        })
    }

    /// Random per-tick velocity, each axis in ±BODY_SPEED/2
    pub fn create_velocity(&mut self) -> Vec2 {
        let half = BODY_SPEED / 2.0;
        Vec2::new(
            self.rng.random_range(-half..=half),
            self.rng.random_range(-half..=half),
        )
    }
}
