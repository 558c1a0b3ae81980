//! Seed management for rendering
//!
//! Provides separate seeds for each randomized stage, so running or
//! reordering one stage never shifts another stage's draws.

use xxhash_rust::xxh64::xxh64;

use crate::palette::ColorMode;

/// Seeds for all randomized render stages.
///
/// Each stage gets its own seed, derived from a master seed by default.
/// The variant seed can be overridden to reshuffle decoration looks without
/// changing which cells are decorated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Rivers, ponds and forests
    pub biome: u64,
    /// Which cells get decorations, and of which type
    pub decorations: u64,
    /// Decoration offsets and sprite variants
    pub variants: u64,
    /// Landmark visiting order and rolls
    pub landmarks: u64,
    /// Atmospheric particles and stars
    pub particles: u64,
}

impl RenderSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            biome: derive_seed(master, "biome"),
            decorations: derive_seed(master, "decorations"),
            variants: derive_seed(master, "variants"),
            landmarks: derive_seed(master, "landmarks"),
            particles: derive_seed(master, "particles"),
        }
    }

    /// Seeds for a stable identity (e.g. a username) rendered in a colour mode.
    pub fn from_identity(identity: &str, mode: ColorMode) -> Self {
        Self::from_master(master_seed(identity, mode))
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> RenderSeedsBuilder {
        RenderSeedsBuilder::new(master)
    }
}

/// Builder for customizing individual seeds while deriving others from master
pub struct RenderSeedsBuilder {
    seeds: RenderSeeds,
}

impl RenderSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: RenderSeeds::from_master(master),
        }
    }

    /// Override the variant seed
    pub fn variants(mut self, seed: u64) -> Self {
        self.seeds.variants = seed;
        self
    }

    /// Override the biome seed
    pub fn biome(mut self, seed: u64) -> Self {
        self.seeds.biome = seed;
        self
    }

    pub fn build(self) -> RenderSeeds {
        self.seeds
    }
}

/// Hash an identity string and colour mode into a master seed.
///
/// XXH64 output is fixed by its format, so the same user gets the same
/// diorama on every platform and toolchain.
pub fn master_seed(identity: &str, mode: ColorMode) -> u64 {
    xxh64(mode.name().as_bytes(), xxh64(identity.as_bytes(), 0))
}

/// Derive a sub-seed from a master seed and a stage name.
fn derive_seed(master: u64, stage: &str) -> u64 {
    xxh64(stage.as_bytes(), master)
}

/// Display format for seeds (useful for reproducing a render)
impl std::fmt::Display for RenderSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RenderSeeds {{ master: {}, biome: {}, decorations: {}, variants: {}, landmarks: {}, particles: {} }}",
            self.master, self.biome, self.decorations, self.variants, self.landmarks, self.particles,
        )
    }
}
