use bevy::prelude::Resource;
use nalgebra::Vector3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic seeding for every random consumer in the simulation
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    master_seed: u64,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self { master_seed: seed }
    }

    // Get a new RNG for a consumer by hashing its name with master seed
    pub fn get_rng(&self, name: &str) -> ChaCha8Rng {
        let mut hasher = DefaultHasher::new();
        self.master_seed.hash(&mut hasher);
        name.hash(&mut hasher);
        ChaCha8Rng::seed_from_u64(hasher.finish())
    }
}

impl Default for RngManager {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Uniform random point inside the unit sphere (rejection sampling).
pub fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f64> {
    loop {
        let candidate = Vector3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if candidate.norm_squared() <= 1.0 {
            return candidate;
        }
    }
}
