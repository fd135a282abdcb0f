use bevy::prelude::*;
use nalgebra::Vector3;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Collision layers a downward ray can be filtered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RayLayer {
    /// General level geometry
    Terrain,
    /// Dedicated boundary colliders marking the base of the level
    LevelBase,
}

/// Host-side ray casting used by the flight controller for altitude.
pub trait GroundProbe {
    /// Distance from `origin` straight down to the nearest hit on `layer`,
    /// or `None` if nothing is hit within `max_distance`.
    fn raycast_down(&self, origin: &Vector3<f64>, max_distance: f64, layer: RayLayer)
        -> Option<f64>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TerrainShape {
    Flat {
        height: f64,
    },
    Hills {
        base_height: f64,
        amplitude: f64,
        wavelength: f64,
        seed: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub terrain: TerrainShape,
    /// Height of the level-base boundary plane
    pub level_base_height: f64,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainShape::Flat { height: 0.0 },
            level_base_height: 0.0,
        }
    }
}

/// Height-field terrain and a flat level-base plane, world Y up.
#[derive(Resource)]
pub struct GroundModel {
    config: GroundConfig,
    perlin: Perlin,
}

impl GroundModel {
    pub fn new(config: &GroundConfig) -> Self {
        let seed = match config.terrain {
            TerrainShape::Hills { seed, .. } => seed,
            TerrainShape::Flat { .. } => 0,
        };
        Self {
            config: config.clone(),
            perlin: Perlin::new(seed),
        }
    }

    pub fn config(&self) -> &GroundConfig {
        &self.config
    }

    pub fn terrain_height(&self, x: f64, z: f64) -> f64 {
        match self.config.terrain {
            TerrainShape::Flat { height } => height,
            TerrainShape::Hills {
                base_height,
                amplitude,
                wavelength,
                ..
            } => {
                let scale = wavelength.max(f64::EPSILON);
                base_height + amplitude * self.perlin.get([x / scale, z / scale])
            }
        }
    }

    /// Terrain normal by central differences over `step` metres.
    pub fn terrain_normal(&self, x: f64, z: f64) -> Vector3<f64> {
        let step = 0.5;
        let dx = self.terrain_height(x + step, z) - self.terrain_height(x - step, z);
        let dz = self.terrain_height(x, z + step) - self.terrain_height(x, z - step);
        Vector3::new(-dx, 2.0 * step, -dz).normalize()
    }

    fn surface_height(&self, x: f64, z: f64, layer: RayLayer) -> f64 {
        match layer {
            RayLayer::Terrain => self.terrain_height(x, z),
            RayLayer::LevelBase => self.config.level_base_height,
        }
    }
}

impl GroundProbe for GroundModel {
    fn raycast_down(
        &self,
        origin: &Vector3<f64>,
        max_distance: f64,
        layer: RayLayer,
    ) -> Option<f64> {
        let distance = origin.y - self.surface_height(origin.x, origin.z, layer);
        (0.0..=max_distance).contains(&distance).then_some(distance)
    }
}

impl Default for GroundModel {
    fn default() -> Self {
        Self::new(&GroundConfig::default())
    }
}

/// Axis-aligned finish volume. Entering it raises a goal event.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalZone {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl GoalZone {
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self {
            min: min.inf(&max),
            max: min.sup(&max),
        }
    }

    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_raycast_against_flat_layers() {
        let ground = GroundModel::new(&GroundConfig {
            terrain: TerrainShape::Flat { height: 20.0 },
            level_base_height: -100.0,
        });
        let origin = Vector3::new(5.0, 150.0, -3.0);

        assert_relative_eq!(
            ground.raycast_down(&origin, 2000.0, RayLayer::Terrain).unwrap(),
            130.0
        );
        assert_relative_eq!(
            ground.raycast_down(&origin, 2000.0, RayLayer::LevelBase).unwrap(),
            250.0
        );
    }

    #[test]
    fn test_raycast_misses() {
        let ground = GroundModel::default();

        // Below the surface
        assert!(ground
            .raycast_down(&Vector3::new(0.0, -1.0, 0.0), 2000.0, RayLayer::Terrain)
            .is_none());
        // Out of range
        assert!(ground
            .raycast_down(&Vector3::new(0.0, 2500.0, 0.0), 2000.0, RayLayer::Terrain)
            .is_none());
    }

    #[test]
    fn test_flat_terrain_normal_points_up() {
        let ground = GroundModel::default();
        let normal = ground.terrain_normal(12.0, -7.0);
        assert_relative_eq!(normal, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_hills_stay_within_amplitude() {
        let ground = GroundModel::new(&GroundConfig {
            terrain: TerrainShape::Hills {
                base_height: 10.0,
                amplitude: 5.0,
                wavelength: 80.0,
                seed: 3,
            },
            level_base_height: 0.0,
        });

        for i in 0..50 {
            let h = ground.terrain_height(i as f64 * 13.7, i as f64 * -9.1);
            assert!((4.0..=16.0).contains(&h), "height {h} out of range");
        }
    }

    #[test]
    fn test_goal_zone_contains() {
        let zone = GoalZone::new(Vector3::new(10.0, 0.0, 10.0), Vector3::new(-10.0, 50.0, -10.0));
        assert!(zone.contains(&Vector3::new(0.0, 25.0, 0.0)));
        assert!(!zone.contains(&Vector3::new(0.0, 60.0, 0.0)));
    }
}
