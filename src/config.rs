//! Game tuning
//!
//! All numeric constants the simulation reads, gathered into one immutable
//! struct built at world construction. Hosts may deserialize a tweaked copy
//! from JSON; the core never mutates it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Per-size-class asteroid numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SizeSpec {
    pub radius: f32,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipConfig {
    /// Fallback collision radius when no visual frame is supplied
    pub radius: f32,
    /// Key-controlled movement speed (px/s)
    pub speed: f32,
    /// Seconds between shots
    pub fire_rate: f32,
    /// Score penalty for a hyperspace jump (clamped at zero)
    pub hyperspace_cost: u32,
    /// Invulnerability window granted by a hyperspace jump (s)
    pub hyperspace_invuln: f32,
    /// Integer pixel-art scale applied to the supplied frame
    pub pixel_scale: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletConfig {
    pub radius: f32,
    pub speed: f32,
    /// Lifetime in seconds before the bullet is culled
    pub ttl: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UfoVariantSpec {
    pub radius: f32,
    pub score: u32,
    /// 0 = fires along current heading, 1 = fires straight at the ship
    pub aim: f32,
    /// Seconds between shots
    pub fire_rate: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UfoConfig {
    /// Base seconds between spawn-timer triggers (shrinks with difficulty)
    pub spawn_every: f32,
    pub speed: f32,
    pub large: UfoVariantSpec,
    pub small: UfoVariantSpec,
    pub pixel_scale: u32,
    /// Orbit steering weights, jittered per instance at spawn
    pub orbit_tangential: f32,
    pub orbit_radial: f32,
    /// Heading lerp rate cap (1/s)
    pub orbit_max_turn: f32,
    /// Fractional per-instance jitter applied to the three values above
    pub orbit_variance: f32,
    /// Desired concurrent UFO cap
    pub max_concurrent: u32,
    /// Enemy bullet speed as a fraction of the player's bullet speed
    pub bullet_speed_factor: f32,
    /// How long the "just fired" display flag stays up (s)
    pub shot_display_time: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsteroidConfig {
    pub vel_min: f32,
    pub vel_max: f32,
    pub large: SizeSpec,
    pub medium: SizeSpec,
    pub small: SizeSpec,
    /// Multiplicative speed bonus for split fragments
    pub split_speed_bonus: f32,
    /// Base seconds between spawn triggers (shrinks with difficulty)
    pub spawn_interval_base: f32,
    /// Floor the interval never shrinks below
    pub spawn_interval_min: f32,
    /// One extra asteroid per this much score
    pub score_spawn_factor: u32,
    /// Cap on asteroids per spawn trigger
    pub max_spawn_count: u32,
    /// Fraction of (difficulty - 1) added to spawn speed
    pub speed_scale: f32,
    /// Edge spawns closer to the ship than this are re-rolled
    pub spawn_min_dist: f32,
    pub spawn_max_tries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarrelConfig {
    pub spawn_interval_min: f32,
    pub spawn_interval_max: f32,
    pub fall_speed: f32,
    pub pixel_scale: u32,
    pub hp: i32,
    /// Fallback collision radius when no visual frame is supplied
    pub radius: f32,
    /// Probability a spawned barrel is the explosive kind
    pub explosive_chance: f64,
    pub explosion_radius: f32,
    /// Cosmetic countdown between detonation and removal (s)
    pub explosion_time: f32,
}

/// Complete simulation tuning. Construct once, hand to [`crate::World`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Arena dimensions in pixels (toroidal)
    pub arena: Vec2,
    pub start_lives: i32,
    /// Post-respawn safety window (s)
    pub safe_spawn_time: f32,
    /// Difficulty = 1 + score / this
    pub difficulty_score_scale: f32,
    /// Radii derived from visual frames never drop below this
    pub min_radius: f32,
    /// Fixed seed for reproducible runs; `None` draws one from the OS
    pub seed: Option<u64>,
    pub ship: ShipConfig,
    pub bullet: BulletConfig,
    pub asteroid: AsteroidConfig,
    pub ufo: UfoConfig,
    pub barrel: BarrelConfig,
}

impl GameConfig {
    /// Parse tuning from JSON. Malformed input falls back to the shipped
    /// defaults instead of failing the host's startup.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("bad config JSON ({e}), using defaults");
                Self::default()
            }
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena: Vec2::new(920.0, 700.0),
            start_lives: 3,
            safe_spawn_time: 2.0,
            difficulty_score_scale: 1000.0,
            min_radius: 6.0,
            seed: None,
            ship: ShipConfig {
                radius: 15.0,
                speed: 220.0,
                fire_rate: 0.10,
                hyperspace_cost: 250,
                hyperspace_invuln: 1.0,
                pixel_scale: 3,
            },
            bullet: BulletConfig {
                radius: 2.0,
                speed: 800.0,
                ttl: 1.0,
            },
            asteroid: AsteroidConfig {
                vel_min: 30.0,
                vel_max: 90.0,
                large: SizeSpec {
                    radius: 46.0,
                    score: 20,
                },
                medium: SizeSpec {
                    radius: 24.0,
                    score: 50,
                },
                small: SizeSpec {
                    radius: 12.0,
                    score: 100,
                },
                split_speed_bonus: 1.2,
                spawn_interval_base: 1.5,
                spawn_interval_min: 0.4,
                score_spawn_factor: 500,
                max_spawn_count: 4,
                speed_scale: 0.25,
                spawn_min_dist: 120.0,
                spawn_max_tries: 8,
            },
            ufo: UfoConfig {
                spawn_every: 8.0,
                speed: 100.0,
                large: UfoVariantSpec {
                    radius: 18.0,
                    score: 200,
                    aim: 0.2,
                    fire_rate: 4.0,
                },
                small: UfoVariantSpec {
                    radius: 12.0,
                    score: 1000,
                    aim: 0.6,
                    fire_rate: 2.5,
                },
                pixel_scale: 2,
                orbit_tangential: 0.85,
                orbit_radial: 0.15,
                orbit_max_turn: 3.0,
                orbit_variance: 0.25,
                max_concurrent: 3,
                bullet_speed_factor: 0.8,
                shot_display_time: 0.15,
            },
            barrel: BarrelConfig {
                spawn_interval_min: 4.0,
                spawn_interval_max: 12.0,
                fall_speed: 220.0,
                pixel_scale: 2,
                hp: 1,
                radius: 12.0,
                explosive_chance: 0.5,
                explosion_radius: 80.0,
                explosion_time: 0.28,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_json() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.arena, config.arena);
        assert_eq!(back.asteroid.large.score, 20);
        assert_eq!(back.ufo.small.score, 1000);
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        let cfg = GameConfig::from_json("{ not json");
        assert_eq!(cfg.start_lives, GameConfig::default().start_lives);
        let cfg = GameConfig::from_json(r#"{"arena":[100.0,100.0]}"#);
        // Partial configs are rejected wholesale, not merged
        assert_eq!(cfg.arena, GameConfig::default().arena);
    }

    #[test]
    fn size_table_matches_shipping_values() {
        let config = GameConfig::default();
        assert_eq!(config.asteroid.large.radius, 46.0);
        assert_eq!(config.asteroid.medium.radius, 24.0);
        assert_eq!(config.asteroid.small.radius, 12.0);
    }
}
