use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine::{LoopConfig, Vec2, Vec3};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use super::gameplay::{EnemyKind, EnemyProfile, PlatformDesc, PlayerProfile};

pub(crate) const CONFIG_ENV_VAR: &str = "SIDESCROLLER_CONFIG";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config json at {json_path}: {source}")]
    Parse {
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("validation failed at {field}: {reason}")]
    Invalid { field: String, reason: String },
    #[error("unable to read {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    #[serde(rename = "loop")]
    pub(crate) loop_settings: LoopSettings,
    pub(crate) physics: PhysicsSettings,
    pub(crate) player: PlayerProfile,
    pub(crate) enemies: EnemyProfiles,
    pub(crate) level: LevelDesc,
    pub(crate) demo: DemoSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LoopSettings {
    pub(crate) target_tps: u32,
    pub(crate) max_frame_delta_ms: u64,
    pub(crate) max_ticks_per_frame: u32,
    pub(crate) metrics_log_interval_ms: u64,
    pub(crate) simulated_slow_frame_ms: u64,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta_ms: 250,
            max_ticks_per_frame: 5,
            metrics_log_interval_ms: 1000,
            simulated_slow_frame_ms: 0,
        }
    }
}

impl LoopSettings {
    pub(crate) fn to_loop_config(&self) -> LoopConfig {
        LoopConfig {
            target_tps: self.target_tps,
            max_frame_delta: Duration::from_millis(self.max_frame_delta_ms),
            max_ticks_per_frame: self.max_ticks_per_frame,
            metrics_log_interval: Duration::from_millis(self.metrics_log_interval_ms),
            simulated_slow_frame_ms: self.simulated_slow_frame_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PhysicsSettings {
    pub(crate) gravity: Vec2,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -3.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct EnemyProfiles {
    pub(crate) bat: EnemyProfile,
    pub(crate) skeleton: EnemyProfile,
}

impl Default for EnemyProfiles {
    fn default() -> Self {
        Self {
            bat: EnemyProfile::bat(),
            skeleton: EnemyProfile::skeleton(),
        }
    }
}

impl EnemyProfiles {
    pub(crate) fn get(&self, kind: EnemyKind) -> &EnemyProfile {
        match kind {
            EnemyKind::Bat => &self.bat,
            EnemyKind::Skeleton => &self.skeleton,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct EnemySpawnDesc {
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LevelDesc {
    pub(crate) player_spawn: Vec3,
    pub(crate) platforms: Vec<PlatformDesc>,
    pub(crate) enemies: Vec<EnemySpawnDesc>,
}

impl Default for LevelDesc {
    fn default() -> Self {
        Self {
            player_spawn: Vec3::new(0.0, 0.5, 0.0),
            platforms: vec![
                PlatformDesc {
                    x: -20.0,
                    y: -1.0,
                    width: 40.0,
                    height: 1.0,
                },
                PlatformDesc {
                    x: 10.0,
                    y: 0.0,
                    width: 4.0,
                    height: 1.5,
                },
            ],
            enemies: vec![
                EnemySpawnDesc {
                    kind: EnemyKind::Bat,
                    position: Vec3::new(4.0, 0.5, 0.0),
                },
                EnemySpawnDesc {
                    kind: EnemyKind::Skeleton,
                    position: Vec3::new(-8.0, 0.5, 0.0),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DemoSettings {
    pub(crate) frames: u32,
    pub(crate) frame_ms: u64,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            frames: 600,
            frame_ms: 16,
        }
    }
}

/// Loads the file named by `SIDESCROLLER_CONFIG`, or the built-in defaults when unset.
pub(crate) fn load_from_env() -> Result<GameConfig, ConfigError> {
    match env::var(CONFIG_ENV_VAR) {
        Ok(path) => load_from_path(Path::new(&path)),
        Err(env::VarError::NotPresent) => {
            let config = GameConfig::default();
            validate(&config)?;
            info!("config_defaults_loaded");
            Ok(config)
        }
        Err(source) => Err(ConfigError::EnvVar {
            var: CONFIG_ENV_VAR,
            source,
        }),
    }
}

pub(crate) fn load_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config_json(&raw)?;
    validate(&config)?;
    info!(
        path = %path.display(),
        enemies = config.level.enemies.len(),
        platforms = config.level.platforms.len(),
        "config_loaded"
    );
    Ok(config)
}

pub(crate) fn parse_config_json(raw: &str) -> Result<GameConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, GameConfig>(&mut deserializer).map_err(|error| {
        let json_path = error.path().to_string();
        ConfigError::Parse {
            json_path,
            source: error.into_inner(),
        }
    })
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.into(),
        reason: reason.into(),
    }
}

pub(crate) fn validate(config: &GameConfig) -> Result<(), ConfigError> {
    let loop_settings = &config.loop_settings;
    if loop_settings.target_tps == 0 {
        return Err(invalid("loop.target_tps", "expected > 0, got 0"));
    }
    if loop_settings.max_ticks_per_frame == 0 {
        return Err(invalid("loop.max_ticks_per_frame", "expected > 0, got 0"));
    }
    if !config.physics.gravity.is_finite() {
        return Err(invalid("physics.gravity", "expected finite components"));
    }

    validate_player(&config.player)?;
    validate_enemy("enemies.bat", &config.enemies.bat)?;
    validate_enemy("enemies.skeleton", &config.enemies.skeleton)?;

    if config.level.platforms.is_empty() {
        return Err(invalid("level.platforms", "expected at least one platform"));
    }
    for (index, platform) in config.level.platforms.iter().enumerate() {
        let finite = [platform.x, platform.y, platform.width, platform.height]
            .iter()
            .all(|value| value.is_finite());
        if !finite {
            return Err(invalid(
                format!("level.platforms[{index}]"),
                "expected finite components",
            ));
        }
    }
    if !config.level.player_spawn.is_finite() {
        return Err(invalid("level.player_spawn", "expected finite components"));
    }
    for (index, spawn) in config.level.enemies.iter().enumerate() {
        if !spawn.position.is_finite() {
            return Err(invalid(
                format!("level.enemies[{index}].position"),
                "expected finite components",
            ));
        }
    }

    if config.demo.frame_ms == 0 {
        return Err(invalid("demo.frame_ms", "expected > 0, got 0"));
    }
    Ok(())
}

fn validate_player(profile: &PlayerProfile) -> Result<(), ConfigError> {
    if profile.health <= 0 {
        return Err(invalid(
            "player.health",
            format!("expected > 0, got {}", profile.health),
        ));
    }
    if profile.strength < 0 {
        return Err(invalid(
            "player.strength",
            format!("expected >= 0, got {}", profile.strength),
        ));
    }
    if !profile.max_speed.is_finite() {
        return Err(invalid("player.max_speed", "expected finite components"));
    }
    Ok(())
}

fn validate_enemy(field: &str, profile: &EnemyProfile) -> Result<(), ConfigError> {
    if profile.health <= 0 {
        return Err(invalid(
            format!("{field}.health"),
            format!("expected > 0, got {}", profile.health),
        ));
    }
    if profile.strength < 0 {
        return Err(invalid(
            format!("{field}.strength"),
            format!("expected >= 0, got {}", profile.strength),
        ));
    }
    if !profile.max_speed.is_finite() {
        return Err(invalid(
            format!("{field}.max_speed"),
            "expected finite components",
        ));
    }
    if !(profile.near_threshold >= 0.0 && profile.near_threshold < profile.far_threshold) {
        return Err(invalid(
            format!("{field}.near_threshold"),
            format!(
                "expected 0 <= near < far, got near {} far {}",
                profile.near_threshold, profile.far_threshold
            ),
        ));
    }
    if !(profile.patrol_period_seconds > 0.0 && profile.patrol_period_seconds.is_finite()) {
        return Err(invalid(
            format!("{field}.patrol_period_seconds"),
            format!("expected > 0, got {}", profile.patrol_period_seconds),
        ));
    }
    Ok(())
}
