mod actions;
mod actor;
mod combat;
mod enemy;
mod level;
mod player;
mod rect;
mod session;
mod timers;

use engine::{AnimationKeyError, AnimationLibrary};
use tracing::info;

use super::config::GameConfig;

pub(crate) use actions::{ActorKind, EnemyKind};
pub(crate) use enemy::EnemyProfile;
pub(crate) use level::{Level, PlatformDesc};
pub(crate) use player::PlayerProfile;
pub(crate) use session::{Session, SessionBuilder, SessionError};

use actions::ActionTable;

pub(crate) fn register_action_animations(
    library: &mut AnimationLibrary,
) -> Result<(), AnimationKeyError> {
    let kinds = std::iter::once(ActorKind::Player).chain(EnemyKind::ALL.map(ActorKind::Enemy));
    for kind in kinds {
        for animation in ActionTable::animations(kind) {
            library.register(animation)?;
        }
    }
    info!(
        registered = library.registered_count(),
        "action_animations_registered"
    );
    Ok(())
}

pub(crate) fn build_session(
    config: &GameConfig,
    animations: AnimationLibrary,
) -> Result<Session, SessionError> {
    let level = Level::from_platforms(&config.level.platforms);
    let mut builder = SessionBuilder::new(level)
        .gravity(config.physics.gravity)
        .player(config.level.player_spawn, config.player.clone());
    for spawn in &config.level.enemies {
        builder = builder.enemy(
            spawn.kind,
            spawn.position,
            config.enemies.get(spawn.kind).clone(),
        );
    }
    builder.build(animations)
}
