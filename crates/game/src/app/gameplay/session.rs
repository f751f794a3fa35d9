#[cfg(test)]
use engine::EntityId;
use engine::{
    AnimationLibrary, AnimationPlayer, InputSnapshot, SceneWorld, Simulation, TickControl,
    Transform, Vec2, Vec3,
};
use thiserror::Error;
use tracing::{debug, error, info};

use super::actions::{ActionTable, ActorKind, EnemyKind};
use super::actor::{Actor, ActorError};
use super::combat::CombatantView;
use super::enemy::EnemyProfile;
use super::level::Level;
use super::player::PlayerProfile;

pub(crate) struct TickContext<'a> {
    pub(crate) dt: f32,
    pub(crate) gravity: Vec2,
    pub(crate) input: &'a InputSnapshot,
    pub(crate) snapshot: &'a WorldSnapshot,
    pub(crate) level: &'a Level,
    pub(crate) world: &'a mut SceneWorld,
    pub(crate) animations: &'a mut dyn AnimationPlayer,
}

/// Actor state captured after timers advance and before anyone moves.
#[derive(Debug, Clone)]
pub(crate) struct WorldSnapshot {
    pub(crate) player: CombatantView,
    pub(crate) enemies: Vec<CombatantView>,
}

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("level has no collidable elements")]
    EmptyLevel,
    #[error("session has no player")]
    MissingPlayer,
    #[error("animation '{animation}' for {kind} is not registered")]
    UnregisteredAnimation {
        kind: &'static str,
        animation: &'static str,
    },
    #[error(transparent)]
    Actor(#[from] ActorError),
}

struct PlayerSpawn {
    position: Vec3,
    profile: PlayerProfile,
}

struct EnemySpawn {
    kind: EnemyKind,
    position: Vec3,
    profile: EnemyProfile,
}

#[derive(Default)]
pub(crate) struct SessionBuilder {
    level: Level,
    gravity: Vec2,
    player: Option<PlayerSpawn>,
    enemies: Vec<EnemySpawn>,
}

impl SessionBuilder {
    pub(crate) fn new(level: Level) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub(crate) fn gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub(crate) fn player(mut self, position: Vec3, profile: PlayerProfile) -> Self {
        self.player = Some(PlayerSpawn { position, profile });
        self
    }

    pub(crate) fn enemy(mut self, kind: EnemyKind, position: Vec3, profile: EnemyProfile) -> Self {
        self.enemies.push(EnemySpawn {
            kind,
            position,
            profile,
        });
        self
    }

    pub(crate) fn build(self, mut animations: AnimationLibrary) -> Result<Session, SessionError> {
        if self.level.is_empty() {
            return Err(SessionError::EmptyLevel);
        }
        let player_spawn = self.player.ok_or(SessionError::MissingPlayer)?;

        let mut kinds = vec![ActorKind::Player];
        kinds.extend(self.enemies.iter().map(|spawn| ActorKind::Enemy(spawn.kind)));
        for kind in kinds {
            if let Some(animation) = ActionTable::animations(kind)
                .iter()
                .copied()
                .find(|animation| !animations.is_registered(animation))
            {
                return Err(SessionError::UnregisteredAnimation {
                    kind: kind.as_token(),
                    animation,
                });
            }
        }

        let mut world = SceneWorld::default();
        let player_entity = world.spawn(Transform::from_translation(player_spawn.position), "player");
        let player = Actor::player(player_entity, &player_spawn.profile);
        let enemies: Vec<Actor> = self
            .enemies
            .iter()
            .map(|spawn| {
                let entity =
                    world.spawn(Transform::from_translation(spawn.position), spawn.kind.as_token());
                Actor::enemy(entity, spawn.kind, &spawn.profile)
            })
            .collect();
        world.apply_pending();

        player.start(&mut animations)?;
        for enemy in &enemies {
            enemy.start(&mut animations)?;
        }

        info!(
            enemies = enemies.len(),
            platforms = self.level.elements().len(),
            gravity_y = self.gravity.y,
            "session_built"
        );

        Ok(Session {
            world,
            level: self.level,
            gravity: self.gravity,
            player,
            enemies,
            animations,
            tick_count: 0,
            game_over_reported: false,
        })
    }
}

pub(crate) struct Session {
    world: SceneWorld,
    level: Level,
    gravity: Vec2,
    player: Actor,
    enemies: Vec<Actor>,
    animations: AnimationLibrary,
    tick_count: u64,
    game_over_reported: bool,
}

impl Session {
    pub(crate) fn step(&mut self, dt: f32, input: &InputSnapshot) -> Result<(), SessionError> {
        self.tick_count = self.tick_count.saturating_add(1);

        let dt_seconds = f64::from(dt);
        self.player.advance_timers(dt_seconds);
        for enemy in &mut self.enemies {
            enemy.advance_timers(dt_seconds);
        }

        let snapshot = self.snapshot()?;
        let mut ctx = TickContext {
            dt,
            gravity: self.gravity,
            input,
            snapshot: &snapshot,
            level: &self.level,
            world: &mut self.world,
            animations: &mut self.animations,
        };

        self.player.update(&mut ctx)?;
        for enemy in &mut self.enemies {
            enemy.update(&mut ctx)?;
        }

        if self.player.is_dead() && !self.game_over_reported {
            self.game_over_reported = true;
            info!(
                tick = self.tick_count,
                enemies_alive = self.enemies.iter().filter(|enemy| !enemy.is_dead()).count(),
                "game_over"
            );
        }
        debug!(
            tick = self.tick_count,
            player_action = ?self.player.action(),
            player_facing = ?self.player.facing(),
            player_grounded = self.player.is_grounded(),
            player_health = self.player.health(),
            "session_tick"
        );
        Ok(())
    }

    fn snapshot(&self) -> Result<WorldSnapshot, SessionError> {
        let player = self.player.combatant_view(&self.world)?;
        let enemies = self
            .enemies
            .iter()
            .map(|enemy| enemy.combatant_view(&self.world))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(WorldSnapshot { player, enemies })
    }

    pub(crate) fn game_over(&self) -> bool {
        self.player.is_dead()
    }

    /// Removes an enemy and its entity. Its timers go with it.
    #[cfg(test)]
    pub(crate) fn discard_enemy(&mut self, entity: EntityId) -> bool {
        let Some(index) = self.enemies.iter().position(|enemy| enemy.entity() == entity) else {
            tracing::warn!(entity = ?entity, "discard_unknown_enemy");
            return false;
        };
        self.enemies.remove(index);
        self.world.despawn(entity);
        self.world.apply_pending();
        self.animations.forget(entity);
        info!(entity = ?entity, remaining = self.enemies.len(), "enemy_discarded");
        true
    }

    pub(crate) fn player(&self) -> &Actor {
        &self.player
    }

    pub(crate) fn enemies(&self) -> &[Actor] {
        &self.enemies
    }

    #[cfg(test)]
    pub(crate) fn world(&self) -> &SceneWorld {
        &self.world
    }

    #[cfg(test)]
    pub(crate) fn animations(&self) -> &AnimationLibrary {
        &self.animations
    }

    pub(crate) fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[cfg(test)]
    pub(crate) fn position_of(&self, entity: EntityId) -> Option<Vec3> {
        self.world
            .transform(entity)
            .ok()
            .map(|transform| transform.position())
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut Actor {
        &mut self.player
    }
}

impl Simulation for Session {
    type Error = SessionError;

    fn tick(&mut self, dt_seconds: f32, input: &InputSnapshot) -> Result<TickControl, SessionError> {
        if self.game_over() {
            return Ok(TickControl::Stop);
        }
        if let Err(err) = self.step(dt_seconds, input) {
            error!(tick = self.tick_count, error = %err, "session_tick_failed");
            return Err(err);
        }
        if self.game_over() {
            Ok(TickControl::Stop)
        } else {
            Ok(TickControl::Continue)
        }
    }
}
