use engine::{AnimationPlayer, EntityId, SceneError, SceneWorld, Vec2, Vec3};
use thiserror::Error;
use tracing::{debug, info};

use super::actions::{
    Action, ActionTable, ActionTableError, ActorKind, Direction, EnemyAction, EnemyKind,
    PlayerAction, RotationIntent, VelocityIntent,
};
use super::combat::{resolve_hit, CombatantView, HitOutcome, Vitals};
use super::enemy::{EnemyBrain, EnemyProfile, Sensing};
use super::player::{PlayerControl, PlayerProfile};
use super::rect::Rectangle;
use super::session::TickContext;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ActorStats {
    pub(crate) strength: i32,
    pub(crate) attack_cooldown_ms: u32,
    pub(crate) max_speed: Vec2,
    pub(crate) hitbox_pivot: Vec3,
    pub(crate) hitbox_scale: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Behavior {
    Player(PlayerControl),
    Enemy(EnemyBrain),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ActOutcome {
    Changed,
    /// Same action as before; only velocity and facing were reapplied.
    Steered,
    Ignored,
}

#[derive(Debug, Error)]
pub(crate) enum ActorError {
    #[error(transparent)]
    Action(#[from] ActionTableError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

#[derive(Debug, Clone)]
pub(crate) struct Actor {
    entity: EntityId,
    kind: ActorKind,
    stats: ActorStats,
    vitals: Vitals,
    velocity: Vec2,
    facing: Direction,
    action: Action,
    is_dead: bool,
    grounded: bool,
    behavior: Behavior,
    player_requests: Vec<(PlayerAction, Option<Direction>)>,
}

impl Actor {
    pub(crate) fn player(entity: EntityId, profile: &PlayerProfile) -> Self {
        Self::new(
            entity,
            ActorKind::Player,
            profile.health,
            ActorStats {
                strength: profile.strength,
                attack_cooldown_ms: profile.attack_cooldown_ms,
                max_speed: profile.max_speed,
                hitbox_pivot: profile.hitbox_pivot,
                hitbox_scale: profile.hitbox_scale,
            },
            Behavior::Player(PlayerControl::default()),
        )
    }

    pub(crate) fn enemy(entity: EntityId, kind: EnemyKind, profile: &EnemyProfile) -> Self {
        Self::new(
            entity,
            ActorKind::Enemy(kind),
            profile.health,
            ActorStats {
                strength: profile.strength,
                attack_cooldown_ms: profile.attack_cooldown_ms,
                max_speed: profile.max_speed,
                hitbox_pivot: profile.hitbox_pivot,
                hitbox_scale: profile.hitbox_scale,
            },
            Behavior::Enemy(EnemyBrain::new(profile)),
        )
    }

    fn new(
        entity: EntityId,
        kind: ActorKind,
        health: i32,
        stats: ActorStats,
        behavior: Behavior,
    ) -> Self {
        Self {
            entity,
            kind,
            stats,
            vitals: Vitals::new(health),
            velocity: Vec2::ZERO,
            facing: Direction::Right,
            action: ActionTable::default_action(kind),
            is_dead: false,
            grounded: false,
            behavior,
            player_requests: Vec::new(),
        }
    }

    pub(crate) fn entity(&self) -> EntityId {
        self.entity
    }

    pub(crate) fn health(&self) -> i32 {
        self.vitals.health()
    }

    pub(crate) fn facing(&self) -> Direction {
        self.facing
    }

    pub(crate) fn action(&self) -> Action {
        self.action
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.is_dead
    }

    pub(crate) fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Enemies attack while in ATTACK; the player while the attack key is active.
    pub(crate) fn attack_window_open(&self) -> bool {
        if self.is_dead {
            return false;
        }
        match &self.behavior {
            Behavior::Player(control) => control.attacking(),
            Behavior::Enemy(_) => self.action == Action::Enemy(EnemyAction::Attack),
        }
    }

    pub(crate) fn hitbox(&self, world: &SceneWorld) -> Result<Rectangle, ActorError> {
        let transform = world.transform(self.entity)?;
        Ok(Rectangle::from_transform(
            transform,
            self.stats.hitbox_pivot,
            self.stats.hitbox_scale,
        ))
    }

    pub(crate) fn combatant_view(&self, world: &SceneWorld) -> Result<CombatantView, ActorError> {
        let position = world.transform(self.entity)?.position();
        Ok(CombatantView {
            entity: self.entity,
            position: Vec2::new(position.x, position.y),
            strength: self.stats.strength,
            attack_cooldown_ms: self.stats.attack_cooldown_ms,
            attack_window_open: self.attack_window_open(),
            is_dead: self.is_dead,
        })
    }

    pub(crate) fn start(&self, animations: &mut dyn AnimationPlayer) -> Result<(), ActorError> {
        let spec = ActionTable::resolve(self.kind, self.action, None)?;
        animations.play(self.entity, spec.animation);
        Ok(())
    }

    pub(crate) fn advance_timers(&mut self, dt_seconds: f64) {
        if self.vitals.advance(dt_seconds) {
            debug!(entity = ?self.entity, "damage_cooldown_expired");
        }
        if let Behavior::Enemy(brain) = &mut self.behavior {
            let flips = brain.advance(dt_seconds);
            if flips > 0 {
                debug!(
                    entity = ?self.entity,
                    move_left = brain.move_left(),
                    "patrol_direction_flipped"
                );
            }
        }
    }

    pub(crate) fn act(
        &mut self,
        action: Action,
        direction: Option<Direction>,
        world: &mut SceneWorld,
        animations: &mut dyn AnimationPlayer,
    ) -> Result<ActOutcome, ActorError> {
        let spec = ActionTable::resolve(self.kind, action, direction)?;
        if self.is_dead {
            return Ok(ActOutcome::Ignored);
        }

        if let RotationIntent::Face(facing) = spec.rotation {
            self.facing = facing;
            world
                .transform_mut(self.entity)?
                .set_rotation(facing.rotation_degrees());
        }
        match spec.velocity {
            VelocityIntent::Stop => self.velocity.x = 0.0,
            VelocityIntent::Cruise => self.velocity.x = self.stats.max_speed.x * self.facing.sign(),
            VelocityIntent::Launch => {
                self.velocity.y = self.stats.max_speed.y;
                self.grounded = false;
            }
        }

        if action == self.action {
            return Ok(ActOutcome::Steered);
        }

        let previous = self.action;
        self.action = action;
        animations.play(self.entity, spec.animation);
        debug!(
            entity = ?self.entity,
            kind = self.kind.as_token(),
            from = ?previous,
            to = ?action,
            "action_changed"
        );

        if action.is_death() {
            self.is_dead = true;
            self.vitals.cancel_cooldown();
            if let Behavior::Enemy(brain) = &mut self.behavior {
                brain.cancel();
            }
            if let Behavior::Player(control) = &mut self.behavior {
                control.release_attack();
            }
            info!(
                entity = ?self.entity,
                kind = self.kind.as_token(),
                health = self.vitals.health(),
                "actor_died"
            );
        }

        Ok(ActOutcome::Changed)
    }

    pub(crate) fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<(), ActorError> {
        if self.is_dead {
            return Ok(());
        }

        self.decide(ctx)?;

        self.velocity.y += ctx.gravity.y * ctx.dt;
        let transform = ctx.world.transform_mut(self.entity)?;
        let mut position = transform.position();
        position.x += self.velocity.x * ctx.dt;
        position.y += self.velocity.y * ctx.dt;
        self.grounded = ctx.level.snap_to_ground(&mut position);
        if self.grounded {
            self.velocity.y = 0.0;
        }
        transform.set_position(position);

        self.resolve_combat(ctx)?;

        if self.vitals.is_depleted() && !self.is_dead {
            let death = ActionTable::death_action(self.kind);
            self.act(death, None, ctx.world, ctx.animations)?;
        }
        Ok(())
    }

    fn decide(&mut self, ctx: &mut TickContext<'_>) -> Result<(), ActorError> {
        let brain = match &mut self.behavior {
            Behavior::Player(control) => {
                control.decide(ctx.input, self.grounded, &mut self.player_requests);
                None
            }
            Behavior::Enemy(brain) => Some(&*brain),
        };

        if let Some(brain) = brain {
            let self_x = ctx.world.transform(self.entity)?.position().x;
            let (action, direction) = match brain.sense(self_x, ctx.snapshot.player.position.x) {
                Sensing::Approach(direction) | Sensing::Patrol(direction) => {
                    (EnemyAction::Walk, direction)
                }
                Sensing::Attack(direction) => (EnemyAction::Attack, direction),
            };
            self.act(
                Action::Enemy(action),
                Some(direction),
                ctx.world,
                ctx.animations,
            )?;
            return Ok(());
        }

        let requests = std::mem::take(&mut self.player_requests);
        let result = requests.iter().try_for_each(|&(action, direction)| {
            self.act(Action::Player(action), direction, ctx.world, ctx.animations)
                .map(|_| ())
        });
        self.player_requests = requests;
        result
    }

    fn resolve_combat(&mut self, ctx: &mut TickContext<'_>) -> Result<(), ActorError> {
        let hitbox = self.hitbox(ctx.world)?;
        let attackers = match self.kind {
            ActorKind::Player => ctx.snapshot.enemies.as_slice(),
            ActorKind::Enemy(_) => std::slice::from_ref(&ctx.snapshot.player),
        };

        for attacker in attackers {
            if let HitOutcome::Damaged {
                amount,
                remaining_health,
            } = resolve_hit(&mut self.vitals, &hitbox, attacker)
            {
                info!(
                    defender = ?self.entity,
                    attacker = ?attacker.entity,
                    amount,
                    remaining_health,
                    cooldown_ms = attacker.attack_cooldown_ms,
                    "actor_damaged"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
impl Actor {
    pub(crate) fn kind(&self) -> ActorKind {
        self.kind
    }

    pub(crate) fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub(crate) fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub(crate) fn can_take_damage(&self) -> bool {
        self.vitals.can_take_damage()
    }

    pub(crate) fn behavior(&self) -> &Behavior {
        &self.behavior
    }
}
