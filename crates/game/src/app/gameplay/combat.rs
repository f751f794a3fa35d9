use engine::{EntityId, Vec2};

use super::rect::Rectangle;
use super::timers::Countdown;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Vitals {
    health: i32,
    damage_cooldown: Countdown,
}

impl Vitals {
    pub(crate) fn new(health: i32) -> Self {
        Self {
            health: health.max(0),
            damage_cooldown: Countdown::default(),
        }
    }

    pub(crate) fn health(&self) -> i32 {
        self.health
    }

    pub(crate) fn is_depleted(&self) -> bool {
        self.health <= 0
    }

    pub(crate) fn can_take_damage(&self) -> bool {
        !self.damage_cooldown.is_running()
    }

    pub(crate) fn advance(&mut self, dt_seconds: f64) -> bool {
        self.damage_cooldown.advance(dt_seconds)
    }

    pub(crate) fn cancel_cooldown(&mut self) {
        self.damage_cooldown.cancel();
    }

    fn take_hit(&mut self, amount: i32, cooldown_ms: u32) -> i32 {
        self.health = self.health.saturating_sub(amount).max(0);
        self.damage_cooldown.start(f64::from(cooldown_ms) / 1000.0);
        self.health
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CombatantView {
    pub(crate) entity: EntityId,
    pub(crate) position: Vec2,
    pub(crate) strength: i32,
    pub(crate) attack_cooldown_ms: u32,
    pub(crate) attack_window_open: bool,
    pub(crate) is_dead: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HitOutcome {
    Miss,
    Immune,
    Damaged { amount: i32, remaining_health: i32 },
}

/// Applies at most one hit from `attacker` to the defender owning `vitals`.
pub(crate) fn resolve_hit(
    vitals: &mut Vitals,
    defender_hitbox: &Rectangle,
    attacker: &CombatantView,
) -> HitOutcome {
    if attacker.is_dead
        || !attacker.attack_window_open
        || !defender_hitbox.contains(attacker.position)
    {
        return HitOutcome::Miss;
    }
    if !vitals.can_take_damage() || vitals.is_depleted() {
        return HitOutcome::Immune;
    }

    let remaining_health = vitals.take_hit(attacker.strength, attacker.attack_cooldown_ms);
    HitOutcome::Damaged {
        amount: attacker.strength,
        remaining_health,
    }
}
