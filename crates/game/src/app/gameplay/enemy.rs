use engine::{Vec2, Vec3};
use serde::Deserialize;

use super::actions::Direction;
use super::timers::PeriodicToggle;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct EnemyProfile {
    pub(crate) health: i32,
    pub(crate) strength: i32,
    pub(crate) attack_cooldown_ms: u32,
    pub(crate) max_speed: Vec2,
    pub(crate) near_threshold: f32,
    pub(crate) far_threshold: f32,
    pub(crate) patrol_period_seconds: f64,
    pub(crate) hitbox_pivot: Vec3,
    pub(crate) hitbox_scale: Vec3,
}

impl EnemyProfile {
    pub(crate) fn bat() -> Self {
        Self {
            health: 100,
            strength: 10,
            attack_cooldown_ms: 1000,
            max_speed: Vec2::new(2.0, 5.0),
            near_threshold: 0.75,
            far_threshold: 3.0,
            patrol_period_seconds: 2.0,
            hitbox_pivot: Vec3::new(0.0, -0.5, 0.0),
            hitbox_scale: Vec3::splat(2.0),
        }
    }

    pub(crate) fn skeleton() -> Self {
        Self {
            health: 150,
            strength: 15,
            attack_cooldown_ms: 1500,
            max_speed: Vec2::new(1.0, 5.0),
            near_threshold: 1.0,
            far_threshold: 4.0,
            patrol_period_seconds: 3.0,
            hitbox_pivot: Vec3::new(0.0, -0.5, 0.0),
            hitbox_scale: Vec3::splat(2.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sensing {
    Approach(Direction),
    Attack(Direction),
    Patrol(Direction),
}

fn sense(
    near_threshold: f32,
    far_threshold: f32,
    self_x: f32,
    player_x: f32,
    move_left: bool,
) -> Sensing {
    let distance = (player_x - self_x).abs();
    let toward_player = Direction::toward(self_x, player_x);
    if distance <= near_threshold {
        Sensing::Attack(toward_player)
    } else if distance < far_threshold {
        Sensing::Approach(toward_player)
    } else if move_left {
        Sensing::Patrol(Direction::Left)
    } else {
        Sensing::Patrol(Direction::Right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EnemyBrain {
    pub(crate) near_threshold: f32,
    pub(crate) far_threshold: f32,
    patrol: PeriodicToggle,
}

impl EnemyBrain {
    pub(crate) fn new(profile: &EnemyProfile) -> Self {
        Self {
            near_threshold: profile.near_threshold,
            far_threshold: profile.far_threshold,
            patrol: PeriodicToggle::new(profile.patrol_period_seconds, false),
        }
    }

    pub(crate) fn move_left(&self) -> bool {
        self.patrol.state()
    }

    #[cfg(test)]
    pub(crate) fn patrol_active(&self) -> bool {
        self.patrol.is_active()
    }

    pub(crate) fn advance(&mut self, dt_seconds: f64) -> u64 {
        self.patrol.advance(dt_seconds)
    }

    pub(crate) fn cancel(&mut self) {
        self.patrol.cancel();
    }

    pub(crate) fn sense(&self, self_x: f32, player_x: f32) -> Sensing {
        sense(
            self.near_threshold,
            self.far_threshold,
            self_x,
            player_x,
            self.move_left(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bat_brain() -> EnemyBrain {
        EnemyBrain::new(&EnemyProfile::bat())
    }

    #[test]
    fn distance_bands_pick_behavior() {
        let brain = bat_brain();

        assert_eq!(
            brain.sense(2.0, 0.0),
            Sensing::Approach(Direction::Left)
        );
        assert_eq!(brain.sense(0.5, 0.0), Sensing::Attack(Direction::Left));
        assert_eq!(brain.sense(-0.5, 0.0), Sensing::Attack(Direction::Right));
        assert_eq!(brain.sense(5.0, 0.0), Sensing::Patrol(Direction::Right));
    }

    #[test]
    fn band_edges_follow_thresholds() {
        let brain = bat_brain();
        assert_eq!(brain.sense(0.75, 0.0), Sensing::Attack(Direction::Left));
        assert_eq!(brain.sense(3.0, 0.0), Sensing::Patrol(Direction::Right));
    }

    #[test]
    fn patrol_direction_follows_toggle() {
        let mut brain = bat_brain();
        assert!(!brain.move_left());
        assert_eq!(brain.advance(2.0), 1);
        assert_eq!(brain.sense(10.0, 0.0), Sensing::Patrol(Direction::Left));
    }

    #[test]
    fn cancelled_patrol_stops_flipping() {
        let mut brain = bat_brain();
        brain.cancel();
        assert!(!brain.patrol_active());
        assert_eq!(brain.advance(10.0), 0);
        assert!(!brain.move_left());
    }

    #[test]
    fn profile_rejects_unknown_fields() {
        let raw = r#"{
            "health": 1, "strength": 1, "attack_cooldown_ms": 1,
            "max_speed": [1.0, 1.0], "near_threshold": 0.5, "far_threshold": 1.0,
            "patrol_period_seconds": 1.0, "hitbox_pivot": [0.0, 0.0, 0.0],
            "hitbox_scale": [1.0, 1.0, 1.0], "speed": 3
        }"#;
        assert!(serde_json::from_str::<EnemyProfile>(raw).is_err());
    }
}
