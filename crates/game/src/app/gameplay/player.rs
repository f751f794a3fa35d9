use engine::{InputSnapshot, KeyCode, Vec2, Vec3};
use serde::Deserialize;

use super::actions::{Direction, PlayerAction};

pub(crate) const MOVEMENT_KEYS: [KeyCode; 7] = [
    KeyCode::W,
    KeyCode::ArrowUp,
    KeyCode::A,
    KeyCode::ArrowLeft,
    KeyCode::D,
    KeyCode::ArrowRight,
    KeyCode::Space,
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlayerProfile {
    pub(crate) health: i32,
    pub(crate) strength: i32,
    pub(crate) attack_cooldown_ms: u32,
    pub(crate) max_speed: Vec2,
    pub(crate) hitbox_pivot: Vec3,
    pub(crate) hitbox_scale: Vec3,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            health: 100,
            strength: 25,
            attack_cooldown_ms: 500,
            max_speed: Vec2::new(2.0, 3.0),
            hitbox_pivot: Vec3::new(0.0, 0.5, 0.0),
            hitbox_scale: Vec3::splat(2.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PlayerControl {
    attacking: bool,
}

impl PlayerControl {
    pub(crate) fn attacking(&self) -> bool {
        self.attacking
    }

    pub(crate) fn release_attack(&mut self) {
        self.attacking = false;
    }

    /// Refills `requests` with this tick's action requests, in key-down order.
    pub(crate) fn decide(
        &mut self,
        input: &InputSnapshot,
        grounded: bool,
        requests: &mut Vec<(PlayerAction, Option<Direction>)>,
    ) {
        requests.clear();
        for key in input.key_downs() {
            match key {
                KeyCode::W | KeyCode::ArrowUp => {
                    self.attacking = false;
                    if grounded {
                        requests.push((PlayerAction::Jump, None));
                    }
                }
                KeyCode::A | KeyCode::ArrowLeft => {
                    self.attacking = false;
                    requests.push((PlayerAction::Walk, Some(Direction::Left)));
                }
                KeyCode::D | KeyCode::ArrowRight => {
                    self.attacking = false;
                    requests.push((PlayerAction::Walk, Some(Direction::Right)));
                }
                KeyCode::Space => {
                    self.attacking = true;
                    requests.push((PlayerAction::Attack, None));
                }
                // S/↓ is reserved for a shield; Escape is handled by the loop.
                KeyCode::S | KeyCode::ArrowDown | KeyCode::Escape => {}
            }
        }

        if !input.is_any_down(&MOVEMENT_KEYS) {
            self.attacking = false;
            requests.push((PlayerAction::Idle, None));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(
        control: &mut PlayerControl,
        input: &InputSnapshot,
        grounded: bool,
    ) -> Vec<(PlayerAction, Option<Direction>)> {
        let mut requests = vec![(PlayerAction::Walk, Some(Direction::Right))];
        control.decide(input, grounded, &mut requests);
        requests
    }

    #[test]
    fn space_opens_attack_window_while_held() {
        let mut control = PlayerControl::default();
        let input = InputSnapshot::empty().with_key_pressed(KeyCode::Space);

        let requests = decide(&mut control, &input, true);

        assert_eq!(requests, vec![(PlayerAction::Attack, None)]);
        assert!(control.attacking());
    }

    #[test]
    fn releasing_every_key_goes_idle_and_closes_window() {
        let mut control = PlayerControl::default();
        decide(
            &mut control,
            &InputSnapshot::empty().with_key_pressed(KeyCode::Space),
            true,
        );

        let requests = decide(&mut control, &InputSnapshot::empty(), true);

        assert_eq!(requests, vec![(PlayerAction::Idle, None)]);
        assert!(!control.attacking());
    }

    #[test]
    fn other_action_key_closes_attack_window() {
        let mut control = PlayerControl::default();
        let input = InputSnapshot::empty()
            .with_key_pressed(KeyCode::Space)
            .with_key_pressed(KeyCode::ArrowLeft);

        let requests = decide(&mut control, &input, true);

        assert_eq!(
            requests,
            vec![
                (PlayerAction::Attack, None),
                (PlayerAction::Walk, Some(Direction::Left)),
            ]
        );
        assert!(!control.attacking());
    }

    #[test]
    fn jump_requires_ground() {
        let mut control = PlayerControl::default();
        let input = InputSnapshot::empty().with_key_pressed(KeyCode::W);

        assert!(decide(&mut control, &input, false).is_empty());
        assert_eq!(
            decide(&mut control, &input, true),
            vec![(PlayerAction::Jump, None)]
        );
    }

    #[test]
    fn shield_key_is_ignored_and_does_not_hold_off_idle() {
        let mut control = PlayerControl::default();
        let input = InputSnapshot::empty().with_key_pressed(KeyCode::S);

        assert_eq!(
            decide(&mut control, &input, true),
            vec![(PlayerAction::Idle, None)]
        );
    }
}
