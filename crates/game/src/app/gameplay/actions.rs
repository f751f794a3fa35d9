use engine::Vec3;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    pub(crate) fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Direction pointing from `from_x` toward `to_x`; ties resolve to the left.
    pub(crate) fn toward(from_x: f32, to_x: f32) -> Self {
        if to_x > from_x {
            Self::Right
        } else {
            Self::Left
        }
    }

    /// Sprites face right at rest and are mirrored by a half turn around Y.
    pub(crate) fn rotation_degrees(self) -> Vec3 {
        Vec3::new(0.0, 90.0 - 90.0 * self.sign(), 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum EnemyKind {
    Bat,
    Skeleton,
}

impl EnemyKind {
    pub(crate) const ALL: [EnemyKind; 2] = [EnemyKind::Bat, EnemyKind::Skeleton];

    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::Bat => "bat",
            Self::Skeleton => "skeleton",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ActorKind {
    Player,
    Enemy(EnemyKind),
}

impl ActorKind {
    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Enemy(kind) => kind.as_token(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PlayerAction {
    Idle,
    Walk,
    Jump,
    Attack,
    Die,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EnemyAction {
    Walk,
    Attack,
    Death,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Action {
    Player(PlayerAction),
    Enemy(EnemyAction),
}

impl Action {
    pub(crate) fn is_death(self) -> bool {
        matches!(
            self,
            Self::Player(PlayerAction::Die) | Self::Enemy(EnemyAction::Death)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VelocityIntent {
    Stop,
    Cruise,
    Launch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RotationIntent {
    Keep,
    Face(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ActionSpec {
    pub(crate) velocity: VelocityIntent,
    pub(crate) rotation: RotationIntent,
    pub(crate) animation: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum ActionTableError {
    #[error("action {action:?} is not defined for actor kind {kind:?}")]
    UnsupportedAction { kind: ActorKind, action: Action },
}

const PLAYER_ANIMATIONS: [&str; 5] = [
    "player_idle",
    "player_walk",
    "player_jump",
    "player_attack",
    "player_die",
];
const BAT_ANIMATIONS: [&str; 3] = ["bat_walk", "bat_attack", "bat_death"];
const SKELETON_ANIMATIONS: [&str; 3] = ["skeleton_walk", "skeleton_attack", "skeleton_death"];

pub(crate) struct ActionTable;

impl ActionTable {
    pub(crate) fn resolve(
        kind: ActorKind,
        action: Action,
        direction: Option<Direction>,
    ) -> Result<ActionSpec, ActionTableError> {
        let face = direction.map_or(RotationIntent::Keep, RotationIntent::Face);
        let spec = match (kind, action) {
            (ActorKind::Player, Action::Player(player_action)) => {
                let (velocity, rotation) = match player_action {
                    PlayerAction::Idle => (VelocityIntent::Stop, RotationIntent::Keep),
                    PlayerAction::Walk => (VelocityIntent::Cruise, face),
                    PlayerAction::Jump => (VelocityIntent::Launch, RotationIntent::Keep),
                    PlayerAction::Attack => (VelocityIntent::Stop, face),
                    PlayerAction::Die => (VelocityIntent::Stop, RotationIntent::Keep),
                };
                ActionSpec {
                    velocity,
                    rotation,
                    animation: player_animation(player_action),
                }
            }
            (ActorKind::Enemy(enemy_kind), Action::Enemy(enemy_action)) => {
                let (velocity, rotation) = match enemy_action {
                    EnemyAction::Walk => (VelocityIntent::Cruise, face),
                    EnemyAction::Attack => (VelocityIntent::Stop, face),
                    EnemyAction::Death => (VelocityIntent::Stop, RotationIntent::Keep),
                };
                ActionSpec {
                    velocity,
                    rotation,
                    animation: enemy_animation(enemy_kind, enemy_action),
                }
            }
            _ => return Err(ActionTableError::UnsupportedAction { kind, action }),
        };
        Ok(spec)
    }

    pub(crate) fn default_action(kind: ActorKind) -> Action {
        match kind {
            ActorKind::Player => Action::Player(PlayerAction::Idle),
            ActorKind::Enemy(_) => Action::Enemy(EnemyAction::Walk),
        }
    }

    pub(crate) fn death_action(kind: ActorKind) -> Action {
        match kind {
            ActorKind::Player => Action::Player(PlayerAction::Die),
            ActorKind::Enemy(_) => Action::Enemy(EnemyAction::Death),
        }
    }

    pub(crate) fn animations(kind: ActorKind) -> &'static [&'static str] {
        match kind {
            ActorKind::Player => &PLAYER_ANIMATIONS,
            ActorKind::Enemy(EnemyKind::Bat) => &BAT_ANIMATIONS,
            ActorKind::Enemy(EnemyKind::Skeleton) => &SKELETON_ANIMATIONS,
        }
    }
}

fn player_animation(action: PlayerAction) -> &'static str {
    match action {
        PlayerAction::Idle => PLAYER_ANIMATIONS[0],
        PlayerAction::Walk => PLAYER_ANIMATIONS[1],
        PlayerAction::Jump => PLAYER_ANIMATIONS[2],
        PlayerAction::Attack => PLAYER_ANIMATIONS[3],
        PlayerAction::Die => PLAYER_ANIMATIONS[4],
    }
}

fn enemy_animation(kind: EnemyKind, action: EnemyAction) -> &'static str {
    let names = match kind {
        EnemyKind::Bat => &BAT_ANIMATIONS,
        EnemyKind::Skeleton => &SKELETON_ANIMATIONS,
    };
    match action {
        EnemyAction::Walk => names[0],
        EnemyAction::Attack => names[1],
        EnemyAction::Death => names[2],
    }
}
