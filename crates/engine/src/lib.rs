pub mod app;
mod animation_keys;

pub use animation_keys::AnimationKeyError;
pub use app::{
    run_headless, AnimationLibrary, AnimationPlayer, Entity, EntityId, EntityIdAllocator,
    FixedStepper, Frame, GameClock, InputSnapshot, KeyCode, KeyEvent, KeyState, Keyboard,
    LoopConfig, LoopMetricsSnapshot, LoopSummary, SceneError, SceneWorld, Simulation,
    TickControl, Transform, SLOW_FRAME_ENV_VAR,
};
pub use glam::{Mat4, Vec2, Vec3};
