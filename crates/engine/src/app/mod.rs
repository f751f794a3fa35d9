mod animation;
mod clock;
mod input;
mod loop_runner;
mod metrics;
mod scene;

pub use animation::{AnimationLibrary, AnimationPlayer};
pub use clock::GameClock;
pub use input::{InputSnapshot, KeyCode, KeyEvent, KeyState, Keyboard};
pub use loop_runner::{
    run_headless, FixedStepper, Frame, LoopConfig, LoopSummary, Simulation, TickControl,
    SLOW_FRAME_ENV_VAR,
};
pub use metrics::LoopMetricsSnapshot;
pub use scene::{Entity, EntityId, EntityIdAllocator, SceneError, SceneWorld, Transform};
