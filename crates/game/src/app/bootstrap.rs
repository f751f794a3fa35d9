use engine::{AnimationKeyError, AnimationLibrary, Frame, LoopConfig};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{self, ConfigError};
use super::demo;
use super::gameplay::{self, Session, SessionError};

pub(crate) struct AppWiring {
    pub(crate) loop_config: LoopConfig,
    pub(crate) session: Session,
    pub(crate) frames: Vec<Frame>,
}

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("animation registry: {0}")]
    Animation(#[from] AnimationKeyError),
    #[error("session: {0}")]
    Session(#[from] SessionError),
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    init_tracing();
    info!("=== Side-scroller Startup ===");

    let config = config::load_from_env()?;
    let mut animations = AnimationLibrary::default();
    gameplay::register_action_animations(&mut animations)?;
    let session = gameplay::build_session(&config, animations)?;

    Ok(AppWiring {
        loop_config: config.loop_settings.to_loop_config(),
        session,
        frames: demo::scripted_frames(&config.demo),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
