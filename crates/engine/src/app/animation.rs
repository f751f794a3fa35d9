use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use super::EntityId;
use crate::animation_keys::{validate_animation_key, AnimationKeyError};

/// Sink for "activate named animation" requests coming out of gameplay code.
pub trait AnimationPlayer {
    fn play(&mut self, entity: EntityId, animation: &str);
}

/// Registry of generated animations plus the animation currently active on each entity.
#[derive(Debug, Default)]
pub struct AnimationLibrary {
    registered: BTreeSet<String>,
    active_by_entity: HashMap<EntityId, String>,
    play_count: u64,
}

impl AnimationLibrary {
    pub fn register(&mut self, key: &str) -> Result<(), AnimationKeyError> {
        validate_animation_key(key)?;
        self.registered.insert(key.to_string());
        Ok(())
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.registered.contains(key)
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    pub fn active(&self, entity: EntityId) -> Option<&str> {
        self.active_by_entity.get(&entity).map(String::as_str)
    }

    pub fn forget(&mut self, entity: EntityId) {
        self.active_by_entity.remove(&entity);
    }

    pub fn play_count(&self) -> u64 {
        self.play_count
    }
}

impl AnimationPlayer for AnimationLibrary {
    fn play(&mut self, entity: EntityId, animation: &str) {
        if !self.registered.contains(animation) {
            warn!(entity = entity.0, animation, "animation_not_registered");
        }
        self.play_count = self.play_count.saturating_add(1);
        self.active_by_entity.insert(entity, animation.to_string());
        debug!(entity = entity.0, animation, "animation_started");
    }
}
