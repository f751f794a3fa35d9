use glam::{EulerRot, Mat4, Vec3};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

/// Local transform of a scene node.
///
/// Rotation is stored as Euler angles in degrees and applied in Y, X, Z order, which is
/// what sprite mirroring (a 180 degree turn around Y) expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation_degrees: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_degrees: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.translation
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.translation = position;
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation_degrees
    }

    pub fn set_rotation(&mut self, rotation_degrees: Vec3) {
        self.rotation_degrees = rotation_degrees;
    }

    pub fn matrix(&self) -> Mat4 {
        let rotation = Mat4::from_euler(
            EulerRot::YXZ,
            self.rotation_degrees.y.to_radians(),
            self.rotation_degrees.x.to_radians(),
            self.rotation_degrees.z.to_radians(),
        );
        Mat4::from_translation(self.translation) * rotation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("entity {0:?} is not present in the scene world")]
    MissingEntity(EntityId),
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub transform: Transform,
    pub debug_name: &'static str,
}

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Owner of every transform in a session. Spawns and despawns are deferred until
/// [`SceneWorld::apply_pending`] so a tick never observes a half-built world.
#[derive(Debug, Default)]
pub struct SceneWorld {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    pending_spawns: Vec<Entity>,
    pending_despawns: Vec<EntityId>,
}

impl SceneWorld {
    pub fn spawn(&mut self, transform: Transform, debug_name: &'static str) -> EntityId {
        let id = self.allocator.allocate();
        self.pending_spawns.push(Entity {
            id,
            transform,
            debug_name,
        });
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> bool {
        let exists_now = self.entities.iter().any(|entity| entity.id == id);
        let pending_spawn = self.pending_spawns.iter().any(|entity| entity.id == id);
        if !exists_now && !pending_spawn {
            return false;
        }
        self.pending_despawns.push(id);
        true
    }

    pub fn apply_pending(&mut self) {
        if !self.pending_despawns.is_empty() {
            self.pending_despawns.sort_by_key(|id| id.0);
            self.pending_despawns.dedup();
            let pending = &self.pending_despawns;
            self.entities.retain(|entity| {
                pending
                    .binary_search_by_key(&entity.id.0, |id| id.0)
                    .is_err()
            });
            self.pending_spawns.retain(|entity| {
                pending
                    .binary_search_by_key(&entity.id.0, |id| id.0)
                    .is_err()
            });
            self.pending_despawns.clear();
        }

        self.entities.append(&mut self.pending_spawns);
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    pub fn transform(&self, id: EntityId) -> Result<&Transform, SceneError> {
        self.find_entity(id)
            .map(|entity| &entity.transform)
            .ok_or(SceneError::MissingEntity(id))
    }

    pub fn transform_mut(&mut self, id: EntityId) -> Result<&mut Transform, SceneError> {
        self.find_entity_mut(id)
            .map(|entity| &mut entity.transform)
            .ok_or(SceneError::MissingEntity(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_close(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).abs().max_element() <= 1e-5,
            "{actual:?} vs {expected:?}"
        );
    }

    #[test]
    fn allocator_never_reuses_ids() {
        let mut allocator = EntityIdAllocator::default();
        let a = allocator.allocate();
        let b = allocator.allocate();
        let c = allocator.allocate();
        assert_eq!(a, EntityId(0));
        assert_eq!(b, EntityId(1));
        assert_eq!(c, EntityId(2));
    }

    #[test]
    fn spawn_is_deferred_until_apply_pending() {
        let mut world = SceneWorld::default();
        let id = world.spawn(Transform::default(), "bat");
        assert_eq!(world.entity_count(), 0);
        assert!(world.transform(id).is_err());

        world.apply_pending();
        assert_eq!(world.entity_count(), 1);
        assert!(world.transform(id).is_ok());
    }

    #[test]
    fn duplicate_pending_despawns_are_safe_and_idempotent() {
        let mut world = SceneWorld::default();
        let a = world.spawn(Transform::default(), "a");
        let b = world.spawn(Transform::default(), "b");
        world.apply_pending();

        assert!(world.despawn(a));
        assert!(world.despawn(a));
        world.apply_pending();

        assert_eq!(world.entity_count(), 1);
        assert!(world.find_entity(b).is_some());
        assert!(!world.despawn(a));
    }

    #[test]
    fn despawn_of_pending_spawn_never_lands() {
        let mut world = SceneWorld::default();
        let id = world.spawn(Transform::default(), "ghost");
        assert!(world.despawn(id));
        world.apply_pending();
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn missing_entity_is_reported() {
        let mut world = SceneWorld::default();
        assert_eq!(
            world.transform_mut(EntityId(9)).err(),
            Some(SceneError::MissingEntity(EntityId(9)))
        );
    }

    #[test]
    fn matrix_mirrors_x_when_turned_around_y() {
        let mut transform = Transform::from_translation(Vec3::new(2.0, 1.0, 0.0));
        transform.set_rotation(Vec3::new(0.0, 180.0, 0.0));

        let point = transform.matrix().transform_point3(Vec3::new(1.0, 0.5, 0.0));
        assert_vec3_close(point, Vec3::new(1.0, 1.5, 0.0));
    }
}
