use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Simple entity storage using a flat Vec.
/// Designed for small-to-medium entity counts (hundreds, not millions).
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(256),
        }
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity by ID. Returns the removed entity if found.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        if let Some(idx) = self.entities.iter().position(|e| e.id == id) {
            Some(self.entities.swap_remove(idx))
        } else {
            None
        }
    }

    /// Get a reference to an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Whether an entity with this ID is part of the scene.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.iter().any(|e| e.id == id)
    }

    /// Iterate over all entities.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Iterate over all entities mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    /// Re-express a world-space position in the local space of `parent`.
    /// Falls back to the world position when the parent is not in the scene.
    pub fn to_local_of(&self, parent: EntityId, world_pos: Vec2) -> Vec2 {
        match self.get(parent) {
            Some(p) => {
                let d = world_pos - p.pos;
                let (sin, cos) = (-p.rotation).sin_cos();
                Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
            }
            None => world_pos,
        }
    }

    /// Number of entities in the scene.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Clear all entities.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id).with_pos(Vec2::new(10.0, 20.0)));
        let e = scene.get(id).unwrap();
        assert_eq!(e.pos, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn despawn_removes_entity() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id));
        assert_eq!(scene.len(), 1);
        scene.despawn(id);
        assert!(scene.is_empty());
        assert!(!scene.contains(id));
    }

    #[test]
    fn find_by_tag() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("hero"));
        scene.spawn(Entity::new(EntityId(2)).with_tag("platform"));
        let hero = scene.find_by_tag("hero").unwrap();
        assert_eq!(hero.id, EntityId(1));
    }

    #[test]
    fn to_local_of_translates_and_rotates() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_pos(Vec2::new(100.0, 50.0)));
        let local = scene.to_local_of(EntityId(1), Vec2::new(130.0, 50.0));
        assert_eq!(local, Vec2::new(30.0, 0.0));

        scene.get_mut(EntityId(1)).unwrap().rotation = std::f32::consts::FRAC_PI_2;
        let local = scene.to_local_of(EntityId(1), Vec2::new(100.0, 80.0));
        assert!((local.x - 30.0).abs() < 1e-4, "local={local:?}");
        assert!(local.y.abs() < 1e-4, "local={local:?}");
    }

    #[test]
    fn to_local_of_missing_parent_is_identity() {
        let scene = Scene::new();
        let p = Vec2::new(5.0, 6.0);
        assert_eq!(scene.to_local_of(EntityId(9), p), p);
    }
}
