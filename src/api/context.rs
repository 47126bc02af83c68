use glam::Vec2;

use crate::api::types::{CollisionMessage, EntityId};
use crate::components::body::{RigidBodyComponent, RigidBodyDesc, ShapeDesc};
use crate::components::entity::Entity;
use crate::core::categories::CategoryRegistry;
use crate::core::convert::point_to_sim;
use crate::core::scene::Scene;
use crate::core::world::{ContactRecord, PhysicsBody, PhysicsWorld};
use crate::error::PhysicsError;

fn handles_of(scene: &Scene, id: EntityId) -> Option<&PhysicsBody> {
    scene.get(id)?.body.as_ref()?.handles()
}

/// Default gravity, simulation units, y-up (downward is negative).
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -10.0);

/// Axis-aligned pixel-space rectangle used for boundary culling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoundaryRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// The per-simulation-run context: owns the scene, the solver world, the
/// category registry, the optional culling boundary and the per-frame
/// collision outbox.
///
/// The external scheduler calls [`PhysicsContext::step`] once per logical
/// frame; everything in this layer is single-threaded and cooperative.
pub struct PhysicsContext {
    pub scene: Scene,
    pub world: PhysicsWorld,
    categories: CategoryRegistry,
    boundary: Option<BoundaryRect>,
    enabled: bool,
    messages: Vec<CollisionMessage>,
    contact_scratch: Vec<ContactRecord>,
}

impl PhysicsContext {
    pub fn new() -> Self {
        Self::with_gravity(DEFAULT_GRAVITY)
    }

    pub fn with_gravity(gravity: Vec2) -> Self {
        Self {
            scene: Scene::new(),
            world: PhysicsWorld::new(gravity),
            categories: CategoryRegistry::new(),
            boundary: None,
            enabled: true,
            messages: Vec::new(),
            contact_scratch: Vec::new(),
        }
    }

    // -- World configuration pass-throughs --

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.world.set_gravity(gravity);
    }

    pub fn allow_sleeping(&mut self, allowed: bool) {
        self.world.allow_sleeping(allowed);
    }

    pub fn clear_forces(&mut self) {
        self.world.clear_forces();
    }

    pub fn shift_origin(&mut self, shift: Vec2) {
        self.world.shift_origin(shift);
    }

    /// Configure the pixel-space rectangle bodies must stay inside; `None`
    /// disables boundary culling.
    pub fn set_boundary(&mut self, boundary: Option<BoundaryRect>) {
        self.boundary = boundary;
    }

    pub fn boundary(&self) -> Option<BoundaryRect> {
        self.boundary
    }

    /// Idempotent driver toggle. While disabled, `step` is a no-op and the
    /// simulation simply does not advance.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The category registry owned by this run, for hosts that want to
    /// pre-allocate bits in a fixed order.
    pub fn categories_mut(&mut self) -> &mut CategoryRegistry {
        &mut self.categories
    }

    // -- Spawning and binding lifecycle --

    /// Spawn an entity and activate a rigid body binding for it in one step.
    pub fn spawn_with_body(&mut self, entity: Entity, desc: RigidBodyDesc) -> EntityId {
        let id = entity.id;
        self.scene.spawn(entity);
        // The entity was just spawned, so activation cannot fail.
        let _ = self.attach_body(id, desc);
        id
    }

    /// Activate a rigid body binding for an entity already in the scene.
    ///
    /// This is the one hard precondition of the layer: the entity must be
    /// part of the running scene. A previous binding on the entity is
    /// destroyed first.
    pub fn attach_body(&mut self, id: EntityId, desc: RigidBodyDesc) -> Result<(), PhysicsError> {
        let Some(entity) = self.scene.get_mut(id) else {
            return Err(PhysicsError::NotInScene(id));
        };
        let (pos, rot, size) = (entity.pos, entity.rotation, entity.size);
        if let Some(mut old) = entity.body.take() {
            old.destroy(&mut self.world);
        }
        let mut binding = RigidBodyComponent::new(desc);
        binding.activate(id, &mut self.world, &mut self.categories, pos, rot, size);
        entity.body = Some(binding);
        Ok(())
    }

    /// Append a shape to an entity's binding; buffered if the binding is not
    /// activated yet, realized immediately otherwise.
    pub fn add_shape(&mut self, id: EntityId, shape: ShapeDesc) -> Result<(), PhysicsError> {
        let Some(entity) = self.scene.get_mut(id) else {
            return Err(PhysicsError::NotInScene(id));
        };
        let bounds = entity.size;
        let Some(binding) = entity.body.as_mut() else {
            return Err(PhysicsError::NoBinding(id));
        };
        binding.add_shape(shape, &mut self.world, &mut self.categories, bounds);
        Ok(())
    }

    /// Despawn an entity, cleaning up its physics body if present.
    pub fn despawn(&mut self, id: EntityId) {
        if let Some(mut entity) = self.scene.despawn(id) {
            if let Some(body) = entity.body.as_mut() {
                body.destroy(&mut self.world);
            }
        }
    }

    /// Toggle an entity's body in and out of the simulation without
    /// destroying it.
    pub fn set_entity_enabled(&mut self, id: EntityId, enabled: bool) {
        if let Some(binding) = self.scene.get(id).and_then(|e| e.body.as_ref()) {
            binding.set_enabled(&mut self.world, enabled);
        }
    }

    // -- Per-entity body commands and accessors --

    /// Write a pixel-space position into the body, waking it unless static.
    pub fn set_position(&mut self, id: EntityId, pos: Vec2) {
        if let Some(binding) = self.scene.get(id).and_then(|e| e.body.as_ref()) {
            binding.set_position(&mut self.world, pos);
        }
    }

    /// Update only the velocity axes given, leaving the other unchanged.
    pub fn set_velocity(&mut self, id: EntityId, x: Option<f32>, y: Option<f32>) {
        if let Some(binding) = self.scene.get(id).and_then(|e| e.body.as_ref()) {
            binding.set_velocity(&mut self.world, x, y);
        }
    }

    pub fn velocity(&self, id: EntityId) -> Vec2 {
        handles_of(&self.scene, id)
            .map(|h| self.world.velocity(h))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn apply_force(&mut self, id: EntityId, force: Vec2) {
        if let Some(h) = handles_of(&self.scene, id) {
            self.world.apply_force(h, force);
        }
    }

    /// Apply a force at a pixel-space world point.
    pub fn apply_force_at(&mut self, id: EntityId, force: Vec2, point: Vec2) {
        if let Some(h) = handles_of(&self.scene, id) {
            self.world.apply_force_at(h, force, point_to_sim(point));
        }
    }

    pub fn apply_impulse(&mut self, id: EntityId, impulse: Vec2) {
        if let Some(h) = handles_of(&self.scene, id) {
            self.world.apply_impulse(h, impulse);
        }
    }

    /// Apply an impulse at a pixel-space world point.
    pub fn apply_impulse_at(&mut self, id: EntityId, impulse: Vec2, point: Vec2) {
        if let Some(h) = handles_of(&self.scene, id) {
            self.world.apply_impulse_at(h, impulse, point_to_sim(point));
        }
    }

    pub fn apply_torque(&mut self, id: EntityId, torque: f32) {
        if let Some(h) = handles_of(&self.scene, id) {
            self.world.apply_torque(h, torque);
        }
    }

    pub fn apply_angular_impulse(&mut self, id: EntityId, impulse: f32) {
        if let Some(h) = handles_of(&self.scene, id) {
            self.world.apply_angular_impulse(h, impulse);
        }
    }

    pub fn gravity_scale(&self, id: EntityId) -> f32 {
        handles_of(&self.scene, id)
            .map(|h| self.world.gravity_scale(h))
            .unwrap_or(1.0)
    }

    pub fn set_gravity_scale(&mut self, id: EntityId, scale: f32) {
        if let Some(h) = handles_of(&self.scene, id) {
            self.world.set_gravity_scale(h, scale);
        }
    }

    pub fn mass(&self, id: EntityId) -> f32 {
        handles_of(&self.scene, id)
            .map(|h| self.world.mass(h))
            .unwrap_or(0.0)
    }

    pub fn damping(&self, id: EntityId) -> (f32, f32) {
        handles_of(&self.scene, id)
            .map(|h| (self.world.linear_damping(h), self.world.angular_damping(h)))
            .unwrap_or((0.0, 0.0))
    }

    pub fn set_damping(&mut self, id: EntityId, linear: f32, angular: f32) {
        if let Some(h) = handles_of(&self.scene, id) {
            self.world.set_linear_damping(h, linear);
            self.world.set_angular_damping(h, angular);
        }
    }

    pub fn is_bullet(&self, id: EntityId) -> bool {
        handles_of(&self.scene, id)
            .map(|h| self.world.is_bullet(h))
            .unwrap_or(false)
    }

    pub fn set_bullet(&mut self, id: EntityId, bullet: bool) {
        if let Some(h) = handles_of(&self.scene, id) {
            self.world.set_bullet(h, bullet);
        }
    }

    pub fn rotation_allowed(&self, id: EntityId) -> bool {
        handles_of(&self.scene, id)
            .map(|h| self.world.rotation_allowed(h))
            .unwrap_or(true)
    }

    pub fn set_rotation_allowed(&mut self, id: EntityId, allowed: bool) {
        if let Some(h) = handles_of(&self.scene, id) {
            self.world.set_rotation_allowed(h, allowed);
        }
    }

    pub fn set_sleep_allowed(&mut self, id: EntityId, allowed: bool) {
        if let Some(h) = handles_of(&self.scene, id) {
            self.world.set_sleep_allowed(h, allowed);
        }
    }

    pub fn sleep(&mut self, id: EntityId) {
        if let Some(h) = handles_of(&self.scene, id) {
            self.world.sleep(h);
        }
    }

    /// Sleeping flag, exposed inverted.
    pub fn is_awake(&self, id: EntityId) -> bool {
        handles_of(&self.scene, id)
            .map(|h| !self.world.is_sleeping(h))
            .unwrap_or(false)
    }

    pub fn wake(&mut self, id: EntityId) {
        if let Some(h) = handles_of(&self.scene, id) {
            self.world.wake(h);
        }
    }

    // -- Driver --

    /// Collision messages produced by the most recent `step`.
    pub fn collision_messages(&self) -> &[CollisionMessage] {
        &self.messages
    }

    /// Advance the simulation by one frame delta, then drain the buffered
    /// contacts into semantic messages and sync body transforms back into
    /// the scene. No-op while disabled.
    pub fn step(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }
        self.messages.clear();
        self.world.set_dt(dt);

        // The contact queue is drained on a buffer taken out of the world so
        // nothing can mutate it mid-drain; it never survives across steps.
        let mut records = std::mem::take(&mut self.contact_scratch);
        records.clear();
        self.world.step_into(&mut records);
        self.dispatch_contacts(&records);
        self.contact_scratch = records;

        self.sync_bindings();
    }

    /// Resolve each buffered contact back to the entities owning the two
    /// fixtures and emit one message per side that registered a listener.
    /// The two sides are evaluated independently: a missing or listener-less
    /// side never suppresses delivery to the other.
    fn dispatch_contacts(&mut self, records: &[ContactRecord]) {
        for record in records {
            let first = self.world.entity_of(record.collider1);
            let second = self.world.entity_of(record.collider2);
            for (target, peer) in [(first, second), (second, first)] {
                let Some(target) = target else { continue };
                let Some(entity) = self.scene.get(target) else {
                    continue;
                };
                if !entity.active || entity.body.is_none() || !entity.listeners.accepts(record.phase)
                {
                    continue;
                }
                let other = peer.filter(|id| self.scene.contains(*id));
                self.messages.push(CollisionMessage {
                    target,
                    other,
                    normal: record.normal,
                    phase: record.phase,
                });
            }
        }
    }

    /// Per-frame transform sync: read each non-static body's pose, cull
    /// entities that left the boundary, re-express positions in parent-local
    /// space and write them (offset by the pivot) into the scene nodes.
    /// Collect-then-apply, so the scene is never mutated while iterating.
    fn sync_bindings(&mut self) {
        let mut updates: Vec<(EntityId, Vec2, f32)> = Vec::new();
        let mut culled: Vec<EntityId> = Vec::new();

        for entity in self.scene.iter() {
            if !entity.active {
                continue;
            }
            let Some(binding) = &entity.body else { continue };
            let Some((world_pos, rotation)) = binding.synced_pose(&self.world) else {
                continue;
            };
            if let Some(boundary) = &self.boundary {
                if !boundary.contains(world_pos) {
                    culled.push(entity.id);
                    continue;
                }
            }
            let pos = match entity.parent {
                Some(parent) => self.scene.to_local_of(parent, world_pos),
                None => world_pos,
            };
            updates.push((entity.id, pos + entity.pivot, rotation));
        }

        for (id, pos, rotation) in updates {
            if let Some(entity) = self.scene.get_mut(id) {
                entity.pos = pos;
                entity.rotation = rotation;
            }
        }
        for id in culled {
            self.despawn(id);
        }
    }
}

impl Default for PhysicsContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::CollisionPhase;
    use crate::components::entity::CollisionListeners;

    const DT: f32 = 1.0 / 60.0;

    fn dynamic_circle(diameter: f32) -> RigidBodyDesc {
        RigidBodyDesc::dynamic().with_shape(ShapeDesc::circle(diameter))
    }

    #[test]
    fn spawned_body_position_is_converted() {
        let mut ctx = PhysicsContext::new();
        let id = ctx.spawn_with_body(
            Entity::new(EntityId(1)).with_pos(Vec2::new(100.0, 200.0)),
            dynamic_circle(20.0),
        );

        let handles = handles_of(&ctx.scene, id).unwrap().clone();
        let (pos, _) = ctx.world.body_position(&handles);
        assert!((pos.x - 2.0).abs() < 1e-5, "pos={pos:?}");
        assert!((pos.y - 4.0).abs() < 1e-5, "pos={pos:?}");
    }

    #[test]
    fn gravity_accelerates_downward_each_step() {
        let mut ctx = PhysicsContext::new();
        let id = ctx.spawn_with_body(
            Entity::new(EntityId(1)).with_pos(Vec2::new(100.0, 200.0)),
            dynamic_circle(20.0),
        );

        ctx.step(DT);
        let v1 = ctx.velocity(id).y;
        assert!(v1 < 0.0, "one step under default gravity: vy={v1}");
        ctx.step(DT);
        let v2 = ctx.velocity(id).y;
        assert!(v2 < v1, "velocity should keep growing in magnitude: {v2} vs {v1}");
    }

    #[test]
    fn step_syncs_entity_transform() {
        let mut ctx = PhysicsContext::new();
        let id = ctx.spawn_with_body(
            Entity::new(EntityId(1)).with_pos(Vec2::new(100.0, 200.0)),
            dynamic_circle(20.0),
        );

        for _ in 0..10 {
            ctx.step(DT);
        }
        let entity = ctx.scene.get(id).unwrap();
        assert!(
            entity.pos.y < 200.0,
            "entity should have been pulled down: y={}",
            entity.pos.y
        );
        assert!((entity.pos.x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn static_bindings_are_never_synced() {
        let mut ctx = PhysicsContext::new();
        let id = ctx.spawn_with_body(
            Entity::new(EntityId(1)).with_pos(Vec2::new(100.0, 100.0)),
            RigidBodyDesc::fixed(),
        );

        // Move the node directly; the physics layer must not overwrite it.
        ctx.scene.get_mut(id).unwrap().pos = Vec2::new(123.0, 456.0);
        for _ in 0..5 {
            ctx.step(DT);
        }
        assert_eq!(ctx.scene.get(id).unwrap().pos, Vec2::new(123.0, 456.0));
    }

    #[test]
    fn pivot_offsets_the_written_position() {
        let mut ctx = PhysicsContext::with_gravity(Vec2::ZERO);
        let id = ctx.spawn_with_body(
            Entity::new(EntityId(1))
                .with_pos(Vec2::new(100.0, 200.0))
                .with_pivot(Vec2::new(10.0, 5.0)),
            dynamic_circle(20.0),
        );

        ctx.step(DT);
        let entity = ctx.scene.get(id).unwrap();
        assert!((entity.pos.x - 110.0).abs() < 1e-3, "pos={:?}", entity.pos);
        assert!((entity.pos.y - 205.0).abs() < 1e-3, "pos={:?}", entity.pos);
    }

    #[test]
    fn child_position_is_expressed_in_parent_space() {
        let mut ctx = PhysicsContext::with_gravity(Vec2::ZERO);
        ctx.scene
            .spawn(Entity::new(EntityId(1)).with_pos(Vec2::new(100.0, 0.0)));
        let child = ctx.spawn_with_body(
            Entity::new(EntityId(2))
                .with_pos(Vec2::new(150.0, 50.0))
                .with_parent(EntityId(1)),
            dynamic_circle(10.0),
        );

        ctx.step(DT);
        let entity = ctx.scene.get(child).unwrap();
        assert!((entity.pos.x - 50.0).abs() < 1e-3, "pos={:?}", entity.pos);
        assert!((entity.pos.y - 50.0).abs() < 1e-3, "pos={:?}", entity.pos);
    }

    #[test]
    fn boundary_culls_outside_bodies_on_next_tick() {
        let mut ctx = PhysicsContext::with_gravity(Vec2::ZERO);
        ctx.set_boundary(Some(BoundaryRect::new(0.0, 0.0, 800.0, 600.0)));

        let outside = ctx.spawn_with_body(
            Entity::new(EntityId(1)).with_pos(Vec2::new(1000.0, 1000.0)),
            dynamic_circle(20.0),
        );
        let inside = ctx.spawn_with_body(
            Entity::new(EntityId(2)).with_pos(Vec2::new(400.0, 300.0)),
            dynamic_circle(20.0),
        );

        ctx.step(DT);
        assert!(!ctx.scene.contains(outside), "outside entity must be culled");
        assert!(ctx.scene.contains(inside));
        assert_eq!(ctx.world.body_count(), 1, "culling removes the body too");
    }

    #[test]
    fn no_boundary_means_no_culling() {
        let mut ctx = PhysicsContext::with_gravity(Vec2::ZERO);
        let id = ctx.spawn_with_body(
            Entity::new(EntityId(1)).with_pos(Vec2::new(1.0e6, -1.0e6)),
            dynamic_circle(20.0),
        );
        for _ in 0..10 {
            ctx.step(DT);
        }
        assert!(ctx.scene.contains(id));
    }

    #[test]
    fn contact_emits_one_message_per_listening_side() {
        let mut ctx = PhysicsContext::with_gravity(Vec2::ZERO);
        let a = ctx.spawn_with_body(
            Entity::new(EntityId(1))
                .with_pos(Vec2::new(-25.0, 0.0))
                .with_listeners(CollisionListeners::BOTH),
            dynamic_circle(20.0).with_velocity(Vec2::new(4.0, 0.0)),
        );
        let b = ctx.spawn_with_body(
            Entity::new(EntityId(2))
                .with_pos(Vec2::new(25.0, 0.0))
                .with_listeners(CollisionListeners::BOTH),
            dynamic_circle(20.0).with_velocity(Vec2::new(-4.0, 0.0)),
        );

        let mut starts = Vec::new();
        for _ in 0..120 {
            ctx.step(DT);
            starts.extend(
                ctx.collision_messages()
                    .iter()
                    .filter(|m| m.phase == CollisionPhase::Start)
                    .copied(),
            );
            if !starts.is_empty() {
                break;
            }
        }

        assert_eq!(starts.len(), 2, "one message per side: {starts:?}");
        let to_a = starts.iter().find(|m| m.target == a).unwrap();
        let to_b = starts.iter().find(|m| m.target == b).unwrap();
        assert_eq!(to_a.other, Some(b));
        assert_eq!(to_b.other, Some(a));
    }

    #[test]
    fn listener_less_side_does_not_fire() {
        let mut ctx = PhysicsContext::with_gravity(Vec2::ZERO);
        let a = ctx.spawn_with_body(
            Entity::new(EntityId(1))
                .with_pos(Vec2::new(-25.0, 0.0))
                .with_listeners(CollisionListeners::BOTH),
            dynamic_circle(20.0).with_velocity(Vec2::new(4.0, 0.0)),
        );
        let _b = ctx.spawn_with_body(
            Entity::new(EntityId(2)).with_pos(Vec2::new(25.0, 0.0)),
            dynamic_circle(20.0).with_velocity(Vec2::new(-4.0, 0.0)),
        );

        let mut starts = Vec::new();
        for _ in 0..120 {
            ctx.step(DT);
            starts.extend(
                ctx.collision_messages()
                    .iter()
                    .filter(|m| m.phase == CollisionPhase::Start)
                    .copied(),
            );
            if !starts.is_empty() {
                break;
            }
        }

        assert_eq!(starts.len(), 1, "only the listening side fires: {starts:?}");
        assert_eq!(starts[0].target, a);
    }

    #[test]
    fn despawned_side_leaves_only_the_survivor_event() {
        let mut ctx = PhysicsContext::with_gravity(Vec2::ZERO);
        let a = ctx.spawn_with_body(
            Entity::new(EntityId(1))
                .with_pos(Vec2::new(-25.0, 0.0))
                .with_listeners(CollisionListeners::BOTH),
            dynamic_circle(20.0).with_velocity(Vec2::new(4.0, 0.0)),
        );
        let b = ctx.spawn_with_body(
            Entity::new(EntityId(2))
                .with_pos(Vec2::new(25.0, 0.0))
                .with_listeners(CollisionListeners::BOTH),
            dynamic_circle(20.0).with_velocity(Vec2::new(-4.0, 0.0)),
        );

        // Run until the contact begins, then destroy one participant.
        let mut touched = false;
        for _ in 0..120 {
            ctx.step(DT);
            if ctx
                .collision_messages()
                .iter()
                .any(|m| m.phase == CollisionPhase::Start)
            {
                touched = true;
                break;
            }
        }
        assert!(touched, "converging circles should touch");
        ctx.despawn(b);

        // Removing the body ends the contact; only the survivor hears it.
        let mut ends = Vec::new();
        for _ in 0..10 {
            ctx.step(DT);
            ends.extend(
                ctx.collision_messages()
                    .iter()
                    .filter(|m| m.phase == CollisionPhase::End)
                    .copied(),
            );
            if !ends.is_empty() {
                break;
            }
        }

        assert_eq!(ends.len(), 1, "exactly one end event: {ends:?}");
        assert_eq!(ends[0].target, a);
        assert_eq!(ends[0].other, None, "the peer entity is already gone");
        assert!(
            !ctx.collision_messages().iter().any(|m| m.target == b),
            "nothing may address the destroyed entity"
        );
    }

    #[test]
    fn disabled_context_does_not_advance() {
        let mut ctx = PhysicsContext::new();
        let id = ctx.spawn_with_body(
            Entity::new(EntityId(1)).with_pos(Vec2::new(100.0, 200.0)),
            dynamic_circle(20.0),
        );

        ctx.set_enabled(false);
        for _ in 0..10 {
            ctx.step(DT);
        }
        assert_eq!(ctx.velocity(id), Vec2::ZERO);
        assert_eq!(ctx.scene.get(id).unwrap().pos, Vec2::new(100.0, 200.0));

        // Re-enabling resumes from where the world left off.
        ctx.set_enabled(true);
        ctx.step(DT);
        assert!(ctx.velocity(id).y < 0.0);
    }

    #[test]
    fn attach_body_requires_a_scene_entity() {
        let mut ctx = PhysicsContext::new();
        let err = ctx
            .attach_body(EntityId(42), RigidBodyDesc::dynamic())
            .unwrap_err();
        assert_eq!(err, PhysicsError::NotInScene(EntityId(42)));
    }

    #[test]
    fn add_shape_requires_a_binding() {
        let mut ctx = PhysicsContext::new();
        ctx.scene.spawn(Entity::new(EntityId(1)));
        let err = ctx
            .add_shape(EntityId(1), ShapeDesc::circle(10.0))
            .unwrap_err();
        assert_eq!(err, PhysicsError::NoBinding(EntityId(1)));
    }

    #[test]
    fn set_velocity_per_axis() {
        let mut ctx = PhysicsContext::with_gravity(Vec2::ZERO);
        let id = ctx.spawn_with_body(
            Entity::new(EntityId(1)),
            dynamic_circle(10.0).with_velocity(Vec2::new(2.0, -1.0)),
        );

        ctx.set_velocity(id, Some(7.0), None);
        let vel = ctx.velocity(id);
        assert!((vel.x - 7.0).abs() < 1e-5);
        assert!((vel.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn despawn_cleans_up_the_body() {
        let mut ctx = PhysicsContext::new();
        let id = ctx.spawn_with_body(Entity::new(EntityId(1)), dynamic_circle(10.0));
        assert_eq!(ctx.world.body_count(), 1);
        ctx.despawn(id);
        assert_eq!(ctx.world.body_count(), 0);
        assert!(ctx.scene.is_empty());
    }

    #[test]
    fn json_desc_end_to_end() {
        let desc = RigidBodyDesc::from_json(
            r#"{ "rigidType": "dynamic", "shapes": [{ "shapeType": "circle", "width": 20 }] }"#,
        )
        .unwrap();
        let mut ctx = PhysicsContext::new();
        let id = ctx.spawn_with_body(
            Entity::new(EntityId(1)).with_pos(Vec2::new(100.0, 200.0)),
            desc,
        );

        ctx.step(DT);
        assert!(ctx.velocity(id).y < 0.0);
    }
}
