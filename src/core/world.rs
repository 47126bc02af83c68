use glam::Vec2;
use rapier2d::prelude::*;
use std::sync::Mutex;

use crate::api::types::{CollisionPhase, CrossSide, EntityId, RigidKind};

// ---------------------------------------------------------------------------
// Conversion helpers (private) — glam ↔ solver math
// ---------------------------------------------------------------------------

fn to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn from_na(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn to_point(v: Vec2) -> Point<Real> {
    point![v.x, v.y]
}

fn iso_to_pos_rot(iso: &Isometry<Real>) -> (Vec2, f32) {
    let pos = Vec2::new(iso.translation.x, iso.translation.y);
    let rot = iso.rotation.angle();
    (pos, rot)
}

fn kind_to_rapier(kind: RigidKind) -> RigidBodyType {
    match kind {
        RigidKind::Static => RigidBodyType::Fixed,
        RigidKind::Kinematic => RigidBodyType::KinematicVelocityBased,
        RigidKind::Dynamic => RigidBodyType::Dynamic,
    }
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Solver-facing description of a body at creation time.
///
/// All lengths are already in simulation units; the binding layer converts
/// from pixels before building one of these.
#[derive(Debug, Clone, Copy)]
pub struct BodyParams {
    pub kind: RigidKind,
    pub position: Vec2,
    pub rotation: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub gravity_scale: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Continuous collision detection for fast movers.
    pub bullet: bool,
    pub allow_rotation: bool,
    pub allow_sleep: bool,
}

impl BodyParams {
    pub fn new(kind: RigidKind) -> Self {
        Self {
            kind,
            position: Vec2::ZERO,
            rotation: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            gravity_scale: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            bullet: false,
            allow_rotation: true,
            allow_sleep: true,
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.linear_velocity = vel;
        self
    }
}

/// Geometry of a single fixture, in simulation units local to the body.
#[derive(Debug, Clone)]
pub enum FixtureShape {
    Cuboid { half_extents: Vec2, center: Vec2 },
    Ball { radius: f32, center: Vec2 },
    Segment { a: Vec2, b: Vec2 },
    ConvexPolygon { points: Vec<Vec2> },
}

/// A fixture ready to be attached to a body: shape plus filter bits, sensor
/// flag, density and the optional one-way-platform tag.
#[derive(Debug, Clone)]
pub struct FixtureParams {
    pub shape: FixtureShape,
    pub category_bits: u16,
    pub mask_bits: u16,
    pub sensor: bool,
    pub density: f32,
    pub cross_side: Option<CrossSide>,
}

/// Handle pair owned by a binding, referencing solver internals.
///
/// Never exposed past the binding layer: bindings own exactly one body and
/// all fixtures attached to it.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub(crate) body: RigidBodyHandle,
    pub(crate) colliders: Vec<ColliderHandle>,
}

/// A buffered begin/end contact, drained after the solver step returns.
#[derive(Debug, Clone, Copy)]
pub struct ContactRecord {
    pub phase: CollisionPhase,
    pub collider1: ColliderHandle,
    pub collider2: ColliderHandle,
    /// World-space manifold normal at the time the event fired.
    pub normal: Vec2,
}

// ---------------------------------------------------------------------------
// Contact buffering and pre-solve hooks
// ---------------------------------------------------------------------------

/// Buffers raw solver events so nothing scene-facing runs on the solver's
/// call stack. Drained exactly once per step.
struct ContactBuffer {
    events: Mutex<Vec<(CollisionEvent, Vec2)>>,
}

impl ContactBuffer {
    fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    fn drain(&self) -> Vec<(CollisionEvent, Vec2)> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl EventHandler for ContactBuffer {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        contact_pair: Option<&ContactPair>,
    ) {
        let normal = contact_pair
            .and_then(|pair| pair.manifolds.first())
            .map(|m| Vec2::new(m.data.normal.x, m.data.normal.y))
            .unwrap_or(Vec2::ZERO);
        self.events.lock().unwrap().push((event, normal));
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
        // Contact force events are not part of this layer's surface.
    }
}

/// Pre-solve hook realizing one-way platforms: a contact whose normal fails
/// the tagged fixture's side check is disabled for this step only.
struct CrossSideHooks;

impl CrossSideHooks {
    fn side_of(colliders: &ColliderSet, handle: ColliderHandle) -> Option<CrossSide> {
        colliders
            .get(handle)
            .and_then(|c| CrossSide::from_tag(c.user_data))
    }
}

impl PhysicsHooks for CrossSideHooks {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        // The solver normal points out of the first collider; flip it when
        // the tag sits on the second so the side check always sees the
        // normal leaving the tagged fixture.
        let normal = Vec2::new(context.normal.x, context.normal.y);
        let blocked = Self::side_of(context.colliders, context.collider1)
            .is_some_and(|side| side.blocks(normal))
            || Self::side_of(context.colliders, context.collider2)
                .is_some_and(|side| side.blocks(-normal));
        if blocked {
            context.solver_contacts.clear();
        }
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all solver boilerplate into a single struct: body/collider sets, the
/// stepping pipeline, the contact buffer and the one-way-platform hook.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    contact_buffer: ContactBuffer,
    hooks: CrossSideHooks,
    sleeping_allowed: bool,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector, in
    /// simulation units with the y axis pointing up (downward gravity is
    /// negative y).
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            contact_buffer: ContactBuffer::new(),
            hooks: CrossSideHooks,
            sleeping_allowed: true,
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = to_na(gravity);
    }

    pub fn gravity(&self) -> Vec2 {
        from_na(&self.gravity)
    }

    /// Globally allow or forbid bodies to fall asleep. Applies to every body
    /// already in the world and to bodies created afterwards.
    pub fn allow_sleeping(&mut self, allowed: bool) {
        self.sleeping_allowed = allowed;
        for (_, rb) in self.bodies.iter_mut() {
            *rb.activation_mut() = if allowed {
                RigidBodyActivation::active()
            } else {
                RigidBodyActivation::cannot_sleep()
            };
            if !allowed {
                rb.wake_up(true);
            }
        }
    }

    /// Reset accumulated forces and torques on every body.
    pub fn clear_forces(&mut self) {
        for (_, rb) in self.bodies.iter_mut() {
            rb.reset_forces(false);
            rb.reset_torques(false);
        }
    }

    /// Translate every body by `-shift` (simulation units), re-expressing the
    /// whole world around a new origin. The broad phase has to re-index every
    /// moved body, so use sparingly.
    pub fn shift_origin(&mut self, shift: Vec2) {
        let shift = to_na(shift);
        for (_, rb) in self.bodies.iter_mut() {
            let t = *rb.translation() - shift;
            rb.set_translation(t, false);
        }
    }

    /// Create a rigid body with no fixtures yet and return its handle pair.
    /// The EntityId is stored in the body's `user_data` as a weak
    /// back-reference for contact resolution.
    pub fn create_body(&mut self, entity: EntityId, params: &BodyParams) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(kind_to_rapier(params.kind))
            .translation(to_na(params.position))
            .rotation(params.rotation)
            .linvel(to_na(params.linear_velocity))
            .angvel(params.angular_velocity)
            .gravity_scale(params.gravity_scale)
            .linear_damping(params.linear_damping)
            .angular_damping(params.angular_damping)
            .ccd_enabled(params.bullet)
            .locked_axes(if params.allow_rotation {
                LockedAxes::empty()
            } else {
                LockedAxes::ROTATION_LOCKED
            })
            .can_sleep(params.allow_sleep && self.sleeping_allowed)
            .user_data(entity.0 as u128)
            .build();

        PhysicsBody {
            body: self.bodies.insert(rb),
            colliders: Vec::new(),
        }
    }

    /// Build a fixture and attach it to the body. Returns `None` (after
    /// reporting) when the geometry cannot produce a collider, e.g. a
    /// degenerate polygon hull.
    pub fn attach_fixture(
        &mut self,
        body: &mut PhysicsBody,
        params: &FixtureParams,
    ) -> Option<ColliderHandle> {
        let mut builder = match &params.shape {
            FixtureShape::Cuboid {
                half_extents,
                center,
            } => ColliderBuilder::cuboid(half_extents.x, half_extents.y)
                .translation(to_na(*center)),
            FixtureShape::Ball { radius, center } => {
                ColliderBuilder::ball(*radius).translation(to_na(*center))
            }
            FixtureShape::Segment { a, b } => ColliderBuilder::segment(to_point(*a), to_point(*b)),
            FixtureShape::ConvexPolygon { points } => {
                let pts: Vec<Point<Real>> = points.iter().map(|p| to_point(*p)).collect();
                match ColliderBuilder::convex_hull(&pts) {
                    Some(builder) => builder,
                    None => {
                        log::warn!(
                            "degenerate polygon fixture ({} vertices) produced no collider",
                            points.len()
                        );
                        return None;
                    }
                }
            }
        };

        builder = builder
            .sensor(params.sensor)
            .density(params.density)
            .collision_groups(InteractionGroups::new(
                Group::from_bits_truncate(params.category_bits as u32),
                Group::from_bits_truncate(params.mask_bits as u32),
            ))
            .active_events(ActiveEvents::COLLISION_EVENTS);

        if let Some(side) = params.cross_side {
            builder = builder
                .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS)
                .user_data(side.to_tag());
        }

        let handle = self
            .colliders
            .insert_with_parent(builder.build(), body.body, &mut self.bodies);
        body.colliders.push(handle);
        Some(handle)
    }

    /// Remove a body and all its fixtures from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Step the simulation and append the buffered begin/end contacts to
    /// `out`, in the order the solver raised them.
    pub fn step_into(&mut self, out: &mut Vec<ContactRecord>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &self.hooks,
            &self.contact_buffer,
        );

        for (event, normal) in self.contact_buffer.drain() {
            let (h1, h2, phase) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, CollisionPhase::Start),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, CollisionPhase::End),
            };
            out.push(ContactRecord {
                phase,
                collider1: h1,
                collider2: h2,
                normal,
            });
        }
    }

    // -- Body pass-throughs --

    /// Current position and rotation of a body, in simulation units.
    pub fn body_position(&self, body: &PhysicsBody) -> (Vec2, f32) {
        self.bodies
            .get(body.body)
            .map(|rb| iso_to_pos_rot(rb.position()))
            .unwrap_or((Vec2::ZERO, 0.0))
    }

    pub fn set_body_position(&mut self, body: &PhysicsBody, pos: Vec2, wake: bool) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.set_translation(to_na(pos), wake);
        }
    }

    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body)
            .map(|rb| from_na(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.set_linvel(to_na(vel), true);
        }
    }

    pub fn angular_velocity(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body)
            .map(|rb| rb.angvel())
            .unwrap_or(0.0)
    }

    pub fn set_angular_velocity(&mut self, body: &PhysicsBody, vel: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.set_angvel(vel, true);
        }
    }

    pub fn gravity_scale(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body)
            .map(|rb| rb.gravity_scale())
            .unwrap_or(1.0)
    }

    pub fn set_gravity_scale(&mut self, body: &PhysicsBody, scale: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.set_gravity_scale(scale, true);
        }
    }

    pub fn linear_damping(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body)
            .map(|rb| rb.linear_damping())
            .unwrap_or(0.0)
    }

    pub fn set_linear_damping(&mut self, body: &PhysicsBody, damping: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.set_linear_damping(damping);
        }
    }

    pub fn angular_damping(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body)
            .map(|rb| rb.angular_damping())
            .unwrap_or(0.0)
    }

    pub fn set_angular_damping(&mut self, body: &PhysicsBody, damping: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.set_angular_damping(damping);
        }
    }

    pub fn is_bullet(&self, body: &PhysicsBody) -> bool {
        self.bodies
            .get(body.body)
            .map(|rb| rb.is_ccd_enabled())
            .unwrap_or(false)
    }

    pub fn set_bullet(&mut self, body: &PhysicsBody, bullet: bool) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.enable_ccd(bullet);
        }
    }

    pub fn rotation_allowed(&self, body: &PhysicsBody) -> bool {
        self.bodies
            .get(body.body)
            .map(|rb| !rb.locked_axes().contains(LockedAxes::ROTATION_LOCKED))
            .unwrap_or(true)
    }

    pub fn set_rotation_allowed(&mut self, body: &PhysicsBody, allowed: bool) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.lock_rotations(!allowed, true);
        }
    }

    /// Per-body sleep permission. Overridden globally by `allow_sleeping`.
    pub fn set_sleep_allowed(&mut self, body: &PhysicsBody, allowed: bool) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            *rb.activation_mut() = if allowed && self.sleeping_allowed {
                RigidBodyActivation::active()
            } else {
                RigidBodyActivation::cannot_sleep()
            };
        }
    }

    pub fn is_sleeping(&self, body: &PhysicsBody) -> bool {
        self.bodies
            .get(body.body)
            .map(|rb| rb.is_sleeping())
            .unwrap_or(false)
    }

    pub fn wake(&mut self, body: &PhysicsBody) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.wake_up(true);
        }
    }

    pub fn sleep(&mut self, body: &PhysicsBody) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.sleep();
        }
    }

    pub fn mass(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body)
            .map(|rb| rb.mass())
            .unwrap_or(0.0)
    }

    /// Toggle whether the body takes part in the simulation. A disabled body
    /// keeps its fixtures and state.
    pub fn set_body_enabled(&mut self, body: &PhysicsBody, enabled: bool) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.set_enabled(enabled);
        }
    }

    pub fn body_enabled(&self, body: &PhysicsBody) -> bool {
        self.bodies
            .get(body.body)
            .map(|rb| rb.is_enabled())
            .unwrap_or(false)
    }

    // -- Forces and impulses (all wake the body) --

    pub fn apply_force(&mut self, body: &PhysicsBody, force: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.add_force(to_na(force), true);
        }
    }

    pub fn apply_force_at(&mut self, body: &PhysicsBody, force: Vec2, point: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.add_force_at_point(to_na(force), to_point(point), true);
        }
    }

    pub fn apply_impulse(&mut self, body: &PhysicsBody, impulse: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.apply_impulse(to_na(impulse), true);
        }
    }

    pub fn apply_impulse_at(&mut self, body: &PhysicsBody, impulse: Vec2, point: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.apply_impulse_at_point(to_na(impulse), to_point(point), true);
        }
    }

    pub fn apply_torque(&mut self, body: &PhysicsBody, torque: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.add_torque(torque, true);
        }
    }

    pub fn apply_angular_impulse(&mut self, body: &PhysicsBody, impulse: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body) {
            rb.apply_torque_impulse(impulse, true);
        }
    }

    // -- Lookups --

    /// Resolve a collider back to the entity owning its body, via the body's
    /// `user_data` back-reference.
    pub fn entity_of(&self, collider: ColliderHandle) -> Option<EntityId> {
        let collider = self.colliders.get(collider)?;
        let body = self.bodies.get(collider.parent()?)?;
        Some(EntityId(body.user_data as u32))
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of fixtures in the simulation.
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
