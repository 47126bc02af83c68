use glam::Vec2;
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::types::{CrossSide, EntityId, RigidKind};
use crate::core::categories::CategoryRegistry;
use crate::core::convert::{point_to_px, point_to_sim, to_sim};
use crate::core::world::{BodyParams, FixtureParams, FixtureShape, PhysicsBody, PhysicsWorld};

fn default_one() -> f32 {
    1.0
}

/// Geometry variant of a shape descriptor. Closed set: adding a kind means
/// extending both this enum and the realization match below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "shapeType", rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned box. The offset addresses the box's local origin corner,
    /// not its center.
    Box {
        #[serde(default)]
        width: Option<f32>,
        #[serde(default)]
        height: Option<f32>,
    },
    /// Circle; `width` is the diameter.
    Circle {
        #[serde(default)]
        width: Option<f32>,
    },
    /// Line segment from the offset to offset + (width, height).
    Edge {
        #[serde(default)]
        width: Option<f32>,
        #[serde(default)]
        height: Option<f32>,
    },
    /// Convex polygon over authored pixel-space vertices.
    Polygon { points: Vec<Vec2> },
}

/// Authoring-side description of one fixture, in pixel units.
///
/// Missing dimensions fall back to the owning entity's world bounds at
/// realization time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDesc {
    #[serde(flatten)]
    pub shape: ShapeKind,
    #[serde(default)]
    pub offset: Vec2,
    /// One-way platform side, if any.
    #[serde(default)]
    pub cross_side: Option<CrossSide>,
    #[serde(default)]
    pub is_sensor: bool,
    #[serde(default = "default_one")]
    pub density: f32,
}

impl ShapeDesc {
    pub fn new(shape: ShapeKind) -> Self {
        Self {
            shape,
            offset: Vec2::ZERO,
            cross_side: None,
            is_sensor: false,
            density: 1.0,
        }
    }

    /// Box sized from the owning entity's bounds.
    pub fn auto_box() -> Self {
        Self::new(ShapeKind::Box {
            width: None,
            height: None,
        })
    }

    pub fn box_sized(width: f32, height: f32) -> Self {
        Self::new(ShapeKind::Box {
            width: Some(width),
            height: Some(height),
        })
    }

    pub fn circle(diameter: f32) -> Self {
        Self::new(ShapeKind::Circle {
            width: Some(diameter),
        })
    }

    pub fn edge(dx: f32, dy: f32) -> Self {
        Self::new(ShapeKind::Edge {
            width: Some(dx),
            height: Some(dy),
        })
    }

    pub fn polygon(points: Vec<Vec2>) -> Self {
        Self::new(ShapeKind::Polygon { points })
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_cross_side(mut self, side: CrossSide) -> Self {
        self.cross_side = Some(side);
        self
    }

    pub fn sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }
}

/// Binding configuration — the recognized authoring options.
///
/// Everything is optional except `rigidType`. Velocities and damping are in
/// solver units and passed through untouched; lengths inside `shapes` are in
/// pixels and converted at realization time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RigidBodyDesc {
    pub rigid_type: RigidKind,
    #[serde(default = "default_one")]
    pub gravity_scale: f32,
    #[serde(default)]
    pub linear_velocity: Vec2,
    #[serde(default)]
    pub angular_velocity: f32,
    #[serde(default)]
    pub linear_damping: f32,
    #[serde(default)]
    pub angular_damping: f32,
    /// Continuous collision detection for fast movers.
    #[serde(default)]
    pub bullet: bool,
    #[serde(default = "default_true")]
    pub allow_rotation: bool,
    #[serde(default = "default_true")]
    pub allow_sleep: bool,
    /// Name used to compute this body's filter bit.
    #[serde(default)]
    pub category: Option<String>,
    /// Names this body collides with; absent means collide with all. Accepts
    /// a list or a comma-delimited string.
    #[serde(default, deserialize_with = "de_category_list")]
    pub category_accepted: Option<Vec<String>>,
    /// Shape descriptors; absent means a single box matching entity bounds.
    #[serde(default)]
    pub shapes: Vec<ShapeDesc>,
    /// Marks all auto-generated/default shapes as non-physical triggers.
    #[serde(default)]
    pub is_sensor: bool,
}

fn default_true() -> bool {
    true
}

fn de_category_list<'de, D>(de: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Many(Vec<String>),
        One(String),
    }

    Ok(match Option::<Raw>::deserialize(de)? {
        None => None,
        Some(Raw::Many(names)) => Some(names),
        Some(Raw::One(joined)) => Some(
            joined
                .split(',')
                .map(|n| n.trim().to_owned())
                .filter(|n| !n.is_empty())
                .collect(),
        ),
    })
}

impl RigidBodyDesc {
    pub fn new(rigid_type: RigidKind) -> Self {
        Self {
            rigid_type,
            gravity_scale: 1.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            bullet: false,
            allow_rotation: true,
            allow_sleep: true,
            category: None,
            category_accepted: None,
            shapes: Vec::new(),
            is_sensor: false,
        }
    }

    pub fn dynamic() -> Self {
        Self::new(RigidKind::Dynamic)
    }

    pub fn fixed() -> Self {
        Self::new(RigidKind::Static)
    }

    pub fn kinematic() -> Self {
        Self::new(RigidKind::Kinematic)
    }

    /// Parse a binding configuration from its JSON authoring form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    // -- Builder pattern --

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.linear_velocity = vel;
        self
    }

    pub fn with_angular_velocity(mut self, vel: f32) -> Self {
        self.angular_velocity = vel;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn as_bullet(mut self) -> Self {
        self.bullet = true;
        self
    }

    pub fn without_rotation(mut self) -> Self {
        self.allow_rotation = false;
        self
    }

    pub fn with_category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    pub fn accepting<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_accepted = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_shape(mut self, shape: ShapeDesc) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn as_sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }
}

/// Translate one shape descriptor into solver-facing fixture parameters,
/// converting every length and offset from pixels to simulation units and
/// deriving the filter bits from the binding's category configuration.
fn fixture_params(
    shape: &ShapeDesc,
    desc: &RigidBodyDesc,
    categories: &mut CategoryRegistry,
    bounds_px: Vec2,
) -> FixtureParams {
    let offset = shape.offset;
    let geometry = match &shape.shape {
        ShapeKind::Box { width, height } => {
            let size = Vec2::new(
                width.unwrap_or(bounds_px.x),
                height.unwrap_or(bounds_px.y),
            );
            // Centered at offset + half-extents: the offset addresses the
            // local origin corner.
            FixtureShape::Cuboid {
                half_extents: point_to_sim(size * 0.5),
                center: point_to_sim(offset + size * 0.5),
            }
        }
        ShapeKind::Circle { width } => {
            let radius = width.unwrap_or(bounds_px.x) * 0.5;
            FixtureShape::Ball {
                radius: to_sim(radius),
                center: point_to_sim(offset + Vec2::splat(radius)),
            }
        }
        ShapeKind::Edge { width, height } => {
            let span = Vec2::new(
                width.unwrap_or(bounds_px.x),
                height.unwrap_or(bounds_px.y),
            );
            FixtureShape::Segment {
                a: point_to_sim(offset),
                b: point_to_sim(offset + span),
            }
        }
        ShapeKind::Polygon { points } => FixtureShape::ConvexPolygon {
            points: points.iter().map(|p| point_to_sim(*p + offset)).collect(),
        },
    };

    FixtureParams {
        shape: geometry,
        category_bits: categories.bit_for(desc.category.as_deref()),
        mask_bits: categories.mask_for(desc.category_accepted.as_deref()),
        sensor: shape.is_sensor || desc.is_sensor,
        density: shape.density,
        cross_side: shape.cross_side,
    }
}

/// Per-entity rigid body binding.
///
/// Owns exactly one simulation body and its fixtures. Before activation the
/// component only buffers shape descriptors; activation realizes them (or a
/// fallback box matching the entity bounds), pulls the initial transform
/// from the owning entity and creates the body. Destruction removes the body
/// from the world; the component then ignores further updates.
#[derive(Debug, Clone)]
pub struct RigidBodyComponent {
    desc: RigidBodyDesc,
    handles: Option<PhysicsBody>,
}

impl RigidBodyComponent {
    pub fn new(desc: RigidBodyDesc) -> Self {
        Self {
            desc,
            handles: None,
        }
    }

    pub fn kind(&self) -> RigidKind {
        self.desc.rigid_type
    }

    pub fn desc(&self) -> &RigidBodyDesc {
        &self.desc
    }

    /// Whether the simulation body exists yet.
    pub fn is_activated(&self) -> bool {
        self.handles.is_some()
    }

    pub(crate) fn handles(&self) -> Option<&PhysicsBody> {
        self.handles.as_ref()
    }

    /// Realize the binding: create the body with the configured kind and the
    /// entity's converted world transform, then turn every buffered shape
    /// descriptor into a fixture. No-op if already activated.
    pub fn activate(
        &mut self,
        entity: EntityId,
        world: &mut PhysicsWorld,
        categories: &mut CategoryRegistry,
        world_pos_px: Vec2,
        rotation: f32,
        bounds_px: Vec2,
    ) {
        if self.handles.is_some() {
            return;
        }

        let params = BodyParams {
            kind: self.desc.rigid_type,
            position: point_to_sim(world_pos_px),
            rotation,
            linear_velocity: self.desc.linear_velocity,
            angular_velocity: self.desc.angular_velocity,
            gravity_scale: self.desc.gravity_scale,
            linear_damping: self.desc.linear_damping,
            angular_damping: self.desc.angular_damping,
            bullet: self.desc.bullet,
            allow_rotation: self.desc.allow_rotation,
            allow_sleep: self.desc.allow_sleep,
        };
        let mut handles = world.create_body(entity, &params);

        if self.desc.shapes.is_empty() {
            let fallback = ShapeDesc::auto_box();
            world.attach_fixture(
                &mut handles,
                &fixture_params(&fallback, &self.desc, categories, bounds_px),
            );
        } else {
            for shape in &self.desc.shapes {
                world.attach_fixture(
                    &mut handles,
                    &fixture_params(shape, &self.desc, categories, bounds_px),
                );
            }
        }

        self.handles = Some(handles);
    }

    /// Append a shape descriptor. Before activation it is only buffered;
    /// afterwards it becomes a fixture immediately.
    pub fn add_shape(
        &mut self,
        shape: ShapeDesc,
        world: &mut PhysicsWorld,
        categories: &mut CategoryRegistry,
        bounds_px: Vec2,
    ) {
        if let Some(handles) = self.handles.as_mut() {
            world.attach_fixture(
                handles,
                &fixture_params(&shape, &self.desc, categories, bounds_px),
            );
        }
        self.desc.shapes.push(shape);
    }

    /// Post-step pose for the per-frame sync, converted to pixels. `None`
    /// for `static` bindings (never synced) and for bindings without a body.
    pub fn synced_pose(&self, world: &PhysicsWorld) -> Option<(Vec2, f32)> {
        if self.desc.rigid_type.is_static() {
            return None;
        }
        let handles = self.handles.as_ref()?;
        let (pos, rot) = world.body_position(handles);
        Some((point_to_px(pos), rot))
    }

    /// Write a pixel-space position into the body, waking it unless static.
    pub fn set_position(&self, world: &mut PhysicsWorld, pos_px: Vec2) {
        if let Some(handles) = &self.handles {
            world.set_body_position(
                handles,
                point_to_sim(pos_px),
                !self.desc.rigid_type.is_static(),
            );
        }
    }

    /// Update only the velocity axes given, leaving the other unchanged.
    pub fn set_velocity(&self, world: &mut PhysicsWorld, x: Option<f32>, y: Option<f32>) {
        if let Some(handles) = &self.handles {
            let mut vel = world.velocity(handles);
            if let Some(x) = x {
                vel.x = x;
            }
            if let Some(y) = y {
                vel.y = y;
            }
            world.set_velocity(handles, vel);
        }
    }

    /// Toggle the body's participation in the simulation. Fixtures and state
    /// are kept while disabled.
    pub fn set_enabled(&self, world: &mut PhysicsWorld, enabled: bool) {
        if let Some(handles) = &self.handles {
            world.set_body_enabled(handles, enabled);
        }
    }

    /// Remove the body and all its fixtures from the world. Terminal.
    pub fn destroy(&mut self, world: &mut PhysicsWorld) {
        if let Some(handles) = self.handles.take() {
            world.remove_body(&handles);
        }
    }
}
