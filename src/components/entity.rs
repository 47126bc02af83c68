use glam::Vec2;

use crate::api::types::{CollisionPhase, EntityId};
use crate::components::body::RigidBodyComponent;

/// Which semantic collision events an entity wants delivered.
///
/// A side of a contact only produces a message when its entity registered the
/// matching listener; the other side is evaluated independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionListeners {
    pub start: bool,
    pub end: bool,
}

impl CollisionListeners {
    pub const NONE: Self = Self {
        start: false,
        end: false,
    };
    pub const BOTH: Self = Self {
        start: true,
        end: true,
    };

    pub fn accepts(self, phase: CollisionPhase) -> bool {
        match phase {
            CollisionPhase::Start => self.start,
            CollisionPhase::End => self.end,
        }
    }
}

/// Fat scene node — a single struct with the transform state the physics
/// layer reads and writes. Stands in for the host scene graph, which is an
/// external collaborator of this layer.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// World-space position, in pixels.
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// World-space bounds, in pixels. Source for auto-sized shapes.
    pub size: Vec2,
    /// Pivot offset applied when the physics layer writes the position back.
    pub pivot: Vec2,
    /// Scene parent. Synced positions are re-expressed in the parent's local
    /// space when this is set.
    pub parent: Option<EntityId>,
    /// Registered collision listeners.
    pub listeners: CollisionListeners,
    /// Rigid body binding (optional — entities without one are scenery).
    pub body: Option<RigidBodyComponent>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            size: Vec2::ONE,
            pivot: Vec2::ZERO,
            parent: None,
            listeners: CollisionListeners::NONE,
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_pivot(mut self, pivot: Vec2) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_listeners(mut self, listeners: CollisionListeners) -> Self {
        self.listeners = listeners;
        self
    }
}
