use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Which half of a contact's lifetime a message reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPhase {
    /// The two fixtures started touching this step (`collisionStart`).
    Start,
    /// The two fixtures stopped touching this step (`collisionEnd`).
    End,
}

/// A semantic collision event addressed to one scene entity.
///
/// Contacts are buffered during the solver step and resolved afterwards; each
/// side of a contact gets its own message, delivered only if that entity
/// registered a listener for the phase. `other` is `None` when the peer body's
/// entity no longer exists by the time the queue is drained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionMessage {
    pub target: EntityId,
    pub other: Option<EntityId>,
    /// World-space contact normal from the solver manifold.
    pub normal: Vec2,
    pub phase: CollisionPhase,
}

/// The kind of rigid body a binding drives.
///
/// Determines gravity response, collision response and whether the binding
/// may initiate collisions; `static` bindings are excluded from the per-frame
/// transform sync entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RigidKind {
    Static,
    Kinematic,
    Dynamic,
}

impl RigidKind {
    pub fn is_static(self) -> bool {
        matches!(self, RigidKind::Static)
    }
}

/// One-way ("cross-side") platform tag for a fixture.
///
/// A tagged fixture only produces a solver response when approached from the
/// named side; contacts arriving from the opposite direction are disabled for
/// that step during pre-solve, without removing the fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl CrossSide {
    /// Whether a contact with the given normal (pointing out of the tagged
    /// fixture) must be disabled, using a 0.5 cosine threshold per side.
    pub fn blocks(self, normal: Vec2) -> bool {
        match self {
            CrossSide::Left => normal.x < -0.5,
            CrossSide::Right => normal.x > 0.5,
            CrossSide::Top => normal.y < -0.5,
            CrossSide::Bottom => normal.y > 0.5,
        }
    }

    /// Compact encoding for collider user data (0 is reserved for "untagged").
    pub(crate) fn to_tag(self) -> u128 {
        match self {
            CrossSide::Left => 1,
            CrossSide::Right => 2,
            CrossSide::Top => 3,
            CrossSide::Bottom => 4,
        }
    }

    pub(crate) fn from_tag(tag: u128) -> Option<Self> {
        match tag {
            1 => Some(CrossSide::Left),
            2 => Some(CrossSide::Right),
            3 => Some(CrossSide::Top),
            4 => Some(CrossSide::Bottom),
            _ => None,
        }
    }
}
