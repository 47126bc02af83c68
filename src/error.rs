use thiserror::Error;

use crate::api::types::EntityId;

/// Errors surfaced by the physics integration layer.
///
/// Most operations are infallible pass-throughs to the solver; the only hard
/// precondition is that a binding can be activated solely for an entity that
/// is part of the running scene.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("entity {0:?} is not part of the running scene")]
    NotInScene(EntityId),

    #[error("entity {0:?} has no rigid body binding")]
    NoBinding(EntityId),
}
