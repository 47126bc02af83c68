pub mod api;
pub mod components;
pub mod core;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::context::{BoundaryRect, PhysicsContext};
pub use api::types::{CollisionMessage, CollisionPhase, CrossSide, EntityId, RigidKind};
pub use components::body::{RigidBodyComponent, RigidBodyDesc, ShapeDesc, ShapeKind};
pub use components::entity::{CollisionListeners, Entity};
pub use core::categories::CategoryRegistry;
pub use core::convert::{point_to_px, point_to_sim, to_px, to_sim, PIXELS_PER_METER};
pub use core::scene::Scene;
pub use core::time::{FixedTimestep, PhysicsRunner};
pub use core::world::{PhysicsBody, PhysicsWorld};
pub use error::PhysicsError;
