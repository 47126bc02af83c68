pub mod categories;
pub mod convert;
pub mod scene;
pub mod time;
pub mod world;
