pub mod body;
pub mod entity;
