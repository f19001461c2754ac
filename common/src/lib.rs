pub mod debug;
pub mod error;
pub mod physics;
pub mod player;
pub mod worker;
pub mod world;
pub mod worldgen;

pub use error::PhysicsError;
