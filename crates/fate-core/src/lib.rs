//! Deterministic check-resolution and group-consensus kernel for a
//! multiplayer text world. Single-threaded, serialized command dispatch;
//! the embedding server owns sessions, parsing, and presentation.

pub mod aspects;
pub mod dice;
pub mod group;
pub mod ladder;
pub mod requirement;
pub mod skills;
pub mod world;

pub use world::GameWorld;
