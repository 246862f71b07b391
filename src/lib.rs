//! Degen Hat Snake: a Snake variant with a daily lives allowance.
//!
//! The engine (grid simulation, input buffering, tick clock, renderer and
//! lives bookkeeping) is terminal-agnostic; `game` and `term` put it on a
//! crossterm screen.

pub mod clock;
pub mod config;
pub mod game;
pub mod host;
pub mod input;
pub mod lives;
pub mod payment;
pub mod render;
pub mod session;
pub mod snake;
pub mod store;
pub mod term;
pub mod world;

/// A grid cell, `(x, y)`. Signed so that a step past the wall is representable.
pub type Coords = (i16, i16);

/// Terminal column/row pair.
pub type TermCoords = (u16, u16);
