//! Domain logic and core data structures
//!
//! This module contains the pure game logic: geometry, lines, the bingo grid
//! and challenge descriptors. Nothing here renders or touches the filesystem
//! except the CSV challenge source.

pub mod challenge;
pub mod core;
pub mod grid;
pub mod layout;
pub mod line;
