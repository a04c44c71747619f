//! Photo bingo game engine
//!
//! A bingo board whose cells are completed by attaching a photo proving the
//! challenge. Completing a full row, column or diagonal is a bingo. The board
//! can be panned and zoomed with touch gestures and is rendered in software.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod ui;
