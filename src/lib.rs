//! Grid Snake - a tick-driven snake simulation with a terminal front end
//!
//! This library provides:
//! - Core game logic (game module), free of any I/O
//! - Keyboard input mapping (input module)
//! - TUI rendering (render module)
//! - Session metrics (metrics module)
//! - The interactive terminal session (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
