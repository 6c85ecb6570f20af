//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Hosts drive [`SnakeSimulation`] with intents and ticks and draw from its snapshots.

pub mod action;
pub mod config;
pub mod error;
pub mod shared;
pub mod simulation;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, Intent};
pub use config::{FoodPlacement, GameConfig};
pub use error::ConfigError;
pub use shared::SharedSimulation;
pub use simulation::{SnakeSimulation, TickOutcome, sample_food};
pub use state::{EndReason, GameState, Position, RoundState, Snake, Snapshot};
