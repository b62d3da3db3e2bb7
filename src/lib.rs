//! Duel Core - two-fighter combat simulation
//!
//! Frame-based fighting-game core: move catalog, per-fighter combat state
//! machine, hit resolution and a reaction-delayed AI opponent, driven one
//! fixed step at a time.

pub mod ai;
pub mod combat;
pub mod core;
pub mod input;
pub mod simulation;

pub use crate::combat::{CombatEventType, DuelOutcome, Fighter, MoveCatalog, MoveDescriptor, StateKind};
pub use crate::core::config::CombatConfig;
pub use crate::core::error::{DuelError, Result};
pub use crate::core::types::{FighterSlot, Tick, Vec2};
pub use crate::input::Intent;
pub use crate::simulation::Duel;
