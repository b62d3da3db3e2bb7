//! Fighter combat: moves, states, the per-fighter state machine and hit resolution

pub mod collision;
pub mod constants;
pub mod damage;
pub mod events;
pub mod fighter;
pub mod moves;
pub mod state;
pub mod state_machine;

pub use collision::{CollisionSystem, HitReport, Rect};
pub use events::{CombatEvent, CombatEventLog, CombatEventType, DuelOutcome, FighterCue};
pub use fighter::{Fighter, FighterBody, Stats};
pub use moves::{AttackPhase, FrameData, HitboxRect, MoveCatalog, MoveDescriptor};
pub use state::{FighterState, HitReaction, StateKind, Transition};
pub use state_machine::CombatStateMachine;
