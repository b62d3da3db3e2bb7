pub mod tick;

pub use tick::{check_knockout, Duel};
