//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation tick counter (one tick = one combat frame)
pub type Tick = u64;

/// Which side of the duel a fighter occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FighterSlot {
    One,
    Two,
}

impl FighterSlot {
    pub const ALL: [FighterSlot; 2] = [FighterSlot::One, FighterSlot::Two];

    /// The other side of the matchup
    pub fn opponent(self) -> Self {
        match self {
            FighterSlot::One => FighterSlot::Two,
            FighterSlot::Two => FighterSlot::One,
        }
    }

    /// Array index for per-slot storage
    pub fn index(self) -> usize {
        match self {
            FighterSlot::One => 0,
            FighterSlot::Two => 1,
        }
    }
}

impl fmt::Display for FighterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FighterSlot::One => write!(f, "P1"),
            FighterSlot::Two => write!(f, "P2"),
        }
    }
}

/// 2D position or displacement in arena units (y grows downward)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Horizontal-only distance, the measure used for spacing decisions
    pub fn horizontal_distance(&self, other: &Self) -> f32 {
        (self.x - other.x).abs()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}
