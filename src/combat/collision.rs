//! Hitbox/hurtbox collision and hit resolution
//!
//! Runs once per tick after both fighters have advanced. Detection is a pure
//! function of current positions and geometry (no swept collision). A
//! per-attacker record of the swing that last landed limits every attack to
//! one hit; any new swing re-arms it, even one chained without a gap.

use serde::{Deserialize, Serialize};

use crate::combat::damage::{attacker_meter_gain, scaled_raw_damage};
use crate::combat::events::{CombatEventLog, CombatEventType};
use crate::combat::fighter::Fighter;
use crate::core::config::RulesConfig;
use crate::core::types::{FighterSlot, Tick, Vec2};

/// Axis-aligned rectangle in arena coordinates (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Where a fighter is vulnerable: a fraction of the visual box, anchored at the feet
pub fn hurtbox(fighter: &Fighter) -> Rect {
    let dims = fighter.dimensions();
    let width = dims.width * dims.hurtbox_width_ratio;
    let height = dims.height * dims.hurtbox_height_ratio;
    let pos = fighter.position();
    Rect::new(pos.x - width / 2.0, pos.y - height, width, height)
}

/// The attacker's live hitbox, mirrored by facing. `None` unless the
/// fighter is in an attack's active window.
pub fn hitbox(fighter: &Fighter, rules: &RulesConfig) -> Option<Rect> {
    if !fighter.hitbox_active() {
        return None;
    }
    let attack = fighter.current_move()?;
    let shape = attack.hitbox_or(rules.default_hitbox);
    let pos = fighter.position();

    let x = if fighter.facing_right() {
        pos.x + shape.x
    } else {
        pos.x - shape.x - shape.width
    };

    Some(Rect::new(x, pos.y + shape.y, shape.width, shape.height))
}

/// Geometry computed during the last resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebugGeometry {
    pub hitboxes: [Option<Rect>; 2],
    pub hurtboxes: [Rect; 2],
}

/// A landed hit, as reported by one resolution pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitReport {
    pub attacker: FighterSlot,
    pub defender: FighterSlot,
    pub damage: f32,
}

/// Collision and hit resolution for one matchup
#[derive(Debug, Clone)]
pub struct CollisionSystem {
    rules: RulesConfig,
    /// Per attacker: the swing whose active window already landed
    landed_swing: [Option<u64>; 2],
    debug_mode: bool,
    debug_geometry: Option<DebugGeometry>,
}

impl CollisionSystem {
    pub fn new(rules: RulesConfig) -> Self {
        Self {
            rules,
            landed_swing: [None; 2],
            debug_mode: false,
            debug_geometry: None,
        }
    }

    /// Toggle hitbox/hurtbox capture for visualization
    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.debug_mode = enabled;
        if !enabled {
            self.debug_geometry = None;
        }
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Rectangles from the last pass, when debug mode is on
    pub fn debug_geometry(&self) -> Option<&DebugGeometry> {
        self.debug_geometry.as_ref()
    }

    pub fn hit_landed(&self, attacker: FighterSlot) -> bool {
        self.landed_swing[attacker.index()].is_some()
    }

    /// Forget in-flight swings (round restart)
    pub fn reset(&mut self) {
        self.landed_swing = [None; 2];
        self.debug_geometry = None;
    }

    /// One resolution pass over both ordered pairs, slot One attacking first.
    /// A hit on a fighter cancels its own attack, so in a trade the first
    /// slot's hit lands and the second's does not.
    pub fn resolve(
        &mut self,
        one: &mut Fighter,
        two: &mut Fighter,
        tick: Tick,
        log: &mut CombatEventLog,
    ) -> Vec<HitReport> {
        let mut reports = Vec::new();

        for slot in FighterSlot::ALL {
            let (attacker, defender) = match slot {
                FighterSlot::One => (&mut *one, &mut *two),
                FighterSlot::Two => (&mut *two, &mut *one),
            };

            let swing = attacker.swing_id();
            if !attacker.hitbox_active() || self.landed_swing[slot.index()] == Some(swing) {
                continue;
            }

            let Some(hit) = hitbox(attacker, &self.rules) else {
                continue;
            };

            if hit.overlaps(&hurtbox(defender)) {
                self.landed_swing[slot.index()] = Some(swing);
                if let Some(report) = self.apply_hit(attacker, defender, slot, tick, log) {
                    reports.push(report);
                }
            }
        }

        // Re-arm once the swing is over
        for (slot, fighter) in [(FighterSlot::One, &*one), (FighterSlot::Two, &*two)] {
            if !fighter.hitbox_active() {
                self.landed_swing[slot.index()] = None;
            }
        }

        if self.debug_mode {
            self.debug_geometry = Some(DebugGeometry {
                hitboxes: [hitbox(one, &self.rules), hitbox(two, &self.rules)],
                hurtboxes: [hurtbox(one), hurtbox(two)],
            });
        }

        reports
    }

    /// Damage, knockback and meter for one landed hit
    fn apply_hit(
        &self,
        attacker: &mut Fighter,
        defender: &mut Fighter,
        slot: FighterSlot,
        tick: Tick,
        log: &mut CombatEventLog,
    ) -> Option<HitReport> {
        let attack = attacker.current_move()?.clone();

        let base_damage = attack.base_damage_or(self.rules.default_move_damage);
        let raw_damage = scaled_raw_damage(base_damage, attacker.stats().attack);

        let direction = if attacker.facing_right() { 1.0 } else { -1.0 };
        let strength = if base_damage > self.rules.heavy_knockback_damage {
            self.rules.heavy_knockback
        } else {
            self.rules.light_knockback
        };
        let knockback = Vec2::new(direction * strength, 0.0);

        let damage = defender.take_hit(raw_damage, knockback, attack.knockdown);
        if damage <= 0.0 {
            tracing::trace!("{} connected but {} is not vulnerable", attacker.name, defender.name);
            return None;
        }

        attacker.gain_meter(attacker_meter_gain(damage));

        tracing::debug!(
            "HIT! {} hit {} with {} for {} damage",
            attacker.name,
            defender.name,
            attack.name,
            damage
        );

        let defender_slot = slot.opponent();
        log.push(
            CombatEventType::HitLanded {
                attacker: slot,
                defender: defender_slot,
                damage,
                heavy: damage > self.rules.heavy_hit_threshold,
            },
            format!("{} hit {} for {:.1}", attacker.name, defender.name, damage),
            tick,
        );

        Some(HitReport {
            attacker: slot,
            defender: defender_slot,
            damage,
        })
    }
}
