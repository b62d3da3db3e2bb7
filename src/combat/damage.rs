//! Damage formula
//!
//! Deterministic: the outcome depends only on raw damage, the defender's
//! defense and whether the defender is blocking.
//!
//! Hitstun is derived from RAW damage, not mitigated damage, so a blocked
//! heavy hit still stuns as long as an unblocked one.

use serde::{Deserialize, Serialize};

use crate::combat::constants::{
    ATTACKER_METER_RATIO, ATTACK_STAT_BASELINE, BASE_HITSTUN_FRAMES, BLOCK_DAMAGE_MULTIPLIER,
    DEFENDER_METER_RATIO, DEFENSE_MITIGATION_RATIO, HITSTUN_DAMAGE_DIVISOR, MAX_HITSTUN_FRAMES,
    MIN_DAMAGE,
};

/// Result of running the formula for one hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// Damage actually removed from HP (before clamping at zero)
    pub mitigated: f32,
    pub hitstun_frames: u32,
    pub defender_meter: f32,
    pub attacker_meter: f32,
}

/// `max(1, raw - defense * 0.5)`, halved again when blocking
pub fn mitigated_damage(raw_damage: f32, defense: f32, blocking: bool) -> f32 {
    let mitigated = (raw_damage - defense * DEFENSE_MITIGATION_RATIO).max(MIN_DAMAGE);
    if blocking {
        mitigated * BLOCK_DAMAGE_MULTIPLIER
    } else {
        mitigated
    }
}

/// `min(40, 10 + floor(raw / 5))`
pub fn hitstun_frames(raw_damage: f32) -> u32 {
    let bonus = (raw_damage.max(0.0) / HITSTUN_DAMAGE_DIVISOR)
        .floor()
        .min(MAX_HITSTUN_FRAMES as f32) as u32;
    BASE_HITSTUN_FRAMES.saturating_add(bonus).min(MAX_HITSTUN_FRAMES)
}

pub fn defender_meter_gain(mitigated: f32) -> f32 {
    mitigated * DEFENDER_METER_RATIO
}

pub fn attacker_meter_gain(mitigated: f32) -> f32 {
    mitigated * ATTACKER_METER_RATIO
}

/// Raw damage delivered by a move: base damage scaled by the attack stat
pub fn scaled_raw_damage(base_damage: f32, attack: f32) -> f32 {
    base_damage * (attack / ATTACK_STAT_BASELINE)
}

/// Full formula for one hit
pub fn compute_damage(raw_damage: f32, defense: f32, blocking: bool) -> DamageOutcome {
    let mitigated = mitigated_damage(raw_damage, defense, blocking);
    DamageOutcome {
        mitigated,
        hitstun_frames: hitstun_frames(raw_damage),
        defender_meter: defender_meter_gain(mitigated),
        attacker_meter: attacker_meter_gain(mitigated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_hit() {
        let outcome = compute_damage(20.0, 10.0, false);
        assert_eq!(outcome.mitigated, 15.0);
        assert_eq!(outcome.hitstun_frames, 14);
        assert!((outcome.defender_meter - 4.5).abs() < 1e-5);
        assert!((outcome.attacker_meter - 7.5).abs() < 1e-5);
    }

    #[test]
    fn test_reference_hit_blocked() {
        let outcome = compute_damage(20.0, 10.0, true);
        assert_eq!(outcome.mitigated, 7.5);
        // Hitstun ignores the block discount
        assert_eq!(outcome.hitstun_frames, 14);
    }

    #[test]
    fn test_damage_floor_is_one() {
        assert_eq!(mitigated_damage(2.0, 50.0, false), 1.0);
        assert_eq!(mitigated_damage(0.0, 10.0, false), 1.0);
        // The floor applies before the block discount
        assert_eq!(mitigated_damage(2.0, 50.0, true), 0.5);
    }

    #[test]
    fn test_hitstun_caps_at_forty() {
        assert_eq!(hitstun_frames(0.0), 10);
        assert_eq!(hitstun_frames(4.9), 10);
        assert_eq!(hitstun_frames(25.0), 15);
        assert_eq!(hitstun_frames(150.0), 40);
        assert_eq!(hitstun_frames(1000.0), 40);
        assert_eq!(hitstun_frames(1.0e12), 40);
        assert_eq!(hitstun_frames(f32::MAX), 40);
    }

    #[test]
    fn test_attack_stat_scaling() {
        assert_eq!(scaled_raw_damage(10.0, 10.0), 10.0);
        assert!((scaled_raw_damage(25.0, 12.0) - 30.0).abs() < 1e-4);
    }
}
