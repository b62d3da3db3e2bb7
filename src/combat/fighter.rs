//! Fighter: resources, kinematics and the owned state machine
//!
//! The fighter is split in two so the state machine can mutate the body
//! while being a field of the same aggregate: `FighterBody` holds every
//! field states read or write, `CombatStateMachine` holds the state.

use serde::{Deserialize, Serialize};

use crate::combat::damage::compute_damage;
use crate::combat::events::FighterCue;
use crate::combat::moves::{AttackPhase, MoveDescriptor};
use crate::combat::state::{HitReaction, StateKind, StateTimings, Transition};
use crate::combat::state_machine::CombatStateMachine;
use crate::core::config::{ArenaConfig, BodyConfig, CombatConfig, PhysicsConfig};
use crate::core::types::Vec2;
use crate::input::Intent;

/// Combat stats (positive scalars)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub attack: f32,
    pub defense: f32,
    /// Top horizontal speed, arena units per second
    pub speed: f32,
}

/// Everything the states read and write each tick
#[derive(Debug, Clone)]
pub struct FighterBody {
    // Resources
    pub current_hp: f32,
    pub max_hp: f32,
    pub current_meter: f32,
    pub max_meter: f32,
    pub stats: Stats,

    // Kinematics (position is the fighter's feet)
    pub position: Vec2,
    pub velocity: Vec2,
    pub is_grounded: bool,
    pub ground_y: f32,
    pub physics: PhysicsConfig,

    // Orientation and intent
    pub facing_right: bool,
    /// Held horizontal direction: -1, 0 or 1
    pub move_direction: i8,

    // Combat flags
    pub is_blocking: bool,
    pub is_vulnerable: bool,
    pub hitbox_active: bool,
    pub attack_phase: AttackPhase,

    /// Transient feedback for the renderer, drained once per tick
    pub cues: Vec<FighterCue>,
}

impl FighterBody {
    pub fn new(config: &CombatConfig, position: Vec2, facing_right: bool) -> Self {
        let profile = &config.fighter;
        Self {
            current_hp: profile.max_hp,
            max_hp: profile.max_hp,
            current_meter: 0.0,
            max_meter: profile.max_meter,
            stats: Stats {
                attack: profile.attack,
                defense: profile.defense,
                speed: profile.speed,
            },
            position,
            velocity: Vec2::ZERO,
            is_grounded: true,
            ground_y: config.arena.ground_y,
            physics: config.physics,
            facing_right,
            move_direction: 0,
            is_blocking: false,
            is_vulnerable: true,
            hitbox_active: false,
            attack_phase: AttackPhase::None,
            cues: Vec::new(),
        }
    }

    /// Accelerate horizontal velocity toward `target`, snapping when close
    pub fn accelerate_toward(&mut self, target: f32, dt: f32) {
        let physics = &self.physics;
        if (target - self.velocity.x).abs() < physics.snap_threshold {
            self.velocity.x = target;
        } else if target > self.velocity.x {
            self.velocity.x = (self.velocity.x + physics.acceleration * dt).min(target);
        } else {
            // Letting go of the stick stops faster than reversing
            let rate = if self.move_direction == 0 {
                physics.deceleration
            } else {
                physics.acceleration
            };
            self.velocity.x = (self.velocity.x - rate * dt).max(target);
        }
    }

    /// Decelerate residual horizontal velocity to zero
    pub fn decay_horizontal(&mut self, dt: f32) {
        if self.velocity.x.abs() > self.physics.stop_threshold {
            let decel = self.physics.deceleration * dt;
            if self.velocity.x > 0.0 {
                self.velocity.x = (self.velocity.x - decel).max(0.0);
            } else {
                self.velocity.x = (self.velocity.x + decel).min(0.0);
            }
        } else {
            self.velocity.x = 0.0;
        }
    }

    /// Gravity, velocity integration and ground contact
    fn integrate(&mut self, dt: f32) {
        if !self.is_grounded {
            self.velocity.y =
                (self.velocity.y + self.physics.gravity * dt).min(self.physics.max_fall_speed);
        }

        self.position += self.velocity * dt;

        if self.position.y >= self.ground_y {
            self.position.y = self.ground_y;
            self.velocity.y = 0.0;
            self.is_grounded = true;
        } else {
            self.is_grounded = false;
        }
    }

    fn gain_meter(&mut self, amount: f32) {
        if amount > 0.0 {
            self.current_meter = (self.current_meter + amount).min(self.max_meter);
        }
    }
}

/// One combatant
#[derive(Debug, Clone)]
pub struct Fighter {
    pub name: String,
    pub body: FighterBody,
    machine: CombatStateMachine,
    /// Visual bounding box, the basis of the hurtbox
    dimensions: BodyConfig,
    arena: ArenaConfig,
    spawn: Vec2,
    spawn_facing_right: bool,
}

impl Fighter {
    /// Create a fighter standing on the ground line at `spawn_x`, full HP, no meter
    pub fn new(
        name: impl Into<String>,
        spawn_x: f32,
        facing_right: bool,
        config: &CombatConfig,
    ) -> Self {
        let name = name.into();
        let spawn = Vec2::new(spawn_x, config.arena.ground_y);
        tracing::debug!("Fighter \"{}\" created at ({}, {})", name, spawn.x, spawn.y);

        Self {
            name,
            body: FighterBody::new(config, spawn, facing_right),
            machine: CombatStateMachine::new(StateTimings {
                downed_recovery_frames: config.rules.downed_recovery_frames,
                default_hitstun_frames: config.rules.default_hitstun_frames,
            }),
            dimensions: config.body,
            arena: config.arena,
            spawn,
            spawn_facing_right: facing_right,
        }
    }

    // === Observation ===

    pub fn state_machine(&self) -> &CombatStateMachine {
        &self.machine
    }

    pub fn current_state(&self) -> StateKind {
        self.machine.current_state()
    }

    pub fn current_state_name(&self) -> &'static str {
        self.machine.current_state_name()
    }

    pub fn is_in_state(&self, kind: StateKind) -> bool {
        self.machine.is_in_state(kind)
    }

    pub fn can_act(&self) -> bool {
        self.machine.can_act()
    }

    pub fn current_move(&self) -> Option<&MoveDescriptor> {
        self.machine.current_move()
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn hp(&self) -> f32 {
        self.body.current_hp
    }

    pub fn max_hp(&self) -> f32 {
        self.body.max_hp
    }

    pub fn meter(&self) -> f32 {
        self.body.current_meter
    }

    pub fn stats(&self) -> Stats {
        self.body.stats
    }

    pub fn facing_right(&self) -> bool {
        self.body.facing_right
    }

    pub fn hitbox_active(&self) -> bool {
        self.body.hitbox_active
    }

    /// Identifies the current attack; changes with every new swing
    pub fn swing_id(&self) -> u64 {
        self.machine.swing_count()
    }

    pub fn attack_phase(&self) -> AttackPhase {
        self.body.attack_phase
    }

    pub fn is_blocking(&self) -> bool {
        self.body.is_blocking
    }

    pub fn is_vulnerable(&self) -> bool {
        self.body.is_vulnerable
    }

    pub fn is_grounded(&self) -> bool {
        self.body.is_grounded
    }

    pub fn is_knocked_out(&self) -> bool {
        self.body.current_hp <= 0.0
    }

    pub fn dimensions(&self) -> &BodyConfig {
        &self.dimensions
    }

    /// Take the feedback cues emitted since the last drain
    pub fn drain_cues(&mut self) -> Vec<FighterCue> {
        std::mem::take(&mut self.body.cues)
    }

    // === Simulation ===

    /// One fixed step: kinematics, then the state machine, then the arena clamp
    pub fn update(&mut self, dt: f32) {
        self.body.integrate(dt);
        self.machine.advance(&mut self.body, dt);
        self.body.position = self.arena.clamp(self.body.position);
    }

    /// Direct access for collaborators that need raw transition control
    pub fn request_transition(&mut self, transition: Transition) -> bool {
        self.machine.request_transition(&mut self.body, transition)
    }

    pub fn force_transition(&mut self, transition: Transition) {
        self.machine.force_transition(&mut self.body, transition);
    }

    // === Intents ===

    pub fn apply_intent(&mut self, intent: &Intent) -> bool {
        match intent {
            Intent::Attack(attack) => self.request_attack(attack.clone()),
            Intent::Move(direction) => {
                self.set_move_intent(direction.signum());
                true
            }
            Intent::Block => self.request_block(),
            Intent::ReleaseBlock => self.release_block(),
            Intent::Jump => self.jump(),
        }
    }

    /// Start an attack. When the fighter cannot act the request goes to the
    /// state machine's single-slot buffer instead (except while downed) and
    /// `false` is returned.
    pub fn request_attack(&mut self, attack: MoveDescriptor) -> bool {
        self.gated_request(Transition::Attacking(attack))
    }

    pub fn request_block(&mut self) -> bool {
        self.gated_request(Transition::Blocking)
    }

    /// Drop the guard, or forget a block that was still buffered
    pub fn release_block(&mut self) -> bool {
        if self.is_in_state(StateKind::Blocking) {
            return self.machine.request_transition(&mut self.body, Transition::Idle);
        }
        self.machine.cancel_pending(StateKind::Blocking)
    }

    /// Set held horizontal direction (-1, 0, 1). Starts or stops walking
    /// from Idle/Moving; Blocking reads it for guarded movement.
    pub fn set_move_intent(&mut self, direction: i8) {
        let direction = direction.signum();
        self.body.move_direction = direction;

        if direction != 0 {
            if self.is_in_state(StateKind::Idle) {
                self.machine.request_transition(&mut self.body, Transition::Moving);
            }
        } else if self.is_in_state(StateKind::Moving) {
            self.machine.request_transition(&mut self.body, Transition::Idle);
        }
    }

    /// Jump if grounded and able to act
    pub fn jump(&mut self) -> bool {
        if self.body.is_grounded && self.can_act() {
            self.body.velocity.y = self.body.physics.jump_velocity;
            self.body.is_grounded = false;
            tracing::debug!("{} jumps", self.name);
            true
        } else {
            false
        }
    }

    fn gated_request(&mut self, transition: Transition) -> bool {
        if self.can_act() {
            self.machine.request_transition(&mut self.body, transition)
        } else {
            if !self.is_in_state(StateKind::Downed) {
                self.machine.request_transition(&mut self.body, transition);
            }
            false
        }
    }

    // === Resources ===

    /// Apply a hit of `raw_damage`. Returns the damage actually dealt
    /// (0 when the fighter is not vulnerable).
    pub fn apply_damage(&mut self, raw_damage: f32, knockback: Vec2) -> f32 {
        self.take_hit(raw_damage, knockback, false)
    }

    /// `apply_damage` with an optional knockdown: a surviving defender is
    /// put into the recoverable Downed state after the hit.
    pub fn take_hit(&mut self, raw_damage: f32, knockback: Vec2, knockdown: bool) -> f32 {
        if !self.body.is_vulnerable {
            return 0.0;
        }

        let outcome = compute_damage(raw_damage, self.body.stats.defense, self.body.is_blocking);
        if self.body.is_blocking {
            tracing::debug!(
                "{} blocked: damage reduced {} -> {}",
                self.name,
                raw_damage,
                outcome.mitigated
            );
        }

        self.body.current_hp = (self.body.current_hp - outcome.mitigated).clamp(0.0, self.body.max_hp);

        self.machine.force_transition(
            &mut self.body,
            Transition::Hit(HitReaction {
                hitstun_frames: Some(outcome.hitstun_frames),
                knockback,
                damage: outcome.mitigated,
            }),
        );
        self.body.position = self.arena.clamp(self.body.position);

        self.body.gain_meter(outcome.defender_meter);

        tracing::debug!(
            "{} took {} damage, HP {}/{}",
            self.name,
            outcome.mitigated,
            self.body.current_hp,
            self.body.max_hp
        );

        if self.body.current_hp <= 0.0 {
            self.on_knockout();
        } else if knockdown {
            self.machine.force_transition(&mut self.body, Transition::Downed);
        }

        outcome.mitigated
    }

    fn on_knockout(&mut self) {
        tracing::info!("{} has been knocked out", self.name);
        self.machine.force_transition(&mut self.body, Transition::Downed);
        self.body.cues.push(FighterCue::KnockedOut);
    }

    pub fn gain_meter(&mut self, amount: f32) {
        self.body.gain_meter(amount);
    }

    /// Spend meter; fails without partial spend when there is not enough
    pub fn spend_meter(&mut self, amount: f32) -> bool {
        if amount >= 0.0 && self.body.current_meter >= amount {
            self.body.current_meter -= amount;
            true
        } else {
            false
        }
    }

    pub fn heal(&mut self, amount: f32) {
        if amount > 0.0 {
            self.body.current_hp = (self.body.current_hp + amount).min(self.body.max_hp);
        }
    }

    /// Restore HP, meter, position and state for a new round
    pub fn reset(&mut self) {
        self.body.current_hp = self.body.max_hp;
        self.body.current_meter = 0.0;
        self.body.position = self.spawn;
        self.body.velocity = Vec2::ZERO;
        self.body.is_grounded = true;
        self.body.facing_right = self.spawn_facing_right;
        self.body.move_direction = 0;
        self.body.cues.clear();
        self.machine.reset(&mut self.body);
    }
}
