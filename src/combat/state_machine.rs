//! Combat state machine
//!
//! Owns the current state of one fighter, counts frames, applies legal
//! transitions and buffers at most one illegal request. The buffered request
//! is retried once per tick after the state's own update, so a queued attack
//! fires on the first frame the current action allows it.

use crate::combat::fighter::FighterBody;
use crate::combat::moves::MoveDescriptor;
use crate::combat::state::{FighterState, StateKind, StateTimings, Transition};

#[derive(Debug, Clone)]
pub struct CombatStateMachine {
    state: FighterState,
    /// Frames elapsed since the current state was entered
    frame_count: u32,
    previous: Option<StateKind>,
    /// Single-slot input buffer; newest request wins
    pending: Option<Transition>,
    /// Attacks entered so far; tells back-to-back swings apart
    swing_count: u64,
    timings: StateTimings,
}

impl CombatStateMachine {
    /// Start in Idle
    pub fn new(timings: StateTimings) -> Self {
        Self {
            state: FighterState::Idle,
            frame_count: 0,
            previous: None,
            pending: None,
            swing_count: 0,
            timings,
        }
    }

    pub fn state(&self) -> &FighterState {
        &self.state
    }

    pub fn current_state(&self) -> StateKind {
        self.state.kind()
    }

    pub fn current_state_name(&self) -> &'static str {
        self.state.kind().name()
    }

    /// State left by the most recent transition, for diagnostics
    pub fn previous_state(&self) -> Option<StateKind> {
        self.previous
    }

    pub fn is_in_state(&self, kind: StateKind) -> bool {
        self.state.kind() == kind
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn pending(&self) -> Option<&Transition> {
        self.pending.as_ref()
    }

    /// Bumped on every entry into Attacking, including chained attacks that
    /// start on the frame the previous one ends
    pub fn swing_count(&self) -> u64 {
        self.swing_count
    }

    pub fn current_move(&self) -> Option<&MoveDescriptor> {
        self.state.current_move()
    }

    /// True only in Idle, Moving and Blocking
    pub fn can_act(&self) -> bool {
        self.state.kind().can_act()
    }

    /// Whether `target` may be entered right now
    pub fn permits(&self, target: StateKind, body: &FighterBody) -> bool {
        self.state
            .permits(self.frame_count, target, body.current_hp)
    }

    /// Apply `transition` if the current state allows it, otherwise buffer it.
    ///
    /// Any new request supersedes a previously buffered one, whether or not
    /// the new one applies immediately. Requesting the state the fighter is
    /// already in succeeds without re-entering it (frame count is kept) for
    /// Idle, Moving and Blocking.
    pub fn request_transition(&mut self, body: &mut FighterBody, transition: Transition) -> bool {
        let target = transition.kind();

        if target == self.current_state() && target.can_act() {
            self.pending = None;
            return true;
        }

        if self.permits(target, body) {
            self.pending = None;
            self.enter(body, transition);
            true
        } else {
            tracing::trace!(
                "Transition {} -> {} not allowed at frame {}, buffering",
                self.current_state(),
                target,
                self.frame_count
            );
            self.pending = Some(transition);
            false
        }
    }

    /// Exit the current state and enter `transition` regardless of legality.
    /// The buffered request, if any, survives and is retried as usual.
    pub fn force_transition(&mut self, body: &mut FighterBody, transition: Transition) {
        tracing::trace!(
            "Forcing {} -> {}",
            self.current_state(),
            transition.kind()
        );
        self.enter(body, transition);
    }

    /// Drop the buffered request if it targets `kind`
    pub fn cancel_pending(&mut self, kind: StateKind) -> bool {
        if self.pending.as_ref().map(Transition::kind) == Some(kind) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// One tick: count the frame, run the state's update (which may end the
    /// state), then retry the buffered request.
    pub fn advance(&mut self, body: &mut FighterBody, dt: f32) {
        self.frame_count += 1;

        if let Some(next) = self.state.update(body, self.frame_count, dt) {
            if self.permits(next.kind(), body) {
                self.enter(body, next);
            }
        }

        if let Some(pending) = self.pending.take() {
            if self.permits(pending.kind(), body) {
                tracing::trace!("Applying buffered transition to {}", pending.kind());
                self.enter(body, pending);
            } else {
                self.pending = Some(pending);
            }
        }
    }

    /// Back to a fresh Idle, clearing the buffer (round restart)
    pub fn reset(&mut self, body: &mut FighterBody) {
        self.pending = None;
        self.enter(body, Transition::Idle);
        self.previous = None;
    }

    fn enter(&mut self, body: &mut FighterBody, transition: Transition) {
        let from = self.state.kind();
        self.state.exit(body);
        tracing::debug!(
            "Exiting {} after {} frames",
            from,
            self.frame_count
        );

        self.previous = Some(from);
        self.state = FighterState::from_transition(transition, &self.timings);
        self.frame_count = 0;
        if self.state.kind() == StateKind::Attacking {
            self.swing_count += 1;
        }
        self.state.enter(body);
        tracing::debug!("Transitioned: {} -> {}", from, self.state.kind());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::moves::{AttackPhase, FrameData};
    use crate::combat::state::HitReaction;
    use crate::core::config::CombatConfig;
    use crate::core::types::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (CombatStateMachine, FighterBody) {
        let config = CombatConfig::default();
        let body = FighterBody::new(&config, Vec2::new(600.0, config.arena.ground_y), true);
        let machine = CombatStateMachine::new(StateTimings {
            downed_recovery_frames: config.rules.downed_recovery_frames,
            default_hitstun_frames: config.rules.default_hitstun_frames,
        });
        (machine, body)
    }

    fn jab() -> Transition {
        Transition::Attacking(MoveDescriptor::new("Jab", 10.0, FrameData::new(5, 3, 7)))
    }

    fn hit(hitstun: u32) -> Transition {
        Transition::Hit(HitReaction {
            hitstun_frames: Some(hitstun),
            knockback: Vec2::ZERO,
            damage: 10.0,
        })
    }

    #[test]
    fn test_starts_idle() {
        let (machine, _) = setup();
        assert!(machine.is_in_state(StateKind::Idle));
        assert_eq!(machine.frame_count(), 0);
        assert!(machine.previous_state().is_none());
        assert!(machine.can_act());
    }

    #[test]
    fn test_attack_timeline() {
        let (mut machine, mut body) = setup();
        assert!(machine.request_transition(&mut body, jab()));
        assert!(!body.hitbox_active);
        assert_eq!(body.attack_phase, AttackPhase::Startup);

        for tick in 1..=14u32 {
            machine.advance(&mut body, DT);
            let expected = (5..=7).contains(&tick);
            assert_eq!(body.hitbox_active, expected, "tick {tick}");
            assert!(machine.is_in_state(StateKind::Attacking), "tick {tick}");
        }

        machine.advance(&mut body, DT);
        assert!(machine.is_in_state(StateKind::Idle));
        assert!(!body.hitbox_active);
        assert_eq!(body.attack_phase, AttackPhase::None);

        for _ in 0..5 {
            machine.advance(&mut body, DT);
            assert!(machine.is_in_state(StateKind::Idle));
        }
    }

    #[test]
    fn test_chained_attack_counts_new_swing() {
        let (mut machine, mut body) = setup();
        let quick = |startup, recovery| {
            let frames = FrameData::new(startup, 2, recovery);
            Transition::Attacking(MoveDescriptor::new("Quick", 5.0, frames))
        };
        assert!(machine.request_transition(&mut body, quick(1, 0)));
        assert_eq!(machine.swing_count(), 1);
        assert!(!machine.request_transition(&mut body, quick(0, 3)));

        for _ in 0..3 {
            machine.advance(&mut body, DT);
        }
        // Hitbox never reads false between the two swings
        assert!(machine.is_in_state(StateKind::Attacking));
        assert!(body.hitbox_active);
        assert_eq!(machine.swing_count(), 2);
    }

    #[test]
    fn test_illegal_request_is_buffered_then_applied() {
        let (mut machine, mut body) = setup();
        machine.request_transition(&mut body, jab());

        assert!(!machine.request_transition(&mut body, Transition::Blocking));
        assert_eq!(machine.pending().map(Transition::kind), Some(StateKind::Blocking));

        for _ in 0..14 {
            machine.advance(&mut body, DT);
            assert!(machine.is_in_state(StateKind::Attacking));
        }

        // Attack ends and the buffered block starts on the same tick
        machine.advance(&mut body, DT);
        assert!(machine.is_in_state(StateKind::Blocking));
        assert_eq!(machine.frame_count(), 0);
        assert!(body.is_blocking);
        assert!(machine.pending().is_none());
    }

    #[test]
    fn test_newest_buffered_request_wins() {
        let (mut machine, mut body) = setup();
        machine.request_transition(&mut body, jab());
        machine.request_transition(&mut body, Transition::Blocking);
        machine.request_transition(&mut body, Transition::Moving);

        assert_eq!(machine.pending().map(Transition::kind), Some(StateKind::Moving));

        for _ in 0..15 {
            machine.advance(&mut body, DT);
        }
        assert!(machine.is_in_state(StateKind::Moving));
        assert!(!body.is_blocking);
    }

    #[test]
    fn test_successful_request_discards_buffer() {
        let (mut machine, mut body) = setup();
        machine.request_transition(&mut body, jab());
        machine.request_transition(&mut body, Transition::Blocking);
        assert!(machine.pending().is_some());

        assert!(machine.request_transition(&mut body, hit(5)));
        assert!(machine.pending().is_none());
    }

    #[test]
    fn test_buffer_survives_forced_transition() {
        let (mut machine, mut body) = setup();
        machine.request_transition(&mut body, jab());
        machine.request_transition(&mut body, Transition::Blocking);

        machine.force_transition(&mut body, hit(5));
        assert!(machine.pending().is_some());

        for _ in 0..5 {
            machine.advance(&mut body, DT);
        }
        // Hitstun over: Idle, then the buffered block
        assert!(machine.is_in_state(StateKind::Blocking));
    }

    #[test]
    fn test_same_state_request_keeps_frame_count() {
        let (mut machine, mut body) = setup();
        machine.request_transition(&mut body, Transition::Moving);
        machine.advance(&mut body, DT);
        machine.advance(&mut body, DT);
        assert!(machine.request_transition(&mut body, Transition::Moving));
        assert_eq!(machine.frame_count(), 2);
    }

    #[test]
    fn test_force_transition_interrupts_attack() {
        let (mut machine, mut body) = setup();
        machine.request_transition(&mut body, jab());
        for _ in 0..6 {
            machine.advance(&mut body, DT);
        }
        assert!(body.hitbox_active);

        machine.force_transition(&mut body, hit(14));
        assert!(machine.is_in_state(StateKind::Hit));
        assert!(!body.hitbox_active);
        assert_eq!(body.attack_phase, AttackPhase::None);
        assert_eq!(machine.previous_state(), Some(StateKind::Attacking));
        assert!(machine.current_move().is_none());
    }

    #[test]
    fn test_hitstun_then_idle() {
        let (mut machine, mut body) = setup();
        machine.force_transition(&mut body, hit(14));
        assert!(!machine.can_act());

        for _ in 0..13 {
            machine.advance(&mut body, DT);
            assert!(machine.is_in_state(StateKind::Hit));
        }
        machine.advance(&mut body, DT);
        assert!(machine.is_in_state(StateKind::Idle));
    }

    #[test]
    fn test_downed_recovers_only_with_hp() {
        let (mut machine, mut body) = setup();
        machine.force_transition(&mut body, Transition::Downed);
        assert!(!body.is_vulnerable);

        for _ in 0..59 {
            machine.advance(&mut body, DT);
        }
        assert!(machine.is_in_state(StateKind::Downed));
        machine.advance(&mut body, DT);
        assert!(machine.is_in_state(StateKind::Idle));
        assert!(body.is_vulnerable);

        body.current_hp = 0.0;
        machine.force_transition(&mut body, Transition::Downed);
        for _ in 0..500 {
            machine.advance(&mut body, DT);
        }
        assert!(machine.is_in_state(StateKind::Downed));
        assert!(!machine.request_transition(&mut body, Transition::Idle));
    }

    #[test]
    fn test_idle_cannot_request_downed() {
        let (mut machine, mut body) = setup();
        assert!(!machine.request_transition(&mut body, Transition::Downed));
        assert!(machine.is_in_state(StateKind::Idle));
        assert!(machine.cancel_pending(StateKind::Downed));
        assert!(machine.pending().is_none());
    }

    #[test]
    fn test_reset_clears_buffer() {
        let (mut machine, mut body) = setup();
        machine.request_transition(&mut body, jab());
        machine.request_transition(&mut body, Transition::Blocking);
        machine.reset(&mut body);
        assert!(machine.is_in_state(StateKind::Idle));
        assert!(machine.pending().is_none());
        assert!(machine.previous_state().is_none());
    }
}
