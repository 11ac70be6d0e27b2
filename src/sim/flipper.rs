//! Flipper control
//!
//! Targets come from an explicit per-action lookup so the mapping is
//! independently testable; angles chase the target at a bounded rate and
//! clamp exactly on arrival. Each flipper is a small state machine: idle,
//! rotating-to-active, active, rotating-to-idle.

use super::state::{Action, GameState};

/// Which flippers an action drives active this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTargets {
    pub left_active: bool,
    pub right_active: bool,
}

/// Action -> (left target, right target) lookup
pub fn action_targets(action: Action) -> ActionTargets {
    match action {
        Action::Idle => ActionTargets {
            left_active: false,
            right_active: false,
        },
        Action::ActivateLeft => ActionTargets {
            left_active: true,
            right_active: false,
        },
        Action::ActivateRight => ActionTargets {
            left_active: false,
            right_active: true,
        },
        Action::ActivateBoth => ActionTargets {
            left_active: true,
            right_active: true,
        },
    }
}

/// Set both flipper targets from the action and bump the level-triggered
/// press counters for every side the action drives
pub fn apply_action(state: &mut GameState, action: Action) {
    let targets = action_targets(action);
    state.left_flipper.set_target(targets.left_active);
    state.right_flipper.set_target(targets.right_active);
    if targets.left_active {
        state.left_stats.presses += 1;
    }
    if targets.right_active {
        state.right_stats.presses += 1;
    }
}

/// Advance both flipper angles toward their targets at the layout's rate
pub fn update_flippers(state: &mut GameState) {
    let rate = state.layout.rotation_rate_deg;
    state.left_flipper.rotate_toward_target(rate);
    state.right_flipper.rotate_toward_target(rate);
}
