//! Collision detection and response
//!
//! Checks run in a fixed order each step, each independent and possibly
//! compounding: flippers, side walls, top wall, bumpers, flipper deck.
//! All resolution happens on the pre-integration ball position; the
//! integrator then advances the corrected ball.

use super::flipper::action_targets;
use super::geometry::{point_segment_distance, reflect};
use super::state::{Action, FlipperSide, GameState};
use crate::consts::*;

/// Resolve flipper contact for the side(s) the action drives this step.
///
/// Idle checks neither side; a side not being driven cannot deflect the
/// ball even when their segments overlap it.
pub fn resolve_flippers(state: &mut GameState, action: Action) {
    state.left_success_hit = false;
    state.right_success_hit = false;
    let targets = action_targets(action);
    if targets.left_active {
        resolve_flipper(state, FlipperSide::Left, true);
    }
    if targets.right_active {
        resolve_flipper(state, FlipperSide::Right, true);
    }
}

/// Resolve one flipper segment against the ball.
///
/// `boosted` marks a player-triggered hit (the action drives this side), as
/// opposed to a passive touch. The public resolver only runs driven sides,
/// so it always passes true; the distinction stays testable here.
fn resolve_flipper(state: &mut GameState, side: FlipperSide, boosted: bool) {
    let length = state.layout.flipper_length;
    let (pivot, tip) = state.flipper(side).collision_segment(length);
    let (dist, closest) = point_segment_distance(state.ball.pos, pivot, tip);
    if dist >= state.ball.radius {
        return;
    }

    let collision_vec = state.ball.pos - closest;
    if collision_vec.length_squared() == 0.0 {
        // Ball center exactly on the segment: normal undefined, skip the
        // bounce this step
        return;
    }
    let normal = collision_vec.normalize();
    let mut reflected = reflect(state.ball.vel, normal);

    state.stats_mut(side).touches += 1;
    if boosted {
        reflected *= FLIPPER_BOOST;
        state.stats_mut(side).success_hits += 1;
        match side {
            FlipperSide::Left => state.left_success_hit = true,
            FlipperSide::Right => state.right_success_hit = true,
        }
        log::debug!("{side:?} flipper success hit at {closest}");
    }

    state.ball.vel = reflected;
    // Push well clear of the segment so the ball cannot tunnel back in or
    // rest on the flipper next step
    state.ball.pos = closest + normal * (state.ball.radius + FLIPPER_PUSH_OUT);
}

/// Left/right screen edges: clamp and invert horizontal velocity with
/// restitution
pub fn resolve_side_walls(state: &mut GameState) {
    let r = state.ball.radius;
    let width = state.layout.width;
    if state.ball.pos.x - r <= 0.0 {
        state.ball.pos.x = r;
        state.ball.vel.x = -state.ball.vel.x * WALL_RESTITUTION;
    }
    if state.ball.pos.x + r >= width {
        state.ball.pos.x = width - r;
        state.ball.vel.x = -state.ball.vel.x * WALL_RESTITUTION;
    }
}

/// Top boundary: clamp, and nudge downward instead of reflecting when the
/// vertical speed is too small to escape the ceiling
pub fn resolve_top_wall(state: &mut GameState) {
    let r = state.ball.radius;
    if state.ball.pos.y - r <= 0.0 {
        state.ball.pos.y = r;
        if state.ball.vel.y.abs() < TOP_NUDGE {
            state.ball.vel.y = TOP_NUDGE;
        } else {
            state.ball.vel.y = -state.ball.vel.y * WALL_RESTITUTION;
        }
    }
}

/// Circular bumpers: reflect, scale by the bumper's bounce factor, reposition
/// just outside, and award the fixed bumper reward
pub fn resolve_bumpers(state: &mut GameState) {
    for i in 0..state.bumpers.len() {
        let bumper = state.bumpers[i];
        let delta = state.ball.pos - bumper.center;
        let dist = delta.length();
        if dist >= state.ball.radius + bumper.radius {
            continue;
        }
        if dist == 0.0 {
            // Ball center on the bumper center: no outward direction
            continue;
        }
        let normal = delta / dist;
        state.ball.vel = reflect(state.ball.vel, normal) * bumper.bounce;
        state.ball.pos = bumper.center + normal * (state.ball.radius + bumper.radius + 1.0);
        state.reward += BUMPER_REWARD;
        log::debug!("bumper {i} hit, reward {:+}", BUMPER_REWARD);
    }
}

/// Flipper deck: the bottom boundary at pivot height, open only over the
/// drain gap between the two pivots
pub fn resolve_deck(state: &mut GameState) {
    let r = state.ball.radius;
    let layout = &state.layout;
    let over_gap = layout.gap_left <= state.ball.pos.x && state.ball.pos.x <= layout.gap_right;
    if state.ball.pos.y + r >= layout.deck_y && !over_gap {
        state.ball.pos.y = layout.deck_y - r;
        state.ball.vel.y = -state.ball.vel.y * WALL_RESTITUTION;
    }
}
