//! Property tests for the simulation invariants
//!
//! Random ball placements and action sequences must never break the speed
//! cap, wall containment, drain determinism or reward bookkeeping.

use glam::Vec2;
use pinball_sim::sim::collision;
use pinball_sim::sim::state::Action;
use pinball_sim::{Config, GameState, step};
use proptest::prelude::*;

fn arb_action() -> impl Strategy<Value = Action> {
    (0u8..4).prop_map(Action::from_index)
}

proptest! {
    /// Post-friction speed never exceeds the per-frame cap, whatever the
    /// driver does and wherever the ball starts
    #[test]
    fn speed_cap_holds_for_all_steps(
        seed in any::<u64>(),
        actions in prop::collection::vec(arb_action(), 1..200),
    ) {
        let mut state = GameState::new(Config::default(), seed).unwrap();
        state.start();
        let cap = state.layout.max_speed_per_frame;
        for action in actions {
            if !state.running {
                break;
            }
            step(&mut state, action);
            prop_assert!(state.ball_speed_per_frame() <= cap + 1e-3);
        }
    }

    /// Side/top wall resolution always leaves the ball center inside
    /// [radius, width - radius] x [radius, ..)
    #[test]
    fn wall_resolution_contains_ball(
        x in -200.0f32..900.0,
        y in -200.0f32..900.0,
        vx in -50.0f32..50.0,
        vy in -50.0f32..50.0,
    ) {
        let mut state = GameState::new(Config::default(), 0).unwrap();
        state.ball.pos = Vec2::new(x, y);
        state.ball.vel = Vec2::new(vx, vy);
        collision::resolve_side_walls(&mut state);
        collision::resolve_top_wall(&mut state);
        let r = state.ball.radius;
        prop_assert!(state.ball.pos.x >= r);
        prop_assert!(state.ball.pos.x <= state.layout.width - r);
        prop_assert!(state.ball.pos.y >= r);
    }

    /// A ball reaching deck height strictly outside the gap bounces (vy sign
    /// flips), it never falls toward the drain
    #[test]
    fn deck_bounces_outside_gap(
        offset in 1.0f32..100.0,
        vy in 0.5f32..30.0,
        left_side in any::<bool>(),
    ) {
        let mut state = GameState::new(Config::default(), 0).unwrap();
        let x = if left_side {
            (state.layout.gap_left - offset).max(state.ball.radius)
        } else {
            (state.layout.gap_right + offset).min(state.layout.width - state.ball.radius)
        };
        state.ball.pos = Vec2::new(x, state.layout.deck_y);
        state.ball.vel = Vec2::new(0.0, vy);
        collision::resolve_deck(&mut state);
        prop_assert!(state.ball.vel.y < 0.0);
        prop_assert!(state.ball.pos.y + state.ball.radius <= state.layout.deck_y);
    }

    /// Session-wide cumulative reward is exactly the sum of per-step rewards
    #[test]
    fn cumulative_reward_matches_step_sum(
        seed in any::<u64>(),
        actions in prop::collection::vec(arb_action(), 1..300),
    ) {
        let mut state = GameState::new(Config::default(), seed).unwrap();
        state.start();
        let mut sum = 0.0f64;
        for action in actions {
            if !state.running {
                break;
            }
            let out = step(&mut state, action);
            sum += f64::from(out.reward);
        }
        prop_assert!((f64::from(state.total_reward) - sum).abs() < 1e-2);
    }

    /// With a fixed target the flipper angle approaches monotonically, never
    /// crosses the target, and holds once converged
    #[test]
    fn flipper_approach_is_monotonic(scale in 0.001f32..2.0) {
        let cfg = Config {
            flipper_rotation_scale: scale,
            ..Default::default()
        };
        let mut state = GameState::new(cfg, 0).unwrap();
        state.left_flipper.set_target(true);
        let target = state.left_flipper.target_deg;
        let mut prev = state.left_flipper.angle_deg;
        let mut converged = false;
        for _ in 0..100_000 {
            state
                .left_flipper
                .rotate_toward_target(state.layout.rotation_rate_deg);
            let angle = state.left_flipper.angle_deg;
            prop_assert!(angle <= prev);
            prop_assert!(angle >= target);
            prev = angle;
            if angle == target {
                converged = true;
                break;
            }
        }
        prop_assert!(converged);
    }
}
