//! Fixed-step simulation
//!
//! One call to [`step`] fully resolves a frame: flipper control, collision
//! resolution on the pre-integration position, gravity/integration/friction,
//! speed clamping, stuck-ball rescue and drain/episode bookkeeping. There is
//! no suspension inside a step; stop is only observed at step boundaries.

use super::collision;
use super::flipper;
use super::state::{Action, GameState};
use crate::consts::*;

/// Per-step output handed back to the driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutput {
    /// Reward earned during this step (bumper hits minus drain penalties)
    pub reward: f32,
    /// True while the episode's last ball is drained
    pub episode_over: bool,
    /// Interface completeness only; stays at its initial value in this core
    pub score: i64,
    /// The step's flipper collision was a boosted left hit
    pub left_success_hit: bool,
    /// The step's flipper collision was a boosted right hit
    pub right_success_hit: bool,
}

/// Advance the simulation by one frame
pub fn step(state: &mut GameState, action: Action) -> StepOutput {
    if state.running {
        state.reward = 0.0;

        flipper::apply_action(state, action);
        flipper::update_flippers(state);

        collision::resolve_flippers(state, action);
        collision::resolve_side_walls(state);
        collision::resolve_top_wall(state);
        collision::resolve_bumpers(state);
        collision::resolve_deck(state);

        // Gravity first, then integrate on the pre-friction velocity
        state.ball.vel.y += GRAVITY;
        state.ball.pos += state.ball.vel;

        state.ball.vel *= FRICTION;
        clamp_speed(state);

        check_stuck(state);

        if state.started {
            evaluate_game_over(state);
            check_drain(state);
        }

        state.time_ticks += 1;
        state.elapsed_secs += 1.0 / GAME_FPS;
        if !state.leds.is_empty() {
            state.update_leds();
        }

        state.episode_reward += state.reward;
        state.total_reward += state.reward;
    }

    StepOutput {
        reward: state.reward,
        episode_over: state.episode_over,
        score: state.score,
        left_success_hit: state.left_success_hit,
        right_success_hit: state.right_success_hit,
    }
}

/// Enforce the per-frame speed cap after friction
fn clamp_speed(state: &mut GameState) {
    let cap = state.layout.max_speed_per_frame;
    let speed = state.ball.vel.length();
    if speed > cap {
        state.ball.vel *= cap / speed;
    }
}

/// Safety valve: a ball resting motionless at or below pivot height is
/// unreachable, so respawn it without penalty
fn check_stuck(state: &mut GameState) {
    let vel = state.ball.vel;
    let motionless =
        (vel.x.abs() * 10.0).round() == 0.0 && (vel.y.abs() * 10.0).round() == 0.0;
    let at_deck = state.ball.pos.y + state.ball.radius >= state.layout.right_pivot.y;
    if motionless && at_deck {
        state.ball_stuck = true;
        log::debug!("stuck ball respawned at tick {}", state.time_ticks);
        state.reset_ball();
    } else {
        state.ball_stuck = false;
    }
}

/// Single-episode-over flag tracks remaining balls; the session stops once
/// the episode limit is reached
fn evaluate_game_over(state: &mut GameState) {
    state.episode_over = state.remaining_balls == 0;
    if state.session_over() {
        state.running = false;
    }
}

/// Drain: the ball is lost when its bottom edge falls one flipper length
/// below pivot height inside the gap. Runs after `evaluate_game_over` so the
/// terminal flag it sets survives into this step's output.
fn check_drain(state: &mut GameState) {
    if state.session_over() {
        return;
    }
    let layout = &state.layout;
    let drain_y = layout.deck_y + layout.flipper_length;
    let in_gap = layout.gap_left <= state.ball.pos.x && state.ball.pos.x <= layout.gap_right;
    if state.ball.pos.y + state.ball.radius < drain_y || !in_gap {
        return;
    }

    state.remaining_balls -= 1;
    if state.remaining_balls > 0 {
        state.reward += DRAIN_PENALTY;
        state.reset_ball();
        log::info!(
            "ball drained in episode {}, {} remaining",
            state.episode,
            state.remaining_balls
        );
    } else {
        state.episode_over = true;
        state.episode += 1;
        state.elapsed_secs = 0.0;
        if state.episode < state.config.num_episodes {
            log::info!("episode {} over, resetting", state.episode);
            state.reset();
        } else {
            log::info!("session over after {} episodes", state.episode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(Config::default(), 1).unwrap()
    }

    /// Park the ball somewhere collision-free so a step is pure integration
    fn park(state: &mut GameState, vel: Vec2) {
        state.ball.pos = state.layout.spawn;
        state.ball.vel = vel;
    }

    #[test]
    fn test_gravity_friction_integration_scenario() {
        let mut s = state();
        park(&mut s, Vec2::new(5.0, 5.0));
        let y0 = s.ball.pos.y;

        step(&mut s, Action::Idle);

        // Gravity lands before integration: y advances by the pre-friction 5.1
        assert!((s.ball.pos.y - (y0 + 5.1)).abs() < 1e-4);
        // Friction then applies to the post-gravity velocity
        assert!((s.ball.vel.y - 5.1 * FRICTION).abs() < 1e-4);
        assert!((s.ball.vel.x - 5.0 * FRICTION).abs() < 1e-4);
    }

    #[test]
    fn test_speed_cap_holds_after_flipper_boost() {
        let mut s = state();
        s.left_flipper.angle_deg = s.left_flipper.active_deg;
        s.ball.pos = s.layout.left_pivot + Vec2::new(s.layout.flipper_length / 2.0, -5.0);
        s.ball.vel = Vec2::new(0.0, 6.0);

        step(&mut s, Action::ActivateLeft);

        assert!(s.left_success_hit);
        assert!(s.ball_speed_per_frame() <= s.layout.max_speed_per_frame + 1e-4);
    }

    #[test]
    fn test_speed_cap_every_step() {
        let mut s = state();
        park(&mut s, Vec2::new(50.0, 50.0));
        for _ in 0..200 {
            step(&mut s, Action::Idle);
            assert!(s.ball_speed_per_frame() <= s.layout.max_speed_per_frame + 1e-4);
        }
    }

    #[test]
    fn test_drain_with_spare_ball_penalizes_and_respawns() {
        let mut s = state();
        s.start();
        s.remaining_balls = 2;
        let drain_y = s.layout.deck_y + s.layout.flipper_length;
        s.ball.pos = Vec2::new((s.layout.gap_left + s.layout.gap_right) / 2.0, drain_y + 5.0);
        s.ball.vel = Vec2::new(0.0, 2.0);

        let out = step(&mut s, Action::Idle);

        assert_eq!(s.remaining_balls, 1);
        assert!((out.reward - DRAIN_PENALTY).abs() < 1e-6);
        assert!(!out.episode_over);
        assert_eq!(s.ball.pos, s.layout.spawn);
        for component in [s.ball.vel.x, s.ball.vel.y] {
            assert!((RESPAWN_SPEED_MIN..=RESPAWN_SPEED_MAX).contains(&component));
        }
    }

    #[test]
    fn test_terminal_drain_ends_episode_and_resets() {
        let mut s = state();
        s.start();
        assert_eq!(s.remaining_balls, 1);
        let drain_y = s.layout.deck_y + s.layout.flipper_length;
        s.ball.pos = Vec2::new((s.layout.gap_left + s.layout.gap_right) / 2.0, drain_y + 5.0);
        s.ball.vel = Vec2::new(0.0, 2.0);

        let out = step(&mut s, Action::Idle);

        assert!(out.episode_over);
        assert_eq!(s.episode, 1);
        // More episodes remain: full reset restocked the ball
        assert_eq!(s.remaining_balls, 1);
        assert_eq!(s.ball.pos, s.layout.spawn);

        // Next uneventful step clears the terminal flag
        let out = step(&mut s, Action::Idle);
        assert!(!out.episode_over);
    }

    #[test]
    fn test_session_ends_at_episode_limit() {
        let cfg = Config {
            num_episodes: 1,
            ..Default::default()
        };
        let mut s = GameState::new(cfg, 1).unwrap();
        s.start();
        let drain_y = s.layout.deck_y + s.layout.flipper_length;
        s.ball.pos = Vec2::new((s.layout.gap_left + s.layout.gap_right) / 2.0, drain_y + 5.0);
        s.ball.vel = Vec2::new(0.0, 2.0);

        let out = step(&mut s, Action::Idle);
        assert!(out.episode_over);
        assert_eq!(s.episode, 1);
        assert!(s.session_over());

        // The step after the last drain halts the session
        step(&mut s, Action::Idle);
        assert!(!s.running);
        let pos = s.ball.pos;
        step(&mut s, Action::Idle);
        assert_eq!(s.ball.pos, pos);
    }

    #[test]
    fn test_outside_gap_bounces_instead_of_draining() {
        let mut s = state();
        s.start();
        // Strictly left of the gap at deck height: must bounce, never drain
        s.ball.pos = Vec2::new(s.layout.gap_left - 30.0, s.layout.deck_y);
        s.ball.vel = Vec2::new(0.0, 4.0);

        let out = step(&mut s, Action::Idle);

        assert_eq!(s.remaining_balls, 1);
        assert_eq!(out.reward, 0.0);
        assert!(s.ball.vel.y < 0.0);
    }

    #[test]
    fn test_drain_ignored_before_start() {
        let mut s = state();
        let drain_y = s.layout.deck_y + s.layout.flipper_length;
        s.ball.pos = Vec2::new((s.layout.gap_left + s.layout.gap_right) / 2.0, drain_y + 5.0);
        s.ball.vel = Vec2::new(0.0, 2.0);

        let out = step(&mut s, Action::Idle);

        assert_eq!(s.remaining_balls, 1);
        assert_eq!(out.reward, 0.0);
        assert!(!out.episode_over);
    }

    #[test]
    fn test_stuck_ball_respawns_without_penalty() {
        let mut s = state();
        // Below deck height over the gap, with exactly enough upward speed
        // that gravity cancels it: both components round to zero this step
        let mid_gap = (s.layout.gap_left + s.layout.gap_right) / 2.0;
        s.ball.pos = Vec2::new(mid_gap, s.layout.deck_y + 100.0);
        s.ball.vel = Vec2::new(0.0, -GRAVITY);

        let out = step(&mut s, Action::Idle);

        assert!(s.ball_stuck);
        assert_eq!(out.reward, 0.0);
        assert_eq!(s.ball.pos, s.layout.spawn);
    }

    #[test]
    fn test_reward_totals_match_per_step_sum() {
        let mut s = state();
        s.start();
        park(&mut s, Vec2::new(4.0, -2.0));
        let actions = [
            Action::Idle,
            Action::ActivateLeft,
            Action::ActivateBoth,
            Action::ActivateRight,
        ];
        let mut sum = 0.0;
        for i in 0..400 {
            if !s.running {
                break;
            }
            let out = step(&mut s, actions[i % actions.len()]);
            sum += out.reward;
        }
        assert!((s.total_reward - sum).abs() < 1e-3);
    }

    #[test]
    fn test_determinism_with_fixed_seed() {
        let mut a = GameState::new(Config::default(), 4242).unwrap();
        let mut b = GameState::new(Config::default(), 4242).unwrap();
        a.start();
        b.start();
        for i in 0..500 {
            let action = Action::from_index((i % 4) as u8);
            step(&mut a, action);
            step(&mut b, action);
        }
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.ball.vel, b.ball.vel);
        assert_eq!(a.episode, b.episode);
        assert_eq!(a.total_reward, b.total_reward);
    }

    #[test]
    fn test_elapsed_time_advances_per_step() {
        let mut s = state();
        park(&mut s, Vec2::new(1.0, -1.0));
        for _ in 0..60 {
            step(&mut s, Action::Idle);
        }
        assert_eq!(s.time_ticks, 60);
        assert!((s.elapsed_secs - 1.0).abs() < 1e-3);
    }
}
