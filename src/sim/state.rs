//! Game state and core simulation types
//!
//! One owned state struct holds everything a step mutates; no ambient
//! globals. All state is serializable so drivers can snapshot a session.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::rotate_deg;
use crate::config::{Config, ConfigError};
use crate::consts::*;

/// Discrete per-step control input: which flipper(s) to drive active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Idle,
    ActivateLeft,
    ActivateRight,
    ActivateBoth,
}

impl Action {
    /// Lossy mapping from a raw driver index. Out-of-range values fall
    /// through to `Idle` rather than erroring.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Action::ActivateLeft,
            2 => Action::ActivateRight,
            3 => Action::ActivateBoth,
            _ => Action::Idle,
        }
    }
}

/// Which flipper a collision or counter refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipperSide {
    Left,
    Right,
}

/// The ball: position and velocity in px and px/frame, +y pointing down
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// One flipper: a fixed pivot with an angle chasing a target
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Flipper {
    pub pivot: Vec2,
    /// Current angle in degrees, interpolated every step
    pub angle_deg: f32,
    /// Target angle, set once per step from the action
    pub target_deg: f32,
    pub idle_deg: f32,
    pub active_deg: f32,
}

impl Flipper {
    fn at_rest(pivot: Vec2, idle_deg: f32, active_deg: f32) -> Self {
        Self {
            pivot,
            angle_deg: idle_deg,
            target_deg: idle_deg,
            idle_deg,
            active_deg,
        }
    }

    /// Drive the target to the active or idle bound
    pub fn set_target(&mut self, active: bool) {
        self.target_deg = if active { self.active_deg } else { self.idle_deg };
    }

    /// Move the current angle toward the target by at most `rate_deg`,
    /// clamping exactly at the target when a full step would overshoot
    pub fn rotate_toward_target(&mut self, rate_deg: f32) {
        if self.angle_deg < self.target_deg {
            self.angle_deg = (self.angle_deg + rate_deg).min(self.target_deg);
        } else if self.angle_deg > self.target_deg {
            self.angle_deg = (self.angle_deg - rate_deg).max(self.target_deg);
        }
    }

    /// Pivot-to-tip collision segment at the current angle, with the length
    /// extended 10% beyond nominal for a forgiving hitbox
    pub fn collision_segment(&self, length: f32) -> (Vec2, Vec2) {
        let reach = Vec2::new(length * FLIPPER_HITBOX_SCALE, 0.0);
        let tip = self.pivot + rotate_deg(reach, self.angle_deg);
        (self.pivot, tip)
    }
}

/// A circular bumper. Immutable within an episode, recreated on reset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bumper {
    pub center: Vec2,
    pub radius: f32,
    /// Bounce multiplier applied to the reflected velocity
    pub bounce: f32,
    /// Cosmetic only, excluded from physics
    pub color: [u8; 3],
}

/// A cosmetic background blinker. Physics-inert; collaborators draw them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Led {
    pub pos: Vec2,
    pub radius: f32,
    pub color: [u8; 3],
    pub blink_interval: f32,
    pub last_toggle: f32,
    pub lit: bool,
}

/// Per-flipper hit/press counters
///
/// Presses are level-triggered: they increment every step the action drives
/// the flipper active, not only on activation edges.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FlipperStats {
    pub touches: u32,
    pub success_hits: u32,
    pub presses: u32,
}

/// Static playfield geometry derived once from the config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    /// Play area height (window height minus the bottom UI strip)
    pub playground_height: f32,
    /// Flipper pivot height; the deck the ball rests on outside the gap
    pub deck_y: f32,
    pub camera_upper_bound: f32,
    pub flipper_length: f32,
    pub flipper_width: f32,
    pub left_pivot: Vec2,
    pub right_pivot: Vec2,
    /// Drain gap bounds, taken from the flipper pivot x-coordinates
    pub gap_left: f32,
    pub gap_right: f32,
    /// Ball spawn point (center x, playground mid-height)
    pub spawn: Vec2,
    /// Speed cap in px/frame, converted from the configured px/sec
    pub max_speed_per_frame: f32,
    /// Flipper rotation rate in degrees per step, after the configured scale
    pub rotation_rate_deg: f32,
}

impl Layout {
    pub fn from_config(config: &Config) -> Self {
        let playground_height = config.height - config.bottom_area_height;
        let deck_y = playground_height - playground_height / 5.0;
        let left_pivot = Vec2::new(config.width / 4.0, deck_y);
        let right_pivot = Vec2::new(3.0 * config.width / 4.0, deck_y);
        Self {
            width: config.width,
            height: config.height,
            playground_height,
            deck_y,
            camera_upper_bound: deck_y - config.camera_height,
            flipper_length: config.width / 4.0 - config.ball_radius * 5.0 / 4.0,
            flipper_width: config.height / 80.0,
            left_pivot,
            right_pivot,
            gap_left: left_pivot.x,
            gap_right: right_pivot.x,
            spawn: Vec2::new(config.width / 2.0, playground_height / 2.0),
            max_speed_per_frame: config.max_ball_speed / GAME_FPS,
            rotation_rate_deg: FLIPPER_ROTATION_SPEED * config.flipper_rotation_scale,
        }
    }
}

/// Read-only view of one flipper for drawing/telemetry
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlipperView {
    pub pivot: Vec2,
    pub angle_deg: f32,
    pub length: f32,
    pub width: f32,
}

/// Read-only snapshot of everything a renderer needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub ball_pos: Vec2,
    pub ball_radius: f32,
    pub left_flipper: FlipperView,
    pub right_flipper: FlipperView,
    pub bumpers: Vec<Bumper>,
    pub leds: Vec<Led>,
    pub remaining_balls: u32,
    pub elapsed_secs: f32,
    /// Camera FOV band: the strip above the flipper deck
    pub camera_upper_bound: f32,
    pub camera_lower_bound: f32,
    pub show_fov: bool,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub config: Config,
    pub layout: Layout,

    pub ball: Ball,
    pub left_flipper: Flipper,
    pub right_flipper: Flipper,
    pub bumpers: Vec<Bumper>,
    pub leds: Vec<Led>,

    /// Physics keeps stepping while true; cleared by `stop()` or session end
    pub running: bool,
    /// Drain/game-over bookkeeping only engages once `start()` was called
    pub started: bool,
    /// True on the step an episode's last ball drains, and while drained
    pub episode_over: bool,
    /// Retained for interface completeness; this core never scores into it
    pub score: i64,
    pub remaining_balls: u32,
    /// Completed episodes; the session ends when this reaches the limit
    pub episode: u32,

    /// Reward accumulated during the current step
    pub reward: f32,
    /// Reward accumulated since the episode started
    pub episode_reward: f32,
    /// Reward accumulated over the whole session
    pub total_reward: f32,

    pub left_stats: FlipperStats,
    pub right_stats: FlipperStats,
    /// Set while the current step's collision was a boosted left/right hit
    pub left_success_hit: bool,
    pub right_success_hit: bool,
    /// Set on steps where the stuck-ball safety valve respawned the ball
    pub ball_stuck: bool,

    pub time_ticks: u64,
    pub elapsed_secs: f32,
    /// Whether telemetry samples are emitted (see `telemetry_sample`)
    pub logging: bool,
}

impl GameState {
    /// Build a validated simulation. Fails fast on config misuse and never
    /// partially initializes.
    pub fn new(config: Config, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let layout = Layout::from_config(&config);
        let logging = config.save_speed_log;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ball: Ball {
                pos: layout.spawn,
                vel: Vec2::ZERO,
                radius: config.ball_radius,
            },
            left_flipper: Flipper::at_rest(layout.left_pivot, LEFT_IDLE_ANGLE, LEFT_ACTIVE_ANGLE),
            right_flipper: Flipper::at_rest(
                layout.right_pivot,
                RIGHT_IDLE_ANGLE,
                RIGHT_ACTIVE_ANGLE,
            ),
            bumpers: Vec::new(),
            leds: Vec::new(),
            running: true,
            started: false,
            episode_over: false,
            score: 0,
            remaining_balls: BALLS_PER_EPISODE,
            episode: 0,
            reward: 0.0,
            episode_reward: 0.0,
            total_reward: 0.0,
            left_stats: FlipperStats::default(),
            right_stats: FlipperStats::default(),
            left_success_hit: false,
            right_success_hit: false,
            ball_stuck: false,
            time_ticks: 0,
            elapsed_secs: 0.0,
            logging,
            config,
            layout,
        };
        state.reset();
        Ok(state)
    }

    /// Reset ball, bumpers, flippers, LEDs and all per-episode bookkeeping.
    /// The episode counter and session totals survive.
    pub fn reset(&mut self) {
        self.score = 0;
        self.remaining_balls = BALLS_PER_EPISODE;
        self.reward = 0.0;
        self.episode_reward = 0.0;
        self.left_stats = FlipperStats::default();
        self.right_stats = FlipperStats::default();
        self.left_success_hit = false;
        self.right_success_hit = false;
        self.ball_stuck = false;
        self.reset_ball();
        self.reset_bumpers();
        self.reset_flippers();
        if self.config.num_leds > 0 {
            self.reset_leds();
        }
    }

    /// Begin drain/episode bookkeeping. Physics runs regardless.
    pub fn start(&mut self) {
        self.started = true;
        log::info!("session started: {} episode(s)", self.config.num_episodes);
    }

    /// Stop the session at the next step boundary
    pub fn stop(&mut self) {
        self.running = false;
        log::info!("session stopped after {} step(s)", self.time_ticks);
    }

    /// Toggle telemetry emission
    pub fn set_logging(&mut self, enabled: bool) {
        self.logging = enabled;
    }

    /// True once the configured episode limit is exhausted
    pub fn session_over(&self) -> bool {
        self.episode >= self.config.num_episodes
    }

    /// Respawn the ball at the spawn point with a fresh randomized velocity
    pub fn reset_ball(&mut self) {
        self.ball.pos = self.layout.spawn;
        self.ball.vel = Vec2::new(
            self.rng.random_range(RESPAWN_SPEED_MIN..=RESPAWN_SPEED_MAX),
            self.rng.random_range(RESPAWN_SPEED_MIN..=RESPAWN_SPEED_MAX),
        );
    }

    /// Recreate the fixed bumper set: one high in the center, two flanking
    fn reset_bumpers(&mut self) {
        let w = self.layout.width;
        let h = self.layout.height;
        let radii = self.config.bumper_radii;
        self.bumpers = vec![
            Bumper {
                center: Vec2::new(w / 2.0, h / 5.0),
                radius: radii[0],
                bounce: BUMPER_BOUNCE,
                color: [0, 0, 255],
            },
            Bumper {
                center: Vec2::new(w / 4.0, h / 3.0),
                radius: radii[1],
                bounce: BUMPER_BOUNCE,
                color: [255, 0, 255],
            },
            Bumper {
                center: Vec2::new(3.0 * w / 4.0, h / 3.0),
                radius: radii[2],
                bounce: BUMPER_BOUNCE,
                color: [255, 255, 0],
            },
        ];
    }

    fn reset_flippers(&mut self) {
        self.left_flipper =
            Flipper::at_rest(self.layout.left_pivot, LEFT_IDLE_ANGLE, LEFT_ACTIVE_ANGLE);
        self.right_flipper = Flipper::at_rest(
            self.layout.right_pivot,
            RIGHT_IDLE_ANGLE,
            RIGHT_ACTIVE_ANGLE,
        );
    }

    /// Scatter fresh LEDs over the playground with randomized blink cadence
    fn reset_leds(&mut self) {
        let count = self.config.num_leds;
        let w = self.layout.width;
        let ph = self.layout.playground_height;
        self.leds.clear();
        for _ in 0..count {
            let led = Led {
                pos: Vec2::new(
                    self.rng.random_range(10.0..w - 10.0),
                    self.rng.random_range(10.0..ph - 10.0),
                ),
                radius: 5.0,
                color: [
                    self.rng.random_range(0..=255u8),
                    self.rng.random_range(0..=255u8),
                    self.rng.random_range(0..=255u8),
                ],
                blink_interval: self.rng.random_range(0.5..1.5),
                last_toggle: 0.0,
                lit: true,
            };
            self.leds.push(led);
        }
    }

    /// Advance LED blink phases from elapsed time
    pub fn update_leds(&mut self) {
        let now = self.elapsed_secs;
        for led in &mut self.leds {
            if now - led.last_toggle > led.blink_interval {
                led.lit = !led.lit;
                led.last_toggle = now;
            }
        }
    }

    pub fn flipper(&self, side: FlipperSide) -> &Flipper {
        match side {
            FlipperSide::Left => &self.left_flipper,
            FlipperSide::Right => &self.right_flipper,
        }
    }

    pub fn stats_mut(&mut self, side: FlipperSide) -> &mut FlipperStats {
        match side {
            FlipperSide::Left => &mut self.left_stats,
            FlipperSide::Right => &mut self.right_stats,
        }
    }

    /// Ball speed this frame, px/frame
    pub fn ball_speed_per_frame(&self) -> f32 {
        self.ball.vel.length()
    }

    /// Ball speed this frame, px/sec
    pub fn ball_speed_per_sec(&self) -> f32 {
        self.ball.vel.length() * GAME_FPS
    }

    /// Read-only snapshot for renderers and telemetry consumers
    pub fn render_snapshot(&self) -> RenderSnapshot {
        let view = |f: &Flipper| FlipperView {
            pivot: f.pivot,
            angle_deg: f.angle_deg,
            length: self.layout.flipper_length,
            width: self.layout.flipper_width,
        };
        RenderSnapshot {
            ball_pos: self.ball.pos,
            ball_radius: self.ball.radius,
            left_flipper: view(&self.left_flipper),
            right_flipper: view(&self.right_flipper),
            bumpers: self.bumpers.clone(),
            leds: self.leds.clone(),
            remaining_balls: self.remaining_balls,
            elapsed_secs: self.elapsed_secs,
            camera_upper_bound: self.layout.camera_upper_bound,
            camera_lower_bound: self.layout.deck_y,
            show_fov: self.config.show_fov,
        }
    }
}
