//! Construction-time configuration
//!
//! Every knob a driver can set, validated fail-fast before any simulation
//! state exists. The core never partially initializes: a bad config is an
//! `Err` from [`GameState::new`](crate::GameState::new), not a runtime panic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration rejected at construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("playfield dimensions must be positive, got {width}x{height}")]
    BadDimensions { width: f32, height: f32 },
    #[error("bottom UI area ({bottom}) leaves no playground in a {height} tall field")]
    BadBottomArea { bottom: f32, height: f32 },
    #[error("ball radius must be positive, got {0}")]
    BadBallRadius(f32),
    #[error("bumper {index} radius must be positive, got {radius}")]
    BadBumperRadius { index: usize, radius: f32 },
    #[error("flipper layout degenerate: computed length {0} is not positive")]
    DegenerateFlippers(f32),
    #[error("session must run at least one episode")]
    NoEpisodes,
    #[error("max ball speed must be positive, got {0}")]
    BadMaxSpeed(f32),
    #[error("flipper rotation scale must be positive, got {0}")]
    BadRotationScale(f32),
}

/// Simulation configuration
///
/// Defaults match the reference table: a 700x1000 window with a 150 px
/// bottom UI strip, three bumpers, one ball per episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Total window width in px
    pub width: f32,
    /// Total window height in px (playground + bottom UI strip)
    pub height: f32,
    /// Height of the bottom UI strip excluded from the playground
    pub bottom_area_height: f32,
    /// Height of the camera FOV band above the flipper deck
    pub camera_height: f32,
    /// Whether collaborators should draw the FOV rectangle (cosmetic)
    pub show_fov: bool,
    /// Ball radius in px
    pub ball_radius: f32,
    /// Radii of the three fixed bumpers (center, left, right)
    pub bumper_radii: [f32; 3],
    /// Number of cosmetic background LEDs (0 disables the field)
    pub num_leds: usize,
    /// Episodes per session
    pub num_episodes: u32,
    /// Ball speed cap in px/sec (converted to px/frame internally)
    pub max_ball_speed: f32,
    /// Scale on the flipper rotation rate (1.0 = full speed)
    pub flipper_rotation_scale: f32,
    /// Emit a telemetry sample every step
    pub save_speed_log: bool,
    /// Destination identifier handed to the telemetry collaborator;
    /// the core never opens it
    pub log_filename: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 1000.0,
            bottom_area_height: 150.0,
            camera_height: 128.0,
            show_fov: false,
            ball_radius: 15.0,
            bumper_radii: [25.0, 20.0, 20.0],
            num_leds: 0,
            num_episodes: 10,
            max_ball_speed: 400.0,
            flipper_rotation_scale: 1.0,
            save_speed_log: false,
            log_filename: "game.log".to_string(),
        }
    }
}

impl Config {
    /// Validate the configuration, failing fast on misuse
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ConfigError::BadDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.bottom_area_height < 0.0 || self.bottom_area_height >= self.height {
            return Err(ConfigError::BadBottomArea {
                bottom: self.bottom_area_height,
                height: self.height,
            });
        }
        if self.ball_radius <= 0.0 {
            return Err(ConfigError::BadBallRadius(self.ball_radius));
        }
        for (index, &radius) in self.bumper_radii.iter().enumerate() {
            if radius <= 0.0 {
                return Err(ConfigError::BadBumperRadius { index, radius });
            }
        }
        let flipper_length = self.width / 4.0 - self.ball_radius * 5.0 / 4.0;
        if flipper_length <= 0.0 {
            return Err(ConfigError::DegenerateFlippers(flipper_length));
        }
        if self.num_episodes == 0 {
            return Err(ConfigError::NoEpisodes);
        }
        if self.max_ball_speed <= 0.0 {
            return Err(ConfigError::BadMaxSpeed(self.max_ball_speed));
        }
        if self.flipper_rotation_scale <= 0.0 {
            return Err(ConfigError::BadRotationScale(self.flipper_rotation_scale));
        }
        Ok(())
    }
}
