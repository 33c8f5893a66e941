use anyhow::Context;
use fooscore::projection::FieldGeometry;
use fooscore::table::Coordinate;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for the simulated ball.
///
/// Jitter defaults to zero so runs replay exactly; a nonzero value keeps
/// nudging the velocity and the ball may never come to rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub field: FieldGeometry,
    pub start_x: f64,
    pub start_y: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub damping: f64,
    pub restitution: f64,
    pub stop_threshold: f64,
    pub jitter: f64,
    pub seed: u64,
    /// Seconds of simulated time per step.
    pub dt: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        let field = FieldGeometry::default();
        Self {
            start_x: field.width / 2.0,
            start_y: field.height / 2.0,
            field,
            speed_x: 180.0,
            speed_y: 120.0,
            damping: 0.9,
            restitution: 0.5,
            stop_threshold: 0.1,
            jitter: 0.0,
            seed: 0,
            dt: 0.05,
        }
    }
}

impl MotionConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading motion config {}", path_ref.display()))?;
        let config: MotionConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing motion config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    fn normalized_dt(&self) -> f64 {
        if self.dt > 0.0 {
            self.dt
        } else {
            0.05
        }
    }
}

/// Deterministic bouncing ball. Velocity decays by `damping` each step,
/// wall hits reflect it scaled by `restitution`, and anything slower than
/// `stop_threshold` counts as at rest.
pub struct BallMotionModel {
    config: MotionConfig,
    position: Coordinate,
    velocity_x: f64,
    velocity_y: f64,
    rng: StdRng,
}

impl BallMotionModel {
    pub fn new(config: MotionConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            position: Coordinate::new(config.start_x, config.start_y),
            velocity_x: config.speed_x,
            velocity_y: config.speed_y,
            config,
            rng,
        }
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn at_rest(&self) -> bool {
        self.velocity_x == 0.0 && self.velocity_y == 0.0
    }

    /// Puts the ball back at its starting spot with its starting velocity.
    pub fn recenter(&mut self) {
        self.position = Coordinate::new(self.config.start_x, self.config.start_y);
        self.velocity_x = self.config.speed_x;
        self.velocity_y = self.config.speed_y;
    }

    /// Advances the simulation by one step and returns the new position.
    pub fn step(&mut self) -> Coordinate {
        if self.at_rest() {
            return self.position;
        }

        let dt = self.config.normalized_dt();
        let width = self.config.field.width;
        let height = self.config.field.height;

        let mut x = self.position.x + self.velocity_x * dt;
        let mut y = self.position.y + self.velocity_y * dt;

        if x < 0.0 {
            x = -x;
            self.velocity_x = -self.velocity_x * self.config.restitution;
        } else if x > width {
            x = 2.0 * width - x;
            self.velocity_x = -self.velocity_x * self.config.restitution;
        }
        if y < 0.0 {
            y = -y;
            self.velocity_y = -self.velocity_y * self.config.restitution;
        } else if y > height {
            y = 2.0 * height - y;
            self.velocity_y = -self.velocity_y * self.config.restitution;
        }

        self.velocity_x *= self.config.damping;
        self.velocity_y *= self.config.damping;

        if self.config.jitter > 0.0 {
            self.velocity_x += self.rng.gen_range(-self.config.jitter..self.config.jitter);
            self.velocity_y += self.rng.gen_range(-self.config.jitter..self.config.jitter);
        }

        let speed = (self.velocity_x * self.velocity_x + self.velocity_y * self.velocity_y).sqrt();
        if speed < self.config.stop_threshold {
            self.velocity_x = 0.0;
            self.velocity_y = 0.0;
        }

        self.position = Coordinate::new(x, y);
        self.position
    }

    /// Runs `ticks` steps and collects the visited positions.
    pub fn trajectory(&mut self, ticks: usize) -> Vec<Coordinate> {
        (0..ticks).map(|_| self.step()).collect()
    }
}
