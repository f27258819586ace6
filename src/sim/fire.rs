//! Speed-driven fire trail behind the ball
//!
//! Purely visual: nothing here feeds back into the simulation.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::Ball;
use crate::consts::{BLUE_FIRE_THRESHOLD, FIRE_THRESHOLD};

/// Default particle cap
pub const MAX_FIRE_PARTICLES: usize = 80;

/// Single fire particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at birth, dead at 0
    pub life: f32,
    pub size: f32,
}

impl FireParticle {
    fn step(&mut self) {
        self.pos += self.vel;
        self.vel.y += 0.1; // slight gravity
        self.life -= 0.04;
        self.size *= 0.97;
    }

    fn is_dead(&self) -> bool {
        self.life <= 0.0 || self.size <= 0.5
    }
}

/// Particle emitter state
#[derive(Debug, Clone)]
pub struct FireEffect {
    rng: Pcg32,
    pub particles: Vec<FireParticle>,
    pub max_particles: usize,
    pub enabled: bool,
}

impl Default for FireEffect {
    fn default() -> Self {
        Self::new(0)
    }
}

impl FireEffect {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            particles: Vec::new(),
            max_particles: MAX_FIRE_PARTICLES,
            enabled: true,
        }
    }

    pub fn with_limits(seed: u64, max_particles: usize, enabled: bool) -> Self {
        Self {
            max_particles,
            enabled,
            ..Self::new(seed)
        }
    }

    #[inline]
    pub fn is_on_fire(speed: f32) -> bool {
        speed >= FIRE_THRESHOLD
    }

    #[inline]
    pub fn is_blue(speed: f32) -> bool {
        speed >= BLUE_FIRE_THRESHOLD
    }

    /// Particles emitted per update at `speed`
    pub fn emission_count(speed: f32) -> usize {
        (2 + (speed / 8.0).floor() as usize).min(6)
    }

    /// Emit behind a fast ball, then age every particle (newborns included)
    pub fn update(&mut self, ball: &Ball) {
        if !self.enabled {
            self.particles.clear();
            return;
        }

        let speed = ball.speed();
        if Self::is_on_fire(speed) {
            for _ in 0..Self::emission_count(speed) {
                let particle = self.emit(ball);
                self.particles.push(particle);
            }
        }

        for particle in self.particles.iter_mut() {
            particle.step();
        }
        self.particles.retain(|p| !p.is_dead());

        // Keep only the newest
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    fn emit(&mut self, ball: &Ball) -> FireParticle {
        let spread = std::f32::consts::FRAC_PI_4;
        let angle = (-ball.vel.y).atan2(-ball.vel.x) + self.rng.random_range(-spread..=spread);
        let dir = Vec2::from_angle(angle);
        let distance = ball.radius + self.rng.random::<f32>() * 5.0;

        FireParticle {
            pos: ball.pos + dir * distance,
            vel: dir * (1.0 + self.rng.random::<f32>()) - ball.vel * 0.05,
            life: 1.0,
            size: self.rng.random_range(1.5..=4.5),
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
