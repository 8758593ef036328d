//! Particle bursts for brick destruction
//!
//! Purely visual. Particles are never reused: bursts are small and short-lived.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entities::Particle;
use super::palette::Color;
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: Pcg32,
    max_particles: usize,
}

impl ParticleSystem {
    pub fn new(seed: u64, max_particles: usize) -> Self {
        Self {
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            max_particles,
        }
    }

    /// Spawn `count` particles at `origin` flying in random directions.
    ///
    /// Speeds scale with `intensity`. Returns how many were spawned; when the
    /// cap is reached the oldest particles make room.
    pub fn create_explosion(&mut self, origin: Vec2, count: usize, color: Color, intensity: f32) -> usize {
        if self.max_particles == 0 {
            return 0;
        }
        let count = count.min(self.max_particles);

        let overflow = (self.particles.len() + count).saturating_sub(self.max_particles);
        if overflow > 0 {
            self.particles.drain(..overflow);
        }

        for _ in 0..count {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = PARTICLE_BASE_SPEED * intensity * self.rng.random_range(0.5..=1.0);
            let size = PARTICLE_SIZE * self.rng.random_range(0.6..=1.2);
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                life: PARTICLE_LIFETIME,
                max_life: PARTICLE_LIFETIME,
                size,
            });
        }
        count
    }

    /// Advance particles and drop the dead ones
    pub fn update(&mut self, dt: f32) {
        for particle in self.particles.iter_mut() {
            particle.update(dt);
        }
        self.particles.retain(|p| p.is_alive());
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explosion_spawns_count_at_origin() {
        let mut system = ParticleSystem::new(7, 256);
        let origin = Vec2::new(50.0, 80.0);
        assert_eq!(system.create_explosion(origin, 15, Color::WHITE, 0.5), 15);
        assert_eq!(system.len(), 15);
        for p in system.particles() {
            assert_eq!(p.pos, origin);
            assert_eq!(p.life, PARTICLE_LIFETIME);
            let speed = p.vel.length();
            assert!(speed <= PARTICLE_BASE_SPEED * 0.5 + 1e-3);
            assert!(speed >= PARTICLE_BASE_SPEED * 0.25 - 1e-3);
        }
    }

    #[test]
    fn test_particles_expire() {
        let mut system = ParticleSystem::new(7, 256);
        system.create_explosion(Vec2::ZERO, 10, Color::WHITE, 1.0);
        system.update(PARTICLE_LIFETIME / 2.0);
        assert_eq!(system.len(), 10);
        system.update(PARTICLE_LIFETIME);
        assert!(system.is_empty());
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut system = ParticleSystem::new(1, 20);
        system.create_explosion(Vec2::ZERO, 15, Color::WHITE, 0.5);
        system.create_explosion(Vec2::new(10.0, 10.0), 15, Color::BLACK, 0.5);
        assert_eq!(system.len(), 20);
        let newest = system.particles().iter().filter(|p| p.color == Color::BLACK).count();
        assert_eq!(newest, 15);
    }

    #[test]
    fn test_zero_cap_disables_bursts() {
        let mut system = ParticleSystem::new(1, 0);
        assert_eq!(system.create_explosion(Vec2::ZERO, 15, Color::WHITE, 0.5), 0);
        assert!(system.is_empty());
    }

    #[test]
    fn test_same_seed_same_burst() {
        let mut a = ParticleSystem::new(42, 64);
        let mut b = ParticleSystem::new(42, 64);
        a.create_explosion(Vec2::ZERO, 5, Color::WHITE, 0.5);
        b.create_explosion(Vec2::ZERO, 5, Color::WHITE, 0.5);
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.vel, pb.vel);
        }
    }
}
