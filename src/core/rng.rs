//! Deterministic pseudo-random number generator
//!
//! Uses a linear congruential generator, which keeps replays and tests
//! reproducible from a seed. Only cosmetic choices (orb spin axes) draw from
//! it, so quality requirements are minimal.

/// Simple LCG random number generator
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    /// Generate the next random number
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        (self.state >> 16) as u32
    }

    /// Generate a random number in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }

    /// Uniform float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Random non-zero orb rotation axis. The component ranges are uneven on
    /// purpose so freshly spawned orbs wobble visibly differently.
    pub fn spin_axis(&mut self) -> [f32; 3] {
        let mut axis = [
            2.0 * self.next_f32() - 1.0,
            6.0 * self.next_f32() - 3.0,
            8.0 * self.next_f32() - 4.0,
        ];
        if axis == [0.0, 0.0, 0.0] {
            axis[0] += self.next_f32();
            axis[1] += self.next_f32();
            axis[2] += self.next_f32();
        }
        axis
    }
}
