//! Multi-octave fractal Brownian motion (fBm) sampler over simplex noise.

use noise::{NoiseFn, Simplex};

/// Configuration for an fBm noise stack.
#[derive(Clone, Copy, Debug)]
pub struct FbmParams {
    /// Number of octaves to composite.
    pub octaves: u32,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Frequency of the first octave, in cycles per block.
    pub frequency: f64,
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            octaves: 5,
            lacunarity: 2.0,
            persistence: 0.5,
            frequency: 1.0 / 64.0,
        }
    }
}

/// Composites octaves of simplex noise, each doubling in frequency and
/// halving in amplitude (by default), for terrain fields with detail at
/// several spatial scales.
pub struct FbmSampler {
    noise: Simplex,
    params: FbmParams,
}

impl FbmSampler {
    /// Creates a sampler seeded deterministically.
    pub fn new(seed: u32, params: FbmParams) -> Self {
        Self {
            noise: Simplex::new(seed),
            params,
        }
    }

    /// Samples the 2D field. Unnormalized; the theoretical range is the
    /// geometric sum of octave amplitudes.
    pub fn sample2(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.params.frequency;
        let mut amplitude = 1.0;
        for _ in 0..self.params.octaves {
            total += self.noise.get([x * frequency, y * frequency]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }
        total
    }

    /// Samples the 3D field.
    pub fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.params.frequency;
        let mut amplitude = 1.0;
        for _ in 0..self.params.octaves {
            total += self
                .noise
                .get([x * frequency, y * frequency, z * frequency])
                * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }
        total
    }
}
