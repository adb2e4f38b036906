//! Deterministic noise sampling over lattice coordinates.

use noise::{NoiseFn, Perlin, Seedable};

use crate::config::NoiseParams;

/// Seeded Perlin source with the run's octave settings. Cheap to share
/// across worker threads by reference.
#[derive(Clone, Debug)]
pub struct NoiseSampler {
    perlin: Perlin,
    params: NoiseParams,
}

impl NoiseSampler {
    pub fn new(seed: u64, params: &NoiseParams) -> Self {
        Self {
            perlin: Perlin::new(1).set_seed(seed as u32),
            params: params.clone(),
        }
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// Multi-octave terrain value in [0, 1].
    pub fn terrain(&self, x: i32, y: i32) -> f32 {
        let p = &self.params;
        let fx = x as f64 / p.scale as f64;
        let fy = y as f64 / p.scale as f64;
        let v = fbm(
            &self.perlin,
            fx,
            fy,
            p.octaves as u32,
            p.persistence as f64,
            p.lacunarity as f64,
        );
        to_unit(v)
    }

    /// Single-octave value in [0, 1], used to jitter coastlines.
    pub fn point(&self, x: i32, y: i32) -> f32 {
        let scale = self.params.scale as f64;
        to_unit(self.perlin.get([x as f64 / scale, y as f64 / scale]))
    }
}

/// Fractional Brownian Motion, normalized by the summed amplitude.
fn fbm(noise: &Perlin, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    if max_value > 0.0 {
        total / max_value
    } else {
        0.0
    }
}

fn to_unit(v: f64) -> f32 {
    ((v * 0.5 + 0.5) as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_in_unit_range() {
        let sampler = NoiseSampler::new(7, &NoiseParams::default());
        for y in (-300..300).step_by(17) {
            for x in (-300..300).step_by(13) {
                let t = sampler.terrain(x, y);
                let p = sampler.point(x, y);
                assert!((0.0..=1.0).contains(&t), "terrain {} out of range", t);
                assert!((0.0..=1.0).contains(&p), "point {} out of range", p);
            }
        }
    }

    #[test]
    fn test_same_seed_same_values() {
        let a = NoiseSampler::new(99, &NoiseParams::default());
        let b = NoiseSampler::new(99, &NoiseParams::default());
        for i in 0..50 {
            assert_eq!(a.terrain(i * 3, i * 7), b.terrain(i * 3, i * 7));
        }
    }

    #[test]
    fn test_noise_varies() {
        let sampler = NoiseSampler::new(3, &NoiseParams::default());
        let first = sampler.terrain(5, 5);
        assert!((0..200).any(|i| (sampler.terrain(i * 11 + 5, i * 5 + 3) - first).abs() > 0.01));
    }
}
