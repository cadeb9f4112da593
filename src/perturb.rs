//! Injected noise and hash state.
//!
//! The perturbation noise and the feature-placement hash grid are built
//! once from a seed and passed into the grid at construction, so tests
//! can run distinct deterministic configurations side by side.

use bevy::math::{Vec3, Vec4};
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::metrics::{
    CELL_PERTURB_STRENGTH, HASH_GRID_SCALE, HASH_GRID_SIZE, NOISE_SCALE,
};

/// Texels per side of the precomputed noise table.
const NOISE_TEXTURE_SIZE: usize = 256;
/// Octaves for each noise channel.
const NOISE_OCTAVES: usize = 3;
/// Feature frequency across one tile of the table.
const NOISE_FREQUENCY: f64 = 4.0;

/// Maps a noise value from the generator's `[-1, 1]` range into `[0, 1]`.
///
/// Fbm output can overshoot its nominal range slightly, so the result is
/// clamped.
fn noise_to_unit(noise_val: f64) -> f32 {
    (((noise_val as f32) + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// A 2D four-channel noise field sampled bilinearly with wraparound.
///
/// Channel x and z drive horizontal perturbation, channel y drives
/// vertical perturbation when a cell's elevation is set, channel w is
/// spare. All channels are in `[0, 1]`, so a constant `0.5` field means
/// no displacement at all.
pub struct NoiseField {
    size: usize,
    texels: Vec<Vec4>,
}

impl NoiseField {
    /// Generates a field from a seed, one `Fbm<Perlin>` per channel.
    pub fn generate(seed: u32) -> Self {
        let size = NOISE_TEXTURE_SIZE;
        let channels: [Fbm<Perlin>; 4] = std::array::from_fn(|i| {
            Fbm::new(seed.wrapping_add(i as u32 * 0x9e37))
                .set_octaves(NOISE_OCTAVES)
                .set_frequency(NOISE_FREQUENCY)
        });

        let mut texels = Vec::with_capacity(size * size);
        for j in 0..size {
            for i in 0..size {
                let u = i as f64 / size as f64;
                let v = j as f64 / size as f64;
                texels.push(Vec4::new(
                    noise_to_unit(channels[0].get([u, v])),
                    noise_to_unit(channels[1].get([u, v])),
                    noise_to_unit(channels[2].get([u, v])),
                    noise_to_unit(channels[3].get([u, v])),
                ));
            }
        }
        Self { size, texels }
    }

    /// A constant mid-gray field: zero perturbation everywhere.
    ///
    /// Used by tests that need exact geometry, and by flat-styled maps.
    pub fn flat() -> Self {
        Self {
            size: 1,
            texels: vec![Vec4::splat(0.5)],
        }
    }

    /// Bilinearly samples the field at a world position.
    ///
    /// Coordinates are scaled by [`NOISE_SCALE`] and wrap, so the field
    /// tiles over the whole plane.
    pub fn sample(&self, position: Vec3) -> Vec4 {
        let u = (position.x * NOISE_SCALE).rem_euclid(1.0) * self.size as f32;
        let v = (position.z * NOISE_SCALE).rem_euclid(1.0) * self.size as f32;

        let i0 = (u as usize) % self.size;
        let j0 = (v as usize) % self.size;
        let i1 = (i0 + 1) % self.size;
        let j1 = (j0 + 1) % self.size;
        let tu = u.fract();
        let tv = v.fract();

        let t00 = self.texels[j0 * self.size + i0];
        let t10 = self.texels[j0 * self.size + i1];
        let t01 = self.texels[j1 * self.size + i0];
        let t11 = self.texels[j1 * self.size + i1];

        t00.lerp(t10, tu).lerp(t01.lerp(t11, tu), tv)
    }

    /// Displaces a position horizontally by the noise at that position.
    ///
    /// The y component is untouched; elevation perturbation is applied
    /// separately when a cell's height is set.
    pub fn perturb(&self, position: Vec3) -> Vec3 {
        let sample = self.sample(position);
        Vec3::new(
            position.x + (sample.x * 2.0 - 1.0) * CELL_PERTURB_STRENGTH,
            position.y,
            position.z + (sample.z * 2.0 - 1.0) * CELL_PERTURB_STRENGTH,
        )
    }
}

/// Random values attached to one hash-grid cell, used to scatter and
/// orient decorative features deterministically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexHash {
    /// Feature existence roll.
    pub a: f32,
    /// Feature variant roll.
    pub b: f32,
    /// Scale roll.
    pub c: f32,
    /// Rotation roll.
    pub d: f32,
    /// Spare roll.
    pub e: f32,
}

impl HexHash {
    fn create(rng: &mut ChaCha8Rng) -> Self {
        Self {
            a: rng.gen_range(0.0..1.0),
            b: rng.gen_range(0.0..1.0),
            c: rng.gen_range(0.0..1.0),
            d: rng.gen_range(0.0..1.0),
            e: rng.gen_range(0.0..1.0),
        }
    }
}

/// Seeded 256x256 table of [`HexHash`] values, sampled by world position
/// with modulo wraparound.
pub struct HexHashGrid {
    values: Vec<HexHash>,
}

impl HexHashGrid {
    /// Fills the table deterministically from a seed.
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let len = (HASH_GRID_SIZE * HASH_GRID_SIZE) as usize;
        let values = (0..len).map(|_| HexHash::create(&mut rng)).collect();
        Self { values }
    }

    /// Samples the table at a world position.
    pub fn sample(&self, position: Vec3) -> HexHash {
        let mut x = (position.x * HASH_GRID_SCALE) as i32 % HASH_GRID_SIZE;
        if x < 0 {
            x += HASH_GRID_SIZE;
        }
        let mut z = (position.z * HASH_GRID_SCALE) as i32 % HASH_GRID_SIZE;
        if z < 0 {
            z += HASH_GRID_SIZE;
        }
        self.values[(x + z * HASH_GRID_SIZE) as usize]
    }
}
