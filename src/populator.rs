//! Demo simplex-noise biome populator
//!
//! Assigns each column the biome whose fractal simplex noise scores
//! highest. Not a serious biome system, but deterministic, seamless
//! across region boundaries (noise is sampled at world coordinates), and
//! cheap enough to exercise the provider.

use noise::{NoiseFn, OpenSimplex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cache::{BiomeId, BiomeMapPopulator, PopulateError};
use crate::geometry::BlendGeometry;

/// Populates padded region maps from per-biome fractal simplex noise.
pub struct SimplexBiomeMapPopulator {
    /// One source per (biome, octave), flattened by biome.
    noises: Vec<OpenSimplex>,
    frequency: f64,
    octaves: usize,
    biome_count: usize,
    geometry: BlendGeometry,
}

impl SimplexBiomeMapPopulator {
    /// Build the octave stack for every biome, seeded from one master seed.
    pub fn new(
        seed: u64,
        frequency: f64,
        octaves: usize,
        biome_count: usize,
        geometry: BlendGeometry,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let noises = (0..octaves * biome_count)
            .map(|_| OpenSimplex::new(rng.gen()))
            .collect();

        Self {
            noises,
            frequency,
            octaves,
            biome_count,
            geometry,
        }
    }

    /// fBm over one biome's octave stack.
    fn fbm(&self, mut x: f64, z: f64, biome: usize) -> f64 {
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        let mut value = 0.0;
        for octave in 0..self.octaves {
            value += self.noises[biome * self.octaves + octave].get([x * frequency, z * frequency])
                * amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
            x += (octave * 123) as f64; // Offset the octaves a bit to decrease artifacts.
        }
        value
    }
}

impl BiomeMapPopulator for SimplexBiomeMapPopulator {
    fn populate_biome_map(
        &self,
        region_x: i32,
        region_z: i32,
        map: &mut [BiomeId],
    ) -> Result<(), PopulateError> {
        let padded = self.geometry.padded_region_size();
        let radius = self.geometry.blend_radius() as i32;

        for rz in 0..padded {
            let z = rz as i32 - radius + self.geometry.region_origin(region_z);
            for rx in 0..padded {
                let x = rx as i32 - radius + self.geometry.region_origin(region_x);

                // Best noise value wins the column.
                let mut best_biome = 0;
                let mut best_value = f64::NEG_INFINITY;
                for biome in 0..self.biome_count {
                    let value = self.fbm(x as f64, z as f64, biome);
                    if value > best_value {
                        best_biome = biome;
                        best_value = value;
                    }
                }

                map[rz * padded + rx] = best_biome as BiomeId;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_geometry() -> BlendGeometry {
        BlendGeometry::new(4, 2, 2).unwrap()
    }

    fn populate(populator: &SimplexBiomeMapPopulator, region_x: i32, region_z: i32) -> Vec<BiomeId> {
        let padded = test_geometry().padded_region_size();
        let mut map = vec![0; padded * padded];
        populator
            .populate_biome_map(region_x, region_z, &mut map)
            .unwrap();
        map
    }

    #[test]
    fn test_population_is_deterministic_per_seed() {
        let first = SimplexBiomeMapPopulator::new(1234, 1.0 / 48.0, 3, 3, test_geometry());
        let second = SimplexBiomeMapPopulator::new(1234, 1.0 / 48.0, 3, 3, test_geometry());

        assert_eq!(populate(&first, 3, -2), populate(&second, 3, -2));
        assert_eq!(populate(&first, 0, 0), populate(&second, 0, 0));
    }

    #[test]
    fn test_biome_ids_stay_in_range() {
        let populator = SimplexBiomeMapPopulator::new(7, 1.0 / 32.0, 2, 3, test_geometry());

        let map = populate(&populator, -1, 5);
        assert!(map.iter().all(|&biome| (biome as usize) < 3));
    }

    #[test]
    fn test_adjacent_regions_agree_on_shared_padding() {
        let geometry = test_geometry();
        let populator = SimplexBiomeMapPopulator::new(42, 1.0 / 24.0, 2, 3, geometry);

        let left = populate(&populator, 0, 0);
        let right = populate(&populator, 1, 0);

        let padded = geometry.padded_region_size();
        let radius = geometry.blend_radius() as i32;
        let region_size = geometry.region_size() as i32;

        // Both padded maps cover world columns [14, 17] x [-2, 17]; the
        // overlap must agree cell for cell because sampling is keyed on
        // world coordinates.
        for z in -radius..region_size + radius {
            for x in region_size - radius..region_size + radius {
                let left_cell = left[((z + radius) * padded as i32 + x + radius) as usize];
                let right_cell =
                    right[((z + radius) * padded as i32 + x - region_size + radius) as usize];
                assert_eq!(left_cell, right_cell, "mismatch at world ({}, {})", x, z);
            }
        }
    }
}
