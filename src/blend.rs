//! Blended biome queries
//!
//! Turns the hard per-cell biome assignment of a padded region map into
//! a smooth per-column mixture: each queried column gets a sparse list
//! of (biome, weight) pairs produced by running the blur kernel over its
//! neighborhood. Region maps come from the LRU cache, so nearby queries
//! share population work.

use crate::cache::{BiomeId, BiomeMapPopulator, PopulationError, RegionMapCache};
use crate::geometry::BlendGeometry;
use crate::kernel::BlurKernel;

/// One biome's share of a blended column.
///
/// The weights of a single query result sum to 1 and each biome appears
/// at most once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedBiome {
    pub biome: BiomeId,
    pub weight: f32,
}

/// Blended results for every column of one chunk, row-major by local z.
#[derive(Clone, Debug)]
pub struct ChunkBiomes {
    size: usize,
    columns: Vec<Vec<WeightedBiome>>,
}

impl ChunkBiomes {
    /// Chunk side length in columns.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Blended biomes for the column at chunk-local offsets.
    pub fn get(&self, local_x: usize, local_z: usize) -> &[WeightedBiome] {
        &self.columns[local_z * self.size + local_x]
    }
}

/// Biome provider producing smoothly blended biome mixtures per column.
///
/// Queries take `&mut self` because every lookup refreshes the region
/// cache's recency order; wrap the provider in a lock to share it across
/// threads.
pub struct BlendedBiomeProvider {
    geometry: BlendGeometry,
    kernel: BlurKernel,
    cache: RegionMapCache,
}

impl BlendedBiomeProvider {
    /// Create a provider over a populator.
    ///
    /// The blur kernel is built here, once; queries only read it.
    pub fn new(geometry: BlendGeometry, populator: Box<dyn BiomeMapPopulator>) -> Self {
        Self {
            geometry,
            kernel: BlurKernel::new(geometry.blend_radius()),
            cache: RegionMapCache::new(geometry, populator),
        }
    }

    /// Geometry this provider was built with.
    pub fn geometry(&self) -> &BlendGeometry {
        &self.geometry
    }

    /// Get the blended biomes for a single column of the world.
    pub fn blended_biomes_at(
        &mut self,
        x: i32,
        z: i32,
    ) -> Result<Vec<WeightedBiome>, PopulationError> {
        let region_x = self.geometry.region_of(x);
        let region_z = self.geometry.region_of(z);
        let map = self.cache.get_or_populate(region_x, region_z)?;

        Ok(blend_column(&self.geometry, &self.kernel, map, x, z))
    }

    /// Get the blended biomes for every column of one chunk.
    ///
    /// A chunk is a power of two no larger than a region, so it is
    /// contained entirely in one region and a single cache query serves
    /// all of its columns.
    pub fn blended_biomes_for_chunk(
        &mut self,
        chunk_x: i32,
        chunk_z: i32,
    ) -> Result<ChunkBiomes, PopulationError> {
        let size = self.geometry.chunk_size();
        let origin_x = self.geometry.chunk_origin(chunk_x);
        let origin_z = self.geometry.chunk_origin(chunk_z);

        let region_x = self.geometry.region_of_chunk(chunk_x);
        let region_z = self.geometry.region_of_chunk(chunk_z);
        let map = self.cache.get_or_populate(region_x, region_z)?;

        let mut columns = Vec::with_capacity(size * size);
        for cz in 0..size {
            for cx in 0..size {
                columns.push(blend_column(
                    &self.geometry,
                    &self.kernel,
                    map,
                    origin_x + cx as i32,
                    origin_z + cz as i32,
                ));
            }
        }

        Ok(ChunkBiomes { size, columns })
    }
}

/// Run the kernel footprint over one column of a padded region map,
/// accumulating weight per distinct biome.
fn blend_column(
    geometry: &BlendGeometry,
    kernel: &BlurKernel,
    map: &[BiomeId],
    x: i32,
    z: i32,
) -> Vec<WeightedBiome> {
    let padded = geometry.padded_region_size();

    // Mod the world coordinate by the region size.
    let x_masked = geometry.local_in_region(x);
    let z_masked = geometry.local_in_region(z);

    // Few distinct biomes fall under one footprint, typically 1-4.
    let mut results: Vec<WeightedBiome> = Vec::with_capacity(4);

    for iz in 0..kernel.side() {
        for ix in 0..kernel.side() {
            let weight = kernel.weight(ix, iz);
            if weight <= 0.0 {
                continue;
            }

            // The map is padded by the blend radius on every side, so the
            // footprint of an in-region column never leaves the buffer.
            let biome = map[(z_masked + iz) * padded + x_masked + ix];

            match results.iter_mut().find(|entry| entry.biome == biome) {
                Some(entry) => entry.weight += weight,
                None => results.push(WeightedBiome { biome, weight }),
            }
        }
    }

    results
}
