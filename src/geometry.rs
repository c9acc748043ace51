//! Region and chunk geometry
//!
//! World space is tiled into power-of-two regions (the unit of caching)
//! and smaller power-of-two chunks (the unit of batched queries). Sizes
//! are expressed as exponents so every coordinate conversion is a shift
//! or a mask, including for negative coordinates.

use thiserror::Error;

/// Default region size exponent (region side = 2^7 = 128 columns)
pub const REGION_SIZE_EXPONENT: u32 = 7;
/// Default chunk size exponent (chunk side = 2^4 = 16 columns)
pub const CHUNK_SIZE_EXPONENT: u32 = 4;
/// Default blend radius in columns
pub const BLEND_RADIUS: usize = 16;

/// Default region side length in columns
pub const REGION_SIZE: usize = 1 << REGION_SIZE_EXPONENT;
/// Default chunk side length in columns
pub const CHUNK_SIZE: usize = 1 << CHUNK_SIZE_EXPONENT;
/// Default padded region side length (region plus blend radius on both sides)
pub const PADDED_REGION_SIZE: usize = REGION_SIZE + BLEND_RADIUS * 2;

/// Configuration invariant violations, detected once at construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("chunk exponent {chunk} exceeds region exponent {region}")]
    ChunkLargerThanRegion { chunk: u32, region: u32 },
    #[error("region exponent {0} does not fit signed 32-bit coordinates")]
    RegionTooLarge(u32),
    #[error("blend radius {radius} must be at least 1 and smaller than the region size {region_size}")]
    BadBlendRadius { radius: usize, region_size: usize },
}

/// Validated blend geometry: region/chunk size exponents and blend radius.
///
/// Built once at startup; queries only do shift/mask arithmetic against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendGeometry {
    region_size_exponent: u32,
    chunk_size_exponent: u32,
    blend_radius: usize,
}

impl BlendGeometry {
    /// Validate and build a geometry.
    ///
    /// A chunk must fit inside a region, and the blend radius must leave
    /// the padded-map layout sound: at least 1 (an empty kernel cannot be
    /// normalized) and smaller than the region side.
    pub fn new(
        region_size_exponent: u32,
        chunk_size_exponent: u32,
        blend_radius: usize,
    ) -> Result<Self, GeometryError> {
        if region_size_exponent >= 31 {
            return Err(GeometryError::RegionTooLarge(region_size_exponent));
        }
        if chunk_size_exponent > region_size_exponent {
            return Err(GeometryError::ChunkLargerThanRegion {
                chunk: chunk_size_exponent,
                region: region_size_exponent,
            });
        }
        let region_size = 1usize << region_size_exponent;
        if blend_radius == 0 || blend_radius >= region_size {
            return Err(GeometryError::BadBlendRadius {
                radius: blend_radius,
                region_size,
            });
        }
        Ok(Self {
            region_size_exponent,
            chunk_size_exponent,
            blend_radius,
        })
    }

    /// Region side length in columns.
    pub fn region_size(&self) -> usize {
        1 << self.region_size_exponent
    }

    /// Chunk side length in columns.
    pub fn chunk_size(&self) -> usize {
        1 << self.chunk_size_exponent
    }

    /// Blend radius in columns.
    pub fn blend_radius(&self) -> usize {
        self.blend_radius
    }

    /// Side length of a padded region map.
    pub fn padded_region_size(&self) -> usize {
        self.region_size() + self.blend_radius * 2
    }

    /// Region coordinate owning a world coordinate.
    ///
    /// `>>` on `i32` is an arithmetic shift, so negative coordinates
    /// floor toward negative infinity instead of truncating toward zero.
    #[inline]
    pub fn region_of(&self, c: i32) -> i32 {
        c >> self.region_size_exponent
    }

    /// Region coordinate owning a chunk coordinate.
    #[inline]
    pub fn region_of_chunk(&self, c: i32) -> i32 {
        c >> (self.region_size_exponent - self.chunk_size_exponent)
    }

    /// Region-local offset of a world coordinate, always in `[0, region_size)`.
    ///
    /// The mask is a non-negative modulo because the region size is a
    /// power of two.
    #[inline]
    pub fn local_in_region(&self, c: i32) -> usize {
        (c & (self.region_size() as i32 - 1)) as usize
    }

    /// First world column of a region.
    #[inline]
    pub fn region_origin(&self, region: i32) -> i32 {
        region << self.region_size_exponent
    }

    /// First world column of a chunk.
    #[inline]
    pub fn chunk_origin(&self, chunk: i32) -> i32 {
        chunk << self.chunk_size_exponent
    }
}

impl Default for BlendGeometry {
    fn default() -> Self {
        Self {
            region_size_exponent: REGION_SIZE_EXPONENT,
            chunk_size_exponent: CHUNK_SIZE_EXPONENT,
            blend_radius: BLEND_RADIUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_of_floors_negative_coordinates() {
        let geometry = BlendGeometry::default();

        assert_eq!(geometry.region_of(0), 0);
        assert_eq!(geometry.region_of(127), 0);
        assert_eq!(geometry.region_of(128), 1);
        assert_eq!(geometry.region_of(-1), -1);
        assert_eq!(geometry.region_of(-128), -1);
        assert_eq!(geometry.region_of(-129), -2);
    }

    #[test]
    fn test_local_offset_is_non_negative_modulo() {
        let geometry = BlendGeometry::default();

        assert_eq!(geometry.local_in_region(0), 0);
        assert_eq!(geometry.local_in_region(130), 2);
        assert_eq!(geometry.local_in_region(-1), 127);
        assert_eq!(geometry.local_in_region(-128), 0);

        // Region origin plus local offset reconstructs the coordinate.
        for c in [-300, -129, -128, -1, 0, 1, 127, 128, 555] {
            let rebuilt =
                geometry.region_origin(geometry.region_of(c)) + geometry.local_in_region(c) as i32;
            assert_eq!(rebuilt, c);
        }
    }

    #[test]
    fn test_region_of_chunk_matches_world_coordinates() {
        let geometry = BlendGeometry::default();

        for chunk in [-20, -9, -8, -1, 0, 1, 7, 8, 31] {
            assert_eq!(
                geometry.region_of_chunk(chunk),
                geometry.region_of(geometry.chunk_origin(chunk))
            );
        }
    }

    #[test]
    fn test_validation_rejects_bad_configurations() {
        assert_eq!(
            BlendGeometry::new(4, 5, 2),
            Err(GeometryError::ChunkLargerThanRegion {
                chunk: 5,
                region: 4
            })
        );
        assert_eq!(
            BlendGeometry::new(4, 2, 0),
            Err(GeometryError::BadBlendRadius {
                radius: 0,
                region_size: 16
            })
        );
        assert_eq!(
            BlendGeometry::new(4, 2, 16),
            Err(GeometryError::BadBlendRadius {
                radius: 16,
                region_size: 16
            })
        );
        assert_eq!(BlendGeometry::new(31, 2, 4), Err(GeometryError::RegionTooLarge(31)));
        assert!(BlendGeometry::new(7, 4, 16).is_ok());
    }

    #[test]
    fn test_default_geometry_matches_constants() {
        let geometry = BlendGeometry::default();

        assert_eq!(geometry.region_size(), REGION_SIZE);
        assert_eq!(geometry.chunk_size(), CHUNK_SIZE);
        assert_eq!(geometry.blend_radius(), BLEND_RADIUS);
        assert_eq!(geometry.padded_region_size(), PADDED_REGION_SIZE);
    }
}
