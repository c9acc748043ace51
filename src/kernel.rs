//! Blur kernel for biome blending
//!
//! A fixed square weight table reminiscent of a Gaussian blur, truncated
//! to the inscribed circle of the blend radius. Raw weights are squared
//! so the falloff keeps a continuous first derivative at the truncation,
//! then rescaled so the whole table sums to 1.

/// Precomputed blur weight table of side `2 * radius + 1`.
#[derive(Clone, Debug)]
pub struct BlurKernel {
    radius: usize,
    side: usize,
    weights: Vec<f32>,
}

impl BlurKernel {
    /// Build the weight table for a blend radius of at least 1.
    ///
    /// This runs once per provider; lookups never recompute anything.
    pub fn new(radius: usize) -> Self {
        debug_assert!(radius >= 1, "a zero radius kernel has no weight to normalize");

        let side = radius * 2 + 1;
        let mut weights = vec![0.0f32; side * side];
        let r = radius as i64;

        let mut total = 0.0f32;
        for iz in 0..side {
            let dz = iz as i64 - r;
            for ix in 0..side {
                let dx = ix as i64 - r;
                // Only the circle of positive values contributes.
                let raw = (r * r - dx * dx - dz * dz) as f32;
                if raw <= 0.0 {
                    continue;
                }
                let raw = raw * raw; // Make transitions smoother.
                total += raw;
                weights[iz * side + ix] = raw;
            }
        }

        // Rescale the weights, so they all add up to 1.
        for weight in &mut weights {
            *weight /= total;
        }

        Self { radius, side, weights }
    }

    /// Blend radius the table was built for.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Side length of the square table.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Weight at kernel-local offsets, each in `[0, side)`.
    #[inline]
    pub fn weight(&self, ix: usize, iz: usize) -> f32 {
        self.weights[iz * self.side + ix]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_sum(kernel: &BlurKernel) -> f32 {
        let mut sum = 0.0;
        for iz in 0..kernel.side() {
            for ix in 0..kernel.side() {
                sum += kernel.weight(ix, iz);
            }
        }
        sum
    }

    #[test]
    fn test_kernel_is_normalized() {
        for radius in [1, 2, 16] {
            let kernel = BlurKernel::new(radius);
            assert_eq!(kernel.side(), radius * 2 + 1);
            assert!(
                (weight_sum(&kernel) - 1.0).abs() < 1e-5,
                "kernel with radius {} sums to {}",
                radius,
                weight_sum(&kernel)
            );
        }
    }

    #[test]
    fn test_kernel_is_radially_symmetric() {
        let kernel = BlurKernel::new(5);
        let side = kernel.side();

        for iz in 0..side {
            for ix in 0..side {
                let w = kernel.weight(ix, iz);
                assert_eq!(w, kernel.weight(side - 1 - ix, iz));
                assert_eq!(w, kernel.weight(ix, side - 1 - iz));
                assert_eq!(w, kernel.weight(side - 1 - ix, side - 1 - iz));
            }
        }
    }

    #[test]
    fn test_weight_is_zero_outside_inscribed_circle() {
        let kernel = BlurKernel::new(4);
        let r = kernel.radius() as i64;

        for iz in 0..kernel.side() {
            let dz = iz as i64 - r;
            for ix in 0..kernel.side() {
                let dx = ix as i64 - r;
                if dx * dx + dz * dz >= r * r {
                    assert_eq!(kernel.weight(ix, iz), 0.0);
                } else {
                    assert!(kernel.weight(ix, iz) > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_center_carries_the_largest_weight() {
        let kernel = BlurKernel::new(8);
        let center = kernel.weight(kernel.radius(), kernel.radius());

        for iz in 0..kernel.side() {
            for ix in 0..kernel.side() {
                assert!(kernel.weight(ix, iz) <= center);
            }
        }
    }
}
