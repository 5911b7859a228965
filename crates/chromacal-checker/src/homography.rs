//! Perspective correction for photographed charts.
//!
//! A chart is flat, but the photo of it rarely is: the user drags four
//! corner handles onto the photographed chart and the resulting
//! quadrilateral defines a homography from ideal chart space. The solver
//! then samples patches through that transform. The homography is
//! recomputed whenever a corner moves; it is a plain 3x3 projective
//! matrix, stored flattened.

/// A 2D point in image or chart coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 3x3 projective transform, stored row-major and flattened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    h: [f32; 9],
}

impl Homography {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        h: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Solves the homography mapping four source points onto four targets.
    ///
    /// Standard four-point direct linear transform with h22 pinned to 1,
    /// solved by Gaussian elimination with partial pivoting. Returns
    /// `None` when the correspondence is degenerate (three collinear
    /// points, repeated corners); the caller keeps the previous transform
    /// in that case.
    pub fn map_quad(source: &[Point; 4], target: &[Point; 4]) -> Option<Self> {
        // Two equations per correspondence in the eight unknowns h0..h7
        let mut a = [[0.0_f64; 9]; 8];
        for k in 0..4 {
            let (x, y) = (source[k].x as f64, source[k].y as f64);
            let (tx, ty) = (target[k].x as f64, target[k].y as f64);

            a[2 * k] = [x, y, 1.0, 0.0, 0.0, 0.0, -x * tx, -y * tx, tx];
            a[2 * k + 1] = [0.0, 0.0, 0.0, x, y, 1.0, -x * ty, -y * ty, ty];
        }

        // Gaussian elimination with partial pivoting on the augmented rows
        for col in 0..8 {
            let pivot_row = (col..8).max_by(|&r, &s| {
                a[r][col]
                    .abs()
                    .partial_cmp(&a[s][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;
            if a[pivot_row][col].abs() < 1e-10 {
                return None;
            }
            a.swap(col, pivot_row);

            let pivot = a[col][col];
            for row in (col + 1)..8 {
                let factor = a[row][col] / pivot;
                for c in col..9 {
                    a[row][c] -= factor * a[col][c];
                }
            }
        }

        // Back substitution
        let mut h = [0.0_f64; 8];
        for col in (0..8).rev() {
            let mut acc = a[col][8];
            for c in (col + 1)..8 {
                acc -= a[col][c] * h[c];
            }
            h[col] = acc / a[col][col];
        }

        Some(Self {
            h: [
                h[0] as f32,
                h[1] as f32,
                h[2] as f32,
                h[3] as f32,
                h[4] as f32,
                h[5] as f32,
                h[6] as f32,
                h[7] as f32,
                1.0,
            ],
        })
    }

    /// Applies the transform to a point.
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        let h = &self.h;
        let w = h[6] * p.x + h[7] * p.y + h[8];
        let w = if w.abs() < 1e-12 { 1e-12 } else { w };
        Point::new(
            (h[0] * p.x + h[1] * p.y + h[2]) / w,
            (h[3] * p.x + h[4] * p.y + h[5]) / w,
        )
    }

    /// The flattened row-major coefficients.
    #[inline]
    pub fn coefficients(&self) -> [f32; 9] {
        self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const UNIT_SQUARE: [Point; 4] = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.0, 1.0),
    ];

    #[test]
    fn test_identity_apply() {
        let p = Point::new(3.5, -2.0);
        assert_eq!(Homography::IDENTITY.apply(p), p);
    }

    #[test]
    fn test_axis_aligned_scale_translate() {
        let target = [
            Point::new(10.0, 20.0),
            Point::new(110.0, 20.0),
            Point::new(110.0, 70.0),
            Point::new(10.0, 70.0),
        ];
        let h = Homography::map_quad(&UNIT_SQUARE, &target).unwrap();

        let mid = h.apply(Point::new(0.5, 0.5));
        assert_relative_eq!(mid.x, 60.0, epsilon = 1e-3);
        assert_relative_eq!(mid.y, 45.0, epsilon = 1e-3);
    }

    #[test]
    fn test_corners_map_exactly() {
        // A genuinely projective quad (not affine)
        let target = [
            Point::new(5.0, 8.0),
            Point::new(95.0, 15.0),
            Point::new(80.0, 88.0),
            Point::new(12.0, 75.0),
        ];
        let h = Homography::map_quad(&UNIT_SQUARE, &target).unwrap();

        for (src, dst) in UNIT_SQUARE.iter().zip(target.iter()) {
            let mapped = h.apply(*src);
            assert_relative_eq!(mapped.x, dst.x, epsilon = 1e-2);
            assert_relative_eq!(mapped.y, dst.y, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_degenerate_quad_is_rejected() {
        // All four targets collapsed onto one point
        let target = [Point::new(1.0, 1.0); 4];
        assert!(Homography::map_quad(&UNIT_SQUARE, &target).is_none());
    }

    #[test]
    fn test_projective_interior_point_stays_inside() {
        let target = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 10.0),
            Point::new(90.0, 80.0),
            Point::new(10.0, 90.0),
        ];
        let h = Homography::map_quad(&UNIT_SQUARE, &target).unwrap();
        let mid = h.apply(Point::new(0.5, 0.5));
        assert!(mid.x > 0.0 && mid.x < 100.0);
        assert!(mid.y > 0.0 && mid.y < 90.0);
    }
}
