//! Correspondence and point map containers.

use crate::math::{Real, Vec3};
use crate::ray_field::RayField;

/// Per-pixel scalar hypothesis values (disparity or depth), NaN = invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrespondenceMap {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl CorrespondenceMap {
    /// A map with every entry invalid.
    pub fn invalid(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![f32::NAN; width * height],
        }
    }

    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.width + col] = value;
    }

    #[inline]
    pub fn is_valid(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_finite()
    }

    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_finite()).count()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// Per-pixel 3-D points obtained by scaling a ray field by a map.
///
/// Invalid correspondence entries propagate as all-NaN points.
#[derive(Debug, Clone)]
pub struct PointMap {
    width: usize,
    height: usize,
    points: Vec<Vec3>,
}

impl PointMap {
    /// Scale each ray by the matching map entry.
    ///
    /// Panics if the shapes differ; shape agreement is the caller's
    /// responsibility (the engine validates it up front).
    pub fn from_rays(rays: &RayField, map: &CorrespondenceMap) -> Self {
        assert_eq!(rays.shape(), map.shape(), "ray field / map shape mismatch");
        let (height, width) = map.shape();
        let mut points = Vec::with_capacity(width * height);
        for r in 0..height {
            for c in 0..width {
                let d = map.get(r, c) as Real;
                if d.is_finite() {
                    points.push(rays.point_at(r, c, d));
                } else {
                    points.push(Vec3::new(Real::NAN, Real::NAN, Real::NAN));
                }
            }
        }
        Self {
            width,
            height,
            points,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &Vec3 {
        &self.points[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, point: Vec3) {
        self.points[row * self.width + col] = point;
    }

    /// Mark the point invalid.
    pub fn invalidate(&mut self, row: usize, col: usize) {
        self.set(row, col, Vec3::new(Real::NAN, Real::NAN, Real::NAN));
    }

    #[inline]
    pub fn is_valid(&self, row: usize, col: usize) -> bool {
        let p = self.get(row, col);
        p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
    }

    /// The depth (z) channel as a correspondence map.
    ///
    /// Rays carry a unit depth component, so z is the distance along the
    /// hypothesis axis for depth maps.
    pub fn depth_map(&self) -> CorrespondenceMap {
        let data = self.points.iter().map(|p| p.z as f32).collect();
        CorrespondenceMap::from_vec(self.width, self.height, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::PinholeLens;

    #[test]
    fn invalid_map_has_no_valid_entries() {
        let map = CorrespondenceMap::invalid(8, 4);
        assert_eq!(map.valid_count(), 0);
        assert!(!map.is_valid(2, 3));
    }

    #[test]
    fn invalid_entries_propagate_to_points() {
        let lens = PinholeLens::new(100.0, 100.0, 8.0, 4.0);
        let rays = RayField::from_lens(&lens, 16, 8);
        let mut map = CorrespondenceMap::invalid(16, 8);
        map.set(3, 5, 2.0);

        let points = PointMap::from_rays(&rays, &map);
        assert!(points.is_valid(3, 5));
        assert_eq!(points.get(3, 5).z, 2.0);
        assert!(!points.is_valid(0, 0));
        assert!(points.get(0, 0).x.is_nan());
    }
}
