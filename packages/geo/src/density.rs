//! Uniform density grid for heatmap rendering.
//!
//! Points are bucketed by flooring their coordinates divided by the cell
//! size. Each occupied bucket becomes one [`GridCell`] centered on the
//! bucket (not on its members), so heatmap tiles line up across requests.
//!
//! Bucketing is order-independent, so partial grids built over disjoint
//! shards of the input can be combined with [`DensityGrid::merge`] and
//! yield the same cells as a single pass.

use std::collections::BTreeMap;

use campus_incidents_geo_models::{GridCell, GridKey, WeightedPoint};
use campus_incidents_incident_models::Coordinate;

/// Default cell edge length in degrees (~100 m at the equator).
pub const DEFAULT_CELL_SIZE_DEGREES: f64 = 0.001;

/// Smallest accepted cell edge length in degrees (~0.1 m at the equator).
///
/// Keeps `coordinate / cell_size` far inside the `i64` range for every
/// valid coordinate.
pub const MIN_CELL_SIZE_DEGREES: f64 = 1e-6;

/// Whether `cell_size` is usable as a grid cell edge length.
#[must_use]
pub fn is_valid_cell_size(cell_size: f64) -> bool {
    cell_size.is_finite() && cell_size >= MIN_CELL_SIZE_DEGREES
}

/// Accumulates point weights into fixed-size grid buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    cell_size: f64,
    cells: BTreeMap<GridKey, f64>,
}

impl Default for DensityGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE_DEGREES)
    }
}

impl DensityGrid {
    /// Creates an empty grid.
    ///
    /// A cell size that is not finite or is below
    /// [`MIN_CELL_SIZE_DEGREES`] falls back to [`DEFAULT_CELL_SIZE_DEGREES`].
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if is_valid_cell_size(cell_size) {
            cell_size
        } else {
            log::warn!(
                "Invalid density cell size {cell_size}, using {DEFAULT_CELL_SIZE_DEGREES}"
            );
            DEFAULT_CELL_SIZE_DEGREES
        };

        Self {
            cell_size,
            cells: BTreeMap::new(),
        }
    }

    /// Cell edge length in degrees.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no point has been added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bucket index for a coordinate.
    ///
    /// Returns `None` when a component is not finite or the bucket index
    /// would not fit in an `i64`.
    #[must_use]
    pub fn key_for(&self, coordinate: Coordinate) -> Option<GridKey> {
        Some(GridKey {
            row: bucket(coordinate.latitude / self.cell_size)?,
            col: bucket(coordinate.longitude / self.cell_size)?,
        })
    }

    /// Center of the bucket identified by `key`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn center_of(&self, key: GridKey) -> Coordinate {
        let half = self.cell_size / 2.0;
        Coordinate::new(
            (key.row as f64).mul_add(self.cell_size, half),
            (key.col as f64).mul_add(self.cell_size, half),
        )
    }

    /// Adds one weighted point.
    ///
    /// Points that cannot be bucketed (non-finite coordinates) are skipped
    /// with a warning.
    pub fn add(&mut self, point: &WeightedPoint) {
        let Some(key) = self.key_for(point.coordinate) else {
            log::warn!(
                "Skipping point with unbucketable coordinate ({}, {})",
                point.coordinate.latitude,
                point.coordinate.longitude
            );
            return;
        };
        *self.cells.entry(key).or_insert(0.0) += point.weight;
    }

    /// Folds another grid into this one.
    ///
    /// Grids with the same cell size are merged key by key. A grid with a
    /// different cell size is re-bucketed by its cell centers, which still
    /// conserves total weight.
    pub fn merge(&mut self, other: Self) {
        if (other.cell_size - self.cell_size).abs() <= f64::EPSILON {
            for (key, weight) in other.cells {
                *self.cells.entry(key).or_insert(0.0) += weight;
            }
            return;
        }

        log::debug!(
            "Re-bucketing {} cells from cell size {} into {}",
            other.cells.len(),
            other.cell_size,
            self.cell_size
        );
        for (key, weight) in &other.cells {
            self.add(&WeightedPoint::new(other.center_of(*key), *weight));
        }
    }

    /// Sum of all accumulated weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.cells.values().sum()
    }

    /// Emits one [`GridCell`] per occupied bucket, ordered by key.
    #[must_use]
    pub fn into_cells(self) -> Vec<GridCell> {
        self.cells
            .iter()
            .map(|(key, weight)| GridCell {
                key: *key,
                center: self.center_of(*key),
                weight: *weight,
            })
            .collect()
    }
}

/// Floors a bucket quotient, rejecting values an `i64` cannot hold.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn bucket(quotient: f64) -> Option<i64> {
    let floored = quotient.floor();
    (floored.is_finite() && floored >= i64::MIN as f64 && floored < i64::MAX as f64)
        .then_some(floored as i64)
}

impl<'a> Extend<&'a WeightedPoint> for DensityGrid {
    fn extend<T: IntoIterator<Item = &'a WeightedPoint>>(&mut self, iter: T) {
        for point in iter {
            self.add(point);
        }
    }
}

/// Buckets `points` into a uniform grid of `cell_size` degrees.
///
/// Total weight is conserved and the result does not depend on input
/// order. Empty input yields an empty grid.
#[must_use]
pub fn build_density_grid(points: &[WeightedPoint], cell_size: f64) -> Vec<GridCell> {
    let mut grid = DensityGrid::new(cell_size);
    grid.extend(points);

    log::debug!(
        "Built density grid: {} points -> {} cells (cell size {})",
        points.len(),
        grid.len(),
        grid.cell_size()
    );

    grid.into_cells()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(latitude: f64, longitude: f64, weight: f64) -> WeightedPoint {
        WeightedPoint::new(Coordinate::new(latitude, longitude), weight)
    }

    fn sample() -> Vec<WeightedPoint> {
        vec![
            point(28.5355, 77.2707, 3.0),
            point(28.5356, 77.2708, 4.0),
            point(28.5360, 77.2710, 2.0),
            point(28.5350, 77.2705, 4.0),
            point(28.5352, 77.2709, 1.0),
            point(-33.8688, 151.2093, 2.0),
            point(28.5361, 77.2701, 0.0),
        ]
    }

    fn as_pairs(cells: &[GridCell]) -> Vec<(GridKey, f64)> {
        cells.iter().map(|c| (c.key, c.weight)).collect()
    }

    #[test]
    fn empty_input_yields_no_cells() {
        assert!(build_density_grid(&[], DEFAULT_CELL_SIZE_DEGREES).is_empty());
    }

    #[test]
    fn conserves_weight_across_cell_sizes() {
        let points = sample();
        let input: f64 = points.iter().map(|p| p.weight).sum();
        for cell_size in [0.0001, 0.001, 0.01, 1.0, 45.0] {
            let output: f64 = build_density_grid(&points, cell_size)
                .iter()
                .map(|c| c.weight)
                .sum();
            assert!(
                (input - output).abs() < 1e-9,
                "cell size {cell_size}: {input} != {output}"
            );
        }
    }

    #[test]
    fn order_independent() {
        let points = sample();
        let mut reversed = points.clone();
        reversed.reverse();
        let mut rotated = points.clone();
        rotated.rotate_left(3);

        let expected = as_pairs(&build_density_grid(&points, 0.001));
        assert_eq!(as_pairs(&build_density_grid(&reversed, 0.001)), expected);
        assert_eq!(as_pairs(&build_density_grid(&rotated, 0.001)), expected);
    }

    #[test]
    fn center_is_corner_plus_half_cell() {
        let cells = build_density_grid(&[point(28.5355, 77.2707, 1.0)], 0.001);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].key, GridKey { row: 28535, col: 77270 });
        assert!((cells[0].center.latitude - 28.5355).abs() < 1e-9);
        assert!((cells[0].center.longitude - 77.2705).abs() < 1e-9);
    }

    #[test]
    fn negative_coordinates_floor_downwards() {
        let grid = DensityGrid::new(1.0);
        assert_eq!(
            grid.key_for(Coordinate::new(-0.5, -179.2)),
            Some(GridKey { row: -1, col: -180 })
        );
    }

    #[test]
    fn co_located_points_share_a_cell() {
        let cells = build_density_grid(
            &[point(1.00001, 1.00001, 2.0), point(1.00002, 1.00003, 3.0)],
            0.001,
        );
        assert_eq!(cells.len(), 1);
        assert!((cells[0].weight - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn merged_shards_match_single_pass() {
        let points = sample();
        let (left, right) = points.split_at(3);

        let mut merged = DensityGrid::new(0.001);
        merged.extend(left);
        let mut partial = DensityGrid::new(0.001);
        partial.extend(right);
        merged.merge(partial);

        assert_eq!(
            as_pairs(&merged.into_cells()),
            as_pairs(&build_density_grid(&points, 0.001))
        );
    }

    #[test]
    fn merge_with_different_cell_size_conserves_weight() {
        let points = sample();
        let mut coarse = DensityGrid::new(0.01);
        let mut fine = DensityGrid::new(0.001);
        fine.extend(&points);
        let expected = fine.total_weight();
        coarse.merge(fine);
        assert!((coarse.total_weight() - expected).abs() < 1e-9);
    }

    #[test]
    fn invalid_cell_size_falls_back_to_default() {
        assert!((DensityGrid::new(0.0).cell_size() - DEFAULT_CELL_SIZE_DEGREES).abs() < f64::EPSILON);
        assert!(
            (DensityGrid::new(f64::NAN).cell_size() - DEFAULT_CELL_SIZE_DEGREES).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn tiny_cell_size_does_not_collapse_distinct_points() {
        let grid = DensityGrid::new(1e-300);
        assert!((grid.cell_size() - DEFAULT_CELL_SIZE_DEGREES).abs() < f64::EPSILON);

        let cells = build_density_grid(
            &[point(28.5355, 77.2707, 1.0), point(28.6004, 77.3004, 1.0)],
            1e-300,
        );
        assert_eq!(cells.len(), 2);
        assert!((cells[0].center.latitude - 28.5355).abs() < 1e-9);
        assert!((cells[1].center.latitude - 28.6005).abs() < 1e-9);
    }

    #[test]
    fn unbucketable_points_are_skipped() {
        let grid = DensityGrid::new(MIN_CELL_SIZE_DEGREES);
        assert!(grid.key_for(Coordinate::new(f64::NAN, 0.0)).is_none());
        assert!(grid.key_for(Coordinate::new(0.0, f64::INFINITY)).is_none());
        assert!(grid.key_for(Coordinate::new(90.0, 180.0)).is_some());

        let cells = build_density_grid(
            &[point(f64::NAN, 1.0, 5.0), point(1.0, 1.0, 2.0)],
            0.001,
        );
        assert_eq!(cells.len(), 1);
        assert!((cells[0].weight - 2.0).abs() < f64::EPSILON);
    }
}
