use crate::core::bounds::BoundingBox;
use crate::core::constants::MAX_GRID_POINTS;
use crate::core::geo::Point;

/// Rounds each axis to the nearest multiple of `grid_size`.
///
/// A non-positive grid size leaves the point untouched.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    if !(grid_size > 0.0) {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Grid intersections inside `bounds`, both ends inclusive, row by row.
///
/// Returns nothing for a non-positive grid size or when the enumeration would
/// exceed [`MAX_GRID_POINTS`].
pub fn get_grid_points(bounds: &BoundingBox, grid_size: f64) -> Vec<Point> {
    if !(grid_size > 0.0) || !grid_size.is_finite() {
        return Vec::new();
    }

    let first_col = (bounds.min_x / grid_size).ceil();
    let last_col = (bounds.max_x / grid_size).floor();
    let first_row = (bounds.min_y / grid_size).ceil();
    let last_row = (bounds.max_y / grid_size).floor();
    if last_col < first_col || last_row < first_row {
        return Vec::new();
    }

    let cols = last_col - first_col + 1.0;
    let rows = last_row - first_row + 1.0;
    if cols * rows > MAX_GRID_POINTS as f64 {
        log::warn!(
            "grid of {}x{} points at size {} exceeds the {} point limit",
            cols,
            rows,
            grid_size,
            MAX_GRID_POINTS
        );
        return Vec::new();
    }

    let (cols, rows) = (cols as usize, rows as usize);
    let mut points = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        let y = (first_row + row as f64) * grid_size;
        for col in 0..cols {
            points.push(Point::new((first_col + col as f64) * grid_size, y));
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(Point::new(14.0, 16.0), 10.0), Point::new(10.0, 20.0));
        assert_eq!(snap_to_grid(Point::new(-14.0, 5.5), 10.0), Point::new(-10.0, 10.0));
        assert_eq!(snap_to_grid(Point::new(3.3, 4.4), 0.0), Point::new(3.3, 4.4));
    }

    #[test]
    fn test_grid_points_inclusive() {
        let bounds = BoundingBox::new(0.0, 0.0, 20.0, 10.0);
        let points = get_grid_points(&bounds, 10.0);
        assert_eq!(points.len(), 6);
        assert_eq!(points[0], Point::new(0.0, 0.0));
        assert_eq!(points[2], Point::new(20.0, 0.0));
        assert_eq!(points[5], Point::new(20.0, 10.0));
    }

    #[test]
    fn test_grid_points_unaligned_bounds() {
        let bounds = BoundingBox::new(-5.0, 3.0, 15.0, 12.0);
        let points = get_grid_points(&bounds, 10.0);
        assert_eq!(points, vec![Point::new(0.0, 10.0), Point::new(10.0, 10.0)]);
    }

    #[test]
    fn test_grid_points_degenerate_sizes() {
        let bounds = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        assert!(get_grid_points(&bounds, 0.0).is_empty());
        assert!(get_grid_points(&bounds, -1.0).is_empty());
        assert!(get_grid_points(&bounds, 1e-6).is_empty());
    }

    #[test]
    fn test_grid_points_empty_bounds_between_lines() {
        let bounds = BoundingBox::new(1.0, 1.0, 9.0, 9.0);
        assert!(get_grid_points(&bounds, 10.0).is_empty());
    }
}
