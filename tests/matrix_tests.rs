use canvasview::core::matrix::{self, AffineMatrix};
use canvasview::prelude::*;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Algebra checks against the public matrix API
#[cfg(test)]
mod matrix_tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn sample_matrices() -> Vec<AffineMatrix> {
        vec![
            AffineMatrix::IDENTITY,
            AffineMatrix::translation(10.0, -4.0),
            AffineMatrix::scale(2.0, 3.0),
            AffineMatrix::rotation(FRAC_PI_4),
            AffineMatrix::skew(0.2, 0.1),
            AffineMatrix::rotation_around_point(1.2, 40.0, 30.0)
                .then(&AffineMatrix::uniform_scale(0.5))
                .then(&AffineMatrix::translation(-7.0, 9.0)),
        ]
    }

    #[test]
    fn test_scale_matrix_scenario() {
        let p = matrix::transform_point(Point::new(1.0, 1.0), &AffineMatrix::scale(2.0, 3.0));
        assert_eq!(p, Point::new(2.0, 3.0));
    }

    #[test]
    fn test_composition_order_matters() {
        let origin = Point::new(0.0, 0.0);
        let translate_then_scale = matrix::multiply(
            &AffineMatrix::translation(10.0, 0.0),
            &AffineMatrix::scale(2.0, 2.0),
        );
        let scale_then_translate = matrix::multiply(
            &AffineMatrix::scale(2.0, 2.0),
            &AffineMatrix::translation(10.0, 0.0),
        );

        let a = matrix::transform_point(origin, &translate_then_scale);
        let b = matrix::transform_point(origin, &scale_then_translate);
        assert_eq!(a, Point::new(20.0, 0.0));
        assert_eq!(b, Point::new(10.0, 0.0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_round_trip_through_inverse() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(123.4, -56.7),
            Point::new(-1e3, 2e3),
        ];
        for m in sample_matrices() {
            let inverse = m.invert().unwrap();
            for p in points {
                let back = inverse.transform_point(m.transform_point(p));
                assert!(back.approx_eq(&p, 1e-6), "{} failed for {:?}", m, p);
            }
        }
    }

    #[test]
    fn test_identity_laws() {
        for m in sample_matrices() {
            assert_eq!(matrix::multiply(&AffineMatrix::IDENTITY, &m), m);
            assert_eq!(matrix::multiply(&m, &AffineMatrix::IDENTITY), m);
        }
        let p = Point::new(3.5, -8.25);
        assert_eq!(matrix::transform_point(p, &AffineMatrix::IDENTITY), p);
    }

    #[test]
    fn test_singular_inversion_is_an_error() {
        let collapsed = AffineMatrix::scale(0.0, 5.0);
        match matrix::invert(&collapsed) {
            Err(ViewError::SingularMatrix { determinant }) => assert_eq!(determinant, 0.0),
            other => panic!("expected a singular matrix error, got {:?}", other),
        }
    }

    #[test]
    fn test_interpolation_boundaries() {
        let a = AffineMatrix::translation(5.0, 5.0);
        let b = AffineMatrix::rotation(FRAC_PI_2).then(&AffineMatrix::uniform_scale(3.0));
        assert_eq!(matrix::interpolate(&a, &b, 0.0), a);
        assert_eq!(matrix::interpolate(&a, &b, 1.0), b);
        for t in [0.0, 0.25, 0.5, 0.9, 1.0] {
            assert_eq!(matrix::interpolate(&a, &a, t), a);
        }
    }

    #[test]
    fn test_decompose_compose() {
        let m = matrix::compose(Point::new(12.0, -3.0), Point::new(2.0, 2.0), 0.6, Point::ZERO);
        let parts = matrix::decompose(&m);
        assert!((parts.rotation - 0.6).abs() < TOLERANCE);
        assert!((parts.scale.x - 2.0).abs() < TOLERANCE);
        assert!((parts.scale.y - 2.0).abs() < TOLERANCE);
        assert!(parts.translation.approx_eq(&Point::new(12.0, -3.0), TOLERANCE));
    }

    #[test]
    fn test_rotated_bounding_box() {
        let square = BoundingBox::new(-1.0, -1.0, 1.0, 1.0);
        let rotated = matrix::transform_bounding_box(&square, &AffineMatrix::rotation(FRAC_PI_4));
        let half_diagonal = 2f64.sqrt();
        assert!((rotated.max_x - half_diagonal).abs() < TOLERANCE);
        assert!((rotated.min_y + half_diagonal).abs() < TOLERANCE);
    }

    #[test]
    fn test_css_string_round_trip() {
        let m = AffineMatrix::rotation(0.3).then(&AffineMatrix::translation(4.0, 8.0));
        let parsed: AffineMatrix = m.to_css_string().parse().unwrap();
        assert!(matrix::is_identity(&parsed.then(&m.invert().unwrap()), 1e-6));
    }
}
