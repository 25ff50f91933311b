//! Curve smoothing: where the control points of each cubic segment go.
//!
//! For three consecutive points `prev, cur, next`, the chord `prev -> next` sets the tangent at `cur`.
//! Control points sit on that tangent, `min(chord * smoothing_factor, chord / 5)` away from `cur`.
//! There is no velocity data in play, this only approximates a Catmull-Rom style tangent.

use crate::{config::SmoothingConfig, stroke::Point, util::Vec2};

/// Geometry of one span between two consecutive points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Segment {
    Straight {
        from: Vec2,
        to: Vec2,
        width: f64,
    },
    Cubic {
        from: Vec2,
        ctrl1: Vec2,
        ctrl2: Vec2,
        to: Vec2,
        width: f64,
    },
}

/// A segment, plus the optional filled circle `(center, diameter)` drawn beneath its end to round the joint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentDraw {
    pub joint: Option<(Vec2, f64)>,
    pub segment: Segment,
}

/// Control point for `cur`, placed along the chord `prev -> next`.
///
/// Without `reverse` it points back along the chord (towards `prev`), with `reverse` it points
/// forward (towards `next`).
#[must_use]
pub fn control_point(prev: Vec2, cur: Vec2, next: Vec2, reverse: bool, smoothing_factor: f64) -> Vec2 {
    let chord = prev - next;
    let length = chord.mag();
    let mut angle = chord.y.atan2(chord.x);
    if reverse {
        angle += std::f64::consts::PI;
    }
    let offset = (length * smoothing_factor).min(length / 5.0);

    Vec2::new(cur.x + angle.cos() * offset, cur.y + angle.sin() * offset)
}

/// Compute how to draw the span from `b` to `c`, where `a` and `d` are its outer neighbours.
/// At the ends of a curve, pad with `a = b` or `d = c`.
#[must_use]
pub fn segment(a: &Point, b: &Point, c: &Point, d: &Point, params: &SmoothingConfig) -> SegmentDraw {
    let width = c.width();
    let joint = (width > params.round_joint_threshold).then_some((c.position(), width));

    let segment = if crate::util::distance(b.position(), c.position()) <= params.straight_epsilon {
        // Near-coincident points make for noisy control points.
        Segment::Straight {
            from: b.position(),
            to: c.position(),
            width,
        }
    } else {
        Segment::Cubic {
            from: b.position(),
            ctrl1: control_point(
                a.position(),
                b.position(),
                c.position(),
                true,
                params.smoothing_factor,
            ),
            ctrl2: control_point(
                b.position(),
                c.position(),
                d.position(),
                false,
                params.smoothing_factor,
            ),
            to: c.position(),
            width,
        }
    };

    SegmentDraw { joint, segment }
}

/// The span from `points[idx]` to `points[idx + 1]`, padded at either end of the slice.
///
/// # Panics
/// If `idx + 1` is out of bounds.
#[must_use]
pub fn segment_at(points: &[Point], idx: usize, params: &SmoothingConfig) -> SegmentDraw {
    let last = points.len() - 1;
    segment(
        &points[idx.saturating_sub(1)],
        &points[idx],
        &points[idx + 1],
        &points[(idx + 2).min(last)],
        params,
    )
}

/// Every span of a curve, in order.
pub fn segments<'p>(
    points: &'p [Point],
    params: &'p SmoothingConfig,
) -> impl Iterator<Item = SegmentDraw> + 'p {
    (0..points.len().saturating_sub(1)).map(move |idx| segment_at(points, idx, params))
}

#[cfg(test)]
mod test {
    use super::{control_point, segment, segments, Segment};
    use crate::config::SmoothingConfig;
    use crate::stroke::{Point, Sample};
    use crate::util::Vec2;

    fn point(x: f64, y: f64, width: f64) -> Point {
        // width_class 10 at pressure width/10 gives exactly `width`.
        Point::first(&Sample::new(x, y, Some(width / 10.0), 0), 10.0)
    }
    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).mag() < 1e-9
    }
    #[test]
    fn control_points_follow_chord() {
        // Chord of 100 along +x. Offset = min(100 * 0.1, 100 / 5) = 10.
        let prev = Vec2::new(0.0, 0.0);
        let cur = Vec2::new(50.0, 0.0);
        let next = Vec2::new(100.0, 0.0);
        assert!(close(
            control_point(prev, cur, next, false, 0.1),
            Vec2::new(40.0, 0.0)
        ));
        assert!(close(
            control_point(prev, cur, next, true, 0.1),
            Vec2::new(60.0, 0.0)
        ));
    }
    #[test]
    fn control_offset_capped() {
        // A huge smoothing factor is capped at a fifth of the chord.
        let ctrl = control_point(
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, 0.0),
            Vec2::new(100.0, 0.0),
            true,
            10.0,
        );
        assert!(close(ctrl, Vec2::new(70.0, 0.0)));
    }
    #[test]
    fn coincident_neighbours_stay_put() {
        let p = Vec2::new(3.0, 4.0);
        assert!(close(control_point(p, p, p, true, 0.1), p));
    }
    #[test]
    fn near_points_draw_straight() {
        let params = SmoothingConfig::default();
        let (a, b, c, d) = (
            point(0.0, 0.0, 2.0),
            point(10.0, 0.0, 2.0),
            point(12.0, 0.0, 2.0),
            point(30.0, 0.0, 2.0),
        );
        let draw = segment(&a, &b, &c, &d, &params);
        assert!(matches!(draw.segment, Segment::Straight { .. }));
        assert!(draw.joint.is_none());
    }
    #[test]
    fn far_points_draw_cubic() {
        let params = SmoothingConfig::default();
        let (a, b, c, d) = (
            point(0.0, 0.0, 2.0),
            point(50.0, 10.0, 2.0),
            point(100.0, 0.0, 2.0),
            point(150.0, 20.0, 2.0),
        );
        let draw = segment(&a, &b, &c, &d, &params);
        let Segment::Cubic {
            from,
            ctrl1,
            ctrl2,
            to,
            width,
        } = draw.segment
        else {
            panic!("expected a cubic, got {:?}", draw.segment);
        };
        assert!(close(from, b.position()));
        assert!(close(to, c.position()));
        assert!(!close(ctrl1, ctrl2));
        assert!(!close(ctrl1, from));
        assert!(!close(ctrl2, to));
        assert!((width - 2.0).abs() < 1e-12);
    }
    #[test]
    fn wide_points_round_their_joint() {
        let params = SmoothingConfig::default();
        let (b, c) = (point(0.0, 0.0, 6.0), point(40.0, 0.0, 6.0));
        let draw = segment(&b, &b, &c, &c, &params);
        assert_eq!(draw.joint, Some((c.position(), c.width())));
    }
    #[test]
    fn segment_count() {
        let params = SmoothingConfig::default();
        let points: Vec<_> = (0..6).map(|i| point(f64::from(i) * 20.0, 0.0, 1.0)).collect();
        assert_eq!(segments(&points, &params).count(), 5);
        assert_eq!(segments(&points[..1], &params).count(), 0);
        assert_eq!(segments(&[], &params).count(), 0);
    }
}
