// Segment-segment intersection over outward-rounded interval arithmetic.
// Classifies proper crossings, endpoint touches, and collinear overlaps,
// staying correct for near-parallel, near-degenerate and near-miss inputs.

use crate::geometry::interval::{l2, max, min, Interval};
use crate::geometry::tolerance::clamp01;
use crate::model::{SegIntersection, Segment, Vec2};

#[inline]
fn nearest_endpoint(t: f64) -> f64 {
    if t <= 0.5 {
        0.0
    } else {
        1.0
    }
}

#[inline]
fn distance(a: Vec2, b: Vec2) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

fn interval_distance(a: Vec2, b: Vec2) -> Interval {
    l2(
        Interval::from(a.x) - Interval::from(b.x),
        Interval::from(a.y) - Interval::from(b.y),
    )
}

fn point_record(t: f64, s: f64) -> SegIntersection {
    SegIntersection::Point {
        t: clamp01(t),
        s: clamp01(s),
    }
}

fn push_overlap(out: &mut Vec<SegIntersection>, t1: f64, t2: f64, s1: f64, s2: f64) {
    out.push(SegIntersection::OverlapEndpoint {
        t: clamp01(t1),
        s: clamp01(s1),
    });
    out.push(SegIntersection::OverlapEndpoint {
        t: clamp01(t2),
        s: clamp01(s2),
    });
}

// A degenerate segment has no usable direction; its side of the overlap
// spans the whole [0, 1] range, anchored at one parameter on the other side.
fn push_degenerate_overlap(out: &mut Vec<SegIntersection>, anchor: f64, seg1_is_degenerate: bool) {
    if seg1_is_degenerate {
        push_overlap(out, 0.0, 1.0, anchor, anchor);
    } else {
        push_overlap(out, anchor, anchor, 0.0, 1.0);
    }
}

// Scalar projection of v onto d, as a parameter over d's squared length.
#[inline]
fn project(dx: Interval, dy: Interval, vx: Interval, vy: Interval, denom: Interval) -> Interval {
    (vx * dx + vy * dy) / denom
}

// Shared handler for collinear segments and for parallel segments whose
// perpendicular offset is within tolerance. The four parameters locate
// seg2's endpoints on seg1's axis and vice versa.
fn handle_collinear(
    out: &mut Vec<SegIntersection>,
    seg1_t1: Interval,
    seg1_t2: Interval,
    seg2_t1: Interval,
    seg2_t2: Interval,
    seg1_dir: Interval,
    seg2_dir: Interval,
    seg1: Segment,
    epsilon: f64,
) {
    let t_start = max(min(seg1_t1, seg1_t2), 0.0);
    let t_end = min(max(seg1_t1, seg1_t2), 1.0);
    let s_start = max(min(seg2_t1, seg2_t2), 0.0);
    let s_end = min(max(seg2_t1, seg2_t2), 1.0);

    let endpoint_dist = distance(
        seg1.point_at(t_start.middle()),
        seg1.point_at(t_end.middle()),
    );

    if endpoint_dist <= epsilon {
        // The shared range collapsed to a point; snap to the nearest endpoints.
        out.push(point_record(
            nearest_endpoint(t_start.middle()),
            nearest_endpoint(s_start.middle()),
        ));
    } else if t_end.certainly_gt(t_start) && s_end.certainly_gt(s_start) {
        // Partial or total overlap.
        let (mut t1, mut t2) = (t_start.middle(), t_end.middle());
        let (mut s1, mut s2) = (s_start.middle(), s_end.middle());

        // A segment running against the shared direction reports its
        // overlap ends in reverse; swap so both pairs name the same
        // physical locations.
        if seg2_dir.middle() < 0.0 {
            std::mem::swap(&mut s1, &mut s2);
        }
        if seg1_dir.middle() < 0.0 {
            std::mem::swap(&mut t1, &mut t2);
        }
        push_overlap(out, t1, t2, s1, s2);
    }
}

// Intersection of a degenerate (point-like) segment with a normal one:
// project both endpoints of the degenerate segment onto the normal one and
// keep whichever projections land on it within tolerance.
fn handle_single_degenerate(
    out: &mut Vec<SegIntersection>,
    degenerate_seg: Segment,
    normal_seg: Segment,
    normal_dx: Interval,
    normal_dy: Interval,
    normal_sqr_length: Interval,
    epsilon: f64,
    bounds: Interval,
    seg1_is_degenerate: bool,
) {
    let base_x = Interval::from(normal_seg.a.x);
    let base_y = Interval::from(normal_seg.a.y);

    let t1 = project(
        normal_dx,
        normal_dy,
        Interval::from(degenerate_seg.a.x) - base_x,
        Interval::from(degenerate_seg.a.y) - base_y,
        normal_sqr_length,
    );
    let t2 = project(
        normal_dx,
        normal_dy,
        Interval::from(degenerate_seg.b.x) - base_x,
        Interval::from(degenerate_seg.b.y) - base_y,
        normal_sqr_length,
    );

    let mut t1_is_close = false;
    let mut t2_is_close = false;

    if t1.intersects(bounds) {
        let dist = interval_distance(degenerate_seg.a, normal_seg.point_at(t1.middle()));
        t1_is_close = dist.is_small(epsilon);
    }
    if t2.intersects(bounds) {
        let dist = interval_distance(degenerate_seg.b, normal_seg.point_at(t2.middle()));
        t2_is_close = dist.is_small(epsilon);
    }

    if t1_is_close && t2_is_close {
        // Both projections land close; anchor at their midpoint.
        let t_mid = (t1 + t2) / 2.0;
        push_degenerate_overlap(out, t_mid.middle(), seg1_is_degenerate);
    } else if t1_is_close {
        push_degenerate_overlap(out, t1.middle(), seg1_is_degenerate);
    } else if t2_is_close {
        push_degenerate_overlap(out, t2.middle(), seg1_is_degenerate);
    }
}

/// Intersect two line segments with distance tolerance `epsilon`.
///
/// Returns 0, 1 or 2 records: a single [`SegIntersection::Point`] for a
/// crossing or an endpoint touch, exactly two
/// [`SegIntersection::OverlapEndpoint`]s bracketing a collinear overlap, or
/// nothing. All reported parameters are clamped into `[0, 1]`. The function
/// is total: it never panics, and non-finite coordinates or tolerance yield
/// an empty result.
pub fn intersect(seg1: Segment, seg2: Segment, epsilon: f64) -> Vec<SegIntersection> {
    let mut result = Vec::new();
    if !seg1.is_finite() || !seg2.is_finite() || !epsilon.is_finite() {
        return result;
    }

    let bounds = Interval::new(0.0, 1.0);

    let p1x = Interval::from(seg1.a.x);
    let p1y = Interval::from(seg1.a.y);
    let p2x = Interval::from(seg1.b.x);
    let p2y = Interval::from(seg1.b.y);

    let q1x = Interval::from(seg2.a.x);
    let q1y = Interval::from(seg2.a.y);
    let q2x = Interval::from(seg2.b.x);
    let q2y = Interval::from(seg2.b.y);

    let seg1_dx = p2x - p1x;
    let seg1_dy = p2y - p1y;
    let seg2_dx = q2x - q1x;
    let seg2_dy = q2y - q1y;

    let length_seg1 = l2(seg1_dx, seg1_dy);
    let length_seg2 = l2(seg2_dx, seg2_dy);

    let sqr_length_seg1 = seg1_dx.square() + seg1_dy.square();
    let sqr_length_seg2 = seg2_dx.square() + seg2_dy.square();

    let seg1_degenerate = length_seg1.is_small(epsilon);
    let seg2_degenerate = length_seg2.is_small(epsilon);

    if seg1_degenerate || seg2_degenerate {
        if seg1_degenerate && seg2_degenerate {
            // Two points; total overlap when they coincide within tolerance.
            if distance(seg1.a, seg2.a) <= epsilon {
                push_overlap(&mut result, 0.0, 1.0, 0.0, 1.0);
            }
        } else if seg1_degenerate {
            handle_single_degenerate(
                &mut result,
                seg1,
                seg2,
                seg2_dx,
                seg2_dy,
                sqr_length_seg2,
                epsilon,
                bounds,
                true,
            );
        } else {
            handle_single_degenerate(
                &mut result,
                seg2,
                seg1,
                seg1_dx,
                seg1_dy,
                sqr_length_seg1,
                epsilon,
                bounds,
                false,
            );
        }
        return result;
    }

    let cross = seg1_dy * seg2_dx - seg1_dx * seg2_dy;

    if cross.contains(0.0) {
        // Parallel within rounding uncertainty. cross_v measures the
        // perpendicular offset of line 2 from line 1.
        let cross_v = (q1x - p1x) * seg1_dy - (q1y - p1y) * seg1_dx;

        // Overlap parameters run along the dominant axis of the shared
        // direction; the same components order the reported pairs.
        let x_dominant = (seg1.b.x - seg1.a.x).abs() >= (seg1.b.y - seg1.a.y).abs();
        let (dir1, dir2) = if x_dominant {
            (seg1_dx, seg2_dx)
        } else {
            (seg1_dy, seg2_dy)
        };

        if cross_v.contains(0.0) {
            // Collinear: parameters are plain ratios along the shared axis.
            let (t_seg1_q1, t_seg1_q2, t_seg2_p1, t_seg2_p2) = if x_dominant {
                (
                    (q1x - p1x) / seg1_dx,
                    (q2x - p1x) / seg1_dx,
                    (p1x - q1x) / seg2_dx,
                    (p2x - q1x) / seg2_dx,
                )
            } else {
                (
                    (q1y - p1y) / seg1_dy,
                    (q2y - p1y) / seg1_dy,
                    (p1y - q1y) / seg2_dy,
                    (p2y - q1y) / seg2_dy,
                )
            };
            handle_collinear(
                &mut result,
                t_seg1_q1,
                t_seg1_q2,
                t_seg2_p1,
                t_seg2_p2,
                dir1,
                dir2,
                seg1,
                epsilon,
            );
        } else {
            // Parallel but offset; accept when the gap is within tolerance.
            let dist = cross_v.abs() / length_seg1;
            if dist.is_small(epsilon) {
                let t_seg1_q1 = project(seg1_dx, seg1_dy, q1x - p1x, q1y - p1y, sqr_length_seg1);
                let t_seg1_q2 = project(seg1_dx, seg1_dy, q2x - p1x, q2y - p1y, sqr_length_seg1);
                let t_seg2_p1 = project(seg2_dx, seg2_dy, p1x - q1x, p1y - q1y, sqr_length_seg2);
                let t_seg2_p2 = project(seg2_dx, seg2_dy, p2x - q1x, p2y - q1y, sqr_length_seg2);
                handle_collinear(
                    &mut result,
                    t_seg1_q1,
                    t_seg1_q2,
                    t_seg2_p1,
                    t_seg2_p2,
                    dir1,
                    dir2,
                    seg1,
                    epsilon,
                );
            }
        }
    } else {
        // Cramer's rule on the 2x2 system, entirely in interval form.
        let t = ((q1y - p1y) * seg2_dx - (q1x - p1x) * seg2_dy) / cross;
        let s = ((q1y - p1y) * seg1_dx - (q1x - p1x) * seg1_dy) / cross;

        if t.intersects(bounds) && s.intersects(bounds) {
            result.push(point_record(t.middle(), s.middle()));
        } else {
            // Near miss just outside [0,1]: clamp and measure the real gap.
            let t_val = clamp01(t.middle());
            let s_val = clamp01(s.middle());
            if distance(seg1.point_at(t_val), seg2.point_at(s_val)) <= epsilon {
                result.push(point_record(t_val, s_val));
            } else {
                // Last resort: the nearest endpoints of each segment.
                let endpoint_t = nearest_endpoint(t_val);
                let endpoint_s = nearest_endpoint(s_val);
                if distance(seg1.point_at(endpoint_t), seg2.point_at(endpoint_s)) <= epsilon {
                    result.push(point_record(endpoint_t, endpoint_s));
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::tolerance::EPSILON;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Vec2::new(x1, y1), Vec2::new(x2, y2))
    }

    #[test]
    fn proper_cross() {
        let r = intersect(seg(0.0, 0.0, 10.0, 0.0), seg(5.0, 10.0, 5.0, -10.0), EPSILON);
        match r[..] {
            [SegIntersection::Point { t, s }] => {
                assert!((t - 0.5).abs() < 1e-9);
                assert!((s - 0.5).abs() < 1e-9);
            }
            _ => panic!("expected a single point, got {:?}", r),
        }
    }

    #[test]
    fn endpoint_touch() {
        let r = intersect(seg(0.0, 0.0, 10.0, 0.0), seg(10.0, 0.0, 20.0, 5.0), EPSILON);
        match r[..] {
            [SegIntersection::Point { t, s }] => {
                assert!((t - 1.0).abs() < 1e-9);
                assert!(s.abs() < 1e-9);
            }
            _ => panic!("expected an endpoint touch, got {:?}", r),
        }
    }

    #[test]
    fn collinear_overlap() {
        let r = intersect(seg(0.0, 0.0, 4.0, 0.0), seg(1.0, 0.0, 3.0, 0.0), EPSILON);
        assert_eq!(r.len(), 2);
        assert!(r.iter().all(|i| i.is_overlap_endpoint()));
    }

    #[test]
    fn non_finite_input_yields_nothing() {
        let r = intersect(
            seg(f64::NAN, 0.0, 1.0, 0.0),
            seg(0.0, -1.0, 0.0, 1.0),
            EPSILON,
        );
        assert!(r.is_empty());
    }
}
