use cgmath::{prelude::*, Zero};
use waypoint_pursuit::math::{Point2d, Vector2d};
use waypoint_pursuit::{BezierCurve, ControlPoint, PathError, TrackingParams};

/// Control loop period, in s.
const TICK: f64 = 0.02;

/// Give up if the path takes longer than this to drive, in s.
const TIMEOUT: f64 = 120.0;

fn main() -> Result<(), PathError> {
    env_logger::init();

    let params = TrackingParams::default();
    params.validate()?;

    let curve = BezierCurve::new(vec![
        ControlPoint::new(
            Vector2d::zero(),
            Point2d::new(0.0, 0.0),
            Vector2d::new(1.5, 0.0),
            1.0,
        ),
        ControlPoint::new(
            Vector2d::new(-1.0, -1.0),
            Point2d::new(4.0, 2.0),
            Vector2d::new(1.0, 1.0),
            1.5,
        ),
        ControlPoint::new(
            Vector2d::new(0.0, -1.5),
            Point2d::new(6.0, 6.0),
            Vector2d::zero(),
            0.5,
        ),
    ])?;
    let mut path = curve.flatten(params.flatten_step)?;
    path.add_observer(|t| log::debug!("Progress {:.1}%", 100.0 * t.progress));

    println!(
        "Driving {} segments, {:.2} m...",
        path.all_segments().len(),
        path.total_distance()
    );

    // A point vehicle which drives straight at the lookahead point
    let mut pose = Point2d::new(0.0, -0.3);
    let mut time = 0.0;
    while time < TIMEOUT {
        let data = path.lookahead(pose, params.lookahead_distance)?;
        let done = path.on_final_segment()
            && data.closest_point.distance(data.current_segment_end) < 1e-3;
        if done {
            break;
        }
        let heading = (data.lookahead_point - pose).normalize();
        let step = f64::min(data.max_speed * TICK, data.remaining_distance);
        pose = pose + heading * step;
        time += TICK;
    }

    println!(
        "Finished at ({:.3}, {:.3}) after {:.2} s, {:.3} m from the goal",
        pose.x,
        pose.y,
        time,
        pose.distance(path.last_point())
    );
    Ok(())
}
