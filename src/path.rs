//! A path of straight segments, and pure pursuit tracking along it.

use crate::error::PathError;
use crate::math::Point2d;
use crate::segment::Segment;
use crate::ObserverId;
use cgmath::prelude::*;
use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

mod heading;
mod shared;

pub use shared::SharedPath;

/// Steering and speed targets for the current position of the vehicle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DrivingData {
    /// The distance left to drive along the path, in m.
    pub remaining_distance: f64,
    /// The target speed of the segment being driven.
    pub max_speed: f64,
    /// The point to steer towards.
    pub lookahead_point: Point2d,
    /// The point on the path closest to the vehicle.
    pub closest_point: Point2d,
    /// The end of the segment being driven.
    pub current_segment_end: Point2d,
}

/// Progress information reported to observers on every lookahead query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Telemetry {
    /// The vehicle position passed to the query.
    pub pose: Point2d,
    /// The distance along the path to the vehicle's projection, in m.
    pub traveled_distance: f64,
    /// `traveled_distance` as a fraction of the total path length.
    pub progress: f64,
    /// The point on the path closest to the vehicle.
    pub closest_point: Point2d,
    /// The point to steer towards.
    pub lookahead_point: Point2d,
}

type Observer = Box<dyn FnMut(&Telemetry) + Send>;

/// A path made up of straight segments.
///
/// The path is built up with [`Path::add_point`] and then followed with
/// [`Path::lookahead`]. Tracking only ever moves forwards: segments which
/// the vehicle has passed are retired and are not considered again.
pub struct Path {
    /// The first point of the path.
    start: Point2d,
    /// Every segment added to the path, in driving order.
    segments: Vec<Segment>,
    /// Index of the segment currently being driven.
    current: usize,
    /// The end of the last segment added.
    last_point: Point2d,
    /// The sum of the lengths of all segments, in m.
    total_dist: f64,
    /// The sum of the lengths of all retired segments, in m.
    finished_dist: f64,
    /// Callbacks which receive telemetry from each lookahead query.
    observers: SlotMap<ObserverId, Observer>,
}

impl Path {
    /// Creates an empty path beginning at `start`.
    pub fn new(start: Point2d) -> Self {
        Self {
            start,
            segments: vec![],
            current: 0,
            last_point: start,
            total_dist: 0.0,
            finished_dist: 0.0,
            observers: SlotMap::with_key(),
        }
    }

    /// Extends the path with a straight segment to `point`.
    ///
    /// # Parameters
    /// * `point` - The end of the new segment
    /// * `speed` - The target speed along the new segment
    pub fn add_point(&mut self, point: Point2d, speed: f64) {
        let segment = Segment::new(self.last_point, point, speed);
        if segment.length() == 0.0 {
            log::warn!("Adding a zero length segment at ({}, {})", point.x, point.y);
        }
        self.total_dist += segment.length();
        self.segments.push(segment);
        self.last_point = point;
    }

    /// Returns true if no segments have been added.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn start(&self) -> Point2d {
        self.start
    }

    /// The end of the last segment added.
    pub fn last_point(&self) -> Point2d {
        self.last_point
    }

    /// The length of the whole path, in m.
    pub fn total_distance(&self) -> f64 {
        self.total_dist
    }

    /// The length of the segments already retired, in m.
    pub fn finished_distance(&self) -> f64 {
        self.finished_dist
    }

    /// The segments that have not been retired, starting with the one being driven.
    pub fn segments(&self) -> &[Segment] {
        &self.segments[self.current..]
    }

    /// Every segment of the path, including retired ones.
    pub fn all_segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if the segment being driven is the last one.
    ///
    /// The path never retires its last segment, so a caller can detect
    /// completion by checking this along with how close
    /// [`DrivingData::closest_point`] is to [`DrivingData::current_segment_end`].
    pub fn on_final_segment(&self) -> bool {
        self.current + 1 == self.segments.len()
    }

    /// Registers a callback to receive telemetry from each lookahead query.
    pub fn add_observer(&mut self, observer: impl FnMut(&Telemetry) + Send + 'static) -> ObserverId {
        self.observers.insert(Box::new(observer))
    }

    /// Unregisters a callback. Returns false if it was not registered.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id).is_some()
    }

    /// Computes the point to steer towards, and the speed and distance
    /// remaining, for a vehicle at `pose`.
    ///
    /// Segments the vehicle has moved past are retired. The target point is
    /// `lookahead_distance` along the path from the vehicle's projection onto
    /// it, plus however far the vehicle is from the path. Beyond the end of
    /// the path the final segment is extended in a straight line.
    pub fn lookahead(
        &mut self,
        pose: Point2d,
        lookahead_distance: f64,
    ) -> Result<DrivingData, PathError> {
        if self.is_empty() {
            return Err(PathError::EmptyPath);
        }

        let mut closest = self.segments[self.current].closest_point(pose);
        let mut off_path = pose.distance(closest);

        // Retire segments the vehicle has moved past
        while self.current + 1 < self.segments.len() {
            let front = self.segments[self.current];
            let next_closest = self.segments[self.current + 1].closest_point(pose);
            let next_off_path = pose.distance(next_closest);
            let at_end = closest == front.end();
            if next_off_path < off_path || (next_off_path == off_path && at_end) {
                self.finished_dist += front.length();
                self.current += 1;
                trace!(
                    "Retired segment {} ({:.3} of {:.3} m finished)",
                    self.current - 1,
                    self.finished_dist,
                    self.total_dist
                );
                closest = next_closest;
                off_path = next_off_path;
            } else {
                break;
            }
        }

        let front = self.segments[self.current];
        let rest = &self.segments[self.current + 1..];

        let traveled = self.finished_dist + front.fraction_of_closest_point(pose) * front.length();
        let progress = if self.total_dist > 0.0 {
            traveled / self.total_dist
        } else {
            1.0
        };

        let remaining_seg = closest.distance(front.end());
        let remaining = remaining_seg + rest.iter().map(Segment::length).sum::<f64>();

        // Steer further ahead the further the vehicle has strayed from the path
        let mut budget = lookahead_distance + off_path;

        let lookahead_point = match rest.split_last() {
            Some((last, between)) if budget > remaining_seg => {
                budget -= remaining_seg;
                let mut point = None;
                for segment in between {
                    if budget <= segment.length() {
                        point = Some(segment.point_at_distance(budget));
                        break;
                    }
                    budget -= segment.length();
                }
                point.unwrap_or_else(|| last.point_at_distance(budget))
            }
            _ => front.point_at_distance(front.length() - remaining_seg + budget),
        };

        let telemetry = Telemetry {
            pose,
            traveled_distance: traveled,
            progress,
            closest_point: closest,
            lookahead_point,
        };
        for observer in self.observers.values_mut() {
            observer(&telemetry);
        }

        Ok(DrivingData {
            remaining_distance: remaining,
            max_speed: front.max_speed(),
            lookahead_point,
            closest_point: closest,
            current_segment_end: front.end(),
        })
    }
}

impl std::fmt::Debug for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Path")
            .field("start", &self.start)
            .field("segments", &self.segments)
            .field("current", &self.current)
            .field("total_dist", &self.total_dist)
            .field("finished_dist", &self.finished_dist)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng};
    use std::sync::{Arc, Mutex};

    /// A straight path along the x-axis with 10 m segments.
    fn straight_path() -> Path {
        let mut path = Path::new(Point2d::new(0.0, 0.0));
        path.add_point(Point2d::new(10.0, 0.0), 1.0);
        path.add_point(Point2d::new(20.0, 0.0), 2.0);
        path.add_point(Point2d::new(30.0, 0.0), 3.0);
        path
    }

    /// An L-shaped path: 10 m east, then 10 m north.
    fn corner_path() -> Path {
        let mut path = Path::new(Point2d::new(0.0, 0.0));
        path.add_point(Point2d::new(10.0, 0.0), 1.0);
        path.add_point(Point2d::new(10.0, 10.0), 0.5);
        path
    }

    fn assert_point(actual: Point2d, x: f64, y: f64) {
        assert_approx_eq!(actual.x, x, 1e-9);
        assert_approx_eq!(actual.y, y, 1e-9);
    }

    #[test]
    fn empty_path_cannot_be_tracked() {
        let mut path = Path::new(Point2d::new(1.0, 2.0));
        assert!(path.is_empty());
        assert!(!path.on_final_segment());
        assert!(matches!(
            path.lookahead(Point2d::new(0.0, 0.0), 1.0),
            Err(PathError::EmptyPath)
        ));
    }

    #[test]
    fn total_distance_is_sum_of_segments() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
        let mut path = Path::new(Point2d::new(0.0, 0.0));
        let mut expected = 0.0;
        let mut last = path.start();
        for _i in 0..200 {
            let point = Point2d::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0));
            expected += last.distance(point);
            path.add_point(point, 1.0);
            last = point;
        }
        assert!(!path.is_empty());
        assert_eq!(path.all_segments().len(), 200);
        assert_eq!(path.last_point(), last);
        assert_approx_eq!(path.total_distance(), expected, 1e-9);
    }

    #[test]
    fn lookahead_from_start() {
        let mut path = straight_path();
        let data = path.lookahead(Point2d::new(0.0, 0.0), 5.0).unwrap();
        assert_point(data.lookahead_point, 5.0, 0.0);
        assert_point(data.closest_point, 0.0, 0.0);
        assert_point(data.current_segment_end, 10.0, 0.0);
        assert_approx_eq!(data.remaining_distance, 30.0);
        assert_eq!(data.max_speed, 1.0);
        assert_eq!(path.segments().len(), 3);
    }

    #[test]
    fn segment_is_retired_at_its_end() {
        let mut path = straight_path();
        let data = path.lookahead(Point2d::new(10.0, 0.0), 5.0).unwrap();
        assert_eq!(path.segments().len(), 2);
        assert_eq!(path.finished_distance(), 10.0);
        assert_point(data.lookahead_point, 15.0, 0.0);
        assert_point(data.current_segment_end, 20.0, 0.0);
        assert_approx_eq!(data.remaining_distance, 20.0);
        assert_eq!(data.max_speed, 2.0);
    }

    #[test]
    fn several_segments_retired_at_once() {
        let mut path = straight_path();
        path.lookahead(Point2d::new(1.0, 0.0), 1.0).unwrap();
        let data = path.lookahead(Point2d::new(25.0, 0.5), 1.0).unwrap();
        assert!(path.on_final_segment());
        assert_eq!(path.finished_distance(), 20.0);
        assert_point(data.closest_point, 25.0, 0.0);
        assert_point(data.lookahead_point, 26.5, 0.0);
        assert_approx_eq!(data.remaining_distance, 5.0);
    }

    #[test]
    fn lookahead_spans_following_segments() {
        let mut path = straight_path();
        let data = path.lookahead(Point2d::new(2.0, 0.0), 15.0).unwrap();
        assert_point(data.lookahead_point, 17.0, 0.0);
        let data = path.lookahead(Point2d::new(2.0, 0.0), 25.0).unwrap();
        assert_point(data.lookahead_point, 27.0, 0.0);
        assert_eq!(path.segments().len(), 3);
    }

    #[test]
    fn lookahead_turns_corner() {
        let mut path = corner_path();
        let data = path.lookahead(Point2d::new(8.0, 0.0), 5.0).unwrap();
        assert_point(data.lookahead_point, 10.0, 3.0);
        assert_eq!(data.max_speed, 1.0);
    }

    #[test]
    fn lookahead_extrapolates_past_end() {
        let mut path = straight_path();
        let data = path.lookahead(Point2d::new(0.0, 0.0), 40.0).unwrap();
        assert_point(data.lookahead_point, 40.0, 0.0);

        let data = path.lookahead(Point2d::new(28.0, 0.0), 10.0).unwrap();
        assert!(path.on_final_segment());
        assert_point(data.lookahead_point, 38.0, 0.0);
        assert_point(data.current_segment_end, 30.0, 0.0);

        // Past the end of the path, the last segment is kept
        let data = path.lookahead(Point2d::new(33.0, 0.0), 1.0).unwrap();
        assert_eq!(path.segments().len(), 1);
        assert_point(data.closest_point, 30.0, 0.0);
        assert_approx_eq!(data.remaining_distance, 0.0);
        assert_point(data.lookahead_point, 34.0, 0.0);
    }

    #[test]
    fn off_path_inflates_lookahead() {
        let mut path = straight_path();
        let data = path.lookahead(Point2d::new(5.0, 3.0), 5.0).unwrap();
        assert_point(data.closest_point, 5.0, 0.0);
        assert_point(data.lookahead_point, 13.0, 0.0);
        assert_approx_eq!(data.remaining_distance, 25.0);
    }

    #[test]
    fn lookahead_behind_start_is_not_clamped() {
        let mut path = Path::new(Point2d::new(0.0, 0.0));
        path.add_point(Point2d::new(10.0, 0.0), 1.0);
        // Far behind the start the offset runs off the front of the segment
        let data = path.lookahead(Point2d::new(-6.0, 0.0), 1.0).unwrap();
        assert_point(data.closest_point, 0.0, 0.0);
        assert_point(data.lookahead_point, 7.0, 0.0);
        let data = path.lookahead(Point2d::new(-6.0, 0.0), -20.0).unwrap();
        assert_point(data.lookahead_point, -14.0, 0.0);
    }

    #[test]
    fn never_moves_backwards() {
        let mut path = straight_path();
        path.lookahead(Point2d::new(15.0, 0.0), 1.0).unwrap();
        assert_eq!(path.finished_distance(), 10.0);
        let data = path.lookahead(Point2d::new(2.0, 0.0), 1.0).unwrap();
        assert_eq!(path.finished_distance(), 10.0);
        assert_point(data.closest_point, 10.0, 0.0);
        assert_approx_eq!(data.remaining_distance, 20.0);
    }

    #[test]
    fn distances_are_accounted_for() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
        let mut path = Path::new(Point2d::new(0.0, 0.0));
        let mut angle = 0.0f64;
        let mut last = path.start();
        for _i in 0..50 {
            angle += rng.gen_range(-0.6..0.6);
            let length = rng.gen_range(0.2..3.0);
            last = last + cgmath::Vector2::new(angle.cos(), angle.sin()) * length;
            path.add_point(last, 1.0);
        }

        // Walk along the path with some lateral noise
        let segments = path.all_segments().to_vec();
        for segment in &segments {
            for i in 0..4 {
                let t = i as f64 / 4.0;
                let jitter = cgmath::Vector2::new(rng.gen_range(-0.05..0.05), rng.gen_range(-0.05..0.05));
                let pose = segment.point_at_fraction(t) + jitter;
                let data = path.lookahead(pose, 1.0).unwrap();
                let front = path.segments()[0];
                let partial = front.start().distance(data.closest_point);
                assert_approx_eq!(
                    path.finished_distance() + partial + data.remaining_distance,
                    path.total_distance(),
                    1e-6
                );
                assert!(data.remaining_distance >= 0.0);
                assert!(!path.segments().is_empty());
            }
        }
    }

    #[test]
    fn observers_receive_telemetry() {
        let mut path = straight_path();
        let seen = Arc::new(Mutex::new(vec![]));
        let sink = seen.clone();
        let id = path.add_observer(move |t| sink.lock().unwrap().push(*t));

        path.lookahead(Point2d::new(15.0, 1.0), 2.0).unwrap();
        {
            let seen = seen.lock().unwrap();
            assert_eq!(seen.len(), 1);
            assert_approx_eq!(seen[0].traveled_distance, 15.0);
            assert_approx_eq!(seen[0].progress, 0.5);
            assert_point(seen[0].lookahead_point, 18.0, 0.0);
            assert_eq!(seen[0].pose, Point2d::new(15.0, 1.0));
        }

        assert!(path.remove_observer(id));
        assert!(!path.remove_observer(id));
        path.lookahead(Point2d::new(16.0, 0.0), 2.0).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn zero_length_path_reports_complete() {
        let mut path = Path::new(Point2d::new(4.0, 4.0));
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        path.add_observer(move |t| *sink.lock().unwrap() = Some(t.progress));
        path.add_point(Point2d::new(4.0, 4.0), 1.0);
        let data = path.lookahead(Point2d::new(5.0, 4.0), 1.0).unwrap();
        assert_eq!(data.remaining_distance, 0.0);
        assert_eq!(data.lookahead_point, Point2d::new(4.0, 4.0));
        assert_eq!(*seen.lock().unwrap(), Some(1.0));
    }
}
