use super::Path;
use crate::error::PathError;
use crate::math::{angle_between, Point2d, Rotation, Vector2d};
use log::debug;
use smallvec::SmallVec;

impl Path {
    /// Creates a copy of this path which approaches its final point at
    /// roughly the given heading.
    ///
    /// The last segment is replaced with one or two turns of about 90 degrees,
    /// sized by `min_turning_radius`, so that the final stretch points along
    /// `heading`. Two turns are used when the heading is more than 90 degrees
    /// from the direction of the last segment. The vehicle is not guaranteed
    /// to reach the end at exactly this heading.
    ///
    /// The new path contains every segment of this one, including retired
    /// ones, and has no observers.
    pub fn with_end_heading(
        &self,
        heading: Rotation,
        min_turning_radius: f64,
    ) -> Result<Path, PathError> {
        let Some((last, init)) = self.segments.split_last() else {
            return Err(PathError::EmptyPath);
        };

        let relative = angle_between(last.start(), last.end())
            .inverse()
            .rotate_by(heading);
        let turn = Rotation::from_degrees(if relative.sin() > 0.0 { 90.0 } else { -90.0 });

        let final_offset = heading.flip().rotate(Vector2d::new(min_turning_radius, 0.0));
        let final_start = last.end() + final_offset;
        let second_start = final_start + turn.rotate(final_offset);

        let mut points = SmallVec::<[Point2d; 3]>::new();
        if relative.cos() < 0.0 {
            points.push(second_start);
        }
        points.push(final_start);
        points.push(last.end());

        debug!(
            "Approaching ({}, {}) at {:.1} deg with {} extra points",
            last.end().x,
            last.end().y,
            heading.degrees(),
            points.len() - 1
        );

        let mut path = Path::new(self.start);
        for segment in init {
            path.add_point(segment.end(), segment.max_speed());
        }
        for point in points {
            path.add_point(point, last.max_speed());
        }
        Ok(path)
    }
}
