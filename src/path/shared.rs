use super::{DrivingData, Path};
use crate::error::PathError;
use crate::math::Point2d;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A [`Path`] which may be replanned on one thread while being tracked on another.
///
/// Every operation holds a single lock over the whole path, since tracking
/// retires segments and cannot interleave with building.
#[derive(Clone, Debug)]
pub struct SharedPath {
    inner: Arc<Mutex<Path>>,
}

impl SharedPath {
    pub fn new(path: Path) -> Self {
        Self {
            inner: Arc::new(Mutex::new(path)),
        }
    }

    /// See [`Path::add_point`].
    pub fn add_point(&self, point: Point2d, speed: f64) {
        self.lock().add_point(point, speed)
    }

    /// See [`Path::lookahead`].
    pub fn lookahead(
        &self,
        pose: Point2d,
        lookahead_distance: f64,
    ) -> Result<DrivingData, PathError> {
        self.lock().lookahead(pose, lookahead_distance)
    }

    /// Swaps in a newly planned path, returning the old one.
    pub fn replace(&self, path: Path) -> Path {
        std::mem::replace(&mut *self.lock(), path)
    }

    /// Runs a closure with exclusive access to the path.
    pub fn with<R>(&self, f: impl FnOnce(&mut Path) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Path> {
        // Path operations never leave it half-modified, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
