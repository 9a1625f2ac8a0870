//! Generic object pool shared between engine instances.
//!
//! Each engine owns an `ObjectPool` of its scratch state so repeated
//! calculations reuse the big-integer buffers grown by earlier runs
//! instead of reallocating them.

use parking_lot::Mutex;

/// A thread-safe object pool backed by a `Mutex<Vec<T>>`.
///
/// Objects are acquired with a factory + reset closure, and released back
/// into the pool up to `max_size`. When the pool is empty, `acquire`
/// creates a new object via the factory; when the pool is full, `release`
/// drops the object.
pub struct ObjectPool<T> {
    pool: Mutex<Vec<T>>,
    max_size: usize,
}

impl<T: Send> ObjectPool<T> {
    /// Create a new pool with the given maximum capacity.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            pool: Mutex::new(Vec::with_capacity(max_size)),
            max_size,
        }
    }

    /// Acquire an object from the pool, or create a new one via `factory`.
    /// If an object is reused from the pool, `reset` is called on it first,
    /// outside the pool lock.
    pub fn acquire(&self, factory: impl FnOnce() -> T, reset: impl FnOnce(&mut T)) -> T {
        let recycled = self.pool.lock().pop();
        match recycled {
            Some(mut item) => {
                reset(&mut item);
                item
            }
            None => factory(),
        }
    }

    /// Return an object to the pool for reuse. If the pool is at capacity,
    /// the object is dropped.
    pub fn release(&self, item: T) {
        let mut pool = self.pool.lock();
        if pool.len() < self.max_size {
            pool.push(item);
        }
    }

    /// Get the number of objects currently available in the pool.
    #[must_use]
    pub fn available(&self) -> usize {
        self.pool.lock().len()
    }
}
