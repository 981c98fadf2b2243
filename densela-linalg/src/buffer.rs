//! Fixed-capacity circular buffer of doubles.

use crate::error::{LinalgError, Result};
use crate::vector::Vector;

/// Circular buffer over a [`Vector`].
///
/// `head` is the slot the next [`push`](RingBuffer::push) overwrites, so
/// logical index 0 is the oldest value and -1 the most recent.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuffer {
    data: Vector,
    head: usize,
}

impl RingBuffer {
    /// Zero-filled buffer of the given capacity.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            data: Vector::new(capacity)?,
            head: 0,
        })
    }

    /// Fixed number of slots.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Slot the next push writes to.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Overwrite the oldest value.
    pub fn push(&mut self, value: f64) {
        self.data.as_mut_slice()[self.head] = value;
        self.head = (self.head + 1) % self.data.len();
    }

    /// Value at logical index `i`, in `[-capacity, capacity)`.
    pub fn get(&self, i: isize) -> Result<f64> {
        let cap = self.capacity() as isize;
        if i < -cap || i >= cap {
            return Err(LinalgError::IndexOutOfRange {
                index: i.unsigned_abs(),
                extent: self.capacity(),
            });
        }
        let slot = (self.head as isize + i).rem_euclid(cap) as usize;
        Ok(self.data.as_slice()[slot])
    }

    /// All values, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let (newer, older) = self.data.as_slice().split_at(self.head);
        older.iter().chain(newer.iter()).copied()
    }

    /// The raw storage, in slot order.
    pub fn as_vector(&self) -> &Vector {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_push_wraps() {
        let mut buf = RingBuffer::new(3).unwrap();
        for v in [1.0, 2.0, 3.0, 4.0] {
            buf.push(v);
        }
        assert_eq!(buf.head(), 1);
        assert_eq!(buf.as_vector().as_slice(), &[4.0, 2.0, 3.0]);
        assert_eq!(buf.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_relative_indexing() {
        let mut buf = RingBuffer::new(4).unwrap();
        for v in 1..=6 {
            buf.push(v as f64);
        }
        // slots: [5, 6, 3, 4], head = 2
        assert_eq!(buf.get(0).unwrap(), 3.0);
        assert_eq!(buf.get(3).unwrap(), 6.0);
        assert_eq!(buf.get(-1).unwrap(), 6.0);
        assert_eq!(buf.get(-4).unwrap(), 3.0);
        assert_eq!(buf.get(4).unwrap_err().kind(), ErrorKind::Index);
        assert_eq!(buf.get(-5).unwrap_err().kind(), ErrorKind::Index);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(RingBuffer::new(0).unwrap_err().kind(), ErrorKind::Argument);
    }
}
