//! Dense three-axis buffer used as a candidate component.

use std::ops::{Index, IndexMut};

use crate::evolve::DeepClone;

/// Dense `users × objects × servers` tensor stored row-major.
///
/// Element `(m, n, s)` lives at `(m * objects + n) * servers + s`, so the
/// `servers` entries of one user/object pair are contiguous.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tensor3<T> {
    dims: (usize, usize, usize),
    data: Vec<T>,
}

impl<T: Copy> Tensor3<T> {
    /// Creates a tensor filled with `value`.
    pub fn filled(users: usize, objects: usize, servers: usize, value: T) -> Self {
        Self {
            dims: (users, objects, servers),
            data: vec![value; users * objects * servers],
        }
    }

    /// Wraps `data`, returning `None` if its length does not match.
    pub fn from_vec(users: usize, objects: usize, servers: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == users * objects * servers).then_some(Self {
            dims: (users, objects, servers),
            data,
        })
    }

    /// `(users, objects, servers)`.
    pub fn dims(&self) -> (usize, usize, usize) {
        self.dims
    }

    /// Flat storage.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable flat storage.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// The `servers` entries for one user/object pair.
    pub fn row(&self, m: usize, n: usize) -> &[T] {
        let start = self.offset(m, n, 0);
        &self.data[start..start + self.dims.2]
    }

    /// Mutable variant of [`row`](Self::row).
    pub fn row_mut(&mut self, m: usize, n: usize) -> &mut [T] {
        let start = self.offset(m, n, 0);
        let servers = self.dims.2;
        &mut self.data[start..start + servers]
    }

    fn offset(&self, m: usize, n: usize, s: usize) -> usize {
        let (users, objects, servers) = self.dims;
        assert!(
            m < users && n < objects && s < servers.max(1),
            "index ({m}, {n}, {s}) out of bounds for {:?}",
            self.dims
        );
        (m * objects + n) * servers + s
    }
}

impl<T: Copy> Index<(usize, usize, usize)> for Tensor3<T> {
    type Output = T;

    fn index(&self, (m, n, s): (usize, usize, usize)) -> &T {
        &self.data[self.offset(m, n, s)]
    }
}

impl<T: Copy> IndexMut<(usize, usize, usize)> for Tensor3<T> {
    fn index_mut(&mut self, (m, n, s): (usize, usize, usize)) -> &mut T {
        let i = self.offset(m, n, s);
        &mut self.data[i]
    }
}

impl<T: Copy> DeepClone for Tensor3<T> {
    fn deep_clone(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_row_major() {
        let data: Vec<u32> = (0..12).collect();
        let t = Tensor3::from_vec(2, 3, 2, data).unwrap();

        assert_eq!(t[(0, 0, 0)], 0);
        assert_eq!(t[(0, 1, 1)], 3);
        assert_eq!(t[(1, 2, 1)], 11);
        assert_eq!(t.row(1, 0), &[6, 7]);
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Tensor3::from_vec(2, 2, 2, vec![0u8; 7]).is_none());
    }

    #[test]
    fn test_index_mut_and_rows() {
        let mut t = Tensor3::filled(2, 2, 3, 0.0);
        t[(1, 1, 2)] = 4.5;
        t.row_mut(0, 1).copy_from_slice(&[1.0, 2.0, 3.0]);

        assert_eq!(t.row(1, 1), &[0.0, 0.0, 4.5]);
        assert_eq!(t.row(0, 1), &[1.0, 2.0, 3.0]);
        assert_eq!(t.as_slice().len(), 12);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_bounds_panics() {
        let t = Tensor3::filled(1, 1, 1, 0u8);
        let _ = t[(0, 1, 0)];
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let original = Tensor3::filled(1, 2, 2, 1u8);
        let mut copy = original.deep_clone();
        copy.as_mut_slice()[0] = 0;

        assert_eq!(original.as_slice(), &[1, 1, 1, 1]);
        assert_ne!(original.as_slice().as_ptr(), copy.as_slice().as_ptr());
    }
}
