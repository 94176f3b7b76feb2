//! Collaborator contracts consumed by the [`Optimizer`](super::Optimizer).
//!
//! The optimizer knows nothing about encodings, operators or fitness. It
//! drives any type implementing [`Population`], and it relies on
//! [`DeepClone`] to detach the best candidate from population storage.

use std::sync::Arc;

use super::solution::BestView;

/// Explicit, total deep copy.
///
/// The copy must share no mutable storage with the source: mutating either
/// value afterwards must be invisible through the other. Plain owned
/// buffers (`Vec<T>` of `Copy` elements and the like) satisfy this with
/// their `Clone` impl. Types holding `Rc<RefCell<_>>`, `Arc<Mutex<_>>` or
/// raw pointers into shared storage must copy the pointee instead of
/// bumping a reference count.
///
/// This trait is intentionally not blanket-implemented for every `Clone`
/// type, because a `Clone` of a shared handle is exactly the aliasing this
/// boundary exists to prevent.
pub trait DeepClone: Sized {
    /// Returns an independent copy of `self`.
    fn deep_clone(&self) -> Self;
}

impl<T: Copy> DeepClone for Vec<T> {
    fn deep_clone(&self) -> Self {
        self.clone()
    }
}

impl<T: Copy> DeepClone for Box<[T]> {
    fn deep_clone(&self) -> Self {
        self.clone()
    }
}

impl<T: DeepClone> DeepClone for Option<T> {
    fn deep_clone(&self) -> Self {
        self.as_ref().map(DeepClone::deep_clone)
    }
}

macro_rules! deep_clone_by_copy {
    ($($t:ty),*) => {
        $(
            impl DeepClone for $t {
                fn deep_clone(&self) -> Self {
                    *self
                }
            }
        )*
    };
}

deep_clone_by_copy!(bool, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

/// A population of candidate solutions evolved in place.
///
/// Implementors own every candidate slot and are free to overwrite, reorder
/// or discard slots in any step. The optimizer calls the steps in this
/// order, on one thread:
///
/// ```text
/// new → initialize → { evaluate → selection → mutate → best } × iterations
/// ```
///
/// Every step may fail; the error is handed back to the caller of
/// [`Optimizer::solve`](super::Optimizer::solve) unchanged.
///
/// # Aliasing
///
/// [`best`](Population::best) returns a [`BestView`] borrowing the live
/// slot. The borrow ends before the next step can run, since every step
/// takes `&mut self`; anything that must outlive it is copied with
/// [`BestView::to_solution`].
pub trait Population: Sized {
    /// The read-only problem definition shared with every result.
    type Instance: ?Sized;

    /// First candidate component.
    type X: DeepClone;

    /// Second candidate component.
    type Y: DeepClone;

    /// Population-specific tuning (operator rates, seed, ...).
    type Config: Default;

    /// Failure raised by any step. Invalid arguments (such as a zero
    /// population size) must be reported here instead of being clamped.
    type Error;

    /// Creates an empty population of `size` slots over `instance`.
    fn new(
        instance: Arc<Self::Instance>,
        size: usize,
        config: &Self::Config,
    ) -> Result<Self, Self::Error>;

    /// Fills the slots with initial candidates.
    ///
    /// After this call [`best`](Population::best) must be meaningful.
    fn initialize(&mut self) -> Result<(), Self::Error>;

    /// Recomputes the fitness of every candidate.
    ///
    /// Must be idempotent and must not touch candidate storage.
    fn evaluate(&mut self) -> Result<(), Self::Error>;

    /// Replaces or reweights slots according to fitness.
    fn selection(&mut self) -> Result<(), Self::Error>;

    /// Perturbs candidates in place.
    fn mutate(&mut self) -> Result<(), Self::Error>;

    /// The current best candidate, as a view into live storage.
    ///
    /// Tie-breaking among equally fit slots is up to the implementor.
    ///
    /// Only valid after a successful [`initialize`](Population::initialize);
    /// implementations may panic when called earlier. The optimizer never
    /// does.
    fn best(&self) -> BestView<'_, Self::Instance, Self::X, Self::Y>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_deep_clone_is_independent() {
        let original = vec![1.0, 2.0, 3.0];
        let mut copy = original.deep_clone();
        copy[0] = 99.0;
        assert_eq!(original, vec![1.0, 2.0, 3.0]);
        assert_ne!(original.as_ptr(), copy.as_ptr());
    }

    #[test]
    fn test_boxed_slice_deep_clone() {
        let original: Box<[u8]> = vec![0, 1, 1].into_boxed_slice();
        let mut copy = original.deep_clone();
        copy[2] = 0;
        assert_eq!(&*original, &[0, 1, 1]);
    }

    #[test]
    fn test_option_deep_clone() {
        let original = Some(vec![4_i32, 5]);
        let mut copy = original.deep_clone();
        if let Some(v) = copy.as_mut() {
            v.push(6);
        }
        assert_eq!(original, Some(vec![4, 5]));
        assert_eq!(None::<Vec<u8>>.deep_clone(), None);
    }

    #[test]
    fn test_scalar_deep_clone() {
        assert_eq!(7_u64.deep_clone(), 7);
        assert!(true.deep_clone());
    }
}
