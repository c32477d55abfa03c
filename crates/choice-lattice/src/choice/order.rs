//! Display order of choices and items.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::{Result, WidgetError};

/// A permutation of `0..n` mapping display position to original index.
///
/// `order[pos]` is the original index of the element shown at `pos`. The
/// permutation is fixed when the widget is built and only changes on an
/// explicit reshuffle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Order(Vec<usize>);

impl Order {
    /// The identity permutation `[0, 1, ..., n - 1]`.
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// A uniformly shuffled permutation of `0..n`.
    pub fn shuffled<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut order = Self::identity(n);
        order.0.shuffle(rng);
        order
    }

    /// Identity or shuffled, depending on `shuffle`.
    pub fn new<R: Rng + ?Sized>(n: usize, shuffle: bool, rng: &mut R) -> Self {
        if shuffle {
            Self::shuffled(n, rng)
        } else {
            Self::identity(n)
        }
    }

    /// Build an order from an explicit permutation.
    ///
    /// Fails unless every index in `0..len` appears exactly once.
    pub fn from_permutation(indices: Vec<usize>) -> Result<Self> {
        let mut seen = vec![false; indices.len()];
        for &i in &indices {
            match seen.get_mut(i) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(WidgetError::invalid_option(
                        "order",
                        format!("{indices:?} is not a permutation"),
                    ))
                }
            }
        }
        Ok(Self(indices))
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the order is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Original index displayed at `position`.
    pub fn get(&self, position: usize) -> Option<usize> {
        self.0.get(position).copied()
    }

    /// Display position of the element with original index `index`.
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.0.iter().position(|&i| i == index)
    }

    /// The inverse permutation: `inverse[index]` is the display position.
    pub fn inverse(&self) -> Vec<usize> {
        let mut inverse = vec![0; self.0.len()];
        for (position, &index) in self.0.iter().enumerate() {
            inverse[index] = position;
        }
        inverse
    }

    /// Whether this is the identity permutation.
    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(pos, &i)| pos == i)
    }

    /// Original indices in display order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// The underlying permutation.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl std::ops::Index<usize> for Order {
    type Output = usize;

    fn index(&self, position: usize) -> &usize {
        &self.0[position]
    }
}
