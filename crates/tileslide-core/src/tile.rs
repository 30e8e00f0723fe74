//! Numbered puzzle tile.

use std::{
    fmt::{self, Display},
    num::NonZeroUsize,
};

/// A numbered tile on the puzzle grid.
///
/// Valid tile numbers start at 1; the blank cell is not a tile and is
/// represented as `Option::<Tile>::None` wherever cells are stored. Keeping
/// zero unrepresentable means a cell can never silently hold a "blank
/// number".
///
/// # Examples
///
/// ```
/// use tileslide_core::Tile;
///
/// let tile = Tile::new(5).expect("non-zero tile number");
/// assert_eq!(tile.value(), 5);
///
/// // Zero is not a tile.
/// assert_eq!(Tile::new(0), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile(NonZeroUsize);

impl Tile {
    /// Creates a tile from its number, or `None` for zero.
    ///
    /// The upper bound (`width * height - 1`) depends on the grid the tile
    /// is placed on and is enforced by grid reconstruction, not here.
    #[must_use]
    pub fn new(value: usize) -> Option<Self> {
        NonZeroUsize::new(value).map(Self)
    }

    /// Returns the tile number.
    #[must_use]
    pub const fn value(self) -> usize {
        self.0.get()
    }
}

impl Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<Tile> for usize {
    fn from(tile: Tile) -> usize {
        tile.value()
    }
}
