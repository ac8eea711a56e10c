// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! The board: which tile sits in which cell.

use crate::{GridSize, Position};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The identity of a tile. A tile is named after the cell it was cut from, so the identity and the
/// correct position are one and the same.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct TileId(Position);

impl TileId {
    /// The identity of the tile cut from the provided cell.
    pub const fn new(row: usize, column: usize) -> Self {
        Self(Position::new(row, column))
    }

    /// The cell this tile belongs in.
    pub fn correct(&self) -> Position {
        self.0
    }
}

impl From<Position> for TileId {
    fn from(position: Position) -> Self {
        Self(position)
    }
}

impl Display for TileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.0.row(), self.0.column())
    }
}

/// One slice of the photo.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Tile {
    id: TileId,
    position: Position,
}

impl Tile {
    /// The identity of the tile.
    pub fn id(&self) -> TileId {
        self.id
    }

    /// The cell the tile belongs in.
    pub fn correct(&self) -> Position {
        self.id.correct()
    }

    /// The cell the tile currently occupies.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether the tile currently occupies the cell it belongs in.
    pub fn is_home(&self) -> bool {
        self.position == self.id.correct()
    }
}

/// An error associated with the creation of a grid.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum DimensionError {
    /// The grid would have no cells.
    #[error("dimensions could not be used: the grid has zero area")]
    Zero,
    /// The number of cells does not fit in memory.
    #[error("dimensions could not be used: a side of {0} is too large")]
    TooLarge(usize),
}

/// An error which denotes that a grid no longer places every tile in exactly one cell.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum InvalidGridError {
    /// The grid holds the wrong number of tiles for its side length.
    #[error("expected {expected} tiles but found {found}")]
    TileCount {
        /// Tiles required by the side length.
        expected: usize,
        /// Tiles actually present.
        found: usize,
    },
    /// A tile is stored out of order, or its identity names a cell outside the grid.
    #[error("tile {tile} is not a tile of this grid (slot {slot})")]
    UnknownTile {
        /// The offending tile.
        tile: TileId,
        /// The storage slot it was found in.
        slot: usize,
    },
    /// A tile sits outside the grid.
    #[error("tile {tile} was located at an invalid position {position}")]
    OutOfBounds {
        /// The offending tile.
        tile: TileId,
        /// Where it claims to be.
        position: Position,
    },
    /// The side length itself is unusable.
    #[error(transparent)]
    Dimensions(#[from] DimensionError),
    /// Two tiles claim the same cell.
    #[error("tile {first} and tile {second} overlapped at position {position}")]
    Overlap {
        /// The tile that claimed the cell first.
        first: TileId,
        /// The tile that claimed it second.
        second: TileId,
        /// The contested cell.
        position: Position,
    },
}

fn check_side(side: usize) -> Result<usize, DimensionError> {
    match side.checked_mul(side) {
        Some(0) => Err(DimensionError::Zero),
        Some(count) => Ok(count),
        None => Err(DimensionError::TooLarge(side)),
    }
}

#[derive(Deserialize)]
struct GridRepr {
    side: usize,
    tiles: Vec<Tile>,
}

impl TryFrom<GridRepr> for Grid {
    type Error = InvalidGridError;

    fn try_from(repr: GridRepr) -> Result<Self, Self::Error> {
        let grid = Self {
            side: repr.side,
            tiles: repr.tiles,
        };
        grid.validate()?;
        Ok(grid)
    }
}

/// The full N×N collection of tiles of one puzzle.
///
/// Tiles are stored in the row-major order of their correct cells, so looking a tile up by its
/// identity is a direct index. Looking a tile up by the cell it occupies is a scan, which is cheap
/// for boards of this size.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(try_from = "GridRepr")]
pub struct Grid {
    side: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Build a solved grid with the provided side length: every tile starts in its own cell.
    pub fn new(side: usize) -> Result<Self, DimensionError> {
        check_side(side)?;
        Ok(Self::build(side))
    }

    /// Build a solved grid of a selectable size.
    pub fn solved(size: GridSize) -> Self {
        Self::build(size.side())
    }

    fn build(side: usize) -> Self {
        let tiles = (0..side * side)
            .filter_map(|index| Position::from_index(index, side))
            .map(|position| Tile {
                id: TileId(position),
                position,
            })
            .collect();
        Self { side, tiles }
    }

    /// The number of tiles along one edge.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Every tile, in the row-major order of their correct cells.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// The tile with the provided identity.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        id.correct()
            .as_index(self.side)
            .and_then(|slot| self.tiles.get(slot))
            .filter(|tile| tile.id == id)
    }

    /// The tile currently occupying the provided cell.
    pub fn tile_at<P: Into<Position>>(&self, position: P) -> Option<&Tile> {
        let position = position.into();
        self.tiles.iter().find(|tile| tile.position == position)
    }

    /// The current cell of every tile, in the same order as [`Grid::tiles`].
    pub fn arrangement(&self) -> Vec<Position> {
        self.tiles.iter().map(Tile::position).collect()
    }

    /// Whether every tile occupies the cell it belongs in.
    pub fn is_complete(&self) -> bool {
        self.tiles.iter().all(Tile::is_home)
    }

    /// The number of tiles occupying the cell they belong in.
    pub fn tiles_home(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_home()).count()
    }

    /// Which tile occupies each cell, row-major, or an error if the grid does not place every tile
    /// in exactly one cell.
    pub fn occupancy(&self) -> Result<Vec<TileId>, InvalidGridError> {
        let expected = check_side(self.side)?;
        if self.tiles.len() != expected {
            return Err(InvalidGridError::TileCount {
                expected,
                found: self.tiles.len(),
            });
        }
        let mut cells: Vec<Option<TileId>> = vec![None; expected];
        for (slot, tile) in self.tiles.iter().enumerate() {
            if tile.id.correct().as_index(self.side) != Some(slot) {
                return Err(InvalidGridError::UnknownTile {
                    tile: tile.id,
                    slot,
                });
            }
            let entry = tile
                .position
                .as_index(self.side)
                .and_then(|index| cells.get_mut(index))
                .ok_or(InvalidGridError::OutOfBounds {
                    tile: tile.id,
                    position: tile.position,
                })?;
            if let Some(first) = entry {
                return Err(InvalidGridError::Overlap {
                    first: *first,
                    second: tile.id,
                    position: tile.position,
                });
            }
            *entry = Some(tile.id);
        }
        // every slot is filled: `expected` tiles claimed `expected` distinct in-bounds cells
        Ok(cells.into_iter().flatten().collect())
    }

    /// Check that the current positions are a permutation of the cells of the grid.
    pub fn validate(&self) -> Result<(), InvalidGridError> {
        self.occupancy().map(|_| ())
    }

    /// The boolean form of [`Grid::validate`].
    pub fn positions_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Exchange the cells of two tiles. Returns `false` and leaves the grid untouched if either
    /// tile is not part of this grid.
    pub fn swap(&mut self, a: TileId, b: TileId) -> bool {
        let (Some(first), Some(second)) = (self.slot_of(a), self.slot_of(b)) else {
            return false;
        };
        let position = self.tiles[first].position;
        self.tiles[first].position = self.tiles[second].position;
        self.tiles[second].position = position;
        true
    }

    /// A copy of this grid with the cells of two tiles exchanged. Unknown tiles produce an
    /// unchanged copy.
    pub fn swapped(&self, a: TileId, b: TileId) -> Self {
        let mut next = self.clone();
        next.swap(a, b);
        next
    }

    /// A copy of this grid with tile `i` moved to `positions[i]`. The caller guarantees that
    /// `positions` is a permutation of the cells.
    pub(crate) fn rearranged(&self, positions: &[Position]) -> Self {
        Self {
            side: self.side,
            tiles: self
                .tiles
                .iter()
                .zip(positions)
                .map(|(tile, &position)| Tile {
                    id: tile.id,
                    position,
                })
                .collect(),
        }
    }

    fn slot_of(&self, id: TileId) -> Option<usize> {
        let slot = id.correct().as_index(self.side)?;
        (self.tiles.get(slot)?.id == id).then_some(slot)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let cells = match self.occupancy() {
            Ok(cells) => cells,
            Err(e) => return write!(f, "<{e}>"),
        };
        for row in cells.chunks(self.side) {
            for (column, id) in row.iter().enumerate() {
                if column > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{id}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
