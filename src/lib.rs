// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! photo-puzzle: the rules engine of a photo tile-swap puzzle.
//!
//! A photo is cut into an N×N [`Grid`] of [`Tile`]s, which are then shuffled. The player drags a
//! tile and drops it over another cell; the two tiles exchange places. Every exchange costs a
//! move, every second costs time, and the [`ScoreConfig`] turns both into a score. Once every
//! tile is back at the cell it was cut from, the session is complete and no further input is
//! accepted.
//!
//! This library owns the state and the rules only. Rendering, the photo pickers, the one-second
//! timer and the audio cue belong to the host, which feeds events in through [`Game`] (or a bare
//! [`Session`]) and reads the resulting state back out.

#![no_std]

extern crate alloc;

use alloc::string::String;
use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod drag;
pub mod game;
pub mod grid;
pub mod score;
pub mod session;
pub mod shuffle;

pub use drag::{BoardGeometry, DragHandler, DragState, ReleaseOutcome};
pub use game::{Game, GameError, PhotoError, Screen};
pub use grid::{DimensionError, Grid, InvalidGridError, Tile, TileId};
pub use score::ScoreConfig;
pub use session::{
    CompletionReport, Session, SessionConfig, SessionId, SessionListener, Status, SwapOutcome,
};

/// A cell of the board (eff., a coordinate pair), counted from the top-left corner.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Position {
    row: usize,
    column: usize,
}

impl Position {
    /// Create a position from its row and column.
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// The row of the position.
    pub fn row(&self) -> usize {
        self.row
    }

    /// The column of the position.
    pub fn column(&self) -> usize {
        self.column
    }

    /// The position encoded as a row-major index into a board with the provided side length, or
    /// `None` if the position lies outside of it.
    pub fn as_index(&self, side: usize) -> Option<usize> {
        if self.row >= side || self.column >= side {
            return None;
        }
        Some(self.row * side + self.column)
    }

    /// The inverse of [`Position::as_index`].
    pub fn from_index(index: usize, side: usize) -> Option<Self> {
        if side == 0 || index >= side.checked_mul(side)? {
            return None;
        }
        Some(Self {
            row: index / side,
            column: index % side,
        })
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, column): (usize, usize)) -> Self {
        Self { row, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// An opaque reference to the photo being played (a URI, a file path, an asset key...). The
/// library never looks inside it.
#[derive(Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    /// Wrap a host-provided reference.
    pub fn new<S: Into<String>>(reference: S) -> Self {
        Self(reference.into())
    }

    /// The reference as handed over by the host.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PhotoRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The side lengths a player may pick for a puzzle.
#[derive(Copy, Clone, Debug, Default, Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GridSize {
    /// A 3×3 board ("easy").
    #[default]
    Three,
    /// A 4×4 board ("medium").
    Four,
    /// A 5×5 board ("hard").
    Five,
}

impl GridSize {
    /// Every selectable size, smallest first.
    pub const ALL: [GridSize; 3] = [GridSize::Three, GridSize::Four, GridSize::Five];

    /// The number of tiles along one edge of the board.
    pub const fn side(self) -> usize {
        match self {
            GridSize::Three => 3,
            GridSize::Four => 4,
            GridSize::Five => 5,
        }
    }

    /// The number of tiles on the board.
    pub const fn tiles(self) -> usize {
        self.side() * self.side()
    }
}

impl Display for GridSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let side = self.side();
        write!(f, "{side} × {side}")
    }
}

/// A requested side length outside of the selectable [`GridSize`]s.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[error("a {0}×{0} grid cannot be selected; pick 3, 4 or 5")]
pub struct GridSizeError(pub usize);

impl TryFrom<usize> for GridSize {
    type Error = GridSizeError;

    fn try_from(side: usize) -> Result<Self, Self::Error> {
        match side {
            3 => Ok(GridSize::Three),
            4 => Ok(GridSize::Four),
            5 => Ok(GridSize::Five),
            other => Err(GridSizeError(other)),
        }
    }
}

impl TryFrom<u8> for GridSize {
    type Error = GridSizeError;

    fn try_from(side: u8) -> Result<Self, Self::Error> {
        GridSize::try_from(usize::from(side))
    }
}

impl From<GridSize> for u8 {
    fn from(size: GridSize) -> Self {
        match size {
            GridSize::Three => 3,
            GridSize::Four => 4,
            GridSize::Five => 5,
        }
    }
}
