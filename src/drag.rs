// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! Pixel geometry of the board, and the gesture that moves a tile.
//!
//! A drag never touches the grid. While the pointer moves, [`DragHandler`] only accumulates an
//! offset that the host may use to draw the tile under the finger. On release the offset is
//! turned into a cell, and the handler answers with the swap that should be committed, if any.
//! Committing it is up to the owner of the grid (see [`crate::Session`]).

use crate::grid::{Grid, Tile, TileId};
use crate::Position;
use num_traits::{Float, NumCast};
use serde::{Deserialize, Serialize};

/// Fraction of the viewport width the board may take up.
pub const VIEWPORT_FRACTION: f64 = 0.9;
/// Largest edge, in pixels, the board is ever laid out with.
pub const MAX_BOARD_SIZE: f64 = 400.0;

fn cast<P: Float>(n: usize) -> P {
    <P as NumCast>::from(n).unwrap_or_else(P::max_value)
}

/// Where each cell of the board lies on screen, in the host's pixel unit `P`.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BoardGeometry<P> {
    tile_size: P,
    side: usize,
}

impl<P> BoardGeometry<P>
where
    P: Float,
{
    /// Lay out a board with edges of `board_size` pixels and `side` tiles per edge. `None` if the
    /// board would have no tiles or no positive, finite size.
    pub fn new(board_size: P, side: usize) -> Option<Self> {
        if side == 0 || !board_size.is_finite() || board_size <= P::zero() {
            return None;
        }
        Some(Self {
            tile_size: board_size / cast::<P>(side),
            side,
        })
    }

    /// Lay out a board within a viewport `viewport_width` pixels wide: the board takes up
    /// [`VIEWPORT_FRACTION`] of the width, but never more than [`MAX_BOARD_SIZE`] pixels.
    pub fn fit(viewport_width: P, side: usize) -> Option<Self> {
        let fraction = <P as NumCast>::from(VIEWPORT_FRACTION)?;
        let cap = <P as NumCast>::from(MAX_BOARD_SIZE)?;
        Self::new((viewport_width * fraction).min(cap), side)
    }

    /// The edge of one tile.
    pub fn tile_size(&self) -> P {
        self.tile_size
    }

    /// The edge of the whole board.
    pub fn board_size(&self) -> P {
        self.tile_size * cast::<P>(self.side)
    }

    /// The number of tiles per edge.
    pub fn side(&self) -> usize {
        self.side
    }

    /// The top-left corner `(x, y)` of a cell.
    pub fn tile_origin(&self, position: Position) -> (P, P) {
        (
            cast::<P>(position.column()) * self.tile_size,
            cast::<P>(position.row()) * self.tile_size,
        )
    }

    /// The translation `(x, y)` to apply to the full photo, drawn at board size, so that the part
    /// visible through a tile is the slice that tile was cut from.
    pub fn image_offset(&self, tile: &Tile) -> (P, P) {
        let (x, y) = self.tile_origin(tile.correct());
        (-x, -y)
    }

    /// The cell containing the point `(x, y)`. Points beyond an edge of the board are clamped to
    /// the nearest cell on each axis independently. `None` for non-finite coordinates.
    pub fn cell_at(&self, x: P, y: P) -> Option<Position> {
        let column = self.axis_cell(x)?;
        let row = self.axis_cell(y)?;
        Some(Position::new(row, column))
    }

    fn axis_cell(&self, coordinate: P) -> Option<usize> {
        if !coordinate.is_finite() {
            return None;
        }
        let last: P = cast(self.side.saturating_sub(1));
        (coordinate / self.tile_size)
            .floor()
            .max(P::zero())
            .min(last)
            .to_usize()
    }
}

/// The phase of the gesture currently handled.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum DragState<P> {
    /// No tile is being dragged.
    #[default]
    Idle,
    /// A tile is following the pointer.
    Dragging {
        /// The tile picked up.
        tile: TileId,
        /// How far the pointer has travelled since the tile was picked up.
        offset: (P, P),
    },
}

/// What a finished drag asks of the grid.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ReleaseOutcome {
    /// There was no drag to finish.
    Idle,
    /// The tile was dropped back over its own cell.
    Stayed(TileId),
    /// The tile was dropped over another tile, and the two should trade cells.
    Swap {
        /// The dragged tile.
        tile: TileId,
        /// The tile occupying the drop cell.
        with: TileId,
    },
    /// The drop could not be resolved against the grid and is discarded.
    Ignored(TileId),
}

/// Tracks a single drag gesture at a time, from pick-up to release.
#[derive(Clone, Debug, Default)]
pub struct DragHandler<P> {
    state: DragState<P>,
}

impl<P> DragHandler<P>
where
    P: Float + core::fmt::Debug,
{
    /// A handler with no gesture in progress.
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    /// The current phase.
    pub fn state(&self) -> &DragState<P> {
        &self.state
    }

    /// The tile being dragged, if any. Hosts draw it above the others.
    pub fn dragging(&self) -> Option<TileId> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { tile, .. } => Some(tile),
        }
    }

    /// How far the dragged tile is drawn from its cell; zero while idle.
    pub fn offset(&self) -> (P, P) {
        match self.state {
            DragState::Idle => (P::zero(), P::zero()),
            DragState::Dragging { offset, .. } => offset,
        }
    }

    /// Pick up `tile`. Refused if another tile is already being dragged or the tile is not part of
    /// `grid`.
    pub fn begin(&mut self, grid: &Grid, tile: TileId) -> bool {
        if let DragState::Dragging { tile: held, .. } = self.state {
            log::debug!("ignoring pick-up of {tile} while {held} is held");
            return false;
        }
        if grid.tile(tile).is_none() {
            log::warn!("cannot pick up tile {tile}: it is not part of the grid");
            return false;
        }
        log::debug!("picked up tile {tile}");
        self.state = DragState::Dragging {
            tile,
            offset: (P::zero(), P::zero()),
        };
        true
    }

    /// Move the held tile by `(dx, dy)`. Ignored while idle.
    pub fn drag_by(&mut self, dx: P, dy: P) {
        if let DragState::Dragging { offset, .. } = &mut self.state {
            offset.0 = offset.0 + dx;
            offset.1 = offset.1 + dy;
            log::trace!("drag offset is now {offset:?}");
        }
    }

    /// Abandon the gesture without resolving it.
    pub fn cancel(&mut self) {
        if let Some(tile) = self.dragging() {
            log::debug!("drag of tile {tile} cancelled");
        }
        self.state = DragState::Idle;
    }

    /// Drop the held tile and work out which swap, if any, it asks for. The handler is idle
    /// afterwards whatever the outcome.
    ///
    /// The drop cell is the cell containing the center of the tile as drawn at release time; the
    /// tile to swap with is whichever tile occupies that cell.
    pub fn release(&mut self, grid: &Grid, geometry: &BoardGeometry<P>) -> ReleaseOutcome {
        let DragState::Dragging { tile, offset } =
            core::mem::replace(&mut self.state, DragState::Idle)
        else {
            return ReleaseOutcome::Idle;
        };
        let Some(current) = grid.tile(tile).map(Tile::position) else {
            log::warn!("released tile {tile} is no longer part of the grid");
            return ReleaseOutcome::Ignored(tile);
        };

        let (x, y) = geometry.tile_origin(current);
        let half = geometry.tile_size() / cast::<P>(2);
        let Some(target) = geometry.cell_at(x + offset.0 + half, y + offset.1 + half) else {
            log::warn!("tile {tile} released at a non-finite offset {offset:?}");
            return ReleaseOutcome::Ignored(tile);
        };
        if target == current {
            log::debug!("tile {tile} dropped back on {current}");
            return ReleaseOutcome::Stayed(tile);
        }
        match grid.tile_at(target) {
            Some(other) => {
                log::debug!("tile {tile} dropped on {target}, over tile {}", other.id());
                ReleaseOutcome::Swap {
                    tile,
                    with: other.id(),
                }
            }
            None => {
                log::warn!("tile {tile} dropped on {target}, which no tile occupies");
                ReleaseOutcome::Ignored(tile)
            }
        }
    }
}
