// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! One play-through of a puzzle: the grid, the move and time counters, and the completion flag.
//!
//! Every change to a [`Session`] goes through `&mut self`, so a host that reads the session always
//! sees the last committed arrangement. Swaps are committed in exactly one place, and the score
//! is never stored: it is derived from the two counters whenever it is asked for.

use crate::drag::{BoardGeometry, DragHandler, ReleaseOutcome};
use crate::grid::{Grid, InvalidGridError, TileId};
use crate::score::ScoreConfig;
use crate::shuffle::{shuffle_passes, DEFAULT_PASSES};
use crate::{GridSize, PhotoRef};
use core::fmt::{Display, Formatter};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Names one session among all the sessions a [`crate::Game`] has started. Hosts tag their timer
/// with it so that a timer left over from an earlier session can be told apart.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct SessionId(u64);

impl SessionId {
    /// Wrap a raw generation number.
    pub const fn new(generation: u64) -> Self {
        Self(generation)
    }

    /// The raw generation number.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything needed to start a session besides the photo.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Tiles per edge.
    pub grid_size: GridSize,
    /// The scoring constants.
    pub scoring: ScoreConfig,
    /// Fisher–Yates passes used to scramble a new grid.
    pub shuffle_passes: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::default(),
            scoring: ScoreConfig::default(),
            shuffle_passes: DEFAULT_PASSES,
        }
    }
}

/// The final tally of a solved puzzle.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct CompletionReport {
    /// Swaps committed.
    pub moves: u32,
    /// Seconds the session ran.
    pub elapsed_seconds: u32,
    /// Points awarded.
    pub score: u32,
}

impl Display for CompletionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Moves: {}\nTime: {}s\nScore: {}",
            self.moves, self.elapsed_seconds, self.score
        )
    }
}

/// A snapshot of the counters, for a status line.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Status {
    /// Swaps committed so far.
    pub moves: u32,
    /// Seconds elapsed so far.
    pub elapsed_seconds: u32,
    /// The current score.
    pub score: u32,
    /// Whether the puzzle is solved.
    pub completed: bool,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Moves: {} | Time: {}s | Score: {}",
            self.moves, self.elapsed_seconds, self.score
        )
    }
}

/// Receives the side effects of committed swaps.
pub trait SessionListener {
    /// Two tiles traded cells; play the snap cue.
    fn snapped(&mut self, _tile: TileId, _with: TileId) {}

    /// The puzzle was solved. Called exactly once per session.
    fn completed(&mut self, _report: &CompletionReport) {}
}

impl SessionListener for () {}

/// The result of asking a session to exchange two tiles.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SwapOutcome {
    /// Nothing was asked of the grid (no drag, or a drop back onto the same cell).
    Unmoved,
    /// The tiles traded cells; the puzzle is not solved yet.
    Swapped {
        /// The tile that was moved.
        tile: TileId,
        /// The tile it traded cells with.
        with: TileId,
    },
    /// The tiles traded cells and that solved the puzzle.
    Completed {
        /// The tile that was moved.
        tile: TileId,
        /// The tile it traded cells with.
        with: TileId,
        /// The final tally.
        report: CompletionReport,
    },
    /// The puzzle is already solved; the grid no longer changes.
    Rejected,
    /// The request named tiles that could not be exchanged, and was dropped.
    Ignored,
}

/// One play-through of a puzzle.
#[derive(Clone, Debug)]
pub struct Session {
    id: SessionId,
    photo: PhotoRef,
    config: SessionConfig,
    grid: Grid,
    drag: DragHandler<f32>,
    moves: u32,
    elapsed_seconds: u32,
    completion: Option<CompletionReport>,
}

impl Session {
    /// Start a session on a freshly scrambled grid.
    pub fn new<R: Rng + ?Sized>(
        id: SessionId,
        photo: PhotoRef,
        config: SessionConfig,
        rng: &mut R,
    ) -> Self {
        let grid = shuffle_passes(
            &Grid::solved(config.grid_size),
            rng,
            config.shuffle_passes,
        );
        log::debug!(
            "session {id} started on a {} grid:\n{grid}",
            config.grid_size
        );
        Self::fresh(id, photo, config, grid)
    }

    /// Start a session on a prepared grid, which must match the configured grid size and place
    /// every tile in exactly one cell. A grid that is already solved yields a session that is
    /// complete from the start, with no moves and no time on its report.
    pub fn with_grid(
        id: SessionId,
        photo: PhotoRef,
        config: SessionConfig,
        grid: Grid,
    ) -> Result<Self, InvalidGridError> {
        if grid.side() != config.grid_size.side() {
            return Err(InvalidGridError::TileCount {
                expected: config.grid_size.tiles(),
                found: grid.tiles().len(),
            });
        }
        grid.validate()?;
        Ok(Self::fresh(id, photo, config, grid))
    }

    fn fresh(id: SessionId, photo: PhotoRef, config: SessionConfig, grid: Grid) -> Self {
        let completion = grid.is_complete().then(|| {
            log::warn!("session {id} starts on a solved grid");
            CompletionReport {
                moves: 0,
                elapsed_seconds: 0,
                score: config.scoring.score(0, 0),
            }
        });
        Self {
            id,
            photo,
            config,
            grid,
            drag: DragHandler::new(),
            moves: 0,
            elapsed_seconds: 0,
            completion,
        }
    }

    /// The identity of this session.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The photo being reassembled.
    pub fn photo(&self) -> &PhotoRef {
        &self.photo
    }

    /// The configuration this session was started with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The grid as last committed.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The gesture in progress, for drawing the dragged tile.
    pub fn drag(&self) -> &DragHandler<f32> {
        &self.drag
    }

    /// Swaps committed so far.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Seconds elapsed so far.
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// The score for the current counters.
    pub fn score(&self) -> u32 {
        self.config.scoring.score(self.moves, self.elapsed_seconds)
    }

    /// Whether the puzzle has been solved. Once set, this never clears.
    pub fn is_complete(&self) -> bool {
        self.completion.is_some()
    }

    /// Whether the host's one-second timer should keep firing.
    pub fn is_ticking(&self) -> bool {
        !self.is_complete()
    }

    /// The final tally, once solved.
    pub fn report(&self) -> Option<&CompletionReport> {
        self.completion.as_ref()
    }

    /// A snapshot of the counters.
    pub fn status(&self) -> Status {
        Status {
            moves: self.moves,
            elapsed_seconds: self.elapsed_seconds,
            score: self.score(),
            completed: self.is_complete(),
        }
    }

    /// The layout of this session's board within a viewport of the provided width.
    pub fn layout(&self, viewport_width: f32) -> Option<BoardGeometry<f32>> {
        BoardGeometry::fit(viewport_width, self.grid.side())
    }

    /// Count one elapsed second. Returns `false`, and counts nothing, once the puzzle is solved.
    pub fn tick(&mut self) -> bool {
        if self.is_complete() {
            log::debug!("session {} is complete; ignoring tick", self.id);
            return false;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        log::trace!("session {}: {}", self.id, self.status());
        true
    }

    /// Pick up a tile. Refused once the puzzle is solved, while another tile is held, or if the
    /// tile is not part of the grid.
    pub fn begin_drag(&mut self, tile: TileId) -> bool {
        if self.is_complete() {
            log::debug!("session {} is complete; tile {tile} stays put", self.id);
            return false;
        }
        self.drag.begin(&self.grid, tile)
    }

    /// Move the held tile by `(dx, dy)` pixels.
    pub fn drag_by(&mut self, dx: f32, dy: f32) {
        self.drag.drag_by(dx, dy);
    }

    /// Drop the held tile back where it came from.
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Drop the held tile on the board laid out by `geometry`, and commit the swap it asks for.
    pub fn release_drag(&mut self, geometry: &BoardGeometry<f32>) -> SwapOutcome {
        if geometry.side() != self.grid.side() {
            log::warn!(
                "layout for {} tiles per edge does not match the {}-tile grid; dropping the drag",
                geometry.side(),
                self.grid.side()
            );
            self.drag.cancel();
            return SwapOutcome::Ignored;
        }
        match self.drag.release(&self.grid, geometry) {
            ReleaseOutcome::Idle | ReleaseOutcome::Stayed(_) => SwapOutcome::Unmoved,
            ReleaseOutcome::Swap { tile, with } => self.commit(tile, with),
            ReleaseOutcome::Ignored(_) => SwapOutcome::Ignored,
        }
    }

    /// Exchange the cells of two tiles directly, bypassing the drag gesture.
    pub fn swap_tiles(&mut self, tile: TileId, with: TileId) -> SwapOutcome {
        self.commit(tile, with)
    }

    fn commit(&mut self, tile: TileId, with: TileId) -> SwapOutcome {
        if self.is_complete() {
            log::debug!("session {} is complete; rejecting swap of {tile} and {with}", self.id);
            return SwapOutcome::Rejected;
        }
        if tile == with {
            return SwapOutcome::Unmoved;
        }
        if !self.grid.swap(tile, with) {
            log::warn!(
                "session {}: cannot swap {tile} and {with}, not both are part of the grid",
                self.id
            );
            return SwapOutcome::Ignored;
        }
        self.moves = self.moves.saturating_add(1);
        log::debug!("session {}: swapped {tile} and {with}; {}", self.id, self.status());

        if !self.grid.is_complete() {
            return SwapOutcome::Swapped { tile, with };
        }
        let report = CompletionReport {
            moves: self.moves,
            elapsed_seconds: self.elapsed_seconds,
            score: self.score(),
        };
        self.completion = Some(report);
        log::info!("session {} solved: {}", self.id, self.status());
        SwapOutcome::Completed { tile, with, report }
    }
}
