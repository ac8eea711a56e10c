// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! The flow between screens: title, photo selection, grid size, puzzle.
//!
//! [`Game`] is what a host wires its buttons, pickers, timer and gestures to. It keeps at most one
//! live [`Session`] and replaces it wholesale whenever the player reshuffles, retries, picks a
//! new grid size or a new photo.

use crate::drag::BoardGeometry;
use crate::grid::TileId;
use crate::session::{Session, SessionConfig, SessionId, SessionListener, SwapOutcome};
use crate::{GridSize, GridSizeError, PhotoRef};
use alloc::string::String;
use rand::Rng;
use thiserror::Error;

/// Why the host could not provide a photo.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum PhotoError {
    /// The player refused access to the camera or the library.
    #[error("access to photos was denied")]
    Denied,
    /// The device has no camera or photo library.
    #[error("no camera or photo library is available")]
    Unavailable,
    /// Any other failure, as described by the host.
    #[error("could not load the photo: {0}")]
    Other(String),
}

/// An action that could not be carried out.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum GameError {
    /// The requested grid size cannot be selected.
    #[error(transparent)]
    GridSize(#[from] GridSizeError),
    /// The action does not apply to the screen currently shown.
    #[error("cannot {action} on the {screen} screen")]
    WrongScreen {
        /// What was attempted.
        action: &'static str,
        /// Where the game was at the time.
        screen: &'static str,
    },
}

/// The screen currently shown, along with the state it owns.
#[derive(Clone, Debug)]
pub enum Screen {
    /// The title screen.
    Title,
    /// Waiting for the host's photo picker.
    PhotoPicker {
        /// Why the previous attempt failed, if it did.
        notice: Option<PhotoError>,
    },
    /// A photo was picked; waiting for a grid size.
    GridChoice {
        /// The photo picked.
        photo: PhotoRef,
    },
    /// A puzzle is being played.
    Puzzle(Session),
}

impl Screen {
    /// A short name for the screen, for messages.
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Title => "title",
            Screen::PhotoPicker { .. } => "photo picker",
            Screen::GridChoice { .. } => "grid choice",
            Screen::Puzzle(_) => "puzzle",
        }
    }
}

/// The whole game, from the title screen on.
#[derive(Debug)]
pub struct Game<R, L = ()> {
    screen: Screen,
    config: SessionConfig,
    rng: R,
    listener: L,
    generation: u64,
}

impl<R> Game<R>
where
    R: Rng,
{
    /// A game on the title screen, scrambling with `rng`, with default settings and nobody
    /// listening for swaps.
    pub fn new(rng: R) -> Self {
        Self {
            screen: Screen::Title,
            config: SessionConfig::default(),
            rng,
            listener: (),
            generation: 0,
        }
    }
}

impl<R, L> Game<R, L>
where
    R: Rng,
    L: SessionListener,
{
    /// Report swaps and completions to `listener`.
    pub fn with_listener<M: SessionListener>(self, listener: M) -> Game<R, M> {
        Game {
            screen: self.screen,
            config: self.config,
            rng: self.rng,
            listener,
            generation: self.generation,
        }
    }

    /// Use `config` for sessions started from now on. Its grid size is the one preselected; the
    /// player's choice replaces it.
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// The screen currently shown.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The live session, if a puzzle is being played.
    pub fn session(&self) -> Option<&Session> {
        match &self.screen {
            Screen::Puzzle(session) => Some(session),
            _ => None,
        }
    }

    /// The listener swaps are reported to.
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// The grid size of the live session, or the preselected one.
    pub fn grid_size(&self) -> GridSize {
        self.config.grid_size
    }

    /// Leave the title screen for the photo picker.
    pub fn play(&mut self) -> Result<(), GameError> {
        match self.screen {
            Screen::Title => {
                self.show(Screen::PhotoPicker { notice: None });
                Ok(())
            }
            _ => Err(self.wrong_screen("start playing")),
        }
    }

    /// Hand over the result of the host's photo picker. A failure keeps the picker up with the
    /// error as a notice for the player.
    pub fn photo_picked(&mut self, result: Result<PhotoRef, PhotoError>) -> Result<(), GameError> {
        if !matches!(self.screen, Screen::PhotoPicker { .. }) {
            return Err(self.wrong_screen("pick a photo"));
        }
        match result {
            Ok(photo) => {
                log::debug!("photo {photo} picked");
                self.show(Screen::GridChoice { photo });
            }
            Err(e) => {
                log::info!("photo selection failed: {e}");
                self.screen = Screen::PhotoPicker { notice: Some(e) };
            }
        }
        Ok(())
    }

    /// The player backed out of the photo picker. Nothing changes.
    pub fn photo_cancelled(&mut self) {
        log::debug!("photo selection cancelled on the {} screen", self.screen.name());
    }

    /// Start a puzzle on the picked photo with `side` tiles per edge.
    pub fn choose_grid(&mut self, side: u8) -> Result<SessionId, GameError> {
        let photo = match &self.screen {
            Screen::GridChoice { photo } => photo.clone(),
            _ => return Err(self.wrong_screen("choose a grid size")),
        };
        let size = GridSize::try_from(side)?;
        Ok(self.start(photo, size))
    }

    /// Switch the puzzle to another grid size. `None` means the player cancelled the choice and
    /// keeps the current puzzle.
    pub fn change_grid(&mut self, side: Option<u8>) -> Result<Option<SessionId>, GameError> {
        let photo = self.puzzle_photo("change the grid size")?;
        let Some(side) = side else {
            log::debug!("grid size change cancelled");
            return Ok(None);
        };
        let size = GridSize::try_from(side)?;
        Ok(Some(self.start(photo, size)))
    }

    /// Throw the puzzle away and scramble the same photo again.
    pub fn reshuffle(&mut self) -> Result<SessionId, GameError> {
        let photo = self.puzzle_photo("reshuffle")?;
        Ok(self.start(photo, self.config.grid_size))
    }

    /// Start the same puzzle over from scratch: same photo, same size, counters at zero.
    pub fn retry(&mut self) -> Result<SessionId, GameError> {
        let photo = self.puzzle_photo("retry")?;
        Ok(self.start(photo, self.config.grid_size))
    }

    /// Abandon the photo (and any puzzle on it) and go back to the photo picker.
    pub fn new_photo(&mut self) -> Result<(), GameError> {
        match self.screen {
            Screen::GridChoice { .. } | Screen::Puzzle(_) => {
                self.show(Screen::PhotoPicker { notice: None });
                Ok(())
            }
            _ => Err(self.wrong_screen("pick a new photo")),
        }
    }

    /// One second passed on the timer started for session `id`. Ticks for any session other than
    /// the live one are dropped. Returns whether the tick was counted.
    pub fn tick(&mut self, id: SessionId) -> bool {
        match &mut self.screen {
            Screen::Puzzle(session) if session.id() == id => session.tick(),
            _ => {
                log::warn!("dropping tick from stale timer of session {id}");
                false
            }
        }
    }

    /// Pick up a tile of the live puzzle.
    pub fn begin_drag(&mut self, tile: TileId) -> bool {
        match &mut self.screen {
            Screen::Puzzle(session) => session.begin_drag(tile),
            _ => false,
        }
    }

    /// Move the held tile by `(dx, dy)` pixels.
    pub fn drag_by(&mut self, dx: f32, dy: f32) {
        if let Screen::Puzzle(session) = &mut self.screen {
            session.drag_by(dx, dy);
        }
    }

    /// Drop the held tile back where it came from.
    pub fn cancel_drag(&mut self) {
        if let Screen::Puzzle(session) = &mut self.screen {
            session.cancel_drag();
        }
    }

    /// Drop the held tile on the board laid out by `geometry`.
    pub fn release_drag(&mut self, geometry: &BoardGeometry<f32>) -> SwapOutcome {
        let outcome = match &mut self.screen {
            Screen::Puzzle(session) => session.release_drag(geometry),
            _ => SwapOutcome::Unmoved,
        };
        self.notify(outcome);
        outcome
    }

    /// Exchange two tiles of the live puzzle directly.
    pub fn swap_tiles(&mut self, tile: TileId, with: TileId) -> SwapOutcome {
        let outcome = match &mut self.screen {
            Screen::Puzzle(session) => session.swap_tiles(tile, with),
            _ => SwapOutcome::Unmoved,
        };
        self.notify(outcome);
        outcome
    }

    fn notify(&mut self, outcome: SwapOutcome) {
        match outcome {
            SwapOutcome::Swapped { tile, with } => self.listener.snapped(tile, with),
            SwapOutcome::Completed { tile, with, report } => {
                self.listener.snapped(tile, with);
                self.listener.completed(&report);
            }
            SwapOutcome::Unmoved | SwapOutcome::Rejected | SwapOutcome::Ignored => {}
        }
    }

    fn start(&mut self, photo: PhotoRef, size: GridSize) -> SessionId {
        self.generation += 1;
        let id = SessionId::new(self.generation);
        self.config.grid_size = size;
        let session = Session::new(id, photo, self.config, &mut self.rng);
        self.show(Screen::Puzzle(session));
        id
    }

    fn show(&mut self, screen: Screen) {
        if let Screen::Puzzle(old) = &self.screen {
            log::debug!("discarding session {} ({})", old.id(), old.status());
        }
        log::info!("{} screen -> {} screen", self.screen.name(), screen.name());
        self.screen = screen;
    }

    fn puzzle_photo(&self, action: &'static str) -> Result<PhotoRef, GameError> {
        match &self.screen {
            Screen::Puzzle(session) => Ok(session.photo().clone()),
            _ => Err(self.wrong_screen(action)),
        }
    }

    fn wrong_screen(&self, action: &'static str) -> GameError {
        GameError::WrongScreen {
            action,
            screen: self.screen.name(),
        }
    }
}

#[cfg(test)]
mod test {
    extern crate std;

    use crate::drag::BoardGeometry;
    use crate::game::{Game, GameError, PhotoError, Screen};
    use crate::grid::TileId;
    use crate::session::{CompletionReport, SessionListener, SwapOutcome};
    use crate::{GridSize, GridSizeError, PhotoRef};
    use alloc::boxed::Box;
    use alloc::format;
    use alloc::vec::Vec;
    use core::error::Error;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[derive(Debug, Default)]
    struct Recorder {
        snaps: usize,
        reports: Vec<CompletionReport>,
    }

    impl SessionListener for Recorder {
        fn snapped(&mut self, _tile: TileId, _with: TileId) {
            self.snaps += 1;
        }

        fn completed(&mut self, report: &CompletionReport) {
            self.reports.push(*report);
        }
    }

    fn game() -> Game<StdRng, Recorder> {
        Game::new(StdRng::seed_from_u64(11)).with_listener(Recorder::default())
    }

    fn playing() -> Result<Game<StdRng, Recorder>, Box<dyn Error>> {
        let mut game = game();
        game.play()?;
        game.photo_picked(Ok(PhotoRef::new("asset://beach.png")))?;
        game.choose_grid(3)?;
        Ok(game)
    }

    /// Solve the live puzzle by sending every misplaced tile home, one swap at a time.
    fn solve(game: &mut Game<StdRng, Recorder>) -> Result<SwapOutcome, Box<dyn Error>> {
        let mut last = SwapOutcome::Unmoved;
        loop {
            let session = game.session().ok_or("no live session")?;
            let Some(stray) = session.grid().tiles().iter().find(|t| !t.is_home()).copied() else {
                return Ok(last);
            };
            let occupant = session
                .grid()
                .tile_at(stray.correct())
                .ok_or("cell without a tile")?
                .id();
            last = game.swap_tiles(stray.id(), occupant);
        }
    }

    #[test]
    fn screen_flow() -> Result<(), Box<dyn Error>> {
        let mut game = game();
        assert!(matches!(game.screen(), Screen::Title));
        assert!(matches!(
            game.choose_grid(3),
            Err(GameError::WrongScreen { screen: "title", .. })
        ));

        game.play()?;
        game.photo_cancelled();
        assert!(matches!(game.screen(), Screen::PhotoPicker { notice: None }));

        game.photo_picked(Err(PhotoError::Denied))?;
        assert!(matches!(
            game.screen(),
            Screen::PhotoPicker {
                notice: Some(PhotoError::Denied)
            }
        ));

        game.photo_picked(Ok(PhotoRef::new("asset://beach.png")))?;
        assert!(matches!(game.screen(), Screen::GridChoice { .. }));
        assert_eq!(
            Err(GameError::GridSize(GridSizeError(7))),
            game.choose_grid(7)
        );
        assert!(matches!(game.screen(), Screen::GridChoice { .. }));

        let id = game.choose_grid(4)?;
        let session = game.session().ok_or("no live session")?;
        assert_eq!(id, session.id());
        assert_eq!(4, session.grid().side());
        assert_eq!(GridSize::Four, game.grid_size());

        game.new_photo()?;
        assert!(matches!(game.screen(), Screen::PhotoPicker { notice: None }));
        assert!(game.session().is_none());
        Ok(())
    }

    #[test]
    fn session_controls_replace_the_session() -> Result<(), Box<dyn Error>> {
        let mut game = playing()?;
        let first = game.session().ok_or("no live session")?.id();
        assert!(game.tick(first));
        let tiles = game.session().ok_or("no live session")?.grid().tiles().to_vec();
        let (a, b) = (tiles[0].id(), tiles[1].id());
        game.swap_tiles(a, b);

        let second = game.reshuffle()?;
        assert_ne!(first, second);
        let session = game.session().ok_or("no live session")?;
        assert_eq!(0, session.moves());
        assert_eq!(0, session.elapsed_seconds());
        assert_eq!("asset://beach.png", session.photo().as_str());

        let third = game.retry()?;
        assert_ne!(second, third);

        assert_eq!(None, game.change_grid(None)?);
        assert_eq!(third, game.session().ok_or("no live session")?.id());
        assert_eq!(
            Err(GameError::GridSize(GridSizeError(2))),
            game.change_grid(Some(2))
        );
        let fourth = game.change_grid(Some(5))?.ok_or("no new session")?;
        assert_eq!(5, game.session().ok_or("no live session")?.grid().side());

        // timers of discarded sessions are ignored
        assert!(!game.tick(first));
        assert!(!game.tick(third));
        assert!(game.tick(fourth));
        assert_eq!(1, game.session().ok_or("no live session")?.elapsed_seconds());
        Ok(())
    }

    #[test]
    fn completion_is_reported_once() -> Result<(), Box<dyn Error>> {
        let mut game = playing()?;
        let id = game.session().ok_or("no live session")?.id();
        game.tick(id);

        let outcome = solve(&mut game)?;
        let SwapOutcome::Completed { report, .. } = outcome else {
            return Err("the last swap did not complete the puzzle".into());
        };
        let session = game.session().ok_or("no live session")?;
        assert!(session.is_complete());
        assert_eq!(session.moves(), report.moves);
        assert_eq!(1, report.elapsed_seconds);
        assert_eq!(session.score(), report.score);
        assert_eq!(report.moves as usize, game.listener().snaps);
        assert_eq!(&[report][..], &game.listener().reports[..]);

        // the timer stops and further input is rejected
        assert!(!game.tick(id));
        let tiles = game.session().ok_or("no live session")?.grid().tiles().to_vec();
        assert_eq!(
            SwapOutcome::Rejected,
            game.swap_tiles(tiles[0].id(), tiles[1].id())
        );
        assert!(!game.begin_drag(tiles[0].id()));
        let geometry = BoardGeometry::new(300.0, 3).ok_or("invalid geometry")?;
        assert_eq!(SwapOutcome::Unmoved, game.release_drag(&geometry));
        assert_eq!(1, game.listener().reports.len());

        game.retry()?;
        assert!(!game.session().ok_or("no live session")?.is_complete());
        Ok(())
    }

    #[test]
    fn drags_are_forwarded() -> Result<(), Box<dyn Error>> {
        let mut game = playing()?;
        let session = game.session().ok_or("no live session")?;
        let geometry = session.layout(1000.0).ok_or("invalid geometry")?;
        let tile = session.grid().tile_at((0, 0)).ok_or("empty cell")?.id();
        let neighbour = session.grid().tile_at((0, 1)).ok_or("empty cell")?.id();

        assert!(game.begin_drag(tile));
        game.drag_by(geometry.tile_size(), 0.0);
        match game.release_drag(&geometry) {
            SwapOutcome::Swapped { tile: moved, with }
            | SwapOutcome::Completed {
                tile: moved, with, ..
            } => {
                assert_eq!(tile, moved);
                assert_eq!(neighbour, with);
            }
            other => return Err(format!("expected a swap, got {other:?}").into()),
        }
        let session = game.session().ok_or("no live session")?;
        assert_eq!(Some(tile), session.grid().tile_at((0, 1)).map(|t| t.id()));
        assert_eq!(1, session.moves());
        assert_eq!(1, game.listener().snaps);

        game.new_photo()?;
        assert!(!game.begin_drag(tile));
        game.cancel_drag();
        assert_eq!(SwapOutcome::Unmoved, game.release_drag(&geometry));
        Ok(())
    }
}
