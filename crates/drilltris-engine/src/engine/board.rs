use std::mem;

use crate::{
    PieceCollisionError,
    core::{
        BOARD_HEIGHT, BOARD_WIDTH,
        grid::Grid,
        piece::{Color, Piece, PieceKind},
    },
};

use super::{
    event::BoardEvent,
    game_stats::GameStats,
    piece_factory::{PieceFactory, PieceSeed},
};

/// Corrections tried, in order, after a rotation collides.
const WALL_KICKS: [(i32, i32); 3] = [(-1, 0), (1, 0), (0, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BoardState {
    Active,
    Paused,
    /// Terminal until [`Board::reset`].
    GameOver,
}

/// A game in progress: the settled grid, the falling and next pieces, and
/// the score.
///
/// All piece manipulation returns `bool` rather than an error: `false` means
/// the call had no effect on the falling piece, either because it was rejected
/// (collision, paused, game over) or because the piece locked instead.
/// Notifications produced by each call are queued and read with
/// [`Self::take_events`].
///
/// # Example
///
/// ```
/// use drilltris_engine::{Board, BoardEvent, PieceFactory, PieceKind};
///
/// let mut board = Board::with_factory(PieceFactory::from_sequence([PieceKind::O]));
/// board.take_events();
///
/// assert!(board.move_by(-1, 0));
/// assert!(board.drop());
/// assert_eq!(board.grid().occupancy()[19][3..5], [true, true]);
/// assert_eq!(board.take_events().last(), Some(&BoardEvent::StateChanged));
/// ```
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    falling_piece: Piece,
    next_piece: Piece,
    stats: GameStats,
    state: BoardState,
    factory: PieceFactory,
    events: Vec<BoardEvent>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Starts a game with randomly chosen pieces.
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(PieceFactory::new())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_factory(PieceFactory::with_seed(seed))
    }

    #[must_use]
    pub fn with_factory(factory: PieceFactory) -> Self {
        Self::from_grid(Grid::EMPTY, factory)
    }

    /// Starts a game over an already populated grid.
    ///
    /// The first piece is spawned immediately, so a grid blocking the spawn
    /// area yields a board that is already over.
    #[must_use]
    pub fn from_grid(grid: Grid, factory: PieceFactory) -> Self {
        let placeholder = Piece::new(PieceKind::I);
        let mut board = Self {
            grid: Grid::EMPTY,
            falling_piece: placeholder,
            next_piece: placeholder,
            stats: GameStats::new(),
            state: BoardState::Active,
            factory,
            events: vec![],
        };
        board.start(grid);
        board
    }

    /// Clears the grid and statistics and spawns a fresh pair of pieces.
    pub fn reset(&mut self) {
        self.start(Grid::EMPTY);
    }

    fn start(&mut self, grid: Grid) {
        self.grid = grid;
        self.stats = GameStats::new();
        self.state = BoardState::Active;
        self.next_piece = self.factory.create_random();
        self.spawn();
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    #[must_use]
    pub fn next_piece(&self) -> Piece {
        self.next_piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn lines_cleared(&self) -> usize {
        self.stats.total_cleared_lines()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub fn state(&self) -> BoardState {
        self.state
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Drains the notifications queued since the last call.
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        mem::take(&mut self.events)
    }

    /// Replaces the falling piece, e.g. to set up a position.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.grid.is_colliding(piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        self.events.push(BoardEvent::StateChanged);
        Ok(())
    }

    /// Grid with the falling piece drawn in. The piece is left out once the
    /// game is over.
    #[must_use]
    pub fn snapshot(&self) -> Grid {
        let mut grid = self.grid.clone();
        if !self.is_game_over() {
            grid.fill_piece(self.falling_piece);
        }
        grid
    }

    #[must_use]
    pub fn occupancy(&self) -> [[bool; BOARD_WIDTH]; BOARD_HEIGHT] {
        self.snapshot().occupancy()
    }

    #[must_use]
    pub fn colors(&self) -> [[Option<Color>; BOARD_WIDTH]; BOARD_HEIGHT] {
        self.snapshot().colors()
    }

    /// Where the falling piece would lock if dropped now.
    ///
    /// Returns `None` once the game is over.
    #[must_use]
    pub fn landing_preview(&self) -> Option<Piece> {
        if self.is_game_over() {
            return None;
        }
        let piece = self.falling_piece;
        if piece.kind().is_penetrating() {
            return Some(self.drill_target(piece));
        }
        let mut landed = piece;
        loop {
            let mut below = landed;
            below.move_by(0, 1);
            if self.grid.is_colliding(below) {
                return Some(landed);
            }
            landed = below;
        }
    }

    /// Moves the falling piece by `(dx, dy)`.
    ///
    /// A downward move that collides locks the piece and spawns the next one.
    /// Returns whether the falling piece moved.
    pub fn move_by(&mut self, dx: i32, dy: i32) -> bool {
        if !self.state.is_active() {
            return false;
        }
        if dy > 0 && self.falling_piece.kind().is_penetrating() {
            return self.move_penetrating(dx, dy);
        }

        let mut moved = self.falling_piece;
        moved.move_by(dx, dy);
        if self.grid.is_colliding(moved) {
            if dy > 0 {
                self.lock();
            }
            return false;
        }
        self.falling_piece = moved;
        self.events.push(BoardEvent::StateChanged);
        true
    }

    /// Downward movement of the penetrating piece.
    ///
    /// When the cell below is blocked the piece still descends, passing
    /// through one layer per step, as long as some empty cell remains further
    /// down its column. It locks when nothing below is reachable or on
    /// reaching the floor.
    fn move_penetrating(&mut self, dx: i32, dy: i32) -> bool {
        if dx != 0 {
            let mut shifted = self.falling_piece;
            shifted.move_by(dx, 0);
            if self.grid.is_colliding(shifted) {
                return false;
            }
            self.falling_piece = shifted;
        }

        let mut fallen = self.falling_piece;
        fallen.move_by(0, dy);
        if self.grid.is_colliding(fallen) {
            if !self.can_drill(self.falling_piece) {
                self.lock();
                return false;
            }
        } else if usize::try_from(fallen.position().y()).is_ok_and(|y| y + 1 >= BOARD_HEIGHT) {
            self.falling_piece = fallen;
            self.lock();
            return false;
        }
        self.falling_piece = fallen;
        self.events.push(BoardEvent::StateChanged);
        true
    }

    /// Whether an empty cell exists strictly below the row under `piece`.
    fn can_drill(&self, piece: Piece) -> bool {
        let position = piece.position();
        self.grid.has_empty_below(position.x(), position.y() + 1)
    }

    /// The penetrating piece moved to the deepest empty cell of its column.
    fn drill_target(&self, piece: Piece) -> Piece {
        let position = piece.position();
        match self.grid.lowest_empty_in_column(position.x(), position.y()) {
            Some(y) if y > position.y() => piece.at(position.x(), y),
            _ => piece,
        }
    }

    /// Rotates the falling piece to its next state, shifting it left, right or
    /// up by one cell if the rotated shape collides in place.
    ///
    /// Returns whether the piece rotated. On failure the piece is untouched.
    pub fn rotate(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        let mut rotated = self.falling_piece;
        rotated.rotate();
        let placed = [(0, 0)]
            .into_iter()
            .chain(WALL_KICKS)
            .map(|(dx, dy)| {
                let mut candidate = rotated;
                candidate.move_by(dx, dy);
                candidate
            })
            .find(|candidate| !self.grid.is_colliding(*candidate));
        let Some(placed) = placed else {
            return false;
        };
        self.falling_piece = placed;
        self.events.push(BoardEvent::StateChanged);
        true
    }

    /// Drops the falling piece as far as it goes and locks it.
    ///
    /// The penetrating piece jumps straight to the deepest empty cell of its
    /// column. Returns `false` only when the board is paused or over.
    pub fn drop(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        if self.falling_piece.kind().is_penetrating() {
            let target = self.drill_target(self.falling_piece);
            if target != self.falling_piece {
                self.falling_piece = target;
                self.events.push(BoardEvent::StateChanged);
            }
            self.lock();
            return true;
        }
        while self.move_by(0, 1) {}
        true
    }

    /// Flips between active and paused. Has no effect once the game is over.
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            BoardState::Active => BoardState::Paused,
            BoardState::Paused => BoardState::Active,
            BoardState::GameOver => return,
        };
        self.events.push(BoardEvent::StateChanged);
    }

    fn lock(&mut self) {
        self.grid.fill_piece(self.falling_piece);
        let cleared_lines = self.grid.clear_lines();
        if cleared_lines > 0 {
            self.events.push(BoardEvent::LinesCleared(cleared_lines));
        }
        if let Some(level) = self.stats.record_lock(cleared_lines) {
            self.events.push(BoardEvent::LevelChanged(level));
        }
        self.spawn();
    }

    fn spawn(&mut self) {
        let next = self.factory.create_random();
        let piece = mem::replace(&mut self.next_piece, next);
        self.falling_piece = piece.at(spawn_x(piece.width()), 0);
        if self.grid.is_colliding(self.falling_piece) {
            self.state = BoardState::GameOver;
            self.events.push(BoardEvent::GameOver);
        }
        self.events.push(BoardEvent::StateChanged);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn spawn_x(piece_width: usize) -> i32 {
    ((BOARD_WIDTH - piece_width) / 2) as i32
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;
    use crate::core::grid::Block;

    fn board_with(art: &str, kinds: impl IntoIterator<Item = PieceKind>) -> Board {
        let mut board = Board::from_grid(Grid::from_ascii(art), PieceFactory::from_sequence(kinds));
        board.take_events();
        board
    }

    fn position(piece: Piece) -> (i32, i32) {
        (piece.position().x(), piece.position().y())
    }

    #[test]
    fn test_initial_state() {
        let board = Board::with_factory(PieceFactory::from_sequence([PieceKind::T, PieceKind::O]));
        assert!(board.state().is_active());
        assert_eq!(board.score(), 0);
        assert_eq!(board.lines_cleared(), 0);
        assert_eq!(board.level(), 1);
        assert_eq!(board.falling_piece().kind(), PieceKind::T);
        assert_eq!(position(board.falling_piece()), (3, 0));
        assert_eq!(board.next_piece().kind(), PieceKind::O);
        assert_eq!(*board.grid(), Grid::EMPTY);
    }

    #[test]
    fn test_spawn_is_centered() {
        let expected = [
            (PieceKind::I, 3),
            (PieceKind::O, 4),
            (PieceKind::T, 3),
            (PieceKind::L, 3),
            (PieceKind::J, 3),
            (PieceKind::S, 3),
            (PieceKind::Z, 3),
            (PieceKind::P, 4),
        ];
        for (kind, x) in expected {
            let board = Board::with_factory(PieceFactory::from_sequence([kind]));
            assert_eq!(position(board.falling_piece()), (x, 0), "{kind:?}");
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let seed: PieceSeed = rand::rng().random();
        let mut a = Board::with_seed(seed);
        let mut b = Board::with_seed(seed);
        for _ in 0..20 {
            a.drop();
            b.drop();
        }
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.falling_piece(), b.falling_piece());
        assert_eq!(a.score(), b.score());
    }

    #[test]
    fn test_horizontal_move_stops_at_wall() {
        let mut board = board_with("", [PieceKind::O]);
        assert!(board.move_by(-1, 0));
        assert_eq!(position(board.falling_piece()), (3, 0));
        assert_eq!(board.take_events(), [BoardEvent::StateChanged]);

        while board.move_by(-1, 0) {}
        assert_eq!(position(board.falling_piece()), (0, 0));
        board.take_events();

        let before = board.clone();
        assert!(!board.move_by(-1, 0));
        assert_eq!(board.falling_piece(), before.falling_piece());
        assert_eq!(board.grid(), before.grid());
        assert!(board.take_events().is_empty());
    }

    #[test]
    fn test_failed_horizontal_move_against_block() {
        let mut board = board_with(
            "
            ......Z...
            ......Z...
            ",
            [PieceKind::O],
        );
        for _ in 0..18 {
            assert!(board.move_by(0, 1));
        }
        let before = board.falling_piece();
        assert!(!board.move_by(1, 0));
        assert_eq!(board.falling_piece(), before);
        assert!(!board.grid().is_occupied(5, 19));
    }

    #[test]
    fn test_upward_collision_does_not_lock() {
        let mut board = board_with("", [PieceKind::O]);
        assert!(!board.move_by(0, -1));
        assert_eq!(position(board.falling_piece()), (4, 0));
        assert_eq!(board.stats().completed_pieces(), 0);
        assert_eq!(*board.grid(), Grid::EMPTY);
    }

    #[test]
    fn test_downward_collision_locks() {
        let mut board = board_with("", [PieceKind::O, PieceKind::T]);
        for _ in 0..18 {
            assert!(board.move_by(0, 1));
        }
        assert!(!board.move_by(0, 1));
        assert_eq!(
            board.grid().to_string().lines().skip(18).collect::<Vec<_>>(),
            ["....OO....", "....OO...."]
        );
        assert_eq!(board.stats().completed_pieces(), 1);
        assert_eq!(board.falling_piece().kind(), PieceKind::T);
        assert_eq!(position(board.falling_piece()), (3, 0));
        assert_eq!(board.next_piece().kind(), PieceKind::O);
    }

    #[test]
    fn test_rotate_cycles_states() {
        let mut board = board_with("", [PieceKind::T]);
        for expected in [1, 2, 3, 0] {
            assert!(board.rotate());
            assert_eq!(board.falling_piece().rotation(), expected);
        }
        assert_eq!(position(board.falling_piece()), (3, 0));
    }

    #[test]
    fn test_rotate_single_state_pieces() {
        for kind in [PieceKind::O, PieceKind::P] {
            let mut board = board_with("", [kind]);
            let before = board.falling_piece();
            assert!(board.rotate());
            assert_eq!(board.falling_piece(), before);
        }
    }

    #[test]
    fn test_rotate_kicks_tunnelling_piece_out_of_block() {
        let mut board = board_with(DRILL_FIELD, [PieceKind::P, PieceKind::O]);
        for _ in 0..15 {
            assert!(board.move_by(0, 1));
        }
        assert_eq!(position(board.falling_piece()), (4, 15));
        assert!(board.grid().is_colliding(board.falling_piece()));

        assert!(board.rotate());
        assert_eq!(position(board.falling_piece()), (3, 15));
        assert!(!board.grid().is_colliding(board.falling_piece()));
    }

    #[test]
    fn test_wall_kick_left_from_right_wall() {
        let mut board = board_with("", [PieceKind::I]);
        // The vertical I occupies mask column 2, so x = 7 puts it on column 9.
        let vertical = Piece::new(PieceKind::I).with_rotation(1).at(7, 5);
        board.set_falling_piece(vertical).unwrap();
        assert!(board.rotate());
        assert_eq!(board.falling_piece().rotation(), 0);
        assert_eq!(position(board.falling_piece()), (6, 5));
        assert!(!board.grid().is_colliding(board.falling_piece()));
    }

    #[test]
    fn test_wall_kick_right_from_left_wall() {
        let mut board = board_with("", [PieceKind::T]);
        let upright = Piece::new(PieceKind::T).with_rotation(1).at(-1, 5);
        board.set_falling_piece(upright).unwrap();
        assert!(board.rotate());
        assert_eq!(board.falling_piece().rotation(), 2);
        assert_eq!(position(board.falling_piece()), (0, 5));
    }

    #[test]
    fn test_wall_kick_up_from_floor() {
        let mut board = board_with("", [PieceKind::T]);
        board
            .set_falling_piece(Piece::new(PieceKind::T).at(3, 18))
            .unwrap();
        assert!(board.rotate());
        assert_eq!(board.falling_piece().rotation(), 1);
        assert_eq!(position(board.falling_piece()), (3, 17));
    }

    #[test]
    fn test_failed_rotation_restores_piece() {
        let mut board = board_with("", [PieceKind::I]);
        // Flat against the left wall no single-cell shift makes room.
        let vertical = Piece::new(PieceKind::I).with_rotation(1).at(-2, 5);
        board.set_falling_piece(vertical).unwrap();
        board.take_events();

        assert!(!board.rotate());
        assert_eq!(board.falling_piece(), vertical);
        assert!(board.take_events().is_empty());
    }

    #[test]
    fn test_drop_locks_at_bottom() {
        let mut board = board_with("", [PieceKind::I, PieceKind::O]);
        assert!(board.drop());
        assert_eq!(
            board.grid().to_string().lines().last(),
            Some("...IIII...")
        );
        assert_eq!(board.falling_piece().kind(), PieceKind::O);
        assert_eq!(board.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let mut board = board_with(
            "
            ZZZZZZZZZZ
            T.T.T.T.T.
            SSSSSSSSSS
            L........J
            L........J
            L........J
            L........J
            L........J
            L........J
            L........J
            L........J
            L........J
            L........J
            L........J
            L........J
            ",
            [PieceKind::O, PieceKind::T],
        );
        assert!(board.drop());

        let expected = Grid::from_ascii(
            "
            ....OO....
            ....OO....
            T.T.T.T.T.
            L........J
            L........J
            L........J
            L........J
            L........J
            L........J
            L........J
            L........J
            L........J
            L........J
            L........J
            L........J
            ",
        );
        assert_eq!(*board.grid(), expected);
        assert_eq!(board.score(), 300);
        assert_eq!(board.lines_cleared(), 2);
        assert_eq!(board.level(), 1);

        let events = board.take_events();
        assert!(events.contains(&BoardEvent::LinesCleared(2)));
        assert!(!events.iter().any(BoardEvent::is_level_changed));
    }

    #[test]
    fn test_level_up_event() {
        let mut board = board_with(
            "
            IIIII.IIII
            IIIII.IIII
            IIIII.IIII
            IIIII.IIII
            IIIII.IIII
            IIIII.IIII
            IIIII.IIII
            ",
            [PieceKind::I, PieceKind::I, PieceKind::O],
        );

        assert!(board.rotate());
        assert!(board.drop());
        let events = board.take_events();
        assert!(events.contains(&BoardEvent::LinesCleared(4)));
        assert!(!events.iter().any(BoardEvent::is_level_changed));
        assert_eq!((board.score(), board.level()), (800, 1));

        assert!(board.rotate());
        assert!(board.drop());
        let events = board.take_events();
        assert!(events.contains(&BoardEvent::LinesCleared(3)));
        assert!(events.contains(&BoardEvent::LevelChanged(2)));
        assert_eq!((board.score(), board.level()), (1300, 2));
        assert_eq!(board.lines_cleared(), 7);
        assert_eq!(
            board.grid().to_string().lines().skip(16).collect::<Vec<_>>(),
            ["..........", "..........", "..........", ".....I...."]
        );
    }

    const DRILL_FIELD: &str = "
        ....T.....
        ....T.....
        ....T.....
        ..........
        ....T.....
    ";

    #[test]
    fn test_penetrating_piece_tunnels_one_layer_per_step() {
        let mut board = board_with(DRILL_FIELD, [PieceKind::P, PieceKind::O]);
        for _ in 0..14 {
            assert!(board.move_by(0, 1));
        }
        assert_eq!(position(board.falling_piece()), (4, 14));

        for y in [15, 16, 17, 18] {
            assert!(board.move_by(0, 1));
            assert_eq!(position(board.falling_piece()), (4, y));
        }
        // The blocks it passed through are still there.
        assert!((15..18).all(|y| board.grid().is_occupied(4, y)));

        assert!(!board.move_by(0, 1));
        assert_eq!(board.grid().get(4, 18), Some(Block::Piece(PieceKind::P)));
        assert_eq!(board.grid().get(4, 19), Some(Block::Piece(PieceKind::T)));
        assert_eq!(board.falling_piece().kind(), PieceKind::O);
    }

    #[test]
    fn test_penetrating_piece_locks_on_floor() {
        let mut board = board_with("", [PieceKind::P, PieceKind::O]);
        for _ in 0..18 {
            assert!(board.move_by(0, 1));
        }
        assert!(!board.move_by(0, 1));
        assert!(board.grid().is_occupied(4, 19));
        assert_eq!(board.falling_piece().kind(), PieceKind::O);
    }

    #[test]
    fn test_penetrating_piece_locks_on_solid_column() {
        let mut board = board_with(
            "
            ....T.....
            ....T.....
            ",
            [PieceKind::P, PieceKind::O],
        );
        for _ in 0..17 {
            assert!(board.move_by(0, 1));
        }
        assert!(!board.move_by(0, 1));
        assert!(board.grid().is_occupied(4, 17));
    }

    #[test]
    fn test_penetrating_piece_moves_sideways_first() {
        let mut board = board_with("", [PieceKind::P]);
        assert!(board.move_by(1, 1));
        assert_eq!(position(board.falling_piece()), (5, 1));
        assert!(board.move_by(-2, 0));
        assert_eq!(position(board.falling_piece()), (3, 1));
    }

    #[test]
    fn test_penetrating_piece_blocked_sideways() {
        let mut board = board_with(DRILL_FIELD, [PieceKind::P]);
        board
            .set_falling_piece(Piece::new(PieceKind::P).at(3, 16))
            .unwrap();
        assert!(!board.move_by(1, 1));
        assert_eq!(position(board.falling_piece()), (3, 16));
    }

    #[test]
    fn test_penetrating_drop_jumps_to_deepest_empty_cell() {
        let mut board = board_with(DRILL_FIELD, [PieceKind::P, PieceKind::O]);
        assert_eq!(
            board.landing_preview().map(position),
            Some((4, 18))
        );
        assert!(board.drop());
        assert_eq!(board.grid().get(4, 18), Some(Block::Piece(PieceKind::P)));
        assert_eq!(board.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_penetrating_drop_completes_row() {
        let mut board = board_with(
            "
            ....Z.....
            ....Z.....
            IIII.IIIII
            ",
            [PieceKind::P, PieceKind::T],
        );
        assert!(board.drop());
        assert_eq!(board.lines_cleared(), 1);
        assert_eq!(board.score(), 100);
        assert_eq!(
            board.grid().to_string().lines().skip(18).collect::<Vec<_>>(),
            ["....Z.....", "....Z....."]
        );
    }

    #[test]
    fn test_game_over_on_blocked_spawn() {
        let art = format!("{}{}", "IIII.IIIII\n".repeat(2), "..........\n".repeat(18));
        let mut board = board_with(&art, [PieceKind::P, PieceKind::O]);
        assert!(!board.is_game_over());

        assert!(board.drop());
        assert!(board.grid().is_occupied(4, 19));
        assert!(board.is_game_over());
        assert!(board.take_events().contains(&BoardEvent::GameOver));

        let grid = board.grid().clone();
        assert!(!board.move_by(-1, 0));
        assert!(!board.move_by(0, 1));
        assert!(!board.rotate());
        assert!(!board.drop());
        board.toggle_pause();
        assert!(board.is_game_over());
        assert_eq!(*board.grid(), grid);
        assert!(board.take_events().is_empty());

        // The piece that failed to spawn is not drawn.
        assert!(!board.occupancy()[0][4]);
        assert_eq!(board.landing_preview(), None);
    }

    #[test]
    fn test_pause_blocks_moves() {
        let mut board = board_with("", [PieceKind::T]);
        board.toggle_pause();
        assert!(board.is_paused());
        assert_eq!(board.take_events(), [BoardEvent::StateChanged]);

        let before = board.falling_piece();
        assert!(!board.move_by(1, 0));
        assert!(!board.move_by(0, 1));
        assert!(!board.rotate());
        assert!(!board.drop());
        assert_eq!(board.falling_piece(), before);

        board.toggle_pause();
        assert!(board.state().is_active());
        assert!(board.move_by(1, 0));
    }

    #[test]
    fn test_reset_after_game_over() {
        let art = "OOOOOOOOO.\n".repeat(20);
        let mut board = board_with(&art, [PieceKind::O]);
        assert!(board.is_game_over());

        board.reset();
        assert!(board.state().is_active());
        assert_eq!(*board.grid(), Grid::EMPTY);
        assert_eq!(board.score(), 0);
        assert_eq!(board.level(), 1);
        assert_eq!(board.stats().completed_pieces(), 0);
        assert_eq!(position(board.falling_piece()), (4, 0));
    }

    #[test]
    fn test_set_falling_piece_rejects_collision() {
        let mut board = board_with("OOOOOOOOO.", [PieceKind::T]);
        let before = board.falling_piece();
        assert!(
            board
                .set_falling_piece(Piece::new(PieceKind::O).at(0, 18))
                .is_err()
        );
        assert!(board.set_falling_piece(Piece::new(PieceKind::O).at(-1, 0)).is_err());
        assert_eq!(board.falling_piece(), before);
    }

    #[test]
    fn test_snapshot_overlays_falling_piece() {
        let board = board_with("J.........", [PieceKind::O]);
        let occupancy = board.occupancy();
        let colors = board.colors();
        assert!(occupancy[0][4] && occupancy[1][5]);
        assert!(occupancy[19][0]);
        assert_eq!(occupancy.iter().flatten().filter(|&&o| o).count(), 5);
        assert_eq!(colors[0][4], Some(PieceKind::O.color()));
        assert_eq!(colors[19][0], Some(PieceKind::J.color()));
        assert_eq!(colors[19][1], None);
        assert!(!board.grid().is_occupied(4, 0));
    }

    #[test]
    fn test_landing_preview() {
        let mut board = board_with("..I.......", [PieceKind::O]);
        assert_eq!(board.landing_preview().map(position), Some((4, 18)));
        assert!(board.move_by(-2, 0));
        let preview = board.landing_preview().unwrap();
        assert_eq!(position(preview), (2, 17));
        assert_eq!(position(board.falling_piece()), (2, 0));

        assert!(board.drop());
        assert!(board.grid().is_occupied(2, 17) && board.grid().is_occupied(3, 18));
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut board = Board::with_seed(rng.random());
        for _ in 0..5000 {
            match rng.random_range(0..6) {
                0 => _ = board.move_by(-1, 0),
                1 => _ = board.move_by(1, 0),
                2 | 3 => _ = board.move_by(0, 1),
                4 => _ = board.rotate(),
                _ => _ = board.drop(),
            }
            if board.is_game_over() {
                board.reset();
            }

            let piece = board.falling_piece();
            if board.grid().is_colliding(piece) {
                // Only a drilling piece may overlap, and only with room left below it.
                let (x, y) = position(piece);
                assert!(piece.kind().is_penetrating(), "{piece}\n{}", board.grid());
                assert!((0..10).contains(&x) && (0..20).contains(&y), "{piece}");
                assert!(board.grid().has_empty_below(x, y), "{piece}\n{}", board.grid());
            }
            assert!(piece.rotation() < piece.rotation_count());
            assert_eq!(board.score() % 100, 0);
            assert_eq!(board.level(), board.score() / 1000 + 1);
            assert!(board.grid().rows().all(|row| row.iter().any(|b| b.is_empty())));
        }
    }
}
