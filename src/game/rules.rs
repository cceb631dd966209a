use serde::{Deserialize, Serialize};

use super::board::{Board, BoardError, Cell, Mark};

/// 8 条获胜线：三行、三列、两条对角线。
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameOutcome {
    InProgress,
    PlayerWins,
    OpponentWins,
    Draw,
}

impl GameOutcome {
    pub fn is_terminal(self) -> bool {
        self != GameOutcome::InProgress
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RuleError {
    GameFinished,
    InvalidMove { error: BoardError },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    MarkPlaced { index: usize, mark: Mark },
    GameWon { winner: Mark, line: [usize; 3] },
    GameDrawn,
    BoardReset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleResolution {
    pub board: Board,
    pub events: Vec<GameEvent>,
    pub outcome: GameOutcome,
}

impl RuleResolution {
    pub fn new(board: Board, events: Vec<GameEvent>) -> Self {
        let outcome = evaluate(&board);
        Self {
            board,
            events,
            outcome,
        }
    }
}

pub fn winning_line(board: &Board, mark: Mark) -> Option<[usize; 3]> {
    let cell = Cell::from(mark);
    WIN_LINES
        .into_iter()
        .find(|line| line.iter().all(|&index| board.cell(index) == Some(cell)))
}

pub fn has_line(board: &Board, mark: Mark) -> bool {
    winning_line(board, mark).is_some()
}

/// 由棋盘内容推导终局状态，不在任何地方缓存结果。
pub fn evaluate(board: &Board) -> GameOutcome {
    if has_line(board, Mark::Opponent) {
        GameOutcome::OpponentWins
    } else if has_line(board, Mark::Player) {
        GameOutcome::PlayerWins
    } else if board.is_full() {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}

#[derive(Debug, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    fn ensure_in_progress(board: &Board) -> Result<(), RuleError> {
        if evaluate(board).is_terminal() {
            return Err(RuleError::GameFinished);
        }
        Ok(())
    }

    fn apply_move(board: &mut Board, index: usize, mark: Mark) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_in_progress(board)?;

        board
            .set(index, mark)
            .map_err(|error| RuleError::InvalidMove { error })?;

        let mut events = vec![GameEvent::MarkPlaced { index, mark }];
        if let Some(line) = winning_line(board, mark) {
            events.push(GameEvent::GameWon { winner: mark, line });
        } else if board.is_full() {
            events.push(GameEvent::GameDrawn);
        }

        Ok(events)
    }

    pub fn apply_player_move(
        &self,
        board: &mut Board,
        index: usize,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::apply_move(board, index, Mark::Player)
    }

    pub fn apply_opponent_move(
        &self,
        board: &mut Board,
        index: usize,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::apply_move(board, index, Mark::Opponent)
    }

    pub fn reset(&self, board: &mut Board) -> Vec<GameEvent> {
        board.reset();
        vec![GameEvent::BoardReset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(cells: [&str; 9]) -> Board {
        let json = serde_json::to_string(&cells).expect("fixture should serialize");
        serde_json::from_str(&json).expect("fixture should be a valid board")
    }

    #[test]
    fn empty_board_is_in_progress() {
        let board = Board::new();
        assert_eq!(evaluate(&board), GameOutcome::InProgress);
        // evaluate is pure, so asking twice must agree
        assert_eq!(evaluate(&board), GameOutcome::InProgress);
    }

    #[test]
    fn completed_lines_are_detected_for_both_marks() {
        let opponent_row = board_from(["o", "o", "o", "x", "x", "", "", "", ""]);
        assert_eq!(evaluate(&opponent_row), GameOutcome::OpponentWins);
        assert_eq!(
            winning_line(&opponent_row, Mark::Opponent),
            Some([0, 1, 2]),
            "the completed triple should be reported"
        );

        let player_column = board_from(["x", "o", "", "x", "o", "", "x", "", ""]);
        assert_eq!(evaluate(&player_column), GameOutcome::PlayerWins);
        assert_eq!(winning_line(&player_column, Mark::Player), Some([0, 3, 6]));

        let player_diagonal = board_from(["x", "o", "o", "", "x", "", "", "", "x"]);
        assert_eq!(evaluate(&player_diagonal), GameOutcome::PlayerWins);
        assert!(has_line(&player_diagonal, Mark::Player));
        assert!(!has_line(&player_diagonal, Mark::Opponent));
    }

    #[test]
    fn opponent_line_takes_precedence_over_player_line() {
        // Unreachable through legal play; documents the fixed check order.
        let both = board_from(["x", "x", "x", "o", "o", "o", "", "", ""]);
        assert_eq!(evaluate(&both), GameOutcome::OpponentWins);
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let board = board_from(["x", "o", "x", "x", "o", "o", "o", "x", "x"]);
        assert_eq!(evaluate(&board), GameOutcome::Draw);
    }

    #[test]
    fn winning_move_emits_mark_and_victory_events() {
        let engine = RuleEngine::new();
        let mut board = board_from(["x", "x", "", "o", "o", "", "", "", ""]);

        let events = engine
            .apply_player_move(&mut board, 2)
            .expect("move should apply");

        assert_eq!(
            events,
            vec![
                GameEvent::MarkPlaced {
                    index: 2,
                    mark: Mark::Player
                },
                GameEvent::GameWon {
                    winner: Mark::Player,
                    line: [0, 1, 2]
                },
            ]
        );
        assert_eq!(evaluate(&board), GameOutcome::PlayerWins);
    }

    #[test]
    fn drawing_move_emits_draw_event() {
        let engine = RuleEngine::new();
        let mut board = board_from(["x", "o", "x", "x", "o", "o", "o", "x", ""]);

        let events = engine
            .apply_player_move(&mut board, 8)
            .expect("move should apply");

        assert_eq!(
            events,
            vec![
                GameEvent::MarkPlaced {
                    index: 8,
                    mark: Mark::Player
                },
                GameEvent::GameDrawn,
            ]
        );
    }

    #[test]
    fn moves_on_finished_board_are_rejected_until_reset() {
        let engine = RuleEngine::new();
        let mut board = board_from(["o", "o", "o", "x", "x", "", "", "", ""]);

        let err = engine
            .apply_player_move(&mut board, 5)
            .expect_err("terminal state should be absorbing");
        assert_eq!(err, RuleError::GameFinished);

        let events = engine.reset(&mut board);
        assert_eq!(events, vec![GameEvent::BoardReset]);
        assert_eq!(evaluate(&board), GameOutcome::InProgress);
        assert_eq!(board.empty_indices(), vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn invalid_moves_leave_the_board_unchanged() {
        let engine = RuleEngine::new();
        let mut board = board_from(["x", "", "", "", "o", "", "", "", ""]);
        let snapshot = board.clone();

        let occupied = engine
            .apply_player_move(&mut board, 4)
            .expect_err("occupied cell should be rejected");
        assert_eq!(
            occupied,
            RuleError::InvalidMove {
                error: BoardError::CellOccupied { index: 4 }
            }
        );

        let out_of_range = engine
            .apply_player_move(&mut board, 12)
            .expect_err("index outside the grid should be rejected");
        assert_eq!(
            out_of_range,
            RuleError::InvalidMove {
                error: BoardError::IndexOutOfRange { index: 12 }
            }
        );

        assert_eq!(board, snapshot, "rejected moves must not mutate the board");
    }

    #[test]
    fn resolution_recomputes_outcome_from_the_board() {
        let board = board_from(["o", "o", "o", "x", "x", "", "", "", ""]);
        let resolution = RuleResolution::new(board, Vec::new());
        assert_eq!(resolution.outcome, GameOutcome::OpponentWins);
    }
}
