use serde::{Deserialize, Serialize};

use crate::game::{has_line, Board, Mark};

const OPPONENT_WIN_SCORE: i32 = 10;
const PLAYER_WIN_SCORE: i32 = -10;
const DRAW_SCORE: i32 = 0;

/// 一次搜索得到的落子决策。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiDecision {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub score: i32,
    pub nodes: u64,
}

struct SearchStats {
    nodes: u64,
}

impl SearchStats {
    fn new() -> Self {
        Self { nodes: 0 }
    }
}

#[derive(Debug, Clone, Copy)]
struct MoveScore {
    index: Option<usize>,
    score: i32,
}

/// Exhaustive minimax over the full game tree from `board`, choosing the
/// optimal move for `mark`. The caller's board is left untouched.
pub fn best_move(board: &Board, mark: Mark) -> AiDecision {
    let mut scratch = board.clone();
    let mut stats = SearchStats::new();
    let chosen = minimax(&mut scratch, mark, &mut stats);
    AiDecision {
        index: chosen.index,
        score: chosen.score,
        nodes: stats.nodes,
    }
}

/// 电脑视角的搜索入口。
pub fn opponent_move(board: &Board) -> AiDecision {
    best_move(board, Mark::Opponent)
}

fn minimax(board: &mut Board, mark: Mark, stats: &mut SearchStats) -> MoveScore {
    stats.nodes += 1;

    // Scores are absolute (opponent-positive) and flat: a win in one move
    // and a win in five both score the same.
    if has_line(board, Mark::Player) {
        return MoveScore {
            index: None,
            score: PLAYER_WIN_SCORE,
        };
    }
    if has_line(board, Mark::Opponent) {
        return MoveScore {
            index: None,
            score: OPPONENT_WIN_SCORE,
        };
    }

    let empty = board.empty_indices();
    if empty.is_empty() {
        return MoveScore {
            index: None,
            score: DRAW_SCORE,
        };
    }

    let mut best = MoveScore {
        index: None,
        score: match mark {
            Mark::Opponent => i32::MIN,
            Mark::Player => i32::MAX,
        },
    };

    for index in empty {
        board.place(index, mark);
        let child = minimax(board, mark.other(), stats);
        board.clear(index);

        // 平分时保留先遇到的候选（索引升序）。
        let better = match mark {
            Mark::Opponent => child.score > best.score,
            Mark::Player => child.score < best.score,
        };
        if better {
            best = MoveScore {
                index: Some(index),
                score: child.score,
            };
        }
    }

    best
}
