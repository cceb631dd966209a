//! 游戏核心逻辑模块（棋盘状态与规则判定）。

pub mod board;
pub mod rules;

pub use board::{Board, BoardError, Cell, Mark, BOARD_CELLS};
pub use rules::{
    evaluate,
    has_line,
    winning_line,
    GameEvent,
    GameOutcome,
    RuleEngine,
    RuleError,
    RuleResolution,
    WIN_LINES,
};
