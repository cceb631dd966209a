//! AI 算法模块（极小极大搜索）。

pub mod minimax;

pub use minimax::{best_move, opponent_move, AiDecision};
