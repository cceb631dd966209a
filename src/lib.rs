pub mod ai;
pub mod game;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{best_move, opponent_move, AiDecision};
pub use game::{
    evaluate, has_line, winning_line, Board, BoardError, Cell, GameEvent, GameOutcome, Mark,
    RuleEngine, RuleError, RuleResolution, BOARD_CELLS, WIN_LINES,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
}

fn to_js_error(error: RuleError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn make_resolution_json(resolution: RuleResolution) -> Result<String, JsValue> {
    serde_json::to_string(&resolution).map_err(serde_to_js_error)
}

#[derive(Serialize)]
struct AiMoveResponse {
    decision: AiDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    applied: Option<RuleResolution>,
}

#[wasm_bindgen]
pub struct GameEngine {
    board: Board,
}

#[wasm_bindgen]
impl GameEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(initial_board_json: Option<String>) -> Result<GameEngine, JsValue> {
        let board = if let Some(json) = initial_board_json {
            serde_json::from_str(&json).map_err(serde_to_js_error)?
        } else {
            Board::new()
        };
        Ok(GameEngine { board })
    }

    pub fn board_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.board).map_err(serde_to_js_error)
    }

    pub fn set_board_json(&mut self, json: &str) -> Result<(), JsValue> {
        let board: Board = serde_json::from_str(json).map_err(serde_to_js_error)?;
        self.board = board;
        Ok(())
    }

    pub fn outcome(&self) -> Result<JsValue, JsValue> {
        to_value(&evaluate(&self.board)).map_err(JsValue::from)
    }

    pub fn apply_player_move(&mut self, index: usize) -> Result<String, JsValue> {
        let engine = RuleEngine::new();
        let events = engine
            .apply_player_move(&mut self.board, index)
            .map_err(to_js_error)?;
        make_resolution_json(RuleResolution::new(self.board.clone(), events))
    }

    pub fn apply_ai_move(&mut self) -> Result<String, JsValue> {
        let decision = opponent_move(&self.board);

        let applied = if let Some(index) = decision.index {
            let engine = RuleEngine::new();
            let events = engine
                .apply_opponent_move(&mut self.board, index)
                .map_err(to_js_error)?;
            Some(RuleResolution::new(self.board.clone(), events))
        } else {
            None
        };

        let response = AiMoveResponse { decision, applied };
        serde_json::to_string(&response).map_err(serde_to_js_error)
    }

    /// 仅计算电脑的落子，不改动棋盘；delay_ms 用于前端的出手停顿。
    pub fn think_ai(&self, delay_ms: Option<u32>) -> Promise {
        let board = self.board.clone();
        let delay = delay_ms.unwrap_or(0);

        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            let decision = opponent_move(&board);
            let json = serde_json::to_string(&decision).map_err(serde_to_js_error)?;
            Ok(JsValue::from_str(&json))
        })
    }

    pub fn reset(&mut self) -> Result<String, JsValue> {
        let engine = RuleEngine::new();
        let events = engine.reset(&mut self.board);
        make_resolution_json(RuleResolution::new(self.board.clone(), events))
    }
}

/// 返回一个空棋盘，方便前端初始化。
#[wasm_bindgen(js_name = "createBoard")]
pub fn create_board() -> Result<JsValue, JsValue> {
    to_value(&Board::new()).map_err(JsValue::from)
}

/// 将传入的棋盘进行深拷贝后返回。
#[wasm_bindgen(js_name = "cloneBoard")]
pub fn clone_board(board: JsValue) -> Result<JsValue, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    let cloned = board.clone();
    to_value(&cloned).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "applyPlayerMove")]
pub fn apply_player_move(board: JsValue, index: usize) -> Result<JsValue, JsValue> {
    let mut board: Board = from_value(board).map_err(JsValue::from)?;
    let engine = RuleEngine::new();
    match engine.apply_player_move(&mut board, index) {
        Ok(events) => to_value(&RuleResolution::new(board, events)).map_err(JsValue::from),
        Err(error) => Err(to_js_error(error)),
    }
}

#[wasm_bindgen(js_name = "evaluateTerminal")]
pub fn evaluate_terminal(board: JsValue) -> Result<JsValue, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    to_value(&evaluate(&board)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "computeAiMove")]
pub fn compute_ai_move(board: JsValue) -> Result<JsValue, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    let decision = opponent_move(&board);
    to_value(&decision).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "applyAiMove")]
pub fn apply_ai_move(board: JsValue) -> Result<JsValue, JsValue> {
    let mut board: Board = from_value(board).map_err(JsValue::from)?;
    let decision = opponent_move(&board);

    let applied = if let Some(index) = decision.index {
        let engine = RuleEngine::new();
        let events = engine
            .apply_opponent_move(&mut board, index)
            .map_err(to_js_error)?;
        Some(RuleResolution::new(board, events))
    } else {
        None
    };

    let response = AiMoveResponse { decision, applied };
    to_value(&response).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "resetBoard")]
pub fn reset_board(board: JsValue) -> Result<JsValue, JsValue> {
    let mut board: Board = from_value(board).map_err(JsValue::from)?;
    let engine = RuleEngine::new();
    let events = engine.reset(&mut board);
    to_value(&RuleResolution::new(board, events)).map_err(JsValue::from)
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
