use serde::{Deserialize, Serialize};

/// 棋盘格子数量（3×3，行优先排列）。
pub const BOARD_CELLS: usize = 9;

/// 落子标记：人类执 x，电脑执 o。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mark {
    #[serde(rename = "x")]
    Player,
    #[serde(rename = "o")]
    Opponent,
}

impl Mark {
    pub fn other(self) -> Mark {
        match self {
            Mark::Player => Mark::Opponent,
            Mark::Opponent => Mark::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Cell {
    #[serde(rename = "")]
    Empty,
    #[serde(rename = "x")]
    Player,
    #[serde(rename = "o")]
    Opponent,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Player => Cell::Player,
            Mark::Opponent => Cell::Opponent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum BoardError {
    IndexOutOfRange { index: usize },
    CellOccupied { index: usize },
}

/// 棋盘状态。序列化为 9 个格子字符串组成的数组，与前端的数据格式一致。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_CELLS],
        }
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn is_cell_empty(&self, index: usize) -> bool {
        matches!(self.cell(index), Some(Cell::Empty))
    }

    pub fn set(&mut self, index: usize, mark: Mark) -> Result<(), BoardError> {
        match self.cells.get(index) {
            None => Err(BoardError::IndexOutOfRange { index }),
            Some(Cell::Empty) => {
                self.cells[index] = mark.into();
                Ok(())
            }
            Some(_) => Err(BoardError::CellOccupied { index }),
        }
    }

    pub fn empty_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Empty)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| *cell != Cell::Empty)
    }

    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; BOARD_CELLS];
    }

    // 搜索用的试探性写入，必须与 clear 配对使用。
    pub(crate) fn place(&mut self, index: usize, mark: Mark) {
        self.cells[index] = mark.into();
    }

    pub(crate) fn clear(&mut self, index: usize) {
        self.cells[index] = Cell::Empty;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
