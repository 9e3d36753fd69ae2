// src/models/board.rs

//! The two tracked job boards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One of the two independently tracked Getro networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Board {
    Farming,
    Hunting,
}

impl Board {
    /// Processing order for a run.
    pub const ALL: [Board; 2] = [Board::Farming, Board::Hunting];

    /// Lowercase label used in messages and file names.
    pub fn label(&self) -> &'static str {
        match self {
            Board::Farming => "farming",
            Board::Hunting => "hunting",
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Board {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "farming" => Ok(Board::Farming),
            "hunting" => Ok(Board::Hunting),
            other => Err(AppError::config(format!("Unknown board '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_board() {
        assert_eq!("Farming".parse::<Board>().unwrap(), Board::Farming);
        assert_eq!(" hunting ".parse::<Board>().unwrap(), Board::Hunting);
        assert!("fishing".parse::<Board>().is_err());
    }

    #[test]
    fn test_run_order() {
        assert_eq!(Board::ALL, [Board::Farming, Board::Hunting]);
    }
}
