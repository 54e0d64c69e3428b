use thiserror::Error;

/// Which configuration constraint was violated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigProblem {
    EmptyBoard,
    TooManyMines,
    TooManyMinesForSafeStart,
    LayoutMismatch,
    MineOnExcludedCell,
}

impl core::fmt::Display for ConfigProblem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::EmptyBoard => "board must have at least one row and one column",
            Self::TooManyMines => "mine count must be lower than the cell count",
            Self::TooManyMinesForSafeStart => {
                "mine count must leave room for a safe first move and one more safe cell"
            }
            Self::LayoutMismatch => "mine layout does not match the configured board",
            Self::MineOnExcludedCell => "mine layout has a mine on the cell that must stay safe",
        })
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid action")]
    InvalidAction,
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(ConfigProblem),
}

pub type Result<T> = core::result::Result<T, GameError>;
