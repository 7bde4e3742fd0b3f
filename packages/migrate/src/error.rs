use thiserror::Error;

pub type MigrateResult<T> = Result<T, MigrateError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrateError {
    #[error("Lexer error at {pos}: {snippet:?}")]
    Lex { pos: usize, snippet: String },
}

impl MigrateError {
    pub fn lex(source: &str, pos: usize) -> Self {
        let snippet = source[pos..].chars().take(24).collect();
        Self::Lex { pos, snippet }
    }

    pub fn pos(&self) -> usize {
        match self {
            MigrateError::Lex { pos, .. } => *pos,
        }
    }
}
