//! Entry identifier generation.

use uuid::Uuid;

use super::EntryId;

/// Produces a fresh [`EntryId`] per ingested file.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    mode: Mode,
}

#[derive(Debug, Clone, Default)]
enum Mode {
    #[default]
    Random,
    Sequential {
        prefix: String,
        next: u64,
    },
}

impl IdGenerator {
    /// Random v4 UUID tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Predictable `<prefix>1`, `<prefix>2`, ... tokens.
    pub fn sequential(prefix: impl Into<String>) -> Self {
        Self {
            mode: Mode::Sequential {
                prefix: prefix.into(),
                next: 1,
            },
        }
    }

    /// Produce the next id.
    pub fn next_id(&mut self) -> EntryId {
        match &mut self.mode {
            Mode::Random => EntryId::new(Uuid::new_v4().simple().to_string()),
            Mode::Sequential { prefix, next } => {
                let id = EntryId::new(format!("{prefix}{next}"));
                *next += 1;
                id
            }
        }
    }
}
