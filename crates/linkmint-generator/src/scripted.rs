use crate::error::GeneratorError;
use crate::Generator;
use linkmint_core::ShortCode;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A generator that replays a fixed list of codes.
///
/// Codes are handed out in order; once the list is exhausted the last code is
/// repeated forever. Handy for forcing collisions in tests.
#[derive(Debug)]
pub struct ScriptedGenerator {
    codes: Vec<ShortCode>,
    cursor: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new<I, S>(codes: I) -> Result<Self, GeneratorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes = codes
            .into_iter()
            .map(|code| {
                ShortCode::new(code).map_err(|e| GeneratorError::InvalidCode(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if codes.is_empty() {
            return Err(GeneratorError::EmptyScript);
        }

        Ok(Self {
            codes,
            cursor: AtomicUsize::new(0),
        })
    }

    /// How many codes have been handed out so far.
    pub fn calls(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl Generator for ScriptedGenerator {
    fn generate(&self) -> ShortCode {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        let last = self.codes.len() - 1;
        self.codes[index.min(last)].clone()
    }
}
