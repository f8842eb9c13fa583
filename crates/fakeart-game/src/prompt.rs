//! Keyword/hint pairs the rounds are drawn from.

use std::path::Path;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// A secret keyword and the category hint shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub keyword: String,
    pub hint: String,
}

impl Prompt {
    pub fn new(keyword: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            hint: hint.into(),
        }
    }
}

/// Errors raised while loading a prompt pool.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("prompt pool is empty")]
    Empty,

    #[error("could not read prompt file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse prompt file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A non-empty set of prompts to pick from.
#[derive(Debug, Clone)]
pub struct PromptPool {
    prompts: Vec<Prompt>,
}

const BUILTIN: &[(&str, &str)] = &[
    ("Giraffe", "Animal"),
    ("Octopus", "Animal"),
    ("Penguin", "Animal"),
    ("Snail", "Animal"),
    ("Pizza", "Food"),
    ("Banana", "Food"),
    ("Ice cream", "Food"),
    ("Pretzel", "Food"),
    ("Bicycle", "Vehicle"),
    ("Helicopter", "Vehicle"),
    ("Submarine", "Vehicle"),
    ("Umbrella", "Object"),
    ("Scissors", "Object"),
    ("Lighthouse", "Building"),
    ("Castle", "Building"),
    ("Volcano", "Nature"),
    ("Rainbow", "Nature"),
    ("Cactus", "Plant"),
    ("Guitar", "Instrument"),
    ("Trumpet", "Instrument"),
    ("Astronaut", "Occupation"),
    ("Firefighter", "Occupation"),
    ("Vampire", "Fantasy"),
    ("Dragon", "Fantasy"),
];

impl PromptPool {
    /// # Errors
    /// [`PromptError::Empty`] if `prompts` is empty.
    pub fn new(prompts: Vec<Prompt>) -> Result<Self, PromptError> {
        if prompts.is_empty() {
            return Err(PromptError::Empty);
        }
        Ok(Self { prompts })
    }

    /// The prompts that ship with the server.
    pub fn builtin() -> Self {
        Self {
            prompts: BUILTIN.iter().map(|(k, h)| Prompt::new(*k, *h)).collect(),
        }
    }

    /// Parses a JSON array of `{ "keyword": ..., "hint": ... }`.
    pub fn from_json(json: &str) -> Result<Self, PromptError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PromptError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Picks a prompt uniformly at random. Repeats are possible.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &Prompt {
        // Construction guarantees at least one prompt.
        self.prompts.choose(rng).unwrap_or(&self.prompts[0])
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

impl Default for PromptPool {
    fn default() -> Self {
        Self::builtin()
    }
}
