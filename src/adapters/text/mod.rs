//! Text adapters.

mod punctuation_splitter;

pub use punctuation_splitter::{PunctuationSplitter, DEFAULT_TERMINATORS};
