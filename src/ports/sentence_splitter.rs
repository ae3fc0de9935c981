//! Sentence Splitter Port - turns raw text into ordered sentences.

/// Port for sentence segmentation.
pub trait SentenceSplitter: Send + Sync {
    /// Splits `text` into sentences, preserving their order.
    fn split(&self, text: &str) -> Vec<String>;
}
