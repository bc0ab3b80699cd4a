use serde::{Deserialize, Serialize};

/// One speech-recognition result as reported by the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechFragment {
    pub transcript: String,
    /// `false` for interim guesses that may still change.
    #[serde(default)]
    pub is_final: bool,
}

/// Folds the latest fragment list into the answer text.
///
/// The client re-sends the whole list on every change, so the answer is
/// recomputed from scratch each time rather than appended to.
#[derive(Debug, Clone, Default)]
pub struct TranscriptAccumulator {
    fragments: Vec<SpeechFragment>,
}

impl TranscriptAccumulator {
    pub fn replace(&mut self, fragments: Vec<SpeechFragment>) {
        self.fragments = fragments;
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Finalized fragments, space-joined, in arrival order.
    pub fn answer(&self) -> String {
        self.fragments
            .iter()
            .filter(|f| f.is_final)
            .map(|f| f.transcript.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The most recent interim guess, if the latest fragment is not final yet.
    pub fn interim(&self) -> Option<&str> {
        self.fragments
            .last()
            .filter(|f| !f.is_final)
            .map(|f| f.transcript.as_str())
    }
}
