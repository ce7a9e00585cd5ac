//! Mock conversion engine for testing.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::engine::{ConversionEngine, EngineError};
use crate::{ConvertedDocument, TextItem, TextLabel};

/// A configurable response for [`MockEngine`].
#[derive(Clone, Debug)]
pub enum MockOutcome {
    /// Return this document.
    Document(ConvertedDocument),
    /// Fail with an extraction error carrying this message.
    Error(String),
}

/// A hand-rolled mock implementing [`ConversionEngine`] for tests.
///
/// Records every path it is asked to convert (so tests can assert on
/// temp-file lifecycle) and counts calls (so tests can verify the engine
/// singleton is constructed and used exactly as expected).
pub struct MockEngine {
    outcome: MockOutcome,
    calls: AtomicUsize,
    seen_paths: Mutex<Vec<PathBuf>>,
}

impl MockEngine {
    /// A mock that always returns `doc`.
    pub fn returning(doc: ConvertedDocument) -> Self {
        Self {
            outcome: MockOutcome::Document(doc),
            calls: AtomicUsize::new(0),
            seen_paths: Mutex::new(Vec::new()),
        }
    }

    /// A mock that always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Error(message.into()),
            calls: AtomicUsize::new(0),
            seen_paths: Mutex::new(Vec::new()),
        }
    }

    /// A mock returning a small single-page document with one paragraph.
    pub fn single_paragraph(text: &str) -> Self {
        Self::returning(ConvertedDocument {
            page_count: Some(1),
            texts: Some(vec![TextItem {
                text: text.to_string(),
                label: TextLabel::Paragraph,
            }]),
            tables: None,
            pictures: None,
        })
    }

    /// How many times `convert()` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Paths passed to `convert()`, in call order.
    pub fn seen_paths(&self) -> Vec<PathBuf> {
        self.seen_paths.lock().unwrap().clone()
    }
}

impl ConversionEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    fn supported_formats(&self) -> &[&'static str] {
        &["PDF"]
    }

    fn convert(&self, path: &Path) -> Result<ConvertedDocument, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_paths.lock().unwrap().push(path.to_path_buf());
        match &self.outcome {
            MockOutcome::Document(doc) => Ok(doc.clone()),
            MockOutcome::Error(msg) => Err(EngineError::Extraction(msg.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_records_calls_and_paths() {
        let mock = MockEngine::single_paragraph("hello");
        let doc = mock.convert(Path::new("/tmp/a.pdf")).unwrap();
        assert_eq!(doc.texts.unwrap()[0].text, "hello");
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.seen_paths(), vec![PathBuf::from("/tmp/a.pdf")]);
    }

    #[test]
    fn failing_mock_returns_extraction_error() {
        let mock = MockEngine::failing("boom");
        let err = mock.convert(Path::new("/tmp/a.pdf")).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
