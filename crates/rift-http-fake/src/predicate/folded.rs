//! Text kept alongside its lowercase form.

/// Configured text whose lowercase form is computed once, when the predicate is
/// built, instead of on every request.
#[derive(Debug, Clone)]
pub(crate) struct FoldedText {
    pub(crate) original: String,
    pub(crate) folded: String,
}

impl FoldedText {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        let original = text.into();
        let folded = original.to_lowercase();
        Self { original, folded }
    }

    /// Whether `other` equals the configured text when case is ignored.
    pub(crate) fn eq_ignoring_case(&self, other: &str) -> bool {
        other.to_lowercase() == self.folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folded_once() {
        let text = FoldedText::new("First");
        assert_eq!(text.original, "First");
        assert_eq!(text.folded, "first");
    }

    #[test]
    fn test_eq_ignoring_case() {
        let text = FoldedText::new("/Api/Endpoint");
        assert!(text.eq_ignoring_case("/API/ENDPOINT"));
        assert!(text.eq_ignoring_case("/api/endpoint"));
        assert!(!text.eq_ignoring_case("/api/endpoint/more"));
    }
}
