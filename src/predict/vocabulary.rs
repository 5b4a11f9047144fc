//! Ordered class vocabulary shared by the classifier and the aggregator.

/// Immutable, ordered list of class labels.
///
/// The position of a label is part of the contract: classifier output columns
/// are indexed by it and ranking ties resolve toward the lower index. The
/// vocabulary is injected where it is needed rather than read from a global,
/// so swapping label sets never requires code edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassVocabulary {
    labels: Vec<String>,
}

impl ClassVocabulary {
    pub fn new(labels: Vec<String>) -> Result<Self, String> {
        if labels.is_empty() {
            return Err("class vocabulary must not be empty".to_string());
        }
        for (idx, label) in labels.iter().enumerate() {
            if labels[..idx].contains(label) {
                return Err(format!("duplicate class label: {label}"));
            }
        }
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
