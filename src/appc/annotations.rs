use super::NameValue;
use std::slice;

/// Ordered name/value annotations for a pod or an app.
///
/// Names are expected to be unique; if a document carries duplicates the
/// first entry wins on lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationSet(Vec<NameValue>);

impl AnnotationSet {
    pub fn new() -> Self {
        AnnotationSet(Vec::new())
    }

    /// Case sensitive exact match on the annotation name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|kv| kv.name == name)
            .map(|kv| kv.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, NameValue> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|kv| kv.name.as_str())
    }
}

impl From<Vec<NameValue>> for AnnotationSet {
    fn from(entries: Vec<NameValue>) -> Self {
        AnnotationSet(entries)
    }
}

impl<'a> IntoIterator for &'a AnnotationSet {
    type Item = &'a NameValue;
    type IntoIter = slice::Iter<'a, NameValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
