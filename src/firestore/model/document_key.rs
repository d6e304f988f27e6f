use crate::firestore::error::{invalid_argument, FirestoreResult};
use crate::firestore::model::ResourcePath;

/// Path of a single document, used by `documents` sources and reference
/// constants.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    path: ResourcePath,
}

impl DocumentKey {
    pub fn from_string(path: &str) -> FirestoreResult<Self> {
        let path = ResourcePath::from_string(path)?;
        if !path.is_document() {
            return Err(invalid_argument(format!(
                "Invalid document path '{path}': document paths have an even number of segments"
            )));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }
}
