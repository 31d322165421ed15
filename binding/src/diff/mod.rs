mod collection_diff;

pub use collection_diff::{ChangeKind, CollectionDiff, DiffEntry, RawCollectionChange};
