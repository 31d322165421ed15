use crate::{
    convert::{ConversionError, Converter},
    glue::{GlueError, GlueRef},
    types::{ElementType, RemoteValue},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Add,
    Remove,
}

impl ChangeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChangeKind::Add => "add",
            ChangeKind::Remove => "remove",
        }
    }
}

/// One edit as reported by the remote side, before conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct RawCollectionChange {
    pub kind: ChangeKind,
    pub index: usize,
    pub value: RemoteValue,
}

impl RawCollectionChange {
    pub fn add(index: usize, value: RemoteValue) -> Self {
        Self {
            kind: ChangeKind::Add,
            index,
            value,
        }
    }

    pub fn remove(index: usize, value: RemoteValue) -> Self {
        Self {
            kind: ChangeKind::Remove,
            index,
            value,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DiffEntry {
    pub kind: ChangeKind,
    pub index: usize,
    pub value: GlueRef,
}

/// Ordered structural edits that originated remotely, to be replayed onto
/// one native collection and its shadow list.
///
/// Each index is interpreted against the collection as left by the entries
/// before it. Moves arrive as a remove followed by an add.
#[derive(Clone, Debug, Default)]
pub struct CollectionDiff {
    entries: Vec<DiffEntry>,
}

impl CollectionDiff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_raw(
        changes: &[RawCollectionChange],
        converter: &dyn Converter,
        element_type: &ElementType,
    ) -> Result<Self, ConversionError> {
        let entries = changes
            .iter()
            .map(|change| {
                Ok(DiffEntry {
                    kind: change.kind,
                    index: change.index,
                    value: converter.to_glue(&change.value, element_type)?,
                })
            })
            .collect::<Result<Vec<_>, ConversionError>>()?;
        Ok(Self { entries })
    }

    pub fn add(&mut self, index: usize, value: GlueRef) -> &mut Self {
        self.entries.push(DiffEntry {
            kind: ChangeKind::Add,
            index,
            value,
        });
        self
    }

    pub fn remove(&mut self, index: usize, value: GlueRef) -> &mut Self {
        self.entries.push(DiffEntry {
            kind: ChangeKind::Remove,
            index,
            value,
        });
        self
    }

    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, kind: ChangeKind) -> usize {
        self.entries.iter().filter(|entry| entry.kind == kind).count()
    }

    /// Walks the diff against a collection of `initial_len` items and returns
    /// the final length, or the first entry whose index would be invalid when
    /// reached.
    pub fn validate(&self, initial_len: usize) -> Result<usize, GlueError> {
        let mut len = initial_len;
        for entry in &self.entries {
            let valid = match entry.kind {
                ChangeKind::Add => entry.index <= len,
                ChangeKind::Remove => entry.index < len,
            };
            if !valid {
                return Err(GlueError::ProtocolViolation {
                    operation: entry.kind.name(),
                    index: entry.index,
                    len,
                });
            }
            match entry.kind {
                ChangeKind::Add => len += 1,
                ChangeKind::Remove => len -= 1,
            }
        }
        Ok(len)
    }
}

impl FromIterator<DiffEntry> for CollectionDiff {
    fn from_iter<I: IntoIterator<Item = DiffEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
