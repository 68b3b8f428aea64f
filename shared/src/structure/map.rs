use std::collections::BTreeMap;

use crate::structure::{record::StructureRecord, structure_type::StructureType};

/// Multimap of structure kind to the records of that kind, in insertion order per kind.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StructureMap {
    entries: BTreeMap<StructureType, Vec<StructureRecord>>,
}

impl StructureMap {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Files the record under its own kind.
    pub fn insert(&mut self, record: StructureRecord) {
        self.entries.entry(record.kind()).or_default().push(record);
    }

    pub fn extend<I: IntoIterator<Item = StructureRecord>>(&mut self, records: I) {
        for record in records {
            self.insert(record);
        }
    }

    pub fn get(&self, kind: StructureType) -> &[StructureRecord] {
        self.entries.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn kinds(&self) -> impl Iterator<Item = StructureType> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StructureRecord> {
        self.entries.values().flatten()
    }

    /// Total records across all kinds.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl FromIterator<StructureRecord> for StructureMap {
    fn from_iter<I: IntoIterator<Item = StructureRecord>>(iter: I) -> Self {
        let mut map = StructureMap::new();
        map.extend(iter);
        map
    }
}
