//! Per-sentence annotation table.
//!
//! Records built from one sentence live here, together with the token range
//! each one covers, until linking is done. The table is dropped when the
//! sentence is finished; tokens are never mutated.

use flora_model::{TraitKind, TraitRecord};

#[derive(Debug, Clone, Default)]
pub struct AnnotationTable {
    records: Vec<TraitRecord>,
    /// Token range `[first, last)` of each record.
    spans: Vec<(usize, usize)>,
    /// Record owning each token.
    owners: Vec<Option<usize>>,
}

impl AnnotationTable {
    pub fn new(token_count: usize) -> Self {
        Self {
            records: Vec::new(),
            spans: Vec::new(),
            owners: vec![None; token_count],
        }
    }

    /// Adds a record covering tokens `[first, last)`. Tokens already owned by
    /// an earlier record keep their owner.
    pub fn push(&mut self, record: TraitRecord, first: usize, last: usize) -> usize {
        let index = self.records.len();
        let last = last.min(self.owners.len());
        for owner in self.owners.iter_mut().take(last).skip(first) {
            owner.get_or_insert(index);
        }
        self.records.push(record);
        self.spans.push((first, last));
        index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, index: usize) -> Option<&TraitRecord> {
        self.records.get(index)
    }

    pub fn record_mut(&mut self, index: usize) -> Option<&mut TraitRecord> {
        self.records.get_mut(index)
    }

    pub fn records(&self) -> &[TraitRecord] {
        &self.records
    }

    pub fn span(&self, index: usize) -> Option<(usize, usize)> {
        self.spans.get(index).copied()
    }

    pub fn owner(&self, token: usize) -> Option<usize> {
        self.owners.get(token).copied().flatten()
    }

    /// Kind of the record owning `token`.
    pub fn owner_kind(&self, token: usize) -> Option<TraitKind> {
        self.owner(token)
            .and_then(|index| self.records.get(index))
            .map(|record| record.kind)
    }

    /// Indices of records of `kind`.
    pub fn indices_of(&self, kind: TraitKind) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.kind == kind)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn into_records(self) -> Vec<TraitRecord> {
        self.records
    }
}
