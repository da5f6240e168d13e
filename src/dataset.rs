use crate::error::{GxfGenieError, Result};
use crate::gxf::{GxfRecord, Strand};
use crate::range_index::RangeIndex;
use indexmap::IndexMap;
use std::cell::OnceCell;
use std::fmt;

/// Identifier attributes a [`GxfDataSet`] indexes records by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    /// `gene_id`
    Gene,
    /// `transcript_id`
    Transcript,
    /// GFF3 `ID`
    Id,
}

impl IdKind {
    pub fn attr_name(&self) -> &'static str {
        match self {
            IdKind::Gene => "gene_id",
            IdKind::Transcript => "transcript_id",
            IdKind::Id => "ID",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.attr_name())
    }
}

/// Identifier -> record positions. Lists, since identifiers repeat
/// legitimately (PAR genes, discontinuous GFF3 features).
type IdBuckets = IndexMap<String, Vec<usize>>;

/// Contents of a GTF or GFF3 file, indexed by identifier and by range.
///
/// This is a populate-then-query container: the range index is built on the
/// first call to [`GxfDataSet::overlapping`] and does not see records added
/// afterwards.
#[derive(Debug, Default)]
pub struct GxfDataSet {
    records: Vec<GxfRecord>,
    genes_by_id: IdBuckets,
    transcripts_by_id: IdBuckets,
    records_by_id: IdBuckets,
    by_range: OnceCell<RangeIndex>,
}

impl GxfDataSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and files it under its identifiers.
    pub fn add(&mut self, record: GxfRecord) {
        let idx = self.records.len();
        for kind in [IdKind::Gene, IdKind::Transcript, IdKind::Id] {
            if let Some(attr) = record.attrs().find(kind.attr_name()) {
                let buckets = self.buckets_mut(kind);
                for id in attr.values() {
                    buckets.entry(id.to_string()).or_default().push(idx);
                }
            }
        }
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in file order.
    pub fn records(&self) -> impl Iterator<Item = &GxfRecord> {
        self.records.iter()
    }

    /// Number of distinct identifiers of `kind`.
    pub fn id_count(&self, kind: IdKind) -> usize {
        self.buckets(kind).len()
    }

    /// Every identifier of `kind` with its records, in first-seen order.
    pub fn by_id(&self, kind: IdKind) -> impl Iterator<Item = (&str, Vec<&GxfRecord>)> {
        self.buckets(kind)
            .iter()
            .map(|(id, bucket)| (id.as_str(), self.resolve(bucket)))
    }

    /// Records filed under `id`, or `None`.
    pub fn lookup_by_id(&self, kind: IdKind, id: &str) -> Option<Vec<&GxfRecord>> {
        self.buckets(kind)
            .get(id)
            .map(|bucket| self.resolve(bucket))
    }

    /// Records filed under `id`; a missing identifier is an error.
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// let genes = dataset.fetch_by_id(IdKind::Gene, "ENSG00000182378.14")?;
    /// assert_eq!(genes.len(), 2); // chrX and chrY copies
    /// ```
    pub fn fetch_by_id(&self, kind: IdKind, id: &str) -> Result<Vec<&GxfRecord>> {
        self.lookup_by_id(kind, id)
            .ok_or_else(|| GxfGenieError::NotFound {
                kind,
                id: id.to_string(),
            })
    }

    /// Records on `seqname` overlapping the 1-based closed range
    /// `[start, end]`, optionally restricted to one strand, in file order.
    pub fn overlapping(
        &self,
        seqname: &str,
        start: u64,
        end: u64,
        strand: Option<Strand>,
    ) -> Vec<&GxfRecord> {
        let index = self
            .by_range
            .get_or_init(|| RangeIndex::build(&self.records));

        index
            .overlapping(seqname, start, end)
            .into_iter()
            .map(|idx| &self.records[idx])
            .filter(|record| strand.map_or(true, |s| record.strand() == Some(s)))
            .collect()
    }

    fn resolve(&self, bucket: &[usize]) -> Vec<&GxfRecord> {
        bucket.iter().map(|&idx| &self.records[idx]).collect()
    }

    fn buckets(&self, kind: IdKind) -> &IdBuckets {
        match kind {
            IdKind::Gene => &self.genes_by_id,
            IdKind::Transcript => &self.transcripts_by_id,
            IdKind::Id => &self.records_by_id,
        }
    }

    fn buckets_mut(&mut self, kind: IdKind) -> &mut IdBuckets {
        match kind {
            IdKind::Gene => &mut self.genes_by_id,
            IdKind::Transcript => &mut self.transcripts_by_id,
            IdKind::Id => &mut self.records_by_id,
        }
    }
}

impl Extend<GxfRecord> for GxfDataSet {
    fn extend<T: IntoIterator<Item = GxfRecord>>(&mut self, iter: T) {
        for record in iter {
            self.add(record);
        }
    }
}

impl FromIterator<GxfRecord> for GxfDataSet {
    fn from_iter<T: IntoIterator<Item = GxfRecord>>(iter: T) -> Self {
        let mut dataset = GxfDataSet::new();
        dataset.extend(iter);
        dataset
    }
}
