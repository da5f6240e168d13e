use crate::gxf::GxfRecord;
use hashbrown::HashMap;
use rust_lapper::{Interval, Lapper};

/// Per-seqname interval index over record positions.
///
/// Records go in as 0-based half-open `[start - 1, end)` intervals whose
/// payload is the record's position in the owning collection.
#[derive(Debug, Clone, Default)]
pub struct RangeIndex {
    by_seqname: HashMap<String, Lapper<u64, usize>>,
}

impl RangeIndex {
    /// Indexes `records`, using each record's position in the iteration as
    /// its payload.
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a GxfRecord>,
    {
        let mut intervals: HashMap<String, Vec<Interval<u64, usize>>> = HashMap::new();
        for (idx, record) in records.into_iter().enumerate() {
            intervals
                .entry(record.seqname().to_string())
                .or_default()
                .push(Interval {
                    start: record.start0(),
                    stop: record.end(),
                    val: idx,
                });
        }

        let by_seqname = intervals
            .into_iter()
            .map(|(seqname, ivs)| (seqname, Lapper::new(ivs)))
            .collect::<HashMap<_, _>>();

        log::debug!("built range index over {} sequences", by_seqname.len());
        Self { by_seqname }
    }

    /// Positions of records on `seqname` intersecting the 1-based closed range
    /// `[start, end]`, in ascending order. Unknown seqnames yield nothing.
    pub fn overlapping(&self, seqname: &str, start: u64, end: u64) -> Vec<usize> {
        let Some(lapper) = self.by_seqname.get(seqname) else {
            return Vec::new();
        };

        let mut hits = lapper
            .find(start.saturating_sub(1), end)
            .map(|iv| iv.val)
            .collect::<Vec<_>>();
        hits.sort_unstable();
        hits
    }

    /// Number of indexed sequences.
    pub fn len(&self) -> usize {
        self.by_seqname.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_seqname.is_empty()
    }
}
