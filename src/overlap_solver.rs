/*!
# Overlap Solver
Contains the logic for folding the per-file record sequences into one wide overlap table.
Rows are keyed by the variant key (`chromosome:position`); each input file contributes one column of support cells.
Controls via the `OverlapConfig` struct allow for coordinate-sorted row output when determinism across shuffled inputs matters.

## Example usage
```rust
use indexmap::IndexMap;
use vcf_overlap::data_types::variant_record::VariantRecord;
use vcf_overlap::overlap_solver::{solve_overlap, OverlapConfig};

// one record in the first file, none in the second
let mut inputs: IndexMap<String, Vec<VariantRecord>> = Default::default();
inputs.insert("sample1.vcf".to_string(), vec![
    VariantRecord::new(
        "chr1".to_string(), "100".to_string(), "A".to_string(), "T".to_string(),
        10, 3, "50".to_string()
    )
]);
inputs.insert("sample2.vcf".to_string(), vec![]);

let table = solve_overlap(&inputs, OverlapConfig::default());
assert_eq!(table.rows().len(), 1);
assert_eq!(table.rows()[0].to_fields(), vec!["chr1", "100", "A", "T", "3/13 / 50", ""]);
```
*/
use derive_builder::Builder;
use indexmap::{IndexMap, IndexSet};
use log::debug;
use rustc_hash::FxHashMap;

use crate::data_types::overlap_table::{OverlapRow, OverlapTable};
use crate::data_types::variant_record::VariantRecord;

/// Controls the shape of the overlap table we produce
#[derive(Builder, Clone, Copy, Default)]
#[builder(default)]
pub struct OverlapConfig {
    /// if true, rows are sorted by (chromosome, numeric position) instead of first-seen key order
    coordinate_sorted: bool
}

impl OverlapConfig {
    // mostly getters
    pub fn coordinate_sorted(&self) -> bool {
        self.coordinate_sorted
    }
}

/// Folds all extracted record sequences into the final wide table.
/// The row key set is the deduplicated union of every file's variant keys.
/// Descriptive columns come from the first record seen for a key (files in supplied order, line order within a file);
/// per-file cells come from the last record with that key within the file.
/// The two policies intentionally differ, matching the upstream pipeline this replaces.
/// # Arguments
/// * `inputs` - mapping from file label to that file's extracted records, labels in supplied order
/// * `config` - controls for row ordering
pub fn solve_overlap(inputs: &IndexMap<String, Vec<VariantRecord>>, config: OverlapConfig) -> OverlapTable {
    // one scan pass builds the key union (first-seen order) and the descriptive first-occurrence lookup
    let mut key_union: IndexSet<&str> = Default::default();
    let mut descriptive: FxHashMap<&str, &VariantRecord> = Default::default();
    for records in inputs.values() {
        for record in records.iter() {
            key_union.insert(record.variant_key());
            descriptive.entry(record.variant_key()).or_insert(record);
        }
    }
    debug!("Found {} distinct variant key(s) across {} input(s).", key_union.len(), inputs.len());

    // per-file cell lookups; a duplicate key within one file silently overwrites the earlier cell
    let cell_lookups: Vec<FxHashMap<&str, String>> = inputs.values()
        .map(|records| {
            records.iter()
                .map(|record| (record.variant_key(), record.support_cell()))
                .collect()
        })
        .collect();

    let mut rows: Vec<OverlapRow> = key_union.iter()
        .map(|&key| {
            // the key union is built from the records, so the descriptive lookup cannot miss
            let record = descriptive[key];
            let cells: Vec<String> = cell_lookups.iter()
                .map(|lookup| lookup.get(key).cloned().unwrap_or_default())
                .collect();
            OverlapRow::new(
                record.chromosome().to_string(), record.position().to_string(),
                record.ref_allele().to_string(), record.alt_allele().to_string(),
                cells
            )
        })
        .collect();

    if config.coordinate_sorted() {
        rows.sort_by(|r1, r2| coordinate_rank(r1).cmp(&coordinate_rank(r2)));
    }

    OverlapTable::new(
        inputs.keys().cloned().collect(),
        rows
    )
}

/// Sort rank for coordinate-ordered output: chromosome first, then numeric position.
/// Non-numeric position tokens rank after the numeric ones, with the raw token as a tie-breaker.
fn coordinate_rank(row: &OverlapRow) -> (&str, u8, u64, &str) {
    match row.position().parse::<u64>() {
        Ok(p) => (row.chromosome(), 0, p, row.position()),
        Err(_) => (row.chromosome(), 1, 0, row.position())
    }
}
