
/// The four descriptive column headers that always lead the results table
pub const DESCRIPTIVE_HEADERS: [&str; 4] = ["Chromosome", "Position", "Reference Allele", "Alternate Allele"];

/// One row of the overlap table, corresponding to a single distinct variant key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OverlapRow {
    /// Chromosome token from the first record seen for this key
    chromosome: String,
    /// Position token from the first record seen for this key
    position: String,
    /// Reference allele from the first record seen for this key
    ref_allele: String,
    /// Alternate allele from the first record seen for this key
    alt_allele: String,
    /// One formatted support cell per input file; empty string when the key is absent from that file
    cells: Vec<String>
}

impl OverlapRow {
    /// Creates a new row; `cells` must be aligned with the table's file labels.
    pub fn new(chromosome: String, position: String, ref_allele: String, alt_allele: String, cells: Vec<String>) -> Self {
        Self {
            chromosome, position, ref_allele, alt_allele, cells
        }
    }

    /// Flattens the row into the output field order: the four descriptive values, then one cell per file.
    pub fn to_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = vec![
            &self.chromosome, &self.position, &self.ref_allele, &self.alt_allele
        ];
        fields.extend(self.cells.iter().map(|c| c.as_str()));
        fields
    }

    // getters
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn ref_allele(&self) -> &str {
        &self.ref_allele
    }

    pub fn alt_allele(&self) -> &str {
        &self.alt_allele
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// The final wide table: one column per input file after the descriptive columns,
/// one row per distinct variant key across all inputs.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OverlapTable {
    /// Per-file column labels, in the order the files were supplied
    file_labels: Vec<String>,
    /// One row per distinct variant key
    rows: Vec<OverlapRow>
}

impl OverlapTable {
    /// Creates a new table; each row's cell count must match the label count.
    pub fn new(file_labels: Vec<String>, rows: Vec<OverlapRow>) -> Self {
        debug_assert!(rows.iter().all(|r| r.cells().len() == file_labels.len()));
        Self {
            file_labels, rows
        }
    }

    /// Builds the full header row: descriptive columns followed by the per-file labels.
    pub fn header(&self) -> Vec<&str> {
        DESCRIPTIVE_HEADERS.iter().copied()
            .chain(self.file_labels.iter().map(|l| l.as_str()))
            .collect()
    }

    // getters
    pub fn file_labels(&self) -> &[String] {
        &self.file_labels
    }

    pub fn rows(&self) -> &[OverlapRow] {
        &self.rows
    }
}
