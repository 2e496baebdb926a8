
use anyhow::Context;
use log::debug;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

use crate::data_types::overlap_table::OverlapTable;

pub const RESULTS_SHEET: &str = "Results";
pub const EXPLANATION_SHEET: &str = "Explanation";

/// Static content of the "Explanation" sheet; this is fixed reference material, independent of the input data
const EXPLANATION_ROWS: [(&str, &str); 5] = [
    ("Chromosome", "Chromosome on which the variant was observed"),
    ("Position", "Position of the variant on the chromosome"),
    ("Reference Allele", "Reference base sequence at the variant site (the original sequence)"),
    ("Alternate Allele", "Alternate base sequence at the variant site (the changed sequence)"),
    ("Sample file columns", "One column per input file: alternate read depth / total read depth and the quality score, formatted as \"alt/total / quality\"; empty when the variant is absent from that file")
];

/// Persists the overlap table and its explanation to the user-selected destination.
/// An .xlsx destination gets one workbook with both named sheets;
/// .csv/.tsv destinations get the results in the named file and the explanation in a sibling file.
/// # Arguments
/// * `table` - the fully built overlap table
/// * `filename` - the user provided destination path
pub fn write_overlap_sheets(table: &OverlapTable, filename: &Path) -> anyhow::Result<()> {
    if filename.extension().unwrap_or_default() == "xlsx" {
        write_xlsx_sheets(table, filename)
    } else {
        write_delimited_sheets(table, filename)
    }
}

/// Writes both sheets into a single xlsx workbook
fn write_xlsx_sheets(table: &OverlapTable, filename: &Path) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let results = workbook.add_worksheet();
    results.set_name(RESULTS_SHEET)?;
    for (col_index, header) in table.header().iter().enumerate() {
        results.write_string_with_format(0, col_index as u16, *header, &header_format)?;
    }
    for (row_index, row) in table.rows().iter().enumerate() {
        for (col_index, value) in row.to_fields().iter().enumerate() {
            results.write_string((row_index + 1) as u32, col_index as u16, *value)?;
        }
    }

    let explanation = workbook.add_worksheet();
    explanation.set_name(EXPLANATION_SHEET)?;
    explanation.write_string_with_format(0, 0, "Column", &header_format)?;
    explanation.write_string_with_format(0, 1, "Description", &header_format)?;
    for (row_index, (column, description)) in EXPLANATION_ROWS.iter().enumerate() {
        explanation.write_string((row_index + 1) as u32, 0, *column)?;
        explanation.write_string((row_index + 1) as u32, 1, *description)?;
    }

    workbook.save(filename)
        .with_context(|| format!("Error while saving workbook to {filename:?}:"))?;
    Ok(())
}

/// Builds the sibling path that receives the explanation table in delimited mode
fn explanation_filename(filename: &Path) -> PathBuf {
    let extension = filename.extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "tsv".to_string());
    filename.with_extension(format!("explanation.{extension}"))
}

/// Writes the two sheets as delimited text files, since those formats have no named sheets
fn write_delimited_sheets(table: &OverlapTable, filename: &Path) -> anyhow::Result<()> {
    // modify the delimiter to "," if it ends with .csv
    let is_csv: bool = filename.extension().unwrap_or_default() == "csv";
    let delimiter: u8 = if is_csv { b',' } else { b'\t' };

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;
    csv_writer.write_record(table.header())?;
    for row in table.rows().iter() {
        csv_writer.write_record(row.to_fields())?;
    }
    csv_writer.flush()?;

    let explanation_fn = explanation_filename(filename);
    debug!("Writing explanation table to {explanation_fn:?}...");
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(&explanation_fn)
        .with_context(|| format!("Error while opening {explanation_fn:?}:"))?;
    csv_writer.write_record(["Column", "Description"])?;
    for (column, description) in EXPLANATION_ROWS.iter() {
        csv_writer.write_record([*column, *description])?;
    }
    csv_writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::overlap_table::OverlapRow;

    fn mock_table() -> OverlapTable {
        OverlapTable::new(
            vec!["sample1.vcf".to_string()],
            vec![OverlapRow::new(
                "chr1".to_string(), "100".to_string(), "A".to_string(), "T".to_string(),
                vec!["3/13 / 50".to_string()]
            )]
        )
    }

    #[test]
    fn test_write_delimited_sheets() {
        let out_fn = std::env::temp_dir().join("vcf_overlap_writer_test.csv");
        write_overlap_sheets(&mock_table(), &out_fn).unwrap();

        let results = std::fs::read_to_string(&out_fn).unwrap();
        assert_eq!(results, "Chromosome,Position,Reference Allele,Alternate Allele,sample1.vcf\nchr1,100,A,T,3/13 / 50\n");

        let explanation = std::fs::read_to_string(explanation_filename(&out_fn)).unwrap();
        assert!(explanation.starts_with("Column,Description\n"));
        assert_eq!(explanation.lines().count(), EXPLANATION_ROWS.len() + 1);
    }

    #[test]
    fn test_write_xlsx_sheets() {
        let out_fn = std::env::temp_dir().join("vcf_overlap_writer_test.xlsx");
        write_overlap_sheets(&mock_table(), &out_fn).unwrap();
        assert!(out_fn.exists());
    }

    #[test]
    fn test_explanation_filename() {
        assert_eq!(
            explanation_filename(Path::new("out/results.tsv")),
            PathBuf::from("out/results.explanation.tsv")
        );
    }
}
