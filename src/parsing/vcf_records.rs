
use anyhow::Context;
use flate2::read::MultiGzDecoder;
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::data_types::variant_record::VariantRecord;

/// The depth-annotation format key emitted by the upstream caller this pipeline consumes
pub const DEFAULT_DEPTH_KEY: &str = "CLCAD2";

/// The semantic fields we pull out of each tab-separated data line.
/// Decoding goes through this schema so a short line fails with a named-field
/// error instead of an index panic.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum VcfField {
    Chromosome,
    Position,
    RefAllele,
    AltAllele,
    Quality,
    Format,
    Sample
}

impl VcfField {
    /// The 0-based tab-separated column this field lives at
    fn index(self) -> usize {
        match self {
            VcfField::Chromosome => 0,
            VcfField::Position => 1,
            VcfField::RefAllele => 3,
            VcfField::AltAllele => 4,
            VcfField::Quality => 5,
            VcfField::Format => 8,
            VcfField::Sample => 9
        }
    }

    /// Human-readable name for error messages
    fn name(self) -> &'static str {
        match self {
            VcfField::Chromosome => "chromosome",
            VcfField::Position => "position",
            VcfField::RefAllele => "reference allele",
            VcfField::AltAllele => "alternate allele",
            VcfField::Quality => "quality",
            VcfField::Format => "format",
            VcfField::Sample => "sample"
        }
    }
}

/// Structural errors raised while extracting records from one input file
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("line {line_number}: missing {missing} field (column {column}); found {found} tab-separated field(s)")]
    MissingField {
        line_number: usize,
        missing: &'static str,
        column: usize,
        found: usize
    },
    #[error("line {line_number}: format key \"{depth_key}\" at position {key_index} has no matching sample value")]
    MissingDepthValue {
        line_number: usize,
        depth_key: String,
        key_index: usize
    },
    #[error("line {line_number}: depth value \"{value}\" is not a non-negative integer")]
    InvalidDepth {
        line_number: usize,
        value: String
    }
}

/// Fetches a schema field out of the split line, failing with the field's name when the line is too short
fn fetch_field<'a>(fields: &[&'a str], vcf_field: VcfField, line_number: usize) -> Result<&'a str, ExtractError> {
    fields.get(vcf_field.index())
        .copied()
        .ok_or(ExtractError::MissingField {
            line_number,
            missing: vcf_field.name(),
            column: vcf_field.index(),
            found: fields.len()
        })
}

/// Parses a single comma-separated depth sub-value
fn parse_depth(value: &str, line_number: usize) -> Result<u32, ExtractError> {
    value.parse::<u32>()
        .map_err(|_| ExtractError::InvalidDepth {
            line_number,
            value: value.to_string()
        })
}

/// Parses one non-comment data line into a record.
/// # Arguments
/// * `line` - the data line with trailing whitespace already stripped
/// * `depth_key` - the format key carrying the comma-separated read depths
/// * `line_number` - 1-based line number for error reporting
fn parse_data_line(line: &str, depth_key: &str, line_number: usize) -> Result<VariantRecord, ExtractError> {
    let fields: Vec<&str> = line.split('\t').collect();

    let chromosome = fetch_field(&fields, VcfField::Chromosome, line_number)?;
    let position = fetch_field(&fields, VcfField::Position, line_number)?;
    let ref_allele = fetch_field(&fields, VcfField::RefAllele, line_number)?;
    let alt_allele = fetch_field(&fields, VcfField::AltAllele, line_number)?;
    let quality = fetch_field(&fields, VcfField::Quality, line_number)?;
    let format_field = fetch_field(&fields, VcfField::Format, line_number)?;
    let sample_field = fetch_field(&fields, VcfField::Sample, line_number)?;

    // absence of the depth key is not an error, it degrades to zero coverage
    let format_keys: Vec<&str> = format_field.split(':').collect();
    let (ref_depth, alt_depth) = match format_keys.iter().position(|&k| k == depth_key) {
        Some(key_index) => {
            let sample_values: Vec<&str> = sample_field.split(':').collect();
            let depth_value = sample_values.get(key_index)
                .ok_or_else(|| ExtractError::MissingDepthValue {
                    line_number,
                    depth_key: depth_key.to_string(),
                    key_index
                })?;

            // first value is reference depth; alternate depth is 0 when only one value is present
            let mut depth_iter = depth_value.split(',');
            let ref_depth = parse_depth(depth_iter.next().unwrap_or(""), line_number)?;
            let alt_depth = match depth_iter.next() {
                Some(v) => parse_depth(v, line_number)?,
                None => 0
            };
            (ref_depth, alt_depth)
        },
        None => (0, 0)
    };

    Ok(VariantRecord::new(
        chromosome.to_string(), position.to_string(),
        ref_allele.to_string(), alt_allele.to_string(),
        ref_depth, alt_depth,
        quality.to_string()
    ))
}

/// Extracts all variant records from a readable text source.
/// Comment lines (first byte `#`) are always skipped.
/// In strict mode (the default), the first malformed data line fails the whole extraction.
/// In lenient mode, malformed lines are logged at WARN and skipped.
/// # Arguments
/// * `reader` - the line-oriented text source
/// * `depth_key` - the format key carrying the comma-separated read depths
/// * `lenient` - if true, skip-and-report malformed data lines instead of failing
/// # Errors
/// * on any I/O failure
/// * in strict mode, on the first line with missing fields or an unparseable depth value
pub fn extract_variant_records<R: BufRead>(reader: R, depth_key: &str, lenient: bool) -> Result<Vec<VariantRecord>, ExtractError> {
    let mut records: Vec<VariantRecord> = vec![];
    let mut skipped_lines: usize = 0;
    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.starts_with('#') {
            continue;
        }

        let line_number = line_index + 1;
        match parse_data_line(line.trim_end(), depth_key, line_number) {
            Ok(record) => records.push(record),
            Err(e) if lenient => {
                warn!("Skipping malformed data line: {e}");
                skipped_lines += 1;
            },
            Err(e) => return Err(e)
        }
    }

    if skipped_lines > 0 {
        warn!("Skipped {skipped_lines} malformed data line(s) during extraction.");
    }
    Ok(records)
}

/// Wrapper function that handles both gzip compressed and uncompressed variant files
/// # Arguments
/// * `filename` - path to the .vcf(.gz) file to open
pub fn open_variant_file(filename: &Path) -> anyhow::Result<BufReader<Box<dyn std::io::Read>>> {
    let is_compressed = match filename.extension() {
        Some(extension) => {
            extension == "gz"
        },
        None => false
    };

    let raw_reader: Box<dyn std::io::Read> = if is_compressed {
        let gz_reader = MultiGzDecoder::new(
            File::open(filename)
                .with_context(|| format!("Error while opening {filename:?}:"))?
        );
        Box::new(gz_reader)
    } else {
        Box::new(
            File::open(filename)
                .with_context(|| format!("Error while opening {filename:?}:"))?
        )
    };

    Ok(BufReader::new(raw_reader))
}

/// Opens a single input file and extracts all of its records.
/// The file handle is scoped to this call; nothing stays open across the merge step.
/// # Arguments
/// * `filename` - path to the .vcf(.gz) file to extract
/// * `depth_key` - the format key carrying the comma-separated read depths
/// * `lenient` - if true, skip-and-report malformed data lines instead of failing
pub fn extract_variant_file(filename: &Path, depth_key: &str, lenient: bool) -> anyhow::Result<Vec<VariantRecord>> {
    debug!("Extracting records from {filename:?}...");
    let reader = open_variant_file(filename)?;
    let records = extract_variant_records(reader, depth_key, lenient)
        .with_context(|| format!("Error while extracting {filename:?}:"))?;
    debug!("Extracted {} record(s) from {filename:?}.", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_end_to_end_line() {
        let data = b"#header\nchr1\t100\t.\tA\tT\t50\t.\t.\tGT:CLCAD2\t0/1:10,3\n";
        let records = extract_variant_records(&data[..], DEFAULT_DEPTH_KEY, false).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.chromosome(), "chr1");
        assert_eq!(record.position(), "100");
        assert_eq!(record.ref_allele(), "A");
        assert_eq!(record.alt_allele(), "T");
        assert_eq!(record.variant_key(), "chr1:100");
        assert_eq!(record.alt_depth(), 3);
        assert_eq!(record.total_depth(), 13);
        assert_eq!(record.quality(), "50");
    }

    #[test]
    fn test_depth_parsing() {
        // "12,5" -> alt depth 5, total depth 17
        let data = b"chr1\t100\t.\tA\tT\t50\t.\t.\tGT:CLCAD2\t0/1:12,5\n";
        let records = extract_variant_records(&data[..], DEFAULT_DEPTH_KEY, false).unwrap();
        assert_eq!(records[0].alt_depth(), 5);
        assert_eq!(records[0].total_depth(), 17);

        // "12" with no comma -> alt depth 0, total depth 12
        let data = b"chr1\t100\t.\tA\tT\t50\t.\t.\tGT:CLCAD2\t0/1:12\n";
        let records = extract_variant_records(&data[..], DEFAULT_DEPTH_KEY, false).unwrap();
        assert_eq!(records[0].alt_depth(), 0);
        assert_eq!(records[0].total_depth(), 12);
    }

    #[test]
    fn test_depth_fallback() {
        // no CLCAD2 in the format keys -> zero depths, never an error
        let data = b"chr1\t100\t.\tA\tT\t50\t.\t.\tGT:DP\t0/1:42\n";
        let records = extract_variant_records(&data[..], DEFAULT_DEPTH_KEY, false).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].alt_depth(), 0);
        assert_eq!(records[0].total_depth(), 0);
        assert_eq!(records[0].quality(), "50");
    }

    #[test]
    fn test_comment_lines_skipped() {
        let data = b"##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\n";
        let records = extract_variant_records(&data[..], DEFAULT_DEPTH_KEY, false).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_short_line_is_named_field_error() {
        let data = b"chr1\t100\t.\tA\tT\n";
        let error = extract_variant_records(&data[..], DEFAULT_DEPTH_KEY, false).unwrap_err();
        match error {
            ExtractError::MissingField { line_number, missing, column, found } => {
                assert_eq!(line_number, 1);
                assert_eq!(missing, "quality");
                assert_eq!(column, 5);
                assert_eq!(found, 5);
            },
            e => panic!("unexpected error: {e:?}")
        };
    }

    #[test]
    fn test_invalid_depth_is_fatal() {
        let data = b"chr1\t100\t.\tA\tT\t50\t.\t.\tGT:CLCAD2\t0/1:ten,3\n";
        let error = extract_variant_records(&data[..], DEFAULT_DEPTH_KEY, false).unwrap_err();
        match error {
            ExtractError::InvalidDepth { line_number, value } => {
                assert_eq!(line_number, 1);
                assert_eq!(value, "ten");
            },
            e => panic!("unexpected error: {e:?}")
        };
    }

    #[test]
    fn test_blank_line_fails_field_validation() {
        // blank lines are indistinguishable from malformed lines; this is accepted behavior
        let data = b"\nchr1\t100\t.\tA\tT\t50\t.\t.\tGT:CLCAD2\t10,3\n";
        assert!(extract_variant_records(&data[..], DEFAULT_DEPTH_KEY, false).is_err());
    }

    #[test]
    fn test_lenient_mode_skips_and_continues() {
        let data = b"chr1\t100\nchr2\t200\t.\tG\tC\t30\t.\t.\tGT:CLCAD2\t0/1:8,2\nchr3\t300\t.\tA\tT\t10\t.\t.\tGT:CLCAD2\t0/1:bad\n";
        let records = extract_variant_records(&data[..], DEFAULT_DEPTH_KEY, true).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].variant_key(), "chr2:200");
    }

    #[test]
    fn test_custom_depth_key() {
        let data = b"chr1\t100\t.\tA\tT\t50\t.\t.\tGT:AD\t0/1:7,4\n";
        let records = extract_variant_records(&data[..], "AD", false).unwrap();
        assert_eq!(records[0].alt_depth(), 4);
        assert_eq!(records[0].total_depth(), 11);
    }

    #[test]
    fn test_extract_example_file() {
        let vcf_fn = PathBuf::from("test_data/sample1.vcf");
        let records = extract_variant_file(&vcf_fn, DEFAULT_DEPTH_KEY, false).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].variant_key(), "chr1:100");
        assert_eq!(records[0].support_cell(), "3/13 / 50");
    }
}
