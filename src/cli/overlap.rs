
use clap::Args;
use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use strum_macros::EnumString;

use crate::cli::core::{check_required_filename, FULL_VERSION};
use crate::parsing::vcf_records::DEFAULT_DEPTH_KEY;

/// Row ordering of the final overlap table
#[derive(Clone, Copy, Default, Debug, strum_macros::Display, EnumString, Serialize, clap::ValueEnum)]
pub enum RowOrder {
    /// Rows follow the order keys were first observed (files in supplied order, line order within a file)
    #[default]
    #[strum(ascii_case_insensitive, serialize = "observed")]
    #[clap(name = "observed")]
    Observed,
    /// Rows are sorted by chromosome and then numeric position
    #[strum(ascii_case_insensitive, serialize = "coordinate")]
    #[clap(name = "coordinate")]
    Coordinate
}

#[derive(Args, Clone, Default, Serialize)]
pub struct OverlapSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    overlap_version: String,

    /// Input variant call file (VCF), provided in output column order
    #[clap(short = 'i')]
    #[clap(long = "input-vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_filenames: Vec<PathBuf>,

    /// Output table file; two-sheet workbook for .xlsx, delimited text for .csv/.tsv
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(value_name = "FILE")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_filename: PathBuf,

    /// Optional output debug folder
    #[clap(long = "output-debug")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub debug_folder: Option<PathBuf>,

    /// The format key carrying the comma-separated allele read depths
    #[clap(long = "depth-key")]
    #[clap(value_name = "TAG")]
    #[clap(help_heading = Some("Extraction parameters"))]
    #[clap(default_value = DEFAULT_DEPTH_KEY)]
    pub depth_key: String,

    /// Skips and reports malformed data lines instead of failing the whole run
    #[clap(long = "lenient")]
    #[clap(help_heading = Some("Extraction parameters"))]
    pub lenient: bool,

    /// Row ordering in the output table
    #[clap(long = "row-order")]
    #[clap(value_name = "ORDER")]
    #[clap(help_heading = Some("Table parameters"))]
    #[clap(default_value = "observed")]
    pub row_order: RowOrder,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8
}

/// Derives the output column label for an input file: the base name with any
/// directory prefix stripped, for both forward- and backward-slash separators.
pub fn file_label(filename: &Path) -> String {
    let full_path = filename.to_string_lossy();
    full_path.rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string()
}

pub fn check_overlap_settings(mut settings: OverlapSettings) -> anyhow::Result<OverlapSettings> {
    // hard code the version in
    settings.overlap_version = FULL_VERSION.clone();
    info!("vcf-overlap version: {:?}", &settings.overlap_version);
    info!("Inputs:");

    // check the input VCFs and log their derived column labels
    for (i, i_vcf) in settings.input_filenames.iter().enumerate() {
        check_required_filename(i_vcf, format!("Input VCF #{i}").as_str())?;
        info!("\tInput VCF #{i}: {i_vcf:?}");
        info!("\t\tColumn label: {:?}", file_label(i_vcf));
    }

    // duplicate labels collapse into one column, which is usually a mistake worth flagging
    let duplicate_labels: Vec<String> = settings.input_filenames.iter()
        .map(|f| file_label(f))
        .duplicates()
        .collect();
    for label in duplicate_labels.iter() {
        warn!("Multiple inputs share the label {label:?}; only the last one will appear in the table.");
    }

    // outputs
    info!("Outputs:");
    info!("\tTable file: {:?}", &settings.output_filename);
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        info!("\tDebug folder: {debug_folder:?}");
    }

    info!("Extraction parameters:");
    info!("\tDepth key: {:?}", settings.depth_key);
    info!("\tMalformed lines: {}", if settings.lenient { "SKIP AND REPORT" } else { "FATAL" });

    info!("Table parameters:");
    info!("\tRow order: {}", settings.row_order);

    Ok(settings)
}
