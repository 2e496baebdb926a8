
use indexmap::IndexMap;
use indicatif::ProgressIterator;
use log::{LevelFilter, debug, error, info};
use std::time::Instant;

use vcf_overlap::cli::core::get_cli;
use vcf_overlap::cli::overlap::{OverlapSettings, RowOrder, check_overlap_settings, file_label};
use vcf_overlap::data_types::variant_record::VariantRecord;
use vcf_overlap::overlap_solver::{OverlapConfigBuilder, solve_overlap};
use vcf_overlap::parsing::vcf_records::extract_variant_file;
use vcf_overlap::util::json_io::save_json;
use vcf_overlap::util::progress_bar::get_progress_style;
use vcf_overlap::writers::overlap_sheets::write_overlap_sheets;

fn run_overlap(settings: OverlapSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    let filter_level: LevelFilter = match settings.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let settings = match check_overlap_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // an empty selection is a normal abort path, not an error
    if settings.input_filenames.is_empty() {
        info!("No input VCF files selected, nothing to analyze.");
        std::process::exit(exitcode::OK);
    }

    // create a debug folder if specified
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        info!("Creating debug folder at {debug_folder:?}...");
        match std::fs::create_dir_all(debug_folder) {
            Ok(()) => {},
            Err(e) => {
                error!("Error while creating debug folder: {e}");
                std::process::exit(exitcode::IOERR);
            }
        }

        // save the CLI options
        let cli_json = debug_folder.join("cli_settings.json");
        info!("Saving CLI options to {cli_json:?}...");
        if let Err(e) = save_json(&settings, &cli_json) {
            error!("Error while saving CLI options: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    // extract each file in supplied order; files are opened, read to end, and closed one at a time
    info!("Extracting variant records...");
    let style = get_progress_style();
    let mut extracted: IndexMap<String, Vec<VariantRecord>> = Default::default();
    for vcf_fn in settings.input_filenames.iter().progress_with_style(style) {
        let records = match extract_variant_file(vcf_fn, &settings.depth_key, settings.lenient) {
            Ok(r) => r,
            Err(e) => {
                error!("Error while extracting records: {e:#}");
                std::process::exit(exitcode::DATAERR);
            }
        };
        debug!("Extracted {} record(s) from {vcf_fn:?}.", records.len());

        // mapping semantics: a repeated label replaces the earlier records but keeps its column position
        extracted.insert(file_label(vcf_fn), records);
    }

    // build our overlap configuration
    let overlap_config = match OverlapConfigBuilder::default()
        .coordinate_sorted(matches!(settings.row_order, RowOrder::Coordinate))
        .build() {
        Ok(oc) => oc,
        Err(e) => {
            error!("Error while building overlap config: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    info!("Building overlap table...");
    let overlap_table = solve_overlap(&extracted, overlap_config);
    info!("Found {} distinct variant(s) across {} input file(s).", overlap_table.rows().len(), overlap_table.file_labels().len());

    // now write things
    info!("Saving overlap table to {:?}...", settings.output_filename);
    if let Err(e) = write_overlap_sheets(&overlap_table, &settings.output_filename) {
        error!("Error while saving overlap table: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    info!("Analysis completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn main() {
    let cli = get_cli();
    run_overlap(cli.settings);

    info!("Process finished successfully.");
}
