/*!
# Parsing module
Contains the logic for parsing input files into meaningful structs / data.
*/
/// Extracts normalized variant records from a single VCF file
pub mod vcf_records;
