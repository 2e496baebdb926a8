
/// Contains the wide overlap table that gets written at the end of a run
pub mod overlap_table;
/// Contains the normalized per-line variant record and key derivation
pub mod variant_record;
