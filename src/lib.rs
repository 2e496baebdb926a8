
/// Command line interface functionality
pub mod cli;
/// Contains various shared data types
pub mod data_types;
/// Contains the core logic for folding per-file records into the overlap table
pub mod overlap_solver;
/// Tooling for parsing input files into meaningful structs / data
pub mod parsing;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;
