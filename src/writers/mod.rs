/*!
# Writers module
Contains the logic for persisting the overlap table and its explanatory sheet.
*/
/// Writes the "Results" and "Explanation" sheets to the selected output format
pub mod overlap_sheets;
