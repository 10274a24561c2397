// Data access layer: CSV parsing plus the dataset catalog used by the
// dashboard services.
pub mod csv_parser;
pub mod datasets;
