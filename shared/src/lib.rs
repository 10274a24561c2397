pub mod models;
pub mod utils;

// Domain records, render-ready view structures and the pt-BR display
// formatting live here so the engine and the presentation layer agree on
// one schema. Parsing of the raw CSV columns stays in the engine.
