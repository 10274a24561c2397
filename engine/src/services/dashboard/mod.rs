// One module per dashboard page. The contracts page has its own pipeline;
// the expense-style pages (per-diems, fuel, advances, detailed expenses)
// share the monthly pipeline; the staff page filters by the resolved
// parent Unidade instead of by UG code.
pub mod contracts;
pub mod monthly;
pub mod staff;

/// Subtitle fallback when no description is available for the selection.
pub const UG_DESCRIPTION_FALLBACK: &str = "Descrição não encontrada";
