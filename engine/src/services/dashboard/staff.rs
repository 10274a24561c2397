// Staff page pipeline. The roster is keyed by the parent "Unidade"
// grouping rather than by UG code, so the first selected UG is resolved
// to its Unidade and the page filters and labels by that.
use crate::aggregate::{count_by, sum_by, with_currency_labels};
use crate::data::datasets::DatasetCatalog;
use crate::error::EngineError;
use crate::filter::UgSelection;
use crate::services::dashboard::UG_DESCRIPTION_FALLBACK;
use crate::session::Session;
use painel_shared::models::{Metrics, StaffView};
use painel_shared::utils::brazilian_format::format_currency;

/// Sidebar state for the staff page. Only the UG selection matters here;
/// the page derives its Unidade from the first selected code.
#[derive(Debug, Clone, Default)]
pub struct StaffRequest {
    pub selected_ugs: Vec<u32>,
}

pub fn render(
    session: &Session,
    catalog: &DatasetCatalog,
    request: &StaffRequest,
) -> Result<StaffView, EngineError> {
    tracing::info!(
        username = %session.username,
        ugs = ?request.selected_ugs,
        "Rendering staff dashboard"
    );

    let rows = catalog.load_staff_data()?;
    let ug_info = catalog.load_ug_info()?;

    let selection = UgSelection::resolve(&request.selected_ugs, &ug_info);

    // An unresolvable selection renders an empty page instead of failing.
    let resolved = selection.unidade(&ug_info).map(str::to_string);
    let rows = match resolved.as_deref() {
        Some(unidade) => rows
            .into_iter()
            .filter(|r| r.unidade == unidade)
            .collect::<Vec<_>>(),
        None => Vec::new(),
    };

    let unidade = resolved.unwrap_or_else(|| UG_DESCRIPTION_FALLBACK.to_string());

    let total: f64 = rows.iter().map(|r| r.valor).sum();
    let metrics = Metrics {
        row_count: rows.len(),
        total_value: format_currency(total),
    };

    let count_by_cargo = count_by(&rows, "Quantidade por Cargo", |r| r.cargo.as_str());
    let value_by_cargo = with_currency_labels(sum_by(
        &rows,
        "Valores por Cargo",
        |r| r.cargo.as_str(),
        |r| r.valor,
    ));

    Ok(StaffView {
        unidade,
        metrics,
        count_by_cargo,
        value_by_cargo,
    })
}
