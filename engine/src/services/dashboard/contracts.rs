// Contracts page pipeline: UG selection, two validity windows, status
// cleanup, metrics, chart series, the formatted contract table and the
// aditivos section keyed to the displayed contracts.
use std::collections::BTreeSet;

use crate::aggregate::{count_by, sum_by, with_currency_labels};
use crate::data::datasets::DatasetCatalog;
use crate::error::EngineError;
use crate::filter::{keyword_matches, DateWindow, UgSelection};
use crate::services::dashboard::UG_DESCRIPTION_FALLBACK;
use crate::session::Session;
use painel_shared::models::{
    Amendment, AmendmentRow, Contract, ContractRow, ContractsView, Metrics,
};
use painel_shared::utils::brazilian_format::{
    format_currency, format_date, format_opt_currency, format_opt_date, mask_document,
};

/// Sidebar state for the contracts page. Windows left as `None` default to
/// the dataset's own bounds, the way the sliders start out.
#[derive(Debug, Clone, Default)]
pub struct ContractsRequest {
    pub selected_ugs: Vec<u32>,
    pub validity_start_window: Option<DateWindow>,
    pub validity_end_window: Option<DateWindow>,
    pub keyword: Option<String>,
}

pub fn render(
    session: &Session,
    catalog: &DatasetCatalog,
    request: &ContractsRequest,
) -> Result<ContractsView, EngineError> {
    tracing::info!(
        username = %session.username,
        ugs = ?request.selected_ugs,
        "Rendering contracts dashboard"
    );

    let (aditivos, contracts) = catalog.load_contracts_data()?;
    let ug_info = catalog.load_ug_info()?;

    let selection = UgSelection::resolve(&request.selected_ugs, &ug_info);

    let start_window = request
        .validity_start_window
        .unwrap_or_else(|| window_from_dataset(&contracts, |c| c.data_inicio_vigencia));
    let end_window = request
        .validity_end_window
        .unwrap_or_else(|| window_from_dataset(&contracts, |c| c.data_fim_vigencia));

    let contracts = selection.filter(contracts, |c| c.ug);
    let contracts = start_window.filter(contracts, |c| c.data_inicio_vigencia);
    let contracts = end_window.filter(contracts, |c| c.data_fim_vigencia);

    // Rows with a blank status description never reach the page.
    let contracts: Vec<Contract> = contracts
        .into_iter()
        .filter(|c| !c.dsc_situacao.trim().is_empty())
        .collect();

    let ug_description = contracts
        .first()
        .map(|c| c.descricao_ug.clone())
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| UG_DESCRIPTION_FALLBACK.to_string());

    let total_value: f64 = contracts.iter().map(|c| c.valor_total).sum();
    let metrics = Metrics {
        row_count: contracts.len(),
        total_value: format_currency(total_value),
    };

    let distributions = vec![
        count_by(&contracts, "Situação", |c| c.dsc_situacao.as_str()),
        count_by(&contracts, "Tipo de Licitação", |c| c.nom_tipo_licitacao.as_str()),
        count_by(&contracts, "Natureza", |c| c.natureza_contrato.as_str()),
        count_by(&contracts, "Contratante", |c| c.nome_contratante.as_str()),
    ];

    let values_by_bid_type = with_currency_labels(sum_by(
        &contracts,
        "Valores Totais por Tipo de Licitação",
        |c| c.nom_tipo_licitacao.as_str(),
        |c| c.valor_total,
    ));

    let keyword = request.keyword.as_deref().unwrap_or("");
    let rows: Vec<ContractRow> = contracts
        .iter()
        .map(to_row)
        .filter(|r| {
            keyword_matches(
                [
                    r.codigo_contrato.as_str(),
                    r.ug.as_str(),
                    r.nome_contratante.as_str(),
                    r.nome_contratada.as_str(),
                    r.documento_contratada.as_str(),
                    r.valor_total.as_str(),
                    r.nome_contrato.as_str(),
                    r.data_inicio_vigencia.as_str(),
                    r.data_fim_vigencia.as_str(),
                    r.dsc_situacao.as_str(),
                ],
                keyword,
            )
        })
        .collect();

    // Aditivos follow the contracts actually displayed, matched by numeric
    // contract code.
    let displayed_codes: BTreeSet<i64> = rows
        .iter()
        .filter_map(|r| r.codigo_contrato.parse::<i64>().ok())
        .collect();
    let aditivos: Vec<Amendment> = aditivos
        .into_iter()
        .filter(|a| displayed_codes.contains(&a.cod_contrato))
        .collect();

    let aditivos_total: f64 = aditivos.iter().filter_map(|a| a.valor).sum();
    let aditivos_rows: Vec<AmendmentRow> = aditivos.iter().map(to_amendment_row).collect();

    tracing::info!(
        rows = rows.len(),
        aditivos = aditivos_rows.len(),
        "Contracts dashboard ready"
    );

    Ok(ContractsView {
        ug_description,
        metrics,
        distributions,
        values_by_bid_type,
        rows,
        aditivos: aditivos_rows,
        aditivos_total: format_currency(aditivos_total),
    })
}

/// Window spanning the dataset's own min/max for one date column, widened
/// when the bounds collapse to a single day.
fn window_from_dataset(
    contracts: &[Contract],
    date_of: impl Fn(&Contract) -> chrono::NaiveDate,
) -> DateWindow {
    let first = match contracts.first() {
        Some(c) => date_of(c),
        // Loaders reject empty contract datasets, so this is unreachable in
        // practice; any date makes an empty-over-empty window.
        None => chrono::NaiveDate::MIN,
    };
    let (min, max) = contracts
        .iter()
        .map(date_of)
        .fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    DateWindow::from_bounds(min, max)
}

fn to_row(c: &Contract) -> ContractRow {
    ContractRow {
        codigo_contrato: c.codigo_contrato.to_string(),
        ug: c.ug.to_string(),
        nome_contratante: c.nome_contratante.clone(),
        nome_contratada: c.nome_contratada.clone(),
        documento_contratada: mask_document(&c.codigo_contratada),
        valor_total: format_currency(c.valor_total),
        nome_contrato: c.nome_contrato.to_uppercase(),
        data_inicio_vigencia: format_date(c.data_inicio_vigencia),
        data_fim_vigencia: format_date(c.data_fim_vigencia),
        dsc_situacao: c.dsc_situacao.clone(),
    }
}

fn to_amendment_row(a: &Amendment) -> AmendmentRow {
    AmendmentRow {
        cod_contrato: a.cod_contrato.to_string(),
        tipo: a.tipo.clone(),
        num_original: a.num_original.clone(),
        num_processo: a.num_processo.clone(),
        data_vigencia_inicial: format_date(a.data_vigencia_inicial),
        data_vigencia_final: format_date(a.data_vigencia_final),
        data_publicacao: format_opt_date(a.data_publicacao),
        valor: format_opt_currency(a.valor),
        dsc_objeto: a.dsc_objeto.clone(),
    }
}
