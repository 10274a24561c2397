// Shared pipeline for the monthly dashboards: detailed expenses, per-diems,
// fuel and budget advances all filter the same row shape by UG plus
// year/month ranges, then chart counts and sums per category.
use crate::aggregate::{count_by, sum_by, with_currency_labels};
use crate::data::datasets::DatasetCatalog;
use crate::error::EngineError;
use crate::filter::{UgSelection, YearMonthRange};
use crate::services::dashboard::UG_DESCRIPTION_FALLBACK;
use crate::session::Session;
use painel_shared::models::{Metrics, MonthlyRecord, MonthlyView};
use painel_shared::utils::brazilian_format::format_currency;

/// Sidebar state for a monthly page. A `None` range defaults to the
/// dataset's own year bounds with the full month span.
#[derive(Debug, Clone)]
pub struct MonthlyRequest {
    /// Dataset file name under the database directory, e.g. "DIARIAS.csv".
    pub dataset: String,
    pub selected_ugs: Vec<u32>,
    pub range: Option<YearMonthRange>,
}

pub fn render(
    session: &Session,
    catalog: &DatasetCatalog,
    request: &MonthlyRequest,
) -> Result<MonthlyView, EngineError> {
    tracing::info!(
        username = %session.username,
        dataset = %request.dataset,
        ugs = ?request.selected_ugs,
        "Rendering monthly dashboard"
    );

    let rows = catalog.load_monthly_data(&request.dataset)?;
    let ug_info = catalog.load_ug_info()?;

    let selection = UgSelection::resolve(&request.selected_ugs, &ug_info);
    let range = request.range.unwrap_or_else(|| range_from_dataset(&rows));

    let rows = selection.filter(rows, |r| r.ug);
    let rows = range.filter(rows, |r| (r.ano, r.mes));

    let ug_description = selection
        .first()
        .and_then(|code| ug_info.iter().find(|u| u.ug == code))
        .map(|u| u.nome_ug.clone())
        .unwrap_or_else(|| UG_DESCRIPTION_FALLBACK.to_string());

    let total: f64 = rows.iter().map(|r| r.valor).sum();
    let metrics = Metrics {
        row_count: rows.len(),
        total_value: format_currency(total),
    };

    let count_by_category = count_by(&rows, "Quantidade por Categoria", |r| r.categoria.as_str());
    let value_by_category = with_currency_labels(sum_by(
        &rows,
        "Valores por Categoria",
        |r| r.categoria.as_str(),
        |r| r.valor,
    ));

    Ok(MonthlyView {
        ug_description,
        metrics,
        count_by_category,
        value_by_category,
    })
}

/// Year bounds taken from the dataset itself, widened for single-year data
/// so the slider keeps two endpoints.
fn range_from_dataset(rows: &[MonthlyRecord]) -> YearMonthRange {
    let first = rows.first().map(|r| r.ano).unwrap_or(0);
    let (min, max) = rows
        .iter()
        .map(|r| r.ano)
        .fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
    YearMonthRange::from_year_bounds(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::Settings;
    use std::io::Write;

    fn write_database(dir: &std::path::Path, monthly: &str) {
        let mut f = std::fs::File::create(dir.join("DIARIAS.csv")).unwrap();
        writeln!(f, "{}", monthly).unwrap();
        let mut f = std::fs::File::create(dir.join("UGS-COD-NOME-SIGLA.csv")).unwrap();
        writeln!(
            f,
            "UG;NOME_UG;SIGLA_UG;Unidade\n100;SECRETARIA DE GESTAO;SEGES;Administracao Direta"
        )
        .unwrap();
    }

    fn catalog(dir: &std::path::Path) -> DatasetCatalog {
        DatasetCatalog::new(&Settings {
            database_dir: dir.to_path_buf(),
            ..Settings::default()
        })
    }

    fn request(ugs: Vec<u32>, range: Option<YearMonthRange>) -> MonthlyRequest {
        MonthlyRequest {
            dataset: "DIARIAS.csv".to_string(),
            selected_ugs: ugs,
            range,
        }
    }

    #[test]
    fn test_monthly_render_counts_and_sums() {
        let dir = tempfile::tempdir().unwrap();
        write_database(
            dir.path(),
            "UG;ANO;MES;CATEGORIA;VALOR\n100;2024;1;Diarias;100,00\n100;2024;2;Diarias;50,00\n100;2024;2;Passagens;25,00",
        );
        let session = Session::new("gestor");

        let view = render(&session, &catalog(dir.path()), &request(vec![100], None)).unwrap();
        assert_eq!(view.metrics.row_count, 3);
        assert_eq!(view.metrics.total_value, "R$ 175,00");
        assert_eq!(view.ug_description, "SECRETARIA DE GESTAO");

        let diarias = view
            .count_by_category
            .points
            .iter()
            .find(|p| p.category == "Diarias")
            .unwrap();
        assert_eq!(diarias.value, 2.0);

        let valores = view
            .value_by_category
            .points
            .iter()
            .find(|p| p.category == "Diarias")
            .unwrap();
        assert_eq!(valores.label.as_deref(), Some("R$ 150,00"));
    }

    #[test]
    fn test_month_range_narrows_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_database(
            dir.path(),
            "UG;ANO;MES;CATEGORIA;VALOR\n100;2024;1;Diarias;100,00\n100;2024;6;Diarias;50,00",
        );
        let session = Session::new("gestor");
        let range = YearMonthRange::new(2024, 2024, 1, 3);

        let view = render(
            &session,
            &catalog(dir.path()),
            &request(vec![100], Some(range)),
        )
        .unwrap();
        assert_eq!(view.metrics.row_count, 1);
    }

    #[test]
    fn test_empty_selection_yields_empty_metrics() {
        let dir = tempfile::tempdir().unwrap();
        write_database(
            dir.path(),
            "UG;ANO;MES;CATEGORIA;VALOR\n100;2024;1;Diarias;100,00",
        );
        let session = Session::new("gestor");

        let view = render(&session, &catalog(dir.path()), &request(vec![], None)).unwrap();
        assert_eq!(view.metrics.row_count, 0);
        assert_eq!(view.metrics.total_value, "R$ 0,00");
        assert!(view.count_by_category.points.is_empty());
        assert_eq!(view.ug_description, UG_DESCRIPTION_FALLBACK);
    }
}
