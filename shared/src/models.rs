use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A contract row as loaded from the contracts dataset.
///
/// Monetary and code columns that the source sometimes leaves blank are
/// `Option`; display formatting decides how a missing value is shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub ug: u32,
    pub descricao_ug: String,
    pub codigo_contrato: i64,
    pub codigo_contratante: Option<i64>,
    /// Raw taxpayer identifier digits (CPF or CNPJ); masked only for display.
    pub codigo_contratada: String,
    pub nome_contratante: String,
    pub nome_contratada: String,
    pub nome_contrato: String,
    pub natureza_contrato: String,
    pub data_inicio_vigencia: NaiveDate,
    pub data_fim_vigencia: NaiveDate,
    pub data_publicacao: Option<NaiveDate>,
    pub valor_total: f64,
    pub valor_concessao: Option<f64>,
    pub valor_multa: Option<f64>,
    pub valor_garantia: Option<f64>,
    pub valor_aditivo: Option<f64>,
    /// Outsourcing share as a fraction (the source stores "12,5%").
    pub percentual_terceirizacao: Option<f64>,
    pub cod_situacao: Option<i32>,
    /// Status description; may be blank, and blank rows are dropped by the
    /// contracts page before aggregation.
    pub dsc_situacao: String,
    pub cod_tipo_licitacao: Option<i32>,
    pub nom_tipo_licitacao: String,
}

/// A contract amendment ("aditivo"), keyed to a contract by numeric code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Amendment {
    pub cod_contrato: i64,
    pub tipo: String,
    pub num_original: String,
    pub num_processo: String,
    pub data_vigencia_inicial: NaiveDate,
    pub data_vigencia_final: NaiveDate,
    pub data_publicacao: Option<NaiveDate>,
    pub valor: Option<f64>,
    pub dsc_objeto: String,
}

/// One row of the UG reference table (code, name, acronym, parent unit).
/// Dimension data only; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UgInfo {
    pub ug: u32,
    pub nome_ug: String,
    pub sigla_ug: String,
    pub unidade: String,
}

/// A credential row from the login table. Passwords are stored as plain
/// integers in the source data; there is no hashing anywhere.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRecord {
    pub username: String,
    pub password: i64,
}

/// Row shape shared by the monthly datasets (expenses, per-diems, fuel,
/// budget advances): filtered by UG plus year/month ranges rather than by
/// date windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub ug: u32,
    pub ano: i32,
    pub mes: u32,
    pub categoria: String,
    pub valor: f64,
}

/// One staff member row. Staff data is keyed by the parent "Unidade"
/// grouping rather than by UG code, so the page resolves the selected
/// UG to its Unidade before filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffRecord {
    pub unidade: String,
    pub nome: String,
    pub cargo: String,
    pub valor: f64,
}

/// One bar/slice of a chart: a category, its numeric value, and an optional
/// preformatted label (the value bar charts embed "R$ ..." text per bar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub category: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A named series of chart points, ready for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

/// Headline metrics shown at the top of a dashboard page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    pub row_count: usize,
    /// Currency-formatted total, e.g. "R$ 1.234,56".
    pub total_value: String,
}

/// A fully formatted contract table row. Every field is a display string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractRow {
    pub codigo_contrato: String,
    pub ug: String,
    pub nome_contratante: String,
    pub nome_contratada: String,
    pub documento_contratada: String,
    pub valor_total: String,
    pub nome_contrato: String,
    pub data_inicio_vigencia: String,
    pub data_fim_vigencia: String,
    pub dsc_situacao: String,
}

/// A fully formatted aditivo table row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmendmentRow {
    pub cod_contrato: String,
    pub tipo: String,
    pub num_original: String,
    pub num_processo: String,
    pub data_vigencia_inicial: String,
    pub data_vigencia_final: String,
    pub data_publicacao: String,
    pub valor: String,
    pub dsc_objeto: String,
}

/// Everything the contracts page renders: subtitle, metrics, chart series,
/// the contract table and the aditivos section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractsView {
    pub ug_description: String,
    pub metrics: Metrics,
    /// Count distributions: by status, bid type, nature, contracting party.
    pub distributions: Vec<ChartSeries>,
    /// Total contract value summed by bid type, with currency labels.
    pub values_by_bid_type: ChartSeries,
    pub rows: Vec<ContractRow>,
    pub aditivos: Vec<AmendmentRow>,
    pub aditivos_total: String,
}

/// View for the generic monthly pages (expenses, per-diems, fuel, advances).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyView {
    pub ug_description: String,
    pub metrics: Metrics,
    pub count_by_category: ChartSeries,
    pub value_by_category: ChartSeries,
}

/// View for the staff page, labeled by the resolved Unidade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffView {
    pub unidade: String,
    pub metrics: Metrics,
    pub count_by_cargo: ChartSeries,
    pub value_by_cargo: ChartSeries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_series_json_shape() {
        let series = ChartSeries {
            name: "Situação".to_string(),
            points: vec![
                ChartPoint {
                    category: "Vigente".to_string(),
                    value: 2.0,
                    label: None,
                },
                ChartPoint {
                    category: "Encerrado".to_string(),
                    value: 1.0,
                    label: Some("R$ 1,00".to_string()),
                },
            ],
        };
        let json = serde_json::to_string(&series).unwrap();
        // Unlabeled points omit the label field entirely.
        assert!(!json.contains("\"label\":null"));
        assert!(json.contains("R$ 1,00"));

        let back: ChartSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back.points, series.points);
    }
}
