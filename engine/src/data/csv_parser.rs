use anyhow::{anyhow, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use painel_shared::models::{Amendment, Contract, LoginRecord, MonthlyRecord, StaffRecord, UgInfo};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// Module for Brazilian number and date format handling. Display-side
// formatting (currency strings, masking) lives in painel_shared::utils;
// this is the parsing side only.
pub mod brazilian_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate};
    use std::str::FromStr;

    // Parses decimals like "1.234,56" or "123,45" into f64
    pub fn parse_decimal(s: &str) -> Result<f64> {
        let normalized = s
            .trim()
            .replace('.', "") // Remove thousand separators
            .replace(',', "."); // Replace decimal separator

        f64::from_str(&normalized).map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))
    }

    // Percentage like "12,5%" into the fraction 0.125; a bare "12,5" is
    // accepted the same way.
    pub fn parse_percent(s: &str) -> Result<f64> {
        let stripped = s.trim().trim_end_matches('%');
        Ok(parse_decimal(stripped)? / 100.0)
    }

    // Parses a "dd/mm/yyyy" date
    pub fn parse_date(s: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y")
            .map_err(|e| anyhow!("Failed to parse date '{}': {}", s, e))
    }

    // The validity and aditivo date columns are stored as milliseconds
    // since the Unix epoch.
    pub fn parse_epoch_ms_date(s: &str) -> Result<NaiveDate> {
        let millis = i64::from_str(s.trim())
            .map_err(|e| anyhow!("Failed to parse epoch millis '{}': {}", s, e))?;
        DateTime::from_timestamp_millis(millis)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| anyhow!("Epoch millis '{}' out of range", s))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::Datelike;

        #[test]
        fn test_parse_decimal_simple() {
            assert_eq!(parse_decimal("123,45").unwrap(), 123.45);
        }

        #[test]
        fn test_parse_decimal_with_thousands() {
            assert_eq!(parse_decimal("1.234,56").unwrap(), 1234.56);
        }

        #[test]
        fn test_parse_decimal_large_number() {
            assert_eq!(parse_decimal("600.822.115,84").unwrap(), 600822115.84);
        }

        #[test]
        fn test_parse_percent() {
            assert_eq!(parse_percent("12,5%").unwrap(), 0.125);
            assert_eq!(parse_percent("100%").unwrap(), 1.0);
        }

        #[test]
        fn test_parse_date_valid() {
            let d = parse_date("30/12/2024").unwrap();
            assert_eq!(d.year(), 2024);
            assert_eq!(d.month(), 12);
            assert_eq!(d.day(), 30);
        }

        #[test]
        fn test_parse_date_invalid() {
            assert!(parse_date("32/12/2024").is_err());
            assert!(parse_date("2024-12-30").is_err());
        }

        #[test]
        fn test_parse_epoch_ms_date() {
            // 2024-12-30T00:00:00Z
            let d = parse_epoch_ms_date("1735516800000").unwrap();
            assert_eq!(d, NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
        }

        #[test]
        fn test_parse_epoch_ms_date_invalid() {
            assert!(parse_epoch_ms_date("not-a-number").is_err());
        }
    }
}

pub struct BrazilianCsvParser;

impl BrazilianCsvParser {
    fn open(path: &Path) -> Result<Reader<BufReader<File>>> {
        let file = File::open(path)
            .map_err(|e| anyhow!("Failed to open CSV file '{}': {}", path.display(), e))?;
        Ok(ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .from_reader(BufReader::new(file)))
    }

    // CSV Header: UG;DESCRICAO_UG;CODIGO_CONTRATO;CODIGO_CONTRATANTE;
    //   CODIGO_CONTRATADA;NOME_CONTRATANTE;NOME_CONTRATADA;NOME_CONTRATO;
    //   NATUREZA_CONTRATO;DATA_INICIO_VIGENCIA;DATA_FIM_VIGENCIA;
    //   DATA_PUBLICACAO;VALOR_TOTAL;VALOR_CONCESSAO;VALOR_MULTA;
    //   VALOR_GARANTIA;VALOR_ADITIVO;VALOR_PERCENTUAL_TERCEIR;
    //   COD_SITUACAO;DSC_SITUACAO;COD_TIPO_LICITACAO;NOM_TIPO_LICITACAO
    // Validity dates are epoch millis; DATA_PUBLICACAO is dd/mm/yyyy.
    pub fn load_contracts(path: &Path) -> Result<Vec<Contract>> {
        let mut rdr = Self::open(path)?;
        let headers = rdr.headers()?.clone();

        let mut contracts = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record =
                result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;

            let ug = Self::required(&record, &headers, "UG", line)?
                .parse::<u32>()
                .map_err(|e| anyhow!("Error parsing 'UG' at line {}: {}", line, e))?;
            let codigo_contrato = Self::required(&record, &headers, "CODIGO_CONTRATO", line)?
                .parse::<i64>()
                .map_err(|e| anyhow!("Error parsing 'CODIGO_CONTRATO' at line {}: {}", line, e))?;

            let data_inicio_vigencia = brazilian_format::parse_epoch_ms_date(Self::required(
                &record,
                &headers,
                "DATA_INICIO_VIGENCIA",
                line,
            )?)
            .map_err(|e| anyhow!("Error parsing 'DATA_INICIO_VIGENCIA' at line {}: {}", line, e))?;
            let data_fim_vigencia = brazilian_format::parse_epoch_ms_date(Self::required(
                &record,
                &headers,
                "DATA_FIM_VIGENCIA",
                line,
            )?)
            .map_err(|e| anyhow!("Error parsing 'DATA_FIM_VIGENCIA' at line {}: {}", line, e))?;

            // Unvalidated in the source data; keep the row but leave a trace.
            if data_fim_vigencia < data_inicio_vigencia {
                tracing::warn!(
                    line,
                    codigo_contrato,
                    %data_inicio_vigencia,
                    %data_fim_vigencia,
                    "Contract validity end precedes start"
                );
            }

            // Unparseable publication dates are coerced to null.
            let data_publicacao = Self::optional(&record, &headers, "DATA_PUBLICACAO").and_then(
                |s| match brazilian_format::parse_date(s) {
                    Ok(d) => Some(d),
                    Err(_) => {
                        tracing::warn!(line, value = s, "Coercing bad 'DATA_PUBLICACAO' to null");
                        None
                    }
                },
            );

            let valor_total = Self::coerced_decimal(
                Self::optional(&record, &headers, "VALOR_TOTAL"),
                "VALOR_TOTAL",
                line,
            )
            .unwrap_or(0.0);

            let percentual_terceirizacao =
                Self::optional(&record, &headers, "VALOR_PERCENTUAL_TERCEIR")
                    .and_then(|s| brazilian_format::parse_percent(s).ok());

            contracts.push(Contract {
                ug,
                descricao_ug: Self::optional(&record, &headers, "DESCRICAO_UG")
                    .unwrap_or_default()
                    .to_string(),
                codigo_contrato,
                codigo_contratante: Self::optional(&record, &headers, "CODIGO_CONTRATANTE")
                    .and_then(|s| s.parse::<i64>().ok()),
                codigo_contratada: Self::optional(&record, &headers, "CODIGO_CONTRATADA")
                    .unwrap_or_default()
                    .to_string(),
                nome_contratante: Self::optional(&record, &headers, "NOME_CONTRATANTE")
                    .unwrap_or_default()
                    .to_string(),
                nome_contratada: Self::optional(&record, &headers, "NOME_CONTRATADA")
                    .unwrap_or_default()
                    .to_string(),
                nome_contrato: Self::optional(&record, &headers, "NOME_CONTRATO")
                    .unwrap_or_default()
                    .to_string(),
                natureza_contrato: Self::optional(&record, &headers, "NATUREZA_CONTRATO")
                    .unwrap_or_default()
                    .to_string(),
                data_inicio_vigencia,
                data_fim_vigencia,
                data_publicacao,
                valor_total,
                valor_concessao: Self::coerced_decimal(
                    Self::optional(&record, &headers, "VALOR_CONCESSAO"),
                    "VALOR_CONCESSAO",
                    line,
                ),
                valor_multa: Self::coerced_decimal(
                    Self::optional(&record, &headers, "VALOR_MULTA"),
                    "VALOR_MULTA",
                    line,
                ),
                valor_garantia: Self::coerced_decimal(
                    Self::optional(&record, &headers, "VALOR_GARANTIA"),
                    "VALOR_GARANTIA",
                    line,
                ),
                valor_aditivo: Self::coerced_decimal(
                    Self::optional(&record, &headers, "VALOR_ADITIVO"),
                    "VALOR_ADITIVO",
                    line,
                ),
                percentual_terceirizacao,
                cod_situacao: Self::optional(&record, &headers, "COD_SITUACAO")
                    .and_then(|s| s.parse::<i32>().ok()),
                dsc_situacao: Self::optional(&record, &headers, "DSC_SITUACAO")
                    .unwrap_or_default()
                    .to_string(),
                cod_tipo_licitacao: Self::optional(&record, &headers, "COD_TIPO_LICITACAO")
                    .and_then(|s| s.parse::<i32>().ok()),
                nom_tipo_licitacao: Self::optional(&record, &headers, "NOM_TIPO_LICITACAO")
                    .unwrap_or_default()
                    .to_string(),
            });
        }
        Ok(contracts)
    }

    // CSV Header: COD_CONTRATO;TIPO;NUM_ORIGINAL;NUM_PROCESSO;
    //   DATA_VIGENCIA_INICIAL;DATA_VIGENCIA_FINAL;DATA_PUBLICACAO;VALOR;DSC_OBJETO
    // All three date columns are epoch millis in the aditivos dataset.
    pub fn load_amendments(path: &Path) -> Result<Vec<Amendment>> {
        let mut rdr = Self::open(path)?;
        let headers = rdr.headers()?.clone();

        let mut amendments = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record =
                result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;

            let cod_contrato = Self::required(&record, &headers, "COD_CONTRATO", line)?
                .parse::<i64>()
                .map_err(|e| anyhow!("Error parsing 'COD_CONTRATO' at line {}: {}", line, e))?;

            let data_vigencia_inicial = brazilian_format::parse_epoch_ms_date(Self::required(
                &record,
                &headers,
                "DATA_VIGENCIA_INICIAL",
                line,
            )?)
            .map_err(|e| anyhow!("Error parsing 'DATA_VIGENCIA_INICIAL' at line {}: {}", line, e))?;
            let data_vigencia_final = brazilian_format::parse_epoch_ms_date(Self::required(
                &record,
                &headers,
                "DATA_VIGENCIA_FINAL",
                line,
            )?)
            .map_err(|e| anyhow!("Error parsing 'DATA_VIGENCIA_FINAL' at line {}: {}", line, e))?;

            let data_publicacao = Self::optional(&record, &headers, "DATA_PUBLICACAO")
                .and_then(|s| brazilian_format::parse_epoch_ms_date(s).ok());

            // VALOR is coerced like the financial columns of the contracts
            // dataset: blank or malformed becomes null, shown as "R$ 0,00".
            let valor = Self::coerced_decimal(
                Self::optional(&record, &headers, "VALOR"),
                "VALOR",
                line,
            );

            amendments.push(Amendment {
                cod_contrato,
                tipo: Self::optional(&record, &headers, "TIPO")
                    .unwrap_or_default()
                    .to_string(),
                num_original: Self::optional(&record, &headers, "NUM_ORIGINAL")
                    .unwrap_or_default()
                    .to_string(),
                num_processo: Self::optional(&record, &headers, "NUM_PROCESSO")
                    .unwrap_or_default()
                    .to_string(),
                data_vigencia_inicial,
                data_vigencia_final,
                data_publicacao,
                valor,
                dsc_objeto: Self::optional(&record, &headers, "DSC_OBJETO")
                    .unwrap_or_default()
                    .to_string(),
            });
        }
        Ok(amendments)
    }

    // CSV Header: UG;NOME_UG;SIGLA_UG;Unidade
    pub fn load_ug_info(path: &Path) -> Result<Vec<UgInfo>> {
        let mut rdr = Self::open(path)?;
        let headers = rdr.headers()?.clone();

        let mut units = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record =
                result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;

            units.push(UgInfo {
                ug: Self::required(&record, &headers, "UG", line)?
                    .parse::<u32>()
                    .map_err(|e| anyhow!("Error parsing 'UG' at line {}: {}", line, e))?,
                nome_ug: Self::optional(&record, &headers, "NOME_UG")
                    .unwrap_or_default()
                    .to_string(),
                sigla_ug: Self::optional(&record, &headers, "SIGLA_UG")
                    .unwrap_or_default()
                    .to_string(),
                unidade: Self::optional(&record, &headers, "Unidade")
                    .unwrap_or_default()
                    .to_string(),
            });
        }
        Ok(units)
    }

    // CSV Header: username;password
    // Usernames are stored with stray whitespace in the source file, so
    // they are trimmed on load; the password column is a plain integer.
    pub fn load_logins(path: &Path) -> Result<Vec<LoginRecord>> {
        let mut rdr = Self::open(path)?;
        let headers = rdr.headers()?.clone();

        let mut logins = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record =
                result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;

            logins.push(LoginRecord {
                username: Self::required(&record, &headers, "username", line)?
                    .trim()
                    .to_string(),
                password: Self::required(&record, &headers, "password", line)?
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| anyhow!("Error parsing 'password' at line {}: {}", line, e))?,
            });
        }
        Ok(logins)
    }

    // CSV Header: UG;ANO;MES;CATEGORIA;VALOR
    // Row shape shared by the expense-style datasets (per-diems, fuel,
    // budget advances): one value per UG, year, month and category.
    pub fn load_monthly(path: &Path) -> Result<Vec<MonthlyRecord>> {
        let mut rdr = Self::open(path)?;
        let headers = rdr.headers()?.clone();

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record =
                result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;

            rows.push(MonthlyRecord {
                ug: Self::required(&record, &headers, "UG", line)?
                    .parse::<u32>()
                    .map_err(|e| anyhow!("Error parsing 'UG' at line {}: {}", line, e))?,
                ano: Self::required(&record, &headers, "ANO", line)?
                    .parse::<i32>()
                    .map_err(|e| anyhow!("Error parsing 'ANO' at line {}: {}", line, e))?,
                mes: Self::required(&record, &headers, "MES", line)?
                    .parse::<u32>()
                    .map_err(|e| anyhow!("Error parsing 'MES' at line {}: {}", line, e))?,
                categoria: Self::optional(&record, &headers, "CATEGORIA")
                    .unwrap_or_default()
                    .to_string(),
                valor: brazilian_format::parse_decimal(Self::required(
                    &record, &headers, "VALOR", line,
                )?)
                .map_err(|e| anyhow!("Error parsing 'VALOR' at line {}: {}", line, e))?,
            });
        }
        Ok(rows)
    }

    // CSV Header: Unidade;NOME;CARGO;VALOR
    // Staff rows are keyed by the parent "Unidade" grouping, not by UG code.
    pub fn load_staff(path: &Path) -> Result<Vec<StaffRecord>> {
        let mut rdr = Self::open(path)?;
        let headers = rdr.headers()?.clone();

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record =
                result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;

            rows.push(StaffRecord {
                unidade: Self::required(&record, &headers, "Unidade", line)?.to_string(),
                nome: Self::required(&record, &headers, "NOME", line)?.to_string(),
                cargo: Self::optional(&record, &headers, "CARGO")
                    .unwrap_or_default()
                    .to_string(),
                valor: brazilian_format::parse_decimal(Self::required(
                    &record, &headers, "VALOR", line,
                )?)
                .map_err(|e| anyhow!("Error parsing 'VALOR' at line {}: {}", line, e))?,
            });
        }
        Ok(rows)
    }

    // Helper to get a mandatory field by header name. Looking fields up by
    // name keeps parsing robust to column reordering.
    fn required<'a>(
        record: &'a StringRecord,
        headers: &StringRecord,
        name: &str,
        line: usize,
    ) -> Result<&'a str> {
        Self::field(record, headers, name)
            .ok_or_else(|| anyhow!("Missing '{}' field in CSV record at line {}", name, line))
    }

    // Optional field: absent column or blank value becomes None.
    fn optional<'a>(
        record: &'a StringRecord,
        headers: &StringRecord,
        name: &str,
    ) -> Option<&'a str> {
        Self::field(record, headers, name).filter(|s| !s.trim().is_empty())
    }

    fn field<'a>(
        record: &'a StringRecord,
        headers: &StringRecord,
        name: &str,
    ) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header == name)
            .and_then(|pos| record.get(pos))
    }

    // Financial columns are coerced: a value that does not parse becomes
    // null instead of failing the whole load.
    fn coerced_decimal(raw: Option<&str>, column: &str, line: usize) -> Option<f64> {
        let s = raw?;
        match brazilian_format::parse_decimal(s) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(line, column, value = s, "Coercing bad decimal to null");
                None
            }
        }
    }
}
