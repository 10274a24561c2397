// Catalog of the datasets under the database directory. Every page render
// goes back to disk: datasets are loaded, filtered and discarded, with no
// caching between renders.
use crate::config::settings::Settings;
use crate::data::csv_parser::BrazilianCsvParser;
use crate::error::EngineError;
use painel_shared::models::{Amendment, Contract, LoginRecord, MonthlyRecord, StaffRecord, UgInfo};
use std::path::PathBuf;

pub struct DatasetCatalog {
    database_dir: PathBuf,
}

impl DatasetCatalog {
    pub fn new(settings: &Settings) -> Self {
        DatasetCatalog {
            database_dir: settings.database_dir.clone(),
        }
    }

    fn path(&self, file_name: &str) -> PathBuf {
        self.database_dir.join(file_name)
    }

    /// Contracts plus their aditivos. Either dataset being absent or empty
    /// halts the page with a user-visible message.
    pub fn load_contracts_data(&self) -> Result<(Vec<Amendment>, Vec<Contract>), EngineError> {
        let contracts = BrazilianCsvParser::load_contracts(&self.path("CONTRATOS.csv"))?;
        let aditivos = BrazilianCsvParser::load_amendments(&self.path("ADITIVOS.csv"))?;

        if contracts.is_empty() {
            return Err(EngineError::EmptyDataset("contratos".to_string()));
        }
        if aditivos.is_empty() {
            return Err(EngineError::EmptyDataset("aditivos".to_string()));
        }

        tracing::info!(
            contracts = contracts.len(),
            aditivos = aditivos.len(),
            "Loaded contracts datasets"
        );
        Ok((aditivos, contracts))
    }

    /// UG reference table (code, name, acronym, parent unit).
    pub fn load_ug_info(&self) -> Result<Vec<UgInfo>, EngineError> {
        let units = BrazilianCsvParser::load_ug_info(&self.path("UGS-COD-NOME-SIGLA.csv"))?;
        if units.is_empty() {
            return Err(EngineError::EmptyDataset("unidades gestoras".to_string()));
        }
        tracing::info!(units = units.len(), "Loaded UG reference table");
        Ok(units)
    }

    pub fn load_login_data(&self) -> Result<Vec<LoginRecord>, EngineError> {
        let logins = BrazilianCsvParser::load_logins(&self.path("login.csv"))?;
        if logins.is_empty() {
            return Err(EngineError::EmptyDataset("login".to_string()));
        }
        Ok(logins)
    }

    /// One of the monthly expense-style datasets (per-diems, fuel, budget
    /// advances, detailed expenses), by file name.
    pub fn load_monthly_data(&self, file_name: &str) -> Result<Vec<MonthlyRecord>, EngineError> {
        let rows = BrazilianCsvParser::load_monthly(&self.path(file_name))?;
        if rows.is_empty() {
            return Err(EngineError::EmptyDataset(file_name.to_string()));
        }
        tracing::info!(dataset = file_name, rows = rows.len(), "Loaded monthly dataset");
        Ok(rows)
    }

    /// Staff roster, keyed by the parent "Unidade" grouping.
    pub fn load_staff_data(&self) -> Result<Vec<StaffRecord>, EngineError> {
        let rows = BrazilianCsvParser::load_staff(&self.path("SERVIDORES.csv"))?;
        if rows.is_empty() {
            return Err(EngineError::EmptyDataset("servidores".to_string()));
        }
        tracing::info!(rows = rows.len(), "Loaded staff dataset");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn catalog_with(files: &[(&str, &str)]) -> (tempfile::TempDir, DatasetCatalog) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let mut f = std::fs::File::create(dir.path().join(name)).unwrap();
            writeln!(f, "{}", content).unwrap();
        }
        let settings = Settings {
            database_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };
        let catalog = DatasetCatalog::new(&settings);
        (dir, catalog)
    }

    #[test]
    fn test_empty_login_dataset_is_an_error() {
        let (_dir, catalog) = catalog_with(&[("login.csv", "username;password")]);
        let err = catalog.load_login_data().unwrap_err();
        assert!(matches!(err, EngineError::EmptyDataset(_)));
        assert!(err.to_string().contains("login"));
    }

    #[test]
    fn test_missing_file_is_an_io_style_error() {
        let (_dir, catalog) = catalog_with(&[]);
        assert!(catalog.load_ug_info().is_err());
    }

    #[test]
    fn test_load_staff_data() {
        let (_dir, catalog) = catalog_with(&[(
            "SERVIDORES.csv",
            "Unidade;NOME;CARGO;VALOR\nAdministracao Direta;MARIA DA SILVA;Analista;5.500,00",
        )]);
        let rows = catalog.load_staff_data().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].unidade, "Administracao Direta");
    }

    #[test]
    fn test_malformed_field_error_carries_line_number() {
        let (_dir, catalog) = catalog_with(&[(
            "SERVIDORES.csv",
            "Unidade;NOME;CARGO;VALOR\nAdministracao Direta;MARIA DA SILVA;Analista;abc",
        )]);
        let err = catalog.load_staff_data().unwrap_err();
        assert!(err.to_string().contains("line 2"), "got: {}", err);
    }

    #[test]
    fn test_load_login_data() {
        let (_dir, catalog) =
            catalog_with(&[("login.csv", "username;password\ngestor;1234")]);
        let logins = catalog.load_login_data().unwrap();
        assert_eq!(logins.len(), 1);
        assert_eq!(logins[0].username, "gestor");
    }
}
