//! INI file configuration adapter.

use crate::domain::error::RebalancerError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RebalancerError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| RebalancerError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, RebalancerError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| RebalancerError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const FULL: &str = r#"
[portfolio]
tickers = 379800, 308620, 411060
weights = 0.5, 0.3, 0.2
start_date = 2022-01
initial_capital = 10000
require_unit_weights = yes

[data]
path = ./data

[report]
format = typst
"#;

    #[test]
    fn from_string_parses_all_sections() {
        let adapter = FileConfigAdapter::from_string(FULL).unwrap();
        assert_eq!(
            adapter.get_string("portfolio", "tickers"),
            Some("379800, 308620, 411060".to_string())
        );
        assert_eq!(
            adapter.get_double("portfolio", "initial_capital", 1.0).unwrap(),
            10000.0
        );
        assert!(adapter.get_bool("portfolio", "require_unit_weights", false).unwrap());
        assert_eq!(adapter.get_string("data", "path"), Some("./data".to_string()));
        assert_eq!(
            adapter.get_string("report", "format"),
            Some("typst".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[portfolio]\ntickers = A\n").unwrap();
        assert_eq!(adapter.get_string("portfolio", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_trimmed_treats_blank_as_absent() {
        let adapter = FileConfigAdapter::from_string("[portfolio]\nstart_date =\n").unwrap();
        assert_eq!(adapter.get_trimmed("portfolio", "start_date"), None);
    }

    #[test]
    fn get_double_rejects_non_numeric() {
        let adapter = FileConfigAdapter::from_string(
            "[portfolio]\ninitial_capital = lots\nweight_tolerance = 10_000\n",
        )
        .unwrap();
        assert!(matches!(
            adapter.get_double("portfolio", "initial_capital", 1.0),
            Err(RebalancerError::ConfigInvalid { key, .. }) if key == "initial_capital"
        ));
        assert!(adapter.get_double("portfolio", "weight_tolerance", 1e-6).is_err());
        assert_eq!(adapter.get_double("portfolio", "missing", 99.9).unwrap(), 99.9);
    }

    #[test]
    fn get_bool_accepts_common_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[portfolio]\na = true\nb = yes\nc = 1\nd = off\ne = No\nf = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("portfolio", "a", false).unwrap());
        assert!(adapter.get_bool("portfolio", "b", false).unwrap());
        assert!(adapter.get_bool("portfolio", "c", false).unwrap());
        assert!(!adapter.get_bool("portfolio", "d", true).unwrap());
        assert!(!adapter.get_bool("portfolio", "e", true).unwrap());
        assert!(!adapter.get_bool("portfolio", "missing", false).unwrap());
        assert!(matches!(
            adapter.get_bool("portfolio", "f", true),
            Err(RebalancerError::ConfigInvalid { key, .. }) if key == "f"
        ));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[data]\npath = /srv/prices\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("data", "path"),
            Some("/srv/prices".to_string())
        );
    }

    #[test]
    fn from_file_returns_config_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(
            result,
            Err(RebalancerError::ConfigParse { file, .. }) if file.contains("config.ini")
        ));
    }
}
