//! Configuration access port trait.

use crate::domain::error::RebalancerError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Value with surrounding whitespace removed; blank values read as absent.
    fn get_trimmed(&self, section: &str, key: &str) -> Option<String> {
        self.get_string(section, key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// `default` when the key is absent; a present value must parse.
    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, RebalancerError> {
        match self.get_trimmed(section, key) {
            None => Ok(default),
            Some(raw) => raw.parse::<f64>().map_err(|_| RebalancerError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("'{raw}' is not a number"),
            }),
        }
    }

    /// `default` when the key is absent; a present value must be one of
    /// true/yes/on/1 or false/no/off/0.
    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, RebalancerError> {
        match self.get_trimmed(section, key) {
            None => Ok(default),
            Some(raw) => match raw.to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(true),
                "false" | "no" | "off" | "0" => Ok(false),
                _ => Err(RebalancerError::ConfigInvalid {
                    section: section.to_string(),
                    key: key.to_string(),
                    reason: format!("'{raw}' is not a boolean"),
                }),
            },
        }
    }
}
