//! Ticker and weight list parsing.
//!
//! Both lists are comma separated and positionally paired: the n-th weight
//! belongs to the n-th ticker.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),

    #[error("invalid weight: {0}")]
    InvalidWeight(String),
}

/// Tickers are kept verbatim apart from surrounding whitespace; numeric
/// exchange codes such as `379800` are common.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let ticker = token.trim();
        if ticker.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        if !seen.insert(ticker.to_string()) {
            return Err(UniverseError::DuplicateTicker(ticker.to_string()));
        }
        tickers.push(ticker.to_string());
    }

    Ok(tickers)
}

/// Accepts plain fractions (`0.5`) or percentages (`50%`).
pub fn parse_weights(input: &str) -> Result<Vec<f64>, UniverseError> {
    input
        .split(',')
        .map(|token| {
            let token = token.trim();
            if token.is_empty() {
                return Err(UniverseError::EmptyToken);
            }
            let (number, scale) = match token.strip_suffix('%') {
                Some(pct) => (pct.trim(), 0.01),
                None => (token, 1.0),
            };
            number
                .parse::<f64>()
                .map(|w| w * scale)
                .map_err(|_| UniverseError::InvalidWeight(token.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tickers_trims_and_keeps_order() {
        let tickers = parse_tickers(" 379800, 308620 ,411060").unwrap();
        assert_eq!(tickers, vec!["379800", "308620", "411060"]);
    }

    #[test]
    fn parse_tickers_is_case_sensitive() {
        let tickers = parse_tickers("spy,SPY").unwrap();
        assert_eq!(tickers, vec!["spy", "SPY"]);
    }

    #[test]
    fn parse_tickers_rejects_empty_token() {
        assert_eq!(parse_tickers("A,,B"), Err(UniverseError::EmptyToken));
        assert_eq!(parse_tickers(""), Err(UniverseError::EmptyToken));
    }

    #[test]
    fn parse_tickers_rejects_duplicates() {
        assert_eq!(
            parse_tickers("A,B,A"),
            Err(UniverseError::DuplicateTicker("A".into()))
        );
    }

    #[test]
    fn parse_weights_fractions() {
        let weights = parse_weights("0.5, 0.3,0.2").unwrap();
        assert_eq!(weights, vec![0.5, 0.3, 0.2]);
    }

    #[test]
    fn parse_weights_percentages() {
        let weights = parse_weights("50%, 30 %, 0.2").unwrap();
        assert!((weights[0] - 0.5).abs() < 1e-12);
        assert!((weights[1] - 0.3).abs() < 1e-12);
        assert!((weights[2] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn parse_weights_rejects_garbage() {
        assert_eq!(
            parse_weights("0.5,abc"),
            Err(UniverseError::InvalidWeight("abc".into()))
        );
        assert_eq!(parse_weights("0.5,"), Err(UniverseError::EmptyToken));
    }
}
