//! `positional key=value` argument handling shared by the commands.

use std::{collections::BTreeMap, str::FromStr};

use chrono::NaiveDate;

use crate::cli::core::CommandError;

#[derive(Debug, Default)]
pub struct ArgMap<'a> {
    positional: Vec<&'a str>,
    named: BTreeMap<String, &'a str>,
}

impl<'a> ArgMap<'a> {
    pub fn parse(args: &[&'a str]) -> Self {
        let mut map = ArgMap::default();
        for arg in args {
            match arg.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    map.named.insert(key.to_ascii_lowercase(), value);
                }
                _ => map.positional.push(arg),
            }
        }
        map
    }

    pub fn positional(&self, index: usize) -> Option<&'a str> {
        self.positional.get(index).copied()
    }

    pub fn require_positional(&self, index: usize, what: &str) -> Result<&'a str, CommandError> {
        self.positional(index)
            .ok_or_else(|| CommandError::InvalidArguments(format!("missing {what}")))
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.named.get(key).copied()
    }

    pub fn require(&self, key: &str) -> Result<&'a str, CommandError> {
        self.get(key)
            .ok_or_else(|| CommandError::InvalidArguments(format!("missing `{key}=...`")))
    }

    /// Parses an optional named value.
    pub fn parse_opt<T: FromStr>(&self, key: &str) -> Result<Option<T>, CommandError> {
        self.get(key)
            .map(|raw| {
                raw.trim().parse::<T>().map_err(|_| {
                    CommandError::InvalidArguments(format!("invalid value for `{key}`: {raw}"))
                })
            })
            .transpose()
    }

    pub fn parse_required<T: FromStr>(&self, key: &str) -> Result<T, CommandError> {
        self.parse_opt(key)?
            .ok_or_else(|| CommandError::InvalidArguments(format!("missing `{key}=...`")))
    }

    pub fn date_opt(&self, key: &str) -> Result<Option<NaiveDate>, CommandError> {
        self.get(key).map(parse_date).transpose()
    }

    /// Rejects named arguments outside `allowed`.
    pub fn ensure_known(&self, allowed: &[&str]) -> Result<(), CommandError> {
        match self.named.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(CommandError::InvalidArguments(format!(
                "unknown option `{key}` (expected one of: {})",
                allowed.join(", ")
            ))),
            None => Ok(()),
        }
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{input}` (use YYYY-MM-DD)"))
    })
}

/// Accepts `1234.5` as well as the Brazilian `1234,5`.
pub fn parse_amount(input: &str) -> Result<f64, CommandError> {
    input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{input}`")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_positional_and_named() {
        let args = ["std-1", "amount=120,50", "Date=2024-02-01", "=odd"];
        let map = ArgMap::parse(&args);
        assert_eq!(map.positional(0), Some("std-1"));
        assert_eq!(map.positional(1), Some("=odd"));
        assert_eq!(parse_amount(map.require("amount").unwrap()).unwrap(), 120.5);
        assert_eq!(
            map.date_opt("date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert!(map.ensure_known(&["amount"]).is_err());
        assert!(map.ensure_known(&["amount", "date"]).is_ok());
    }

    #[test]
    fn typed_parsing_reports_the_key() {
        let args = ["limit=abc"];
        let map = ArgMap::parse(&args);
        let err = map.parse_opt::<usize>("limit").unwrap_err();
        assert!(err.to_string().contains("limit"));
        assert_eq!(map.parse_opt::<usize>("missing").unwrap(), None);
    }
}
