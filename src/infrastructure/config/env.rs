//! Environment variable overlay applied on top of the TOML file.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::ConfigError;

/// Reads overrides through a lookup function so tests never touch the real
/// process environment.
pub struct EnvOverlay<F> {
    lookup: F,
}

impl<F> EnvOverlay<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }

    /// Trimmed value; blank counts as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn set_string(&self, key: &str, target: &mut String) {
        if let Some(value) = self.get(key) {
            *target = value;
        }
    }

    pub fn set_opt_string(&self, key: &str, target: &mut Option<String>) {
        if let Some(value) = self.get(key) {
            *target = Some(value);
        }
    }

    pub fn set_parsed<T>(&self, key: &'static str, target: &mut T) -> Result<(), ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        if let Some(value) = self.get(key) {
            *target = parse(key, &value)?;
        }
        Ok(())
    }

    pub fn set_opt_parsed<T>(
        &self,
        key: &'static str,
        target: &mut Option<T>,
    ) -> Result<(), ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        if let Some(value) = self.get(key) {
            *target = Some(parse(key, &value)?);
        }
        Ok(())
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        field: key,
        reason: format!("`{value}`: {e}"),
    })
}
