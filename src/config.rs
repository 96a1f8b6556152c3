use crate::bloom::{BloomError, BloomResult};
use derive_builder::Builder;
use std::str::FromStr;

pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.0001;
pub const DEFAULT_FORMAT_VERSION: u16 = 1;

/// Defaults for the `ccbf` command line, overridable by flags.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(pattern = "owned")]
pub struct CliDefaults {
    #[builder(default = "DEFAULT_FALSE_POSITIVE_RATE")]
    pub false_positive_rate: f64,
    #[builder(default = "DEFAULT_FORMAT_VERSION")]
    pub format_version: u16,
}

impl CliDefaults {
    /// Reads `CCBF_FALSE_POSITIVE_RATE` and `CCBF_FORMAT_VERSION`, from the
    /// environment or a `.env` file.
    pub fn from_env() -> BloomResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`CliDefaults::from_env`], with variables resolved by `lookup`.
    pub fn from_lookup<F>(lookup: F) -> BloomResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            false_positive_rate: parse_var(
                &lookup,
                "CCBF_FALSE_POSITIVE_RATE",
                DEFAULT_FALSE_POSITIVE_RATE,
            )?,
            format_version: parse_var(
                &lookup,
                "CCBF_FORMAT_VERSION",
                DEFAULT_FORMAT_VERSION,
            )?,
        })
    }
}

fn parse_var<T, F>(lookup: &F, var_name: &str, default: T) -> BloomResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var_name) {
        None => Ok(default),
        Some(value) => {
            value.trim().parse().map_err(|e: T::Err| BloomError::EnvParseError {
                var_name: var_name.to_string(),
                error: e.to_string(),
                value,
            })
        }
    }
}
