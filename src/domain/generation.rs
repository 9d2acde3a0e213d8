//! Parsing of human-readable generation rates such as `$1.5M/s`.

use std::sync::LazyLock;

use regex::Regex;

static STRUCTURED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\d.]+)\s*([KMB]?)").expect("generation pattern is valid")
});

static BARE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\d.]+").expect("number pattern is valid")
});

/// Magnitude suffix attached to a generation rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    Unit,
    Thousand,
    Million,
    Billion,
}

impl Magnitude {
    fn from_suffix(suffix: &str) -> Self {
        match suffix {
            "K" => Self::Thousand,
            "M" => Self::Million,
            "B" => Self::Billion,
            _ => Self::Unit,
        }
    }

    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Unit => 1.0,
            Self::Thousand => 1_000.0,
            Self::Million => 1_000_000.0,
            Self::Billion => 1_000_000_000.0,
        }
    }
}

/// Convert a generation string into an absolute per-second value.
///
/// Never fails: anything unparseable is `0.0`.
#[must_use]
pub fn parse_generation(raw: &str) -> f64 {
    let cleaned = raw.to_uppercase().replace('$', "").replace("/S", "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return 0.0;
    }

    let Some(captures) = STRUCTURED.captures(cleaned) else {
        return BARE_NUMBER
            .find(cleaned)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0);
    };

    let number = captures.get(1).map_or("", |m| m.as_str());
    let suffix = captures.get(2).map_or("", |m| m.as_str());

    match number.parse::<f64>() {
        Ok(value) => value * Magnitude::from_suffix(suffix).multiplier(),
        Err(_) => 0.0,
    }
}
