//! Approximate strength scoring.
//!
//! The score is `length * bit_length(pool_size - 1) / 8`, where the pool size
//! sums the full base alphabets that appear in the password. It tracks the
//! bit width of the pool rather than `log2`, so it is not Shannon entropy.

use crate::charset::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "Very Weak")]
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    #[serde(rename = "Very Strong")]
    VeryStrong,
}

impl Rating {
    pub fn from_entropy(bits: f64) -> Self {
        if bits < 28.0 {
            Rating::VeryWeak
        } else if bits < 36.0 {
            Rating::Weak
        } else if bits < 60.0 {
            Rating::Moderate
        } else if bits < 128.0 {
            Rating::Strong
        } else {
            Rating::VeryStrong
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::VeryWeak => "Very Weak",
            Rating::Weak => "Weak",
            Rating::Moderate => "Moderate",
            Rating::Strong => "Strong",
            Rating::VeryStrong => "Very Strong",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrengthAssessment {
    pub entropy_bits: f64,
    pub rating: Rating,
}

pub fn pool_size(password: &str) -> usize {
    Category::ALL
        .iter()
        .map(|c| c.alphabet())
        .filter(|alphabet| password.chars().any(|ch| alphabet.contains(ch)))
        .map(str::len)
        .sum()
}

fn bit_length(value: usize) -> u32 {
    usize::BITS - value.leading_zeros()
}

pub fn entropy_bits(password: &str) -> f64 {
    let length = password.chars().count();
    let pool = pool_size(password);

    if length == 0 || pool <= 1 {
        return 0.0;
    }

    (length as f64) * f64::from(bit_length(pool - 1)) / 8.0
}

pub fn assess(password: &str) -> StrengthAssessment {
    let entropy_bits = entropy_bits(password);
    StrengthAssessment {
        entropy_bits,
        rating: Rating::from_entropy(entropy_bits),
    }
}
