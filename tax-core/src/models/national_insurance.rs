use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

/// Two letters, six digits, one suffix letter in A–D.
static NI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2}[0-9]{6}[A-D]$").expect("national insurance pattern is valid")
});

/// A validated national insurance number.
///
/// The raw value is only ever exposed through serialization, so it reaches
/// the calculation service but never a log line. `Debug` and `Display`
/// print a redacted form.
#[derive(Clone, PartialEq, Eq)]
pub struct NationalInsuranceNumber(String);

impl NationalInsuranceNumber {
    /// Accepts the value only when it matches the format exactly.
    /// Lowercase letters are rejected, not normalized.
    pub fn parse(s: &str) -> Option<Self> {
        NI_PATTERN.is_match(s).then(|| Self(s.to_string()))
    }

    /// Returns `true` if `s` would be accepted by [`parse`](Self::parse).
    pub fn is_valid(s: &str) -> bool {
        NI_PATTERN.is_match(s)
    }
}

impl fmt::Debug for NationalInsuranceNumber {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str("NationalInsuranceNumber(<redacted>)")
    }
}

impl fmt::Display for NationalInsuranceNumber {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str("*********")
    }
}

impl Serialize for NationalInsuranceNumber {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
