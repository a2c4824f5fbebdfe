use crate::Result;
use fancy_regex::Regex;

const DTC_PATTERN: &str = r"^[PCBU]\d{4}$";

/// Format check for diagnostic trouble codes: a system letter and four digits.
#[derive(Debug, Clone)]
pub struct DtcValidator {
    pattern: Regex,
}

/// Outcome of checking one raw field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtcValidation {
    /// The value as the field should show it (uppercased).
    pub normalized: String,
    /// False only when some non-empty code is malformed.
    pub valid: bool,
}

impl DtcValidator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(DTC_PATTERN)?,
        })
    }

    pub fn is_code(&self, code: &str) -> Result<bool> {
        Ok(self.pattern.is_match(code)?)
    }

    pub fn validate(&self, raw: &str) -> Result<DtcValidation> {
        let normalized = raw.to_uppercase();
        let mut valid = true;
        for code in normalized.split(',').map(str::trim) {
            if !code.is_empty() && !self.is_code(code)? {
                valid = false;
                break;
            }
        }
        Ok(DtcValidation { normalized, valid })
    }
}

/// One-shot validation with a freshly compiled pattern.
pub fn validate_dtc_input(raw: &str) -> Result<DtcValidation> {
    DtcValidator::new()?.validate(raw)
}
