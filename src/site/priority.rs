use std::fmt;

const CRITICAL_CODES: [&str; 4] = ["U0100", "U0101", "C0561", "P0601"];
const HIGH_PRIORITY_CODES: [&str; 3] = ["P0420", "P0300", "C0710"];

/// Urgency of a diagnostic request, derived from its trouble codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriorityLevel {
    Standard,
    HighPriority,
    Critical,
}

impl PriorityLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::HighPriority => "High Priority",
            Self::Critical => "Critical",
        }
    }

    /// Emphasis class used by the confirmation summary.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Standard => "priority-standard",
            Self::HighPriority => "priority-high-priority",
            Self::Critical => "priority-critical",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies a comma separated list of trouble codes.
///
/// Every code is checked against the critical set before any is checked
/// against the high priority set, so `"P0300,U0100"` is critical. Matching is
/// exact and case-sensitive.
pub fn classify_priority(dtc_codes: Option<&str>) -> PriorityLevel {
    let Some(raw) = dtc_codes.filter(|raw| !raw.is_empty()) else {
        return PriorityLevel::Standard;
    };
    let codes = raw.split(',').map(str::trim).collect::<Vec<_>>();

    if codes.iter().any(|code| CRITICAL_CODES.contains(code)) {
        return PriorityLevel::Critical;
    }
    if codes.iter().any(|code| HIGH_PRIORITY_CODES.contains(code)) {
        return PriorityLevel::HighPriority;
    }
    PriorityLevel::Standard
}
