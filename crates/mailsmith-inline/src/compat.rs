//! Mail client compatibility checks.
//!
//! Mail clients lag far behind browsers in CSS support. This module scans the
//! CSS that went into a page and flags declarations that are known to render
//! poorly (or not at all) in common clients.

use std::fmt;

use regex::Regex;

/// Severity of a compatibility warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WarnLevel {
    /// Supported almost everywhere, minor quirks possible.
    Safe,
    /// Ignored or mishandled by at least one major client.
    Poor,
    /// Likely to break layout in the affected clients.
    Risky,
}

impl fmt::Display for WarnLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarnLevel::Safe => "safe",
            WarnLevel::Poor => "poor",
            WarnLevel::Risky => "risky",
        };
        f.write_str(s)
    }
}

/// A compatibility warning for a single CSS property.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    /// Severity level
    pub level: WarnLevel,
    /// Human-readable description of the offending declaration
    pub message: String,
    /// Clients known to mishandle it
    pub clients: Vec<String>,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} may not render properly in {}",
            self.level,
            self.message,
            self.clients.join(", ")
        )
    }
}

struct CompatRule {
    property: &'static str,
    level: WarnLevel,
    clients: &'static [&'static str],
}

// Properties with documented rendering problems in mail clients. Shorthand
// properties cover their longhand forms via prefix matching below.
const RULES: &[CompatRule] = &[
    CompatRule {
        property: "background-image",
        level: WarnLevel::Poor,
        clients: &["Outlook 2007-2013", "Lotus Notes"],
    },
    CompatRule {
        property: "background-position",
        level: WarnLevel::Poor,
        clients: &["Outlook 2007-2013", "Gmail"],
    },
    CompatRule {
        property: "background-repeat",
        level: WarnLevel::Poor,
        clients: &["Outlook 2007-2013"],
    },
    CompatRule {
        property: "position",
        level: WarnLevel::Risky,
        clients: &["Outlook", "Gmail", "Yahoo! Mail"],
    },
    CompatRule {
        property: "float",
        level: WarnLevel::Poor,
        clients: &["Outlook 2007-2013", "Lotus Notes"],
    },
    CompatRule {
        property: "display",
        level: WarnLevel::Poor,
        clients: &["Outlook 2007-2013"],
    },
    CompatRule {
        property: "opacity",
        level: WarnLevel::Poor,
        clients: &["Outlook", "Gmail", "Yahoo! Mail"],
    },
    CompatRule {
        property: "max-width",
        level: WarnLevel::Poor,
        clients: &["Outlook 2007-2013", "Lotus Notes"],
    },
    CompatRule {
        property: "min-width",
        level: WarnLevel::Poor,
        clients: &["Outlook 2007-2013"],
    },
    CompatRule {
        property: "margin",
        level: WarnLevel::Safe,
        clients: &["Outlook.com"],
    },
    CompatRule {
        property: "text-shadow",
        level: WarnLevel::Poor,
        clients: &["Outlook", "Gmail"],
    },
    CompatRule {
        property: "border-radius",
        level: WarnLevel::Poor,
        clients: &["Outlook 2007-2013", "Lotus Notes"],
    },
    CompatRule {
        property: "overflow",
        level: WarnLevel::Poor,
        clients: &["Outlook", "Gmail"],
    },
];

/// Scan CSS text and report every distinct property with known client issues.
///
/// Warnings at or above `min_level` are returned, deduplicated by property,
/// in declaration order.
pub fn check(css: &str, min_level: WarnLevel) -> Vec<Warning> {
    // Property names at the start of a declaration: after `{`, `;` or newline.
    let decl = Regex::new(r"(?m)(?:^|[{;])\s*([a-zA-Z-]+)\s*:").expect("valid regex");

    let mut warnings = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for caps in decl.captures_iter(css) {
        let property = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

        let Some(rule) = RULES
            .iter()
            .find(|r| property == r.property || property.starts_with(&format!("{}-", r.property)))
        else {
            continue;
        };

        if rule.level < min_level || seen.contains(&rule.property) {
            continue;
        }
        seen.push(rule.property);

        warnings.push(Warning {
            level: rule.level,
            message: format!("{} CSS property", rule.property),
            clients: rule.clients.iter().map(|c| c.to_string()).collect(),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_risky_positioning() {
        let warnings = check(".hero { position: absolute; top: 0; }", WarnLevel::Safe);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Risky);
        assert!(warnings[0].clients.iter().any(|c| c.contains("Outlook")));
    }

    #[test]
    fn safe_properties_produce_no_warnings() {
        let warnings = check(".foo { color: red; font-size: 12px; }", WarnLevel::Safe);
        assert!(warnings.is_empty());
    }

    #[test]
    fn deduplicates_by_property() {
        let css = ".a { float: left; } .b { float: right; }";
        let warnings = check(css, WarnLevel::Safe);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn min_level_filters_lower_severities() {
        let css = ".a { margin: 0; float: left; }";

        let all = check(css, WarnLevel::Safe);
        assert_eq!(all.len(), 2);

        let poor_and_up = check(css, WarnLevel::Poor);
        assert_eq!(poor_and_up.len(), 1);
        assert_eq!(poor_and_up[0].message, "float CSS property");
    }

    #[test]
    fn shorthand_rule_covers_longhands() {
        let warnings = check("td { overflow-x: hidden; }", WarnLevel::Safe);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "overflow CSS property");
    }

    #[test]
    fn display_format_matches_log_line() {
        let w = Warning {
            level: WarnLevel::Poor,
            message: "float CSS property".to_string(),
            clients: vec!["Outlook".to_string(), "Gmail".to_string()],
        };

        assert_eq!(
            w.to_string(),
            "[poor] float CSS property may not render properly in Outlook, Gmail"
        );
    }
}
