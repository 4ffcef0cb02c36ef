//! Config validation: unknown-key detection with Levenshtein suggestions
//! and plausibility warnings.
//!
//! The raw TOML is first walked as a `toml::Value` tree and every dotted key
//! is compared against the known field names. Unknown keys produce warnings
//! with "did you mean?" suggestions; they never fail a load.

use std::collections::HashSet;

use super::EngineConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Complete set of valid dotted key paths for `EngineConfig`.
///
/// Must be kept in step with the structs in `engine_config.rs`.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [lateral]
        "lateral",
        "lateral.max_inclination_deg",
        // [crossing]
        "crossing",
        "crossing.keep_zero_length_intervals",
        "crossing.snap_display_angle",
        // [aggregation]
        "aggregation",
        "aggregation.sum_tolerance_percent",
        // [merge]
        "merge",
        "merge.prune_stale_intervals",
        // [batch]
        "batch",
        "batch.parallel",
        "batch.worker_threads",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        // Tie-break on the key itself so the suggestion does not depend on hash order
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are reported by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Plausibility Warnings
// ============================================================================

/// Flag values that are legal but unlikely to be intended.
pub fn plausibility_warnings(config: &EngineConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // A flat lateral reads ~90 degrees; far outside 85-100 the window
    // either swallows the build section or drops the lateral.
    let max_inc = config.lateral.max_inclination_deg;
    if max_inc.is_finite() && !(85.0..=100.0).contains(&max_inc) {
        warnings.push(ValidationWarning {
            field: "lateral.max_inclination_deg".to_string(),
            message: format!(
                "max_inclination_deg = {max_inc:.1} is outside the typical lateral range (85-100)"
            ),
            suggestion: None,
        });
    }

    let tol = config.aggregation.sum_tolerance_percent;
    if tol.is_finite() && tol > 1.0 {
        warnings.push(ValidationWarning {
            field: "aggregation.sum_tolerance_percent".to_string(),
            message: format!("sum_tolerance_percent = {tol} hides percentage sums off by more than 1%"),
            suggestion: None,
        });
    }

    warnings
}

// ============================================================================
// Tests
// ============================================================================
