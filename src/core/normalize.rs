use std::collections::HashSet;

/// Normalize a payment reference for comparison
///
/// Whitespace is removed and the value lowercased. Purely numeric references
/// lose their leading zeros, keeping a single `0` for all-zero input.
/// Missing or blank references normalize to `None`.
pub fn normalize_reference(reference: Option<&str>) -> Option<String> {
    let cleaned: String = reference?
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    if cleaned.chars().all(|c| c.is_ascii_digit()) {
        let trimmed = cleaned.trim_start_matches('0');
        return Some(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() });
    }

    Some(cleaned)
}

/// Compares counterparty names as token sets
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    suffixes: HashSet<String>,
    own_company: HashSet<String>,
}

impl NameNormalizer {
    pub fn new<S: AsRef<str>>(suffixes: &[S], own_company_names: &[S]) -> Self {
        Self {
            suffixes: suffixes.iter().map(|s| s.as_ref().to_lowercase()).collect(),
            own_company: own_company_names
                .iter()
                .map(|s| fold_name(s.as_ref()))
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Lowercased alphanumeric tokens with legal suffixes removed
    pub fn tokenize(&self, name: &str) -> HashSet<String> {
        name.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
            .filter(|token| !self.suffixes.contains(token))
            .collect()
    }

    /// True when the name denotes the bookkeeping company rather than a counterparty
    pub fn is_own_company(&self, name: &str) -> bool {
        !self.own_company.is_empty() && self.own_company.contains(&fold_name(name))
    }

    /// Jaccard similarity of two names' token sets, 0 when either is empty
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        jaccard(&self.tokenize(a), &self.tokenize(b))
    }
}

/// `|A ∩ B| / |A ∪ B|`, defined as 0 when either set is empty
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    if intersection == 0 {
        return 0.0;
    }
    let union = a.union(b).count();

    intersection as f64 / union as f64
}

fn fold_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
