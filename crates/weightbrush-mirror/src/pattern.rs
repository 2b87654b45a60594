//! Naming tokens and the search patterns compiled from them.
//!
//! A token such as `*_L_*` is a literal with `*` marking the open ends.
//! A token without a leading `*` (or `.`) only matches at the start of a
//! name, one without a trailing `*` (or `.`) only at the end.

use regex::Regex;

use crate::error::MirrorError;

/// Splits a whitespace separated token list, dropping empty entries.
pub fn split_tokens(tokens: &str) -> Vec<&str> {
    tokens.split_whitespace().collect()
}

/// Anchored regex source for a search token.
pub fn search_source(token: &str) -> String {
    let open_start = token.starts_with(['*', '.']);
    let open_end = token.ends_with(['*', '.']);
    let mut source = String::with_capacity(token.len() + 2);
    if !open_start {
        source.push('^');
    }
    source.push_str(token);
    if !open_end {
        source.push('$');
    }
    source.replace('*', "")
}

/// Replacement text for a token: the token without its `*` markers.
pub fn replacement(token: &str) -> String {
    token.replace('*', "")
}

/// One direction of a token pair: a compiled search and its replacement.
#[derive(Debug, Clone)]
pub struct SidePattern {
    search: Regex,
    replace: String,
}

impl SidePattern {
    /// Compiles `from` as the search and `to` as the replacement.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::InvalidPattern`] if `from` is not a valid regex
    /// once anchored and stripped.
    pub fn new(from: &str, to: &str) -> Result<Self, MirrorError> {
        let search =
            Regex::new(&search_source(from)).map_err(|e| MirrorError::invalid_pattern(from, e))?;
        Ok(Self {
            search,
            replace: replacement(to),
        })
    }

    /// Replaces every match in `name`; the replacement is inserted literally.
    pub fn apply(&self, name: &str) -> String {
        self.search
            .replace_all(name, regex::NoExpand(&self.replace))
            .into_owned()
    }
}

/// A left/right token pair compiled in both directions.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Left to right.
    pub forward: SidePattern,
    /// Right to left.
    pub backward: SidePattern,
}

impl TokenPair {
    /// Compiles both directions of `left` ↔ `right`.
    pub fn new(left: &str, right: &str) -> Result<Self, MirrorError> {
        Ok(Self {
            forward: SidePattern::new(left, right)?,
            backward: SidePattern::new(right, left)?,
        })
    }

    /// Candidate names in trial order: forward, then backward.
    pub fn candidates(&self, name: &str) -> [String; 2] {
        [self.forward.apply(name), self.backward.apply(name)]
    }
}

/// Compiles token lists into pairs.
///
/// # Errors
///
/// Returns [`MirrorError::TokenCountMismatch`] when the lists differ in
/// length, or the first [`MirrorError::InvalidPattern`].
pub fn compile_pairs(left: &str, right: &str) -> Result<Vec<TokenPair>, MirrorError> {
    let left = split_tokens(left);
    let right = split_tokens(right);
    if left.len() != right.len() {
        return Err(MirrorError::TokenCountMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    left.iter()
        .zip(&right)
        .map(|(l, r)| TokenPair::new(l, r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_tokens_are_unanchored() {
        assert_eq!(search_source("*_L_*"), "_L_");
        assert_eq!(search_source("*_L"), "_L$");
        assert_eq!(search_source("L_*"), "^L_");
        assert_eq!(search_source("left"), "^left$");
    }

    #[test]
    fn dot_keeps_the_end_open() {
        assert_eq!(search_source(".l"), ".l$");
        assert_eq!(search_source("l."), "^l.");
    }

    #[test]
    fn split_ignores_extra_whitespace() {
        assert_eq!(split_tokens("  *_L_*   L_* "), vec!["*_L_*", "L_*"]);
        assert!(split_tokens("   ").is_empty());
    }

    #[test]
    fn replacement_is_literal() {
        let p = SidePattern::new("*_L", "*_$R").unwrap();
        assert_eq!(p.apply("arm_L"), "arm_$R");
    }

    #[test]
    fn replaces_every_occurrence() {
        let p = SidePattern::new("*_L_*", "*_R_*").unwrap();
        assert_eq!(p.apply("a_L_b_L_c"), "a_R_b_R_c");
    }

    #[test]
    fn anchored_token_needs_full_match() {
        let p = SidePattern::new("L_*", "R_*").unwrap();
        assert_eq!(p.apply("L_arm"), "R_arm");
        assert_eq!(p.apply("arm_L_x"), "arm_L_x");
    }

    #[test]
    fn pair_candidates_try_both_directions() {
        let pair = TokenPair::new("*_L*", "*_R*").unwrap();
        assert_eq!(pair.candidates("hand_R"), ["hand_R".to_string(), "hand_L".to_string()]);
    }

    #[test]
    fn mismatched_token_counts_fail() {
        let err = compile_pairs("*_L_* L_*", "*_R_*").unwrap_err();
        assert!(matches!(
            err,
            MirrorError::TokenCountMismatch { left: 2, right: 1 }
        ));
    }

    #[test]
    fn bad_token_reports_itself() {
        let err = compile_pairs("*(L*", "*R*").unwrap_err();
        assert!(matches!(err, MirrorError::InvalidPattern { ref token, .. } if token == "*(L*"));
    }
}
