//! design::metadata — per-column tags, run bookkeeping, and name selectors.
//!
//! Purpose
//! -------
//! Carry the semantic side-table that travels with every design-matrix
//! column: what role the column plays (condition of interest, polynomial
//! trend, convolved regressor, cosine drift, per-run regressor), and — for
//! per-run columns produced by stacking — which run owns it. Also provide
//! the pattern type used to select additional columns for per-run
//! treatment when stacking.
//!
//! Key behaviors
//! -------------
//! - [`ColumnTag`] enumerates the fixed tag vocabulary; a column holds a
//!   small, possibly empty, set of them in its [`ColumnInfo`].
//! - [`ColumnInfo`] is created and dropped atomically with the column it
//!   describes; the container enforces this pairing.
//! - [`ColumnSelector`] matches column names against literal names,
//!   `"x*"` prefixes, or `"*x"` suffixes. Patterns are parsed once per
//!   selector construction, not re-interpreted on every match.
//! - [`RunSpan`] records a half-open row range `[start, end)` belonging to
//!   one appended unit.
//!
//! Conventions
//! -----------
//! - A fresh (never-stacked) matrix is treated as a single run covering
//!   every row.
//! - Per-run columns are identified by `ColumnInfo::run == Some(i)` and
//!   carry the [`ColumnTag::RunIndex`] tag; `i` indexes into the
//!   container's run list.
//! - Tag sets are kept as short vectors; membership checks are linear,
//!   which is fine at the handful-of-tags scale this vocabulary allows.

/// Semantic role of a design-matrix column.
///
/// The vocabulary is closed: every transformation in the crate maps onto
/// one of these roles, and downstream logic (convolution pass-through,
/// per-run stacking) dispatches on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnTag {
    /// Experimental condition regressor (e.g. an event indicator).
    Condition,
    /// Polynomial trend regressor of the given order.
    Polynomial(usize),
    /// Column produced by kernel convolution.
    Convolved,
    /// Discrete-cosine drift regressor.
    DctBasis,
    /// Column replicated per run by the stacking engine.
    RunIndex,
}

/// Metadata attached to a single design-matrix column.
///
/// Fields
/// ------
/// - `name`: Unique column name within its container.
/// - `tags`: Role tags; possibly empty (e.g. loaded covariates).
/// - `run`: For per-run columns, the 0-based index of the owning run in
///   the container's run list; `None` for shared columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub tags: Vec<ColumnTag>,
    pub run: Option<usize>,
}

impl ColumnInfo {
    /// Construct metadata with no tags and no run attribution.
    pub fn new(name: impl Into<String>) -> ColumnInfo {
        ColumnInfo { name: name.into(), tags: Vec::new(), run: None }
    }

    /// Builder-style tag attachment; duplicate tags are not added twice.
    pub fn with_tag(mut self, tag: ColumnTag) -> ColumnInfo {
        self.push_tag(tag);
        self
    }

    /// Add a tag in place; duplicate tags are not added twice.
    pub fn push_tag(&mut self, tag: ColumnTag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Whether the column carries the exact tag (including order payload
    /// for [`ColumnTag::Polynomial`]).
    pub fn has_tag(&self, tag: ColumnTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Whether the column is a polynomial trend regressor of any order.
    pub fn is_polynomial(&self) -> bool {
        self.tags.iter().any(|t| matches!(t, ColumnTag::Polynomial(_)))
    }
}

/// One pattern in a [`ColumnSelector`]: an exact name, a prefix, or a
/// suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePattern {
    Literal(String),
    Prefix(String),
    Suffix(String),
}

impl NamePattern {
    /// Parse a single pattern string.
    ///
    /// `"x*"` selects names starting with `x`, `"*x"` selects names ending
    /// with `x`, and anything else is an exact match. A bare `"*"` is
    /// treated as a match-everything prefix.
    pub fn parse(pattern: &str) -> NamePattern {
        if let Some(prefix) = pattern.strip_suffix('*') {
            NamePattern::Prefix(prefix.to_string())
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            NamePattern::Suffix(suffix.to_string())
        } else {
            NamePattern::Literal(pattern.to_string())
        }
    }

    /// Whether the pattern matches the given column name.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Literal(lit) => name == lit,
            NamePattern::Prefix(prefix) => name.starts_with(prefix.as_str()),
            NamePattern::Suffix(suffix) => name.ends_with(suffix.as_str()),
        }
    }
}

/// A set of name patterns selecting columns for per-run treatment when
/// row-stacking.
///
/// The default selector matches nothing; polynomial-tagged columns are
/// always treated per-run regardless of the selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelector {
    patterns: Vec<NamePattern>,
}

impl ColumnSelector {
    /// Parse a set of pattern strings (see [`NamePattern::parse`]).
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> ColumnSelector {
        ColumnSelector {
            patterns: patterns.iter().map(|p| NamePattern::parse(p.as_ref())).collect(),
        }
    }

    /// A selector that matches nothing.
    pub fn none() -> ColumnSelector {
        ColumnSelector::default()
    }

    /// Whether any pattern matches the given column name.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    /// Whether the selector holds no patterns at all.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Half-open row range `[start, end)` belonging to one appended unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSpan {
    pub start: usize,
    pub end: usize,
}

impl RunSpan {
    /// Construct a span; callers are responsible for `start <= end`.
    pub fn new(start: usize, end: usize) -> RunSpan {
        RunSpan { start, end }
    }

    /// Number of rows in the span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The same span shifted down by `offset` rows.
    pub fn shifted(&self, offset: usize) -> RunSpan {
        RunSpan { start: self.start + offset, end: self.end + offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Tag set semantics (dedup, polynomial predicate).
    // - Pattern parsing and matching for literals, prefixes, and suffixes.
    // - RunSpan arithmetic.
    //
    // They intentionally DO NOT cover:
    // - How the container or stacking engine consume this metadata; those
    //   paths are exercised in `design::matrix` and `design::append`.
    // -------------------------------------------------------------------------

    #[test]
    fn column_info_deduplicates_tags() {
        let info = ColumnInfo::new("faces")
            .with_tag(ColumnTag::Condition)
            .with_tag(ColumnTag::Condition);
        assert_eq!(info.tags.len(), 1);
        assert!(info.has_tag(ColumnTag::Condition));
    }

    #[test]
    fn polynomial_predicate_ignores_order_payload() {
        let info = ColumnInfo::new("poly2").with_tag(ColumnTag::Polynomial(2));
        assert!(info.is_polynomial());
        assert!(info.has_tag(ColumnTag::Polynomial(2)));
        assert!(!info.has_tag(ColumnTag::Polynomial(1)));
    }

    #[test]
    fn patterns_parse_and_match_as_documented() {
        assert_eq!(NamePattern::parse("motion*"), NamePattern::Prefix("motion".into()));
        assert_eq!(NamePattern::parse("*_run0"), NamePattern::Suffix("_run0".into()));
        assert_eq!(NamePattern::parse("faces"), NamePattern::Literal("faces".into()));

        let selector = ColumnSelector::new(&["motion*", "*_drift", "faces"]);
        assert!(selector.matches("motion_x"));
        assert!(selector.matches("slow_drift"));
        assert!(selector.matches("faces"));
        assert!(!selector.matches("houses"));
    }

    #[test]
    fn empty_selector_matches_nothing() {
        let selector = ColumnSelector::none();
        assert!(selector.is_empty());
        assert!(!selector.matches("anything"));
    }

    #[test]
    fn run_span_shift_preserves_length() {
        let span = RunSpan::new(0, 10);
        let shifted = span.shifted(10);
        assert_eq!(shifted, RunSpan::new(10, 20));
        assert_eq!(shifted.len(), span.len());
        assert!(!shifted.is_empty());
    }
}
