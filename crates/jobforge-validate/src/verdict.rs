//! Field verdicts and leaf checks
//!
//! Every scalar field of a validated entity maps to exactly one [`Verdict`].
//! The checks here are the only place the four outcomes are produced, so
//! every rule set draws from the same definitions of "empty", "blank" and
//! "numeric".

/// Outcome of validating one leaf field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verdict {
    /// Field is acceptable
    #[default]
    Ok,
    /// Mandatory field is empty or whitespace-only
    Required,
    /// A list contains an empty or whitespace-only element
    Whitespaces,
    /// Field fails its type-specific predicate
    Invalid,
}

impl Verdict {
    /// Whether this leaf passes
    #[inline]
    #[must_use]
    pub fn is_ok(self) -> bool {
        matches!(self, Verdict::Ok)
    }

    /// Human-readable message for form surfaces; empty for `Ok`
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Verdict::Ok => "",
            Verdict::Required => "this field is mandatory",
            Verdict::Whitespaces => "list entries must not be blank",
            Verdict::Invalid => "value has the wrong format",
        }
    }
}

/// Check a mandatory text field
#[inline]
#[must_use]
pub fn required_text(value: &str) -> Verdict {
    if value.trim().is_empty() {
        Verdict::Required
    } else {
        Verdict::Ok
    }
}

/// Check a mandatory list: must be non-empty and free of blank entries
#[must_use]
pub fn required_list(items: &[String]) -> Verdict {
    if items.is_empty() {
        Verdict::Required
    } else {
        optional_list(items)
    }
}

/// Check an optional list: may be empty but entries must not be blank
#[must_use]
pub fn optional_list(items: &[String]) -> Verdict {
    if items.iter().any(|item| item.trim().is_empty()) {
        Verdict::Whitespaces
    } else {
        Verdict::Ok
    }
}

/// Check a mandatory numeric field: must parse as a finite decimal
#[must_use]
pub fn decimal_text(value: &str) -> Verdict {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Verdict::Required;
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => Verdict::Ok,
        _ => Verdict::Invalid,
    }
}

/// Reuse a prior list of per-item results only while its length still
/// matches the source list; a drifted list means no prior validation and
/// every item starts over unvalidated.
#[must_use]
pub fn align_results<T: Default + Clone>(prev: &[T], len: usize) -> Vec<T> {
    if prev.len() == len {
        prev.to_vec()
    } else {
        vec![T::default(); len]
    }
}
