//! Locale-aware title ordering.
//!
//! Titles are compared with the Unicode Collation Algorithm using the CLDR
//! root locale: base letters first, then accents, then case (lower before
//! upper). Punctuation and symbols are not ignored, so `~Draft` sorts ahead
//! of letters.

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use std::cmp::Ordering;
use std::sync::OnceLock;
use tracing::warn;

static ROOT_COLLATOR: OnceLock<Option<CollatorBorrowed<'static>>> = OnceLock::new();

fn root_collator() -> Option<&'static CollatorBorrowed<'static>> {
    ROOT_COLLATOR
        .get_or_init(|| {
            Collator::try_new(CollatorPreferences::default(), CollatorOptions::default())
                .inspect_err(|err| {
                    warn!(%err, "root collation data unavailable; ordering titles by code point");
                })
                .ok()
        })
        .as_ref()
}

/// Compare two titles the way board columns order them.
///
/// Canonically equivalent titles compare equal; the stable column sort keeps
/// them in input order.
#[must_use]
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    root_collator().map_or_else(|| a.cmp(b), |collator| collator.compare(a, b))
}
