//! The ladder: ordered mapping from a numeric result to a narrative tier.

/// Immutable (upper-bound-inclusive, label) table with strictly ascending
/// bounds. Lookup saturates at both ends, so `describe` is total over i64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LadderTable {
    entries: Vec<(i64, String)>,
}

impl LadderTable {
    /// Builds a table from arbitrary (bound, label) pairs. Entries are
    /// sorted by bound; a duplicate bound keeps the last label given.
    pub fn new(entries: Vec<(i64, impl Into<String>)>) -> Self {
        let mut entries = entries
            .into_iter()
            .map(|(bound, label)| (bound, label.into()))
            .collect::<Vec<_>>();
        entries.sort_by_key(|(bound, _)| *bound);
        entries.dedup_by(|next, prev| {
            if next.0 == prev.0 {
                prev.1 = std::mem::take(&mut next.1);
                true
            } else {
                false
            }
        });
        Self { entries }
    }

    /// The standard Fate ladder from Terrible(-2) through Legendary(+8).
    pub fn standard() -> Self {
        Self::new(vec![
            (-2, "Terrible"),
            (-1, "Poor"),
            (0, "Mediocre"),
            (1, "Average"),
            (2, "Fair"),
            (3, "Good"),
            (4, "Great"),
            (5, "Superb"),
            (6, "Fantastic"),
            (7, "Epic"),
            (8, "Legendary"),
        ])
    }

    /// Label of the first entry whose bound is >= `value`; values above the
    /// top bound take the highest label.
    pub fn describe(&self, value: i64) -> &str {
        for (bound, label) in &self.entries {
            if value <= *bound {
                return label;
            }
        }
        self.entries
            .last()
            .map(|(_, label)| label.as_str())
            .unwrap_or("")
    }

    /// Label for an exact rung, used when rendering requirement gates.
    /// Levels outside the table saturate the same way lookups do.
    pub fn label_at(&self, level: i64) -> &str {
        self.describe(level)
    }

    pub fn highest_bound(&self) -> Option<i64> {
        self.entries.last().map(|(bound, _)| *bound)
    }

    pub fn entries(&self) -> &[(i64, String)] {
        &self.entries
    }
}
