use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

///
/// Id
///
/// Store-assigned primary key. `Id::UNSET` (zero) marks a transient model
/// that has not been persisted yet; stores never assign it.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct Id(u64);

impl Id {
    pub const UNSET: Self = Self(0);

    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }
}

///
/// EntitySlug
///
/// Stable string identifier for one kind of entity ("container",
/// "element"). Registries, cache groups, and translation tables are all
/// keyed by slug.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EntitySlug(&'static str);

impl EntitySlug {
    #[must_use]
    pub const fn new(raw: &'static str) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

///
/// Direction
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_id_is_zero_and_default() {
        assert_eq!(Id::default(), Id::UNSET);
        assert!(Id::UNSET.is_unset());
        assert!(!Id::new(1).is_unset());
    }

    #[test]
    fn id_displays_as_raw_key() {
        assert_eq!(Id::new(42).to_string(), "42");
    }

    #[test]
    fn slug_compares_by_content() {
        assert_eq!(EntitySlug::new("form"), EntitySlug::new("form"));
        assert_ne!(EntitySlug::new("form"), EntitySlug::new("element"));
    }
}
