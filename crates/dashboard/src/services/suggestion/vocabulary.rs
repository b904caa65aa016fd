//! Allowed locations and interests.

/// Locations a campaign may target.
pub const LOCATIONS: &[&str] = &[
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Miami",
    "Austin",
    "Seattle",
    "San Francisco",
    "Boston",
    "Denver",
];

/// Interests a campaign may target.
pub const INTERESTS: &[&str] = &[
    "Fitness",
    "Technology",
    "Fashion",
    "Food & Dining",
    "Travel",
    "Gaming",
    "Beauty",
    "Home Decor",
    "Sports",
    "Music",
    "Finance",
    "Education",
    "Pets",
    "Outdoor Adventures",
    "Health & Wellness",
];

/// The fixed sets of locations and interests offered to the model.
///
/// Built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    locations: Vec<String>,
    interests: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(LOCATIONS.iter().copied(), INTERESTS.iter().copied())
    }
}

impl Vocabulary {
    /// Build a vocabulary from arbitrary lists.
    pub fn new<L, I, S, T>(locations: L, interests: I) -> Self
    where
        L: IntoIterator<Item = S>,
        I: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            locations: locations.into_iter().map(Into::into).collect(),
            interests: interests.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    #[must_use]
    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    /// Case-insensitive membership test for a location.
    #[must_use]
    pub fn has_location(&self, location: &str) -> bool {
        contains_ignore_case(&self.locations, location)
    }

    /// Case-insensitive membership test for an interest.
    #[must_use]
    pub fn has_interest(&self, interest: &str) -> bool {
        contains_ignore_case(&self.interests, interest)
    }
}

fn contains_ignore_case(items: &[String], needle: &str) -> bool {
    let needle = needle.trim();
    items.iter().any(|item| item.eq_ignore_ascii_case(needle))
}
