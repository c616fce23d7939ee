/// Per-user policy settings consulted while filtering library content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UserConfiguration {
    pub block_unrated_movies: bool,
    pub block_unrated_series: bool,
    pub max_parental_rating: Option<u32>,
}
