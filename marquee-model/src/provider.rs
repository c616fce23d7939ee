use std::collections::BTreeMap;

/// External metadata sources an item can be keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MetadataProvider {
    Tmdb,
    Imdb,
    Tvdb,
    TmdbCollection,
}

/// External identifiers attached to an item, keyed by provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ProviderIds(BTreeMap<MetadataProvider, String>);

impl ProviderIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `provider`; blank values count as missing.
    pub fn get(&self, provider: MetadataProvider) -> Option<&str> {
        self.0
            .get(&provider)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Sets or clears (when `value` is `None`) the id for `provider`.
    pub fn set(
        &mut self,
        provider: MetadataProvider,
        value: Option<impl Into<String>>,
    ) {
        match value {
            Some(value) => {
                self.0.insert(provider, value.into());
            }
            None => {
                self.0.remove(&provider);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|value| value.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetadataProvider, &str)> {
        self.0.iter().map(|(provider, value)| (*provider, value.as_str()))
    }
}
