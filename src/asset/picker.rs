use anyhow::Result;

use crate::error::SetupError;
use crate::provider::ReleaseAsset;

/// Trait for selecting an asset from a list of available assets
pub trait AssetPicker: Send + Sync {
    /// Pick the asset to download from the given list
    fn pick<'a>(&self, assets: &'a [ReleaseAsset]) -> Result<&'a ReleaseAsset>;
}

/// Picks the single asset whose name equals the expected executable name.
///
/// Matching is exact and case-sensitive. A release carrying the name more
/// than once is rejected rather than resolved by position.
pub struct ExactNamePicker {
    name: String,
}

impl ExactNamePicker {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl AssetPicker for ExactNamePicker {
    fn pick<'a>(&self, assets: &'a [ReleaseAsset]) -> Result<&'a ReleaseAsset> {
        let mut matches = assets.iter().filter(|a| a.name == self.name);

        let Some(first) = matches.next() else {
            return Err(SetupError::AssetNotFound(self.name.clone()).into());
        };

        let extra = matches.count();
        if extra > 0 {
            return Err(SetupError::DuplicateAsset {
                name: self.name.clone(),
                count: extra + 1,
            }
            .into());
        }

        Ok(first)
    }
}
