//! Asset selection module
//!
//! Picks the release asset built for the target platform out of the assets
//! attached to a release.

mod picker;

pub use picker::{AssetPicker, ExactNamePicker};
