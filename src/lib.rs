//! Asset preparation tools for the localized font and text of a game port.
//!
//! - [`asset::loctext`] merges translated `tag=value` strings over a base localization file.
//! - [`asset::font`] converts an AngelCode BMFont XML descriptor into the renderer's binary
//!   font layout.

pub mod asset;

pub mod logging;
