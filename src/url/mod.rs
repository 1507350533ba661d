//! URL handling module for Sumi-Scout
//!
//! Site URL normalization, sitemap candidate construction, and redirect
//! `Location` resolution.

mod normalize;

pub use normalize::{candidate_url, normalize_site_url, resolve_location};
