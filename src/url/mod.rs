//! URL handling module for Sumi-Scribe
//!
//! This module decides whether a URL points at a single post or at an archive/listing
//! page, and provides the host helpers the workers use to group URLs by domain.

mod classify;
mod domain;

pub use classify::{UrlClassification, UrlClassifier, Verdict, DEFAULT_MIN_PATH_DEPTH};
pub use domain::{extract_domain, group_by_domain, is_sitemap_url, parse_http_url};
