//! Integration tests for Sumi-Scribe
//!
//! These tests use wiremock to serve sitemaps and article pages and run the
//! scrape pipeline and the domain workers end-to-end over real HTTP.

mod common;
mod scrape_tests;
mod worker_tests;
