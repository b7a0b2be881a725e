//! Integration tests
//!
//! These tests use wiremock to stand in for both the crawled website and the
//! language model endpoint.

mod collector_tests;
mod crawl_tests;
mod support;
