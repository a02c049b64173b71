//! Tests for the Percipio client.

#[cfg(test)]
mod client_tests;
