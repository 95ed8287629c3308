#![deny(unsafe_code)]
//! Test-only crate; see the `tests/` directory for the end-to-end
//! scenarios and property suites.
