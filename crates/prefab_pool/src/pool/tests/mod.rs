//! Registry-level scenario tests
