//! Property-based tests for convergence and fingerprint guarantees
