//! Intentionally empty — the cross-crate integration tests live in
//! `tests/`.
