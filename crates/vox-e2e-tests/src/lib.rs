//! End-to-end tests for Vox live under `tests/`; this crate exports nothing.
