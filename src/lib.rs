//! Virtual package hosting the workspace-level integration tests.
