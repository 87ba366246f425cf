//! Tests of the controller.
//!
//! These drive complete runs with the minimal submodels from `example_components`.
