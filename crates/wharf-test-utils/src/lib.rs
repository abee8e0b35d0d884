// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Wharf integration tests.
//!
//! # Components
//!
//! - [`MockComponent`] - in-memory stand-in for every capability contract
//! - [`WorkloadPlane`] - data plane that spawns timed, tracked operations
//! - [`TestHarness`] - composes a host from mock registrations

pub mod harness;
pub mod mock_component;
pub mod workload;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_component::{
    MockComponent, register_counting_state_store, register_mock, register_requiring_middleware,
};
pub use workload::{FailingPlane, WorkloadPlane, WorkloadProbe};
