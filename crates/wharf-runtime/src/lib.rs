// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host composition and lifecycle for Wharf.
//!
//! [`Host::compose`] turns populated [`Registries`](wharf_registry::Registries)
//! and [`SharedDeps`](wharf_core::SharedDeps) into a host, failing fast on any
//! structural problem. [`Host::run`] drives a [`DataPlane`] until a termination
//! notification arrives, then drains in-flight work exactly once through the
//! [`ShutdownCoordinator`].

pub mod host;
pub mod lifecycle;
pub mod pipeline;
pub mod plane;
pub mod shutdown;

pub use host::{Host, HostOptions, Resolver};
pub use lifecycle::Lifecycle;
pub use pipeline::{Pipeline, PipelineEntry};
pub use plane::{DataPlane, IdlePlane, PlaneContext};
pub use shutdown::{
    DrainOutcome, DrainPolicy, DrainReport, InFlight, ShutdownCoordinator, listen_for_signals,
};
