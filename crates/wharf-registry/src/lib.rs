// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Component registries and factory abstractions.
//!
//! Each component category has its own [`Registry`] mapping a unique name to
//! a factory. Registering never constructs anything; looking a name up invokes
//! the factory and yields a fresh instance every time.

pub mod descriptor;
pub mod registries;
pub mod registry;

pub use descriptor::ComponentDescriptor;
pub use registries::{Registries, RegistrySummary};
pub use registry::{
    Factory, InstanceRegistry, MiddlewareFactory, Registration, Registry, RegistryView,
};
