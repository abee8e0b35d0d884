// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in components for the Wharf host.
//!
//! Everything here runs in-process. [`register_builtins`] adds the whole set
//! to a [`Registries`](wharf_registry::Registries) value.

pub mod bindings;
pub mod catalog;
pub mod configuration;
pub mod middleware;
pub mod nameresolution;
pub mod pubsub;
pub mod secretstores;
pub mod state;

pub use catalog::register_builtins;
