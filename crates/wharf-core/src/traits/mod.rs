// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability contracts, one per component category.
//!
//! Every capability extends the [`Component`] base trait and uses
//! `#[async_trait]` so instances can be handed around as trait objects.

pub mod bindings;
pub mod component;
pub mod configuration;
pub mod nameresolution;
pub mod pubsub;
pub mod secretstore;
pub mod state;

pub use bindings::{BindingEventStream, InputBinding, OutputBinding};
pub use component::Component;
pub use configuration::ConfigurationStore;
pub use nameresolution::NameResolver;
pub use pubsub::{MessageStream, PubSub};
pub use secretstore::SecretStore;
pub use state::StateStore;
