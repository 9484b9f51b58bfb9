// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod actor;
mod config;
mod engine;
mod graph;
mod mailbox;
mod store;

pub use actor::ActorProcessingError;
pub use config::ConfigError;
pub use engine::EngineError;
pub use graph::GraphError;
pub use mailbox::ThrottledError;
pub use store::StoreError;
