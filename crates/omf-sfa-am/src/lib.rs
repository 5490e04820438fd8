// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OMF SFA Aggregate Manager
//!
//! Resource manager glue around the `omf-sfa` codec: configuration, the
//! manager facade answering advertisement/list/create/apply requests, and the
//! test aggregate seed.
//!
//! # Quick Start
//!
//! ```bash
//! # Advertisement of the test aggregate
//! omf-sfa-am --test-load-am advertise
//!
//! # Tree records of all leases
//! omf-sfa-am --test-load-am list --kind leases
//!
//! # Using a config file
//! omf-sfa-am --config am.toml advertise
//! ```
//!
//! # Configuration File
//!
//! ```toml
//! [am]
//! domain = "omf:nitos"
//! href_prefix = "http://localhost:8001/resources"
//! advertisement_valid_secs = 600
//!
//! [[endpoints]]
//! type = "xmlrpc"
//! port = 8001
//! ```

pub mod config;
pub mod manager;
pub mod testbed;

pub use config::{AmConfig, ConfigError, EndpointConfig, EndpointKind, NamespaceConfig};
pub use manager::{AmError, AmManager, ResourceKind};
pub use testbed::{load_test_am, load_test_am_at};
