// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Test aggregate seed (`--test-load-am`).

use chrono::{DateTime, Duration, Utc};
use omf_sfa::model::{Account, Interface, Ip, Lease, Node};
use omf_sfa::{Gurn, Resource};

use crate::manager::{AmError, AmManager};

const NETMASK: &str = "255.255.255.0";

/// Seed `manager` with the test aggregate, leases starting now.
pub fn load_test_am(manager: &AmManager) -> Result<(), AmError> {
    load_test_am_at(manager, Utc::now())
}

/// Seed `manager` with account `root`, lease `l1` (10 h from `now`) and
/// `node1` with two interfaces.
pub fn load_test_am_at(manager: &AmManager, now: DateTime<Utc>) -> Result<(), AmError> {
    let domain = manager.domain().to_string();
    let urn = |short: &str, ty: &str| Gurn::create(short, domain.clone(), ty);

    let account = Account::new("root").with_urn(urn("root", "account"));
    let lease = Lease::new("l1").with_window(now, now + Duration::hours(10));

    let ip1 = Ip::new("10.0.0.1", NETMASK, "ipv4");
    let if0 = Interface::new("node1:if0")
        .with_urn(urn("node1:if0", "interface"))
        .with_role("control_network")
        .with_mac("00:03:1D:0D:4B:96")
        .with_ip(ip1.identity());

    let ip2 = Ip::new("10.0.0.101", NETMASK, "ipv4");
    let if1 = Interface::new("node1:if1")
        .with_urn(urn("node1:if1", "interface"))
        .with_role("cm_network")
        .with_mac("09:A2:DA:0D:F1:01")
        .with_ip(ip2.identity());

    let mut node = Node::new("node1")
        .with_urn(urn("node1", "node"))
        .with_available(true);
    node.add_interface(if0.identity());
    node.add_interface(if1.identity());
    node.add_lease(lease.identity());

    manager.manage_resources(vec![
        Box::new(account),
        Box::new(lease),
        Box::new(ip1),
        Box::new(ip2),
        Box::new(if0),
        Box::new(if1),
        Box::new(node),
    ])?;
    tracing::info!("Loaded test AM for domain '{}'", domain);
    Ok(())
}
