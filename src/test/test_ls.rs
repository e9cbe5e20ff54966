// Copyright 2026 routecore Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use maplit::btreemap;
use pretty_assertions::assert_eq;

use crate::{
    ls::{LsContent, LsRouter},
    router::Router,
    types::{Address, Cost, Packet, Port},
};

fn lsp_packet(from: Address, to: Address, lsp: &LsContent) -> Packet {
    Packet::Routing {
        src_addr: from,
        dst_addr: to,
        content: lsp.encode(),
    }
}

#[test]
fn round_trip_ls_content() {
    let lsp = LsContent {
        origin: Address(2),
        seq: 7,
        links: btreemap! { Address(1) => Cost::new(1.0).unwrap(), Address(3) => Cost::new(4.5).unwrap() },
    };
    let bytes = lsp.encode();
    assert_eq!(LsContent::decode(&bytes).unwrap(), lsp);
}

#[test]
fn new_router_has_empty_lsdb_and_seq_zero() {
    let r = LsRouter::new(Address(1), 1_000);
    assert_eq!(r.seq(), 0);
    assert!(r.forwarding().is_empty());
}

#[test]
fn on_new_link_bumps_seq_and_floods_own_links() {
    let mut r = LsRouter::new(Address(1), 1_000);
    let actions = r.on_new_link(Port(1), Address(2), Cost::new(5.0).unwrap());
    assert_eq!(r.seq(), 1);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].port, Port(1));
    let (seq, links) = r.lsdb_entry(Address(1)).unwrap();
    assert_eq!(seq, 1);
    assert_eq!(links, &btreemap! { Address(2) => Cost::new(5.0).unwrap() });
}

/// S1 — two-router line, LS variant.
#[test]
fn two_router_line_converges_after_mutual_link_up() {
    let mut a = LsRouter::new(Address(1), 1_000);
    let mut b = LsRouter::new(Address(2), 1_000);

    let a_actions = a.on_new_link(Port(1), Address(2), Cost::new(5.0).unwrap());
    let b_actions = b.on_new_link(Port(1), Address(1), Cost::new(5.0).unwrap());

    // Exchange each side's own-link LSP with the other; each `Action`
    // already carries the correct `src_addr`, so just hand the packet to
    // the neighbor on the matching local port.
    for action in a_actions {
        b.on_packet(Port(1), action.packet);
    }
    for action in b_actions {
        a.on_packet(Port(1), action.packet);
    }

    assert_eq!(a.forwarding()[&Address(2)].0, Port(1));
    assert_eq!(b.forwarding()[&Address(1)].0, Port(1));

    let packet = Packet::Data {
        src_addr: Address(1),
        dst_addr: Address(2),
        payload: vec![9],
    };
    let sent = a.on_packet(Port(9), packet);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].port, Port(1));
}

/// S3 — stale LSP re-delivery is suppressed, a newer sequence is accepted.
#[test]
fn stale_lsp_is_suppressed_newer_sequence_is_accepted() {
    let mut c = LsRouter::new(Address(3), 1_000);
    c.on_new_link(Port(1), Address(2), Cost::new(1.0).unwrap());
    c.on_new_link(Port(2), Address(4), Cost::new(1.0).unwrap());

    let lsp_v1 = LsContent {
        origin: Address(2),
        seq: 1,
        links: btreemap! { Address(1) => Cost::new(1.0).unwrap(), Address(3) => Cost::new(1.0).unwrap() },
    };
    let first = c.on_packet(Port(1), lsp_packet(Address(2), Address(3), &lsp_v1));
    assert!(!first.is_empty(), "first sighting of an LSP must reflood");
    assert_eq!(c.lsdb_entry(Address(2)).unwrap().0, 1);

    // Re-delivery of the exact same LSP (as if looped back) is suppressed:
    // no reflood, and the stored sequence does not change.
    let replay = c.on_packet(Port(1), lsp_packet(Address(2), Address(3), &lsp_v1));
    assert!(replay.is_empty());
    assert_eq!(c.lsdb_entry(Address(2)).unwrap().0, 1);

    let lsp_v2 = LsContent {
        origin: Address(2),
        seq: 2,
        links: btreemap! { Address(1) => Cost::new(1.0).unwrap(), Address(3) => Cost::new(1.0).unwrap() },
    };
    let second = c.on_packet(Port(1), lsp_packet(Address(2), Address(3), &lsp_v2));
    assert!(!second.is_empty(), "a strictly newer sequence must reflood");
    assert_eq!(c.lsdb_entry(Address(2)).unwrap().0, 2);
}

/// Reflooding forwards the exact bytes received, not a re-serialization.
#[test]
fn reflood_forwards_original_bytes() {
    let mut c = LsRouter::new(Address(3), 1_000);
    c.on_new_link(Port(1), Address(2), Cost::new(1.0).unwrap());
    c.on_new_link(Port(2), Address(4), Cost::new(1.0).unwrap());

    let lsp = LsContent {
        origin: Address(2),
        seq: 1,
        links: btreemap! { Address(3) => Cost::new(1.0).unwrap() },
    };
    let original_bytes = lsp.encode();
    let packet = Packet::Routing {
        src_addr: Address(2),
        dst_addr: Address(3),
        content: original_bytes.clone(),
    };
    let actions = c.on_packet(Port(1), packet);

    // Floods to every neighbor except the arrival port.
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].port, Port(2));
    match &actions[0].packet {
        Packet::Routing { content, .. } => assert_eq!(content, &original_bytes),
        other => panic!("expected a Routing packet, got {other:?}"),
    }
}

/// Unparseable LSP content is dropped rather than propagated as an error.
#[test]
fn unparseable_lsp_content_is_dropped_silently() {
    let mut c = LsRouter::new(Address(3), 1_000);
    c.on_new_link(Port(1), Address(2), Cost::new(1.0).unwrap());
    let packet = Packet::Routing {
        src_addr: Address(2),
        dst_addr: Address(3),
        content: b"garbage".to_vec(),
    };
    assert!(c.on_packet(Port(1), packet).is_empty());
}

/// S6 — a data packet with no forwarding entry produces no action.
#[test]
fn data_packet_with_no_route_is_dropped() {
    let mut a = LsRouter::new(Address(1), 1_000);
    let packet = Packet::Data {
        src_addr: Address(1),
        dst_addr: Address(99),
        payload: vec![],
    };
    assert!(a.on_packet(Port(1), packet).is_empty());
}

#[test]
fn on_remove_link_on_unknown_port_is_a_no_op() {
    let mut a = LsRouter::new(Address(1), 1_000);
    assert!(a.on_remove_link(Port(9)).is_empty());
}

#[test]
fn heartbeat_only_advertises_after_the_period_elapses() {
    let mut a = LsRouter::new(Address(1), 1_000);
    a.on_new_link(Port(1), Address(2), Cost::new(1.0).unwrap());
    let seq_after_link = a.seq();
    assert!(a.on_tick(500).is_empty());
    assert_eq!(a.seq(), seq_after_link);
    assert!(!a.on_tick(1_000).is_empty());
    assert_eq!(a.seq(), seq_after_link + 1);
}
