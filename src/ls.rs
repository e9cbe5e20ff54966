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

//! Link-state router: reliable flooding, a link-state database, and
//! Dijkstra-based shortest-path forwarding.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use serde::{Deserialize, Serialize};

use crate::{
    fmt::{fmt_costs, fmt_forwarding_with_cost},
    router::{Action, Router},
    types::{Address, ContentError, Cost, Packet, Port},
};

/// The wire content of a flooded LSP: `(origin, sequence, links)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LsContent {
    /// The router that originated this LSP (not necessarily the immediate
    /// sender — see [`Packet::Routing::src_addr`] for that).
    pub origin: Address,
    /// Monotonically increasing per-originator sequence number.
    pub seq: u64,
    /// The originator's direct links at the time of origination.
    pub links: BTreeMap<Address, Cost>,
}

impl LsContent {
    /// Serialize into the opaque bytes carried by [`Packet::Routing`].
    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("LsContent always serializes")
    }

    /// Parse a received content blob, or report why it could not be parsed.
    pub fn decode(bytes: &[u8]) -> Result<Self, ContentError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// The most recently accepted LSP from one originator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LsdbEntry {
    seq: u64,
    links: BTreeMap<Address, Cost>,
}

/// A link-state router: floods LSPs describing its direct links, maintains
/// a link-state database of the most recent LSP per originator, and derives
/// its forwarding table by running Dijkstra over the resulting graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LsRouter {
    addr: Address,
    heartbeat_period_ms: u64,
    neighbors: BTreeMap<Port, (Address, Cost)>,
    seq: u64,
    lsdb: BTreeMap<Address, LsdbEntry>,
    forwarding: BTreeMap<Address, (Port, Cost)>,
    last_heartbeat: u64,
}

impl std::fmt::Display for LsRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ls[{}]", self.addr)
    }
}

impl LsRouter {
    /// Create a new LS router with no neighbors, sequence number `0`, and an
    /// empty link-state database.
    pub fn new(address: Address, heartbeat_period_ms: u64) -> Self {
        Self {
            addr: address,
            heartbeat_period_ms,
            neighbors: BTreeMap::new(),
            seq: 0,
            lsdb: BTreeMap::new(),
            forwarding: BTreeMap::new(),
            last_heartbeat: 0,
        }
    }

    /// This router's own current sequence number.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The most recent `(seq, links)` known for `origin`, if any.
    pub fn lsdb_entry(&self, origin: Address) -> Option<(u64, &BTreeMap<Address, Cost>)> {
        self.lsdb.get(&origin).map(|e| (e.seq, &e.links))
    }

    /// This router's current forwarding table: destination to
    /// `(outgoing port, total path cost)`.
    pub fn forwarding(&self) -> &BTreeMap<Address, (Port, Cost)> {
        &self.forwarding
    }

    /// This router's currently-up direct neighbors.
    pub fn neighbors(&self) -> &BTreeMap<Port, (Address, Cost)> {
        &self.neighbors
    }

    fn own_links(&self) -> BTreeMap<Address, Cost> {
        self.neighbors.values().copied().collect()
    }

    /// Refresh this router's own LSDB entry from the current neighbor set,
    /// bump the sequence number, and flood it to every neighbor. Always
    /// followed by a route recomputation.
    fn advertise(&mut self) -> Vec<Action> {
        self.seq += 1;
        let links = self.own_links();
        self.lsdb.insert(
            self.addr,
            LsdbEntry {
                seq: self.seq,
                links: links.clone(),
            },
        );
        let content = LsContent {
            origin: self.addr,
            seq: self.seq,
            links,
        }
        .encode();
        let actions = self
            .neighbors
            .keys()
            .map(|&port| Action {
                port,
                packet: Packet::Routing {
                    src_addr: self.addr,
                    dst_addr: self.neighbors[&port].0,
                    content: content.clone(),
                },
            })
            .collect();
        self.recompute();
        actions
    }

    /// Run Dijkstra from `self` over the graph implied by `lsdb` (vertex set
    /// = LSDB keys, edge `u -> v` of weight `w` iff `lsdb[u].links[v] = w`),
    /// then derive the forwarding table from the resulting predecessor
    /// chain. Never mutates `lsdb` itself — the adjacency view is
    /// reconstructed fresh each time, per spec.md §9.
    fn recompute(&mut self) {
        let mut dist: BTreeMap<Address, Cost> = BTreeMap::new();
        let mut prev: BTreeMap<Address, Address> = BTreeMap::new();
        let mut visited: std::collections::BTreeSet<Address> = std::collections::BTreeSet::new();

        dist.insert(self.addr, Cost::ZERO);
        let mut heap = BinaryHeap::new();
        heap.push(Reverse((Cost::ZERO, self.addr)));

        while let Some(Reverse((d, u))) = heap.pop() {
            if !visited.insert(u) {
                continue;
            }
            let Some(entry) = self.lsdb.get(&u) else {
                continue;
            };
            for (&v, &w) in &entry.links {
                if visited.contains(&v) {
                    continue;
                }
                let nd = d + w;
                let better = match dist.get(&v) {
                    Some(&cur) => nd < cur,
                    None => true,
                };
                if better {
                    dist.insert(v, nd);
                    prev.insert(v, u);
                    heap.push(Reverse((nd, v)));
                }
            }
        }

        let mut forwarding = BTreeMap::new();
        for (&dest, &total_cost) in &dist {
            if dest == self.addr {
                continue;
            }
            // Walk the `prev` chain from `dest` back toward `self`; the
            // vertex immediately before `self` on that chain is the next
            // hop. A broken chain (a vertex along the way has no `prev`
            // entry, i.e. isn't `self` and isn't reachable from it) means
            // the LSDB is momentarily inconsistent — skip the destination
            // silently rather than treat it as a fault (spec.md §9 open
            // question).
            let mut next_hop = dest;
            let next_hop = loop {
                match prev.get(&next_hop) {
                    Some(&p) if p == self.addr => break Some(next_hop),
                    Some(&p) => next_hop = p,
                    None => break None,
                }
            };
            let Some(next_hop) = next_hop else {
                continue;
            };

            let port = self
                .neighbors
                .iter()
                .find(|(_, (nbr, _))| *nbr == next_hop)
                .map(|(&port, _)| port);
            let Some(port) = port else {
                // Topology inconsistency: an LSDB entry references a
                // neighbor we no longer have a live link to. Skip; it will
                // be resolved on the next LSP (spec.md §7).
                continue;
            };
            forwarding.insert(dest, (port, total_cost));
        }

        self.forwarding = forwarding;
        log::debug!(
            "{self}: recomputed lsdb = {{{}}}, forwarding = {{{}}}",
            fmt_costs(&self.own_links()),
            fmt_forwarding_with_cost(&self.forwarding)
        );
    }
}

impl Router for LsRouter {
    fn address(&self) -> Address {
        self.addr
    }

    fn on_new_link(&mut self, port: Port, endpoint: Address, cost: Cost) -> Vec<Action> {
        self.neighbors.insert(port, (endpoint, cost));
        log::debug!("{self}: new link {port} to {endpoint} cost {cost}");
        self.advertise()
    }

    fn on_remove_link(&mut self, port: Port) -> Vec<Action> {
        if self.neighbors.remove(&port).is_none() {
            return Vec::new();
        }
        log::debug!("{self}: removed link {port}");
        self.advertise()
    }

    fn on_tick(&mut self, time_ms: u64) -> Vec<Action> {
        if time_ms.saturating_sub(self.last_heartbeat) < self.heartbeat_period_ms {
            return Vec::new();
        }
        self.last_heartbeat = time_ms;
        self.advertise()
    }

    fn on_packet(&mut self, port: Port, packet: Packet) -> Vec<Action> {
        match &packet {
            Packet::Data { dst_addr, .. } => {
                let Some(&(out_port, _)) = self.forwarding.get(dst_addr) else {
                    return Vec::new();
                };
                vec![Action {
                    port: out_port,
                    packet,
                }]
            }
            Packet::Routing { content, .. } => {
                let lsp = match LsContent::decode(content) {
                    Ok(lsp) => lsp,
                    Err(err) => {
                        log::warn!("{self}: dropping unparseable LSP content: {err}");
                        return Vec::new();
                    }
                };
                // Keep the original bytes so re-flooded copies are
                // byte-identical to what arrived, not a re-serialization.
                let reflood_content = content.clone();

                let is_new = match self.lsdb.get(&lsp.origin) {
                    Some(prev) => lsp.seq > prev.seq,
                    None => true,
                };
                if !is_new {
                    // Equal-or-stale sequence: drop without re-flooding.
                    // This suppression is what terminates flooding.
                    return Vec::new();
                }

                self.lsdb.insert(
                    lsp.origin,
                    LsdbEntry {
                        seq: lsp.seq,
                        links: lsp.links,
                    },
                );
                self.recompute();

                self.neighbors
                    .iter()
                    .filter(|(&p, _)| p != port)
                    .map(|(&p, &(nbr, _))| Action {
                        port: p,
                        packet: Packet::Routing {
                            src_addr: self.addr,
                            dst_addr: nbr,
                            content: reflood_content.clone(),
                        },
                    })
                    .collect()
            }
        }
    }
}
