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

//! Distance-vector (Bellman-Ford style) router.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    fmt::{fmt_costs, fmt_forwarding},
    router::{Action, Router},
    types::{Address, ContentError, Cost, Packet, Port},
};

/// The wire content of a DV routing packet: this router's current distance
/// vector. Serializes to a JSON object (`{"1": 0, "2": 5.0, ...}`) via
/// `serde_json`, which round-trips losslessly and is self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DvContent(pub BTreeMap<Address, Cost>);

impl DvContent {
    /// Serialize into the opaque bytes carried by [`Packet::Routing`].
    pub fn encode(&self) -> Vec<u8> {
        // A `BTreeMap` is always valid JSON; this cannot fail in practice.
        serde_json::to_vec(self).expect("DvContent always serializes")
    }

    /// Parse a received content blob, or report why it could not be parsed.
    pub fn decode(bytes: &[u8]) -> Result<Self, ContentError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// A distance-vector router: maintains a distance vector and forwarding
/// table via neighbor-exchanged vectors, à la Bellman-Ford.
///
/// This implementation does not apply split horizon or poisoned reverse; it
/// relies on periodic re-advertisement and bounded costs to converge, and is
/// therefore susceptible to count-to-infinity in adversarial topologies —
/// preserved intentionally, see spec.md §4.2 and §9.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DvRouter {
    addr: Address,
    heartbeat_period_ms: u64,
    neighbors: BTreeMap<Port, (Address, Cost)>,
    dv: BTreeMap<Address, Cost>,
    neighbor_dv: BTreeMap<Address, BTreeMap<Address, Cost>>,
    forwarding: BTreeMap<Address, Port>,
    last_heartbeat: u64,
}

impl std::fmt::Display for DvRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dv[{}]", self.addr)
    }
}

impl DvRouter {
    /// Create a new DV router with no neighbors and an empty vector except
    /// for `dv[self] = 0`.
    pub fn new(address: Address, heartbeat_period_ms: u64) -> Self {
        let mut dv = BTreeMap::new();
        dv.insert(address, Cost::ZERO);
        Self {
            addr: address,
            heartbeat_period_ms,
            neighbors: BTreeMap::new(),
            dv,
            neighbor_dv: BTreeMap::new(),
            forwarding: BTreeMap::new(),
            last_heartbeat: 0,
        }
    }

    /// This router's current distance vector.
    pub fn dv(&self) -> &BTreeMap<Address, Cost> {
        &self.dv
    }

    /// This router's current forwarding table.
    pub fn forwarding(&self) -> &BTreeMap<Address, Port> {
        &self.forwarding
    }

    /// This router's currently-up direct neighbors.
    pub fn neighbors(&self) -> &BTreeMap<Port, (Address, Cost)> {
        &self.neighbors
    }

    /// Find the port facing a given neighbor address, if any is currently
    /// up. Iterates `neighbors` in port order, so ties between parallel
    /// links to the same address resolve to the lowest-numbered port.
    fn port_for(&self, addr: Address) -> Option<Port> {
        self.neighbors
            .iter()
            .find(|(_, (nbr, _))| *nbr == addr)
            .map(|(port, _)| *port)
    }

    /// Rebuild `dv` and `forwarding` from scratch: direct links first, then
    /// relaxation against each neighbor's last-seen vector. See spec.md
    /// §4.2 "Recomputation".
    fn recompute(&mut self) {
        let mut new_dv = BTreeMap::new();
        let mut new_ft = BTreeMap::new();
        new_dv.insert(self.addr, Cost::ZERO);

        for (&port, &(nbr, cost)) in &self.neighbors {
            let better = match new_dv.get(&nbr) {
                Some(&cur) => cost < cur,
                None => true,
            };
            if better {
                new_dv.insert(nbr, cost);
                new_ft.insert(nbr, port);
            }
        }

        for (nbr, v_n) in &self.neighbor_dv {
            let Some(port) = self.port_for(*nbr) else {
                continue;
            };
            let c_n = self.neighbors[&port].1;
            for (&dest, &c) in v_n {
                if dest == self.addr {
                    continue;
                }
                let total = c_n + c;
                let better = match new_dv.get(&dest) {
                    Some(&cur) => total < cur,
                    None => true,
                };
                if better {
                    new_dv.insert(dest, total);
                    new_ft.insert(dest, port);
                }
            }
        }

        self.dv = new_dv;
        self.forwarding = new_ft;
        log::debug!(
            "{self}: recomputed dv = {{{}}}, forwarding = {{{}}}",
            fmt_costs(&self.dv),
            fmt_forwarding(&self.forwarding)
        );
    }

    /// Emit this router's current vector to every direct neighbor.
    fn advertise(&self) -> Vec<Action> {
        let content = DvContent(self.dv.clone()).encode();
        self.neighbors
            .iter()
            .map(|(&port, &(nbr, _))| Action {
                port,
                packet: Packet::Routing {
                    src_addr: self.addr,
                    dst_addr: nbr,
                    content: content.clone(),
                },
            })
            .collect()
    }
}

impl Router for DvRouter {
    fn address(&self) -> Address {
        self.addr
    }

    fn on_new_link(&mut self, port: Port, endpoint: Address, cost: Cost) -> Vec<Action> {
        self.neighbors.insert(port, (endpoint, cost));
        self.neighbor_dv.entry(endpoint).or_default();

        let better = match self.dv.get(&endpoint) {
            Some(&cur) => cost < cur,
            None => true,
        };
        if better {
            self.dv.insert(endpoint, cost);
            self.forwarding.insert(endpoint, port);
        }

        log::debug!("{self}: new link {port} to {endpoint} cost {cost}");
        self.advertise()
    }

    fn on_remove_link(&mut self, port: Port) -> Vec<Action> {
        let Some((endpoint, _)) = self.neighbors.remove(&port) else {
            return Vec::new();
        };
        self.neighbor_dv.remove(&endpoint);
        log::debug!("{self}: removed link {port} (was {endpoint})");
        self.recompute();
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
        let _ = port; // DV identifies the sender by `src_addr`, not the arrival port.
        match &packet {
            Packet::Data { dst_addr, .. } => {
                let Some(&out_port) = self.forwarding.get(dst_addr) else {
                    return Vec::new();
                };
                vec![Action {
                    port: out_port,
                    packet,
                }]
            }
            Packet::Routing {
                src_addr, content, ..
            } => {
                let vector = match DvContent::decode(content) {
                    Ok(v) => v.0,
                    Err(err) => {
                        log::warn!(
                            "{self}: dropping unparseable DV content from {src_addr}: {err}"
                        );
                        return Vec::new();
                    }
                };
                if self.neighbor_dv.get(src_addr) == Some(&vector) {
                    return Vec::new();
                }
                self.neighbor_dv.insert(*src_addr, vector);
                self.recompute();
                self.advertise()
            }
        }
    }
}
