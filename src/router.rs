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

//! The shared router contract and the container type dispatching over both
//! protocol implementations.

use crate::{
    dv::DvRouter,
    ls::LsRouter,
    types::{Address, Cost, Packet, Port},
};

/// A single outgoing packet produced by a handler: "send `packet` on
/// `port`". This is the Rust rendering of spec.md §6's `send(port, packet)`
/// egress API — instead of taking a `send` callback, handlers return the
/// actions they want performed, which keeps the core free of I/O and makes
/// every handler trivially testable by inspecting the returned `Vec`.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// The local port to send on.
    pub port: Port,
    /// The packet to send.
    pub packet: Packet,
}

/// The event contract every router implements: new/removed links, periodic
/// ticks, and inbound packets, each producing zero or more [`Action`]s.
///
/// All four methods are total — they never fail to the caller — and run to
/// completion synchronously; see spec.md §5 for the concurrency model this
/// assumes (single-threaded per router, no re-entrancy).
pub trait Router {
    /// This router's own address.
    fn address(&self) -> Address;

    /// A new direct link came up on `port` to `endpoint` with the given
    /// cost. If `port` was already in use, its neighbor/cost is overwritten.
    fn on_new_link(&mut self, port: Port, endpoint: Address, cost: Cost) -> Vec<Action>;

    /// An existing direct link on `port` went down. A no-op if `port` is
    /// unknown.
    fn on_remove_link(&mut self, port: Port) -> Vec<Action>;

    /// A periodic wake-up carrying the current monotonic time in
    /// milliseconds. Work only happens once the heartbeat period has
    /// elapsed since the last one.
    fn on_tick(&mut self, time_ms: u64) -> Vec<Action>;

    /// A packet arrived on `port`.
    fn on_packet(&mut self, port: Port, packet: Packet) -> Vec<Action>;
}

/// A router that is either a [`DvRouter`] or an [`LsRouter`].
///
/// Per spec.md §9's design note, DV and LS share no mutable base state — the
/// two protocols are independent state machines realized as variants of one
/// tagged union, not subclasses of a common base. Polymorphism only exists
/// at this container boundary, where a caller holding a heterogeneous
/// collection of routers needs one type to store them as.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyRouter {
    /// A distance-vector router.
    DistanceVector(DvRouter),
    /// A link-state router.
    LinkState(LsRouter),
}

impl Router for AnyRouter {
    fn address(&self) -> Address {
        match self {
            AnyRouter::DistanceVector(r) => r.address(),
            AnyRouter::LinkState(r) => r.address(),
        }
    }

    fn on_new_link(&mut self, port: Port, endpoint: Address, cost: Cost) -> Vec<Action> {
        match self {
            AnyRouter::DistanceVector(r) => r.on_new_link(port, endpoint, cost),
            AnyRouter::LinkState(r) => r.on_new_link(port, endpoint, cost),
        }
    }

    fn on_remove_link(&mut self, port: Port) -> Vec<Action> {
        match self {
            AnyRouter::DistanceVector(r) => r.on_remove_link(port),
            AnyRouter::LinkState(r) => r.on_remove_link(port),
        }
    }

    fn on_tick(&mut self, time_ms: u64) -> Vec<Action> {
        match self {
            AnyRouter::DistanceVector(r) => r.on_tick(time_ms),
            AnyRouter::LinkState(r) => r.on_tick(time_ms),
        }
    }

    fn on_packet(&mut self, port: Port, packet: Packet) -> Vec<Action> {
        match self {
            AnyRouter::DistanceVector(r) => r.on_packet(port, packet),
            AnyRouter::LinkState(r) => r.on_packet(port, packet),
        }
    }
}

impl From<DvRouter> for AnyRouter {
    fn from(r: DvRouter) -> Self {
        AnyRouter::DistanceVector(r)
    }
}

impl From<LsRouter> for AnyRouter {
    fn from(r: LsRouter) -> Self {
        AnyRouter::LinkState(r)
    }
}
