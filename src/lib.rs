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

#![deny(missing_debug_implementations)]

//! # routecore
//!
//! Node-local protocol cores for an intra-domain routing engine: a
//! distance-vector (DV) router and a link-state (LS) router.
//!
//! Each router is a single-threaded, re-entrancy-free state machine driven by
//! four events — [`Router::on_new_link`], [`Router::on_remove_link`],
//! [`Router::on_tick`], [`Router::on_packet`] — and produces [`Action`]s
//! (packets to send on a given local [`Port`]) as its only externally
//! observable effect. Neither router performs any I/O itself; a caller
//! (simulator, test, or real transport glue) owns delivering packets in and
//! dispatching actions out.
//!
//! This crate does not implement framing, transport, advertisement
//! authentication, equal-cost multipath, or any IP address semantics —
//! addresses and ports are opaque identifiers assigned by the caller.
//!
//! ## Example
//!
//! ```
//! use routecore::prelude::*;
//!
//! let mut a = DvRouter::new(Address(1), 1_000);
//! let mut b = DvRouter::new(Address(2), 1_000);
//!
//! let actions_a = a.on_new_link(Port(1), Address(2), Cost::new(5.0).unwrap());
//! let actions_b = b.on_new_link(Port(1), Address(1), Cost::new(5.0).unwrap());
//!
//! assert_eq!(a.forwarding().get(&Address(2)), Some(&Port(1)));
//! assert_eq!(b.forwarding().get(&Address(1)), Some(&Port(1)));
//! assert_eq!(actions_a.len(), 1);
//! assert_eq!(actions_b.len(), 1);
//! ```

mod dv;
mod fmt;
mod ls;
mod router;
mod types;

#[cfg(test)]
mod test;

pub use dv::{DvContent, DvRouter};
pub use ls::{LsContent, LsRouter};
pub use router::{Action, AnyRouter, Router};
pub use types::{Address, ContentError, Cost, CostError, Packet, Port};

/// Convenience re-export of the crate's public surface.
pub mod prelude {
    pub use crate::{
        Action, Address, AnyRouter, ContentError, Cost, CostError, DvContent, DvRouter, LsContent,
        LsRouter, Packet, Port, Router,
    };
}
