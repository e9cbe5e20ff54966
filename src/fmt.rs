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

//! Small formatting helpers shared by the DV and LS log call sites.
//!
//! The teacher crate threads a `NetworkFormatter` trait through every
//! loggable type so it can resolve router ids to names via a `Network`
//! context; there is no multi-router `Network` type in this crate (routers
//! are created standalone by the caller), so this module is just the
//! join/format glue those call sites need directly.

use itertools::Itertools;
use std::collections::BTreeMap;

use crate::types::{Address, Cost, Port};

/// Render a `dest -> cost` map as `"N1: 3, N2: inf"`, used by DV/LS `debug!`
/// call sites to avoid repeating the same `Itertools::join` at each one.
pub(crate) fn fmt_costs(map: &BTreeMap<Address, Cost>) -> String {
    map.iter().map(|(a, c)| format!("{a}: {c}")).join(", ")
}

/// Render a `dest -> port` forwarding table as `"N1: port1, N2: port3"`.
pub(crate) fn fmt_forwarding(map: &BTreeMap<Address, Port>) -> String {
    map.iter().map(|(a, p)| format!("{a}: {p}")).join(", ")
}

/// Render a `dest -> (port, cost)` forwarding table as used by the LS
/// router, e.g. `"N1: port1 (3), N2: port3 (inf)"`.
pub(crate) fn fmt_forwarding_with_cost(map: &BTreeMap<Address, (Port, Cost)>) -> String {
    map.iter()
        .map(|(a, (p, c))| format!("{a}: {p} ({c})"))
        .join(", ")
}
