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

//! Shared data model: addresses, ports, costs, and the packet envelope.

use ordered_float::NotNan;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Add;

/// Opaque node identifier. Equatable, hashable, and totally ordered so that
/// deterministic tie-breaks (§5) can sort on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub u64);

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "N{}", self.0)
    }
}

impl From<u64> for Address {
    fn from(x: u64) -> Self {
        Self(x)
    }
}

/// Opaque local handle naming one link endpoint on a router. Stable for the
/// life of the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(pub u32);

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "port{}", self.0)
    }
}

impl From<u32> for Port {
    fn from(x: u32) -> Self {
        Self(x)
    }
}

/// A non-negative, finite-or-infinite link/path cost.
///
/// Addition saturates at [`Cost::INFINITY`] rather than panicking or
/// wrapping: IEEE-754 float addition already has `INFINITY + x = INFINITY`
/// for any finite `x`, so `Cost` gets the saturating-add requirement from
/// spec.md §3 for free by wrapping `f64` instead of an integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cost(NotNan<f64>);

/// Error constructing a [`Cost`] from a raw value.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CostError {
    /// The value was negative. Costs must be non-negative (spec.md §3).
    #[error("cost must be non-negative, got {0}")]
    Negative(f64),
    /// The value was NaN.
    #[error("cost must not be NaN")]
    NotANumber,
}

impl Cost {
    /// The zero cost, assigned to `dv[self]`/the root of a shortest-path tree.
    pub const ZERO: Cost = Cost(unsafe { NotNan::new_unchecked(0.0) });

    /// The conventional "unreachable" sentinel. Saturating: adding any finite
    /// cost to it yields itself.
    pub const INFINITY: Cost = Cost(unsafe { NotNan::new_unchecked(f64::INFINITY) });

    /// Build a `Cost`, rejecting negative or NaN input.
    pub fn new(value: f64) -> Result<Self, CostError> {
        if value.is_nan() {
            return Err(CostError::NotANumber);
        }
        if value < 0.0 {
            return Err(CostError::Negative(value));
        }
        Ok(Cost(NotNan::new(value).expect("checked for NaN above")))
    }

    /// The underlying floating-point value.
    pub fn value(self) -> f64 {
        self.0.into_inner()
    }

    /// Whether this cost is the unreachable sentinel.
    pub fn is_infinite(self) -> bool {
        self.0.into_inner().is_infinite()
    }
}

// `serde_json` has no native representation for non-finite floats (its
// default `f64` serialization writes non-finite values as `null`, which
// does not parse back into a `NotNan<f64>`). `Cost::INFINITY` is part of the
// domain (spec.md §3), so it needs an explicit wire form to satisfy the
// round-trip requirement of spec.md §6 — encode it as the string `"inf"`
// and every other cost as an ordinary JSON number.
impl Serialize for Cost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_infinite() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_f64(self.value())
        }
    }
}

impl<'de> Deserialize<'de> for Cost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CostVisitor;

        impl<'de> de::Visitor<'de> for CostVisitor {
            type Value = Cost;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "a non-negative number or the string \"inf\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Cost, E> {
                Cost::new(v).map_err(de::Error::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Cost, E> {
                Cost::new(v as f64).map_err(de::Error::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Cost, E> {
                Cost::new(v as f64).map_err(de::Error::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Cost, E> {
                if v == "inf" {
                    Ok(Cost::INFINITY)
                } else {
                    Err(de::Error::custom(format!("unrecognized cost string {v:?}")))
                }
            }
        }

        deserializer.deserialize_any(CostVisitor)
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        // The sum can only be NaN if the operands are infinities of opposite
        // sign, which never happens since every `Cost` is non-negative.
        let sum = self.0.into_inner() + rhs.0.into_inner();
        Cost(NotNan::new(sum).unwrap_or(Self::INFINITY.0))
    }
}

impl std::fmt::Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_infinite() {
            write!(f, "inf")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A packet exchanged between two directly-connected routers.
///
/// `Data` packets carry user traffic and are forwarded hop-by-hop by
/// consulting the receiving router's forwarding table. `Routing` packets
/// carry a protocol-defined `content` blob — a serialized [`DvContent`] for
/// DV routers, a serialized [`LsContent`](crate::LsContent) for LS routers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Packet {
    /// User data, forwarded hop-by-hop toward `dst_addr`.
    Data {
        /// Originator of the data.
        src_addr: Address,
        /// Final destination.
        dst_addr: Address,
        /// Opaque application payload.
        payload: Vec<u8>,
    },
    /// A routing advertisement between two directly-connected routers.
    Routing {
        /// Immediate sender (not the LSP originator for LS content).
        src_addr: Address,
        /// Intended receiving neighbor.
        dst_addr: Address,
        /// Protocol-defined serialization; opaque to the envelope itself.
        content: Vec<u8>,
    },
}

/// Error parsing the `content` of a [`Packet::Routing`].
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The content could not be deserialized.
    #[error("malformed routing content: {0}")]
    Json(#[from] serde_json::Error),
}
