// Copyright 2016 The Grin Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core types for the mr01 probabilistic micropayment settlement
//! protocol: the `Transaction` (check), the shared error taxonomy, the
//! canonical hash used to build signing messages, and the `Vrf` trait
//! boundary that `mr01_vrf` implements.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

#[macro_use]
extern crate failure_derive;

pub mod error;
pub mod hash;
pub mod transaction;
pub mod vrf;

pub use error::{Error, ErrorKind};
pub use transaction::{Transaction, DEFAULT_MACROPAYMENT_UNIT};
pub use vrf::Vrf;
