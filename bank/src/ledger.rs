// Copyright 2018 The Grin Developers
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

//! Per-user ledger state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use mr01_core::Transaction;

/// A single committed check plus the two VRF proofs that made it
/// payable.
pub type HistoryEntry = (Transaction, Vec<u8>, Vec<u8>);

/// The bank's view of one public key: everything it has ever received
/// and everything it has spent.
///
/// Lazily created on first deposit or first credited receipt; never
/// destroyed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRecord {
	/// Cumulative coins ever credited to this key. Monotonic
	/// non-decreasing.
	pub total_received: u64,
	/// Current spendable balance.
	pub balance: u64,
	/// Committed checks, keyed by `sn`. No two stored checks of one
	/// payer may share an `sn`, since that would itself be a
	/// double-spend caught before insertion.
	pub history: HashMap<u64, HistoryEntry>,
}

impl UserRecord {
	/// An empty record, as created lazily on first contact.
	pub fn new() -> UserRecord {
		UserRecord::default()
	}
}
