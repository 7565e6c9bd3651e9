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

//! The single hash primitive used to build a transaction's signing
//! message: SHA-256 over the canonical UTF-8 encoding, hex-lowercase.

use sha2::{Digest, Sha256};

/// Hashes `input` and returns the lowercase hex digest.
pub fn hash_hex(input: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(input.as_bytes());
	mr01_util::to_hex(&hasher.finalize())
}
