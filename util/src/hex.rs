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

//! Implements hex-encoding from bytes to string and decoding of strings
//! to bytes. Keys and signatures cross crate boundaries as raw byte
//! slices; hex is purely a display/persistence concern, always
//! lowercase per the settlement protocol's canonical encoding.

use std::fmt::Write;
use std::num;

/// Encode the provided bytes into a lowercase hex string.
pub fn to_hex(bytes: &[u8]) -> String {
	let mut s = String::with_capacity(bytes.len() * 2);
	for byte in bytes {
		write!(&mut s, "{:02x}", byte).expect("Unable to write");
	}
	s
}

/// Decode a hex string into bytes. Accepts an optional `0x` prefix.
pub fn from_hex(hex_str: &str) -> Result<Vec<u8>, num::ParseIntError> {
	let trimmed = hex_str.trim();
	let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
	(0..trimmed.len())
		.step_by(2)
		.map(|i| u8::from_str_radix(&trimmed[i..i + 2], 16))
		.collect()
}
