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

//! On-disk configuration for a `Bank`, in the style of `grin_config`:
//! a small `serde`-derived struct with a sane `Default`, loadable from
//! TOML.

use mr01_util::LoggingConfig;
use serde::{Deserialize, Serialize};

use mr01_core::DEFAULT_MACROPAYMENT_UNIT;

/// Configuration for a `Bank` instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankConfig {
	/// The system-wide macropayment unit `M`. Every wallet evaluating
	/// checks against this bank must agree on this value.
	pub macropayment_unit: u64,
	/// Logging setup, shared with the rest of the workspace.
	pub logging: LoggingConfig,
}

impl Default for BankConfig {
	fn default() -> BankConfig {
		BankConfig {
			macropayment_unit: DEFAULT_MACROPAYMENT_UNIT,
			logging: LoggingConfig::default(),
		}
	}
}

impl BankConfig {
	/// Parses a `BankConfig` from a TOML document.
	pub fn from_toml(input: &str) -> Result<BankConfig, toml::de::Error> {
		toml::from_str(input)
	}

	/// Serializes this config back to TOML.
	pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
		toml::to_string(self)
	}
}
