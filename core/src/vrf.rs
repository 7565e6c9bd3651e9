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

//! The VRF boundary. `mr01_core` only knows this trait shape; the
//! concrete elliptic-curve construction lives in `mr01_vrf` so that
//! swapping it out never touches transaction or ledger logic.

use crate::error::Error;

/// A Verifiable Random Function: a keyed pseudorandom function whose
/// output (`beta`) comes with a proof that it was derived correctly
/// from the claimed public key and message.
pub trait Vrf {
	/// Derives a public key from a secret key.
	fn keygen(&self, sk: &[u8]) -> Result<Vec<u8>, Error>;

	/// Produces a VRF proof over `message` under `sk`.
	fn prove(&self, sk: &[u8], message: &[u8]) -> Result<Vec<u8>, Error>;

	/// Verifies `proof` against `pk` and `message`, returning the VRF
	/// output (`beta`) on success. Fails with `InvalidSignature` if the
	/// proof does not verify.
	fn full_verify(&self, pk: &[u8], proof: &[u8], message: &[u8]) -> Result<Vec<u8>, Error>;
}
