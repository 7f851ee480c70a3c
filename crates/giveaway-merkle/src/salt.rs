use alloy_primitives::{b256, keccak256, B256, U256};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::{Claim, ClaimTreeError, ClaimTreeResult, SaltedClaim};

/// Fixed seed used for salts on test and ephemeral networks.
pub const DEFAULT_TEST_SEED: B256 =
    b256!("4467363716526536535425451427798982881775318563547751090997863683");

/// Regeneration attempts for a random salt before giving up.
pub const MAX_SALT_ATTEMPTS: usize = 8;

/// Strategy producing per-claim salts.
///
/// Passed explicitly to [`assign_salts`]; there is no process-wide source.
pub trait SaltSource {
    fn salt_for(&mut self, claim: &Claim) -> B256;

    /// Deterministic sources return the same salt for the same claim, so a
    /// collision cannot be resolved by asking again.
    fn is_deterministic(&self) -> bool;
}

/// Salts derived from a seed and the claim index:
/// `keccak256(abi.encode(bytes32 seed, uint256 index))`.
///
/// Reproducible across runs; only suitable where salts need not be secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedSalts {
    seed: B256,
}

impl DerivedSalts {
    pub fn new(seed: B256) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> B256 {
        self.seed
    }

    pub fn derive(&self, index: u64) -> B256 {
        let mut encoded = [0u8; 64];
        encoded[..32].copy_from_slice(self.seed.as_slice());
        encoded[32..].copy_from_slice(&U256::from(index).to_be_bytes::<32>());
        keccak256(encoded)
    }
}

impl Default for DerivedSalts {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_SEED)
    }
}

impl SaltSource for DerivedSalts {
    fn salt_for(&mut self, claim: &Claim) -> B256 {
        self.derive(claim.index)
    }

    fn is_deterministic(&self) -> bool {
        true
    }
}

/// Salts drawn from a cryptographically secure generator, for production
/// networks. Nothing about one claim's salt reveals another's.
#[derive(Debug)]
pub struct RandomSalts<R> {
    rng: R,
}

impl<R: RngCore + CryptoRng> RandomSalts<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSalts<OsRng> {
    /// Salts from the operating system's entropy source.
    pub fn from_entropy() -> Self {
        Self::new(OsRng)
    }
}

impl<R: RngCore + CryptoRng> SaltSource for RandomSalts<R> {
    fn salt_for(&mut self, _claim: &Claim) -> B256 {
        let mut salt = [0u8; 32];
        self.rng.fill_bytes(&mut salt);
        B256::from(salt)
    }

    fn is_deterministic(&self) -> bool {
        false
    }
}

/// Attach a salt to every claim, keeping salts supplied with the input.
///
/// Salts are unique across the returned set. A colliding random salt is
/// redrawn up to [`MAX_SALT_ATTEMPTS`] times; any other collision fails with
/// [`ClaimTreeError::SaltCollision`].
pub fn assign_salts<S>(claims: Vec<Claim>, source: &mut S) -> ClaimTreeResult<Vec<SaltedClaim>>
where
    S: SaltSource + ?Sized,
{
    let mut used: HashSet<B256> = HashSet::with_capacity(claims.len());

    // Supplied salts are fixed, so they claim their slots first.
    for claim in &claims {
        if let Some(salt) = claim.salt {
            if !used.insert(salt) {
                return Err(ClaimTreeError::SaltCollision { index: claim.index });
            }
        }
    }

    let supplied = used.len();
    let mut salted = Vec::with_capacity(claims.len());

    for claim in claims {
        let salt = match claim.salt {
            Some(salt) => salt,
            None => generate_unique(&claim, source, &mut used)?,
        };
        salted.push(SaltedClaim::new(claim, salt));
    }

    debug!(
        "Assigned salts to {} claims ({} supplied, deterministic: {})",
        salted.len(),
        supplied,
        source.is_deterministic()
    );
    Ok(salted)
}

fn generate_unique<S>(claim: &Claim, source: &mut S, used: &mut HashSet<B256>) -> ClaimTreeResult<B256>
where
    S: SaltSource + ?Sized,
{
    let attempts = if source.is_deterministic() {
        1
    } else {
        MAX_SALT_ATTEMPTS
    };

    for attempt in 1..=attempts {
        let salt = source.salt_for(claim);
        if used.insert(salt) {
            return Ok(salt);
        }
        warn!(
            "Salt collision for claim {} (attempt {}/{})",
            claim.index, attempt, attempts
        );
    }

    Err(ClaimTreeError::SaltCollision { index: claim.index })
}
