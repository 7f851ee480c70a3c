use alloy_primitives::{keccak256, Address, B256, U256};

use crate::SaltedClaim;

/// Size of one ABI word.
pub const WORD: usize = 32;

/// Words in the head of the encoding: recipient, array offset, salt.
const HEAD_WORDS: usize = 3;

/// Words per encoded entitlement tuple: contract, token id, amount.
const ENTITLEMENT_WORDS: usize = 3;

/// ABI-encode a salted claim exactly as the verifier re-encodes it:
///
/// ```text
/// abi.encode(
///     address to,
///     (address contractAddress, uint256 id, uint256 amount)[] entitlements,
///     bytes32 salt
/// )
/// ```
///
/// ## ⚠️ Layout must never change
///
/// The verifier recomputes this byte string on-chain. Any change to field
/// order, padding or integer width produces proofs that look valid but never
/// verify.
///
/// ```text
/// word 0        recipient, left-padded to 32 bytes
/// word 1        offset of the array tail, always 0x60
/// word 2        salt
/// word 3        array length n
/// word 4+3i..   contract_i (padded), token_id_i, amount_i
/// ```
///
/// Entitlements are written in the claim's canonical (sorted) order.
pub fn encode_claim(salted: &SaltedClaim) -> Vec<u8> {
    let entitlements = &salted.claim.entitlements;
    let mut out =
        Vec::with_capacity(WORD * (HEAD_WORDS + 1 + ENTITLEMENT_WORDS * entitlements.len()));

    push_address(&mut out, salted.claim.recipient);
    push_uint(&mut out, U256::from(HEAD_WORDS * WORD));
    out.extend_from_slice(salted.salt.as_slice());

    push_uint(&mut out, U256::from(entitlements.len()));
    for entitlement in entitlements {
        push_address(&mut out, entitlement.token.contract);
        push_uint(&mut out, entitlement.token.token_id);
        push_uint(&mut out, entitlement.amount);
    }

    out
}

/// Leaf hash of a salted claim: `keccak256(encode_claim(claim))`.
///
/// No domain prefix is applied; the verifier hashes the raw encoding.
pub fn hash_claim(salted: &SaltedClaim) -> B256 {
    keccak256(encode_claim(salted))
}

fn push_address(out: &mut Vec<u8>, address: Address) {
    out.extend_from_slice(&[0u8; 12]);
    out.extend_from_slice(address.as_slice());
}

fn push_uint(out: &mut Vec<u8>, value: U256) {
    out.extend_from_slice(&value.to_be_bytes::<WORD>());
}
