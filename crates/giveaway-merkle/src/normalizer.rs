use alloy_primitives::{Address, B256, U256};
use serde_json::Value;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::{
    ClaimTreeError, ClaimTreeResult, DuplicatePolicy, Claim, Entitlement, RawClaim,
    RawEntitlement, TokenType,
};

/// Normalize every raw record of a claim set.
///
/// A record's index is its explicit `index` field or, when absent, its
/// position in `raw_claims`, and must be unique across the set. The first
/// invalid record aborts the whole set.
pub fn normalize_claims(
    raw_claims: &[RawClaim],
    policy: DuplicatePolicy,
) -> ClaimTreeResult<Vec<Claim>> {
    let mut claims = Vec::with_capacity(raw_claims.len());
    let mut seen: HashSet<(Address, TokenType)> = HashSet::new();
    let mut seen_indices: HashSet<u64> = HashSet::with_capacity(raw_claims.len());

    for (position, raw) in raw_claims.iter().enumerate() {
        let index = raw.index.unwrap_or(position as u64);
        if !seen_indices.insert(index) {
            return Err(ClaimTreeError::claim_data(index, "duplicate claim index"));
        }
        let claim = normalize_claim(raw, index, policy)?;

        if policy == DuplicatePolicy::Reject {
            for entitlement in &claim.entitlements {
                if !seen.insert((claim.recipient, entitlement.token)) {
                    return Err(ClaimTreeError::claim_data(
                        index,
                        format!(
                            "recipient {} already has a claim for token {} id {}",
                            claim.recipient.to_checksum(None),
                            entitlement.token.contract.to_checksum(None),
                            entitlement.token.token_id
                        ),
                    ));
                }
            }
        }

        claims.push(claim);
    }

    debug!("Normalized {} claims", claims.len());
    Ok(claims)
}

/// Normalize a single raw record into its canonical form.
pub fn normalize_claim(
    raw: &RawClaim,
    index: u64,
    policy: DuplicatePolicy,
) -> ClaimTreeResult<Claim> {
    let invalid = |reason: String| ClaimTreeError::claim_data(index, reason);

    let recipient = raw
        .to
        .as_deref()
        .ok_or_else(|| invalid("missing recipient".to_string()))?;
    let recipient = parse_address(recipient).map_err(|e| invalid(format!("recipient: {e}")))?;
    if recipient == Address::ZERO {
        return Err(invalid("recipient is the zero address".to_string()));
    }

    if raw.entitlements.is_empty() {
        return Err(invalid("claim has no entitlements".to_string()));
    }

    let mut merged: BTreeMap<TokenType, U256> = BTreeMap::new();
    for (position, raw_entitlement) in raw.entitlements.iter().enumerate() {
        let entitlement = normalize_entitlement(raw_entitlement)
            .map_err(|e| invalid(format!("entitlement {position}: {e}")))?;

        match merged.entry(entitlement.token) {
            Entry::Vacant(slot) => {
                slot.insert(entitlement.amount);
            }
            Entry::Occupied(mut slot) => match policy {
                DuplicatePolicy::Reject => {
                    return Err(invalid(format!(
                        "entitlement {position}: duplicate token {} id {}",
                        entitlement.token.contract.to_checksum(None),
                        entitlement.token.token_id
                    )));
                }
                DuplicatePolicy::Allow => {
                    let total = slot.get().checked_add(entitlement.amount).ok_or_else(|| {
                        invalid(format!("entitlement {position}: summed amount overflows"))
                    })?;
                    slot.insert(total);
                }
            },
        }
    }

    let salt = raw
        .salt
        .as_deref()
        .map(parse_salt)
        .transpose()
        .map_err(|e| invalid(format!("salt: {e}")))?;

    Ok(Claim {
        index,
        recipient,
        entitlements: merged
            .into_iter()
            .map(|(token, amount)| Entitlement { token, amount })
            .collect(),
        salt,
    })
}

fn normalize_entitlement(raw: &RawEntitlement) -> Result<Entitlement, String> {
    let contract = raw
        .contract_address
        .as_deref()
        .ok_or("missing contract address")?;
    let contract = parse_address(contract).map_err(|e| format!("contract: {e}"))?;
    if contract == Address::ZERO {
        return Err("contract is the zero address".to_string());
    }

    let token_id = match &raw.id {
        Some(value) => parse_uint(value).map_err(|e| format!("token id: {e}"))?,
        None => U256::ZERO,
    };

    let amount = raw.amount.as_ref().ok_or("missing amount")?;
    let amount = parse_uint(amount).map_err(|e| format!("amount: {e}"))?;

    Ok(Entitlement {
        token: TokenType::new(contract, token_id),
        amount,
    })
}

/// Parse a 20-byte address from hex, with or without `0x`.
///
/// All-lowercase and all-uppercase input is accepted as-is. Mixed-case input
/// must carry a valid EIP-55 checksum.
pub fn parse_address(value: &str) -> Result<Address, String> {
    let trimmed = value.trim();
    let digits = strip_hex_prefix(trimmed).unwrap_or(trimmed);

    if digits.len() != 40 {
        return Err(format!(
            "expected 40 hex characters, got {}",
            digits.len()
        ));
    }

    let bytes = hex::decode(digits).map_err(|e| format!("invalid hex: {e}"))?;
    let address = Address::from_slice(&bytes);

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        let checksummed = address.to_checksum(None);
        if checksummed[2..] != *digits {
            return Err(format!("checksum mismatch, expected {checksummed}"));
        }
    }

    Ok(address)
}

/// Parse a non-negative integer of at most 256 bits.
///
/// Accepts JSON integers, decimal strings and `0x` hex strings. Integers
/// above `u64::MAX` must be given as strings since JSON numbers lose
/// precision past that point.
pub fn parse_uint(value: &Value) -> Result<U256, String> {
    match value {
        Value::Number(number) => {
            if let Some(n) = number.as_u64() {
                Ok(U256::from(n))
            } else if number.as_i64().is_some() {
                Err(format!("negative value {number}"))
            } else {
                Err(format!(
                    "{number} is not an exact integer, use a decimal string"
                ))
            }
        }
        Value::String(s) => parse_uint_str(s),
        other => Err(format!("expected a number or numeric string, got {other}")),
    }
}

fn parse_uint_str(value: &str) -> Result<U256, String> {
    let trimmed = value.trim();
    if trimmed.starts_with('-') {
        return Err(format!("negative value {trimmed}"));
    }

    let (digits, radix) = match strip_hex_prefix(trimmed) {
        Some(hex_digits) => (hex_digits, 16),
        None => (trimmed, 10),
    };

    let valid = !digits.is_empty()
        && digits.chars().all(|c| match radix {
            16 => c.is_ascii_hexdigit(),
            _ => c.is_ascii_digit(),
        });
    if !valid {
        return Err(format!("'{trimmed}' is not a non-negative integer"));
    }

    U256::from_str_radix(digits, radix).map_err(|_| format!("'{trimmed}' exceeds 256 bits"))
}

/// Parse a 32-byte salt from hex, with or without `0x`.
pub fn parse_salt(value: &str) -> Result<B256, String> {
    let trimmed = value.trim();
    let digits = strip_hex_prefix(trimmed).unwrap_or(trimmed);
    let bytes = hex::decode(digits).map_err(|e| format!("invalid hex: {e}"))?;
    if bytes.len() != 32 {
        return Err(format!("expected 32 bytes, got {}", bytes.len()));
    }
    Ok(B256::from_slice(&bytes))
}

fn strip_hex_prefix(value: &str) -> Option<&str> {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RECIPIENT: &str = "0x00000000000000000000000000000000000000aa";
    const TOKEN_A: &str = "0x00000000000000000000000000000000000000c1";
    const TOKEN_B: &str = "0x00000000000000000000000000000000000000c2";

    fn entitlement(contract: &str, id: Option<Value>, amount: Value) -> RawEntitlement {
        RawEntitlement {
            contract_address: Some(contract.to_string()),
            id,
            amount: Some(amount),
        }
    }

    fn raw_claim(to: &str, entitlements: Vec<RawEntitlement>) -> RawClaim {
        RawClaim {
            to: Some(to.to_string()),
            entitlements,
            index: None,
            salt: None,
        }
    }

    fn assert_claim_data_error(result: ClaimTreeResult<Claim>, needle: &str) {
        match result {
            Err(ClaimTreeError::ClaimData { reason, .. }) => assert!(
                reason.contains(needle),
                "expected reason containing '{needle}', got '{reason}'"
            ),
            other => panic!("expected ClaimData error, got {other:?}"),
        }
    }

    #[test]
    fn test_entitlements_are_sorted_by_token_type() {
        let raw = raw_claim(
            RECIPIENT,
            vec![
                entitlement(TOKEN_B, None, json!(1)),
                entitlement(TOKEN_A, Some(json!(9)), json!(2)),
                entitlement(TOKEN_A, Some(json!("3")), json!(3)),
            ],
        );

        let claim = normalize_claim(&raw, 0, DuplicatePolicy::Reject).unwrap();
        let order: Vec<(u8, U256)> = claim
            .entitlements
            .iter()
            .map(|e| (e.token.contract.0[19], e.token.token_id))
            .collect();

        assert_eq!(
            order,
            vec![
                (0xc1, U256::from(3)),
                (0xc1, U256::from(9)),
                (0xc2, U256::ZERO)
            ]
        );
    }

    #[test]
    fn test_amount_encodings() {
        assert_eq!(parse_uint(&json!(100)).unwrap(), U256::from(100));
        assert_eq!(parse_uint(&json!("0100")).unwrap(), U256::from(100));
        assert_eq!(parse_uint(&json!("0x64")).unwrap(), U256::from(100));
        assert_eq!(parse_uint(&json!(" 7 ")).unwrap(), U256::from(7));

        let large = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(parse_uint(&json!(large)).unwrap(), U256::MAX);
    }

    #[test]
    fn test_amount_rejections() {
        assert!(parse_uint(&json!(-1)).unwrap_err().contains("negative"));
        assert!(parse_uint(&json!("-5")).unwrap_err().contains("negative"));
        assert!(parse_uint(&json!(1.5)).is_err());
        assert!(parse_uint(&json!("1.5")).is_err());
        assert!(parse_uint(&json!("abc")).is_err());
        assert!(parse_uint(&json!("")).is_err());
        assert!(parse_uint(&json!(true)).is_err());
        assert!(parse_uint(&json!(null)).is_err());

        let too_wide = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(parse_uint(&json!(too_wide))
            .unwrap_err()
            .contains("exceeds 256 bits"));
    }

    #[test]
    fn test_address_checksum_rules() {
        let lower = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
        let upper = "0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED";
        let checksummed = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        let bad_checksum = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD";

        let address = parse_address(lower).unwrap();
        assert_eq!(parse_address(upper).unwrap(), address);
        assert_eq!(parse_address(checksummed).unwrap(), address);
        assert_eq!(address.to_checksum(None), checksummed);
        assert!(parse_address(bad_checksum).unwrap_err().contains("checksum"));

        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("0xzz00000000000000000000000000000000000000").is_err());
        assert!(parse_address("00000000000000000000000000000000000000aa").is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let mut raw = raw_claim(RECIPIENT, vec![entitlement(TOKEN_A, None, json!(1))]);
        raw.to = None;
        assert_claim_data_error(
            normalize_claim(&raw, 0, DuplicatePolicy::Reject),
            "missing recipient",
        );

        let raw = raw_claim(RECIPIENT, vec![]);
        assert_claim_data_error(
            normalize_claim(&raw, 0, DuplicatePolicy::Reject),
            "no entitlements",
        );

        let raw = raw_claim(
            RECIPIENT,
            vec![RawEntitlement {
                contract_address: Some(TOKEN_A.to_string()),
                id: None,
                amount: None,
            }],
        );
        assert_claim_data_error(
            normalize_claim(&raw, 0, DuplicatePolicy::Reject),
            "missing amount",
        );

        let raw = raw_claim(
            RECIPIENT,
            vec![RawEntitlement {
                contract_address: None,
                id: None,
                amount: Some(json!(1)),
            }],
        );
        assert_claim_data_error(
            normalize_claim(&raw, 0, DuplicatePolicy::Reject),
            "missing contract",
        );
    }

    #[test]
    fn test_zero_recipient_rejected() {
        let raw = raw_claim(
            "0x0000000000000000000000000000000000000000",
            vec![entitlement(TOKEN_A, None, json!(1))],
        );
        assert_claim_data_error(
            normalize_claim(&raw, 0, DuplicatePolicy::Reject),
            "zero address",
        );
    }

    #[test]
    fn test_duplicate_token_within_claim() {
        let raw = raw_claim(
            RECIPIENT,
            vec![
                entitlement(TOKEN_A, None, json!(10)),
                entitlement(TOKEN_A, Some(json!(0)), json!(5)),
            ],
        );

        assert_claim_data_error(
            normalize_claim(&raw, 0, DuplicatePolicy::Reject),
            "duplicate token",
        );

        let merged = normalize_claim(&raw, 0, DuplicatePolicy::Allow).unwrap();
        assert_eq!(merged.entitlements.len(), 1);
        assert_eq!(merged.entitlements[0].amount, U256::from(15));
    }

    #[test]
    fn test_duplicate_sum_overflow() {
        let raw = raw_claim(
            RECIPIENT,
            vec![
                entitlement(TOKEN_A, None, json!(format!("{}", U256::MAX))),
                entitlement(TOKEN_A, None, json!(1)),
            ],
        );
        assert_claim_data_error(
            normalize_claim(&raw, 0, DuplicatePolicy::Allow),
            "overflows",
        );
    }

    #[test]
    fn test_duplicate_recipient_token_across_claims() {
        let claims = vec![
            raw_claim(RECIPIENT, vec![entitlement(TOKEN_A, None, json!(1))]),
            raw_claim(RECIPIENT, vec![entitlement(TOKEN_A, None, json!(2))]),
        ];

        let err = normalize_claims(&claims, DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, ClaimTreeError::ClaimData { index: 1, .. }));

        let allowed = normalize_claims(&claims, DuplicatePolicy::Allow).unwrap();
        assert_eq!(allowed.len(), 2);
    }

    #[test]
    fn test_indices_default_to_position() {
        let mut second = raw_claim(TOKEN_B, vec![entitlement(TOKEN_A, None, json!(2))]);
        second.index = Some(42);
        let claims = vec![
            raw_claim(RECIPIENT, vec![entitlement(TOKEN_A, None, json!(1))]),
            second,
            raw_claim(TOKEN_A, vec![entitlement(TOKEN_A, None, json!(3))]),
        ];

        let normalized = normalize_claims(&claims, DuplicatePolicy::Reject).unwrap();
        let indices: Vec<u64> = normalized.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 42, 2]);
    }

    #[test]
    fn test_duplicate_claim_index_rejected() {
        // Explicit index 0 clashes with the first claim's position
        let mut second = raw_claim(TOKEN_B, vec![entitlement(TOKEN_A, None, json!(2))]);
        second.index = Some(0);
        let claims = vec![
            raw_claim(RECIPIENT, vec![entitlement(TOKEN_A, None, json!(1))]),
            second,
        ];

        for policy in [DuplicatePolicy::Reject, DuplicatePolicy::Allow] {
            match normalize_claims(&claims, policy) {
                Err(ClaimTreeError::ClaimData { index, reason }) => {
                    assert_eq!(index, 0);
                    assert!(reason.contains("duplicate claim index"));
                }
                other => panic!("expected ClaimData error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_salt_parsing() {
        let mut raw = raw_claim(RECIPIENT, vec![entitlement(TOKEN_A, None, json!(1))]);
        raw.salt = Some(format!("0x{}", "ab".repeat(32)));
        let claim = normalize_claim(&raw, 0, DuplicatePolicy::Reject).unwrap();
        assert_eq!(claim.salt, Some(B256::repeat_byte(0xab)));

        raw.salt = Some("0x1234".to_string());
        assert_claim_data_error(
            normalize_claim(&raw, 0, DuplicatePolicy::Reject),
            "expected 32 bytes",
        );
    }
}
