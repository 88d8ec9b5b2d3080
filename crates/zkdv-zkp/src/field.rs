//! # BN254 Field Bounds
//!
//! Coordinates live in the base field `Fq`, public inputs in the scalar
//! field `Fr`. Both moduli are just under 2^254, so every element fits in
//! 32 bytes with the top two bits clear.
//!
//! Decimal strings (the snarkjs representation) convert through
//! [`parse_element`], which distinguishes "not a number", "too large for
//! 256 bits" and "not below the modulus".

use alloy_primitives::U256;

use crate::error::CodecError;

/// BN254 base field modulus `p`.
pub const BASE_MODULUS: U256 = U256::from_limbs([
    0x3c20_8c16_d87c_fd47,
    0x9781_6a91_6871_ca8d,
    0xb850_45b6_8181_585d,
    0x3064_4e72_e131_a029,
]);

/// BN254 scalar field modulus `r`.
pub const SCALAR_MODULUS: U256 = U256::from_limbs([
    0x43e1_f593_f000_0001,
    0x2833_e848_79b9_7091,
    0xb850_45b6_8181_585d,
    0x3064_4e72_e131_a029,
]);

/// Which BN254 field a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `Fq`, point coordinates.
    Base,
    /// `Fr`, public inputs.
    Scalar,
}

impl Field {
    /// The field modulus.
    pub fn modulus(self) -> U256 {
        match self {
            Self::Base => BASE_MODULUS,
            Self::Scalar => SCALAR_MODULUS,
        }
    }

    /// Name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Scalar => "scalar",
        }
    }

    /// Whether `value` is a canonical element of this field.
    pub fn contains(self, value: &U256) -> bool {
        *value < self.modulus()
    }

    /// Fail with `OutOfField` unless `value` is below the modulus.
    pub fn ensure(self, value: &U256) -> Result<(), CodecError> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(CodecError::OutOfField { field: self.name(), value: value.to_string() })
        }
    }
}

/// Parse an unsigned decimal string into a 256-bit integer.
///
/// Only ASCII digits are accepted; no sign, whitespace, or radix prefix.
/// Values of 2^256 or more fail with `ScalarOverflow` rather than wrapping.
pub fn parse_decimal(s: &str) -> Result<U256, CodecError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::InvalidDecimal(s.to_string()));
    }
    // Every character is a digit, so the only remaining failure is overflow.
    U256::from_str_radix(s, 10).map_err(|_| CodecError::ScalarOverflow(s.to_string()))
}

/// Parse a decimal string and check it is an element of `field`.
pub fn parse_element(s: &str, field: Field) -> Result<U256, CodecError> {
    let value = parse_decimal(s)?;
    field.ensure(&value)?;
    Ok(value)
}

/// `-y mod p` for a base-field element.
pub fn negate_base(y: &U256) -> U256 {
    if y.is_zero() {
        U256::ZERO
    } else {
        BASE_MODULUS - *y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P_DEC: &str =
        "21888242871839275222246405745257275088696311157297823662689037894645226208583";
    const R_DEC: &str =
        "21888242871839275222246405745257275088548364400416034343698204186575808495617";

    #[test]
    fn moduli_match_decimal_constants() {
        assert_eq!(BASE_MODULUS.to_string(), P_DEC);
        assert_eq!(SCALAR_MODULUS.to_string(), R_DEC);
        assert!(SCALAR_MODULUS < BASE_MODULUS);
    }

    #[test]
    fn parse_small_and_leading_zeros() {
        assert_eq!(parse_decimal("0").unwrap(), U256::ZERO);
        assert_eq!(parse_decimal("000042").unwrap(), U256::from(42u64));
    }

    #[test]
    fn parse_rejects_non_digits() {
        for bad in ["", "-1", "+1", "0x10", "1 2", " 7", "1e3"] {
            assert!(
                matches!(parse_decimal(bad), Err(CodecError::InvalidDecimal(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_max_u256_and_overflow() {
        let max = U256::MAX.to_string();
        assert_eq!(parse_decimal(&max).unwrap(), U256::MAX);
        // 2^256
        let over = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(matches!(parse_decimal(over), Err(CodecError::ScalarOverflow(_))));
    }

    #[test]
    fn modulus_itself_is_out_of_field() {
        assert!(matches!(
            parse_element(P_DEC, Field::Base),
            Err(CodecError::OutOfField { field: "base", .. })
        ));
        assert!(matches!(
            parse_element(R_DEC, Field::Scalar),
            Err(CodecError::OutOfField { field: "scalar", .. })
        ));
        // r < p, so r is a valid coordinate.
        assert!(parse_element(R_DEC, Field::Base).is_ok());
    }

    #[test]
    fn negation() {
        assert_eq!(negate_base(&U256::ZERO), U256::ZERO);
        let one = U256::from(1u64);
        assert_eq!(negate_base(&one) + one, BASE_MODULUS);
    }
}
