//! Helper functions for instruction execution.

#![allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]

use crate::{Address, TickError};

/// Smallest displacement the address arithmetic accepts.
pub const MIN_DISPLACEMENT: i32 = i16::MIN as i32;

/// Sign-extends a 16-bit immediate to 32 bits.
#[must_use]
pub const fn sign_extend16(value: u16) -> u32 {
    value as i16 as i32 as u32
}

/// Zero-extends a 16-bit immediate to 32 bits.
#[must_use]
pub const fn zero_extend16(value: u16) -> u32 {
    value as u32
}

/// Sign-extends an 8-bit value to 32 bits.
#[must_use]
pub const fn sign_extend8(value: u8) -> u32 {
    value as i8 as i32 as u32
}

/// Sign-extends `immediate` and checks it against [`MIN_DISPLACEMENT`].
///
/// # Errors
///
/// Returns [`TickError::OffsetIsTooSmall`] when the displacement is below
/// the accepted range. No 16-bit field can reach that bound.
pub const fn checked_displacement(immediate: u16) -> Result<u32, TickError> {
    let displacement = immediate as i16 as i32;
    if displacement < MIN_DISPLACEMENT {
        return Err(TickError::OffsetIsTooSmall);
    }
    Ok(displacement as u32)
}

/// `base + sext(immediate)` flattened, then resolved to its segment.
///
/// # Errors
///
/// Propagates [`checked_displacement`] failures.
pub fn effective_address(base: u32, immediate: u16) -> Result<Address, TickError> {
    let displacement = checked_displacement(immediate)?;
    Ok(Address::from_flat(base.wrapping_add(displacement)))
}

/// Taken-branch target, relative to the instruction after the branch.
///
/// # Errors
///
/// Propagates [`checked_displacement`] failures.
pub const fn branch_target(pc: u32, immediate: u16) -> Result<u32, TickError> {
    match checked_displacement(immediate) {
        Ok(displacement) => Ok(pc.wrapping_add(4).wrapping_add(displacement << 2)),
        Err(error) => Err(error),
    }
}

/// Replaces the low 28 bits of `pc` with `target << 2`.
#[must_use]
pub const fn jump_target(pc: u32, target: u32) -> u32 {
    ((target & 0x03FF_FFFF) << 2) | (pc & 0xF000_0000)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{
        branch_target, checked_displacement, effective_address, jump_target, sign_extend16,
        sign_extend8, zero_extend16,
    };
    use crate::{Address, SegmentKind, DATA_BASE, TEXT_BASE};

    #[test]
    fn sign_extension_replicates_bit_15() {
        assert_eq!(sign_extend16(0x7FFF), 0x0000_7FFF);
        assert_eq!(sign_extend16(0x8000), 0xFFFF_8000);
        assert_eq!(sign_extend16(0xFFFB), (-5_i32) as u32);
        assert_eq!(zero_extend16(0xFFFB), 0x0000_FFFB);
    }

    #[test]
    fn byte_sign_extension_replicates_bit_7() {
        assert_eq!(sign_extend8(0x48), 0x48);
        assert_eq!(sign_extend8(0x80), 0xFFFF_FF80);
    }

    #[test]
    fn negative_offsets_resolve_below_the_base() {
        assert_eq!(
            effective_address(DATA_BASE + 0x80, 0xFFFC),
            Ok(Address::data(0x7C))
        );
        assert_eq!(
            effective_address(DATA_BASE, 0xFFFF).map(|address| address.segment),
            Ok(SegmentKind::Text)
        );
    }

    #[test]
    fn branch_target_is_relative_to_next_instruction() {
        assert_eq!(branch_target(TEXT_BASE + 0x10, 2), Ok(TEXT_BASE + 0x1C));
        assert_eq!(branch_target(TEXT_BASE + 0x2C, 0xFFFA), Ok(TEXT_BASE + 0x18));
    }

    #[test]
    fn jump_target_keeps_top_nibble() {
        assert_eq!(jump_target(TEXT_BASE, 0x0010_0008), 0x0040_0020);
        assert_eq!(jump_target(0xF000_0000, 0x03FF_FFFF), 0xFFFF_FFFC);
    }

    proptest! {
        #[test]
        fn sign_extension_matches_signed_widening(value in any::<u16>()) {
            prop_assert_eq!(sign_extend16(value) as i32, i32::from(value as i16));
            prop_assert_eq!(sign_extend16(value) & 0xFFFF, u32::from(value));
            prop_assert_eq!(zero_extend16(value), u32::from(value));
        }

        #[test]
        fn every_16_bit_displacement_is_accepted(value in any::<u16>()) {
            prop_assert_eq!(checked_displacement(value), Ok(sign_extend16(value)));
        }

        #[test]
        fn effective_address_wraps_modulo_2_32(base in any::<u32>(), value in any::<u16>()) {
            let address = effective_address(base, value).expect("16-bit displacement");
            prop_assert_eq!(address.to_flat(), base.wrapping_add(sign_extend16(value)));
        }
    }
}
