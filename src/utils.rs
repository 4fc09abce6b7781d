use crate::config::arch_config::{SignedWordType, WordType, XLEN};

pub fn sign_extend(value: WordType, from_bits: u32) -> WordType {
    let sign_bit = XLEN as u32 - from_bits;
    ((value << sign_bit) as SignedWordType >> sign_bit) as WordType
}

pub fn wrapping_add_as_signed(lhs: WordType, rhs: WordType) -> WordType {
    lhs.cast_signed()
        .wrapping_add(rhs.cast_signed())
        .cast_unsigned()
}

/// get the negative of given number of [`WordType`] in 2's complement.
#[cfg(test)]
pub fn negative_of(value: WordType) -> WordType {
    (!value).wrapping_add(1)
}

/// Keep the low `bytes` bytes of `value`.
pub fn truncate_to_bytes(value: WordType, bytes: u32) -> WordType {
    if bytes >= 4 {
        value
    } else {
        value & ((1 << (bytes * 8)) - 1)
    }
}
