/// Widen the low `bits` bits of `value` from two's complement to 16 bits.
///
/// Callers mask `value` to `bits` bits first; anything above is kept as-is
/// when the sign bit is clear.
#[inline]
pub fn sign_extend(value: u16, bits: u32) -> u16 {
    debug_assert!((1..=16).contains(&bits));
    if bits >= 16 {
        return value;
    }
    if (value >> (bits - 1)) & 1 == 1 {
        value | (0xFFFF << bits)
    } else {
        value
    }
}

/// Extract `width` bits of `raw` starting at bit `shift`.
#[inline]
pub fn field(raw: u16, shift: u32, width: u32) -> u16 {
    debug_assert!(width > 0 && width < 16);
    (raw >> shift) & ((1u16 << width) - 1)
}
