//! Bit-level packing helpers shared by the hit-record codecs.
//!
//! All conversions here are total: out-of-range inputs are truncated or
//! saturated, never rejected. The 16-bit quantizers work in `f32`; the
//! 24-bit ones need `f64`, since `f32` cannot hold `16777215.5`.

use crate::Vec2;
use half::f16;

/// Largest value of a 16-bit unsigned-normalized field.
pub const UNORM16_MAX: f32 = 65535.0;

/// Largest value of a 24-bit unsigned-normalized field.
pub const UNORM24_MAX: f32 = 16777215.0;

/// Mask with the low `bits` bits set. `bits >= 32` yields all ones.
#[inline]
pub const fn bit_mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

/// Number of bits needed to store the values `0..count`.
///
/// Returns 0 for `count <= 1`, since a single possible value needs no storage.
#[inline]
pub const fn bits_for_count(count: u32) -> u32 {
    if count <= 1 {
        0
    } else {
        32 - (count - 1).leading_zeros()
    }
}

/// Quantize `v` to 16-bit unorm without clamping.
///
/// The caller must keep `v` in [0, 1]; values above 1 spill past 16 bits.
#[inline]
pub fn pack_unorm16_unsafe(v: f32) -> u32 {
    (v * UNORM16_MAX + 0.5) as u32
}

/// Pack two unorm16 values into one word, `x` in the low half.
///
/// Unclamped, see [`pack_unorm16_unsafe`].
#[inline]
pub fn pack_unorm2x16_unsafe(v: Vec2) -> u32 {
    pack_unorm16_unsafe(v.x) | (pack_unorm16_unsafe(v.y) << 16)
}

/// Inverse of [`pack_unorm2x16_unsafe`].
#[inline]
pub fn unpack_unorm2x16(packed: u32) -> Vec2 {
    Vec2::new((packed & 0xffff) as f32, (packed >> 16) as f32) / UNORM16_MAX
}

/// Quantize `v` to 24-bit unorm: multiply, add one half, truncate.
#[inline]
pub fn pack_unorm24(v: f32) -> u32 {
    (v as f64 * UNORM24_MAX as f64 + 0.5) as u32
}

/// Inverse of [`pack_unorm24`]. Only the low 24 bits of `packed` are used.
#[inline]
pub fn unpack_unorm24(packed: u32) -> f32 {
    (packed & 0x00ff_ffff) as f32 / UNORM24_MAX
}

/// Convert to IEEE half precision, returned in the low 16 bits.
#[inline]
pub fn f32_to_f16_bits(v: f32) -> u32 {
    f16::from_f32(v).to_bits() as u32
}

/// Read an IEEE half from the low 16 bits of `packed`.
#[inline]
pub fn f16_bits_to_f32(packed: u32) -> f32 {
    f16::from_bits((packed & 0xffff) as u16).to_f32()
}
