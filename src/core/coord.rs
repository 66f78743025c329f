//! Coordinate codec - Cantor pairing
//!
//! The board is a sparse map keyed by a single integer; `pair` folds a 2D
//! grid coordinate into that key and `unpair` recovers it. The pairing is a
//! bijection on non-negative integers, so keys never collide.

/// Encode a grid coordinate as a single key: `(x+y)(x+y+1)/2 + y`
#[inline]
pub fn pair(x: u32, y: u32) -> u64 {
    let x = x as u64;
    let y = y as u64;
    let s = x + y;
    s * (s + 1) / 2 + y
}

/// Decode a key back into `(x, y)`.
///
/// Only keys produced by `pair` are meaningful; anything else yields garbage
/// by design (no internal validation).
#[inline]
pub fn unpair(z: u64) -> (u32, u32) {
    // w = floor((sqrt(8z + 1) - 1) / 2), corrected for float rounding so the
    // inverse is exact for every representable key.
    let mut w = (((8.0 * z as f64 + 1.0).sqrt() - 1.0) / 2.0) as u64;
    while (w + 1) * (w + 2) / 2 <= z {
        w += 1;
    }
    while w * (w + 1) / 2 > z {
        w -= 1;
    }
    let y = z - w * (w + 1) / 2;
    let x = w - y;
    (x as u32, y as u32)
}
