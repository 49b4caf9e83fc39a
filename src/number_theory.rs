//! Integer primitives shared by the key rules

/// Alphabet size used by letter-oriented (text mode) keys.
pub const TEXT_MODULUS: i64 = 26;

/// Byte range used by byte-oriented (file mode) keys.
pub const BYTE_MODULUS: i64 = 256;

/// Greatest common divisor of `|a|` and `|b|` (Euclid).
///
/// `gcd(0, 0)` is 0 by convention.
pub fn gcd(a: i64, b: i64) -> u64 {
    let mut a = a.unsigned_abs();
    let mut b = b.unsigned_abs();
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// True iff `a` has a multiplicative inverse modulo `modulus`.
pub fn is_coprime(a: i64, modulus: i64) -> bool {
    gcd(a, modulus) == 1
}
