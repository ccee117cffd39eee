//! Join code generation for rooms.
//!
//! This module provides utilities for generating join codes for rooms.
//! Join codes are 5-character strings using Crockford's Base32 alphabet,
//! which avoids the ambiguous characters players would mistype.

use rand::prelude::*;
use rand::rngs::OsRng;
use rand::TryRngCore;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

pub const JOIN_CODE_LEN: usize = 5;

/// Generate a join code for a room.
///
/// Creates a 5-character join code by randomly selecting characters from
/// Crockford's Base32 alphabet using the OS's cryptographically secure RNG.
/// Uniqueness within the registry is the caller's job; with 32^5 codes a
/// retry loop on collision is enough.
pub fn generate_join_code() -> String {
    let mut rng = OsRng.unwrap_err();

    let mut s = String::with_capacity(JOIN_CODE_LEN);
    for _ in 0..JOIN_CODE_LEN {
        s.push(CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char);
    }
    s
}
