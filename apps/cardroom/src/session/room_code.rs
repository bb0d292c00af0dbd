use rand::Rng;

/// Unambiguous uppercase alphabet: no I, O, 0 or 1.
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const ROOM_CODE_LEN: usize = 6;
/// Collisions tolerated before giving up on a fresh code.
pub const MAX_CODE_ATTEMPTS: usize = 32;

pub fn generate_room_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| char::from(ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())]))
        .collect()
}

/// Canonical form of a user-typed code.
pub fn normalize_room_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
