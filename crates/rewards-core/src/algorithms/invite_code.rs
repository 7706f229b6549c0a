//! # Invite Code Generation

use rand::Rng;

use crate::domain::InviteCode;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Draw a `len`-character code from `[A-Za-z0-9]`.
pub fn generate_invite_code<R: Rng + ?Sized>(rng: &mut R, len: usize) -> InviteCode {
    let code: String = (0..len)
        .map(|_| char::from(CHARSET[rng.gen_range(0..CHARSET.len())]))
        .collect();
    InviteCode::new(code)
}
