#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
// JUSTIFICATION: CCM formatting arithmetic over fixed 16-byte blocks,
// lengths bounded by the nonce/tag range checks at entry.
#![allow(clippy::arithmetic_side_effects)]

//! AES-CCM generation-encryption (NIST SP 800-38C)
//!
//! Formatting function and counter generation per Appendix A of SP 800-38C.
//! When used as a key-confirmation MAC the MacData is carried as associated
//! data with an empty payload, so the result is the encrypted tag alone.

use super::cmac::{xor_block, AesBlockCipher, BLOCK_LEN};
use kas_prelude::error::{KasError, Result};
use tracing::instrument;

/// Output of CCM generation-encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcmOutput {
    /// Encrypted payload, same length as the plaintext
    pub ciphertext: Vec<u8>,
    /// Encrypted authentication tag
    pub tag: Vec<u8>,
}

fn check_parameters(nonce: &[u8], tag_len: usize, payload_len: usize) -> Result<usize> {
    if !(7..=13).contains(&nonce.len()) {
        return Err(KasError::config(format!(
            "CCM nonce must be 7 to 13 bytes, got {}",
            nonce.len()
        )));
    }
    if !(4..=16).contains(&tag_len) || tag_len % 2 != 0 {
        return Err(KasError::config(format!(
            "CCM tag must be an even length of 4 to 16 bytes, got {}",
            tag_len
        )));
    }
    let q = 15 - nonce.len();
    if q < 8 && (payload_len as u128) >= (1u128 << (8 * q)) {
        return Err(KasError::config(format!(
            "CCM payload of {} bytes does not fit a {}-byte length field",
            payload_len, q
        )));
    }
    Ok(q)
}

/// Encode the associated-data length prefix of A.2.2.
fn encode_aad_len(len: usize) -> Vec<u8> {
    let len = len as u64;
    if len < 0xFF00 {
        (len as u16).to_be_bytes().to_vec()
    } else if len <= u64::from(u32::MAX) {
        let mut out = vec![0xFF, 0xFE];
        out.extend_from_slice(&(len as u32).to_be_bytes());
        out
    } else {
        let mut out = vec![0xFF, 0xFF];
        out.extend_from_slice(&len.to_be_bytes());
        out
    }
}

/// Counter block `Ctr_i` (A.3)
fn counter_block(nonce: &[u8], q: usize, i: u64) -> [u8; BLOCK_LEN] {
    let mut block = [0u8; BLOCK_LEN];
    block[0] = (q - 1) as u8;
    if let Some(dest) = block.get_mut(1..1 + nonce.len()) {
        dest.copy_from_slice(nonce);
    }
    let counter = i.to_be_bytes();
    for (dest, src) in block.iter_mut().rev().zip(counter.iter().rev()).take(q) {
        *dest = *src;
    }
    block
}

fn cbc_mac_absorb(cipher: &AesBlockCipher, state: &mut [u8; BLOCK_LEN], data: &[u8]) {
    for chunk in data.chunks(BLOCK_LEN) {
        let mut block = [0u8; BLOCK_LEN];
        if let Some(dest) = block.get_mut(..chunk.len()) {
            dest.copy_from_slice(chunk);
        }
        xor_block(state, &block);
        cipher.encrypt(state);
    }
}

/// CCM generation-encryption of `payload` with associated data `aad`.
///
/// # Errors
/// Returns an error for an AES key of the wrong size, a nonce outside 7..=13
/// bytes, or a tag length that is odd or outside 4..=16 bytes.
#[instrument(level = "debug", skip_all, fields(key_len = key.len(), nonce_len = nonce.len(), aad_len = aad.len(), tag_len))]
pub fn ccm_encrypt(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    payload: &[u8],
    tag_len: usize,
) -> Result<CcmOutput> {
    let q = check_parameters(nonce, tag_len, payload.len())?;
    let cipher = AesBlockCipher::new(key)?;

    // B_0: flags || N || Q
    let mut b0 = counter_block(nonce, q, payload.len() as u64);
    let adata_flag = if aad.is_empty() { 0 } else { 0x40 };
    b0[0] = adata_flag | ((((tag_len - 2) / 2) as u8) << 3) | ((q - 1) as u8);

    let mut state = [0u8; BLOCK_LEN];
    cbc_mac_absorb(&cipher, &mut state, &b0);
    if !aad.is_empty() {
        let mut formatted = encode_aad_len(aad.len());
        formatted.extend_from_slice(aad);
        cbc_mac_absorb(&cipher, &mut state, &formatted);
    }
    cbc_mac_absorb(&cipher, &mut state, payload);

    let mut ciphertext = Vec::with_capacity(payload.len());
    for (i, chunk) in payload.chunks(BLOCK_LEN).enumerate() {
        let mut keystream = counter_block(nonce, q, i as u64 + 1);
        cipher.encrypt(&mut keystream);
        ciphertext.extend(chunk.iter().zip(keystream.iter()).map(|(p, k)| p ^ k));
    }

    let mut s0 = counter_block(nonce, q, 0);
    cipher.encrypt(&mut s0);
    let tag = state.iter().zip(s0.iter()).take(tag_len).map(|(t, s)| t ^ s).collect();

    Ok(CcmOutput { ciphertext, tag })
}
