#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
// JUSTIFICATION: CMAC block cipher mode arithmetic.
// - Fixed 16-byte AES block size arithmetic
// - Index calculations bounded by message length
#![allow(clippy::arithmetic_side_effects)]

//! CMAC (Cipher-based Message Authentication Code)
//!
//! AES-CMAC as specified in NIST SP 800-38B, for AES-128/192/256 keys:
//! - Subkey generation (K1, K2) from encryption key K
//! - 10* padding of an incomplete final block
//! - CBC-MAC over the padded message
//!
//! [`AesBlockCipher`] is shared with the CCM implementation.

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use kas_prelude::error::{KasError, Result};
use tracing::instrument;

/// AES block size in bytes
pub const BLOCK_LEN: usize = 16;

/// R_b for 128-bit blocks
const RB: u8 = 0x87;

/// AES keyed for single-block encryption, any approved key size.
pub(crate) enum AesBlockCipher {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl AesBlockCipher {
    /// Key an AES instance from a 16, 24 or 32 byte key.
    pub(crate) fn new(key: &[u8]) -> Result<Self> {
        let invalid = |_e| KasError::InvalidKeyLength { expected: 128, actual: key.len() * 8 };
        match key.len() {
            16 => Aes128::new_from_slice(key).map(AesBlockCipher::Aes128).map_err(invalid),
            24 => Aes192::new_from_slice(key).map(AesBlockCipher::Aes192).map_err(invalid),
            32 => Aes256::new_from_slice(key).map(AesBlockCipher::Aes256).map_err(invalid),
            other => Err(KasError::InvalidKeyLength { expected: 128, actual: other * 8 }),
        }
    }

    /// Encrypt one block in place.
    pub(crate) fn encrypt(&self, block: &mut [u8; BLOCK_LEN]) {
        match self {
            AesBlockCipher::Aes128(c) => c.encrypt_block(block.into()),
            AesBlockCipher::Aes192(c) => c.encrypt_block(block.into()),
            AesBlockCipher::Aes256(c) => c.encrypt_block(block.into()),
        }
    }
}

/// Constant-time XOR of two blocks
#[inline(always)]
pub(crate) fn xor_block(a: &mut [u8; BLOCK_LEN], b: &[u8; BLOCK_LEN]) {
    for (a_byte, b_byte) in a.iter_mut().zip(b.iter()) {
        *a_byte ^= b_byte;
    }
}

/// Left shift a block by one bit, returning the bit shifted out.
#[inline(always)]
fn left_shift_block(block: &[u8; BLOCK_LEN]) -> ([u8; BLOCK_LEN], u8) {
    let mut result = [0u8; BLOCK_LEN];
    let mut overflow = 0u8;

    for (i, &current_byte) in block.iter().enumerate().rev() {
        if let Some(r) = result.get_mut(i) {
            *r = (current_byte << 1) | overflow;
        }
        overflow = (current_byte >> 7) & 1;
    }

    (result, overflow)
}

/// Double in GF(2^128): shift left, conditionally XOR R_b.
fn dbl(block: &[u8; BLOCK_LEN]) -> [u8; BLOCK_LEN] {
    let (mut shifted, msb) = left_shift_block(block);
    // msb is 0 or 1; the mask keeps the reduction branch-free
    if let Some(last) = shifted.last_mut() {
        *last ^= RB & 0u8.wrapping_sub(msb);
    }
    shifted
}

/// SP 800-38B §6.1: L = AES_K(0^128), K1 = dbl(L), K2 = dbl(K1)
fn generate_subkeys(cipher: &AesBlockCipher) -> ([u8; BLOCK_LEN], [u8; BLOCK_LEN]) {
    let mut l_block = [0u8; BLOCK_LEN];
    cipher.encrypt(&mut l_block);
    let k1 = dbl(&l_block);
    let k2 = dbl(&k1);
    (k1, k2)
}

/// AES-CMAC of the concatenation of `parts`; returns the full 128-bit tag.
///
/// # Errors
/// Returns `InvalidKeyLength` unless the key is 16, 24 or 32 bytes.
#[instrument(level = "debug", skip(key, parts), fields(key_len = key.len()))]
pub fn cmac(key: &[u8], parts: &[&[u8]]) -> Result<[u8; BLOCK_LEN]> {
    let cipher = AesBlockCipher::new(key)?;
    let (k1, k2) = generate_subkeys(&cipher);

    let data: Vec<u8> = parts.concat();
    let data_len = data.len();
    let total_blocks = if data_len == 0 { 1 } else { data_len.div_ceil(BLOCK_LEN) };

    let mut c_i = [0u8; BLOCK_LEN];
    for chunk in data.chunks(BLOCK_LEN).take(total_blocks - 1) {
        let mut block = [0u8; BLOCK_LEN];
        block.copy_from_slice(chunk);
        xor_block(&mut block, &c_i);
        cipher.encrypt(&mut block);
        c_i = block;
    }

    let last_start = (total_blocks - 1) * BLOCK_LEN;
    let last = data.get(last_start..).unwrap_or(&[]);
    let mut final_block = [0u8; BLOCK_LEN];
    if let Some(dest) = final_block.get_mut(..last.len()) {
        dest.copy_from_slice(last);
    }
    if last.len() == BLOCK_LEN {
        xor_block(&mut final_block, &k1);
    } else {
        if let Some(pad_byte) = final_block.get_mut(last.len()) {
            *pad_byte = 0x80;
        }
        xor_block(&mut final_block, &k2);
    }
    xor_block(&mut final_block, &c_i);
    cipher.encrypt(&mut final_block);

    Ok(final_block)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests use unwrap for simplicity
mod tests {
    use super::*;
    use hex_literal::hex;

    const KEY_128: [u8; 16] = hex!("2b7e151628aed2a6abf7158809cf4f3c");

    /// SP 800-38B D.1 example 1
    #[test]
    fn test_cmac_aes128_empty_message() {
        assert_eq!(cmac(&KEY_128, &[]).unwrap(), hex!("bb1d6929e95937287fa37d129b756746"));
    }

    /// SP 800-38B D.1 example 2
    #[test]
    fn test_cmac_aes128_one_block() {
        let msg = hex!("6bc1bee22e409f96e93d7e117393172a");
        assert_eq!(cmac(&KEY_128, &[&msg]).unwrap(), hex!("070a16b46b4d4144f79bdd9dd04a287c"));
    }

    #[test]
    fn test_split_parts_match_contiguous() {
        let msg = [0x5au8; 40];
        let whole = cmac(&KEY_128, &[&msg]).unwrap();
        let split = cmac(&KEY_128, &[&msg[..7], &msg[7..33], &msg[33..]]).unwrap();
        assert_eq!(whole, split);
    }

    #[test]
    fn test_subkeys_from_sp800_38b() {
        let cipher = AesBlockCipher::new(&KEY_128).unwrap();
        let (k1, k2) = generate_subkeys(&cipher);
        assert_eq!(k1, hex!("fbeed618357133667c85e08f7236a8de"));
        assert_eq!(k2, hex!("f7ddac306ae266ccf90bc11ee46d513b"));
    }

    #[test]
    fn test_rejects_bad_key_length() {
        assert!(matches!(
            cmac(&[0u8; 20], &[b"x"]),
            Err(KasError::InvalidKeyLength { actual: 160, .. })
        ));
    }

    #[test]
    fn test_all_aes_sizes_accepted() {
        for len in [16usize, 24, 32] {
            assert!(cmac(&vec![1u8; len], &[b"data"]).is_ok());
        }
    }
}
