#![deny(unsafe_code)]
#![no_main]

//! Fuzz two-step KDF configurations
//!
//! Arbitrary mode, counter layout and salt must either be rejected by
//! validation or derive exactly L bits without panicking.

use kas_core::{CounterLocation, KdfMode, KdfParameter, TwoStepMac, TwoStepParameters};
use kas_primitives::{AesKeySize, BitString, HashFunction};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let mac = match data[0] % 3 {
        0 => TwoStepMac::Hmac(HashFunction::Sha2_256),
        1 => TwoStepMac::Hmac(HashFunction::Sha3_512),
        _ => TwoStepMac::Cmac(AesKeySize::Aes128),
    };
    let mode = match data[1] % 3 {
        0 => KdfMode::Counter,
        1 => KdfMode::Feedback,
        _ => KdfMode::DoublePipeline,
    };
    let counter_bits = usize::from(data[2] % 5) * 8;
    let location = match data[2] / 5 % 5 {
        0 => CounterLocation::None,
        1 => CounterLocation::BeforeFixedData,
        2 => CounterLocation::AfterFixedData,
        3 => CounterLocation::MiddleFixedData(usize::from(data[3] % 64)),
        _ => CounterLocation::BeforeIterator,
    };
    let l = 8 + usize::from(data[3]) * 4;
    let rest = &data[4..];
    let (z, fixed) = rest.split_at(rest.len() / 2);

    let mut params =
        TwoStepParameters::new(mac, 32).with_mode(mode).with_counter(location, counter_bits);
    if mode == KdfMode::Feedback && data[1] & 0x80 != 0 {
        params = params.with_iv(&[0x24; 16]);
    }
    let kdf = KdfParameter::TwoStep(params);
    if let Ok(dkm) = kdf.derive(z, &BitString::from_bytes(fixed), l) {
        assert_eq!(dkm.len(), l.div_ceil(8), "output must be L bits");
    }
});
