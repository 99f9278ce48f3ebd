#![no_main]

use libfuzzer_sys::fuzz_target;
use bercert::Mode;

fuzz_target!(|data: &[u8]| {
    let value = match Mode::Ber.decode(data.to_vec()) {
        Ok(value) => value,
        Err(_) => return,
    };
    let der = match value.to_der() {
        Ok(der) => der,
        Err(_) => return,
    };

    // The encoding is canonical, so encoding again changes nothing and
    // decoding gives back an equal value.
    let decoded = Mode::Der.decode(der.clone()).unwrap();
    assert_eq!(decoded, value);
    assert_eq!(decoded.to_der().unwrap(), der);
});
