#![no_main]

use libfuzzer_sys::fuzz_target;
use bercert::Mode;
use bercert::decode::Decoder;

fuzz_target!(|data: &[u8]| {
    let ber = Mode::Ber.decode(data.to_vec());
    let der = Mode::Der.decode(data.to_vec());

    // Anything that is valid DER is valid BER as well.
    if let Ok(der) = der.as_ref() {
        assert_eq!(ber.as_ref().ok(), Some(der));
    }

    if let Ok(value) = ber.as_ref() {
        let _ = value.kind();
        let _ = value.to_str();
        let _ = value.to_oid().map(|oid| oid.to_string());
        let _ = value.to_integer();
        let _ = value.to_time();
    }

    let _ = Decoder::new(Mode::Ber).exact(false).decode(data.to_vec());
});
