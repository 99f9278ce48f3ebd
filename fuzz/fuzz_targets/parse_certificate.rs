#![no_main]

use libfuzzer_sys::fuzz_target;
use bercert::x509::CertificateInfo;
use bercert::x509::{oid, KeyUsage};

fuzz_target!(|data: &[u8]| {
    let cert = match CertificateInfo::parse(data.to_vec()) {
        Ok(cert) => cert,
        Err(_) => return,
    };
    let _ = cert.version();
    let _ = cert.serial_number();
    let _ = cert.valid_from();
    let _ = cert.valid_to();
    if let Ok(subject) = cert.subject() {
        let _ = subject.attributes();
        let _ = subject.common_name();
    }
    let _ = cert.is_root();
    if let Ok(Some(exts)) = cert.extensions() {
        let _ = exts.key_usage();
        let _ = exts.extended_key_usage();
        let _ = exts.basic_constraints();
        let _ = exts.check_critical(&[oid::CE_KEY_USAGE]);
    }
    let _ = cert.allows_key_usage(KeyUsage::DIGITAL_SIGNATURE);
    let _ = cert.allows_extended_key_usage(&[oid::KP_SERVER_AUTH]);
    let _ = cert.subject_public_key();
    let _ = cert.signature_algorithm();
});
