#![no_main]

use indentphp::{format, format_bytes, FormatOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic; whatever formats must be stable.
    let options = FormatOptions::default();
    if let Ok(once) = format_bytes(data, &options) {
        let twice = format_bytes(&once, &options).expect("formatted output must parse");
        assert_eq!(once, twice, "formatting bytes is not idempotent");
    }

    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(once) = format(source) {
        let twice = format(&once).expect("formatted output must parse");
        assert_eq!(once, twice, "formatting is not idempotent");
    }
    let _ = indentphp::dump_tokens(source);
});
