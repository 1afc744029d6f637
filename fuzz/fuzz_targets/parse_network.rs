#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(network) = ftpgate::auth::parse_network(s) {
            assert_eq!(network, network.trunc());
        }
    }
});
