//! Level fuzz target: feed arbitrary bytes to the level line encoder.
//! The encoder must not panic; it should return a record, an empty skip, or an error.
//! Build with: cargo fuzz run level_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    if let Ok(bytes) = flowpack::encode_level(s, 0) {
        if !bytes.is_empty() {
            let _ = flowpack::LevelRecord::decode(&bytes);
        }
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run level_fuzz");
}
