#![no_main]

use libfuzzer_sys::fuzz_target;
use termseq_parser::{Parser, SeqType, MAX_ARGS};

fuzz_target!(|data: &[u8]| {
    let mut parser = Parser::new();

    // Widen byte pairs into code points so the C1 range and the astral
    // planes both get exercised. The parser must never panic.
    for chunk in data.chunks(2) {
        let raw = if chunk.len() == 2 {
            u32::from(chunk[0]) << 8 | u32::from(chunk[1])
        } else {
            u32::from(chunk[0])
        };
        let (status, seq) = parser.feed(raw);

        // Invariants that must hold on every emission.
        if status != SeqType::None {
            assert_eq!(status, seq.seq_type());
            assert!(seq.args().len() <= MAX_ARGS);
            let mut n_final = 0;
            for arg in seq.args() {
                let value = arg.value();
                assert!(value == -1 || (0..=65535).contains(&value));
                assert_eq!(value == -1, arg.is_default());
                if !arg.is_nonfinal() {
                    n_final += 1;
                }
            }
            if seq.n_args() <= MAX_ARGS {
                assert_eq!(n_final, seq.n_final_args());
            }
        }
    }
});
