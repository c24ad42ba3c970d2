#![no_main]
use libfuzzer_sys::fuzz_target;
use sanreplay::Replay;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut replay = Replay::new();
        for (ply, notation) in s.split_whitespace().enumerate() {
            let before = replay.board().clone();
            if replay.play(ply, notation).is_err() {
                // Failed moves never leave a partially applied move behind.
                assert_eq!(replay.board(), &before);
                break;
            }
            assert!(replay.board().num_pieces() <= before.num_pieces());
        }
    }
});
