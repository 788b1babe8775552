#![no_main]

use gg_parser::{GedcomParser, parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 16 * 1024 {
        return;
    }

    // parse must never panic.
    let whole = parse(text);

    // Each level-0 line creates at most one record.
    let records = whole.document.individuals.len()
        + whole.document.families.len()
        + whole.document.notes.len();
    assert!(records <= text.lines().count());

    // Feeding the same text in two chunks must not change the result.
    let split = text.len() / 2;
    let split = (0..=split)
        .rev()
        .find(|index| text.is_char_boundary(*index))
        .unwrap_or(0);
    let mut parser = GedcomParser::new();
    parser.feed_chunk(&text[..split]);
    parser.feed_chunk(&text[split..]);
    assert_eq!(parser.finish(), whole, "chunked parse diverged");
});
