#![no_main]

use libfuzzer_sys::fuzz_target;
use packbuf_core::assemble;

fuzz_target!(|data: &[u8]| {
    // Chunk lengths come from the input itself
    let mut chunks: Vec<&[u8]> = Vec::new();
    let mut rest = data;
    while let Some((&n, tail)) = rest.split_first() {
        let take = usize::from(n).min(tail.len());
        let (chunk, next) = tail.split_at(take);
        chunks.push(chunk);
        rest = next;
    }

    let Ok(buf) = assemble(&chunks) else { return };
    let lengths: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
    let parts = buf.view().split_lengths(&lengths).unwrap_or_default();
    assert_eq!(parts.len(), chunks.len());
    for (part, chunk) in parts.iter().zip(&chunks) {
        assert_eq!(part.as_bytes(), *chunk);
    }
});
