#![no_main]

use libfuzzer_sys::fuzz_target;
use packbuf_core::{parse_fields, ByteOrder, Encoding, FieldLayout, FieldSpec};

fuzz_target!(|data: &[u8]| {
    // First byte picks the offset, up to 8 bytes describe fields, the rest is the buffer
    let Some((&offset, rest)) = data.split_first() else { return };
    let (desc, buf) = rest.split_at(rest.len().min(8));
    let fields = desc
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            let order = if b & 0x80 == 0 { ByteOrder::Big } else { ByteOrder::Little };
            let encoding = if b & 0x40 == 0 { Encoding::Unsigned } else { Encoding::Signed };
            FieldSpec::new(format!("f{i}"), usize::from(b & 0x0f), encoding, order)
        })
        .collect();
    let Ok(layout) = FieldLayout::new(fields) else { return };

    if let Ok(parsed) = parse_fields(buf, &layout, usize::from(offset)) {
        assert_eq!(parsed.len(), layout.len());
        assert!(usize::from(offset) + layout.total_width() <= buf.len());
    }
});
