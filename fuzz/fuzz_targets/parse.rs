#![no_main]

use libfuzzer_sys::fuzz_target;
use mpp::ast::find_error_nodes;
use mpp::parser;

fuzz_target!(|data: &[u8]| {
    // First byte picks the chunk width so token boundaries land anywhere
    let Some((&width, rest)) = data.split_first() else {
        return;
    };
    let Ok(source) = std::str::from_utf8(rest) else {
        return;
    };
    let width = usize::from(width).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < source.len() {
        let mut end = (start + width).min(source.len());
        while !source.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&source[start..end]);
        start = end;
    }

    // The pipeline is total: it always terminates and errors carry real positions
    let program: Vec<_> = parser::parse_chunks(chunks).collect();
    for error in find_error_nodes(&program) {
        assert!(error.line >= 1 && error.column >= 1);
    }
});
