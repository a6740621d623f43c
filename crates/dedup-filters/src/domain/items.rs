//! Candidate item decoding and result filtering

/// Decode a newline-delimited upload into items
///
/// Invalid UTF-8 sequences are dropped rather than failing the batch.
/// Lines end at `\n` or `\r\n` only, the same as a plain line scanner. A
/// lone `\r`, form feed, vertical tab or Unicode line separator stays inside
/// the item. A trailing newline does not produce an empty final item, but
/// empty lines in the middle are items.
pub fn decode_items(bytes: &[u8]) -> Vec<String> {
    let text: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
    text.lines().map(str::to_string).collect()
}

/// Items whose flag is `false`, i.e. not already present
pub fn newly_seen<'a, S: AsRef<str>>(items: &'a [S], already_present: &[bool]) -> Vec<&'a str> {
    items
        .iter()
        .zip(already_present)
        .filter(|&(_, &present)| !present)
        .map(|(item, _)| item.as_ref())
        .collect()
}
