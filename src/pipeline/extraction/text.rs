/// Plain-text passthrough for non-PDF uploads. Invalid UTF-8 is replaced
/// rather than rejected; the review adapter tolerates it.
pub fn extract_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
