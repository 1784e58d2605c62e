pub const DATA_PREFIX: &str = "data: ";
pub const DONE_SENTINEL: &str = "[DONE]";

/// What a single event-stream line means to the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Blank, comment, or non-`data:` line.
    Skip,
    Done,
    Data(&'a str),
}

/// Classifies one line, without its `\n` terminator.
pub fn classify_line(line: &str) -> SseLine<'_> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.starts_with(':') || line.trim().is_empty() {
        return SseLine::Skip;
    }
    match line.strip_prefix(DATA_PREFIX) {
        Some(payload) => {
            let payload = payload.trim();
            if payload == DONE_SENTINEL {
                SseLine::Done
            } else {
                SseLine::Data(payload)
            }
        }
        None => SseLine::Skip,
    }
}
