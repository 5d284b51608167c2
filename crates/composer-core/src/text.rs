pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    // `str::split('\n')` preserves trailing empty segments: N newlines => N+1 lines, which is
    // exactly the line count of the flattened text. Only the '\r' of a "\r\n" pair is dropped.
    let separators = text.matches('\n').count();
    text.split('\n')
        .enumerate()
        .map(|(index, line)| {
            if index < separators {
                line.strip_suffix('\r').unwrap_or(line)
            } else {
                line
            }
        })
        .collect()
}
