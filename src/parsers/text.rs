/// Splits text into paragraphs of trimmed lines, using blank lines as boundaries
pub fn split_into_paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut paragraphs = Vec::new();
    let mut current = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

/// Paragraphs of already-extracted page text, each on a single line
pub fn paragraphs(text: &str) -> Vec<String> {
    split_into_paragraphs(text)
        .into_iter()
        .map(|lines| normalize_whitespace_in_segment(&lines.join(" ")))
        .collect()
}

/// Normalizes whitespace within a single line or paragraph
pub fn normalize_whitespace_in_segment(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}
