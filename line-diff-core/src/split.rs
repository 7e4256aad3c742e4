/// Split any embedded line breaks so every output item is one physical line.
///
/// Inputs that carry multi-line content (for example comment banners built
/// with `\n`) compare poorly as single units; alignment should see the
/// physical lines a terminal or file would show.
pub fn split_embedded(lines: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        for segment in line.split('\n') {
            out.push(segment.to_string());
        }
    }
    out
}
