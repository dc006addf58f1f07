//! Greedy word wrapping against an arbitrary width metric.

/// Wraps `text` into lines no wider than `max_width` as reported by `measure`.
///
/// Words are split on single spaces and joined back with one space. A word is
/// never broken: if it is wider than `max_width` on its own it gets a line to
/// itself and overflows. Empty input yields a single empty line.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut words = text.split(' ');
    let mut lines = Vec::new();
    // split always yields at least one item
    let mut current = words.next().unwrap_or_default().to_string();

    for word in words {
        let candidate = format!("{} {}", current, word);
        if measure(&candidate) < max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);

    lines
}
