//! Placeholder substitution shared by every numbering strategy.

/// Primary-calendar year, two digits.
pub const YEAR: &str = "YY";
/// Parallel-calendar year, two digits.
pub const PARALLEL_YEAR: &str = "HY";
/// Classification code.
pub const CODE: &str = "CODE";
/// Zero-padded sequence number.
pub const SEQUENCE: &str = "SEQ";

/// Replaces `{TOKEN}` occurrences with their values.
///
/// Tokens without a value, and an unclosed `{`, are copied through literally.
#[must_use]
pub fn substitute(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let token = &after[..close];
        match values.iter().find(|(name, _)| *name == token) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(token);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Left-pads a sequence number with zeros to `width` digits.
///
/// Numbers wider than `width` are never truncated.
#[must_use]
pub fn pad_sequence(sequence: u32, width: usize) -> String {
    format!("{sequence:0width$}")
}
