use crate::value::TextMode;

/// Match `text` against a LIKE pattern.
///
/// `%` matches any run of characters (including none) and `_` matches exactly
/// one character. There is no escape character. Under `TextMode::Ci` ASCII
/// letters compare case-insensitively.
#[must_use]
pub fn like_match(text: &str, pattern: &str, mode: TextMode) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let eq = |a: char, b: char| match mode {
        TextMode::Cs => a == b,
        TextMode::Ci => a.eq_ignore_ascii_case(&b),
    };

    let (mut t, mut p) = (0usize, 0usize);
    // position of the last `%` seen and the text index it was tried against
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('%') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some('_') => {
                t += 1;
                p += 1;
            }
            Some(&c) if eq(c, text[t]) => {
                t += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    backtrack = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '%')
}
