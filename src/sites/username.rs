/// Maximum stored username length after slugification.
pub const USERNAME_MAX_LEN: usize = 64;

/// Normalize a username into a URL-safe slug (`a-z0-9-`).
///
/// Runs of any other characters collapse into a single `-`; leading and
/// trailing separators are dropped. The result may be empty.
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::new();
    let mut prev_dash = false;
    for ch in input.trim().to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    let truncated: String = slug.trim_matches('-').chars().take(USERNAME_MAX_LEN).collect();
    truncated.trim_end_matches('-').to_string()
}
