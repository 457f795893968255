//! JSON object key case conversion
//!
//! In-memory models name their fields in camelCase; the backend speaks
//! snake_case. These functions translate a single key in either direction.
//! Acronyms collapse into one word (`avatarURL` -> `avatar_url`), so the
//! reverse trip yields `avatarUrl`; models therefore spell acronyms as words.

/// Convert a camelCase key to snake_case.
///
/// Leading underscores and characters other than uppercase letters are kept
/// as-is. A new word starts at an uppercase letter that follows a lowercase
/// letter or digit, or at the last uppercase letter of an acronym that is
/// followed by a lowercase letter.
///
/// ```
/// use beautywiki_common::utils::to_snake_case;
///
/// assert_eq!(to_snake_case("expiresAt"), "expires_at");
/// assert_eq!(to_snake_case("avatarURLString"), "avatar_url_string");
/// assert_eq!(to_snake_case("already_snake"), "already_snake");
/// ```
#[must_use]
pub fn to_snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (index, &current) in chars.iter().enumerate() {
        if !current.is_uppercase() {
            out.push(current);
            continue;
        }

        let previous = index.checked_sub(1).and_then(|p| chars.get(p)).copied();
        let next = chars.get(index + 1).copied();
        let starts_word = match previous {
            Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
            Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
            _ => false,
        };

        if starts_word {
            out.push('_');
        }
        out.extend(current.to_lowercase());
    }

    out
}

/// Convert a snake_case key to camelCase.
///
/// Leading and trailing underscores are preserved. A key without inner
/// underscores is returned unchanged; otherwise the first word is lowercased
/// and every following word is capitalized.
///
/// ```
/// use beautywiki_common::utils::to_camel_case;
///
/// assert_eq!(to_camel_case("expires_at"), "expiresAt");
/// assert_eq!(to_camel_case("_private_value"), "_privateValue");
/// assert_eq!(to_camel_case("token"), "token");
/// ```
#[must_use]
pub fn to_camel_case(key: &str) -> String {
    let Some(start) = key.find(|c| c != '_') else {
        return key.to_string();
    };
    let end = key.rfind(|c| c != '_').map_or(key.len(), |i| i + 1);

    let (leading, rest) = key.split_at(start);
    let (core, trailing) = rest.split_at(end - start);

    let words: Vec<&str> = core.split('_').filter(|w| !w.is_empty()).collect();
    if words.len() <= 1 {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len());
    out.push_str(leading);
    for (index, word) in words.iter().enumerate() {
        if index == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out.push_str(trailing);
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
