//! `/etc/login.defs` key/value fields.

/// Field selecting the password hashing method.
pub const ENCRYPT_METHOD: &str = "ENCRYPT_METHOD";

/// Methods accepted as strong.
pub const STRONG_METHODS: &[&str] = &["SHA512", "YESCRYPT"];

/// Method written by the rewrite.
pub const DEFAULT_METHOD: &str = "SHA512";

fn field_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }
    let mut words = line.split_whitespace();
    if words.next()? != key {
        return None;
    }
    Some(words.next().unwrap_or(""))
}

/// Value of a field; the last active occurrence wins.
#[must_use]
pub fn get<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    text.lines().filter_map(|l| field_value(l, key)).last()
}

/// Whether the configured hashing method is strong.
#[must_use]
pub fn has_strong_encrypt_method(text: &str) -> bool {
    get(text, ENCRYPT_METHOD)
        .is_some_and(|m| STRONG_METHODS.iter().any(|s| s.eq_ignore_ascii_case(m)))
}

/// Rewrite every active occurrence of `key` to `value`, or append the field
/// if it is absent. All other lines are kept as they are.
#[must_use]
pub fn set(text: &str, key: &str, value: &str) -> String {
    let mut out = String::with_capacity(text.len() + key.len() + value.len() + 2);
    let mut replaced = false;

    for line in text.lines() {
        if field_value(line, key).is_some() {
            push_field(&mut out, key, value);
            replaced = true;
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }

    if !replaced {
        push_field(&mut out, key, value);
        out.push('\n');
    }

    out
}

fn push_field(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push_str("\t\t");
    out.push_str(value);
}
