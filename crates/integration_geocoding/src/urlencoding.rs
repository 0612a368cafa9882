//! URL encoding for free-form address queries

/// Percent-encode an address for the `address=` query parameter
///
/// Unreserved characters (`A-Z`, `a-z`, `0-9`, `-`, `_`, `.`, `~`) are kept,
/// as are `+` and `,` so that callers may pass addresses that already use
/// `+` for spaces. Spaces are encoded as `+`; everything else is
/// percent-encoded as UTF-8.
pub fn encode_address(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 3);
    for c in input.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' | '+' | ',' => {
                result.push(c);
            },
            ' ' => result.push('+'),
            _ => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).as_bytes() {
                    result.push_str(&format!("%{b:02X}"));
                }
            },
        }
    }
    result
}
