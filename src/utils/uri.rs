//! URI escaping with ECMAScript `encodeURI` semantics

/// Characters `encodeURI` leaves untouched besides ASCII alphanumerics
const URI_RESERVED_AND_MARKS: &[u8] = b";,/?:@&=+$-_.!~*'()#";

/// Percent-encode every byte outside the unreserved and reserved sets
///
/// Non-ASCII characters are encoded as their UTF-8 bytes with uppercase hex,
/// so an already-valid URI passes through unchanged apart from `%` itself.
pub fn encode_uri(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        if byte.is_ascii_alphanumeric() || URI_RESERVED_AND_MARKS.contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}
