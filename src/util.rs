use base64::Engine;

pub fn parse_data_uri(input: &str) -> Option<String> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(rest) = s.strip_prefix("data:") {
        // data:image/png;base64,....
        let (_, b64) = rest.split_once(',')?;
        return Some(b64.trim().to_string());
    }
    // assume plain base64
    Some(s.to_string())
}

pub fn b64_decode(input: &str) -> Option<Vec<u8>> {
    let b64 = parse_data_uri(input)?;
    let engine = base64::engine::general_purpose::STANDARD;
    engine.decode(b64.as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_strips_prefix() {
        assert_eq!(
            parse_data_uri("data:image/png;base64,aGVsbG8=").as_deref(),
            Some("aGVsbG8=")
        );
    }

    #[test]
    fn plain_base64_passes_through() {
        assert_eq!(parse_data_uri(" aGVsbG8= ").as_deref(), Some("aGVsbG8="));
    }

    #[test]
    fn empty_input_is_none() {
        assert!(parse_data_uri("").is_none());
        assert!(parse_data_uri("   ").is_none());
    }

    #[test]
    fn decode_roundtrip() {
        assert_eq!(b64_decode("data:text/plain;base64,aGVsbG8=").unwrap(), b"hello");
        assert!(b64_decode("data:image/png;base64,!!!").is_none());
    }
}
