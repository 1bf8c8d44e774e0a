use std::collections::HashMap;

/// Parse an `application/x-www-form-urlencoded` body into a multimap;
/// repeated keys keep every value.
pub fn parse_urlencoded_body(body: &axum::body::Bytes) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    let raw = String::from_utf8_lossy(body);
    for pair in raw.split('&') {
        if pair.is_empty() {
            continue;
        }
        let mut parts = pair.splitn(2, '=');
        let key_enc = parts.next().unwrap_or("");
        let val_enc = parts.next().unwrap_or("");
        let key = urlencoding::decode(key_enc)
            .unwrap_or_else(|_| key_enc.into())
            .replace('+', " ");
        let val = urlencoding::decode(val_enc)
            .unwrap_or_else(|_| val_enc.into())
            .replace('+', " ");
        map.entry(key).or_default().push(val);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_pairs_and_plus_signs() {
        let body = axum::body::Bytes::from_static(b"name=web+1&flavor_id=m1.small");
        let map = parse_urlencoded_body(&body);
        assert_eq!(map.get("name").unwrap(), &vec!["web 1".to_string()]);
        assert_eq!(map.get("flavor_id").unwrap(), &vec!["m1.small".to_string()]);
    }

    #[test]
    fn keeps_repeated_keys() {
        let body = axum::body::Bytes::from_static(b"k=a&k=b");
        let map = parse_urlencoded_body(&body);
        assert_eq!(map.get("k").unwrap().len(), 2);
    }
}
