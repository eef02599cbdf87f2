//! Dimension key sanitization.

use std::borrow::Cow;

use otlp_sfx_protocol::DataPoint;

/// Rewrites every dimension key of every point to the SignalFx key character set.
///
/// Values are left untouched.
pub fn sanitize_datapoint_dimensions(datapoints: &mut [DataPoint]) {
    for dp in datapoints {
        for dim in &mut dp.dimensions {
            if let Cow::Owned(key) = filter_key_chars(&dim.key) {
                dim.key = key;
            }
        }
    }
}

/// Replaces any character that is not a letter, digit, `_` or `-` with `_`.
pub fn filter_key_chars(key: &str) -> Cow<'_, str> {
    if key.chars().all(is_valid_key_char) {
        return Cow::Borrowed(key);
    }
    Cow::Owned(
        key.chars()
            .map(|c| if is_valid_key_char(c) { c } else { '_' })
            .collect(),
    )
}

fn is_valid_key_char(c: char) -> bool {
    c.is_alphabetic() || c.is_numeric() || c == '_' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;
    use otlp_sfx_protocol::Dimension;

    #[test]
    fn test_filter_key_chars() {
        assert_eq!(filter_key_chars("k8s.pod.name"), "k8s_pod_name");
        assert_eq!(filter_key_chars("a/b c:d"), "a_b_c_d");
        assert_eq!(filter_key_chars("upper_bound"), "upper_bound");
        assert_eq!(filter_key_chars("dash-ok"), "dash-ok");
        assert_eq!(filter_key_chars(""), "");
    }

    #[test]
    fn test_unicode_letters_and_digits_are_kept() {
        assert_eq!(filter_key_chars("höhe"), "höhe");
        assert_eq!(filter_key_chars("名前.値"), "名前_値");
        assert_eq!(filter_key_chars("٣x"), "٣x");
    }

    #[test]
    fn test_clean_keys_are_borrowed() {
        assert!(matches!(filter_key_chars("already_clean"), Cow::Borrowed(_)));
        assert!(matches!(filter_key_chars("not.clean"), Cow::Owned(_)));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let mut dps = vec![DataPoint {
            metric: "m".to_owned(),
            dimensions: vec![
                Dimension::new("host.name", "a.b"),
                Dimension::new("http/route", "/x"),
                Dimension::new("ok", "v"),
            ],
            ..Default::default()
        }];
        sanitize_datapoint_dimensions(&mut dps);
        let once = dps.clone();
        sanitize_datapoint_dimensions(&mut dps);
        assert_eq!(dps, once);
        let keys: Vec<&str> = dps[0].dimensions.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["host_name", "http_route", "ok"]);
        // Values are not sanitized.
        assert_eq!(dps[0].dimensions[0].value, "a.b");
        for dim in &dps[0].dimensions {
            assert!(dim
                .key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        }
    }
}
