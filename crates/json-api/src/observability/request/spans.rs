//! Route labels for spans and metrics.

/// Replace numeric path segments with `{id}` so labels stay low-cardinality.
pub(super) fn route_label(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let segments: Vec<&str> = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                "{id}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::route_label;

    #[test]
    fn numeric_segments_become_placeholders() {
        assert_eq!(route_label("/inventory/42"), "/inventory/{id}");
    }

    #[test]
    fn named_segments_are_kept() {
        assert_eq!(route_label("/inventory/reserve"), "/inventory/reserve");
        assert_eq!(route_label("/products/search"), "/products/search");
        assert_eq!(route_label("/"), "/");
    }
}
