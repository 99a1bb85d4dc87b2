//! Array selector resolution.
//!
//! When a body expectation is written as an object but the actual value is
//! an array, object keys can address into the array: `[N]` (negative N
//! counts from the end), `*` / `[*]` for the whole array, and
//! `slice(start[,end])` for a zero-based sub-sequence.

use serde_json::Value;

/// Resolve an array selector against a concrete array.
///
/// Returns `None` for out-of-bounds indices, malformed slice arguments, and
/// any selector shape that is not recognized; callers treat `None` as a
/// missing field, never as an error.
pub fn get_array_value(array: &[Value], selector: &str) -> Option<Value> {
    if selector == "*" || selector == "[*]" {
        return Some(Value::Array(array.to_vec()));
    }

    if let Some(inner) = selector
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
    {
        let index: i64 = inner.trim().parse().ok()?;
        let resolved = if index < 0 {
            array.len() as i64 + index
        } else {
            index
        };
        if resolved < 0 {
            return None;
        }
        return array.get(resolved as usize).cloned();
    }

    if let Some(args) = selector
        .strip_prefix("slice(")
        .and_then(|s| s.strip_suffix(')'))
    {
        let mut parts = args.split(',');
        let start: usize = parts.next()?.trim().parse().ok()?;
        let end: usize = match parts.next() {
            Some(raw) => raw.trim().parse().ok()?,
            None => array.len(),
        };
        if parts.next().is_some() {
            return None;
        }
        let start = start.min(array.len());
        let end = end.min(array.len()).max(start);
        return Some(Value::Array(array[start..end].to_vec()));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn letters() -> Vec<Value> {
        vec![json!("a"), json!("b"), json!("c"), json!("d"), json!("e")]
    }

    #[test]
    fn test_wildcard_returns_whole_array() {
        let arr = letters();
        assert_eq!(get_array_value(&arr, "*"), Some(Value::Array(arr.clone())));
        assert_eq!(get_array_value(&arr, "[*]"), Some(Value::Array(arr)));
    }

    #[test]
    fn test_positive_index() {
        let arr = letters();
        assert_eq!(get_array_value(&arr, "[0]"), Some(json!("a")));
        assert_eq!(get_array_value(&arr, "[4]"), Some(json!("e")));
        assert_eq!(get_array_value(&arr, "[5]"), None);
    }

    #[test]
    fn test_negative_index_counts_from_end() {
        let arr = letters();
        assert_eq!(get_array_value(&arr, "[-1]"), Some(json!("e")));
        assert_eq!(get_array_value(&arr, "[-5]"), Some(json!("a")));
        assert_eq!(get_array_value(&arr, "[-6]"), None);
    }

    #[test]
    fn test_slice_with_end() {
        let arr = letters();
        assert_eq!(
            get_array_value(&arr, "slice(1,3)"),
            Some(json!(["b", "c"]))
        );
        assert_eq!(get_array_value(&arr, "slice(0,0)"), Some(json!([])));
    }

    #[test]
    fn test_slice_to_end_when_end_omitted() {
        let arr = letters();
        assert_eq!(
            get_array_value(&arr, "slice(3)"),
            Some(json!(["d", "e"]))
        );
        assert_eq!(get_array_value(&arr, "slice(0)"), Some(Value::Array(arr)));
    }

    #[test]
    fn test_slice_clamps_out_of_bounds() {
        let arr = letters();
        assert_eq!(get_array_value(&arr, "slice(4,99)"), Some(json!(["e"])));
        assert_eq!(get_array_value(&arr, "slice(9)"), Some(json!([])));
        assert_eq!(get_array_value(&arr, "slice(3,1)"), Some(json!([])));
    }

    #[test]
    fn test_unrecognized_selector_is_absent() {
        let arr = letters();
        assert_eq!(get_array_value(&arr, "name"), None);
        assert_eq!(get_array_value(&arr, "[abc]"), None);
        assert_eq!(get_array_value(&arr, "slice(a,b)"), None);
        assert_eq!(get_array_value(&arr, "slice(1,2,3)"), None);
    }
}
