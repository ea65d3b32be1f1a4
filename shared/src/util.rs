/// 获取当前 UTC 时间戳（秒）
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Canonical form of an identity value.
///
/// Identity values reach the client as JSON strings, JSON numbers, CSV
/// cells and URL segments; all of them compare through this.
pub fn normalize_identity(raw: &str) -> String {
    raw.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_identity() {
        assert_eq!(normalize_identity(" 111122223333\n"), "111122223333");
        assert_eq!(normalize_identity("111122223333"), "111122223333");
        assert_eq!(normalize_identity("   "), "");
    }
}
