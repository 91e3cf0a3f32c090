//! 滚动历史：只追加、从头部淘汰。

/// 追加到尾部，超出容量时从头部丢弃最旧的条目，返回丢弃数量
pub fn append_bounded<T>(items: &mut Vec<T>, item: T, capacity: usize) -> usize {
    items.push(item);

    let excess = items.len().saturating_sub(capacity);
    if excess > 0 {
        items.drain(..excess);
    }
    excess
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixty_one_appends_keep_last_sixty() {
        let mut items = Vec::new();
        for n in 1..=61 {
            append_bounded(&mut items, n, 60);
        }

        assert_eq!(items.len(), 60);
        assert_eq!(items, (2..=61).collect::<Vec<_>>());
    }

    #[test]
    fn test_oversized_history_is_trimmed_to_capacity() {
        // 容量调小后，旧记录一次性裁剪
        let mut items: Vec<u32> = (0..100).collect();
        let evicted = append_bounded(&mut items, 100, 10);

        assert_eq!(evicted, 91);
        assert_eq!(items, (91..=100).collect::<Vec<_>>());
    }

    #[test]
    fn test_below_capacity_evicts_nothing() {
        let mut items = vec!["a"];
        assert_eq!(append_bounded(&mut items, "b", 60), 0);
        assert_eq!(items, vec!["a", "b"]);
    }
}
