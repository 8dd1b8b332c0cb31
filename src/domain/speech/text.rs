//! Speech Context - 文本预处理

/// 规范化提交的文本内容
///
/// 折叠连续空白为单个空格并去除首尾空白，
/// 保证 word_count 与送入合成引擎的内容一致
pub fn preprocess_content(content: &str) -> String {
    content.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 按空白分词统计词数
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_vietnamese() {
        assert_eq!(word_count("Xin chào"), 2);
        assert_eq!(word_count("Tôi thấy hoa vàng trên cỏ xanh"), 7);
    }

    #[test]
    fn test_word_count_empty() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t "), 0);
    }

    #[test]
    fn test_preprocess_collapses_whitespace() {
        assert_eq!(preprocess_content("  Xin   chào\n\tbạn  "), "Xin chào bạn");
        assert_eq!(word_count(&preprocess_content("Xin \n chào")), 2);
    }
}
