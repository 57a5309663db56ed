//! 通用工具函数

use crate::types::DataValue;

/// 是否为非空的纯ASCII数字串
pub fn is_digit_string(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// 把外部输入的ID文本转换为正整数
///
/// 读取去掉前导空白后的前缀数字，无法转换、为负或溢出时返回0
pub fn parse_unsafe_id(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let digits = trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or("");
    digits.parse::<i64>().unwrap_or(0)
}

/// 以分隔符连接数组元素的存储文本
pub fn join_with_delimiter(items: &[DataValue], delimiter: &str) -> String {
    items
        .iter()
        .map(DataValue::to_storage_text)
        .collect::<Vec<_>>()
        .join(delimiter)
}

/// 按分隔符拆分存储文本，空文本得到空数组
pub fn split_with_delimiter(text: &str, delimiter: &str) -> Vec<DataValue> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(delimiter)
        .map(|part| DataValue::String(part.to_string()))
        .collect()
}

/// 把嵌套数组展开为一维数组
pub fn flatten_values(values: &[DataValue]) -> Vec<DataValue> {
    let mut flat = Vec::with_capacity(values.len());
    for value in values {
        match value {
            DataValue::Array(items) => flat.extend(flatten_values(items)),
            other => flat.push(other.clone()),
        }
    }
    flat
}

/// 每个单词首字母大写
pub fn capitalize_words(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if at_word_start {
            result.extend(ch.to_uppercase());
        } else {
            result.push(ch);
        }
        at_word_start = ch.is_whitespace();
    }
    result
}
