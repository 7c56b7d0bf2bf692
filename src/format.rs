//! Display strings for result rows

use crate::backend::types::SearchResultItem;

/// "15,000원", or "무료" for a zero fee
pub fn fee(fee: u64) -> String {
    if fee == 0 {
        return "무료".to_string();
    }
    let digits = fee.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push('원');
    grouped
}

/// "92.0% 일치", one decimal with ties rounded up
pub fn similarity(score: f64) -> String {
    let percent = ((score * 100.0) * 10.0).round() / 10.0;
    format!("{:.1}% 일치", percent)
}

pub fn location(item: &SearchResultItem) -> String {
    format!("{} {}", item.sido, item.sigungu)
}

/// One plain-text line per result, used by the headless `search` command
pub fn result_line(item: &SearchResultItem) -> String {
    let mut line = format!("{}  [{}]", item.name, item.category);
    if let Some(spec) = item.spec() {
        line.push_str(&format!(" {}", spec));
    }
    line.push_str(&format!(
        "  {}  {}  ({})",
        fee(item.fee),
        similarity(item.similarity),
        location(item)
    ));
    line
}
