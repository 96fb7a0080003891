use chrono::{DateTime, Timelike, Utc};

/// 把秒数格式化为 `MM:SS`（只保留一小时以内的部分）
///
/// 非有限值或负数显示为 `00:00`。
pub fn format_display_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }
    let total = (seconds.floor() as u64) % 3600;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// 当前 UTC 时间戳，形如 `9:05:03Z`
pub fn timestamp() -> String {
    format_timestamp(Utc::now())
}

pub fn format_timestamp(time: DateTime<Utc>) -> String {
    format!("{}:{:02}:{:02}Z", time.hour(), time.minute(), time.second())
}
