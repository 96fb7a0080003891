//! 注入式日志协作者。
//!
//! 播放器和控件不直接依赖全局日志，而是在构造时接收一个 [`PlayerLogger`]。

use std::sync::Mutex;

use crate::utils::timestamp;

pub trait PlayerLogger: Send + Sync {
    fn log(&self, message: &str);
    fn error(&self, message: &str);
    fn clear(&self) {}
}

/// 转发到 `log` 门面
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacade;

impl PlayerLogger for LogFacade {
    fn log(&self, message: &str) {
        log::info!(target: "remu_player", "{}", message);
    }

    fn error(&self, message: &str) {
        log::error!(target: "remu_player", "{}", message);
    }
}

/// 日志面板中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub text: String,
    pub is_error: bool,
}

/// 页面日志面板：带时间戳，最新的在最前面
#[derive(Debug, Default)]
pub struct DisplayLog {
    lines: Mutex<Vec<LogLine>>,
}

impl DisplayLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().unwrap().clone()
    }

    fn prepend(&self, message: &str, is_error: bool) {
        let line = LogLine {
            text: format!("{} - {}", timestamp(), message),
            is_error,
        };
        self.lines.lock().unwrap().insert(0, line);
    }
}

impl PlayerLogger for DisplayLog {
    fn log(&self, message: &str) {
        self.prepend(message, false);
    }

    fn error(&self, message: &str) {
        self.prepend(message, true);
    }

    fn clear(&self) {
        self.lines.lock().unwrap().clear();
        self.prepend("Log cleared", false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_line_comes_first() {
        let log = DisplayLog::new();
        log.log("first");
        log.error("second");

        let lines = log.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].text.ends_with(" - second"));
        assert!(lines[0].is_error);
        assert!(lines[1].text.ends_with(" - first"));
        assert!(!lines[1].is_error);
    }

    #[test]
    fn clear_leaves_a_marker() {
        let log = DisplayLog::new();
        log.log("a");
        log.log("b");
        log.clear();

        let lines = log.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].text.ends_with(" - Log cleared"));
    }
}
