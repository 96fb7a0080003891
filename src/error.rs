use thiserror::Error;

/// 播放器错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    /// 媒体载体缺失或不具备播放能力（构造时致命，不重试）
    #[error("Invalid media surface: {0}")]
    InvalidMediaSurface(String),

    /// 配置非法
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// 当前线程没有可用的 tokio 运行时，无法驱动计时器
    #[error("No tokio runtime available to drive player timers")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, PlayerError>;
