use std::fmt;
use std::str::FromStr;

/// 事件附带的数据（核心本身从不携带数据，留给外部桥接使用）
pub type EventData = serde_json::Value;

/// 播放器事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerEvent {
    /// 就绪（保留，供外部桥接）
    Ready,
    /// 错误发生（保留，供外部桥接）
    Error,
    /// 播放结束（保留，供外部桥接）
    Complete,
    /// 静音（保留，供外部桥接）
    Mute,
    /// 播放开始或从暂停恢复
    Play,
    /// 播放暂停
    Pause,
    /// 播放停止，播放头归零
    Stop,
    /// 快进开关切换
    FastForward,
    /// 快退开关切换
    Rewind,
    /// 跳转完成
    Seek,
}

impl PlayerEvent {
    pub const ALL: [PlayerEvent; 10] = [
        PlayerEvent::Ready,
        PlayerEvent::Error,
        PlayerEvent::Complete,
        PlayerEvent::Mute,
        PlayerEvent::Play,
        PlayerEvent::Pause,
        PlayerEvent::Stop,
        PlayerEvent::FastForward,
        PlayerEvent::Rewind,
        PlayerEvent::Seek,
    ];

    /// 事件名
    pub fn name(&self) -> &'static str {
        match self {
            PlayerEvent::Ready => "ready",
            PlayerEvent::Error => "error",
            PlayerEvent::Complete => "complete",
            PlayerEvent::Mute => "mute",
            PlayerEvent::Play => "play",
            PlayerEvent::Pause => "pause",
            PlayerEvent::Stop => "stop",
            PlayerEvent::FastForward => "fast_forward",
            PlayerEvent::Rewind => "rewind",
            PlayerEvent::Seek => "seek",
        }
    }
}

impl fmt::Display for PlayerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerEvent::ALL
            .into_iter()
            .find(|event| event.name() == s)
            .ok_or_else(|| UnknownEvent(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown player event '{0}'")]
pub struct UnknownEvent(pub String);

/// 观察者订阅的主题：某个具体事件，或通配符 `*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Event(PlayerEvent),
    All,
}

impl From<PlayerEvent> for Topic {
    fn from(event: PlayerEvent) -> Self {
        Topic::Event(event)
    }
}

impl FromStr for Topic {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(Topic::All);
        }
        s.parse().map(Topic::Event)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Event(event) => event.fmt(f),
            Topic::All => f.write_str("*"),
        }
    }
}

/// 一个或多个订阅主题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics(Vec<Topic>);

impl Topics {
    pub fn iter(&self) -> impl Iterator<Item = &Topic> {
        self.0.iter()
    }
}

impl From<Topic> for Topics {
    fn from(topic: Topic) -> Self {
        Topics(vec![topic])
    }
}

impl From<PlayerEvent> for Topics {
    fn from(event: PlayerEvent) -> Self {
        Topics(vec![Topic::Event(event)])
    }
}

impl<T: Into<Topic>> From<Vec<T>> for Topics {
    fn from(topics: Vec<T>) -> Self {
        Topics(topics.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Topic>, const N: usize> From<[T; N]> for Topics {
    fn from(topics: [T; N]) -> Self {
        Topics(topics.into_iter().map(Into::into).collect())
    }
}
