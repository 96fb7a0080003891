//! 媒体载体抽象。
//!
//! 播放器只通过 [`MediaSurface`] 操作底层的播放资源；[`SimulatedSurface`]
//! 是一个纯内存实现，没有解码，只维护播放头、时长和暂停标志。

use std::sync::{Arc, Mutex};

/// 时长变化监听器，参数为新的时长（秒）
pub type DurationListener = Box<dyn Fn(f64) + Send + Sync + 'static>;

/// 可播放资源需要提供的能力
pub trait MediaSurface: Send + Sync {
    fn play(&self);
    fn pause(&self);

    /// 底层资源自身的暂停标志
    fn paused(&self) -> bool;
    /// 当前播放头位置（秒）
    fn current_time(&self) -> f64;
    fn set_current_time(&self, seconds: f64);
    /// 总时长（秒），元数据加载前为 `NaN`
    fn duration(&self) -> f64;

    fn source(&self) -> Option<String>;
    /// 切换资源；时长回到 `NaN`，并通知时长监听器
    fn set_source(&self, url: &str);

    /// 是否具备视频播放能力，不具备时播放器拒绝绑定
    fn is_playable(&self) -> bool {
        true
    }

    /// 注册时长变化监听器
    fn on_duration_change(&self, listener: DurationListener);
}

struct SurfaceState {
    source: Option<String>,
    current_time: f64,
    duration: f64,
    paused: bool,
    playable: bool,
}

/// 内存中的媒体载体
///
/// 克隆得到的是同一个载体的句柄。
#[derive(Clone)]
pub struct SimulatedSurface {
    state: Arc<Mutex<SurfaceState>>,
    listeners: Arc<Mutex<Vec<Arc<dyn Fn(f64) + Send + Sync>>>>,
}

impl SimulatedSurface {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SurfaceState {
                source: None,
                current_time: 0.0,
                duration: f64::NAN,
                paused: true,
                playable: true,
            })),
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 创建一个已加载元数据的载体
    pub fn with_duration(duration: f64) -> Self {
        let surface = Self::new();
        surface.state.lock().unwrap().duration = duration;
        surface
    }

    /// 创建一个不具备播放能力的载体（例如只能显示图片的节点）
    pub fn unplayable() -> Self {
        let surface = Self::new();
        surface.state.lock().unwrap().playable = false;
        surface
    }

    /// 模拟元数据加载完成，通知时长监听器
    pub fn set_duration(&self, duration: f64) {
        self.state.lock().unwrap().duration = duration;

        // 先复制监听器列表再调用，监听器里可以再次访问载体
        let listeners = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener(duration);
        }
    }

    /// 模拟时间流逝：未暂停时播放头前进，到达末尾时停在末尾并暂停
    pub fn advance(&self, seconds: f64) {
        let mut state = self.state.lock().unwrap();
        if state.paused {
            return;
        }
        let next = state.current_time + seconds;
        if state.duration.is_finite() && next >= state.duration {
            state.current_time = state.duration;
            state.paused = true;
        } else {
            state.current_time = next;
        }
    }
}

impl Default for SimulatedSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSurface for SimulatedSurface {
    fn play(&self) {
        self.state.lock().unwrap().paused = false;
    }

    fn pause(&self) {
        self.state.lock().unwrap().paused = true;
    }

    fn paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }

    fn current_time(&self) -> f64 {
        self.state.lock().unwrap().current_time
    }

    fn set_current_time(&self, seconds: f64) {
        self.state.lock().unwrap().current_time = seconds;
    }

    fn duration(&self) -> f64 {
        self.state.lock().unwrap().duration
    }

    fn source(&self) -> Option<String> {
        self.state.lock().unwrap().source.clone()
    }

    fn set_source(&self, url: &str) {
        {
            let mut state = self.state.lock().unwrap();
            // 切换资源后元数据需要重新加载
            state.source = Some(url.to_string());
            state.current_time = 0.0;
            state.duration = f64::NAN;
            state.paused = true;
        }

        // 时长回到未知，同样是一次时长变化
        let listeners = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener(f64::NAN);
        }
    }

    fn is_playable(&self) -> bool {
        self.state.lock().unwrap().playable
    }

    fn on_duration_change(&self, listener: DurationListener) {
        self.listeners.lock().unwrap().push(Arc::from(listener));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn advance_only_moves_while_playing() {
        let surface = SimulatedSurface::with_duration(10.0);
        surface.advance(3.0);
        assert_eq!(surface.current_time(), 0.0);

        surface.play();
        surface.advance(3.0);
        assert_eq!(surface.current_time(), 3.0);

        surface.advance(30.0);
        assert_eq!(surface.current_time(), 10.0);
        assert!(surface.paused());
    }

    #[test]
    fn set_source_resets_metadata() {
        let surface = SimulatedSurface::with_duration(10.0);
        surface.set_current_time(4.0);
        surface.set_source("https://example.com/a.mp4");

        assert_eq!(surface.source().as_deref(), Some("https://example.com/a.mp4"));
        assert_eq!(surface.current_time(), 0.0);
        assert!(surface.duration().is_nan());
    }

    #[test]
    fn duration_listeners_are_notified() {
        let surface = SimulatedSurface::new();
        let seen = Arc::new(AtomicU64::new(0));
        let seen_clone = seen.clone();
        surface.on_duration_change(Box::new(move |d: f64| {
            seen_clone.store(d.to_bits(), Ordering::SeqCst);
        }));

        surface.set_duration(42.5);
        assert_eq!(f64::from_bits(seen.load(Ordering::SeqCst)), 42.5);
    }

    #[test]
    fn set_source_reports_unknown_duration() {
        let surface = SimulatedSurface::with_duration(10.0);
        let seen = Arc::new(AtomicU64::new(0));
        let seen_clone = seen.clone();
        surface.on_duration_change(Box::new(move |d: f64| {
            seen_clone.store(d.to_bits(), Ordering::SeqCst);
        }));

        surface.set_source("https://example.com/b.mp4");
        assert!(f64::from_bits(seen.load(Ordering::SeqCst)).is_nan());
    }
}
