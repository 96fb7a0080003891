use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::{PlayerError, Result};
use crate::events::{EventData, PlayerEvent, Topic, Topics};
use crate::logger::PlayerLogger;
use crate::media::MediaSurface;

/// 观察者回调：事件类型和可选的附带数据
pub type Observer = Arc<dyn Fn(PlayerEvent, Option<&EventData>) + Send + Sync + 'static>;

/// 播放状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    Stopped,
    FastForward,
    Rewind,
}

/// 步进方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
}

impl StepDirection {
    fn modifier(&self) -> f64 {
        match self {
            StepDirection::Forward => 1.0,
            StepDirection::Backward => -1.0,
        }
    }

    /// 该方向对应的快进/快退状态和事件
    fn seek_state(&self) -> (PlaybackState, PlayerEvent) {
        match self {
            StepDirection::Forward => (PlaybackState::FastForward, PlayerEvent::FastForward),
            StepDirection::Backward => (PlaybackState::Rewind, PlayerEvent::Rewind),
        }
    }
}

/// 播放器配置
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptions {
    /// 快进/快退时每次步进的秒数
    pub seek_step_seconds: f64,
    /// 步进计时器周期
    pub step_interval: Duration,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            seek_step_seconds: 2.0,
            step_interval: Duration::from_millis(500),
        }
    }
}

impl PlayerOptions {
    fn validate(&self) -> Result<()> {
        if !self.seek_step_seconds.is_finite() || self.seek_step_seconds <= 0.0 {
            return Err(PlayerError::InvalidConfig(format!(
                "seek_step_seconds must be positive, got {}",
                self.seek_step_seconds
            )));
        }
        if self.step_interval.is_zero() {
            return Err(PlayerError::InvalidConfig(
                "step_interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// 步进计时器句柄，取消后计时任务在下一次调度时退出
struct SeekTimer {
    token: CancellationToken,
}

impl SeekTimer {
    fn cancel(self) {
        self.token.cancel();
    }
}

/// 状态迁移后对载体执行的操作
#[derive(Debug, Clone, Copy, PartialEq)]
enum MediaCommand {
    Play,
    Pause,
    SetTime(f64),
}

/// 受同一把锁保护的状态机
struct Core {
    state: PlaybackState,
    seek_timer: Option<SeekTimer>,
}

impl Core {
    fn cancel_seek_timer(&mut self) {
        if let Some(timer) = self.seek_timer.take() {
            timer.cancel();
        }
    }
}

struct Inner {
    media: Arc<dyn MediaSurface>,
    options: PlayerOptions,
    logger: Arc<dyn PlayerLogger>,
    runtime: Handle,
    core: Mutex<Core>,
    observers: RwLock<HashMap<Topic, Vec<Observer>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Ok(core) = self.core.get_mut() {
            core.cancel_seek_timer();
        }
    }
}

/// 媒体载体之上的播放状态机
///
/// 克隆得到的是同一个播放器的句柄。所有命令都在持锁期间完成状态迁移，
/// 释放锁之后才通知观察者，因此观察者里可以再次调用播放器命令。
#[derive(Clone)]
pub struct Player {
    inner: Arc<Inner>,
}

/// 不持有播放器的弱句柄，供观察者和计时任务使用以避免循环引用
#[derive(Clone)]
pub struct WeakPlayer {
    inner: Weak<Inner>,
}

impl WeakPlayer {
    pub fn upgrade(&self) -> Option<Player> {
        self.inner.upgrade().map(|inner| Player { inner })
    }
}

impl Player {
    pub fn new(
        media: Arc<dyn MediaSurface>,
        options: PlayerOptions,
        logger: Arc<dyn PlayerLogger>,
    ) -> Result<Self> {
        if !media.is_playable() {
            return Err(PlayerError::InvalidMediaSurface(
                "Invalid video element.".to_string(),
            ));
        }
        options.validate()?;
        let runtime = Handle::try_current().map_err(|_| PlayerError::NoRuntime)?;

        Ok(Self {
            inner: Arc::new(Inner {
                media,
                options,
                logger,
                runtime,
                core: Mutex::new(Core {
                    state: PlaybackState::Stopped,
                    seek_timer: None,
                }),
                observers: RwLock::new(HashMap::new()),
            }),
        })
    }

    /// 绑定一个可能缺失的媒体载体
    pub fn attach(
        media: Option<Arc<dyn MediaSurface>>,
        options: PlayerOptions,
        logger: Arc<dyn PlayerLogger>,
    ) -> Result<Self> {
        match media {
            Some(media) => Self::new(media, options, logger),
            None => Err(PlayerError::InvalidMediaSurface(
                "No video element.".to_string(),
            )),
        }
    }

    pub fn downgrade(&self) -> WeakPlayer {
        WeakPlayer {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn media(&self) -> Arc<dyn MediaSurface> {
        self.inner.media.clone()
    }

    pub fn state(&self) -> PlaybackState {
        self.core().state
    }

    /// 直接读取载体的暂停标志，可能与 `state` 短暂不一致
    pub fn paused(&self) -> bool {
        self.inner.media.paused()
    }

    pub fn playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    /// 快进或快退中
    pub fn seeking(&self) -> bool {
        matches!(
            self.state(),
            PlaybackState::FastForward | PlaybackState::Rewind
        )
    }

    pub fn current_time(&self) -> f64 {
        self.inner.media.current_time()
    }

    pub fn duration(&self) -> f64 {
        self.inner.media.duration()
    }

    pub fn source(&self) -> Option<String> {
        self.inner.media.source()
    }

    pub fn seek_step_seconds(&self) -> f64 {
        self.inner.options.seek_step_seconds
    }

    /// 订阅一个或多个主题，同一个回调可以重复注册，每次注册都会被调用一次
    pub fn add_observer<F>(&self, topics: impl Into<Topics>, callback: F)
    where
        F: Fn(PlayerEvent, Option<&EventData>) + Send + Sync + 'static,
    {
        let callback: Observer = Arc::new(callback);
        let mut observers = self.inner.observers.write().unwrap();
        for topic in topics.into().iter() {
            observers.entry(*topic).or_default().push(callback.clone());
        }
    }

    /// 依次调用该事件的观察者，再调用通配符观察者
    ///
    /// 回调中的 panic 不会被捕获，本轮通知随之中断。
    pub fn notify(&self, event: PlayerEvent, data: Option<&EventData>) {
        self.inner.logger.log(&format!("Event '{}' fired", event));

        let callbacks: Vec<Observer> = {
            let observers = self.inner.observers.read().unwrap();
            observers
                .get(&Topic::Event(event))
                .into_iter()
                .chain(observers.get(&Topic::All))
                .flatten()
                .cloned()
                .collect()
        };

        for callback in callbacks {
            callback(event, data);
        }
    }

    /// 停止当前播放并切换资源，不自动播放
    pub fn load(&self, url: &str) {
        self.stop();
        self.inner.logger.log(&format!("Player.load({})", url));
        self.inner.media.set_source(url);
    }

    pub fn play(&self) {
        self.inner.logger.log("Player.play()");
        {
            let mut core = self.core();
            core.cancel_seek_timer();
            core.state = PlaybackState::Playing;
        }
        self.apply(&[MediaCommand::Play]);
        self.notify(PlayerEvent::Play, None);
    }

    pub fn pause(&self) {
        self.inner.logger.log("Player.pause()");
        {
            let mut core = self.core();
            core.cancel_seek_timer();
            core.state = PlaybackState::Paused;
        }
        self.apply(&[MediaCommand::Pause]);
        self.notify(PlayerEvent::Pause, None);
    }

    /// 停止播放并把播放头归零
    pub fn stop(&self) {
        let commands = {
            let mut core = self.core();
            self.stop_locked(&mut core)
        };
        self.apply(&commands);
        self.notify(PlayerEvent::Stop, None);
    }

    /// 切换快进
    pub fn fast_forward(&self) {
        self.toggle_seek(StepDirection::Forward);
    }

    /// 切换快退
    pub fn rewind(&self) {
        self.toggle_seek(StepDirection::Backward);
    }

    /// 播放头按步长移动一次，越过任一边界时停止并归零
    pub fn step(&self, direction: StepDirection) {
        let target = self.step_target(direction);
        let duration = self.inner.media.duration();
        let commands = {
            let mut core = self.core();
            self.step_locked(&mut core, target, duration)
        };
        self.finish_step(&commands);
    }

    /// 跳转到指定秒数；不小于时长时什么也不做
    pub fn seek(&self, seconds: f64) {
        self.inner
            .logger
            .log(&format!("{} {} seconds", PlayerEvent::Seek, seconds));

        // NaN 时长下比较为 false，同样视为越界
        if !(seconds < self.inner.media.duration()) {
            return;
        }

        let resume = {
            let mut core = self.core();
            core.cancel_seek_timer();
            match core.state {
                PlaybackState::Playing => MediaCommand::Play,
                // 快进/快退状态必须伴随步进计时器，计时器已取消，因此退回暂停
                PlaybackState::FastForward | PlaybackState::Rewind => {
                    core.state = PlaybackState::Paused;
                    MediaCommand::Pause
                }
                PlaybackState::Paused | PlaybackState::Stopped => MediaCommand::Pause,
            }
        };

        self.apply(&[MediaCommand::SetTime(seconds), resume]);
        self.notify(PlayerEvent::Seek, None);
    }

    /// 跳转到用户输入的秒数，无法解析时与越界跳转一样被忽略
    pub fn seek_str(&self, input: &str) {
        match input.trim().parse::<f64>() {
            Ok(seconds) => self.seek(seconds),
            Err(_) => self
                .inner
                .logger
                .error(&format!("{} ignored, not a number: {:?}", PlayerEvent::Seek, input)),
        }
    }

    fn core(&self) -> MutexGuard<'_, Core> {
        self.inner.core.lock().unwrap()
    }

    /// 对载体执行命令；调用方必须已经释放状态锁，载体可能同步回调播放器
    fn apply(&self, commands: &[MediaCommand]) {
        let media = &self.inner.media;
        for command in commands {
            match *command {
                MediaCommand::Play => media.play(),
                MediaCommand::Pause => media.pause(),
                MediaCommand::SetTime(seconds) => media.set_current_time(seconds),
            }
        }
    }

    fn stop_locked(&self, core: &mut Core) -> Vec<MediaCommand> {
        self.inner.logger.log("Player.stop()");
        core.cancel_seek_timer();
        core.state = PlaybackState::Stopped;
        vec![MediaCommand::Pause, MediaCommand::SetTime(0.0)]
    }

    fn step_target(&self, direction: StepDirection) -> f64 {
        self.inner.media.current_time() + self.inner.options.seek_step_seconds * direction.modifier()
    }

    /// 越界时返回停止命令，否则返回移动播放头的命令
    fn step_locked(&self, core: &mut Core, target: f64, duration: f64) -> Vec<MediaCommand> {
        if target >= duration || target <= 0.0 {
            self.stop_locked(core)
        } else {
            vec![MediaCommand::SetTime(target)]
        }
    }

    fn finish_step(&self, commands: &[MediaCommand]) {
        self.apply(commands);
        if commands.contains(&MediaCommand::Pause) {
            self.notify(PlayerEvent::Stop, None);
        }
    }

    fn toggle_seek(&self, direction: StepDirection) {
        let (target, event) = direction.seek_state();
        let command = {
            let mut core = self.core();
            core.cancel_seek_timer();

            if core.state == target {
                core.state = PlaybackState::Playing;
                self.inner.logger.log(&format!("{} off", event));
                MediaCommand::Play
            } else {
                core.state = target;
                core.seek_timer = Some(self.start_seek_timer(direction));
                self.inner.logger.log(&format!("{} on", event));
                MediaCommand::Pause
            }
        };
        self.apply(&[command]);
        self.notify(event, None);
    }

    fn start_seek_timer(&self, direction: StepDirection) -> SeekTimer {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let player = self.downgrade();
        let period = self.inner.options.step_interval;

        self.inner.runtime.spawn(async move {
            let mut ticks = time::interval_at(time::Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticks.tick() => {
                        let Some(player) = player.upgrade() else {
                            break;
                        };
                        player.step_tick(direction, &cancelled);
                    }
                }
            }
        });

        SeekTimer { token }
    }

    /// 计时器回调；与取消竞争时，持锁后检查令牌
    fn step_tick(&self, direction: StepDirection, token: &CancellationToken) {
        let target = self.step_target(direction);
        let duration = self.inner.media.duration();
        let commands = {
            let mut core = self.core();
            if token.is_cancelled() {
                return;
            }
            self.step_locked(&mut core, target, duration)
        };
        self.finish_step(&commands);
    }
}
