//! 播放控件：把按钮、跳转输入框、进度条和时间显示绑定到播放器上。
//!
//! 这里不涉及具体的界面框架，控件状态保存在 [`ControlsView`] 中，
//! 由界面层读取后渲染。

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::{PlayerError, Result};
use crate::events::Topic;
use crate::media::MediaSurface;
use crate::player::Player;
use crate::utils::format_display_time;

/// 时长未知时显示的时间
pub const EMPTY_DISPLAY_TIME: &str = "00:00 / 00:00";

/// 控件的当前显示状态
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsView {
    /// 所有控件是否可用
    pub enabled: bool,
    /// 播放/暂停按钮上的“正在播放”标记
    pub playing: bool,
    /// 手动跳转输入框的内容
    pub seek_input: String,
    /// 手动跳转输入框的上限（秒）
    pub seek_max: Option<u64>,
    /// 进度条位置（秒）
    pub scrubber_value: f64,
    /// 进度条上限（秒）
    pub scrubber_max: Option<u64>,
    pub display_time: String,
}

impl Default for ControlsView {
    fn default() -> Self {
        Self {
            enabled: false,
            playing: false,
            seek_input: String::new(),
            seek_max: None,
            scrubber_value: 0.0,
            scrubber_max: None,
            display_time: EMPTY_DISPLAY_TIME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlsOptions {
    /// 时间显示和进度条的刷新周期
    pub refresh_interval: Duration,
}

impl Default for ControlsOptions {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(1),
        }
    }
}

pub struct PlayerControls {
    player: Player,
    view: Arc<Mutex<ControlsView>>,
    refresh: CancellationToken,
}

impl PlayerControls {
    pub fn new(player: Player, options: ControlsOptions) -> Result<Self> {
        if options.refresh_interval.is_zero() {
            return Err(PlayerError::InvalidConfig(
                "refresh_interval must be non-zero".to_string(),
            ));
        }
        let runtime = Handle::try_current().map_err(|_| PlayerError::NoRuntime)?;

        let controls = Self {
            player,
            view: Arc::new(Mutex::new(ControlsView::default())),
            refresh: CancellationToken::new(),
        };

        controls.add_observers();
        controls.add_duration_listener();
        controls.start_refresh_timer(&runtime, options.refresh_interval);

        Ok(controls)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// 当前显示状态的快照
    pub fn view(&self) -> ControlsView {
        self.view.lock().unwrap().clone()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.view.lock().unwrap().enabled = enabled;
    }

    pub fn click_play_pause(&self) {
        if !self.enabled() {
            return;
        }
        if self.player.playing() {
            self.player.pause();
        } else {
            self.player.play();
        }
    }

    pub fn click_fast_forward(&self) {
        if self.enabled() {
            self.player.fast_forward();
        }
    }

    pub fn click_rewind(&self) {
        if self.enabled() {
            self.player.rewind();
        }
    }

    /// 提交手动跳转表单
    pub fn submit_seek(&self, input: &str) {
        if !self.enabled() {
            return;
        }
        self.view.lock().unwrap().seek_input = input.to_string();
        self.player.seek_str(input);
    }

    /// 拖动进度条
    pub fn scrub(&self, seconds: f64) {
        if !self.enabled() {
            return;
        }
        self.view.lock().unwrap().scrubber_value = seconds;
        self.player.seek(seconds);
    }

    /// 立即刷新一次时间显示和进度条
    pub fn refresh(&self) {
        refresh_view(&self.player, &self.view);
    }

    /// 形如 `MM:SS / MM:SS` 的播放进度
    pub fn display_time(&self) -> String {
        display_time(&self.player)
    }

    fn enabled(&self) -> bool {
        self.view.lock().unwrap().enabled
    }

    /// 任意事件后同步播放/暂停按钮的标记
    fn add_observers(&self) {
        let player = self.player.downgrade();
        let view = self.view.clone();
        self.player.add_observer(Topic::All, move |_, _| {
            if let Some(player) = player.upgrade() {
                view.lock().unwrap().playing = player.playing();
            }
        });
    }

    /// 时长变化时限制跳转输入的范围
    fn add_duration_listener(&self) {
        let view = self.view.clone();
        self.player.media().on_duration_change(Box::new(move |duration: f64| {
            let max = duration.is_finite().then(|| duration.floor().max(0.0) as u64);
            let mut view = view.lock().unwrap();
            view.seek_max = max;
            view.scrubber_max = max;
        }));
    }

    fn start_refresh_timer(&self, runtime: &Handle, period: Duration) {
        let cancelled = self.refresh.clone();
        let player = self.player.downgrade();
        let view = Arc::downgrade(&self.view);

        runtime.spawn(async move {
            let mut ticks = time::interval_at(time::Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticks.tick() => {
                        let (Some(player), Some(view)) = (player.upgrade(), view.upgrade()) else {
                            break;
                        };
                        refresh_view(&player, &view);
                    }
                }
            }
        });
    }
}

impl Drop for PlayerControls {
    fn drop(&mut self) {
        self.refresh.cancel();
    }
}

fn refresh_view(player: &Player, view: &Mutex<ControlsView>) {
    let current_time = player.current_time();
    let display = display_time(player);

    let mut view = view.lock().unwrap();
    view.scrubber_value = current_time;
    view.display_time = display;
}

fn display_time(player: &Player) -> String {
    let duration = player.duration();
    // 元数据未加载（NaN）或时长为 0 时显示占位
    if !duration.is_finite() || duration <= 0.0 {
        return EMPTY_DISPLAY_TIME.to_string();
    }
    format!(
        "{} / {}",
        format_display_time(player.current_time()),
        format_display_time(duration)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::DisplayLog;
    use crate::media::SimulatedSurface;
    use crate::player::{PlaybackState, PlayerOptions};

    fn controls_with(surface: &SimulatedSurface) -> PlayerControls {
        let player = Player::new(
            Arc::new(surface.clone()),
            PlayerOptions::default(),
            Arc::new(DisplayLog::new()),
        )
        .unwrap();
        PlayerControls::new(player, ControlsOptions::default()).unwrap()
    }

    #[tokio::test]
    async fn starts_disabled_and_ignores_clicks() {
        let surface = SimulatedSurface::with_duration(60.0);
        let controls = controls_with(&surface);

        assert!(!controls.view().enabled);
        controls.click_play_pause();
        assert_eq!(controls.player().state(), PlaybackState::Stopped);
    }

    #[tokio::test]
    async fn play_pause_button_toggles_and_syncs_indicator() {
        let surface = SimulatedSurface::with_duration(60.0);
        let controls = controls_with(&surface);
        controls.set_enabled(true);

        controls.click_play_pause();
        assert!(controls.player().playing());
        assert!(controls.view().playing);

        controls.click_play_pause();
        assert_eq!(controls.player().state(), PlaybackState::Paused);
        assert!(!controls.view().playing);
    }

    #[tokio::test]
    async fn seek_buttons_drive_the_player() {
        let surface = SimulatedSurface::with_duration(60.0);
        let controls = controls_with(&surface);
        controls.set_enabled(true);

        controls.click_fast_forward();
        assert_eq!(controls.player().state(), PlaybackState::FastForward);
        assert!(!controls.view().playing);

        controls.click_rewind();
        assert_eq!(controls.player().state(), PlaybackState::Rewind);

        controls.click_rewind();
        assert!(controls.view().playing);
    }

    #[tokio::test]
    async fn manual_seek_and_scrubber() {
        let surface = SimulatedSurface::with_duration(60.0);
        let controls = controls_with(&surface);
        controls.set_enabled(true);

        controls.submit_seek("15");
        assert_eq!(surface.current_time(), 15.0);
        assert_eq!(controls.view().seek_input, "15");

        controls.submit_seek("not a time");
        assert_eq!(surface.current_time(), 15.0);

        controls.scrub(42.0);
        assert_eq!(surface.current_time(), 42.0);
    }

    #[tokio::test]
    async fn duration_change_bounds_inputs() {
        let surface = SimulatedSurface::new();
        let controls = controls_with(&surface);
        assert_eq!(controls.view().seek_max, None);

        surface.set_duration(734.6);
        let view = controls.view();
        assert_eq!(view.seek_max, Some(734));
        assert_eq!(view.scrubber_max, Some(734));
    }

    #[tokio::test]
    async fn loading_a_new_source_clears_input_bounds() {
        let surface = SimulatedSurface::new();
        let controls = controls_with(&surface);
        surface.set_duration(734.0);
        assert_eq!(controls.view().seek_max, Some(734));

        controls.player().load("https://example.com/next.mp4");
        let view = controls.view();
        assert_eq!(view.seek_max, None);
        assert_eq!(view.scrubber_max, None);
    }

    #[tokio::test]
    async fn display_time_formats_progress() {
        let surface = SimulatedSurface::new();
        let controls = controls_with(&surface);
        assert_eq!(controls.display_time(), EMPTY_DISPLAY_TIME);

        surface.set_duration(125.0);
        surface.set_current_time(61.0);
        assert_eq!(controls.display_time(), "01:01 / 02:05");
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_timer_polls_position() {
        let surface = SimulatedSurface::with_duration(300.0);
        let controls = controls_with(&surface);
        surface.set_current_time(75.0);

        time::sleep(Duration::from_millis(1100)).await;
        let view = controls.view();
        assert_eq!(view.scrubber_value, 75.0);
        assert_eq!(view.display_time, "01:15 / 05:00");
    }
}
