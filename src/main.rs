use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use remu_player::loader::{fetch_manifest, TEST_STREAMS_MANIFEST_URL};
use remu_player::{
    ControlsOptions, LogFacade, MediaSurface, PlayerControls, PlayerEvent, PlayerNavigation,
    PlayerOptions, SimulatedSurface, Topic,
};

/// 模拟元数据加载后得到的时长（秒）
const SIMULATED_DURATION: f64 = 60.0;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let manifest_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| TEST_STREAMS_MANIFEST_URL.to_string());

    // 初始化播放器
    let surface = SimulatedSurface::new();
    let player = remu_player::Player::new(
        Arc::new(surface.clone()),
        PlayerOptions::default(),
        Arc::new(LogFacade),
    )?;
    let controls = Arc::new(PlayerControls::new(player.clone(), ControlsOptions::default())?);
    let mut navigation = PlayerNavigation::new();
    let title = Arc::new(Mutex::new(String::new()));

    player.add_observer(Topic::All, |event, _| {
        if event == PlayerEvent::Stop {
            log::info!("[@Stop] 播放头已归零");
        }
    });

    // 模拟播放进度
    let ticker = surface.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(250));
        loop {
            interval.tick().await;
            ticker.advance(0.25);
        }
    });

    match fetch_manifest(&manifest_url).await {
        Ok(manifest) => {
            log::info!("Test stream response received");
            // 清除“加载中”
            navigation.clear();

            for stream in manifest.streams {
                let player = player.clone();
                let controls = controls.clone();
                let surface = surface.clone();
                let title = title.clone();
                let label = stream.title.clone();
                navigation.add_stream_button(&label, false, move || {
                    player.load(&stream.url);
                    surface.set_duration(SIMULATED_DURATION);
                    *title.lock().unwrap() = stream.title.clone();
                    controls.set_enabled(true);
                });
            }
        }
        Err(e) => {
            log::error!("Failed to load stream manifest: {:#}", e);
        }
    }

    if navigation.is_loading() || navigation.buttons().is_empty() {
        log::warn!("No streams available, navigation stays in its loading state");
        return Ok(());
    }

    navigation.click(0);
    log::info!("当前节目: {}", title.lock().unwrap());

    controls.click_play_pause();
    tokio::time::sleep(Duration::from_secs(3)).await;
    controls.refresh();
    log::info!("进度: {}", controls.view().display_time);

    log::info!("测试快进");
    controls.click_fast_forward();
    tokio::time::sleep(Duration::from_secs(2)).await;
    controls.click_fast_forward();
    log::info!("进度: {}", controls.display_time());

    log::info!("测试跳转");
    controls.submit_seek("45");
    tokio::time::sleep(Duration::from_secs(2)).await;
    log::info!("进度: {}", controls.display_time());

    log::info!("测试快退");
    controls.click_rewind();
    tokio::time::sleep(Duration::from_secs(3)).await;
    log::info!("进度: {} ({:?})", controls.display_time(), player.state());

    player.stop();
    log::info!("测试完成！ 播放头: {:.1}s", surface.current_time());

    Ok(())
}
