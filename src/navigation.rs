/// 节目选择按钮的点击回调
pub type ClickHandler = Box<dyn Fn() + Send + Sync + 'static>;

/// 一个可选择的节目按钮
pub struct StreamButton {
    label: String,
    active: bool,
    handler: ClickHandler,
}

impl StreamButton {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// 节目导航，清单加载完成前处于“加载中”状态
pub struct PlayerNavigation {
    buttons: Vec<StreamButton>,
    loading: bool,
}

impl PlayerNavigation {
    pub fn new() -> Self {
        Self {
            buttons: Vec::new(),
            loading: true,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn buttons(&self) -> &[StreamButton] {
        &self.buttons
    }

    /// 当前选中按钮的下标
    pub fn active_index(&self) -> Option<usize> {
        self.buttons.iter().position(|button| button.active)
    }

    pub fn add_stream_button<F>(&mut self, label: &str, is_active: bool, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.buttons.push(StreamButton {
            label: label.to_string(),
            active: is_active,
            handler: Box::new(handler),
        });
    }

    /// 点击按钮：取消其他按钮的选中状态，执行回调，再选中自己
    ///
    /// 下标越界时返回 `false`。
    pub fn click(&mut self, index: usize) -> bool {
        if index >= self.buttons.len() {
            return false;
        }
        self.deactivate_all_buttons();
        (self.buttons[index].handler)();
        self.buttons[index].active = true;
        true
    }

    pub fn deactivate_all_buttons(&mut self) {
        for button in &mut self.buttons {
            button.active = false;
        }
    }

    /// 清空所有内容，同时结束“加载中”状态
    pub fn clear(&mut self) {
        self.buttons.clear();
        self.loading = false;
    }
}

impl Default for PlayerNavigation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn click_moves_the_active_marker() {
        let mut nav = PlayerNavigation::new();
        let clicks = Arc::new(AtomicUsize::new(0));
        for label in ["One", "Two", "Three"] {
            let clicks = clicks.clone();
            nav.add_stream_button(label, label == "One", move || {
                clicks.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(nav.active_index(), Some(0));

        assert!(nav.click(2));
        assert_eq!(nav.active_index(), Some(2));
        assert_eq!(nav.buttons().iter().filter(|b| b.is_active()).count(), 1);
        assert_eq!(clicks.load(Ordering::SeqCst), 1);

        assert!(!nav.click(3));
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_leaves_loading_state() {
        let mut nav = PlayerNavigation::new();
        assert!(nav.is_loading());
        nav.add_stream_button("One", false, || {});

        nav.clear();
        assert!(!nav.is_loading());
        assert!(nav.buttons().is_empty());
        assert_eq!(nav.active_index(), None);
    }
}
