// Multi-language support module
// Localized strings for every screen of the game, English and Chinese

#[derive(Clone)]
pub struct Assets {
    // Mine selection screen
    pub title: &'static str,
    pub select_prompt: &'static str,
    pub select_up: &'static str,
    pub select_down: &'static str,
    pub select_start: &'static str,

    // Level header
    pub header_fmt: &'static str, // " Level: {} | Coins: {} | Time Left: {}s "
    pub header_hint: &'static str,
    pub controls: &'static str,

    // Pause screen
    pub pause_title: &'static str,
    pub pause_resume: &'static str,
    pub pause_quit: &'static str,

    // Level banners
    pub hit_mine: &'static str,
    pub level_complete: &'static str,
    pub times_up: &'static str,

    // Campaign banners
    pub game_over_fmt: &'static str, // "Game Over! Coins: {}"
    pub victory_fmt: &'static str,   // "Congratulations! Coins: {}"

    // Replay prompt
    pub replay_restart: &'static str,
    pub replay_menu: &'static str,
    pub replay_quit: &'static str,

    // Terminal size messages
    pub tsmsg_line1: &'static str,
    pub tsmsg_line2: &'static str, // "Minimum required: {} x {}"
    pub tsmsg_title: &'static str,
}

/// Returns English language assets
pub fn english_assets() -> Assets {
    Assets {
        title: "Mine Hunter",
        select_prompt: "Choose number of mines (1-9):",
        select_up: "Press UP to increase",
        select_down: "Press DOWN to decrease",
        select_start: "Press ENTER to start",

        header_fmt: " Level: {} | Coins: {} | Time Left: {}s ",
        header_hint: "P: Pause ",
        controls: " Mouse | Arrows + Space - reveal",

        pause_title: "PAUSED",
        pause_resume: "Press R to Resume",
        pause_quit: "Press Q to Quit",

        hit_mine: "You clicked a mine! Game Over!",
        level_complete: "Level Complete!",
        times_up: "Time's Up! Game Over!",

        game_over_fmt: "Game Over! Coins: {}",
        victory_fmt: "Congratulations! Coins: {}",

        replay_restart: "Press ENTER to Restart",
        replay_menu: "Press M for Mine Selection",
        replay_quit: "Press Q to Quit",

        tsmsg_line1: "Terminal size too small.",
        tsmsg_line2: "Minimum required: {} x {}",
        tsmsg_title: "Resize Terminal",
    }
}

/// Returns Chinese language assets
pub fn chinese_assets() -> Assets {
    Assets {
        title: "猎雷行动",
        select_prompt: "选择地雷数量（1-9）：",
        select_up: "按 上 增加",
        select_down: "按 下 减少",
        select_start: "按 回车 开始",

        header_fmt: " 关卡：{} | 金币：{} | 剩余时间：{} 秒 ",
        header_hint: "P：暂停 ",
        controls: " 鼠标 | 方向键 + 空格 - 翻开",

        pause_title: "已暂停",
        pause_resume: "按 R 继续",
        pause_quit: "按 Q 退出",

        hit_mine: "你踩到地雷了！游戏结束！",
        level_complete: "关卡完成！",
        times_up: "时间到！游戏结束！",

        game_over_fmt: "游戏结束！金币：{}",
        victory_fmt: "恭喜通关！金币：{}",

        replay_restart: "按 回车 重新开始",
        replay_menu: "按 M 重新选择地雷数量",
        replay_quit: "按 Q 退出",

        tsmsg_line1: "终端屏幕布局过小",
        tsmsg_line2: "最小需要尺寸：{} x {}",
        tsmsg_title: "需要调整大小",
    }
}

/// Substitute each `{}` in `template` with the next value
pub fn fill(template: &str, values: &[&dyn std::fmt::Display]) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut rest = template;
    let mut values = values.iter();
    while let Some(i) = rest.find("{}") {
        out.push_str(&rest[..i]);
        match values.next() {
            Some(v) => out.push_str(&v.to_string()),
            None => out.push_str("{}"),
        }
        rest = &rest[i + 2..];
    }
    out.push_str(rest);
    out
}

/// Main language manager struct
/// Holds the current language code and active string assets
pub struct Lang {
    pub current_lang: String,
    pub assets: Assets,
}

impl Lang {
    /// Creates a new Lang instance from a language code
    /// Normalizes input (e.g., "zh-CN" → "zh") and defaults to English for unsupported languages
    pub fn new(lang_code: &str) -> Self {
        let code = normalize(lang_code);
        Lang {
            current_lang: code.to_string(),
            assets: if code == "zh" {
                chinese_assets()
            } else {
                english_assets()
            },
        }
    }

    pub fn header(&self, level: u32, coins: u64, time_left: u64) -> String {
        fill(self.assets.header_fmt, &[&level, &coins, &time_left])
    }

    pub fn game_over(&self, coins: u64) -> String {
        fill(self.assets.game_over_fmt, &[&coins])
    }

    pub fn victory(&self, coins: u64) -> String {
        fill(self.assets.victory_fmt, &[&coins])
    }

    pub fn min_size(&self, width: u16, height: u16) -> String {
        fill(self.assets.tsmsg_line2, &[&width, &height])
    }
}

fn normalize(lang_code: &str) -> &'static str {
    if lang_code.to_lowercase().starts_with("zh") {
        "zh"
    } else {
        "en"
    }
}
