use chrono::{Local, TimeZone};
use ratatui::style::Color;

use crate::record::{SubmitCode, TaskAction, TaskStatus};

/// A rendered cell value: display label plus the color it is tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub label: String,
    pub color: Color,
}

impl Tag {
    fn new<L: Into<String>>(label: L, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

/// Duration above this is tagged with the warning color.
const SLOW_TASK_SECS: f64 = 60.0;

/// Palette cycled for channel id tags.
const CHANNEL_PALETTE: [Color; 15] = [
    Color::Yellow,
    Color::Blue,
    Color::Cyan,
    Color::Green,
    Color::Gray,
    Color::LightBlue,
    Color::LightCyan,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightMagenta,
    Color::Magenta,
    Color::Red,
    Color::LightRed,
    Color::White,
    Color::DarkGray,
];

pub fn action_tag(action: TaskAction) -> Tag {
    match action {
        TaskAction::Imagine => Tag::new("绘图", Color::Blue),
        TaskAction::Upscale => Tag::new("放大", Color::Yellow),
        TaskAction::Variation => Tag::new("变换", Color::Magenta),
        TaskAction::HighVariation => Tag::new("强变换", Color::Magenta),
        TaskAction::LowVariation => Tag::new("弱变换", Color::Magenta),
        TaskAction::Pan => Tag::new("平移", Color::Cyan),
        TaskAction::Describe => Tag::new("图生文", Color::Yellow),
        TaskAction::Blend => Tag::new("图混合", Color::LightGreen),
        TaskAction::Upload => Tag::new("上传文件", Color::Blue),
        TaskAction::Shorten => Tag::new("缩词", Color::LightMagenta),
        TaskAction::Reroll => Tag::new("重绘", Color::LightBlue),
        TaskAction::Inpaint => Tag::new("局部重绘-提交", Color::Magenta),
        TaskAction::Zoom => Tag::new("变焦", Color::Cyan),
        TaskAction::CustomZoom => Tag::new("自定义变焦-提交", Color::Cyan),
        TaskAction::Modal => Tag::new("窗口处理", Color::Green),
        TaskAction::SwapFace => Tag::new("换脸", Color::LightGreen),
        TaskAction::Unknown => Tag::new("未知", Color::White),
    }
}

pub fn status_tag(status: TaskStatus) -> Tag {
    match status {
        TaskStatus::Success => Tag::new("成功", Color::Green),
        TaskStatus::NotStart => Tag::new("未启动", Color::Gray),
        TaskStatus::Submitted => Tag::new("队列中", Color::Yellow),
        TaskStatus::InProgress => Tag::new("执行中", Color::Blue),
        TaskStatus::Failure => Tag::new("失败", Color::Red),
        TaskStatus::Modal => Tag::new("窗口等待", Color::Yellow),
        TaskStatus::Unknown => Tag::new("未知", Color::White),
    }
}

pub fn code_tag(code: i64) -> Tag {
    match SubmitCode::from_code(code) {
        SubmitCode::Submitted => Tag::new("已提交", Color::Green),
        SubmitCode::Queued => Tag::new("等待中", Color::LightGreen),
        SubmitCode::Duplicate => Tag::new("重复提交", Color::Yellow),
        SubmitCode::NotSubmitted => Tag::new("未提交", Color::Yellow),
        SubmitCode::Unknown => Tag::new("未知", Color::White),
    }
}

/// Seconds spent on the task, one decimal place. "N/A" when either side of
/// the window is missing; slow tasks get the warning color.
pub fn duration_tag(submit_time: Option<i64>, finish_time: Option<i64>) -> Tag {
    let (Some(submit), Some(finish)) = (submit_time, finish_time) else {
        return Tag::new("N/A", Color::Reset);
    };
    let secs = (finish - submit) as f64 / 1000.0;
    let color = if secs > SLOW_TASK_SECS {
        Color::Red
    } else {
        Color::Green
    };
    Tag::new(format!("{secs:.1} 秒"), color)
}

pub fn channel_tag(channel_id: i64) -> Tag {
    let idx = channel_id.rem_euclid(CHANNEL_PALETTE.len() as i64) as usize;
    Tag::new(channel_id.to_string(), CHANNEL_PALETTE[idx])
}

/// "42%" -> 42, clamped to 0..=100; missing or malformed -> 0.
pub fn progress_percent(progress: Option<&str>) -> u16 {
    progress
        .map(|p| p.trim().trim_end_matches('%'))
        .and_then(|p| p.parse::<i64>().ok())
        .map(|v| v.clamp(0, 100) as u16)
        .unwrap_or(0)
}

pub fn format_timestamp_ms(ms: i64) -> String {
    match Local.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_over_threshold_is_warning() {
        let tag = duration_tag(Some(0), Some(61_000));
        assert_eq!(tag.label, "61.0 秒");
        assert_eq!(tag.color, Color::Red);
    }

    #[test]
    fn duration_under_threshold_is_normal() {
        let tag = duration_tag(Some(0), Some(30_000));
        assert_eq!(tag.label, "30.0 秒");
        assert_eq!(tag.color, Color::Green);
    }

    #[test]
    fn duration_missing_finish_is_na() {
        assert_eq!(duration_tag(Some(1_700_000_000_000), None).label, "N/A");
        assert_eq!(duration_tag(None, Some(1_700_000_000_000)).label, "N/A");
    }

    #[test]
    fn unknown_variants_render_fallback_tag() {
        assert_eq!(action_tag(TaskAction::Unknown).label, "未知");
        assert_eq!(status_tag(TaskStatus::Unknown).label, "未知");
        assert_eq!(code_tag(999).label, "未知");
    }

    #[test]
    fn progress_percent_parses_and_clamps() {
        assert_eq!(progress_percent(Some("100%")), 100);
        assert_eq!(progress_percent(Some("42%")), 42);
        assert_eq!(progress_percent(Some("250%")), 100);
        assert_eq!(progress_percent(Some("garbage")), 0);
        assert_eq!(progress_percent(None), 0);
    }

    #[test]
    fn channel_palette_wraps() {
        let a = channel_tag(3);
        let b = channel_tag(3 + CHANNEL_PALETTE.len() as i64);
        assert_eq!(a.color, b.color);
        assert_eq!(a.label, "3");
    }
}
