//! Now-playing footer

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
};

use super::utils::format_position;
use crate::model::PlaybackInfo;

pub fn render_progress_bar(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let status_text = match &playback.track {
        None => " No track playing".to_string(),
        Some(track) => {
            let icon = if playback.is_playing() { " ▶" } else { "⏸ " };
            let star = if playback.is_starred { " ★" } else { "" };
            format!(
                "{} {} | {} ({}){}",
                icon,
                playback.display_title(),
                playback.display_artist(),
                track.album,
                star
            )
        }
    };

    let queue_text = match playback.queue_position {
        Some((position, total)) => format!("Track {position}/{total}"),
        None => "Queue empty".to_string(),
    };
    let controls_info = format!(
        " {} | {} | Vol: {:.0}% ",
        queue_text,
        playback.loop_mode.label(),
        playback.status.volume
    );

    let time_str = format!(
        "{} / {}",
        format_position(playback.status.position_secs),
        format_position(playback.status.duration_secs)
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ", status_text))
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(playback.status.progress_ratio())
        .label(time_str);

    frame.render_widget(gauge, area);
}
