//! Renders drill snapshots as plain terminal frames.
//!
//! With ANSI enabled every frame clears the screen and redraws. Plain output scrolls instead, so
//! the runtime reprints a countdown-only change at [`is_countdown_checkpoint`] values only and
//! skips frames identical to the previous one.

use decision_drill::{
    wrap_text, DecisionRecord, DrillSnapshot, PlayView, ResultView, ScenarioSummary, Screen,
    SECONDS_PER_BONUS_POINT,
};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const MIN_WIDTH: usize = 20;
const MAX_WIDTH: usize = 100;
const PROGRESS_WIDTH: usize = 20;
const LOW_TIME_SECONDS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub ansi: bool,
}

impl ViewOptions {
    pub fn from_no_color(no_color: bool) -> Self {
        Self { ansi: !no_color }
    }
}

struct Palette {
    ansi: bool,
}

impl Palette {
    fn wrap(&self, text: &str, prefix: &str, suffix: &str) -> String {
        if self.ansi {
            format!("{prefix}{text}{suffix}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.wrap(text, "\x1b[1m", "\x1b[22m")
    }

    fn dim(&self, text: &str) -> String {
        self.wrap(text, "\x1b[2m", "\x1b[22m")
    }

    fn cyan(&self, text: &str) -> String {
        self.wrap(text, "\x1b[36m", "\x1b[39m")
    }

    fn yellow(&self, text: &str) -> String {
        self.wrap(text, "\x1b[33m", "\x1b[39m")
    }

    fn red(&self, text: &str) -> String {
        self.wrap(text, "\x1b[31m", "\x1b[39m")
    }

    fn green(&self, text: &str) -> String {
        self.wrap(text, "\x1b[32m", "\x1b[39m")
    }
}

/// Whether `remaining` is worth a redraw on its own: a multiple of the bonus interval, or the
/// last few seconds before expiry.
pub fn is_countdown_checkpoint(remaining: u32) -> bool {
    remaining % SECONDS_PER_BONUS_POINT == 0 || remaining <= LOW_TIME_SECONDS
}

/// Renders one full frame, ending with the input prompt.
pub fn render_frame(
    snapshot: &DrillSnapshot,
    status: Option<&str>,
    columns: usize,
    options: &ViewOptions,
) -> String {
    let width = columns.clamp(MIN_WIDTH, MAX_WIDTH);
    let palette = Palette { ansi: options.ansi };

    let mut lines = match (snapshot.screen, &snapshot.play, &snapshot.result) {
        (Screen::Play, Some(play), _) => render_play(play, width, &palette),
        (Screen::Result, _, Some(result)) => render_result(result, width, &palette),
        _ => render_home(&snapshot.scenarios, width, &palette),
    };

    if let Some(status) = status {
        lines.push(String::new());
        for line in wrap_text(status, width.saturating_sub(2)) {
            lines.push(palette.yellow(&format!("! {line}")));
        }
    }

    let mut frame = String::new();
    if options.ansi {
        frame.push_str(CLEAR_SCREEN);
    } else {
        frame.push('\n');
    }
    for line in lines {
        frame.push_str(&line);
        frame.push('\n');
    }
    frame.push_str("> ");
    frame
}

fn render_home(scenarios: &[ScenarioSummary], width: usize, palette: &Palette) -> Vec<String> {
    let mut lines = vec![
        palette.bold("Choose a Scenario"),
        palette.dim("Each simulation has timed decisions. Make smart, safe, sustainable choices."),
        String::new(),
    ];

    for (index, scenario) in scenarios.iter().enumerate() {
        let kicker = palette.cyan(&format!("[{}]", scenario.kicker));
        lines.push(format!(
            "{:>2}. {kicker} {}",
            index + 1,
            palette.bold(&scenario.title)
        ));
        push_indented(&mut lines, &scenario.intro, width, 4, |line| palette.dim(line));
    }

    lines.push(String::new());
    lines.push(palette.dim("Type a number to start, ? for help, q to quit."));
    lines
}

fn render_play(play: &PlayView, width: usize, palette: &Palette) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} {}",
            palette.bold(&play.scenario_title),
            palette.dim(&format!(
                "Decision {} of {}",
                play.step_number, play.step_count
            ))
        ),
        progress_bar(play.step_number.saturating_sub(1), play.step_count),
    ];

    let text = format!("Time: {}s of {}s", play.time_remaining, play.time_budget);
    let clock = if play.time_remaining <= LOW_TIME_SECONDS {
        palette.red(&text)
    } else {
        palette.cyan(&text)
    };
    lines.push(format!("Score: {}   {clock}", play.score));
    lines.push(String::new());

    push_indented(&mut lines, &play.question, width, 0, |line| palette.bold(line));
    if play.answered_option.is_none() {
        lines.push(palette.dim("Make your choice before time runs out."));
    }
    lines.push(String::new());

    for (index, option) in play.options.iter().enumerate() {
        let chosen = play.answered_option.as_deref() == Some(option.id.as_str());
        let marker = if chosen { "*" } else { " " };
        let label = format!("{marker}{:>2}. {}", index + 1, option.label);
        lines.push(if chosen { palette.green(&label) } else { label });
        if chosen {
            push_indented(&mut lines, &option.explain, width, 5, |line| palette.dim(line));
        }
    }

    lines
}

fn render_result(result: &ResultView, width: usize, palette: &Palette) -> Vec<String> {
    let mut lines = vec![
        palette.bold(&result.scenario_title),
        format!(
            "Your Resilience Score: {}",
            palette.bold(&result.score.to_string())
        ),
        String::new(),
    ];

    if let Some(outcome) = &result.outcome {
        lines.push(palette.cyan(&outcome.title));
        push_indented(&mut lines, &outcome.message, width, 0, |line| line.to_string());
        if outcome.fallback {
            lines.push(palette.dim("(score is below every outcome threshold)"));
        }
        lines.push(String::new());
    }

    lines.push(palette.bold("Decision Breakdown"));
    for (index, record) in result.log.iter().enumerate() {
        lines.push(format!("#{} • {}", index + 1, describe_choice(record)));
        let delta = format!("{:+}", record.delta);
        let delta = if record.delta < 0 {
            palette.red(&delta)
        } else {
            palette.green(&delta)
        };
        lines.push(format!(
            "   Δ Score: {delta} • Time left: {}s",
            record.time_remaining
        ));
    }

    lines.push(String::new());
    lines.push(palette.dim("r replay · h choose another scenario · q quit"));
    lines
}

fn describe_choice(record: &DecisionRecord) -> String {
    match &record.option_id {
        Some(option_id) => format!("Choice: {option_id}"),
        None => "No choice".to_string(),
    }
}

fn progress_bar(done: usize, total: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        (done * PROGRESS_WIDTH / total).min(PROGRESS_WIDTH)
    };
    let percent = if total == 0 { 0 } else { done * 100 / total };
    format!(
        "[{}{}] {percent}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled)
    )
}

fn push_indented(
    lines: &mut Vec<String>,
    text: &str,
    width: usize,
    indent: usize,
    style: impl Fn(&str) -> String,
) {
    let pad = " ".repeat(indent);
    for line in wrap_text(text, width.saturating_sub(indent)) {
        lines.push(format!("{pad}{}", style(&line)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decision_drill::{OptionView, OutcomeView};

    fn play_view(answered: Option<&str>) -> PlayView {
        PlayView {
            token: 3,
            scenario_title: "Storm".to_string(),
            step_number: 2,
            step_count: 4,
            question: "Power is out. What now?".to_string(),
            options: vec![
                OptionView {
                    id: "torch".to_string(),
                    label: "Use a torch".to_string(),
                    explain: "No open flame indoors.".to_string(),
                },
                OptionView {
                    id: "candles".to_string(),
                    label: "Light candles".to_string(),
                    explain: "Fire risk.".to_string(),
                },
            ],
            answered_option: answered.map(str::to_string),
            time_remaining: 2,
            time_budget: 10,
            score: 12,
        }
    }

    fn snapshot(screen: Screen) -> DrillSnapshot {
        DrillSnapshot {
            screen,
            scenarios: Vec::new(),
            play: None,
            result: None,
        }
    }

    #[test]
    fn countdown_checkpoints_follow_bonus_boundaries_and_final_seconds() {
        let checkpoints: Vec<u32> = (0..=17).filter(|t| is_countdown_checkpoint(*t)).collect();
        assert_eq!(checkpoints, vec![0, 1, 2, 3, 8, 16]);
    }

    #[test]
    fn progress_bar_reports_completed_steps() {
        assert_eq!(progress_bar(0, 4), format!("[{}] 0%", "-".repeat(20)));
        assert_eq!(
            progress_bar(2, 4),
            format!("[{}{}] 50%", "#".repeat(10), "-".repeat(10))
        );
        assert_eq!(progress_bar(0, 0), format!("[{}] 0%", "-".repeat(20)));
    }

    #[test]
    fn plain_play_frame_shows_countdown_and_reveals_only_chosen_explanation() {
        let mut snap = snapshot(Screen::Play);
        snap.play = Some(play_view(Some("torch")));

        let frame = render_frame(&snap, None, 80, &ViewOptions { ansi: false });

        assert!(!frame.contains('\x1b'));
        assert!(frame.contains("Decision 2 of 4"));
        assert!(frame.contains("Score: 12   Time: 2s of 10s"));
        assert!(frame.contains("* 1. Use a torch"));
        assert!(frame.contains("No open flame indoors."));
        assert!(!frame.contains("Fire risk."));
        assert!(frame.ends_with("> "));
    }

    #[test]
    fn ansi_play_frame_shows_live_countdown() {
        let mut snap = snapshot(Screen::Play);
        snap.play = Some(play_view(None));

        let frame = render_frame(&snap, None, 80, &ViewOptions { ansi: true });

        assert!(frame.starts_with(CLEAR_SCREEN));
        assert!(frame.contains("\x1b[31mTime: 2s of 10s\x1b[39m"));
        assert!(frame.contains("Make your choice before time runs out."));
    }

    #[test]
    fn result_frame_lists_breakdown_and_fallback_note() {
        let mut snap = snapshot(Screen::Result);
        snap.result = Some(ResultView {
            scenario_id: "storm".to_string(),
            scenario_title: "Storm".to_string(),
            score: -3,
            outcome: Some(OutcomeView {
                min: 0,
                title: "Shaky".to_string(),
                message: "Review the basics.".to_string(),
                fallback: true,
            }),
            log: vec![
                DecisionRecord::chosen("s1", "torch", 0, 4),
                DecisionRecord::timed_out("s2"),
            ],
        });

        let frame = render_frame(
            &snap,
            Some("No option numbered 9"),
            80,
            &ViewOptions { ansi: false },
        );

        assert!(frame.contains("Your Resilience Score: -3"));
        assert!(frame.contains("(score is below every outcome threshold)"));
        assert!(frame.contains("#1 • Choice: torch"));
        assert!(frame.contains("Δ Score: +0 • Time left: 4s"));
        assert!(frame.contains("#2 • No choice"));
        assert!(frame.contains("Δ Score: -3 • Time left: 0s"));
        assert!(frame.contains("! No option numbered 9"));
    }
}
