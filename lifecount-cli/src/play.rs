use console::{style, Key, Term};
use eyre::Result;
use lifecount_core::{truncate_string, App, CardFace, ComputedCard, Presentation};
use tokio::sync::mpsc;
use tracing::debug;

use crate::utils::{clear_terminal, progress_bar};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Next,
    Previous,
    Toggle,
    Quit,
}

impl Action {
    fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::ArrowRight | Key::Char('l') | Key::Char('n') => Some(Self::Next),
            Key::ArrowLeft | Key::Char('h') | Key::Char('p') => Some(Self::Previous),
            Key::Char(' ') | Key::Enter => Some(Self::Toggle),
            Key::Char('q') | Key::Escape => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Reads keys on a blocking thread until quit is pressed or nobody listens anymore.
fn read_keys() -> mpsc::UnboundedReceiver<Action> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || {
        let term = Term::stdout();
        loop {
            let key = match term.read_key() {
                Ok(key) => key,
                Err(e) => {
                    debug!("stopped reading keys: {e}");
                    return;
                }
            };

            let Some(action) = Action::from_key(&key) else {
                continue;
            };

            if tx.send(action).is_err() || action == Action::Quit {
                return;
            }
        }
    });

    rx
}

pub async fn play(mut app: App) -> Result<()> {
    let term = Term::stdout();
    let mut presentations = app.subscribe();
    let mut keys = read_keys();

    term.hide_cursor()?;

    let res: Result<()> = async {
        render(&term, &presentations.borrow_and_update())?;

        loop {
            tokio::select! {
                changed = presentations.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let presentation = presentations.borrow_and_update().clone();
                    render(&term, &presentation)?;
                }
                action = keys.recv() => match action {
                    Some(Action::Next) => app.next(),
                    Some(Action::Previous) => app.previous(),
                    Some(Action::Toggle) => app.toggle_play(),
                    Some(Action::Quit) | None => break,
                },
            }
        }

        Ok(())
    }
    .await;

    app.pause();
    term.show_cursor()?;
    clear_terminal()?;
    res
}

fn render(term: &Term, presentation: &Presentation) -> Result<()> {
    clear_terminal()?;
    let width = (term.size().1 as usize).clamp(20, 72);

    match presentation {
        Presentation::Loading => term.write_line(&style("loading...").dim().to_string())?,
        Presentation::NoData => {
            term.write_line("no active activities to show")?;
            term.write_line(&style("q to quit").dim().to_string())?;
        }
        Presentation::Focused {
            card,
            position,
            len,
            autoplay,
            progress,
        } => {
            for line in card_lines(card, width) {
                term.write_line(&line)?;
            }

            let state = if *autoplay { "▶" } else { "⏸" };
            term.write_line("")?;
            term.write_line(&format!(
                "{} {}  {}/{}",
                state,
                style(progress_bar(*progress, width.saturating_sub(12))).cyan(),
                position + 1,
                len
            ))?;
            term.write_line(
                &style("←/→ browse  space pause/play  q quit")
                    .dim()
                    .to_string(),
            )?;
        }
    }

    Ok(())
}

fn card_lines(card: &ComputedCard, width: usize) -> Vec<String> {
    let activity = &card.activity;
    let mut lines = vec![
        format!(
            "{} {}",
            activity.icon,
            style(truncate_string(&activity.name, width)).bold()
        ),
        style(&activity.category).dim().to_string(),
        String::new(),
    ];

    match &card.face {
        CardFace::Count { .. } => {
            lines.push(style(card.face.headline()).bold().yellow().to_string());
            lines.push(format!("more times, {}", activity.frequency));
        }
        CardFace::Money { .. } => {
            lines.push(style(card.face.headline()).bold().green().to_string());
            if let Some(detail) = card.face.detail() {
                lines.push(format!("left to spend at {detail}"));
            }
        }
        CardFace::Quote { .. } => {
            lines.push(style(truncate_string(&card.face.headline(), width * 3)).italic().to_string());
            if let Some(detail) = card.face.detail() {
                lines.push(style(detail).dim().to_string());
            }
        }
    }

    if !matches!(card.face, CardFace::Quote { .. }) {
        if !activity.description.is_empty() {
            lines.push(String::new());
            lines.push(truncate_string(&activity.description, width));
        }
        lines.push(String::new());
        lines.push(
            style(format!(
                "{}% behind you, {} of {}",
                card.completion_percentage,
                card.total_occurrences - card.remaining_occurrences.min(card.total_occurrences),
                card.total_occurrences
            ))
            .dim()
            .to_string(),
        );
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_bindings() {
        assert_eq!(Action::from_key(&Key::ArrowRight), Some(Action::Next));
        assert_eq!(Action::from_key(&Key::Char('h')), Some(Action::Previous));
        assert_eq!(Action::from_key(&Key::Char(' ')), Some(Action::Toggle));
        assert_eq!(Action::from_key(&Key::Escape), Some(Action::Quit));
        assert_eq!(Action::from_key(&Key::Char('x')), None);
    }
}
