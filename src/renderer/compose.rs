//! Draw command generation for each screen

use crate::consts::{PIPE_WIDTH, SNAKE_CELL};
use crate::session::{Arcade, Play, Screen, Session};
use crate::settings::Difficulty;
use crate::sim::{DuelPhase, Opponent};

use super::frame::{DrawCommand, Frame, ScreenKind, TextRole};

/// Describe the arcade's current screen
pub fn compose(arcade: &Arcade) -> Frame {
    let screen = arcade.screen();
    let mut frame = Frame::new(ScreenKind::from(screen), arcade.theme().palette());

    match screen {
        Screen::Menu { selected } => {
            frame.push(DrawCommand::Title(arcade.title().name().to_string()));
            let labels = arcade.title().menu_items().iter().map(|m| m.label());
            options(&mut frame, labels, *selected);
        }
        Screen::ThemeSelect { selected } => {
            frame.text("Select Theme", TextRole::Heading);
            let labels = arcade.title().themes().iter().map(|t| t.as_str());
            options(&mut frame, labels, *selected);
        }
        Screen::DifficultySelect { selected } => {
            frame.text("Select Difficulty", TextRole::Heading);
            let labels = Difficulty::ALL.iter().map(|d| d.as_str());
            options(&mut frame, labels, *selected);
        }
        Screen::Playing => {
            if let Some(session) = arcade.session() {
                playfield(&mut frame, session);
            }
        }
        Screen::Paused => {
            if let Some(session) = arcade.session() {
                playfield(&mut frame, session);
            }
            frame.text("Paused", TextRole::Heading);
            frame.text("Pause to resume, Cancel for menu", TextRole::Hint);
        }
        Screen::GameOver => {
            if let Some(session) = arcade.session() {
                playfield(&mut frame, session);
                game_over(&mut frame, session);
            }
            frame.text("Confirm to play again, Cancel for menu", TextRole::Hint);
        }
        Screen::NameEntry { name } => {
            frame.text("New High Score!", TextRole::Heading);
            if let Some(session) = arcade.session() {
                frame.push(DrawCommand::Score(session.score()));
            }
            frame.text(format!("Enter your name: {name}"), TextRole::Body);
            frame.text("Confirm to save", TextRole::Hint);
        }
        Screen::Leaderboard => leaderboard(&mut frame, arcade),
    }
    frame
}

fn options<'a>(frame: &mut Frame, labels: impl Iterator<Item = &'a str>, selected: usize) {
    for (i, label) in labels.enumerate() {
        frame.push(DrawCommand::MenuOption {
            label: label.to_string(),
            selected: i == selected,
        });
    }
}

fn playfield(frame: &mut Frame, session: &Session) {
    match session.play() {
        Play::Flappy(state) => {
            for pipe in &state.pipes {
                frame.push(DrawCommand::Pipe {
                    x: pipe.x,
                    width: PIPE_WIDTH,
                    gap_top: pipe.gap_top,
                    gap_bottom: pipe.gap_bottom,
                });
            }
            frame.push(DrawCommand::Bird {
                center: state.bird.pos,
                radius: state.bird.radius,
            });
            frame.push(DrawCommand::Score(state.score));
        }
        Play::Snake(state) => {
            let size = state.field.cell;
            if let Some(food) = state.food {
                frame.push(DrawCommand::Food { cell: food, size });
            }
            let head = state.snake.head();
            for cell in state.snake.cells() {
                frame.push(DrawCommand::SnakeSegment {
                    cell: *cell,
                    size,
                    head: *cell == head,
                });
            }
            frame.push(DrawCommand::Score(state.score));
        }
        Play::Duel(duel) => {
            frame.push(DrawCommand::GridLines {
                size: duel.board.size(),
            });
            for (cell, mark) in duel.board.marks() {
                frame.push(DrawCommand::Mark {
                    row: cell.row,
                    col: cell.col,
                    mark,
                });
            }
            match duel.phase() {
                DuelPhase::ComputerThinking { .. } => {
                    frame.text("Computer is thinking...", TextRole::Body)
                }
                DuelPhase::AwaitingMove { seat } => {
                    let text = format!(
                        "{}'s turn ({})",
                        duel.seat_name(seat),
                        duel.mark_of(seat).as_str()
                    );
                    frame.text(text, TextRole::Body);
                }
                DuelPhase::Finished(_) => {}
            }
        }
    }
}

fn game_over(frame: &mut Frame, session: &Session) {
    frame.text("Game Over", TextRole::Heading);
    match session.play() {
        Play::Duel(duel) => {
            frame.text(duel.result_text(), TextRole::Result);
            if duel.opponent == Opponent::Computer {
                frame.text("You played against the computer", TextRole::Body);
            }
        }
        _ => {
            frame.text(format!("Score: {}", session.score()), TextRole::Result);
            if let Some(rank) = session.rank() {
                frame.text(format!("New high score, rank {rank}"), TextRole::Body);
            }
        }
    }
}

fn leaderboard(frame: &mut Frame, arcade: &Arcade) {
    frame.text("High Scores", TextRole::Heading);
    let Some(boards) = arcade.leaderboards() else {
        frame.text("No scores kept", TextRole::Body);
        return;
    };
    for (bucket, table) in boards.iter() {
        if table.is_empty() {
            frame.text(format!("{}: no scores yet", bucket.label()), TextRole::Body);
            continue;
        }
        for (i, entry) in table.entries().iter().enumerate() {
            frame.push(DrawCommand::LeaderboardRow {
                bucket: bucket.label().to_string(),
                rank: i + 1,
                name: entry.name.clone(),
                score: entry.score,
            });
        }
    }
    frame.text("Confirm to return", TextRole::Hint);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{InputEvent, Title};
    use crate::settings::Settings;
    use tempfile::TempDir;

    fn arcade(title: Title) -> (Arcade, TempDir) {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::with_data_dir(dir.path());
        settings.seed = Some(1);
        (Arcade::new(title, settings), dir)
    }

    #[test]
    fn test_menu_frame() {
        let (a, _dir) = arcade(Title::Snake);
        let frame = compose(&a);
        assert_eq!(frame.screen, ScreenKind::Menu);
        assert_eq!(frame.commands[0], DrawCommand::Title("Snake Game".to_string()));
        assert_eq!(frame.selected_option(), Some("Play"));
        let count = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::MenuOption { .. }))
            .count();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_snake_playfield() {
        let (mut a, _dir) = arcade(Title::Snake);
        for e in [InputEvent::Confirm, InputEvent::Confirm, InputEvent::Confirm] {
            a.handle_input(e);
        }
        let frame = compose(&a);
        let segments: Vec<_> = frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SnakeSegment { head, size, .. } => Some((*head, *size)),
                _ => None,
            })
            .collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments.iter().filter(|(head, _)| *head).count(), 1);
        assert!(segments.iter().all(|(_, size)| *size == SNAKE_CELL));
        assert!(frame.commands.contains(&DrawCommand::Score(0)));
        assert!(frame.commands.iter().any(|c| matches!(c, DrawCommand::Food { .. })));
    }

    #[test]
    fn test_paused_overlay_keeps_playfield() {
        let (mut a, _dir) = arcade(Title::Flappy);
        for e in [InputEvent::Confirm, InputEvent::Confirm, InputEvent::Pause] {
            a.handle_input(e);
        }
        let frame = compose(&a);
        assert_eq!(frame.screen, ScreenKind::Paused);
        assert!(frame.commands.iter().any(|c| matches!(c, DrawCommand::Bird { .. })));
        assert!(frame.texts().any(|t| t == "Paused"));
    }

    #[test]
    fn test_duel_turn_text() {
        let (mut a, _dir) = arcade(Title::TicTacToe);
        a.handle_input(InputEvent::Select(1));
        a.handle_input(InputEvent::Confirm);
        let frame = compose(&a);
        assert!(frame.commands.contains(&DrawCommand::GridLines { size: 3 }));
        assert!(frame.texts().any(|t| t.starts_with("Player 1's turn")));
    }

    #[test]
    fn test_empty_leaderboard_lists_every_bucket() {
        let (mut a, _dir) = arcade(Title::Snake);
        a.handle_input(InputEvent::Select(2));
        let frame = compose(&a);
        let empty: Vec<_> = frame.texts().filter(|t| t.ends_with("no scores yet")).collect();
        assert_eq!(empty, ["Easy: no scores yet", "Medium: no scores yet", "Hard: no scores yet"]);
    }
}
