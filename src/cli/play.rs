//! Play command: a terminal client for the game server

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

use letrasgo::client::ApiClient;
use letrasgo::domain::{Chapter, Completion, Difficulty, Mode};
use letrasgo::puzzle::{
    chapter_grid, navigate, Classification, FlowEvent, GameContext, PuzzleSession, Screen,
    SlotState, TerminalPresenter,
};

pub struct PlayOptions {
    pub server: String,
    pub username: String,
    pub password: String,
    pub register: bool,
    pub muted: bool,
    pub points_per_puzzle: u64,
}

pub async fn play_command(options: PlayOptions) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        run(&options, &mut stdin.lock())
    })
    .await
    .context("Game loop panicked")?
}

fn run(options: &PlayOptions, input: &mut impl BufRead) -> Result<()> {
    let mut client = ApiClient::new(&options.server);
    let profile = if options.register {
        client.register(&options.username, &options.password)
    } else {
        client.login(&options.username, &options.password)
    }
    .with_context(|| format!("Failed to sign in to {}", options.server))?;

    println!("Hola, {}! Score: {}", profile.username, profile.score);
    let presenter = TerminalPresenter {
        muted: options.muted,
    };
    let mut ctx = GameContext::new(profile.into());

    loop {
        let event = match ctx.screen {
            Screen::ModeSelect => {
                println!("\nChoose a mode: 1) words  2) sentences  q) quit");
                match read_choice(input)? {
                    Choice::Quit | Choice::Back => break,
                    Choice::Number(n) => match pick(&Mode::ALL, n) {
                        Some(mode) => FlowEvent::ChooseMode(mode),
                        None => continue,
                    },
                    Choice::Other => continue,
                }
            }
            Screen::DifficultySelect { .. } => {
                println!("\nChoose a difficulty: 1) easy  2) normal  3) difficult  b) back");
                match read_choice(input)? {
                    Choice::Quit => break,
                    Choice::Back => FlowEvent::Back,
                    Choice::Number(n) => match pick(&Difficulty::ALL, n) {
                        Some(difficulty) => FlowEvent::ChooseDifficulty(difficulty),
                        None => continue,
                    },
                    Choice::Other => continue,
                }
            }
            Screen::ChapterSelect { mode, difficulty } => {
                println!(
                    "\n{} / {} (score {})",
                    mode, difficulty, ctx.player.score
                );
                println!("{}", render_grid(&ctx, mode, difficulty));
                println!("Choose a chapter (1-10), b) back");
                match read_choice(input)? {
                    Choice::Quit => break,
                    Choice::Back => FlowEvent::Back,
                    Choice::Number(n) => match u8::try_from(n).ok().and_then(Chapter::new) {
                        Some(chapter) => FlowEvent::ChooseChapter(chapter),
                        None => continue,
                    },
                    Choice::Other => continue,
                }
            }
            Screen::Playing {
                mode,
                difficulty,
                chapter,
            } => match play_puzzle(&client, &presenter, input, mode, difficulty, chapter) {
                Ok(Some(true)) => FlowEvent::PuzzleSolved {
                    score_to_add: options.points_per_puzzle,
                },
                Ok(Some(false)) => FlowEvent::Back,
                Ok(None) => break,
                Err(e) => {
                    println!("{e:#}");
                    FlowEvent::Back
                }
            },
            Screen::Solved {
                mode,
                difficulty,
                chapter,
            } => {
                let completion = Completion {
                    mode,
                    difficulty,
                    chapter,
                    score_to_add: options.points_per_puzzle,
                };
                match client.update_progress(&completion) {
                    Ok(update) => FlowEvent::ProgressSynced {
                        score: update.score,
                        progress: update.progress,
                    },
                    Err(e) => {
                        warn!("[letras:play] Failed to save progress: {}", e);
                        println!("Could not save progress: {e}");
                        FlowEvent::SyncFailed
                    }
                }
            }
        };

        match navigate(&ctx, event, &presenter) {
            Ok(next) => {
                debug!("[letras:play] {} -> {}", ctx.screen.name(), next.screen.name());
                ctx = next;
            }
            Err(e) => println!("{e}"),
        }
    }

    if let Err(e) = client.logout() {
        debug!("[letras:play] Logout failed: {}", e);
    }
    println!("Final score: {}", ctx.player.score);
    Ok(())
}

/// Play one puzzle. `Some(true)` when solved, `Some(false)` when the player
/// went back, `None` to quit.
fn play_puzzle(
    client: &ApiClient,
    presenter: &TerminalPresenter,
    input: &mut impl BufRead,
    mode: Mode,
    difficulty: Difficulty,
    chapter: Chapter,
) -> Result<Option<bool>> {
    let spec = client
        .content(mode, difficulty, chapter)
        .with_context(|| format!("Failed to load {mode}/{difficulty}/{chapter}"))?;
    if let Some(image) = &spec.image {
        println!("\n(picture: {image})");
    }

    let mut session = PuzzleSession::start(spec, presenter, &mut rand::thread_rng())?;
    loop {
        let board = session.board();
        let pieces: Vec<String> = board
            .iter()
            .enumerate()
            .map(|(i, (_, text))| format!("{}) {}", i + 1, text))
            .collect();
        println!("Pieces: {}   r) retry  b) back", pieces.join("   "));

        let id = match read_choice(input)? {
            Choice::Quit => return Ok(None),
            Choice::Back => return Ok(Some(false)),
            Choice::Other => {
                session.retry();
                continue;
            }
            Choice::Number(n) => match n.checked_sub(1).and_then(|i| board.get(i)) {
                Some((id, _)) => *id,
                None => continue,
            },
        };

        session.pick_up(id);
        match session.drop_piece(id)? {
            Classification::Correct => return Ok(Some(true)),
            Classification::Incorrect => session.retry(),
            Classification::InProgress => {}
        }
    }
}

fn render_grid(ctx: &GameContext, mode: Mode, difficulty: Difficulty) -> String {
    chapter_grid(&ctx.player.progress, mode, difficulty)
        .iter()
        .map(|slot| match slot.state {
            SlotState::Locked => format!(" ·{}· ", slot.chapter),
            SlotState::Open => format!(" [{}] ", slot.chapter),
            SlotState::Current => format!(" >{}< ", slot.chapter),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Number(usize),
    Back,
    Quit,
    /// Anything else; on the puzzle board this means retry
    Other,
}

fn parse_choice(line: &str) -> Choice {
    match line.trim().to_lowercase().as_str() {
        "q" | "quit" | "exit" => Choice::Quit,
        "b" | "back" => Choice::Back,
        other => other
            .parse::<usize>()
            .map(Choice::Number)
            .unwrap_or(Choice::Other),
    }
}

fn read_choice(input: &mut impl BufRead) -> Result<Choice> {
    print!("> ");
    std::io::stdout().flush().ok();
    let mut line = String::new();
    if input.read_line(&mut line).context("Failed to read input")? == 0 {
        // EOF
        return Ok(Choice::Quit);
    }
    Ok(parse_choice(&line))
}

fn pick<T: Copy>(items: &[T], n: usize) -> Option<T> {
    n.checked_sub(1).and_then(|i| items.get(i)).copied()
}
