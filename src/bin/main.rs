use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use match_core::cli::{init_logging, load_vocabulary, open_trainer, Args};
use match_core::core::engine::Trainer;
use match_core::persistence::{FileStorage, MemoryMarker};
use match_core::{Effect, Phase, SoundKind, Theme};
use std::io::{self, stdin, stdout, Stdout, Write};

type Game = Trainer<FileStorage, MemoryMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Login,
    Lobby,
    Round,
    Victory,
}

struct Ui {
    out: Stdout,
    screen: Screen,
    status: Vec<String>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let config = match args.resolve_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            std::process::exit(2);
        }
    };
    let vocabulary = match load_vocabulary(&config) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            std::process::exit(2);
        }
    };

    let mut game = open_trainer(&config, vocabulary);
    let mut ui = Ui { out: stdout(), screen: Screen::Login, status: Vec::new() };

    loop {
        ui.draw(&game)?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.first() == Some(&"exit") {
            break;
        }
        ui.status.clear();

        match ui.screen {
            Screen::Login => ui.on_login(&mut game, &parts),
            Screen::Lobby => ui.on_lobby(&mut game, &parts),
            Screen::Round => ui.on_round(&mut game, &parts),
            Screen::Victory => ui.screen = Screen::Lobby,
        }
    }

    println!("\nSaving profiles...");
    if let Err(e) = game.logout() {
        eprintln!("[ERROR] Could not save profiles: {}", e);
    }
    Ok(())
}

impl Ui {
    fn on_login(&mut self, game: &mut Game, parts: &[&str]) {
        let name = parts.get(1).copied().unwrap_or("");
        let pin = parts.get(2).copied().unwrap_or("");
        match parts.first().copied() {
            Some("login") => match game.login(name, pin) {
                Ok(()) => self.screen = Screen::Lobby,
                Err(e) => self.status.push(e.to_string()),
            },
            Some("register") => match game.register(name, pin) {
                Ok(()) => self.status.push(format!("{} registered. Now log in!", name)),
                Err(e) => self.status.push(e.to_string()),
            },
            _ => self.status.push("Use: login <name> <pin> | register <name> <pin>".into()),
        }
    }

    fn on_lobby(&mut self, game: &mut Game, parts: &[&str]) {
        match parts.first().copied() {
            Some("start") | None => match game.start_round() {
                Ok(start) => {
                    self.status.push(start.message.to_string());
                    self.screen = Screen::Round;
                }
                Err(e) => self.status.push(e.to_string()),
            },
            Some("theme") => {
                if let Err(e) = game.toggle_theme() {
                    self.status.push(e.to_string());
                }
            }
            Some("logout") => {
                if let Err(e) = game.logout() {
                    self.status.push(e.to_string());
                }
                self.screen = Screen::Login;
            }
            Some(other) => self.status.push(format!("Unknown command '{}'", other)),
        }
    }

    /// `3` selects the third emoji, `b` the second word; `3b` does both.
    fn on_round(&mut self, game: &mut Game, parts: &[&str]) {
        let Some(view) = game.round_view() else {
            self.screen = Screen::Lobby;
            return;
        };
        for token in parts {
            if *token == "q" {
                game.abandon_round();
                self.screen = Screen::Lobby;
                return;
            }
            for c in token.chars() {
                let result = if let Some(d) = c.to_digit(10) {
                    match view.emojis.get((d as usize).wrapping_sub(1)) {
                        Some(tile) => game.emoji_clicked(&tile.word),
                        None => continue,
                    }
                } else if c.is_ascii_lowercase() {
                    match view.words.get((c as u8 - b'a') as usize) {
                        Some(tile) => game.word_clicked(&tile.word),
                        None => continue,
                    }
                } else {
                    continue;
                };
                match result {
                    Ok(effects) => self.play(game, effects),
                    Err(e) => self.status.push(e.to_string()),
                }
            }
        }
    }

    fn play(&mut self, game: &mut Game, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Pronounce(w) => self.status.push(format!("🔊 {}", w)),
                Effect::Sound(SoundKind::Wrong) => {
                    print!("\x07");
                    self.status.push("✗ Try again!".into());
                }
                Effect::Matched { word, credited: true } => self.status.push(format!("✓ {} +1", word)),
                Effect::Matched { word, credited: false } => self.status.push(format!("✓ {}", word)),
                Effect::RoundComplete => {
                    self.status.push(game.well_done().to_string());
                    self.screen = Screen::Victory;
                }
                Effect::SaveFailed(e) => self.status.push(format!("[ERROR] Progress not saved: {}", e)),
                _ => {}
            }
        }
    }

    fn draw(&mut self, game: &Game) -> io::Result<()> {
        let accent = match game.theme() {
            Theme::Light => Color::Blue,
            Theme::Dark => Color::Cyan,
        };
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        queue!(
            self.out,
            SetForegroundColor(accent),
            Print("Vocab Match 🇪🇸\n"),
            Print("---------------------------------------------------------------\n"),
            ResetColor
        )?;

        match self.screen {
            Screen::Login => {
                let names: Vec<&str> = game.users().names().collect();
                queue!(
                    self.out,
                    Print(format!("Players: {}\n\n", names.join(", "))),
                    Print("login <name> <pin>  |  register <name> <pin>  |  exit\n")
                )?;
            }
            Screen::Lobby => {
                let me = game.current_user().unwrap_or_default();
                queue!(self.out, Print(format!("Hola, {}!\n\nLeaderboard:\n", me)))?;
                for (i, (name, score)) in game.leaderboard().iter().enumerate() {
                    let color = if name == me { accent } else { Color::Reset };
                    queue!(
                        self.out,
                        SetForegroundColor(color),
                        Print(format!("  {}. {}: {}\n", i + 1, name, score)),
                        ResetColor
                    )?;
                }
                queue!(self.out, Print("\n[Enter]/start  |  theme  |  logout  |  exit\n"))?;
            }
            Screen::Round => {
                if let Some(view) = game.round_view() {
                    self.draw_round(&view, accent)?;
                }
            }
            Screen::Victory => {
                queue!(self.out, Print("🎉 Round complete! Press [Enter] to continue.\n"))?;
            }
        }

        for line in &self.status {
            queue!(self.out, Print(format!("\n{}", line)))?;
        }
        queue!(self.out, Print("\n\n> "))?;
        self.out.flush()
    }

    fn draw_round(&mut self, view: &match_core::RoundView, accent: Color) -> io::Result<()> {
        let filled = (view.progress * 20.0).round() as usize;
        queue!(
            self.out,
            Print(format!("Score: {}   [{}{}]\n\n", view.score, "#".repeat(filled), ".".repeat(20 - filled)))
        )?;
        let rows = view.emojis.len().max(view.words.len());
        for i in 0..rows {
            if let Some(tile) = view.emojis.get(i) {
                let color = if tile.matched {
                    Color::Green
                } else if tile.selected {
                    accent
                } else {
                    Color::Reset
                };
                queue!(self.out, SetForegroundColor(color), Print(format!("  {}. {}    ", i + 1, tile.emoji)))?;
            }
            if let Some(tile) = view.words.get(i) {
                let color = if tile.matched { Color::Green } else { Color::Reset };
                let letter = (b'a' + i as u8) as char;
                queue!(self.out, SetForegroundColor(color), Print(format!("{}) {}", letter, tile.word)))?;
            }
            queue!(self.out, ResetColor, Print("\n"))?;
        }
        if view.phase == Phase::EmojiSelected {
            queue!(self.out, Print("\nNow pick the word.\n"))?;
        }
        queue!(self.out, Print("\nemoji number, word letter (e.g. 2c)  |  q to leave the round\n"))?;
        Ok(())
    }
}
