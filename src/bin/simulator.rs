// Headless driver: one command per line on stdin, one event per line on stdout.
// src/bin/simulator.rs
use clap::Parser;
use match_core::cli::{init_logging, load_vocabulary, open_trainer, Args};
use match_core::core::engine::Trainer;
use match_core::persistence::{FileStorage, MemoryMarker};
use match_core::{Effect, GameError, SoundKind};
use std::io::{self, BufRead, Write};
use tracing::{debug, error};

type Sim = Trainer<FileStorage, MemoryMarker>;

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let mut stdout = io::stdout();
    let config = match args.resolve_config() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "bad config");
            writeln!(stdout, "ERROR config {}", e)?;
            return Ok(());
        }
    };
    let vocabulary = match load_vocabulary(&config) {
        Ok(v) => v,
        Err(e) => {
            writeln!(stdout, "ERROR {}", GameError::from(e))?;
            return Ok(());
        }
    };
    let mut trainer = open_trainer(&config, vocabulary);
    writeln!(stdout, "READY")?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let input = line?;
        debug!(input = %input, "<-");
        let parts: Vec<&str> = input.split_whitespace().collect();
        let command = parts.first().copied().unwrap_or("");
        let arg = |i: usize| parts.get(i).copied().unwrap_or("");

        let result = match command {
            "LOGIN" => trainer.login(arg(1), arg(2)).map(|_| vec![format!("OK {}", arg(1))]),
            "REGISTER" => trainer.register(arg(1), arg(2)).map(|_| vec!["OK".to_string()]),
            "START" => trainer.start_round().map(|start| {
                let mut out = vec![format!("MESSAGE {}", start.message)];
                out.push(format!("ROUND {}", start.words.join(" ")));
                out
            }),
            "EMOJI" => trainer.emoji_clicked(arg(1)).map(|fx| render_effects(&mut trainer, fx)),
            "WORD" => trainer.word_clicked(arg(1)).map(|fx| render_effects(&mut trainer, fx)),
            "BOARD" => Ok(trainer
                .leaderboard()
                .into_iter()
                .map(|(name, score)| format!("RANK {} {}", name, score))
                .collect()),
            "THEME" => trainer.toggle_theme().map(|t| vec![format!("THEME {}", t.as_str())]),
            "QUIT" => {
                trainer.abandon_round();
                Ok(vec!["OK".to_string()])
            }
            "LOGOUT" => trainer.logout().map(|_| vec!["OK".to_string()]),
            "EXIT" => {
                if let Err(e) = trainer.logout() {
                    error!(error = %e, "could not save on exit");
                }
                break;
            }
            "" => continue,
            other => Ok(vec![format!("ERROR unknown command {}", other)]),
        };

        let lines = result.unwrap_or_else(|e| vec![format!("ERROR {}", e)]);
        for out in lines {
            debug!(output = %out, "->");
            writeln!(stdout, "{}", out)?;
        }
        stdout.flush()?;
    }
    Ok(())
}

fn render_effects(trainer: &mut Sim, effects: Vec<Effect>) -> Vec<String> {
    let mut out = Vec::with_capacity(effects.len());
    for effect in effects {
        out.push(match effect {
            Effect::Pronounce(w) => format!("SAY {}", w),
            Effect::Sound(kind) => format!("SOUND {}", sound_name(kind)),
            Effect::Selected(w) => format!("SELECTED {}", w),
            Effect::Matched { word, credited } => format!("MATCHED {} {}", word, credited),
            Effect::Incorrect(w) => format!("INCORRECT {}", w),
            Effect::Credit(w) => {
                let score = trainer.profile().map(|p| p.score).unwrap_or(0);
                format!("SCORE {} {}", w, score)
            }
            Effect::Progress { matched, total } => format!("PROGRESS {} {}", matched, total),
            Effect::RoundComplete => format!("COMPLETE {}", trainer.well_done()),
            Effect::SaveFailed(e) => format!("ERROR storage {}", e),
        });
    }
    out
}

fn sound_name(kind: SoundKind) -> &'static str {
    match kind {
        SoundKind::Correct => "correct",
        SoundKind::Wrong => "wrong",
        SoundKind::Finish => "finish",
    }
}
