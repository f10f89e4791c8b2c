use colored::Colorize;
use std::fmt::Write;

use crate::domain::{GameCollection, GameId};
use crate::ranking::DisplayUnit;
use crate::rating::Evaluation;

/// Plain-text ranking, one game per line with nested expansions
pub fn render(
    units: &[DisplayUnit],
    games: &GameCollection,
    evaluation: &Evaluation,
    show_details: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Game suggestion:".bold());

    for unit in units {
        match unit {
            DisplayUnit::Single { game_id, score } => {
                write_game_line(&mut out, 1, &games.name_of(*game_id), *score);
                if show_details {
                    write_details(&mut out, 2, evaluation, *game_id);
                }
            }
            DisplayUnit::Base {
                game_id,
                own_score,
                expansions,
                ..
            } => {
                let name = games.name_of(*game_id);
                match own_score {
                    Some(score) => write_game_line(&mut out, 1, &name, *score),
                    None => {
                        let _ = writeln!(
                            out,
                            "\t{} {}",
                            name.bold(),
                            "(you must use an expansion to play this game)".yellow()
                        );
                    }
                }
                if show_details {
                    write_details(&mut out, 2, evaluation, *game_id);
                }

                for expansion in expansions {
                    let _ = writeln!(
                        out,
                        "\t\twith expansion {} {}",
                        games.name_of(expansion.game_id),
                        format_score(expansion.score)
                    );
                    if show_details {
                        write_details(&mut out, 3, evaluation, expansion.game_id);
                    }
                }
            }
        }
    }

    out
}

fn write_game_line(out: &mut String, depth: usize, name: &str, score: f64) {
    let _ = writeln!(out, "{}{} {}", indent(depth), name.bold(), format_score(score));
}

fn write_details(out: &mut String, depth: usize, evaluation: &Evaluation, game_id: GameId) {
    let Some(game_evaluation) = evaluation.get(game_id) else {
        return;
    };
    for (signal, breakdown) in &game_evaluation.breakdown {
        let _ = writeln!(
            out,
            "{}{} = {}",
            indent(depth),
            signal.as_str().dimmed(),
            breakdown
        );
    }
}

fn format_score(score: f64) -> String {
    format!("[{:.4}]", score).green().to_string()
}

fn indent(depth: usize) -> String {
    "\t".repeat(depth)
}
