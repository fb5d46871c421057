use std::fmt;
use std::path::PathBuf;

use quiz_core::scoring::{COUNTDOWN_SECS, ScoringRule};

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidScoring { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidNumber { flag, raw } => {
                write!(f, "invalid {flag} value: {raw} (expected a positive number)")
            }
            ArgsError::InvalidScoring { raw } => {
                write!(f, "invalid --scoring value: {raw} (expected streak or countdown)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  news-quiz [play]     [options]   play a quiz generated from the articles");
    eprintln!("  news-quiz articles   [options]   list the articles a quiz would use");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --articles <dir>        article directory (default: data/articles)");
    eprintln!("  --questions <n>         questions to request (default: 5)");
    eprintln!("  --max-articles <n>      articles per prompt (default: all)");
    eprintln!("  --scoring <rule>        streak | countdown (default: streak)");
    eprintln!("  --countdown-secs <n>    countdown length (default: {COUNTDOWN_SECS})");
    eprintln!("  -v, -vv, -vvv           more logging (or set RUST_LOG)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_AI_API_KEY (or OPENAI_API_KEY), QUIZ_AI_BASE_URL, QUIZ_AI_MODEL");
    eprintln!("  QUIZ_ARTICLES_DIR");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Articles,
    Help,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "articles" => Some(Self::Articles),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScoringKind {
    Streak,
    Countdown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub command: Command,
    pub articles_dir: PathBuf,
    pub question_count: usize,
    pub max_articles: Option<usize>,
    pub scoring: ScoringRule,
    pub verbose: u8,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_positive(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<usize, ArgsError> {
    let raw = require_value(args, flag)?;
    match raw.parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ArgsError::InvalidNumber { flag, raw }),
    }
}

impl Args {
    /// Parse the arguments after the program name. `env` looks up environment
    /// variables so tests do not depend on the real environment.
    pub fn parse(
        argv: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut args = argv.into_iter().peekable();

        let command = match args.peek().map(String::as_str) {
            None => Command::Play,
            Some(first) if first.starts_with('-') => Command::Play,
            Some(first) => {
                let command = Command::from_arg(first)
                    .ok_or_else(|| ArgsError::UnknownCommand(first.to_owned()))?;
                args.next();
                command
            }
        };

        let mut parsed = Self {
            command,
            articles_dir: env("QUIZ_ARTICLES_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map_or_else(|| PathBuf::from("data/articles"), PathBuf::from),
            question_count: 5,
            max_articles: None,
            scoring: ScoringRule::streak(),
            verbose: 0,
        };
        let mut scoring = ScoringKind::Streak;
        let mut countdown_secs = COUNTDOWN_SECS;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--articles" => {
                    parsed.articles_dir = PathBuf::from(require_value(&mut args, "--articles")?);
                }
                "--questions" => {
                    parsed.question_count = parse_positive(&mut args, "--questions")?;
                }
                "--max-articles" => {
                    parsed.max_articles = Some(parse_positive(&mut args, "--max-articles")?);
                }
                "--scoring" => {
                    let raw = require_value(&mut args, "--scoring")?;
                    scoring = match raw.as_str() {
                        "streak" => ScoringKind::Streak,
                        "countdown" => ScoringKind::Countdown,
                        _ => return Err(ArgsError::InvalidScoring { raw }),
                    };
                }
                "--countdown-secs" => {
                    let secs = parse_positive(&mut args, "--countdown-secs")?;
                    countdown_secs = u32::try_from(secs).unwrap_or(u32::MAX);
                }
                "--help" | "-h" => parsed.command = Command::Help,
                flag if is_verbosity(flag) => {
                    let level = u8::try_from(flag.len() - 1).unwrap_or(u8::MAX);
                    parsed.verbose = parsed.verbose.saturating_add(level);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        parsed.scoring = match scoring {
            ScoringKind::Streak => ScoringRule::streak(),
            ScoringKind::Countdown => ScoringRule::countdown(countdown_secs),
        };
        Ok(parsed)
    }

    /// Log filter for the `-v` count when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn is_verbosity(flag: &str) -> bool {
    flag.len() > 1 && flag.starts_with('-') && flag[1..].chars().all(|c| c == 'v')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(args.iter().map(|s| (*s).to_owned()), |_| None)
    }

    #[test]
    fn defaults_to_play_with_streak_scoring() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.command, Command::Play);
        assert_eq!(args.articles_dir, PathBuf::from("data/articles"));
        assert_eq!(args.question_count, 5);
        assert_eq!(args.scoring, ScoringRule::streak());
        assert_eq!(args.log_filter(), "warn");
    }

    #[test]
    fn parses_flags_and_subcommand() {
        let args = parse(&[
            "articles",
            "--articles",
            "/tmp/news",
            "--questions",
            "3",
            "--max-articles",
            "4",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.command, Command::Articles);
        assert_eq!(args.articles_dir, PathBuf::from("/tmp/news"));
        assert_eq!(args.question_count, 3);
        assert_eq!(args.max_articles, Some(4));
        assert_eq!(args.log_filter(), "debug");
    }

    #[test]
    fn countdown_scoring_uses_given_length() {
        let args = parse(&["--countdown-secs", "30", "--scoring", "countdown"]).unwrap();
        assert_eq!(args.scoring, ScoringRule::countdown(30));
    }

    #[test]
    fn env_supplies_article_dir() {
        let args = Args::parse(Vec::new(), |key| {
            (key == "QUIZ_ARTICLES_DIR").then(|| "/srv/articles".to_owned())
        })
        .unwrap();
        assert_eq!(args.articles_dir, PathBuf::from("/srv/articles"));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            parse(&["--questions", "0"]).unwrap_err(),
            ArgsError::InvalidNumber {
                flag: "--questions",
                raw: "0".into()
            }
        );
        assert_eq!(
            parse(&["--scoring", "time"]).unwrap_err(),
            ArgsError::InvalidScoring { raw: "time".into() }
        );
        assert_eq!(
            parse(&["--articles"]).unwrap_err(),
            ArgsError::MissingValue { flag: "--articles" }
        );
        assert_eq!(
            parse(&["serve"]).unwrap_err(),
            ArgsError::UnknownCommand("serve".into())
        );
        assert_eq!(
            parse(&["--bogus"]).unwrap_err(),
            ArgsError::UnknownArg("--bogus".into())
        );
    }
}
