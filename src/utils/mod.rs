//! Common utilities and helpers

pub mod path;
pub mod time;

pub use path::PathUtils;
pub use time::{format_timestamp, TimeParser};

/// Quote one argument for display in a POSIX shell
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+,@%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Render an argument vector as a copy-pasteable command line
pub fn shell_join<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    std::iter::once(shell_quote(program))
        .chain(args.iter().map(|a| shell_quote(a.as_ref())))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("-b:v"), "-b:v");
        assert_eq!(shell_quote("my clip.mp4"), "'my clip.mp4'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn test_shell_join() {
        assert_eq!(shell_join("ffmpeg", &["-i", "a b.mkv"]), "ffmpeg -i 'a b.mkv'");
    }
}
