use chrono::{Datelike, Local, Timelike};
use log::Record;
use std::fmt::Arguments;

pub use error::LogError;

pub const DEFAULT_FORMAT: &str = "[$Y-$m-$D $H:$M $LEVEL] $MESSAGE";

/// Name of a daily log file, e.g. `SNIFFER_2025-06-14.log`.
pub fn generate_file_name(title: &str) -> String {
    let now = Local::now();
    let date = format!(
        "{year:04}-{month:02}-{day:02}",
        year = now.year(),
        month = now.month(),
        day = now.day(),
    );

    let title_formatted = title.trim().replace(" ", "-");
    format!("{title_formatted}_{date}.log")
}

/// Expands the placeholders of a user-defined log format.
///
/// Supported: `$Y`, `$m`, `$D`, `$H`, `$M`, `$S`, `$LEVEL`, `$TARGET`, `$MESSAGE`.
/// The format is scanned once, so `$M` never eats the start of `$MESSAGE`
/// and substituted text is never expanded again.
pub fn parse_format(format: &str, message: &Arguments, record: &Record) -> String {
    let time = Local::now();
    let format = format.trim();
    let mut log = String::with_capacity(format.len() + 64);

    let mut rest = format;
    while let Some(index) = rest.find('$') {
        log.push_str(&rest[..index]);
        rest = &rest[index..];

        // Longer tokens first: `$MESSAGE` before `$M`.
        let token = PLACEHOLDERS
            .iter()
            .find(|placeholder| rest.starts_with(**placeholder));
        match token {
            Some(&placeholder) => {
                match placeholder {
                    "$MESSAGE" => log.push_str(&message.to_string()),
                    "$LEVEL" => log.push_str(record.level().as_str()),
                    "$TARGET" => log.push_str(record.target()),
                    "$Y" => log.push_str(&format!("{:0>4}", time.year())),
                    "$m" => log.push_str(&format!("{:0>2}", time.month())),
                    "$D" => log.push_str(&format!("{:0>2}", time.day())),
                    "$H" => log.push_str(&format!("{:0>2}", time.hour())),
                    "$M" => log.push_str(&format!("{:0>2}", time.minute())),
                    _ => log.push_str(&format!("{:0>2}", time.second())),
                }
                rest = &rest[placeholder.len()..];
            },
            None => {
                log.push('$');
                rest = &rest[1..];
            },
        }
    }
    log.push_str(rest);

    log
}

const PLACEHOLDERS: [&str; 9] = [
    "$MESSAGE", "$LEVEL", "$TARGET", "$Y", "$m", "$D", "$H", "$M", "$S",
];

pub mod error;

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_level_target_message() {
        let args = format_args!("frame skipped");
        let record = Record::builder()
            .level(Level::Debug)
            .target("sniffer::session")
            .args(args)
            .build();

        let actual = parse_format("$LEVEL $TARGET: $MESSAGE", &args, &record);

        assert_eq!(actual, "DEBUG sniffer::session: frame skipped");
    }

    #[test]
    fn test_message_without_minutes() {
        let args = format_args!("Malformed TCP header.");
        let record = Record::builder().level(Level::Warn).args(args).build();

        let actual = parse_format("$MESSAGE ($LEVEL)", &args, &record);

        assert_eq!(actual, "Malformed TCP header. (WARN)");
    }

    #[test]
    fn test_message_is_not_expanded() {
        let args = format_args!("price $M $LEVEL");
        let record = Record::builder().level(Level::Info).args(args).build();

        let actual = parse_format("$LEVEL $MESSAGE $", &args, &record);

        assert_eq!(actual, "INFO price $M $LEVEL $");
    }

    #[test]
    fn test_time_placeholders() {
        let args = format_args!("tick");
        let record = Record::builder().level(Level::Info).args(args).build();

        let actual = parse_format("$Y-$m-$D $H:$M:$S $MESSAGE", &args, &record);

        // 2026-10-17 12:34:56 tick
        assert_eq!(actual.len(), 24);
        assert!(actual.ends_with(" tick"));
        assert!(!actual.contains('$'));
    }

    #[test]
    fn test_untouched_text_is_trimmed() {
        let args = format_args!("ignored");
        let record = Record::builder().level(Level::Info).args(args).build();

        let actual = parse_format("  plain text  ", &args, &record);

        assert_eq!(actual, "plain text");
    }

    #[test]
    fn test_file_name() {
        let name = generate_file_name(" packet sniffer ");

        assert!(name.starts_with("packet-sniffer_"));
        assert!(name.ends_with(".log"));
    }
}
