// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PagecheckError, Result};
use crate::types::NotifierKind;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PagecheckError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_check_section(&raw)?;
        let fetch_timeout = parse_duration(&raw.check.timeout).map_err(|e| {
            PagecheckError::ConfigError(format!("[check].timeout: {e}"))
        })?;
        let notify = effective_notifier(&raw);
        validate_mail_section(&raw, notify)?;

        let mail = raw.mail.map(|m| m.into_settings());
        Ok(ConfigFile::new_unchecked(raw.check, fetch_timeout, notify, mail))
    }
}

fn validate_check_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.check.state_file.trim().is_empty() {
        return Err(PagecheckError::ConfigError(
            "[check].state_file must not be empty".to_string(),
        ));
    }

    if cfg.check.workers == 0 {
        return Err(PagecheckError::ConfigError(
            "[check].workers must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

/// An explicit `notify` wins; otherwise a `[mail]` section turns mail on.
fn effective_notifier(cfg: &RawConfigFile) -> NotifierKind {
    match (cfg.check.notify, &cfg.mail) {
        (Some(kind), _) => kind,
        (None, Some(_)) => NotifierKind::Mail,
        (None, None) => NotifierKind::None,
    }
}

fn validate_mail_section(cfg: &RawConfigFile, notify: NotifierKind) -> Result<()> {
    if notify != NotifierKind::Mail {
        return Ok(());
    }

    let mail = cfg.mail.as_ref().ok_or_else(|| {
        PagecheckError::ConfigError(
            "notify = \"mail\" requires a [mail] section (or --mail)".to_string(),
        )
    })?;

    if mail.server.trim().is_empty() {
        return Err(PagecheckError::ConfigError(
            "[mail].server must be set, e.g. \"smtp.example.com:587\"".to_string(),
        ));
    }
    if mail.user.trim().is_empty() {
        return Err(PagecheckError::ConfigError(
            "[mail].user must be set to the sender address".to_string(),
        ));
    }
    Ok(())
}

/// Parse a duration like `"500ms"`, `"30s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => None,
        "s" => Some(1),
        "m" => Some(60),
        "h" => Some(60 * 60),
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ))
        }
    };
    let duration = match secs_per_unit {
        None => Duration::from_millis(value),
        Some(factor) => value
            .checked_mul(factor)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration too large: '{s}'"))?,
    };

    if duration.is_zero() {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(duration)
}
