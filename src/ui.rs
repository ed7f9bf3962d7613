use anyhow::Result;
use console::{Style, Term};
use pwsmith::entropy::{Rating, StrengthAssessment};
use pwsmith::error::{ConfigError, StoreCorruption};
use std::fmt::Display;
use unicode_normalization::UnicodeNormalization;

const SEPARATOR_WIDTH: usize = 40;

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

fn rating_style(rating: Rating, color_support: bool) -> Style {
    if !color_support {
        return Style::new();
    }

    match rating {
        Rating::VeryWeak => Style::new().red(),
        Rating::Weak => Style::new().yellow(),
        Rating::Moderate => Style::new().cyan(),
        Rating::Strong | Rating::VeryStrong => Style::new().green(),
    }
}

fn validate_control_characters(s: &str, input_name: &str) -> Result<String> {
    let positions: Vec<String> = s
        .chars()
        .enumerate()
        .filter(|(_, c)| c.is_control())
        .map(|(pos, _)| pos.to_string())
        .collect();

    if !positions.is_empty() {
        anyhow::bail!(
            "{} contains {} control character(s) at position(s): {}",
            input_name,
            positions.len(),
            positions.join(", ")
        );
    }

    Ok(s.to_string())
}

/// Trims and NFC-normalizes a description before it is stored.
pub fn normalize_description(s: &str) -> Result<String> {
    let normalized: String = s.trim().nfc().collect();
    validate_control_characters(&normalized, "Description")
}

pub fn display_password(
    index: usize,
    password: &str,
    assessment: &StrengthAssessment,
    options: &DisplayOptions,
) {
    if options.quiet {
        println!("{}", password);
        return;
    }

    let style = rating_style(assessment.rating, options.color_support);
    let length = password.chars().count();

    println!("Password #{}: {}", index, password);
    println!(
        "Length: {} {}",
        length,
        if length == 1 { "character" } else { "characters" }
    );
    println!("Entropy: {:.2} bits", assessment.entropy_bits);
    println!("Strength: {}", style.apply_to(assessment.rating));
}

pub fn display_separator(options: &DisplayOptions) {
    if options.quiet {
        return;
    }

    let rule = if options.unicode_support { "─" } else { "-" };
    println!("{}", rule.repeat(SEPARATOR_WIDTH));
}

fn report_line(label: &str, style: Style, message: &dyn Display) {
    let term = Term::stderr();
    if term
        .write_line(&format!("{} {}", style.apply_to(label), message))
        .is_err()
    {
        eprintln!("{} {}", label, message);
    }
}

pub fn report_config_error(err: &ConfigError, options: &DisplayOptions) {
    let style = if options.color_support {
        Style::new().red()
    } else {
        Style::new()
    };

    report_line("Error:", style, err);
}

pub fn report_corruption(corruption: &StoreCorruption, options: &DisplayOptions) {
    let style = if options.color_support {
        Style::new().yellow()
    } else {
        Style::new()
    };

    report_line("Warning:", style, corruption);
}
