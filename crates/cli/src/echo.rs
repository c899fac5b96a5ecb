use owo_colors::OwoColorize;
use rovat_core::Digest;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "Rovat".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Weekly news digest from article URLs\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print elapsed time with color coding
pub fn print_timing(label: &str, duration: std::time::Duration) {
    let secs = duration.as_secs_f64();
    let label = format!("{}:", label);
    if secs < 5.0 {
        eprintln!("  {} {:>8.2}s ({})", label.dimmed(), secs, "fast".dimmed());
    } else if secs < 30.0 {
        eprintln!("  {} {:>8.2}s ({})", label.dimmed(), secs, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}s ({})", label.dimmed(), secs, "slow".bright_red());
    }
}

/// Print one line per digest entry: index, title, paragraph and word counts
pub fn print_digest_details(digest: &Digest) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", format!("{} | {}", digest.heading(), digest.week).bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for entry in &digest.entries {
        let count = entry.article.paragraphs.len();
        let marker = if count == 0 { "✗".red().to_string() } else { "✓".green().to_string() };
        eprintln!(
            "  {} {:>2}. {} {}",
            marker,
            entry.index,
            entry.display_title.bright_white(),
            format!("({} paragraphs, {} words, {})", count, entry.article.word_count(), entry.article.source_host()).dimmed()
        );
    }
    eprintln!();
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
