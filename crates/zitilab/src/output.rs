use std::io::{self, Write};

pub fn print_json(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

/// Download progress on stderr, keeping stdout for results
pub fn progress_callback(downloaded: u64, total: u64) {
    if total > 0 {
        let percent = (downloaded as f64 / total as f64 * 100.0) as u8;
        let mb_downloaded = downloaded as f64 / 1_048_576.0;
        let mb_total = total as f64 / 1_048_576.0;
        eprint!("\r  Progress: {mb_downloaded:.1} / {mb_total:.1} MB ({percent}%)");
        if downloaded >= total {
            eprintln!();
        }
        io::stderr().flush().ok();
    }
}
