//! System crontab files (`/etc/cron.d` format, with a user column).

use std::path::Path;

/// One job line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronEntry {
    /// The five time fields
    pub schedule: [String; 5],
    /// User the job runs as
    pub user: String,
    /// Command line
    pub command: String,
}

impl CronEntry {
    /// Whether any word of the command is the scanner, by path or name.
    #[must_use]
    pub fn invokes(&self, program: &Path) -> bool {
        let name = program.file_name();
        self.command.split_whitespace().any(|word| {
            let word = Path::new(word);
            word == program || (word.components().count() == 1 && word.file_name() == name)
        })
    }
}

/// Parse job lines, skipping comments, blank lines, environment
/// assignments and lines too short to be a job.
#[must_use]
pub fn parse(text: &str) -> Vec<CronEntry> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<CronEntry> {
    let mut fields = line.split_whitespace();
    let first = fields.next()?;
    if first.contains('=') || first.starts_with('@') {
        return None;
    }

    let schedule = [
        first.to_string(),
        fields.next()?.to_string(),
        fields.next()?.to_string(),
        fields.next()?.to_string(),
        fields.next()?.to_string(),
    ];
    let user = fields.next()?.to_string();
    let command = fields.collect::<Vec<_>>().join(" ");
    if command.is_empty() {
        return None;
    }

    Some(CronEntry {
        schedule,
        user,
        command,
    })
}

/// Cron file content for the scheduled scan.
#[must_use]
pub fn scan_job(schedule: &str, scanner: &Path, scan_root: &Path) -> String {
    format!(
        "# Installed by hostaudit: scheduled anti-malware scan\n\
         SHELL=/bin/sh\n\
         PATH=/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin\n\
         {schedule} root {} --recursive --infected --quiet {}\n",
        scanner.display(),
        scan_root.display()
    )
}
