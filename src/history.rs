use chrono::{DateTime, Utc};
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Format one history entry
pub fn format_entry(
    timestamp: DateTime<Utc>,
    original: &str,
    translated: &str,
    source_lang: &str,
    target_lang: &str,
) -> String {
    format!(
        "[{}] {} -> {}\nIN:  {}\nOUT: {}\n---\n\n",
        timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        source_lang,
        target_lang,
        original,
        translated
    )
}

/// Append a translation to the history file, creating it if needed
pub fn append_entry(
    history_file: &str,
    original: &str,
    translated: &str,
    source_lang: &str,
    target_lang: &str,
) -> Result<(), Box<dyn Error>> {
    let path = Path::new(history_file);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let entry = format_entry(Utc::now(), original, translated, source_lang, target_lang);

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    file.write_all(entry.as_bytes())?;
    file.flush()?;

    Ok(())
}
