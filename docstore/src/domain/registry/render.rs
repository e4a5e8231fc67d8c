//! Snapshot body layout.

use chrono::NaiveDateTime;

/// Width of the horizontal rules framing the body.
pub const RULE_WIDTH: usize = 80;

const RULE: char = '═';
const TITLE: &str = "РЕЕСТР ДЕЙСТВУЮЩИХ ДОКУМЕНТОВ СМК";
const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Renders a snapshot body.
///
/// Lines are joined with `\n` and the body has no trailing newline. The
/// `Категория` line appears only for category snapshots.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use docstore::domain::registry::render_body;
///
/// let created = NaiveDate::from_ymd_opt(2024, 3, 9)
///     .and_then(|date| date.and_hms_opt(14, 5, 0))
///     .expect("valid timestamp");
/// let body = render_body(3, created, None, &["РК.1-02-2021 Руководство".to_owned()]);
///
/// assert!(body.contains("\nВерсия: 3\nДата создания: 09.03.2024 14:05:00\n"));
/// assert!(body.contains("\n1. РК.1-02-2021 Руководство\n"));
/// assert!(!body.ends_with('\n'));
/// ```
#[must_use]
pub fn render_body(
    version: u32,
    created_at: NaiveDateTime,
    category: Option<&str>,
    entries: &[String],
) -> String {
    let rule = RULE.to_string().repeat(RULE_WIDTH);
    let mut lines = vec![rule.clone(), TITLE.to_owned()];
    if let Some(name) = category {
        lines.push(format!("Категория: {name}"));
    }
    lines.push(format!("Версия: {version}"));
    lines.push(format!(
        "Дата создания: {}",
        created_at.format(TIMESTAMP_FORMAT)
    ));
    lines.push(rule.clone());
    lines.push(String::new());
    lines.extend(
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| format!("{}. {entry}", index + 1)),
    );
    lines.push(String::new());
    lines.push(rule.clone());
    lines.push(format!("ИТОГО: {} действующих документов", entries.len()));
    lines.push(rule);
    lines.join("\n")
}
