use crate::models::{GridView, RowView, ViewMode};

#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub open: bool,
    pub name: String,
    pub emoji: String,
    pub error: Option<String>,
}

impl TaskForm {
    pub fn rejected(name: &str, emoji: &str, error: impl Into<String>) -> Self {
        Self {
            open: true,
            name: name.to_string(),
            emoji: emoji.to_string(),
            error: Some(error.into()),
        }
    }
}

pub fn render_index(
    grid: &GridView,
    view_mode: ViewMode,
    notification: Option<&str>,
    form: &TaskForm,
) -> String {
    let (notification_class, notification_text) = match notification {
        Some(text) => ("", escape_html(text)),
        None => ("hidden", String::new()),
    };
    let view_mode_icon = match view_mode {
        ViewMode::Full => FULL_MODE_ICON,
        ViewMode::Focused => FOCUSED_MODE_ICON,
    };

    let panel_class = if view_mode == ViewMode::Full { "mode-full" } else { "" };
    let modal_class = if form.open { "" } else { "hidden" };
    let scroll_top = grid.scroll_top.to_string();
    let table = render_table(grid);
    let form_name = escape_html(&form.name);
    let form_emoji = escape_html(&form.emoji);
    let form_error = escape_html(form.error.as_deref().unwrap_or(""));

    fill_template(
        INDEX_HTML,
        &[
            ("PANEL_CLASS", panel_class),
            ("VIEW_MODE", view_mode.as_str()),
            ("VIEW_MODE_ICON", view_mode_icon),
            ("SCROLL_TOP", scroll_top.as_str()),
            ("TABLE", table.as_str()),
            ("NOTIFICATION_CLASS", notification_class),
            ("NOTIFICATION", notification_text.as_str()),
            ("MODAL_CLASS", modal_class),
            ("FORM_NAME", form_name.as_str()),
            ("FORM_EMOJI", form_emoji.as_str()),
            ("FORM_ERROR", form_error.as_str()),
        ],
    )
}

/// Substitutes `{{NAME}}` placeholders in one pass over the template, so
/// substituted text is never scanned again. Unknown names are left as is.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

pub fn render_table(grid: &GridView) -> String {
    let rows: String = grid.rows.iter().map(render_row).collect();
    let headers: String = grid
        .footer
        .iter()
        .map(|header| {
            format!(
                r#"<th data-name="{name}" title="Tap to view full name"><form method="post" action="/notify"><input type="hidden" name="name" value="{name}" /><button type="submit">{emoji}</button></form></th>"#,
                name = escape_html(&header.name),
                emoji = escape_html(&header.emoji),
            )
        })
        .collect();

    format!(
        r#"<table><tbody>{rows}</tbody><tfoot><tr><th class="date-col"></th>{headers}</tr></tfoot></table>"#
    )
}

fn render_row(row: &RowView) -> String {
    let cells: String = row
        .cells
        .iter()
        .map(|cell| {
            let class = if cell.checked { "routine-cell checked" } else { "routine-cell" };
            let label = format!(
                "{} {}",
                escape_html(&cell.task_name),
                if cell.checked { "checked" } else { "unchecked" }
            );
            if row.mutable {
                format!(
                    r#"<td class="{class}" data-date="{date}" data-task-id="{id}"><form method="post" action="/toggle"><input type="hidden" name="date" value="{date}" /><input type="hidden" name="task_id" value="{id}" /><button type="submit" aria-label="{label}">{text}</button></form></td>"#,
                    date = escape_html(&row.date),
                    id = escape_html(&cell.task_id),
                    text = cell.text,
                )
            } else {
                format!(
                    r#"<td class="{class}" data-date="{date}" data-task-id="{id}" aria-label="{label}">{text}</td>"#,
                    date = escape_html(&row.date),
                    id = escape_html(&cell.task_id),
                    text = cell.text,
                )
            }
        })
        .collect();

    format!(
        r#"<tr class="{class}" style="opacity:{opacity:.2}"><td class="date-col">{label}</td>{cells}</tr>"#,
        class = if row.mutable { "today" } else { "past" },
        opacity = row.opacity,
        label = escape_html(&row.label),
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const FULL_MODE_ICON: &str = r#"<svg viewBox="0 0 24 24" aria-hidden="true"><path fill="currentColor" d="M9 3H5a2 2 0 0 0-2 2v4h2V5h4zm10 0h-4v2h4v4h2V5a2 2 0 0 0-2-2M5 15H3v4a2 2 0 0 0 2 2h4v-2H5zm16 0h-2v4h-4v2h4a2 2 0 0 0 2-2z"/></svg>"#;

const FOCUSED_MODE_ICON: &str = r#"<svg viewBox="0 0 24 24" aria-hidden="true"><path fill="currentColor" d="M14 10V3h2v5h5v2zm-4 0H3V8h5V3h2zm4 4h7v2h-5v5h-2zm-4 0v7H8v-5H3v-2z"/></svg>"#;

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <meta name="theme-color" content="#1f2933" />
  <title>Daily Tasks</title>
  <link rel="manifest" href="./manifest.webmanifest" />
  <link rel="icon" href="./icons/icon-192.svg" type="image/svg+xml" />
  <link rel="stylesheet" href="./styles.css" />
</head>
<body>
  <div id="top-notification" class="notification {{NOTIFICATION_CLASS}}" role="status">{{NOTIFICATION}}</div>

  <main class="app">
    <header class="toolbar">
      <h1>Daily Tasks</h1>
      <form method="post" action="/view-mode">
        <button id="toggle-view-mode" type="submit" aria-label="View mode: {{VIEW_MODE}}">{{VIEW_MODE_ICON}}</button>
      </form>
      <a id="open-modal" class="add-btn" href="#task-modal" aria-label="Add routine">+</a>
    </header>

    <section id="table-panel" class="table-panel {{PANEL_CLASS}}" data-scroll-top="{{SCROLL_TOP}}">
      {{TABLE}}
    </section>
  </main>

  <div id="task-modal" class="modal {{MODAL_CLASS}}">
    <form id="task-form" class="modal-card" method="post" action="/tasks">
      <h2>New routine</h2>
      <label>Name <input id="task-name" name="name" value="{{FORM_NAME}}" autocomplete="off" /></label>
      <label>Emoji <input id="task-emoji" name="emoji" value="{{FORM_EMOJI}}" autocomplete="off" /></label>
      <p id="form-error" class="form-error">{{FORM_ERROR}}</p>
      <div class="modal-actions">
        <a id="cancel-modal" href="/">Cancel</a>
        <button type="submit">Save</button>
      </div>
    </form>
  </div>

  <script src="./app.js"></script>
</body>
</html>
"##;

pub const STYLES_CSS: &str = r#":root {
  --bg: #11161c;
  --ink: #e8edf2;
  --muted: #8a96a3;
  --accent: #4ade80;
  --row-height: 56px;
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  min-height: 100vh;
  background: var(--bg);
  color: var(--ink);
  font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
}

.hidden {
  display: none !important;
}

.toolbar {
  display: flex;
  align-items: center;
  gap: 12px;
  padding: 12px 16px;
}

.toolbar h1 {
  flex: 1;
  margin: 0;
  font-size: 1.2rem;
}

.toolbar button svg {
  width: 22px;
  height: 22px;
}

.table-panel {
  max-height: calc(var(--row-height) * 5);
  overflow-y: auto;
}

.table-panel.mode-full {
  max-height: none;
}

.table-panel.mode-full tr.past {
  opacity: 1 !important;
}

table {
  width: 100%;
  border-collapse: collapse;
}

tr {
  height: var(--row-height);
}

.date-col {
  color: var(--muted);
  white-space: nowrap;
  padding: 0 12px;
}

.routine-cell {
  text-align: center;
  color: var(--accent);
  font-size: 1.4rem;
}

.routine-cell button,
tfoot button {
  width: 100%;
  height: var(--row-height);
  background: none;
  border: none;
  color: inherit;
  font: inherit;
  cursor: pointer;
}

tr.today .routine-cell {
  outline: 1px solid rgba(74, 222, 128, 0.25);
}

.notification {
  position: fixed;
  top: 12px;
  left: 50%;
  transform: translateX(-50%);
  background: #1f2933;
  padding: 10px 18px;
  border-radius: 999px;
}

.modal {
  position: fixed;
  inset: 0;
  display: grid;
  place-items: center;
  background: rgba(0, 0, 0, 0.6);
}

.modal:target {
  display: grid !important;
}

.modal-card {
  background: #1f2933;
  padding: 20px;
  border-radius: 16px;
  display: grid;
  gap: 12px;
}

.form-error {
  color: #f87171;
  min-height: 1.2em;
  margin: 0;
}
"#;

pub const APP_JS: &str = r#"const tablePanel = document.getElementById("table-panel");
const notification = document.getElementById("top-notification");

if (tablePanel) {
  tablePanel.scrollTop = Number(tablePanel.dataset.scrollTop || 0);
}

if (notification && !notification.classList.contains("hidden")) {
  setTimeout(() => notification.classList.add("hidden"), 4000);
}
"#;

pub const MANIFEST: &str = r##"{
  "name": "Daily Tasks",
  "short_name": "Tasks",
  "start_url": "./",
  "display": "standalone",
  "background_color": "#11161c",
  "theme_color": "#1f2933",
  "icons": [
    { "src": "./icons/icon-192.svg", "sizes": "192x192", "type": "image/svg+xml" },
    { "src": "./icons/icon-512.svg", "sizes": "512x512", "type": "image/svg+xml" }
  ]
}
"##;

pub const ICON_192: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="192" height="192" viewBox="0 0 24 24"><rect width="24" height="24" rx="5" fill="#11161c"/><path fill="#4ade80" d="M9 16.2 4.8 12l-1.4 1.4L9 19 21 7l-1.4-1.4z"/></svg>
"##;

pub const ICON_512: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="512" height="512" viewBox="0 0 24 24"><rect width="24" height="24" rx="5" fill="#11161c"/><path fill="#4ade80" d="M9 16.2 4.8 12l-1.4 1.4L9 19 21 7l-1.4-1.4z"/></svg>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::visible_window_at;
    use crate::grid::build_grid;
    use crate::models::{Document, Task};
    use chrono::NaiveDate;

    fn grid() -> GridView {
        let mut doc = Document::default();
        doc.tasks.push(Task {
            id: "t1".into(),
            name: "<Read> & \"write\"".into(),
            emoji: "📚".into(),
        });
        doc.toggle("2026-01-29", "t1");
        let window = visible_window_at(NaiveDate::from_ymd_opt(2026, 1, 30).unwrap(), 30);
        build_grid(&doc, &window, "2026-01-30")
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href='x'>"&"</a>"#),
            "&lt;a href=&#039;x&#039;&gt;&quot;&amp;&quot;&lt;/a&gt;"
        );
    }

    #[test]
    fn toggle_forms_only_on_today_row() {
        let html = render_table(&grid());
        assert_eq!(html.matches(r#"action="/toggle""#).count(), 1);
        assert!(html.contains(r#"name="date" value="2026-01-30""#));
        assert!(html.contains(r#"<tr class="today" style="opacity:1.00">"#));
        assert!(html.contains(r#"<tr class="past" style="opacity:0.80">"#));
        assert!(html.contains("✓"));
        assert!(!html.contains("<Read>"));
        assert!(html.contains("&lt;Read&gt; &amp; &quot;write&quot;"));
    }

    #[test]
    fn placeholder_syntax_in_user_text_is_not_expanded() {
        let mut doc = Document::default();
        doc.tasks.push(Task {
            id: "t1".into(),
            name: "Stretch {{MODAL_CLASS}}".into(),
            emoji: "🧘".into(),
        });
        let window = visible_window_at(NaiveDate::from_ymd_opt(2026, 1, 30).unwrap(), 30);
        let grid = build_grid(&doc, &window, "2026-01-30");
        let form = TaskForm::rejected("{{FORM_ERROR}}", "{{TABLE}}", "Please enter full routine name.");

        let html = render_index(&grid, ViewMode::Focused, Some("{{SCROLL_TOP}}"), &form);
        assert!(html.contains("Stretch {{MODAL_CLASS}}"));
        assert!(!html.contains("Stretch hidden"));
        assert!(html.contains(r#"value="{{FORM_ERROR}}""#));
        assert!(html.contains(r#"value="{{TABLE}}""#));
        assert!(html.contains(r#"role="status">{{SCROLL_TOP}}</div>"#));
        assert_eq!(html.matches("Please enter full routine name.").count(), 1);
    }

    #[test]
    fn fill_template_keeps_unknown_and_unclosed_placeholders() {
        let filled = fill_template("a {{X}} b {{Y}} c {{Z", &[("X", "1")]);
        assert_eq!(filled, "a 1 b {{Y}} c {{Z");
    }

    #[test]
    fn index_shows_notification_and_form_error() {
        let form = TaskForm::rejected("Walk", "ab", "Emoji field must contain a valid emoji.");
        let html = render_index(&grid(), ViewMode::Full, Some("Read"), &form);
        assert!(html.contains(r#"class="notification " role="status">Read</div>"#));
        assert!(html.contains(r#"class="table-panel mode-full""#));
        assert!(html.contains(r#"value="Walk""#));
        assert!(html.contains("Emoji field must contain a valid emoji."));
        assert!(html.contains(r#"class="modal ""#));

        let plain = render_index(&grid(), ViewMode::Focused, None, &TaskForm::default());
        assert!(plain.contains(r#"class="notification hidden""#));
        assert!(plain.contains(r#"class="modal hidden""#));
        assert!(plain.contains(&format!(r#"data-scroll-top="{}""#, 27 * 56)));
    }
}
