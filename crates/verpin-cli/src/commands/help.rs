use super::EXIT_SUCCESS;
use console::Style;

const HELP_MD: &str = include_str!("../../help.md");

/// Render the bundled help document for the terminal.
///
/// Only the constructs `help.md` uses are handled: `#`/`##` headings and
/// fenced code blocks. Everything else is printed verbatim.
pub fn render(markdown: &str) -> String {
    let title = Style::new().bold().underlined();
    let heading = Style::new().bold().cyan();
    let code = Style::new().green();

    let mut out = String::with_capacity(markdown.len());
    let mut in_code = false;
    for line in markdown.lines() {
        if line.trim_start().starts_with("```") {
            in_code = !in_code;
            continue;
        }
        let rendered = if in_code {
            format!("    {}", code.apply_to(line))
        } else if let Some(text) = line.strip_prefix("## ") {
            heading.apply_to(text).to_string()
        } else if let Some(text) = line.strip_prefix("# ") {
            title.apply_to(text).to_string()
        } else {
            line.to_owned()
        };
        out.push_str(&rendered);
        out.push('\n');
    }
    out
}

pub fn help_text() -> String {
    render(HELP_MD)
}

#[allow(clippy::unnecessary_wraps)]
pub fn run() -> Result<u8, String> {
    print!("{}", help_text());
    Ok(EXIT_SUCCESS)
}
