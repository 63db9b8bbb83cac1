//! Notification text templating

use crate::skill::Skill;

/// Substitute `$skill` and `$level`, then escape for the host's markup
pub fn render(template: &str, skill: Skill, level: u32) -> String {
    let text = template
        .replace("$skill", skill.name())
        .replace("$level", &level.to_string());
    escape_markup(&text)
}

/// Escape characters that the host's text renderer treats as markup
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("<lt>"),
            '>' => out.push_str("<gt>"),
            '\n' => out.push_str("<br>"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}
