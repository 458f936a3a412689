use unicode_width::UnicodeWidthChar;

/// Parse "true"/"false"/"1"/"0" from an owned String.
pub fn parse_bool_flag(s: String) -> Option<bool> {
    parse_bool_str(&s)
}

/// Parse "true"/"false"/"1"/"0" from a &str.
pub fn parse_bool_str(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn env_override_usize(key: &str, default: usize, min: usize, max: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .map(|v| v.clamp(min, max))
        .unwrap_or(default)
}

/// First line of a text, without the trailing newline.
pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

/// Clip to at most `max_cells` terminal cells, appending an ellipsis when
/// anything was removed. The ellipsis occupies one of the budgeted cells.
pub fn clip_to_width(text: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }

    let total: usize = text.chars().map(|ch| ch.width().unwrap_or(0)).sum();
    if total <= max_cells {
        return text.to_string();
    }

    let budget = max_cells.saturating_sub(1);
    let mut cells = 0usize;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if cells + w > budget {
            break;
        }
        cells += w;
        out.push(ch);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_helpers() {
        assert_eq!(parse_bool_str("true"), Some(true));
        assert_eq!(parse_bool_str("0"), Some(false));
        assert_eq!(parse_bool_flag("YES".to_string()), Some(true));
        assert_eq!(parse_bool_flag("off".to_string()), Some(false));
        assert_eq!(parse_bool_str("maybe"), None);
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("ls -la\ngit status"), "ls -la");
        assert_eq!(first_line(""), "");
        assert_eq!(first_line("single"), "single");
    }

    #[test]
    fn test_clip_to_width_keeps_short_text_intact() {
        assert_eq!(clip_to_width("ls -la", 10), "ls -la");
        assert_eq!(clip_to_width("ls -la", 6), "ls -la");
    }

    #[test]
    fn test_clip_to_width_truncates_with_ellipsis() {
        assert_eq!(clip_to_width("git status --short", 10), "git statu…");
        assert_eq!(clip_to_width("anything", 0), "");
    }

    #[test]
    fn test_clip_to_width_counts_wide_characters() {
        // CJK characters occupy two cells each.
        assert_eq!(clip_to_width("日本語テキスト", 7), "日本語…");
    }
}
