use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Longest status line message, in characters.
pub const STATUS_MESSAGE_LIMIT: usize = 120;

const ELLIPSIS: &str = "...";

/// Terminal display width of `text`.
pub fn display_width(text: &str) -> usize {
    text.width()
}

/// Truncate to `max_width` display columns, ending in `...` when cut.
///
/// # Examples
/// ```
/// use esq_core::utils::text::truncate_text_unicode;
/// assert_eq!(truncate_text_unicode("Hello World!", 8), "Hello...");
/// ```
pub fn truncate_text_unicode(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let ellipsis_width = ELLIPSIS.width();
    if max_width <= ellipsis_width {
        return ELLIPSIS[..max_width].to_string();
    }

    let target_width = max_width - ellipsis_width;
    let mut result = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }

    result.push_str(ELLIPSIS);
    result
}

/// Cap a status message at [`STATUS_MESSAGE_LIMIT`] characters (117 + `...`).
pub fn truncate_status_message(message: &str) -> String {
    if message.chars().count() <= STATUS_MESSAGE_LIMIT {
        return message.to_string();
    }
    let kept: String = message
        .chars()
        .take(STATUS_MESSAGE_LIMIT - ELLIPSIS.len())
        .collect();
    format!("{}{}", kept, ELLIPSIS)
}

/// Right-pad with spaces to `width` display columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - text_width))
    }
}
